pub mod csv_codec;
pub mod roster;

pub use crate::domain::model::StudentRecord;
pub use crate::domain::ports::Storage;
pub use crate::utils::error::Result;
pub use roster::{RosterFilter, RosterManager};
