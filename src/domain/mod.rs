// Domain layer: the student record and the storage port. No file system access here.

pub mod model;
pub mod ports;
