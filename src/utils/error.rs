use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid student record: {message}")]
    InvalidRecord { message: String },

    #[error("Required argument is missing: {argument}")]
    MissingInput { argument: String },

    #[error("Parse error on line {line}, field {field} ('{value}'): {reason}")]
    Parse {
        line: usize,
        field: String,
        value: String,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Input,
    Parse,
    Io,
    Config,
}

impl RosterError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(argument: impl Into<String>) -> Self {
        Self::MissingInput {
            argument: argument.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } | Self::InvalidRecord { .. } => ErrorCategory::Validation,
            Self::MissingInput { .. } => ErrorCategory::Input,
            Self::Parse { .. } | Self::Serialization(_) => ErrorCategory::Parse,
            Self::Csv(_) | Self::Io(_) => ErrorCategory::Io,
            Self::Config { .. } => ErrorCategory::Config,
        }
    }

    /// 提供給使用者的修復建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => {
                "Check the record fields: names and group must not be blank, course must be 1-6, \
                 email must use yandex.ru, gmail.com or icloud.com, birth date must be between 01.01.1992 and today"
            }
            ErrorCategory::Input => "Provide all required arguments and try again",
            ErrorCategory::Parse => {
                "Make sure the file is well-formed: course must be a number, dates must look like dd.MM.yyyy"
            }
            ErrorCategory::Io => {
                "Check that the path exists, is writable and is not locked by another program"
            }
            ErrorCategory::Config => "Fix the configuration file (see roster.toml) and retry",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Validation { field, message } => format!("{}: {}", field, message),
            Self::InvalidRecord { message } => message.clone(),
            Self::MissingInput { argument } => format!("Missing required {}", argument),
            Self::Parse {
                line, field, value, ..
            } => format!("Cannot read {} '{}' on line {}", field, value, line),
            Self::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                "No permission to write the file".to_string()
            }
            Self::Io(e) => format!("File operation failed: {}", e),
            Self::Csv(e) => format!("Cannot read CSV file: {}", e),
            Self::Serialization(e) => format!("Roster file is not valid JSON: {}", e),
            Self::Config { message } => message.clone(),
        }
    }

    /// CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 1,
            ErrorCategory::Validation | ErrorCategory::Input => 2,
            ErrorCategory::Parse => 3,
            ErrorCategory::Io => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
