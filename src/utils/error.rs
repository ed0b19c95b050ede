use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrimeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Worker panicked while checking input #{index} ({value}): {message}")]
    WorkerPanicked {
        index: usize,
        value: i64,
        message: String,
    },

    #[error("Worker process {worker} failed: {message}")]
    WorkerProcessError { worker: usize, message: String },

    #[error("Worker protocol error: {message}")]
    ProtocolError { message: String },

    #[error("Runtime error: {message}")]
    RuntimeError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Worker,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PrimeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PrimeError::ConfigValidationError { .. }
            | PrimeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PrimeError::WorkerPanicked { .. } | PrimeError::WorkerProcessError { .. } => {
                ErrorCategory::Worker
            }
            PrimeError::ProtocolError { .. } | PrimeError::SerializationError(_) => {
                ErrorCategory::Data
            }
            PrimeError::IoError(_) | PrimeError::RuntimeError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Worker | ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PrimeError::ConfigValidationError { field, .. }
            | PrimeError::InvalidConfigValueError { field, .. } => {
                format!("Check the value of '{}' in the CLI flags or TOML file", field)
            }
            PrimeError::WorkerPanicked { value, .. } => {
                format!("Re-run with --verbose and inspect input {}", value)
            }
            PrimeError::WorkerProcessError { .. } => {
                "Make sure the worker binary is built and runnable (`prime-pool worker`)".to_string()
            }
            PrimeError::ProtocolError { .. } | PrimeError::SerializationError(_) => {
                "The worker binary may be a different version; rebuild it".to_string()
            }
            PrimeError::IoError(_) => "Check file permissions and process limits".to_string(),
            PrimeError::RuntimeError { .. } => {
                "Lower the worker count and try again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Worker => format!("A worker failed, batch aborted: {}", self),
            ErrorCategory::Data => format!("Worker sent an unreadable reply: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PrimeError>;
