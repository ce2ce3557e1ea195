use thiserror::Error;

/// User-correctable problems found while building a query from the filter state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("AOI incomplete")]
    AoiIncomplete,

    #[error("no product selected")]
    NoProductSelected,

    #[error("invalid coordinate for {field}: {value:?}")]
    InvalidCoordinate { field: String, value: String },
}

#[derive(Error, Debug)]
pub enum QueryExecutionError {
    #[error("feature service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("feature service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("feature service response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AoiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Query execution error: {0}")]
    QueryExecution(#[from] QueryExecutionError),

    #[error("Unknown product: {id}")]
    UnknownProduct { id: String },

    #[error("Unknown coordinate field: {name}")]
    UnknownField { name: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AoiError {
    /// Errors the user can fix by editing the form and retrying.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            AoiError::Validation(_) | AoiError::UnknownProduct { .. } | AoiError::UnknownField { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AoiError::Validation(ValidationError::AoiIncomplete) => {
                "Please fill in all four bounding coordinates or draw an area on the map.".to_string()
            }
            AoiError::Validation(ValidationError::NoProductSelected) => {
                "Please select at least one product.".to_string()
            }
            AoiError::Validation(ValidationError::InvalidCoordinate { field, value }) => {
                format!("The {} coordinate '{}' is not a number.", field, value)
            }
            AoiError::QueryExecution(_) => {
                "The feature service query failed. Check the log and try again.".to_string()
            }
            AoiError::UnknownProduct { id } => format!("'{}' is not a known product.", id),
            AoiError::UnknownField { name } => format!("'{}' is not a coordinate field.", name),
            AoiError::ConfigError { field, message } => {
                format!("Invalid configuration ({}): {}", field, message)
            }
            AoiError::IoError(e) => format!("File access failed: {}", e),
            AoiError::SerializationError(e) => format!("Could not write the layer: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AoiError>;
