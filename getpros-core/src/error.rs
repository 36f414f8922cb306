use crate::validation::ValidationErrors;
use std::fmt;

#[derive(Debug)]
pub enum GetProsError {
    Network(reqwest::Error),
    Json(serde_json::Error),
    Serialization(String),
    Api { status: u16, message: String },
    Config(String),
    Validation(ValidationErrors),
    Io(std::io::Error),
}

impl fmt::Display for GetProsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GetProsError::Network(e) => write!(f, "Network error: {}", e),
            GetProsError::Json(e) => write!(f, "JSON parsing error: {}", e),
            GetProsError::Serialization(e) => write!(f, "Serialization error: {}", e),
            GetProsError::Api { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            GetProsError::Config(e) => write!(f, "Configuration error: {}", e),
            GetProsError::Validation(e) => write!(f, "Validation failed: {}", e),
            GetProsError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for GetProsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GetProsError::Network(e) => Some(e),
            GetProsError::Json(e) => Some(e),
            GetProsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GetProsError {
    fn from(err: reqwest::Error) -> Self {
        GetProsError::Network(err)
    }
}

impl From<serde_json::Error> for GetProsError {
    fn from(err: serde_json::Error) -> Self {
        GetProsError::Json(err)
    }
}

impl From<std::io::Error> for GetProsError {
    fn from(err: std::io::Error) -> Self {
        GetProsError::Io(err)
    }
}

impl From<ValidationErrors> for GetProsError {
    fn from(err: ValidationErrors) -> Self {
        GetProsError::Validation(err)
    }
}
