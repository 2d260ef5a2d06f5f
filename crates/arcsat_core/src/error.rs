use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("invalid coordinate: lat={latitude} lng={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("at least 2 visible points are required to build a route (found {found})")]
    InsufficientPoints { found: usize },
    #[error("lookup failed: {0}")]
    LookupFailure(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn lookup_failure(message: impl Into<String>) -> Self {
        Self::LookupFailure(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn insufficient_points_message_names_count() {
        let err = Error::InsufficientPoints { found: 1 };
        assert!(err.to_string().contains("found 1"));
    }

    #[test]
    fn invalid_coordinate_message_includes_both_axes() {
        let err = Error::InvalidCoordinate {
            latitude: 91.0,
            longitude: 0.5,
        };
        assert_eq!(err.to_string(), "invalid coordinate: lat=91 lng=0.5");
    }
}
