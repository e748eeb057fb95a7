use crate::error::MLError;

impl From<serde_yaml::Error> for MLError {
    fn from(err: serde_yaml::Error) -> MLError {
        MLError::Common {
            message: err.to_string(),
        }
    }
}
