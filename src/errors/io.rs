use crate::error::MLError;
use std::io;

impl From<io::Error> for MLError {
    fn from(err: io::Error) -> MLError {
        MLError::Common {
            message: err.to_string(),
        }
    }
}
