use crate::error::MLError;

impl From<anyhow::Error> for MLError {
    fn from(err: anyhow::Error) -> MLError {
        match err.downcast::<MLError>() {
            Ok(err) => err,
            Err(err) => MLError::Common {
                message: format!("{:#}", err),
            },
        }
    }
}
