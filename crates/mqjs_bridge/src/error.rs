use boa_engine::{JsError, JsNativeError};
use derive_more::{Display, Error, From};

#[derive(Display, Debug, Error, From)]
pub enum Error {
    JsError { source: JsError },
    ConfigError { source: figment::Error },
}

impl From<Error> for JsError {
    fn from(value: Error) -> Self {
        match value {
            Error::JsError { source } => source,
            Error::ConfigError { source } => JsNativeError::eval()
                .with_message(format!("ConfigError: {source}"))
                .into(),
        }
    }
}

impl From<JsNativeError> for Error {
    fn from(source: JsNativeError) -> Self {
        Error::JsError {
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
