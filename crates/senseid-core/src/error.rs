use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown reader kind: {0}")]
    UnknownReaderKind(String),
}

pub type Result<T> = std::result::Result<T, Error>;
