use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecErrorKind {
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(transparent)]
pub struct RecError(pub RecErrorKind);

impl RecError {
    pub fn new(kind: RecErrorKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &RecErrorKind {
        &self.0
    }
}

impl From<RecErrorKind> for RecError {
    fn from(kind: RecErrorKind) -> Self {
        RecError(kind)
    }
}

pub type RecResult<T> = Result<T, RecError>;
