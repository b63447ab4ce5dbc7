pub type DrawResult<T> = Result<T, DrawError>;

#[derive(thiserror::Error, Debug)]
pub enum DrawError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid image handle: {0}")]
    InvalidHandle(String),

    #[error("draw error: {0}")]
    Draw(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse failure category, independent of the message carried by a [`DrawError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InvalidPath,
    IoFailure,
    DecodeFailure,
    InvalidHandle,
    DrawFailure,
    Config,
    Other,
}

impl DrawError {
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn invalid_handle(msg: impl Into<String>) -> Self {
        Self::InvalidHandle(msg.into())
    }

    pub fn draw(msg: impl Into<String>) -> Self {
        Self::Draw(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidPath(_) => FailureKind::InvalidPath,
            Self::Io(_) => FailureKind::IoFailure,
            Self::Decode(_) => FailureKind::DecodeFailure,
            Self::InvalidHandle(_) => FailureKind::InvalidHandle,
            Self::Draw(_) => FailureKind::DrawFailure,
            Self::Config(_) => FailureKind::Config,
            Self::Other(_) => FailureKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
