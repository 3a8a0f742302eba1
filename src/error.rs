pub type ContrailResult<T> = Result<T, ContrailError>;

#[derive(thiserror::Error, Debug)]
pub enum ContrailError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ContrailError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}
