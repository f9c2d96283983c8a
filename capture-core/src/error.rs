use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Event error: {0}")]
    Event(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CaptureError {
    fn from(e: serde_json::Error) -> Self {
        CaptureError::Event(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CaptureError>;
