use core_library::LibraryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Store failure; aborts the run
    #[error("Archive store error: {0}")]
    Library(#[from] LibraryError),

    #[error("Invalid sync settings: {0}")]
    InvalidSettings(String),

    #[error("Clock produced an out of range timestamp: {0}")]
    InvalidTimestamp(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl From<core_runtime::Error> for SyncError {
    fn from(error: core_runtime::Error) -> Self {
        SyncError::InvalidSettings(error.to_string())
    }
}
