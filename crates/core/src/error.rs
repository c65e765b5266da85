/// Boxed lower-level failure raised by a storage backend.
pub type StorageError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Sender not registered: {sender}")]
    SenderNotRegistered { sender: String },

    #[error("Duplicate notification from {sender} to {recipient}")]
    DuplicateNotification { sender: String, recipient: String },

    #[error("Storage error: {0}")]
    Storage(#[source] StorageError),
}

impl CoreError {
    /// Wrap any backend error as [`CoreError::Storage`].
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<StorageError>,
    {
        CoreError::Storage(err.into())
    }
}
