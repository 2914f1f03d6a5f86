use thiserror::Error;

/// Error types for SQS consumer operations.
///
/// Configuration errors are returned while constructing an [`SqsConsumer`],
/// transport errors stop the owning worker (and with it the whole pool), and
/// handler errors are logged and skipped by the worker loop.
///
/// [`SqsConsumer`]: crate::consumer::SqsConsumer
#[derive(Debug, Error)]
pub enum SqsConsumerError {
    /// No configuration was supplied to the consumer.
    #[error("consumer configuration is missing")]
    ConfigIsNil,

    /// The configuration does not name a queue.
    #[error("queue is not set in the consumer configuration")]
    QueueNotSet,

    /// Error that occurs during AWS SQS client initialization.
    ///
    /// This error typically happens when the AWS credentials or region
    /// cannot be resolved from the environment.
    #[error("failed to initialize AWS SQS client: {0}")]
    InitializationError(String),

    #[error("failed to receive messages from {queue}: {message}")]
    ReceiveError { queue: String, message: String },

    #[error("failed to delete messages from {queue}: {message}")]
    DeleteError { queue: String, message: String },

    /// A worker task panicked or was aborted before returning.
    #[error("consumer worker failed: {0}")]
    WorkerFailed(String),

    #[error("{0}")]
    GenericError(#[from] GenericError),
}

/// Generic error type for handler failures and other free-form errors.
#[derive(Debug, Error)]
pub struct GenericError(String);

impl GenericError {
    /// Creates a new `GenericError` with the provided message.
    pub fn new(message: String) -> Self {
        GenericError(message)
    }
}

impl std::fmt::Display for GenericError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GenericError {
    fn from(s: String) -> Self {
        GenericError::new(s)
    }
}

impl From<&str> for SqsConsumerError {
    fn from(s: &str) -> Self {
        SqsConsumerError::GenericError(GenericError::new(s.to_string()))
    }
}
