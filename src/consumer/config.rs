use std::str::FromStr;

use crate::errors::SqsConsumerError;

/// Default number of concurrent workers.
pub const DEFAULT_CONCURRENCY: usize = 5;
/// Default long-poll wait time, in seconds.
pub const DEFAULT_WAIT_TIME_SECONDS: i32 = 10;
/// Default number of messages requested per poll.
pub const DEFAULT_MAX_NUMBER_OF_MESSAGES: i32 = 10;

/// When received messages are deleted from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteStrategy {
    /// Delete the whole received batch before any handler runs.
    ///
    /// At-most-once: a message whose handler fails is lost.
    #[default]
    Immediate,

    /// Delete only the messages whose handler succeeded, after the batch was handled.
    ///
    /// At-least-once: failed messages are redelivered once their visibility
    /// timeout expires.
    OnSuccess,
}

impl DeleteStrategy {
    /// Parses a strategy name, falling back to [`DeleteStrategy::Immediate`]
    /// for anything unrecognized.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "on_success" | "onsuccess" => DeleteStrategy::OnSuccess,
            _ => DeleteStrategy::Immediate,
        }
    }
}

impl FromStr for DeleteStrategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DeleteStrategy::from_name(s))
    }
}

/// Configuration for an [`SqsConsumer`](crate::consumer::SqsConsumer).
///
/// Zero-valued fields are replaced with defaults when the consumer is built.
/// A configuration is immutable once handed to a consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqsConsumerConfig {
    /// The queue URL to consume from. Required.
    pub queue: String,

    /// Number of concurrent workers. Defaults to 5.
    pub concurrency: usize,

    /// The wait time for long polling, in seconds. Defaults to 10.
    pub wait_time_seconds: i32,

    /// The maximum number of messages to receive in a single request. Defaults to 10.
    pub max_number_of_messages: i32,

    /// Visibility timeout for received messages, in seconds. Passed through as
    /// given; `0` keeps the queue's own setting.
    pub visibility_timeout: i32,

    /// When messages are deleted. Defaults to [`DeleteStrategy::Immediate`].
    pub delete_strategy: DeleteStrategy,
}

impl SqsConsumerConfig {
    pub fn new(queue: impl Into<String>) -> Self {
        SqsConsumerConfig {
            queue: queue.into(),
            ..Default::default()
        }
    }

    /// Reads the configuration from `SQS_CONSUMER_*` environment variables.
    ///
    /// | variable | field |
    /// |---|---|
    /// | `SQS_CONSUMER_QUEUE` | `queue` |
    /// | `SQS_CONSUMER_CONCURRENCY` | `concurrency` |
    /// | `SQS_CONSUMER_WAIT_TIME_SECONDS` | `wait_time_seconds` |
    /// | `SQS_CONSUMER_MAX_MESSAGES` | `max_number_of_messages` |
    /// | `SQS_CONSUMER_VISIBILITY_TIMEOUT` | `visibility_timeout` |
    /// | `SQS_CONSUMER_DELETE_STRATEGY` | `delete_strategy` |
    ///
    /// Missing or unparsable numbers read as zero and therefore get their default.
    pub fn from_env() -> Self {
        SqsConsumerConfig {
            queue: std::env::var("SQS_CONSUMER_QUEUE").unwrap_or_default(),
            concurrency: env_number("SQS_CONSUMER_CONCURRENCY"),
            wait_time_seconds: env_number("SQS_CONSUMER_WAIT_TIME_SECONDS"),
            max_number_of_messages: env_number("SQS_CONSUMER_MAX_MESSAGES"),
            visibility_timeout: env_number("SQS_CONSUMER_VISIBILITY_TIMEOUT"),
            delete_strategy: std::env::var("SQS_CONSUMER_DELETE_STRATEGY")
                .map(|name| DeleteStrategy::from_name(&name))
                .unwrap_or_default(),
        }
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn wait_time_seconds(mut self, wait_time_seconds: i32) -> Self {
        self.wait_time_seconds = wait_time_seconds;
        self
    }

    pub fn max_number_of_messages(mut self, max_number_of_messages: i32) -> Self {
        self.max_number_of_messages = max_number_of_messages;
        self
    }

    pub fn visibility_timeout(mut self, visibility_timeout: i32) -> Self {
        self.visibility_timeout = visibility_timeout;
        self
    }

    pub fn delete_strategy(mut self, delete_strategy: DeleteStrategy) -> Self {
        self.delete_strategy = delete_strategy;
        self
    }

    /// Checks the queue and fills zero-valued fields with their defaults.
    pub(crate) fn validated(mut self) -> Result<Self, SqsConsumerError> {
        if self.queue.trim().is_empty() {
            return Err(SqsConsumerError::QueueNotSet);
        }

        if self.concurrency == 0 {
            self.concurrency = DEFAULT_CONCURRENCY;
        }

        if self.wait_time_seconds == 0 {
            self.wait_time_seconds = DEFAULT_WAIT_TIME_SECONDS;
        }

        if self.max_number_of_messages == 0 {
            self.max_number_of_messages = DEFAULT_MAX_NUMBER_OF_MESSAGES;
        }

        Ok(self)
    }
}

fn env_number<T: FromStr + Default>(name: &str) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_default()
}
