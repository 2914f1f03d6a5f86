use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::client::create_sqs_client_from_env_vars;
use crate::errors::SqsConsumerError;
use crate::transport::QueueTransport;

mod batch;
mod config;
mod handler;
mod worker;

pub use batch::{DELETE_BATCH_SIZE, chunk};
pub use config::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_NUMBER_OF_MESSAGES, DEFAULT_WAIT_TIME_SECONDS,
    DeleteStrategy, SqsConsumerConfig,
};
pub use handler::MessageHandler;
pub use worker::IDLE_POLL_DELAY;

use worker::Worker;

/// A pool of workers consuming one SQS queue.
///
/// Every worker shares the same transport and the same cancellation token.
/// The first worker to fail cancels the token, which stops the others at
/// their next poll.
pub struct SqsConsumer<T = aws_sdk_sqs::Client>
where
    T: QueueTransport,
{
    /// The validated configuration, defaults applied.
    config: Arc<SqsConsumerConfig>,

    /// The queue transport shared by all workers.
    transport: Arc<T>,
}

impl SqsConsumer<aws_sdk_sqs::Client> {
    /// Creates a consumer backed by an SQS client built from `AWS_ACCESS_KEY_ID`,
    /// `AWS_SECRET_ACCESS_KEY` and `AWS_REGION`.
    ///
    /// The configuration is validated before the environment is read.
    pub fn from_env(
        config: impl Into<Option<SqsConsumerConfig>>,
    ) -> Result<Self, SqsConsumerError> {
        let config = validate(config.into())?;
        let client = create_sqs_client_from_env_vars().inspect_err(|e| {
            error!(error = %e, "one or more AWS environment variables are not set");
        })?;

        Ok(SqsConsumer {
            config: Arc::new(config),
            transport: Arc::new(client),
        })
    }
}

impl<T> SqsConsumer<T>
where
    T: QueueTransport + 'static,
{
    /// Creates a consumer on top of an existing transport.
    ///
    /// # Errors
    ///
    /// [`SqsConsumerError::ConfigIsNil`] when `config` is `None`, and
    /// [`SqsConsumerError::QueueNotSet`] when it names no queue.
    pub fn new(
        transport: T,
        config: impl Into<Option<SqsConsumerConfig>>,
    ) -> Result<Self, SqsConsumerError> {
        let config = validate(config.into())?;

        Ok(SqsConsumer {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }

    /// The effective configuration, defaults applied.
    pub fn config(&self) -> &SqsConsumerConfig {
        &self.config
    }

    /// Runs `concurrency` workers until `shutdown` is cancelled, Ctrl+C is
    /// received, or a worker fails.
    ///
    /// Returns once every worker has stopped. The result is the first worker
    /// error, if any; errors from workers that fail while the pool is already
    /// stopping are discarded.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use rs_sqs_consumer::consumer::{DeleteStrategy, SqsConsumer, SqsConsumerConfig};
    /// use rs_sqs_consumer::errors::SqsConsumerError;
    /// use rs_sqs_consumer::message::MessageAttributes;
    /// use tokio_util::sync::CancellationToken;
    ///
    /// async fn handle(body: Vec<u8>, _: MessageAttributes) -> Result<(), SqsConsumerError> {
    ///     println!("{}", String::from_utf8_lossy(&body));
    ///     Ok(())
    /// }
    ///
    /// # async fn run() -> Result<(), SqsConsumerError> {
    /// let config = SqsConsumerConfig::new("https://sqs.us-east-1.amazonaws.com/123456789012/jobs")
    ///     .delete_strategy(DeleteStrategy::OnSuccess);
    /// let consumer = SqsConsumer::from_env(config)?;
    ///
    /// consumer.start(CancellationToken::new(), handle).await
    /// # }
    /// ```
    pub async fn start<H>(
        &self,
        shutdown: CancellationToken,
        handler: H,
    ) -> Result<(), SqsConsumerError>
    where
        H: MessageHandler + 'static,
    {
        let token = shutdown.child_token();
        // Ends the interrupt observer even when this future is dropped early.
        let _stop_observer = token.clone().drop_guard();
        tokio::spawn(cancel_on_interrupt(token.clone(), tokio::signal::ctrl_c()));
        let handler = Arc::new(handler);

        info!(
            queue = %self.config.queue,
            concurrency = self.config.concurrency,
            delete_strategy = ?self.config.delete_strategy,
            "starting consumer"
        );

        let mut workers = JoinSet::new();
        for id in 0..self.config.concurrency {
            let worker = Worker::new(
                id,
                self.config.clone(),
                self.transport.clone(),
                handler.clone(),
                token.clone(),
            );
            workers.spawn(worker.run());
        }

        let mut first_error = None;
        while let Some(joined) = workers.join_next().await {
            let result = joined
                .unwrap_or_else(|e| Err(SqsConsumerError::WorkerFailed(e.to_string())));

            if let Err(e) = result {
                token.cancel();

                if first_error.is_none() {
                    error!(queue = %self.config.queue, error = %e, "worker failed, stopping consumer");
                    first_error = Some(e);
                } else {
                    debug!(error = %e, "discarding error from stopping worker");
                }
            }
        }

        info!(queue = %self.config.queue, "consumer stopped");

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn validate(config: Option<SqsConsumerConfig>) -> Result<SqsConsumerConfig, SqsConsumerError> {
    config.ok_or(SqsConsumerError::ConfigIsNil)?.validated()
}

async fn cancel_on_interrupt<S>(token: CancellationToken, interrupt: S)
where
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = interrupt => {
            match result {
                Ok(()) => {
                    info!("interrupt received, stopping consumer");
                    token.cancel();
                }
                Err(e) => warn!(error = %e, "failed to listen for interrupt"),
            }
        }
        _ = token.cancelled() => {}
    }
}
