use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::batch::{DELETE_BATCH_SIZE, chunk};
use super::config::{DeleteStrategy, SqsConsumerConfig};
use super::handler::MessageHandler;
use crate::errors::SqsConsumerError;
use crate::message::{AckEntry, Message};
use crate::transport::{QueueTransport, ReceiveRequest};

/// How long a worker waits after an empty poll before polling again.
pub const IDLE_POLL_DELAY: Duration = Duration::from_secs(1);

/// One polling loop of a consumer pool.
///
/// Cancellation is checked before every receive. An in-flight receive or
/// handler call always runs to completion.
pub(crate) struct Worker<T, H> {
    id: usize,
    config: Arc<SqsConsumerConfig>,
    request: ReceiveRequest,
    transport: Arc<T>,
    handler: Arc<H>,
    shutdown_token: CancellationToken,
}

impl<T, H> Worker<T, H>
where
    T: QueueTransport,
    H: MessageHandler,
{
    pub(crate) fn new(
        id: usize,
        config: Arc<SqsConsumerConfig>,
        transport: Arc<T>,
        handler: Arc<H>,
        shutdown_token: CancellationToken,
    ) -> Self {
        let request = ReceiveRequest {
            queue: config.queue.clone(),
            max_number_of_messages: config.max_number_of_messages,
            visibility_timeout: config.visibility_timeout,
            wait_time_seconds: config.wait_time_seconds,
        };

        Worker {
            id,
            config,
            request,
            transport,
            handler,
            shutdown_token,
        }
    }

    /// Runs until the shutdown token is cancelled (`Ok`) or a transport call fails (`Err`).
    pub(crate) async fn run(self) -> Result<(), SqsConsumerError> {
        debug!(worker = self.id, queue = %self.config.queue, "worker started");

        loop {
            if self.shutdown_token.is_cancelled() {
                info!(worker = self.id, "worker received shutdown signal");
                return Ok(());
            }

            let messages = self.transport.receive(&self.request).await?;

            if messages.is_empty() {
                tokio::select! {
                    _ = sleep(IDLE_POLL_DELAY) => {}
                    _ = self.shutdown_token.cancelled() => {}
                }
                continue;
            }

            debug!(worker = self.id, count = messages.len(), "received messages");
            self.process(messages).await?;
        }
    }

    async fn process(&self, messages: Vec<Message>) -> Result<(), SqsConsumerError> {
        let strategy = self.config.delete_strategy;

        if strategy == DeleteStrategy::Immediate {
            let entries: Vec<AckEntry> = messages.iter().map(Message::ack_entry).collect();
            self.delete(&entries).await?;
        }

        let mut succeeded = Vec::with_capacity(messages.len());
        for message in messages {
            let entry = message.ack_entry();

            match self.handler.handle(message.body, message.attributes).await {
                Ok(()) => {
                    if strategy == DeleteStrategy::OnSuccess {
                        succeeded.push(entry);
                    }
                }
                Err(e) => {
                    error!(
                        worker = self.id,
                        message_id = %entry.id,
                        error = %e,
                        "error in message handler"
                    );
                }
            }
        }

        self.delete(&succeeded).await
    }

    async fn delete(&self, entries: &[AckEntry]) -> Result<(), SqsConsumerError> {
        for batch in chunk(entries, DELETE_BATCH_SIZE) {
            self.transport
                .delete_batch(&self.config.queue, batch)
                .await?;
        }

        if !entries.is_empty() {
            debug!(worker = self.id, count = entries.len(), "deleted messages");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageAttributes;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    /// Serves one batch, then cancels the token and returns nothing.
    struct OneBatch {
        batch: Mutex<Option<Vec<Message>>>,
        deleted: Mutex<Vec<Vec<String>>>,
        token: CancellationToken,
    }

    #[async_trait]
    impl QueueTransport for OneBatch {
        async fn receive(&self, _: &ReceiveRequest) -> Result<Vec<Message>, SqsConsumerError> {
            match self.batch.lock().unwrap().take() {
                Some(batch) => Ok(batch),
                None => {
                    self.token.cancel();
                    Ok(Vec::new())
                }
            }
        }

        async fn delete_batch(
            &self,
            _: &str,
            entries: &[AckEntry],
        ) -> Result<(), SqsConsumerError> {
            let ids = entries.iter().map(|e| e.id.clone()).collect();
            self.deleted.lock().unwrap().push(ids);
            Ok(())
        }
    }

    fn message(id: &str) -> Message {
        Message {
            id: id.to_string(),
            body: id.as_bytes().to_vec(),
            receipt_handle: format!("receipt-{id}"),
            ..Default::default()
        }
    }

    async fn run_once(strategy: DeleteStrategy) -> Arc<OneBatch> {
        let token = CancellationToken::new();
        let transport = Arc::new(OneBatch {
            batch: Mutex::new(Some(vec![message("ok"), message("bad")])),
            deleted: Mutex::new(Vec::new()),
            token: token.clone(),
        });
        let config = SqsConsumerConfig::new("queue")
            .delete_strategy(strategy)
            .validated()
            .unwrap();
        let handler = |body: Vec<u8>, _: MessageAttributes| async move {
            if body == b"bad" {
                Err(SqsConsumerError::from("cannot handle bad"))
            } else {
                Ok(())
            }
        };

        let worker = Worker::new(
            0,
            Arc::new(config),
            transport.clone(),
            Arc::new(handler),
            token,
        );
        worker.run().await.unwrap();
        transport
    }

    #[traced_test]
    #[tokio::test(start_paused = true)]
    async fn handler_errors_are_logged_and_skipped() {
        let transport = run_once(DeleteStrategy::OnSuccess).await;

        assert_eq!(*transport.deleted.lock().unwrap(), vec![vec!["ok".to_string()]]);
        assert!(logs_contain("error in message handler"));
        assert!(logs_contain("cannot handle bad"));
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_deletes_the_whole_batch_once() {
        let transport = run_once(DeleteStrategy::Immediate).await;

        assert_eq!(
            *transport.deleted.lock().unwrap(),
            vec![vec!["ok".to_string(), "bad".to_string()]]
        );
    }
}
