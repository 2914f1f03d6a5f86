use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::{DeleteMessageBatchRequestEntry, MessageSystemAttributeName};
use tracing::warn;

use crate::errors::SqsConsumerError;
use crate::message::{AckEntry, Message};

/// Parameters of a single long-poll receive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveRequest {
    /// The queue URL to poll.
    pub queue: String,

    /// The maximum number of messages to return (1..=10 for SQS).
    pub max_number_of_messages: i32,

    /// Visibility timeout for the received messages, in seconds.
    /// `0` leaves the queue's own default in place.
    pub visibility_timeout: i32,

    /// The wait time for long polling, in seconds.
    pub wait_time_seconds: i32,
}

/// Access to the remote queue used by consumer workers.
///
/// A single transport is shared by every worker of a pool, so implementations
/// must tolerate concurrent calls. Transport errors are fatal for the calling
/// worker; retries, if any, belong to the implementation.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Long-polls the queue, requesting all system and custom attributes.
    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<Message>, SqsConsumerError>;

    /// Deletes up to 10 deliveries in a single call.
    async fn delete_batch(&self, queue: &str, entries: &[AckEntry])
    -> Result<(), SqsConsumerError>;
}

#[async_trait]
impl QueueTransport for aws_sdk_sqs::Client {
    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<Message>, SqsConsumerError> {
        let mut receive_message = self
            .receive_message()
            .queue_url(&request.queue)
            .message_system_attribute_names(MessageSystemAttributeName::All)
            .message_attribute_names("All")
            .max_number_of_messages(request.max_number_of_messages)
            .wait_time_seconds(request.wait_time_seconds);

        if request.visibility_timeout > 0 {
            receive_message = receive_message.visibility_timeout(request.visibility_timeout);
        }

        let output =
            receive_message
                .send()
                .await
                .map_err(|e| SqsConsumerError::ReceiveError {
                    queue: request.queue.clone(),
                    message: DisplayErrorContext(&e).to_string(),
                })?;

        Ok(output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(Message::from)
            .collect())
    }

    async fn delete_batch(
        &self,
        queue: &str,
        entries: &[AckEntry],
    ) -> Result<(), SqsConsumerError> {
        if entries.is_empty() {
            return Ok(());
        }

        let batch = entries
            .iter()
            .map(|entry| {
                DeleteMessageBatchRequestEntry::builder()
                    .id(&entry.id)
                    .receipt_handle(&entry.receipt_handle)
                    .build()
                    .map_err(|e| SqsConsumerError::DeleteError {
                        queue: queue.to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .delete_message_batch()
            .queue_url(queue)
            .set_entries(Some(batch))
            .send()
            .await
            .map_err(|e| SqsConsumerError::DeleteError {
                queue: queue.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        // Failed entries become visible again once their visibility timeout expires.
        for failed in output.failed() {
            warn!(
                queue,
                id = failed.id(),
                code = failed.code(),
                reason = failed.message().unwrap_or_default(),
                "message was not deleted"
            );
        }

        Ok(())
    }
}
