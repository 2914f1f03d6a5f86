use std::collections::HashMap;

use aws_sdk_sqs::types::MessageAttributeValue;

/// Custom message attributes as delivered by SQS, keyed by attribute name.
pub type MessageAttributes = HashMap<String, MessageAttributeValue>;

/// A message received from the queue.
///
/// Messages are produced by a [`QueueTransport`](crate::transport::QueueTransport)
/// and are never mutated afterwards. The `receipt_handle` is only valid for the
/// delivery that produced it, until its visibility timeout expires.
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// The SQS message id.
    pub id: String,

    /// The raw message body.
    pub body: Vec<u8>,

    /// Custom message attributes.
    pub attributes: MessageAttributes,

    /// System attributes such as `ApproximateReceiveCount` or `SentTimestamp`.
    pub system_attributes: HashMap<String, String>,

    /// Receipt handle required to delete this delivery.
    pub receipt_handle: String,
}

impl Message {
    /// Returns the entry used to acknowledge (delete) this delivery.
    pub fn ack_entry(&self) -> AckEntry {
        AckEntry {
            id: self.id.clone(),
            receipt_handle: self.receipt_handle.clone(),
        }
    }
}

impl From<aws_sdk_sqs::types::Message> for Message {
    fn from(message: aws_sdk_sqs::types::Message) -> Self {
        let system_attributes = message
            .attributes
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name.as_str().to_string(), value))
            .collect();

        Message {
            id: message.message_id.unwrap_or_default(),
            body: message.body.map(String::into_bytes).unwrap_or_default(),
            attributes: message.message_attributes.unwrap_or_default(),
            system_attributes,
            receipt_handle: message.receipt_handle.unwrap_or_default(),
        }
    }
}

/// One `(id, receipt handle)` pair of a delete batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckEntry {
    pub id: String,
    pub receipt_handle: String,
}
