use crate::errors::SqsConsumerError;
use crate::message::MessageAttributes;
use async_trait::async_trait;
use std::future::Future;

/// Trait for processing messages pulled from the queue.
///
/// A single handler is shared by every worker of a consumer, so it may be
/// called concurrently, but never twice for the same in-flight delivery.
/// Returning an error does not stop the worker; it only keeps the message
/// from being deleted under [`DeleteStrategy::OnSuccess`].
///
/// Any `Fn(Vec<u8>, MessageAttributes) -> impl Future<Output = Result<(), SqsConsumerError>>`
/// closure is a handler.
///
/// [`DeleteStrategy::OnSuccess`]: crate::consumer::DeleteStrategy::OnSuccess
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(
        &self,
        body: Vec<u8>,
        attributes: MessageAttributes,
    ) -> Result<(), SqsConsumerError>;
}

#[async_trait]
impl<F, Fut> MessageHandler for F
where
    F: Fn(Vec<u8>, MessageAttributes) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SqsConsumerError>> + Send + 'static,
{
    async fn handle(
        &self,
        body: Vec<u8>,
        attributes: MessageAttributes,
    ) -> Result<(), SqsConsumerError> {
        (self)(body, attributes).await
    }
}
