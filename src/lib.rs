//! # AWS SQS Consumer
//!
//! A concurrent consumer runtime for AWS SQS: a pool of workers long-polls a
//! queue, hands every message to a user-supplied handler and deletes messages
//! according to a [`DeleteStrategy`](consumer::DeleteStrategy).
//!
//! ## Features
//!
//! - Configurable number of concurrent workers on tokio
//! - Trait-based handlers, implemented for plain async closures
//! - `Immediate` (at-most-once) or `OnSuccess` (at-least-once) deletion
//! - Batched deletes within the SQS limit of 10 entries per call
//! - Graceful shutdown on Ctrl+C, on a caller-supplied cancellation token, or
//!   when any worker fails
//! - Continue-on-error semantics for handler failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rs_sqs_consumer::consumer::{SqsConsumer, SqsConsumerConfig};
//! use rs_sqs_consumer::errors::SqsConsumerError;
//! use rs_sqs_consumer::message::MessageAttributes;
//! use tokio_util::sync::CancellationToken;
//!
//! async fn print_body(body: Vec<u8>, _: MessageAttributes) -> Result<(), SqsConsumerError> {
//!     println!("Processing message: {}", String::from_utf8_lossy(&body));
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SqsConsumerConfig::new("https://sqs.region.amazonaws.com/account/queue-name")
//!         .concurrency(4);
//!     let consumer = SqsConsumer::from_env(config)?;
//!
//!     consumer.start(CancellationToken::new(), print_body).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod consumer;
pub mod errors;
pub mod message;
pub mod transport;
