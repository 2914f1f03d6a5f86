use rs_sqs_consumer::consumer::{DeleteStrategy, SqsConsumer, SqsConsumerConfig};
use rs_sqs_consumer::errors::SqsConsumerError;
use rs_sqs_consumer::message::MessageAttributes;
use rs_sqs_consumer::{client, transport::QueueTransport};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
struct SharedCounter {
    count: Arc<Mutex<i32>>,
}

impl SharedCounter {
    fn new() -> Self {
        Self {
            count: Arc::new(Mutex::new(0)),
        }
    }

    async fn increment(&self) -> i32 {
        let mut count = self.count.lock().await;
        *count += 1;
        *count
    }

    async fn get_count(&self) -> i32 {
        *self.count.lock().await
    }
}

fn test_queue_url() -> String {
    dotenvy::dotenv().ok();
    env::var("TEST_SQS_QUEUE_URL").expect("TEST_SQS_QUEUE_URL must be set")
}

async fn send_messages(sqs_client: &aws_sdk_sqs::Client, queue_url: &str, bodies: &[&str]) {
    for body in bodies {
        sqs_client
            .send_message()
            .queue_url(queue_url)
            .message_body(*body)
            .send()
            .await
            .expect("Failed to send test message");
    }
}

#[tokio::test]
#[ignore = "requires AWS credentials and TEST_SQS_QUEUE_URL"]
async fn test_consume_and_delete_on_success() {
    let queue_url = test_queue_url();
    let sqs_client = client::create_sqs_client_from_env().await;

    send_messages(&sqs_client, &queue_url, &["Test message 1", "Test message 2"]).await;

    let shutdown = CancellationToken::new();
    let counter = SharedCounter::new();

    let handler = {
        let counter = counter.clone();
        let shutdown = shutdown.clone();
        move |body: Vec<u8>, _: MessageAttributes| {
            let counter = counter.clone();
            let shutdown = shutdown.clone();
            async move {
                println!("Received message: {}", String::from_utf8_lossy(&body));
                if counter.increment().await >= 2 {
                    shutdown.cancel();
                }
                Ok::<(), SqsConsumerError>(())
            }
        }
    };

    let config = SqsConsumerConfig::new(&queue_url)
        .concurrency(2)
        .wait_time_seconds(5)
        .delete_strategy(DeleteStrategy::OnSuccess);
    let consumer = SqsConsumer::new(sqs_client.clone(), config).expect("valid configuration");

    let result = timeout(Duration::from_secs(30), consumer.start(shutdown, handler)).await;

    match result {
        Ok(Ok(())) => {
            let final_count = counter.get_count().await;
            println!("Successfully processed {} messages", final_count);
            assert!(final_count >= 2, "Should have processed at least 2 messages");
        }
        Ok(Err(e)) => panic!("Consumer failed: {}", e),
        Err(_) => {
            let final_count = counter.get_count().await;
            panic!("Test timed out. Only processed {} messages", final_count);
        }
    }

    let purge_result = sqs_client.purge_queue().queue_url(&queue_url).send().await;

    if let Err(e) = purge_result {
        println!("Warning: Failed to purge queue: {}", e);
    }
}

#[tokio::test]
#[ignore = "requires AWS credentials and TEST_SQS_QUEUE_URL"]
async fn test_transport_receive_and_delete() {
    let queue_url = test_queue_url();
    let sqs_client = client::create_sqs_client_from_env().await;

    send_messages(&sqs_client, &queue_url, &["Transport test message"]).await;

    let request = rs_sqs_consumer::transport::ReceiveRequest {
        queue: queue_url.clone(),
        max_number_of_messages: 10,
        visibility_timeout: 30,
        wait_time_seconds: 10,
    };
    let messages = sqs_client
        .receive(&request)
        .await
        .expect("Failed to receive messages");

    assert!(!messages.is_empty(), "Should have received the test message");
    assert!(messages.iter().all(|m| !m.receipt_handle.is_empty()));
    assert!(
        messages
            .iter()
            .all(|m| m.system_attributes.contains_key("ApproximateReceiveCount"))
    );

    let entries: Vec<_> = messages.iter().map(|m| m.ack_entry()).collect();
    for batch in rs_sqs_consumer::consumer::chunk(&entries, 10) {
        sqs_client
            .delete_batch(&queue_url, batch)
            .await
            .expect("Failed to delete messages");
    }
}

#[test]
fn test_client_from_env_vars_requires_credentials() {
    // Only meaningful when the variables are absent from the environment.
    if env::var(client::ACCESS_KEY_ID_VAR).is_ok() {
        return;
    }

    let result = client::create_sqs_client_from_env_vars();
    match result {
        Err(SqsConsumerError::InitializationError(message)) => {
            assert!(message.contains(client::ACCESS_KEY_ID_VAR));
        }
        _ => panic!("expected an initialization error"),
    }
}
