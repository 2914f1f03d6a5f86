use aws_config::Region;
use aws_sdk_sqs::config::{BehaviorVersion, SharedCredentialsProvider};

use crate::errors::SqsConsumerError;

/// Environment variable holding the AWS access key id.
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the AWS secret access key.
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding the AWS region.
pub const REGION_VAR: &str = "AWS_REGION";

/// Creates an AWS SQS client using the default AWS provider chain.
///
/// Credentials and region are resolved the usual way (environment variables,
/// `AWS_PROFILE`, instance metadata, ...). Nothing is validated up front.
pub async fn create_sqs_client_from_env() -> aws_sdk_sqs::Client {
    let config = aws_config::load_from_env().await;
    aws_sdk_sqs::Client::new(&config)
}

/// Creates an AWS SQS client from static credentials found in the environment.
///
/// `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_REGION` must all be
/// set and non-empty.
///
/// # Errors
///
/// Returns [`SqsConsumerError::InitializationError`] naming the first missing
/// variable.
///
/// # Example
///
/// ```rust,no_run
/// use rs_sqs_consumer::client::create_sqs_client_from_env_vars;
///
/// let client = create_sqs_client_from_env_vars().expect("AWS environment is not set");
/// ```
pub fn create_sqs_client_from_env_vars() -> Result<aws_sdk_sqs::Client, SqsConsumerError> {
    let access_key_id = required_env(ACCESS_KEY_ID_VAR)?;
    let secret_access_key = required_env(SECRET_ACCESS_KEY_VAR)?;
    let region = required_env(REGION_VAR)?;

    Ok(create_sqs_client_with_credentials(
        &access_key_id,
        &secret_access_key,
        &region,
    ))
}

/// Creates an AWS SQS client with explicitly provided credentials and region.
///
/// # Arguments
///
/// * `access_key_id` - The AWS access key ID
/// * `secret_access_key` - The AWS secret access key
/// * `region` - The AWS region (e.g., "us-east-1", "eu-west-1")
pub fn create_sqs_client_with_credentials(
    access_key_id: &str,
    secret_access_key: &str,
    region: &str,
) -> aws_sdk_sqs::Client {
    let credentials = aws_sdk_sqs::config::Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "rs-sqs-consumer",
    );

    let config = aws_sdk_sqs::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(SharedCredentialsProvider::new(credentials))
        .build();

    aws_sdk_sqs::Client::from_conf(config)
}

fn required_env(name: &str) -> Result<String, SqsConsumerError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(SqsConsumerError::InitializationError(format!(
            "{name} is not set"
        ))),
    }
}
