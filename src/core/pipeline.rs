use async_trait::async_trait;
use aws_sdk_sfn::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_sfn::error::DisplayErrorContext;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::core::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct AnalysisInput {
    pub(crate) source_bucket: String,
    pub(crate) s3_key: String,
    pub(crate) video_id: Uuid,
    pub(crate) creator_id: Uuid,
}

/// The external video analysis pipeline.
#[async_trait]
pub(crate) trait Pipeline: Send + Sync + std::fmt::Debug {
    /// Starts a single execution and returns its identifier.
    async fn start(&self, name: &str, input: &AnalysisInput) -> Result<String, Error>;
}

#[derive(Clone, Debug)]
pub(crate) struct StepFunctions {
    client: aws_sdk_sfn::Client,
    state_machine_arn: String,
}

impl StepFunctions {
    pub(crate) fn new(
        credentials: Credentials,
        region: &str,
        state_machine_arn: &str,
        endpoint: Option<&str>,
    ) -> Self {
        let mut config = aws_sdk_sfn::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .credentials_provider(credentials);

        if let Some(endpoint) = endpoint {
            config = config.endpoint_url(endpoint);
        }

        Self {
            client: aws_sdk_sfn::Client::from_conf(config.build()),
            state_machine_arn: state_machine_arn.to_owned(),
        }
    }
}

#[async_trait]
impl Pipeline for StepFunctions {
    #[instrument(skip_all, fields(name = %name))]
    async fn start(&self, name: &str, input: &AnalysisInput) -> Result<String, Error> {
        let output = self
            .client
            .start_execution()
            .state_machine_arn(&self.state_machine_arn)
            .name(name)
            .input(serde_json::to_string(input)?)
            .send()
            .await
            .map_err(|e| Error::Pipeline(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!("Started execution {}", output.execution_arn());

        Ok(output.execution_arn().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_serializes_with_pipeline_field_names() {
        let input = AnalysisInput {
            source_bucket: "videos".into(),
            s3_key: "uploads/a/1_b.mp4".into(),
            video_id: Uuid::nil(),
            creator_id: Uuid::nil(),
        };

        let value = serde_json::to_value(&input).unwrap();

        assert_eq!(value["source_bucket"], "videos");
        assert_eq!(value["s3_key"], "uploads/a/1_b.mp4");
        assert_eq!(value["video_id"], Uuid::nil().to_string());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_pipeline_error() {
        let pipeline = StepFunctions::new(
            Credentials::new("AKIDEXAMPLE", "secret", None, None, "test"),
            "us-east-1",
            "arn:aws:states:us-east-1:1:stateMachine:analysis",
            Some("http://127.0.0.1:9"),
        );
        let input = AnalysisInput {
            source_bucket: "videos".into(),
            s3_key: "uploads/a/1_b.mp4".into(),
            video_id: Uuid::nil(),
            creator_id: Uuid::nil(),
        };

        assert!(matches!(
            pipeline.start("analysis-test", &input).await,
            Err(Error::Pipeline(_))
        ));
    }
}
