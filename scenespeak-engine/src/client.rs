use crate::traits::DescribeClient;
use async_trait::async_trait;
use scenespeak_core::types::DescribePayload;
use scenespeak_providers::describe::build_describe_request;
use scenespeak_providers::error::DescribeError;
use scenespeak_providers::parse::parse_describe_response;
use scenespeak_providers::runtime;

/// The production describe client: multipart POST over reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpDescribeClient;

impl HttpDescribeClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DescribeClient for HttpDescribeClient {
    async fn describe(
        &self,
        endpoint: &str,
        payload: &DescribePayload,
        prompt: &str,
    ) -> Result<String, DescribeError> {
        let req = build_describe_request(endpoint, payload, prompt)?;
        log::debug!("describe request: {req:?}");

        let resp = runtime::execute(&req).await?;
        if !(200..=299).contains(&resp.status) {
            return Err(DescribeError::Http(resp.status));
        }

        parse_describe_response(&resp.body)
    }
}
