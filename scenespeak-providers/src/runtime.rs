use crate::error::DescribeError;
use crate::request::HttpRequest;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Executes a built request over the wire.
///
/// Important: without an explicit timeout, a broken endpoint can hang the
/// session indefinitely while inputs stay disabled.
pub async fn execute(req: &HttpRequest) -> Result<HttpResponse, DescribeError> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| DescribeError::Network(format!("build http client: {e}")))?;

    let mut headers = HeaderMap::new();
    for (k, v) in &req.headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .map_err(|_| DescribeError::Network(format!("invalid header name: {k}")))?;
        let value = HeaderValue::from_str(v)
            .map_err(|_| DescribeError::Network(format!("invalid header value for {k}")))?;
        headers.insert(name, value);
    }

    let builder = match req.method.as_str() {
        "POST" => client.post(&req.url),
        other => {
            return Err(DescribeError::Network(format!(
                "unsupported method: {other}"
            )));
        }
    }
    .headers(headers)
    .body(req.body.bytes.clone());

    let resp = builder
        .send()
        .await
        .map_err(|e| DescribeError::Network(e.to_string()))?;

    let status = resp.status().as_u16();
    let body = resp
        .bytes()
        .await
        .map_err(|e| DescribeError::Network(format!("failed reading response body: {e}")))?
        .to_vec();

    Ok(HttpResponse { status, body })
}
