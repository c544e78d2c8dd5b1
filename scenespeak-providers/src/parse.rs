use crate::error::DescribeError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DescribeResponse {
    description: Option<String>,
    error: Option<String>,
}

/// Decodes a 2xx response body from either describe endpoint.
///
/// A service-reported `error` field wins over any `description`; a body that
/// is not the documented JSON shape counts as a service fault, not a
/// transport one.
pub fn parse_describe_response(body: &[u8]) -> Result<String, DescribeError> {
    let resp: DescribeResponse = serde_json::from_slice(body)
        .map_err(|e| DescribeError::Service(format!("malformed service response: {e}")))?;

    if let Some(error) = resp.error {
        return Err(DescribeError::Service(error));
    }

    resp.description
        .ok_or_else(|| DescribeError::Service("response carried no description".into()))
}
