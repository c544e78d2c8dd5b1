/// The three transport-level failure kinds are deliberately distinct: an
/// unreachable host, a non-2xx status, and an error the service reported in
/// an otherwise well-formed response each drive different user feedback.
#[derive(Debug, thiserror::Error)]
pub enum DescribeError {
    #[error("network request failed: {0}")]
    Network(String),

    #[error("HTTP error: status {0}")]
    Http(u16),

    #[error("{0}")]
    Service(String),

    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

impl DescribeError {
    /// Connectivity failures get a spoken hint on top of the transcript entry.
    pub fn is_network(&self) -> bool {
        matches!(self, DescribeError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_displays_bare_message() {
        let e = DescribeError::Service("unsupported format".into());
        assert_eq!(e.to_string(), "unsupported format");
    }

    #[test]
    fn only_network_is_network() {
        assert!(DescribeError::Network("refused".into()).is_network());
        assert!(!DescribeError::Http(502).is_network());
        assert!(!DescribeError::Service("x".into()).is_network());
    }
}
