use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum MicError {
    #[error("microphone permission denied")]
    PermissionDenied,
}

#[async_trait]
pub trait MicrophoneGate: Send + Sync {
    /// Whether the platform already holds a grant from an earlier session.
    async fn permission_granted(&self) -> bool;

    /// One-shot acquire-then-release, done solely to raise the platform
    /// permission prompt. The stream is not kept.
    async fn probe(&self) -> Result<(), MicError>;
}

/// Ensures microphone access before voice input is enabled.
///
/// A prior grant short-circuits; otherwise the probe runs once and its
/// outcome decides. No retry on denial.
pub async fn ensure_microphone_access(gate: &dyn MicrophoneGate) -> Result<(), MicError> {
    if gate.permission_granted().await {
        return Ok(());
    }
    gate.probe().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeGate {
        granted: bool,
        deny_probe: bool,
        probes: AtomicUsize,
    }

    #[async_trait]
    impl MicrophoneGate for FakeGate {
        async fn permission_granted(&self) -> bool {
            self.granted
        }

        async fn probe(&self) -> Result<(), MicError> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            if self.deny_probe {
                Err(MicError::PermissionDenied)
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn prior_grant_skips_the_probe() {
        let gate = FakeGate {
            granted: true,
            deny_probe: true,
            probes: AtomicUsize::new(0),
        };
        ensure_microphone_access(&gate).await.unwrap();
        assert_eq!(gate.probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ungranted_probes_exactly_once() {
        let gate = FakeGate {
            granted: false,
            deny_probe: false,
            probes: AtomicUsize::new(0),
        };
        ensure_microphone_access(&gate).await.unwrap();
        assert_eq!(gate.probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn denied_probe_reports_permission_denied() {
        let gate = FakeGate {
            granted: false,
            deny_probe: true,
            probes: AtomicUsize::new(0),
        };
        let err = ensure_microphone_access(&gate).await.unwrap_err();
        assert!(matches!(err, MicError::PermissionDenied));
    }
}
