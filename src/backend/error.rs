use thiserror::Error;

/// Failure classes for a single backend call.
///
/// The `Display` output is technical and meant for logs only. Callers of the
/// tools see the rendering produced by the gateway instead.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached, or did not answer in time.
    #[error("backend unreachable: {detail}")]
    Unreachable {
        detail: String,
        /// Set when the bounded wait elapsed rather than the connection failing.
        timed_out: bool,
    },

    /// The backend refused the request as invalid.
    #[error("backend rejected request (status {status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// Server-side failure, or a success response the bridge cannot use.
    #[error("backend fault: {0}")]
    BackendFault(String),
}

impl BackendError {
    /// Short label used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable {
                timed_out: true, ..
            } => "timeout",
            Self::Unreachable { .. } => "unreachable",
            Self::Rejected { .. } => "rejected",
            Self::BackendFault(_) => "backend_fault",
        }
    }

    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        Self::Unreachable {
            detail: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_distinguishes_timeouts() {
        let timeout = BackendError::Unreachable {
            detail: "operation timed out".into(),
            timed_out: true,
        };
        let refused = BackendError::Unreachable {
            detail: "connection refused".into(),
            timed_out: false,
        };
        assert_eq!(timeout.kind(), "timeout");
        assert_eq!(refused.kind(), "unreachable");
    }

    #[test]
    fn display_keeps_detail_for_logs() {
        let err = BackendError::Rejected {
            status: 422,
            detail: "text must not be empty".into(),
        };
        assert_eq!(
            err.to_string(),
            "backend rejected request (status 422): text must not be empty"
        );
        assert_eq!(err.kind(), "rejected");
    }
}
