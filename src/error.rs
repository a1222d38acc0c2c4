//! Error taxonomy for the computation engine
//!
//! Three classes of failure, handled differently:
//! - input validity errors: detected by `WorkerRecord::validate` before any
//!   method runs, reported with the offending field and bound
//! - configuration errors: malformed law-change parameter combinations,
//!   rejected at overlay-load time, never mid-calculation
//! - invariant violations: programming errors (calculating an inapplicable
//!   method, unmapped classifications) panic instead of returning `Err`

use thiserror::Error;

/// Library error type
#[derive(Debug, Error)]
pub enum PiaError {
    /// A worker record failed pre-calculation validation
    #[error("invalid input for worker {worker_id}: {field} = {value} ({constraint})")]
    InvalidInput {
        worker_id: u64,
        field: &'static str,
        value: String,
        constraint: &'static str,
    },

    /// A law-change overlay entry carries an unusable parameter combination
    #[error("law-change configuration error for {entry}: {reason}")]
    Config { entry: &'static str, reason: String },

    /// No computation method applies to a primary claim
    #[error("worker {worker_id}: no computation method is applicable")]
    NoMethodApplicable { worker_id: u64 },

    /// Wrapper used by the orchestrator to tag a lower-layer failure with the
    /// record it belongs to, so batch drivers can skip one bad record
    #[error("worker {worker_id}: {source}")]
    Record {
        worker_id: u64,
        #[source]
        source: Box<PiaError>,
    },
}

impl PiaError {
    /// Tag an error with the worker it occurred on (no-op if already tagged)
    pub fn for_worker(self, worker_id: u64) -> Self {
        match self {
            PiaError::Record { .. }
            | PiaError::InvalidInput { .. }
            | PiaError::NoMethodApplicable { .. } => self,
            other => PiaError::Record {
                worker_id,
                source: Box::new(other),
            },
        }
    }
}

/// Convenience alias used throughout the engine
pub type Result<T> = std::result::Result<T, PiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_context() {
        let err = PiaError::InvalidInput {
            worker_id: 42,
            field: "birth_date",
            value: "1890-01-01".to_string(),
            constraint: "must be 1937 or later claim",
        };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("birth_date"));
    }

    #[test]
    fn test_for_worker_wraps_config_errors() {
        let err = PiaError::Config {
            entry: "DecliningPercentages",
            reason: "12 steps exceeds maximum of 10".to_string(),
        };
        let tagged = err.for_worker(7);
        assert!(matches!(tagged, PiaError::Record { worker_id: 7, .. }));
    }
}
