//! Optional observability helpers for backend operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `vercel_token_backend.operation` with the
//!   `operation` and `stage` (call site) fields, plus `info`/`error` events for issuance and
//!   environment failures.
//! - Enable `metrics` to increment the `vercel_token_backend_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Host-facing operations observed by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Configuration write.
	Configure,
	/// Configuration removal.
	DeleteConfig,
	/// Token issuance.
	Issue,
	/// Token revocation.
	Revoke,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Configure => "configure",
			OperationKind::DeleteConfig => "delete_config",
			OperationKind::Issue => "issue",
			OperationKind::Revoke => "revoke",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a backend operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the host.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span and records attempt plus final outcome.
///
/// Environment failures are logged at error severity before the result is returned.
pub async fn observe<T, Fut>(kind: OperationKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind, stage);

	record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_operation_outcome(kind, OperationOutcome::Success),
		Err(e) => {
			if e.is_environment_failure() {
				log_environment_failure(kind, e);
			}

			record_operation_outcome(kind, OperationOutcome::Failure);
		},
	}

	result
}
