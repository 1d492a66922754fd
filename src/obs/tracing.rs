// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by backend operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("vercel_token_backend.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs the generated upstream name and effective TTL of a token about to be created.
pub fn log_token_creation(name: &str, ttl: Duration) {
	#[cfg(feature = "tracing")]
	tracing::info!(token_name = name, ttl_secs = ttl.whole_seconds(), "creating upstream token");
	#[cfg(not(feature = "tracing"))]
	let _ = (name, ttl);
}

/// Logs the raw identifier of a token created upstream that cannot be tracked by a lease.
pub fn log_unusable_token_id(id: &str) {
	#[cfg(feature = "tracing")]
	tracing::error!(token_id = id, "upstream token id is unusable; revoke it manually");
	#[cfg(not(feature = "tracing"))]
	let _ = id;
}

/// Logs an environment failure (storage or upstream) at error severity.
pub fn log_environment_failure(kind: OperationKind, error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::error!(operation = kind.as_str(), error = %error, "operation failed");
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, error);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn logging_helpers_accept_any_subscriber_state() {
		log_token_creation("vercel-token-backend-1", Duration::seconds(60));
		log_unusable_token_id("tok/1");
		log_environment_failure(OperationKind::Revoke, &Error::NotConfigured);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(OperationKind::Issue, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
