//! Backend-level error types shared across configuration, issuance, and revocation.

// self
use crate::{_prelude::*, auth::IdentifierError, store::StoreError};

/// Backend-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical backend error exposed by public APIs.
///
/// Caller mistakes (missing key, TTL and scope violations) carry no wrapped cause so their
/// message is directly actionable. Environment failures wrap their cause and are logged at
/// error severity by the [`Backend`](crate::backend::Backend) before being returned.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Configuration write did not carry an API key.
	#[error("Missing API key from configuration.")]
	MissingApiKey,
	/// No usable configuration has been stored yet.
	#[error("Backend not configured.")]
	NotConfigured,
	/// Requested TTL is larger than the configured maximum.
	#[error("Given TTL of {requested} exceeds the maximum allowed value of {max}.")]
	TtlExceeded {
		/// TTL requested by the caller.
		requested: Duration,
		/// Configured maximum TTL.
		max: Duration,
	},
	/// Resolved TTL is zero, negative, or cannot be represented as an expiry instant.
	#[error("Invalid TTL of {ttl}.")]
	InvalidTtl {
		/// Offending TTL.
		ttl: Duration,
	},
	/// Caller scope disagrees with the backend default scope.
	#[error("Cannot override the configured scope `{configured}` with `{requested}`.")]
	ScopeConflict {
		/// Scope stored in the backend configuration.
		configured: String,
		/// Scope supplied by the caller.
		requested: String,
	},
	/// Configured base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Caller-supplied identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// Host storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		StoreError,
	),
	/// Stored configuration bytes are not a valid configuration record.
	#[error("Failed to decode config.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Lease internal data lacks the field needed for revocation.
	#[error("Missing internal data `{field}` from secret.")]
	MissingLeaseData {
		/// Name of the missing field.
		field: &'static str,
	},
	/// Upstream call failed while issuing a token.
	#[error("Upstream call failed.")]
	Upstream(
		#[from]
		#[source]
		UpstreamError,
	),
	/// Upstream delete failed; the lease must stay unrevoked so the host can retry.
	#[error("Failed to revoke token `{token_id}`.")]
	RevocationFailed {
		/// Upstream identifier of the token that could not be deleted.
		token_id: String,
		/// Upstream failure.
		#[source]
		source: UpstreamError,
	},
}
impl Error {
	/// Returns `true` for failures caused by the environment (storage, upstream) rather than by
	/// the caller.
	pub fn is_environment_failure(&self) -> bool {
		matches!(
			self,
			Self::Storage(_) | Self::Decode { .. } | Self::Upstream(_) | Self::RevocationFailed { .. }
		)
	}
}

/// Failures produced by an [`UpstreamClient`](crate::upstream::UpstreamClient).
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Upstream answered with a status outside `[200, 300)`.
	#[error("HTTP error {status} with response body '{body}'.")]
	HttpStatus {
		/// HTTP status code.
		status: u16,
		/// Raw response body, lossily decoded as UTF-8.
		body: String,
	},
	/// Network failure (DNS, TCP, TLS, timeout).
	#[error("Network error occurred while calling the upstream API.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request body could not be encoded.
	#[error("Failed to encode the upstream request body.")]
	Encode {
		/// Serializer failure.
		#[source]
		source: serde_json::Error,
	},
	/// Upstream created a token whose identifier cannot be used for revocation.
	///
	/// The token is live upstream and must be removed by hand.
	#[error("Upstream returned unusable token id `{id}`; the token must be revoked manually.")]
	UnusableTokenId {
		/// Raw identifier returned by upstream.
		id: String,
		/// Validation failure.
		#[source]
		source: IdentifierError,
	},
	/// Response body could not be parsed.
	#[error("Upstream API returned a malformed response.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	ClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint URL cannot be derived from the configured base URL.
	#[error("Cannot derive an endpoint from `{url}`.")]
	InvalidEndpoint {
		/// Offending base URL.
		url: String,
	},
}
impl UpstreamError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Wraps a transport's builder failure.
	pub fn client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::ClientBuild { source: Box::new(src) }
	}

	/// Returns the HTTP status when the upstream answered with an error status.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::HttpStatus { status, .. } => Some(*status),
			_ => None,
		}
	}
}
