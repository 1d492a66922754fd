//! Authenticated JSON-over-HTTPS transport shared by every upstream client.
//!
//! [`JsonHttpClient`] wraps a single [`ReqwestClient`] whose timeout is fixed when it is built.
//! Clones share the underlying connection pool, so one instance can back any number of
//! per-configuration [`ApiClient`](crate::upstream::ApiClient)s.

// std
use std::time::Duration as StdDuration;
// crates.io
use reqwest::{Method, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
// self
use crate::{_prelude::*, auth::Secret, error::UpstreamError};

/// Transport timeout applied when no explicit value is supplied.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(60);

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug)]
pub struct JsonHttpClient(ReqwestClient);
impl JsonHttpClient {
	/// Builds a client using [`DEFAULT_TIMEOUT`].
	pub fn new() -> Result<Self, UpstreamError> {
		Self::with_timeout(DEFAULT_TIMEOUT)
	}

	/// Builds a client whose requests abort after `timeout`.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, UpstreamError> {
		ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map(Self)
			.map_err(UpstreamError::client_build)
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Sends a JSON request authenticated with `bearer` and decodes a JSON response.
	///
	/// Statuses outside `[200, 300)` surface as [`UpstreamError::HttpStatus`] carrying the raw
	/// body. Dropping the returned future aborts the request.
	pub async fn send<T>(
		&self,
		method: Method,
		url: Url,
		bearer: &Secret,
		body: Option<Vec<u8>>,
	) -> Result<T, UpstreamError>
	where
		T: DeserializeOwned,
	{
		let mut request = self
			.0
			.request(method.clone(), url.clone())
			.bearer_auth(bearer.expose())
			.header(CONTENT_TYPE, "application/json");

		if let Some(body) = body {
			request = request.body(body);
		}

		let response = request.send().await.map_err(UpstreamError::transport)?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(UpstreamError::transport)?;

		#[cfg(feature = "tracing")]
		tracing::debug!(
			%method,
			path = url.path(),
			status = status.as_u16(),
			"upstream call finished"
		);
		#[cfg(not(feature = "tracing"))]
		let _ = (method, url);

		if !status.is_success() {
			return Err(UpstreamError::HttpStatus {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&bytes).into_owned(),
			});
		}

		decode(&bytes)
	}
}

/// Encodes a request body as JSON.
pub fn encode<T>(body: &T) -> Result<Vec<u8>, UpstreamError>
where
	T: ?Sized + Serialize,
{
	serde_json::to_vec(body).map_err(|source| UpstreamError::Encode { source })
}

fn decode<T>(bytes: &[u8]) -> Result<T, UpstreamError>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut de).map_err(|source| UpstreamError::Decode { source })
}
