//! reqwest-backed client for the Vercel token endpoints.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenId},
	error::UpstreamError,
	http::{self, JsonHttpClient},
	obs,
	upstream::{
		CreateTokenRequest, CreatedToken, UpstreamClient, UpstreamConnector, UpstreamFuture,
		UpstreamSettings,
	},
};

const TOKENS_PATH: [&str; 2] = ["user", "tokens"];
const SCOPE_QUERY_PARAM: &str = "teamId";

#[derive(Debug, Deserialize)]
struct CreateTokenResponse {
	token: TokenBody,
	#[serde(rename = "bearerToken")]
	bearer_token: Secret,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
	id: String,
}
impl CreateTokenResponse {
	fn into_created(self) -> Result<CreatedToken, UpstreamError> {
		let id = match TokenId::new(&self.token.id) {
			Ok(id) => id,
			Err(source) => {
				obs::log_unusable_token_id(&self.token.id);

				return Err(UpstreamError::UnusableTokenId { id: self.token.id, source });
			},
		};

		Ok(CreatedToken { id, bearer_token: self.bearer_token })
	}
}

#[derive(Debug, Deserialize)]
struct DeleteTokenResponse {
	#[serde(rename = "tokenId")]
	token_id: TokenId,
}

/// Client bound to one API key and base URL.
#[derive(Clone)]
pub struct ApiClient {
	http: JsonHttpClient,
	base_url: Url,
	api_key: Secret,
}
impl ApiClient {
	/// Creates a client for `settings` that dispatches through `http`.
	pub fn new(http: JsonHttpClient, settings: &UpstreamSettings) -> Result<Self, UpstreamError> {
		let base_url = Url::parse(&settings.base_url)
			.ok()
			.filter(|url| !url.cannot_be_a_base())
			.ok_or_else(|| UpstreamError::InvalidEndpoint { url: settings.base_url.clone() })?;

		Ok(Self { http, base_url, api_key: settings.api_key.clone() })
	}

	/// Returns the base URL endpoints are derived from.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn endpoint(&self, extra: Option<&str>) -> Result<Url, UpstreamError> {
		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| UpstreamError::InvalidEndpoint { url: self.base_url.to_string() })?
			.pop_if_empty()
			.extend(TOKENS_PATH)
			.extend(extra);

		Ok(url)
	}
}
impl Debug for ApiClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.base_url.as_str())
			.field("api_key", &"<redacted>")
			.finish()
	}
}
impl UpstreamClient for ApiClient {
	fn create_token<'a>(
		&'a self,
		request: &'a CreateTokenRequest,
	) -> UpstreamFuture<'a, CreatedToken> {
		Box::pin(async move {
			let mut url = self.endpoint(None)?;

			if let Some(scope) = &request.scope {
				url.query_pairs_mut().append_pair(SCOPE_QUERY_PARAM, scope.as_str());
			}

			let body = http::encode(request)?;
			let response: CreateTokenResponse =
				self.http.send(Method::POST, url, &self.api_key, Some(body)).await?;

			response.into_created()
		})
	}

	fn delete_token<'a>(&'a self, id: &'a TokenId) -> UpstreamFuture<'a, TokenId> {
		Box::pin(async move {
			let url = self.endpoint(Some(id.as_str()))?;
			let response: DeleteTokenResponse =
				self.http.send(Method::DELETE, url, &self.api_key, None).await?;

			Ok(response.token_id)
		})
	}
}

/// Production [`UpstreamConnector`] sharing one [`JsonHttpClient`] across every connection.
#[derive(Clone, Debug)]
pub struct ReqwestConnector {
	http: JsonHttpClient,
}
impl ReqwestConnector {
	/// Builds a connector around a fresh client using the default transport timeout.
	pub fn new() -> Result<Self, UpstreamError> {
		JsonHttpClient::new().map(Self::with_http_client)
	}

	/// Reuses a caller-provided transport.
	pub fn with_http_client(http: JsonHttpClient) -> Self {
		Self { http }
	}
}
impl UpstreamConnector for ReqwestConnector {
	fn connect(
		&self,
		settings: &UpstreamSettings,
	) -> Result<Arc<dyn UpstreamClient>, UpstreamError> {
		Ok(Arc::new(ApiClient::new(self.http.clone(), settings)?))
	}
}
