//! In-process [`UpstreamClient`] used by tests and local demos instead of the real API.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenId},
	error::UpstreamError,
	upstream::{
		CreateTokenRequest, CreatedToken, UpstreamClient, UpstreamConnector, UpstreamFuture,
		UpstreamSettings,
	},
};

#[derive(Debug, Default)]
struct State {
	sequence: AtomicU64,
	live: RwLock<HashMap<TokenId, CreateTokenRequest>>,
	created: Mutex<Vec<CreateTokenRequest>>,
	deleted: Mutex<Vec<TokenId>>,
	connections: Mutex<Vec<UpstreamSettings>>,
	create_failure: Mutex<Option<u16>>,
	delete_failure: Mutex<Option<u16>>,
}

/// Upstream fake that keeps issued tokens in memory.
///
/// Clones share state, so a test can keep one handle for assertions while the backend connects
/// through another. Deleting an unknown token succeeds, mirroring an upstream that treats
/// repeated deletes as benign.
#[derive(Clone, Debug, Default)]
pub struct MemoryUpstream(Arc<State>);
impl MemoryUpstream {
	/// Makes subsequent creates fail with the given HTTP status, or succeed again with `None`.
	pub fn fail_create_with(&self, status: Option<u16>) {
		*self.0.create_failure.lock() = status;
	}

	/// Makes subsequent deletes fail with the given HTTP status, or succeed again with `None`.
	pub fn fail_delete_with(&self, status: Option<u16>) {
		*self.0.delete_failure.lock() = status;
	}

	/// Returns `true` while the token exists upstream.
	pub fn is_live(&self, id: &TokenId) -> bool {
		self.0.live.read().contains_key(id)
	}

	/// Number of tokens currently alive.
	pub fn live_count(&self) -> usize {
		self.0.live.read().len()
	}

	/// Every create request received, in order.
	pub fn created(&self) -> Vec<CreateTokenRequest> {
		self.0.created.lock().clone()
	}

	/// Every identifier a delete was attempted for, in order.
	pub fn deleted(&self) -> Vec<TokenId> {
		self.0.deleted.lock().clone()
	}

	/// Every settings value the connector was asked to connect with, in order.
	pub fn connections(&self) -> Vec<UpstreamSettings> {
		self.0.connections.lock().clone()
	}

	fn failure(slot: &Mutex<Option<u16>>) -> Result<(), UpstreamError> {
		match *slot.lock() {
			Some(status) => Err(UpstreamError::HttpStatus { status, body: "injected failure".into() }),
			None => Ok(()),
		}
	}

	fn create_now(&self, request: &CreateTokenRequest) -> Result<CreatedToken, UpstreamError> {
		self.0.created.lock().push(request.clone());

		Self::failure(&self.0.create_failure)?;

		let n = self.0.sequence.fetch_add(1, Ordering::SeqCst) + 1;
		let raw = format!("tok_{n}");
		let id = TokenId::new(&raw)
			.map_err(|source| UpstreamError::UnusableTokenId { id: raw.clone(), source })?;

		self.0.live.write().insert(id.clone(), request.clone());

		Ok(CreatedToken { id, bearer_token: Secret::new(format!("bearer-{n}")) })
	}

	fn delete_now(&self, id: &TokenId) -> Result<TokenId, UpstreamError> {
		self.0.deleted.lock().push(id.clone());

		Self::failure(&self.0.delete_failure)?;
		self.0.live.write().remove(id);

		Ok(id.clone())
	}
}
impl UpstreamClient for MemoryUpstream {
	fn create_token<'a>(
		&'a self,
		request: &'a CreateTokenRequest,
	) -> UpstreamFuture<'a, CreatedToken> {
		Box::pin(async move { self.create_now(request) })
	}

	fn delete_token<'a>(&'a self, id: &'a TokenId) -> UpstreamFuture<'a, TokenId> {
		Box::pin(async move { self.delete_now(id) })
	}
}
impl UpstreamConnector for MemoryUpstream {
	fn connect(
		&self,
		settings: &UpstreamSettings,
	) -> Result<Arc<dyn UpstreamClient>, UpstreamError> {
		self.0.connections.lock().push(settings.clone());

		Ok(Arc::new(self.clone()))
	}
}
