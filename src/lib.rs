//! Short-lived, scoped Vercel API tokens issued and revoked on behalf of a secret-management
//! host that owns leasing, expiry, and persistence.

#![deny(clippy::all, missing_docs)]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod auth;
pub mod backend;
pub mod build_info;
pub mod config;
pub mod error;
#[cfg(feature = "reqwest")] pub mod http;
pub mod issue;
pub mod obs;
pub mod revoke;
pub mod store;
pub mod ttl;
pub mod upstream;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		backend::Backend,
		build_info::BuildInfo,
		http::{DEFAULT_TIMEOUT, JsonHttpClient},
		store::{MemoryStorage, Storage},
		upstream::{MemoryUpstream, ReqwestConnector, UpstreamConnector},
	};

	/// Builds a reqwest client that trusts the self-signed certificate of `httpmock`'s HTTPS
	/// server.
	pub fn test_reqwest_http_client() -> JsonHttpClient {
		let client = ReqwestClient::builder()
			.timeout(DEFAULT_TIMEOUT)
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		JsonHttpClient::with_client(client)
	}

	/// Build metadata fixture shared by integration tests.
	pub fn test_build_info() -> BuildInfo {
		BuildInfo {
			build_date: "2025-11-10T12:00:00Z".into(),
			build_version: "0.0.1".into(),
			build_commit: "xyz".into(),
			build_commit_date: "2025-11-09T08:30:00Z".into(),
			build_commit_branch: "main".into(),
			build_tag: "v0.0.1".into(),
			build_dirty: "false".into(),
		}
	}

	/// Constructs a [`Backend`] backed by in-memory storage and the reqwest transport, so tests
	/// can point the configured base URL at an `httpmock` server.
	pub fn build_reqwest_test_backend() -> (Backend, Arc<MemoryStorage>) {
		let storage_backend = Arc::new(MemoryStorage::default());
		let storage: Arc<dyn Storage> = storage_backend.clone();
		let connector: Arc<dyn UpstreamConnector> =
			Arc::new(ReqwestConnector::with_http_client(test_reqwest_http_client()));
		let backend = Backend::new(storage, connector).with_build_info(test_build_info());

		(backend, storage_backend)
	}

	/// Constructs a [`Backend`] whose upstream is the in-process [`MemoryUpstream`] fake.
	pub fn build_memory_test_backend() -> (Backend, Arc<MemoryStorage>, Arc<MemoryUpstream>) {
		let storage_backend = Arc::new(MemoryStorage::default());
		let storage: Arc<dyn Storage> = storage_backend.clone();
		let upstream = Arc::new(MemoryUpstream::default());
		let connector: Arc<dyn UpstreamConnector> = upstream.clone();
		let backend = Backend::new(storage, connector).with_build_info(test_build_info());

		(backend, storage_backend, upstream)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
