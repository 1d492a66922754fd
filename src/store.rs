//! Host key-value storage contract and the built-in in-memory implementation.

pub mod memory;

pub use memory::MemoryStorage;

// self
use crate::_prelude::*;

/// Boxed future returned by [`Storage`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key-value storage provided by the host.
///
/// Single-key reads, writes, and deletes are expected to be atomic; the backend relies on the
/// host for serialisation between concurrent callers.
pub trait Storage
where
	Self: Send + Sync,
{
	/// Fetches the raw bytes stored under `key`, if present.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Vec<u8>>>;

	/// Persists or replaces the bytes stored under `key`.
	fn put<'a>(&'a self, key: &'a str, value: Vec<u8>) -> StoreFuture<'a, ()>;

	/// Removes `key`; deleting a missing key is not an error.
	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`Storage`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced while encoding a record.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
impl StoreError {
	/// Builds a [`StoreError::Backend`] from any displayable cause.
	pub fn backend(message: impl Display) -> Self {
		Self::Backend { message: message.to_string() }
	}
}
