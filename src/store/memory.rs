//! Thread-safe in-memory [`Storage`] implementation for local development and tests.

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{
	_prelude::*,
	store::{Storage, StoreError, StoreFuture},
};

type EntryMap = RwLock<HashMap<String, Vec<u8>>>;

/// Storage backend that keeps entries in-process.
///
/// Each operation can be switched to fail so callers can exercise host storage outages.
#[derive(Debug, Default)]
pub struct MemoryStorage {
	entries: EntryMap,
	fail_get: AtomicBool,
	fail_put: AtomicBool,
	fail_delete: AtomicBool,
}
impl MemoryStorage {
	/// Makes every subsequent `get` fail when `fail` is true.
	pub fn fail_get(&self, fail: bool) {
		self.fail_get.store(fail, Ordering::SeqCst);
	}

	/// Makes every subsequent `put` fail when `fail` is true.
	pub fn fail_put(&self, fail: bool) {
		self.fail_put.store(fail, Ordering::SeqCst);
	}

	/// Makes every subsequent `delete` fail when `fail` is true.
	pub fn fail_delete(&self, fail: bool) {
		self.fail_delete.store(fail, Ordering::SeqCst);
	}

	/// Returns `true` when `key` currently holds a value.
	pub fn contains(&self, key: &str) -> bool {
		self.entries.read().contains_key(key)
	}

	/// Returns a copy of the raw bytes under `key`, bypassing failure injection.
	pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
		self.entries.read().get(key).cloned()
	}

	fn check(flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
		if flag.load(Ordering::SeqCst) {
			return Err(StoreError::backend(format_args!("injected {op} failure")));
		}

		Ok(())
	}
}
impl Storage for MemoryStorage {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<Vec<u8>>> {
		Box::pin(async move {
			Self::check(&self.fail_get, "get")?;

			Ok(self.entries.read().get(key).cloned())
		})
	}

	fn put<'a>(&'a self, key: &'a str, value: Vec<u8>) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			Self::check(&self.fail_put, "put")?;
			self.entries.write().insert(key.to_owned(), value);

			Ok(())
		})
	}

	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			Self::check(&self.fail_delete, "delete")?;
			self.entries.write().remove(key);

			Ok(())
		})
	}
}
