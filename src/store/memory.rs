//! Thread-safe in-memory [`TokenStore`] for single-process deployments and tests.

// self
use crate::{
	_prelude::*,
	store::{CacheKey, CachedToken, StoreError, StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<CacheKey, CachedToken>>>;

/// Process-local token store; expired entries are evicted when read.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of entries currently held, including ones not yet evicted.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when the store holds no entries.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn save_now(map: StoreMap, key: CacheKey, token: CachedToken) -> Result<(), StoreError> {
		map.write().insert(key, token);

		Ok(())
	}

	fn fetch_now(map: StoreMap, key: CacheKey, now: OffsetDateTime) -> Option<CachedToken> {
		{
			let guard = map.read();

			match guard.get(&key) {
				Some(token) if !token.is_expired_at(now) => return Some(token.clone()),
				Some(_) => {},
				None => return None,
			}
		}

		let mut guard = map.write();

		// Re-check under the write lock; a concurrent save may have replaced the entry.
		if guard.get(&key).is_some_and(|token| token.is_expired_at(now)) {
			guard.remove(&key);
		}

		guard.get(&key).cloned()
	}

	fn remove_now(map: StoreMap, key: CacheKey) {
		map.write().remove(&key);
	}
}
impl TokenStore for MemoryStore {
	fn fetch<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, Option<CachedToken>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::fetch_now(map, key, OffsetDateTime::now_utc())) })
	}

	fn save(&self, key: CacheKey, token: CachedToken) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::save_now(map, key, token) })
	}

	fn remove<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move {
			Self::remove_now(map, key);

			Ok(())
		})
	}
}
