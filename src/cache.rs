//! Get-or-issue access-token cache over a shared [`TokenStore`].
//!
//! [`TokenCache::get`] reads the store first and only calls the issuer on a miss. The cache is
//! fail-open: store read errors count as misses and store write errors after a successful
//! issuance are logged and swallowed, so the caller still receives the fresh token. No lock is
//! held while the issuer runs; concurrent misses each issue and the last write wins.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	obs::{self, CacheOutcome},
	store::{CacheKey, CachedToken, TokenStore},
};

/// Token and lifetime returned by an issuer callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedToken {
	/// Freshly issued access token.
	pub token: TokenSecret,
	/// Declared lifetime in seconds.
	pub ttl_seconds: i64,
}
impl IssuedToken {
	/// Creates an issuance result.
	pub fn new(token: impl Into<String>, ttl_seconds: i64) -> Self {
		Self { token: TokenSecret::new(token), ttl_seconds }
	}
}

/// Access-token slot for one member/app pair.
#[derive(Clone)]
pub struct TokenCache {
	key: CacheKey,
	store: Option<Arc<dyn TokenStore>>,
}
impl TokenCache {
	/// Creates a cache without a store; every [`get`](Self::get) calls the issuer.
	pub fn new(key: CacheKey) -> Self {
		Self { key, store: None }
	}

	/// Attaches (or replaces) the backing store.
	pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.store = Some(store);

		self
	}

	/// Key under which tokens are cached.
	pub fn key(&self) -> &CacheKey {
		&self.key
	}

	/// Returns `true` when a backing store is configured.
	pub fn has_store(&self) -> bool {
		self.store.is_some()
	}

	/// Returns the cached token, or issues, stores, and returns a new one.
	///
	/// Issuer errors are returned unchanged and leave the store untouched.
	pub async fn get<F, Fut, E>(&self, issuer: F) -> Result<TokenSecret, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<IssuedToken, E>>,
	{
		if let Some(token) = self.lookup().await {
			return Ok(token);
		}

		let issued = match issuer().await {
			Ok(issued) => issued,
			Err(e) => {
				self.record(CacheOutcome::IssueFailed, None);

				return Err(e);
			},
		};

		self.record(CacheOutcome::Issued, None);
		self.write_back(&issued).await;

		Ok(issued.token)
	}

	/// Drops the cached token so the next [`get`](Self::get) issues a new one.
	pub async fn invalidate(&self) {
		let Some(store) = self.store.as_deref() else {
			return;
		};

		if let Err(e) = store.remove(&self.key).await {
			self.record(CacheOutcome::WriteFailed, Some(&e));
		}
	}

	async fn lookup(&self) -> Option<TokenSecret> {
		let store = self.store.as_deref()?;

		match store.fetch(&self.key).await {
			Ok(Some(cached)) if !cached.token.is_empty() => {
				self.record(CacheOutcome::Hit, None);

				Some(cached.token)
			},
			Ok(_) => {
				self.record(CacheOutcome::Miss, None);

				None
			},
			Err(e) => {
				self.record(CacheOutcome::ReadFailed, Some(&e));

				None
			},
		}
	}

	async fn write_back(&self, issued: &IssuedToken) {
		let Some(store) = self.store.as_deref() else {
			return;
		};

		if issued.ttl_seconds <= 0 {
			self.record(CacheOutcome::WriteSkipped, None);

			return;
		}

		let cached =
			CachedToken::new(issued.token.clone(), OffsetDateTime::now_utc(), issued.ttl_seconds);

		if let Err(e) = store.save(self.key.clone(), cached).await {
			self.record(CacheOutcome::WriteFailed, Some(&e));
		}
	}

	fn record(&self, outcome: CacheOutcome, detail: Option<&dyn Display>) {
		obs::log_cache_outcome(&self.key, outcome, detail);
		obs::record_cache_outcome(outcome);
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("key", &self.key)
			.field("store_set", &self.store.is_some())
			.finish()
	}
}
