//! Storage contracts and built-in TTL-enforcing stores for cached access tokens.

pub mod file;
pub mod memory;
#[cfg(feature = "redis")] pub mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "redis")] pub use self::redis::RedisStore;

// self
use crate::{
	_prelude::*,
	auth::{AppId, KEY_SEPARATOR, MemberCode, TokenSecret},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// External cache backend holding access tokens until their TTL elapses.
///
/// Implementations own expiry: [`fetch`](TokenStore::fetch) must never return an entry whose
/// [`CachedToken::expires_at`] is at or before the current instant. Stores may be shared by many
/// clients and processes, so writes are last-write-wins.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Fetches the live token for `key`, if any.
	fn fetch<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, Option<CachedToken>>;

	/// Persists or replaces the token for `key`.
	fn save(&self, key: CacheKey, token: CachedToken) -> StoreFuture<'_, ()>;

	/// Drops the token for `key`; missing entries are not an error.
	fn remove<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
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

/// Cache slot identifying one member/app pair within a namespace.
///
/// Renders as `<namespace>_<member>:<app>`. Identifiers cannot contain `:`, so distinct pairs
/// never share a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CacheKey(String);
impl CacheKey {
	/// Namespace used when none is configured.
	pub const DEFAULT_NAMESPACE: &'static str = "FeyinSdkAccessToken";

	/// Builds the key for `member` and `app` under `namespace`.
	pub fn new(namespace: &str, member: &MemberCode, app: &AppId) -> Self {
		Self(format!("{namespace}_{member}{KEY_SEPARATOR}{app}"))
	}

	/// Returns the rendered key.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl From<CacheKey> for String {
	fn from(value: CacheKey) -> Self {
		value.0
	}
}
impl TryFrom<String> for CacheKey {
	type Error = StoreError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		if value.contains(KEY_SEPARATOR) {
			Ok(Self(value))
		} else {
			Err(StoreError::Serialization { message: format!("`{value}` is not a cache key") })
		}
	}
}

/// Token snapshot written on a cache miss and read back on hits. Never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
	/// Access token value.
	pub token: TokenSecret,
	/// Instant the token was issued.
	#[serde(with = "time::serde::rfc3339")]
	pub issued_at: OffsetDateTime,
	/// Lifetime declared by the API, in seconds.
	pub ttl_seconds: i64,
}
impl CachedToken {
	/// Creates a snapshot for a token issued at `issued_at`.
	pub fn new(token: TokenSecret, issued_at: OffsetDateTime, ttl_seconds: i64) -> Self {
		Self { token, issued_at, ttl_seconds }
	}

	/// Instant after which stores must stop returning the token.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.issued_at.saturating_add(Duration::seconds(self.ttl_seconds))
	}

	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn key(member: &str, app: &str) -> CacheKey {
		CacheKey::new(
			CacheKey::DEFAULT_NAMESPACE,
			&MemberCode::new(member).expect("Member fixture should be valid."),
			&AppId::new(app).expect("App fixture should be valid."),
		)
	}

	#[test]
	fn cache_key_renders_namespace_member_and_app() {
		assert_eq!(key("m-1", "app-9").as_str(), "FeyinSdkAccessToken_m-1:app-9");
	}

	#[test]
	fn cache_keys_do_not_collide_on_concatenation() {
		assert_ne!(key("ab", "c"), key("a", "bc"));
	}

	#[test]
	fn cached_token_expiry_is_inclusive() {
		let issued = macros::datetime!(2025-11-10 12:00 UTC);
		let token = CachedToken::new(TokenSecret::new("tok"), issued, 7200);

		assert_eq!(token.expires_at(), macros::datetime!(2025-11-10 14:00 UTC));
		assert!(!token.is_expired_at(macros::datetime!(2025-11-10 13:59:59 UTC)));
		assert!(token.is_expired_at(macros::datetime!(2025-11-10 14:00 UTC)));
	}

	#[test]
	fn store_error_displays_message() {
		let err = StoreError::Backend { message: "cache unreachable".into() };

		assert_eq!(err.to_string(), "Backend failure: cache unreachable.");
	}

	#[test]
	fn cache_key_serializes_as_a_string() {
		let payload = serde_json::to_string(&key("m", "a")).expect("Key should serialize.");

		assert_eq!(payload, "\"FeyinSdkAccessToken_m:a\"");

		let round_trip: CacheKey =
			serde_json::from_str(&payload).expect("Serialized key should deserialize.");

		assert_eq!(round_trip, key("m", "a"));
		assert!(serde_json::from_str::<CacheKey>("\"no-separator\"").is_err());
	}
}
