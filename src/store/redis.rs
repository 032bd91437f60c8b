//! Redis-backed [`TokenStore`] shared by every process pointed at the same server.
//!
//! Tokens are stored as JSON under their [`CacheKey`] with `SET key value EX ttl`, so Redis
//! expires them on its own schedule. The remaining lifetime is recomputed at write time and a
//! token with no time left is never written.

// crates.io
use ::redis::{AsyncCommands, Client as RedisClient, RedisError, aio::ConnectionManager};
// self
use crate::{
	_prelude::*,
	store::{CacheKey, CachedToken, StoreError, StoreFuture, TokenStore},
};

/// The three commands [`RedisStore`] issues, so the store can run over any connection type.
pub trait RedisCommands
where
	Self: Send + Sync,
{
	/// `GET key`; a missing key yields `None`.
	fn get_value(&self, key: String) -> StoreFuture<'_, Option<String>>;

	/// `SET key value EX seconds`.
	fn set_value_ex(&self, key: String, value: String, seconds: u64) -> StoreFuture<'_, ()>;

	/// `DEL key`; a missing key is not an error.
	fn delete_value(&self, key: String) -> StoreFuture<'_, ()>;
}
impl RedisCommands for ConnectionManager {
	fn get_value(&self, key: String) -> StoreFuture<'_, Option<String>> {
		let mut conn = self.clone();

		Box::pin(async move { conn.get::<_, Option<String>>(key).await.map_err(backend_error) })
	}

	fn set_value_ex(&self, key: String, value: String, seconds: u64) -> StoreFuture<'_, ()> {
		let mut conn = self.clone();

		Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, seconds).await.map_err(backend_error) })
	}

	fn delete_value(&self, key: String) -> StoreFuture<'_, ()> {
		let mut conn = self.clone();

		Box::pin(async move { conn.del::<_, ()>(key).await.map_err(backend_error) })
	}
}

/// Token store keeping entries in Redis with a server-side TTL.
#[derive(Clone)]
pub struct RedisStore<C = ConnectionManager>
where
	C: RedisCommands,
{
	commands: C,
}
impl RedisStore {
	/// Connects to the server at `url` (e.g. `redis://127.0.0.1/`).
	///
	/// The connection manager reconnects on its own after transient failures.
	pub async fn connect(url: &str) -> Result<Self, StoreError> {
		let client = RedisClient::open(url).map_err(backend_error)?;
		let manager = ConnectionManager::new(client).await.map_err(backend_error)?;

		Ok(Self::with_commands(manager))
	}
}
impl<C> RedisStore<C>
where
	C: RedisCommands,
{
	/// Wraps an existing command backend.
	pub fn with_commands(commands: C) -> Self {
		Self { commands }
	}

	/// Command backend in use.
	pub fn commands(&self) -> &C {
		&self.commands
	}
}
impl<C> Debug for RedisStore<C>
where
	C: RedisCommands,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RedisStore").finish_non_exhaustive()
	}
}
impl<C> TokenStore for RedisStore<C>
where
	C: RedisCommands,
{
	fn fetch<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, Option<CachedToken>> {
		Box::pin(async move {
			let Some(payload) = self.commands.get_value(key.to_string()).await? else {
				return Ok(None);
			};
			let token: CachedToken =
				serde_json::from_str(&payload).map_err(|e| StoreError::Serialization {
					message: format!("Failed to parse cached token for {key}: {e}"),
				})?;

			// Guards against clock skew between this host and the server.
			Ok(Some(token).filter(|token| !token.is_expired_at(OffsetDateTime::now_utc())))
		})
	}

	fn save(&self, key: CacheKey, token: CachedToken) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let remaining = (token.expires_at() - OffsetDateTime::now_utc()).whole_seconds();

			// `EX` rejects zero and negative lifetimes.
			let Ok(seconds @ 1..) = u64::try_from(remaining) else {
				return Ok(());
			};
			let payload = serde_json::to_string(&token).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize cached token for {key}: {e}"),
			})?;

			self.commands.set_value_ex(key.into(), payload, seconds).await
		})
	}

	fn remove<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.commands.delete_value(key.to_string()).await })
	}
}

fn backend_error(e: RedisError) -> StoreError {
	StoreError::Backend { message: format!("Redis command failed: {e}") }
}
