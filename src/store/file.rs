//! File-backed [`TokenStore`] that lets tokens survive process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
	process,
	sync::atomic::{AtomicU64, Ordering},
};
// self
use crate::{
	_prelude::*,
	store::{CacheKey, CachedToken, StoreError, StoreFuture, TokenStore},
};

type Snapshot = HashMap<CacheKey, CachedToken>;

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Persists cached tokens to a JSON file shared by every store opened on the same path.
///
/// Each mutation re-reads the file, applies its single change on top of what is there, and
/// replaces the file atomically, so stores in other processes only lose a write when two
/// mutations race between one store's read and its rename. Reads are served from the last
/// loaded snapshot and fall back to the file on a miss. Expired entries are dropped whenever the
/// file is loaded.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_live(&path, OffsetDateTime::now_utc())?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_live(path: &Path, now: OffsetDateTime) -> Result<Snapshot, StoreError> {
		let mut snapshot = if path.exists() { Self::load_snapshot(path)? } else { HashMap::new() };

		snapshot.retain(|_, token| !token.is_expired_at(now));

		Ok(snapshot)
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(HashMap::new());
		}

		let entries: Vec<(CacheKey, CachedToken)> =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(entries.into_iter().collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	/// Applies `mutate` to the current file contents and writes the result back.
	fn update<F>(&self, mutate: F) -> Result<(), StoreError>
	where
		F: FnOnce(&mut Snapshot),
	{
		let mut guard = self.inner.write();
		let mut snapshot = Self::load_live(&self.path, OffsetDateTime::now_utc())?;

		mutate(&mut snapshot);
		self.persist(&snapshot)?;
		*guard = snapshot;

		Ok(())
	}

	fn persist(&self, contents: &Snapshot) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let snapshot: Vec<_> = contents.iter().collect();
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		// Unique per writer so concurrent stores never share a temp file.
		let tmp_path = self.path.with_extension(format!(
			"{}.{}.tmp",
			process::id(),
			TMP_SEQ.fetch_add(1, Ordering::Relaxed)
		));

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn fetch<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, Option<CachedToken>> {
		Box::pin(async move {
			let now = OffsetDateTime::now_utc();
			let cached = self.inner.read().get(key).filter(|token| !token.is_expired_at(now)).cloned();

			if cached.is_some() {
				return Ok(cached);
			}

			// Another store may have written the key since the last load.
			let mut guard = self.inner.write();
			let snapshot = Self::load_live(&self.path, now)?;
			let token = snapshot.get(key).cloned();

			*guard = snapshot;

			Ok::<_, StoreError>(token)
		})
	}

	fn save(&self, key: CacheKey, token: CachedToken) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.update(|snapshot| {
				snapshot.insert(key, token);
			})
		})
	}

	fn remove<'a>(&'a self, key: &'a CacheKey) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.update(|snapshot| {
				snapshot.remove(key);
			})
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::auth::{AppId, MemberCode, TokenSecret};

	fn temp_path(label: &str) -> PathBuf {
		let unique = format!(
			"feyin_sdk_file_store_{label}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn key(app: &str) -> CacheKey {
		CacheKey::new(
			CacheKey::DEFAULT_NAMESPACE,
			&MemberCode::new("member-demo").expect("Failed to build member fixture."),
			&AppId::new(app).expect("Failed to build app fixture."),
		)
	}

	fn cleanup(path: &Path) {
		fs::remove_file(path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path("reload");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let token = CachedToken::new(TokenSecret::new("access-token"), OffsetDateTime::now_utc(), 3600);

		rt.block_on(store.save(key("app-demo"), token.clone()))
			.expect("Failed to save fixture token to file store.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched = rt
			.block_on(reopened.fetch(&key("app-demo")))
			.expect("Failed to fetch fixture token from file store.")
			.expect("File store lost token after reopen.");

		assert_eq!(fetched, token);

		cleanup(&path);
	}

	#[test]
	fn expired_entries_are_dropped() {
		let path = temp_path("expiry");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let now = OffsetDateTime::now_utc();

		rt.block_on(store.save(
			key("app-stale"),
			CachedToken::new(TokenSecret::new("stale"), now - Duration::hours(2), 3600),
		))
		.expect("Failed to save stale token.");
		rt.block_on(store.save(
			key("app-live"),
			CachedToken::new(TokenSecret::new("live"), now, 3600),
		))
		.expect("Failed to save live token.");

		assert_eq!(rt.block_on(store.fetch(&key("app-stale"))).expect("Fetch should succeed."), None);

		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");

		assert_eq!(reopened.inner.read().len(), 1);
		assert!(
			rt.block_on(reopened.fetch(&key("app-live")))
				.expect("Fetch should succeed.")
				.is_some()
		);

		cleanup(&path);
	}

	#[test]
	fn stores_sharing_a_path_keep_each_others_entries() {
		let path = temp_path("shared");
		let first = FileStore::open(&path).expect("Failed to open first file store.");
		let second = FileStore::open(&path).expect("Failed to open second file store.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let now = OffsetDateTime::now_utc();

		rt.block_on(first.save(key("app-a"), CachedToken::new(TokenSecret::new("ta"), now, 3600)))
			.expect("First store should save.");
		rt.block_on(second.save(key("app-b"), CachedToken::new(TokenSecret::new("tb"), now, 3600)))
			.expect("Second store should save.");

		let seen_by_second = rt
			.block_on(second.fetch(&key("app-a")))
			.expect("Fetch should succeed.")
			.expect("Second store should see the first store's write.");

		assert_eq!(seen_by_second.token.expose(), "ta");

		rt.block_on(first.remove(&key("app-b"))).expect("First store should remove.");

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");

		assert!(rt.block_on(reopened.fetch(&key("app-a"))).expect("Fetch should succeed.").is_some());
		assert_eq!(rt.block_on(reopened.fetch(&key("app-b"))).expect("Fetch should succeed."), None);

		cleanup(&path);
	}

	#[test]
	fn remove_is_persisted() {
		let path = temp_path("remove");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.save(
			key("app-demo"),
			CachedToken::new(TokenSecret::new("gone"), OffsetDateTime::now_utc(), 3600),
		))
		.expect("Failed to save fixture token.");
		rt.block_on(store.remove(&key("app-demo"))).expect("Remove should succeed.");
		rt.block_on(store.remove(&key("app-missing"))).expect("Removing a missing key is not an error.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");

		assert_eq!(rt.block_on(reopened.fetch(&key("app-demo"))).expect("Fetch should succeed."), None);

		cleanup(&path);
	}
}
