//! Async Rust SDK for the Feyin cloud printing API: nested query encoding, a fail-open
//! access-token cache over pluggable stores, and typed device, template, and print endpoints.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;
pub mod query;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::ReqwestApiClient,
		config::ClientConfig,
		http::ReqwestTransport,
		store::{MemoryStore, TokenStore},
	};

	/// Member code used by test fixtures.
	pub const TEST_MEMBER: &str = "member-test";
	/// Application identifier used by test fixtures.
	pub const TEST_APP: &str = "app-test";
	/// Application secret used by test fixtures.
	pub const TEST_SECRET: &str = "secret-test";

	/// Builds a validated configuration pointing at `api_base` (usually an `httpmock` server).
	pub fn test_config(api_base: &str) -> ClientConfig {
		ClientConfig::builder(TEST_MEMBER, TEST_APP, TEST_SECRET)
			.api_base(Url::parse(api_base).expect("Test API base should parse."))
			.build()
			.expect("Test configuration should validate.")
	}

	/// Constructs a reqwest-backed client with an in-memory token store.
	pub fn build_test_client(api_base: &str) -> (ReqwestApiClient, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let client = ReqwestApiClient::with_transport(test_config(api_base), ReqwestTransport::default())
			.with_store(store);

		(client, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
