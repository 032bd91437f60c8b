//! Typed client configuration and its validating builder.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{AppId, ClientSecret, MemberCode},
	error::ConfigError,
	http::TransportConfig,
	store::CacheKey,
};

/// Validated settings shared by every call a [`Client`](crate::client::Client) makes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Developer account code, sent as `code` when requesting tokens.
	pub member_code: MemberCode,
	/// Application identifier.
	pub app_id: AppId,
	/// Application secret.
	pub secret: ClientSecret,
	/// Base URL every endpoint path is appended to.
	pub api_base: Url,
	/// Prefix of the token cache key.
	pub cache_namespace: String,
	/// Settings for the default HTTP transport.
	pub transport: TransportConfig,
}
impl ClientConfig {
	/// Production API base.
	pub const DEFAULT_API_BASE: &'static str = "https://api.open.feyin.net";

	/// Starts a builder for the given credentials.
	pub fn builder(
		member_code: impl Into<String>,
		app_id: impl Into<String>,
		secret: impl Into<String>,
	) -> ClientConfigBuilder {
		ClientConfigBuilder::new(member_code, app_id, secret)
	}

	/// Cache slot for this member/app pair.
	pub fn cache_key(&self) -> CacheKey {
		CacheKey::new(&self.cache_namespace, &self.member_code, &self.app_id)
	}

	/// Resolves `segments` against the API base, percent-encoding each one.
	pub fn endpoint<I, S>(&self, segments: I) -> Result<Url, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut url = self.api_base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidApiBase {
				url: self.api_base.to_string(),
				reason: "URL cannot be a base",
			})?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}
}

/// Builder for [`ClientConfig`]; also the shape accepted when loading settings with serde.
///
/// Serializing a builder omits the secret.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfigBuilder {
	/// Raw developer account code.
	pub member_code: String,
	/// Raw application identifier.
	pub app_id: String,
	/// Application secret; accepted when loading, never written back out.
	#[serde(skip_serializing)]
	pub secret: ClientSecret,
	/// API base override.
	#[serde(default)]
	pub api_base: Option<Url>,
	/// Cache namespace override.
	#[serde(default)]
	pub cache_namespace: Option<String>,
	/// Transport settings.
	#[serde(default)]
	pub transport: TransportConfig,
}
impl ClientConfigBuilder {
	/// Creates a builder seeded with credentials and defaults for everything else.
	pub fn new(
		member_code: impl Into<String>,
		app_id: impl Into<String>,
		secret: impl Into<String>,
	) -> Self {
		Self {
			member_code: member_code.into(),
			app_id: app_id.into(),
			secret: ClientSecret::new(secret),
			api_base: None,
			cache_namespace: None,
			transport: TransportConfig::default(),
		}
	}

	/// Overrides the API base.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Overrides the token cache namespace.
	pub fn cache_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.cache_namespace = Some(namespace.into());

		self
	}

	/// Sets the per-request timeout of the default transport.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.transport.timeout = Some(timeout);

		self
	}

	/// Controls TLS certificate verification of the default transport.
	pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
		self.transport.accept_invalid_certs = accept;

		self
	}

	/// Replaces all transport settings.
	pub fn transport(mut self, transport: TransportConfig) -> Self {
		self.transport = transport;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let member_code = MemberCode::new(&self.member_code)?;
		let app_id = AppId::new(&self.app_id)?;
		let api_base = match self.api_base {
			Some(url) => url,
			None => Url::parse(ClientConfig::DEFAULT_API_BASE).map_err(|_| {
				ConfigError::InvalidApiBase {
					url: ClientConfig::DEFAULT_API_BASE.into(),
					reason: "URL does not parse",
				}
			})?,
		};
		let cache_namespace =
			self.cache_namespace.unwrap_or_else(|| CacheKey::DEFAULT_NAMESPACE.into());

		validate_api_base(&api_base)?;

		if cache_namespace.is_empty() || cache_namespace.chars().any(char::is_whitespace) {
			return Err(ConfigError::InvalidCacheNamespace);
		}

		Ok(ClientConfig {
			member_code,
			app_id,
			secret: self.secret,
			api_base,
			cache_namespace,
			transport: self.transport,
		})
	}
}

fn validate_api_base(url: &Url) -> Result<(), ConfigError> {
	let reject = |reason| Err(ConfigError::InvalidApiBase { url: url.to_string(), reason });

	if !matches!(url.scheme(), "http" | "https") {
		return reject("scheme must be http or https");
	}
	if url.cannot_be_a_base() || url.host().is_none() {
		return reject("URL must name a host");
	}
	if url.query().is_some() || url.fragment().is_some() {
		return reject("URL must not carry a query or fragment");
	}

	Ok(())
}
