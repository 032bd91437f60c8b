//! Transport primitives for API calls.
//!
//! The client depends on [`HttpTransport`] only, so downstream crates can plug in their own HTTP
//! stack (or a fake in tests). TLS and timeout behavior are fixed when a transport is built from
//! a [`TransportConfig`]; nothing is toggled process-wide.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing API requests.
///
/// Implementations report any response they receive, whatever its status; the client classifies
/// non-2xx statuses. Only failures to obtain a response are returned as errors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and returns the raw response.
	fn send(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`; parameters travel in the query string.
	Get,
	/// `POST`; parameters travel as a JSON body.
	Post,
}
impl Method {
	/// Returns the method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully prepared request handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL including the encoded query.
	pub url: Url,
	/// JSON body bytes, if any.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Builds a body-less `GET`.
	pub fn get(url: Url) -> Self {
		Self { method: Method::Get, url, body: None }
	}

	/// Builds a `POST` carrying an optional JSON body.
	pub fn post(url: Url, body: Option<Vec<u8>>) -> Self {
		Self { method: Method::Post, url, body }
	}
}

/// Raw response returned by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Converts non-2xx responses into [`TransportError::Status`].
	pub fn into_success(self) -> Result<Self, TransportError> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(TransportError::status(self.status, &self.body))
		}
	}
}

/// Explicit transport settings applied when the HTTP client is built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
	/// Per-request timeout; `None` leaves the HTTP stack's default in place.
	pub timeout: Option<StdDuration>,
	/// Skips TLS certificate verification. Only for test servers with self-signed certificates.
	pub accept_invalid_certs: bool,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring `config`.
	pub fn from_config(config: &TransportConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = config.timeout {
			builder = builder.timeout(timeout);
		}
		if config.accept_invalid_certs {
			builder = builder.danger_accept_invalid_certs(true);
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let builder = match request.method {
				Method::Get => client.get(request.url),
				Method::Post => {
					let builder = client.post(request.url);

					match request.body {
						Some(body) => builder
							.header(reqwest::header::CONTENT_TYPE, "application/json")
							.body(body),
						None => builder,
					}
				},
			};
			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok::<_, TransportError>(ApiResponse { status, body })
		})
	}
}
