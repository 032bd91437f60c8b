//! SDK-level error types shared across the client, transport, and encoder.

// self
use crate::_prelude::*;

/// SDK-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical SDK error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request parameters could not be encoded.
	#[error(transparent)]
	Encoding(#[from] crate::query::EncodingError),
	/// Transport failure (DNS, TCP, TLS, non-2xx status).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The API answered with a non-zero `errcode`.
	#[error("Remote API rejected the request with code {code}: {message}.")]
	RemoteApi {
		/// Numeric `errcode` reported by the API.
		code: i64,
		/// Accompanying `errmsg`, possibly empty.
		message: String,
	},
	/// Response body did not match the expected shape.
	#[error("API returned a malformed response body.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}

/// Configuration and validation failures raised by the SDK.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Account or application identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// API base URL cannot be used to build endpoint URLs.
	#[error("API base `{url}` is invalid: {reason}.")]
	InvalidApiBase {
		/// Offending URL.
		url: String,
		/// Why the URL was rejected.
		reason: &'static str,
	},
	/// Cache namespace is empty or contains whitespace.
	#[error("Cache namespace must be non-empty and free of whitespace.")]
	InvalidCacheNamespace,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, HTTP status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// API responded with a non-success HTTP status.
	#[error("API responded with HTTP status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Leading bytes of the response body, lossily decoded.
		body_preview: String,
	},
}
impl TransportError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Builds a [`TransportError::Status`] with a bounded preview of `body`.
	pub fn status(status: u16, body: &[u8]) -> Self {
		let end = body.len().min(Self::BODY_PREVIEW_LIMIT);

		Self::Status { status, body_preview: String::from_utf8_lossy(&body[..end]).into_owned() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
