//! API client bound to one member/app pair.
//!
//! Every endpoint call obtains an access token through the client's [`TokenCache`], attaches it
//! to the request, and classifies the response in three steps: non-2xx statuses become
//! [`TransportError::Status`](crate::error::TransportError::Status), a non-zero `errcode`
//! becomes [`Error::RemoteApi`], and anything else is decoded into the endpoint's record type.

mod device;
mod member;
mod message;
mod template;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	cache::{IssuedToken, TokenCache},
	config::ClientConfig,
	http::{ApiRequest, ApiResponse, HttpTransport},
	model::{ResponseError, TokenResponse},
	obs::{self, CallOutcome, CallSpan},
	query::{self, EncodingError, Params, Value},
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = Client<ReqwestTransport>;

/// Printing API client.
///
/// Cloning is cheap and clones share the transport and token store.
pub struct Client<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	config: Arc<ClientConfig>,
	tokens: TokenCache,
}
impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that sends requests through `transport`.
	///
	/// No token store is attached; call [`with_store`](Self::with_store) to reuse tokens across
	/// calls.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<T>>) -> Self {
		let tokens = TokenCache::new(config.cache_key());

		Self { transport: transport.into(), config: Arc::new(config), tokens }
	}

	/// Attaches the store that caches access tokens.
	pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.tokens = self.tokens.with_store(store);

		self
	}

	/// Validated configuration in use.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Token cache backing [`access_token`](Self::access_token).
	pub fn token_cache(&self) -> &TokenCache {
		&self.tokens
	}

	/// Returns a usable access token, issuing one when the store has none.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		self.tokens.get(|| self.issue_token()).await
	}

	/// Forgets the cached token; the next call issues a new one.
	pub async fn invalidate_token(&self) {
		self.tokens.invalidate().await;
	}

	async fn issue_token(&self) -> Result<IssuedToken> {
		self.observe("token", async {
			let params: Params = [
				("code", self.config.member_code.as_ref()),
				("secret", self.config.secret.expose()),
				("appid", self.config.app_id.as_ref()),
			]
			.into_iter()
			.map(|(key, value)| (key.to_owned(), Value::from(value)))
			.collect();
			let mut url = self.config.endpoint(["token"])?;

			query::append_to_url(&mut url, &params)?;

			let response = self.execute(ApiRequest::get(url)).await?;
			let issued: TokenResponse = decode_response(&response)?;

			Ok(IssuedToken::new(issued.access_token, issued.expires_in))
		})
		.await
	}

	/// Sends an authenticated `GET`, encoding `params` plus the token into the query.
	pub(crate) async fn get<R>(
		&self,
		endpoint: &'static str,
		segments: &[&str],
		mut params: Params,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.observe(endpoint, async move {
			let token = self.access_token().await?;
			let mut url = self.config.endpoint(segments)?;

			params.insert("access_token".into(), token.expose().into());
			query::append_to_url(&mut url, &params)?;

			let response = self.execute(ApiRequest::get(url)).await?;

			decode_response(&response)
		})
		.await
	}

	/// Sends an authenticated `POST` with the token in the query and `body` as JSON.
	pub(crate) async fn post<R>(
		&self,
		endpoint: &'static str,
		segments: &[&str],
		body: Option<Params>,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.observe(endpoint, async move {
			let token = self.access_token().await?;
			let mut url = self.config.endpoint(segments)?;

			url.query_pairs_mut().append_pair("access_token", token.expose());

			let body = body
				.map(|params| serde_json::to_vec(&params))
				.transpose()
				.map_err(EncodingError::from)?;
			let response = self.execute(ApiRequest::post(url, body)).await?;

			decode_response(&response)
		})
		.await
	}

	async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
		let response = self.transport.send(request).await?;

		response.into_success().map_err(Error::from)
	}

	async fn observe<R, Fut>(&self, endpoint: &'static str, fut: Fut) -> Result<R>
	where
		Fut: Future<Output = Result<R>>,
	{
		let span = CallSpan::new(endpoint);

		obs::record_call_outcome(endpoint, CallOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_call_outcome(endpoint, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(endpoint, CallOutcome::Failure),
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client whose reqwest transport honors `config.transport`.
	pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
		let transport = ReqwestTransport::from_config(&config.transport)?;

		Ok(Self::with_transport(config, transport))
	}
}
impl<T> Clone for Client<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			config: self.config.clone(),
			tokens: self.tokens.clone(),
		}
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("member_code", &self.config.member_code)
			.field("app_id", &self.config.app_id)
			.field("api_base", &self.config.api_base.as_str())
			.field("tokens", &self.tokens)
			.finish()
	}
}

/// Rejects `errcode != 0`, then decodes the body as `R`.
///
/// Bodies that are not JSON objects (e.g. list endpoints) skip the `errcode` check.
fn decode_response<R>(response: &ApiResponse) -> Result<R>
where
	R: DeserializeOwned,
{
	if let Some(remote) = serde_json::from_slice::<ResponseError>(&response.body)
		.ok()
		.filter(ResponseError::is_error)
	{
		return Err(Error::RemoteApi { code: remote.errcode, message: remote.errmsg });
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::ResponseParse { source, status: response.status })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		error::TransportError,
		http::{Method, TransportFuture},
		store::MemoryStore,
	};

	/// Transport that records requests and replays a fixed response per path.
	#[derive(Default)]
	struct ScriptedTransport {
		responses: RwLock<HashMap<String, ApiResponse>>,
		requests: RwLock<Vec<ApiRequest>>,
	}
	impl ScriptedTransport {
		fn respond(&self, path: &str, status: u16, body: &str) {
			self.responses
				.write()
				.insert(path.into(), ApiResponse { status, body: body.as_bytes().to_vec() });
		}

		fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
			self.requests.read().iter().filter(|r| r.url.path() == path).cloned().collect()
		}
	}
	impl HttpTransport for ScriptedTransport {
		fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
			let response = self.responses.read().get(request.url.path()).cloned();

			self.requests.write().push(request);

			Box::pin(async move {
				response.ok_or_else(|| {
					TransportError::Io(std::io::Error::new(
						std::io::ErrorKind::NotFound,
						"no scripted response",
					))
				})
			})
		}
	}

	fn client(transport: Arc<ScriptedTransport>) -> Client<ScriptedTransport> {
		let config = ClientConfig::builder("member-1", "app-1", "app-secret")
			.api_base(Url::parse("http://api.test").expect("Fixture URL should parse."))
			.build()
			.expect("Config fixture should build.");

		Client::with_transport(config, transport).with_store(Arc::new(MemoryStore::default()))
	}

	fn query_of(request: &ApiRequest) -> HashMap<String, String> {
		request.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
	}

	#[tokio::test]
	async fn token_issuance_sends_credentials_in_query() {
		let transport = Arc::new(ScriptedTransport::default());

		transport.respond("/token", 200, r#"{"access_token":"tok","appid":"app-1","expires_in":7200}"#);

		let client = client(transport.clone());
		let token = client.access_token().await.expect("Issuance should succeed.");
		let issued = transport.requests_to("/token");
		let query = query_of(&issued[0]);

		assert_eq!(token.expose(), "tok");
		assert_eq!(issued.len(), 1);
		assert_eq!(issued[0].method, Method::Get);
		assert_eq!(query.get("code").map(String::as_str), Some("member-1"));
		assert_eq!(query.get("secret").map(String::as_str), Some("app-secret"));
		assert_eq!(query.get("appid").map(String::as_str), Some("app-1"));
	}

	#[tokio::test]
	async fn issuance_errcode_is_a_remote_error() {
		let transport = Arc::new(ScriptedTransport::default());

		transport.respond("/token", 200, r#"{"errcode":40013,"errmsg":"invalid appid"}"#);

		let err = client(transport).access_token().await.expect_err("Issuance should fail.");

		assert!(matches!(err, Error::RemoteApi { code: 40013, ref message } if message == "invalid appid"));
	}

	#[tokio::test]
	async fn post_without_body_sends_token_only() {
		let transport = Arc::new(ScriptedTransport::default());

		transport.respond("/token", 200, r#"{"access_token":"tok","appid":"app-1","expires_in":7200}"#);
		transport.respond("/device/dev-1/bind", 200, "{}");

		client(transport.clone()).device_bind("dev-1").await.expect("Bind should succeed.");

		let sent = transport.requests_to("/device/dev-1/bind");

		assert_eq!(sent[0].method, Method::Post);
		assert_eq!(sent[0].body, None);
		assert_eq!(sent[0].url.query(), Some("access_token=tok"));
	}

	#[tokio::test]
	async fn malformed_body_reports_the_failing_path() {
		let transport = Arc::new(ScriptedTransport::default());

		transport.respond("/token", 200, r#"{"access_token":"tok","appid":"app-1","expires_in":7200}"#);
		transport.respond("/msg/m-1/status", 200, r#"{"msg_no":"m-1","status":7}"#);

		let err = client(transport).message_status("m-1").await.expect_err("Decoding should fail.");

		match err {
			Error::ResponseParse { source, status } => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "status");
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}
}
