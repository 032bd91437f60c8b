// self
use crate::{_prelude::*, obs::CacheOutcome, store::CacheKey};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder wrapped around each API call.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the endpoint label.
	pub fn new(endpoint: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("feyin_sdk.call", endpoint);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = endpoint;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a token-cache decision; failures carry the swallowed error's message.
pub fn log_cache_outcome(key: &CacheKey, outcome: CacheOutcome, detail: Option<&dyn Display>) {
	#[cfg(feature = "tracing")]
	{
		let key = key.as_str();
		let outcome = outcome.as_str();

		match detail {
			Some(detail) => tracing::warn!(key, outcome, error = %detail, "token cache degraded"),
			None => tracing::debug!(key, outcome, "token cache"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, outcome, detail);
	}
}
