// self
use crate::obs::{CacheOutcome, CallOutcome};

/// Records an API call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(endpoint: &'static str, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"feyin_sdk_api_call_total",
			"endpoint" => endpoint,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (endpoint, outcome);
	}
}

/// Records a token-cache decision via the global metrics recorder (when enabled).
pub fn record_cache_outcome(outcome: CacheOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("feyin_sdk_token_cache_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_call_outcome("devices", CallOutcome::Failure);
		record_cache_outcome(CacheOutcome::WriteFailed);
	}
}
