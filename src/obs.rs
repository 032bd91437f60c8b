//! Optional observability helpers for API calls and the token cache.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap every API call in a span named `feyin_sdk.call` with an `endpoint`
//!   field, and to log token-cache decisions (swallowed store failures at `warn`).
//! - Enable `metrics` to increment `feyin_sdk_api_call_total` (labeled by `endpoint` + `outcome`)
//!   and `feyin_sdk_token_cache_total` (labeled by `outcome`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each API call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to an endpoint helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Decisions taken by the token cache on each lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
	/// Token served from the store.
	Hit,
	/// Store had no usable token.
	Miss,
	/// Store read failed; treated as a miss.
	ReadFailed,
	/// Issuer produced a fresh token.
	Issued,
	/// Issuer failed; error returned to the caller.
	IssueFailed,
	/// Fresh token could not be written; still returned to the caller.
	WriteFailed,
	/// Fresh token had a non-positive TTL and was not written.
	WriteSkipped,
}
impl CacheOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CacheOutcome::Hit => "hit",
			CacheOutcome::Miss => "miss",
			CacheOutcome::ReadFailed => "read_failed",
			CacheOutcome::Issued => "issued",
			CacheOutcome::IssueFailed => "issue_failed",
			CacheOutcome::WriteFailed => "write_failed",
			CacheOutcome::WriteSkipped => "write_skipped",
		}
	}
}
impl Display for CacheOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
