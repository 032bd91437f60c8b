//! PHP-style bracket-notation query encoding for nested request parameters.
//!
//! [`encode`] flattens a [`Params`] tree into [`EncodedPair`]s whose keys spell the path to each
//! scalar leaf (`a[b][0]=x`). [`to_query_string`] and [`append_to_url`] percent-encode those pairs
//! as `application/x-www-form-urlencoded`, and [`decode`] rebuilds a tree from such a string.
//!
//! Pair order follows the traversal of the input tree and is not part of the contract; compare
//! encodings as sets of pairs.

mod decode;
mod encode;
mod value;

pub use decode::*;
pub use encode::*;
pub use value::*;
