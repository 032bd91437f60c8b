// std
use std::collections::btree_map::Entry;
// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	query::{Params, Value},
};

/// Errors raised while rebuilding parameters from a query string.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DecodeError {
	/// Key does not follow `head[seg][seg]...` notation.
	#[error("Query key `{key}` is not valid bracket notation.")]
	MalformedKey {
		/// Offending (percent-decoded) key.
		key: String,
	},
	/// Key addresses a slot already used by a scalar or a container.
	#[error("Query key `{key}` conflicts with an earlier key.")]
	Conflict {
		/// Offending (percent-decoded) key.
		key: String,
	},
}

/// Rebuilds a parameter tree from an `application/x-www-form-urlencoded` string.
///
/// Every leaf decodes as [`Value::String`]. Mappings whose keys are exactly `0..n` become
/// sequences. An empty segment (`a[]=x`) appends at the next index after the largest numeric key
/// already present, so `a[]=1&a[]=2` yields `["1", "2"]`.
pub fn decode(query: &str) -> Result<Params, DecodeError> {
	let mut root = Params::new();

	for (key, value) in form_urlencoded::parse(query.as_bytes()) {
		let segments = split_key(&key)?;

		insert(&mut root, &segments, value.into_owned(), &key)?;
	}

	Ok(root.into_iter().map(|(key, value)| (key, normalize(value))).collect())
}

fn split_key(key: &str) -> Result<Vec<String>, DecodeError> {
	let malformed = || DecodeError::MalformedKey { key: key.to_owned() };
	let (head, mut rest) = match key.find('[') {
		Some(idx) => key.split_at(idx),
		None => (key, ""),
	};

	if head.is_empty() || head.contains(']') {
		return Err(malformed());
	}

	let mut segments = vec![head.to_owned()];

	while !rest.is_empty() {
		let inner = rest.strip_prefix('[').ok_or_else(malformed)?;
		let end = inner.find(']').ok_or_else(malformed)?;
		let (segment, tail) = inner.split_at(end);

		if segment.contains('[') {
			return Err(malformed());
		}

		segments.push(segment.to_owned());
		rest = &tail[1..];
	}

	Ok(segments)
}

fn insert(
	map: &mut Params,
	segments: &[String],
	value: String,
	key: &str,
) -> Result<(), DecodeError> {
	let conflict = || DecodeError::Conflict { key: key.to_owned() };
	let Some((first, rest)) = segments.split_first() else {
		return Ok(());
	};
	let slot = if first.is_empty() { next_index(map).to_string() } else { first.clone() };

	if rest.is_empty() {
		return match map.entry(slot) {
			Entry::Vacant(slot) => {
				slot.insert(Value::String(value));

				Ok(())
			},
			Entry::Occupied(_) => Err(conflict()),
		};
	}

	match map.entry(slot).or_insert_with(|| Value::Mapping(Params::new())) {
		Value::Mapping(inner) => insert(inner, rest, value, key),
		_ => Err(conflict()),
	}
}

fn next_index(map: &Params) -> usize {
	map.keys().filter_map(|key| key.parse::<usize>().ok()).max().map_or(0, |max| max + 1)
}

fn normalize(value: Value) -> Value {
	match value {
		Value::Mapping(mut map) if is_index_mapping(&map) => {
			let items = (0..map.len())
				.filter_map(|idx| map.remove(&idx.to_string()))
				.map(normalize)
				.collect();

			Value::Sequence(items)
		},
		Value::Mapping(map) =>
			Value::Mapping(map.into_iter().map(|(key, child)| (key, normalize(child))).collect()),
		leaf => leaf,
	}
}

fn is_index_mapping(map: &Params) -> bool {
	!map.is_empty() && (0..map.len()).all(|idx| map.contains_key(&idx.to_string()))
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::query::{to_params, to_query_string};

	fn params(value: serde_json::Value) -> Params {
		to_params(&value).expect("Fixture should be a JSON object.")
	}

	fn stringify(value: Value) -> Value {
		match value {
			Value::Sequence(items) => Value::Sequence(items.into_iter().map(stringify).collect()),
			Value::Mapping(map) =>
				Value::Mapping(map.into_iter().map(|(k, v)| (k, stringify(v))).collect()),
			leaf => leaf.scalar_text().map_or(Value::Null, Value::String),
		}
	}

	#[test]
	fn decode_rebuilds_nested_trees() {
		let decoded = decode("a%5B0%5D%5Bb%5D=1&a%5B1%5D%5Bb%5D=2&c=x+y")
			.expect("Well-formed query should decode.");

		assert_eq!(decoded, params(json!({ "a": [{ "b": "1" }, { "b": "2" }], "c": "x y" })));
	}

	#[test]
	fn decode_accepts_unescaped_brackets() {
		let decoded = decode("a[b]=1&a[c]=2").expect("Raw brackets should decode.");

		assert_eq!(decoded, params(json!({ "a": { "b": "1", "c": "2" } })));
	}

	#[test]
	fn sparse_indices_stay_mappings() {
		let decoded = decode("a[0]=x&a[2]=y").expect("Sparse indices should decode.");

		assert_eq!(decoded, params(json!({ "a": { "0": "x", "2": "y" } })));
	}

	#[test]
	fn long_sequences_keep_numeric_order() {
		let query: Vec<String> = (0..12).map(|idx| format!("a[{idx}]={idx}")).collect();
		let decoded = decode(&query.join("&")).expect("Indexed keys should decode.");
		let expected: Vec<String> = (0..12).map(|idx| idx.to_string()).collect();

		assert_eq!(decoded.get("a"), Some(&Value::from(expected)));
	}

	#[test]
	fn round_trip_restores_stringified_tree() {
		let original = params(json!({
			"device_no": "dev 1",
			"template_data": {
				"items": [{ "name": "tea & cake", "qty": 2 }, { "name": "rice", "qty": 1 }],
				"paid": true,
			},
		}));
		let query = to_query_string(&original).expect("Fixture should encode.");
		let decoded = decode(&query).expect("Encoded query should decode.");
		let expected = match stringify(Value::Mapping(original)) {
			Value::Mapping(map) => map,
			other => panic!("Stringified fixture should stay a mapping, found {other:?}."),
		};

		assert_eq!(decoded, expected);
	}

	#[test]
	fn malformed_keys_are_rejected() {
		for key in ["[a]=1", "a[b=1", "a]b=1", "a[b]c=1", "a[[b]]=1"] {
			let err = decode(key).expect_err("Malformed key should be rejected.");

			assert!(matches!(err, DecodeError::MalformedKey { .. }), "Unexpected error for {key}.");
		}
	}

	#[test]
	fn empty_segments_append() {
		let flat = decode("a[]=1&a[]=2").expect("Push syntax should decode.");

		assert_eq!(flat, params(json!({ "a": ["1", "2"] })));

		let nested = decode("a[][b]=1&a[][b]=2&c[x]=3&c[]=4")
			.expect("Push syntax should decode at any depth.");

		assert_eq!(
			nested,
			params(json!({ "a": [{ "b": "1" }, { "b": "2" }], "c": { "x": "3", "0": "4" } }))
		);
	}

	#[test]
	fn conflicting_paths_are_rejected() {
		assert_eq!(
			decode("a=1&a[b]=2"),
			Err(DecodeError::Conflict { key: "a[b]".into() })
		);
		assert_eq!(decode("a[b]=2&a=1"), Err(DecodeError::Conflict { key: "a".into() }));
		assert_eq!(decode("a=1&a=2"), Err(DecodeError::Conflict { key: "a".into() }));
	}
}
