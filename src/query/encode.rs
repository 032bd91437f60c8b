// crates.io
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	query::{Params, Value},
};

/// Errors raised while flattening parameters.
#[derive(Debug, ThisError)]
pub enum EncodingError {
	/// A leaf has no query representation.
	#[error("Value at `{key}` is {kind}, which has no query representation.")]
	UnsupportedValue {
		/// Compound key of the offending leaf.
		key: String,
		/// Variant label of the offending leaf.
		kind: &'static str,
	},
	/// A mapping key is empty or contains `[` / `]`, so its compound key would be ambiguous.
	#[error("Key `{key}` has an empty segment or a segment containing `[` or `]`.")]
	InvalidKey {
		/// Compound key ending in the offending segment.
		key: String,
	},
	/// Top-level input was not a mapping.
	#[error("Top-level parameters must be a mapping, found {found}.")]
	NotAMapping {
		/// Variant label of the rejected input.
		found: &'static str,
	},
	/// Input could not be serialized into a parameter tree or JSON body.
	#[error("Parameters could not be serialized.")]
	Serialize(#[from] serde_json::Error),
}

/// Path from the root mapping to a scalar leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPath(Vec<String>);
impl KeyPath {
	/// Returns the path segments in root-to-leaf order.
	pub fn segments(&self) -> &[String] {
		&self.0
	}

	/// Renders the compound key: first segment literal, later segments bracketed.
	pub fn compound_key(&self) -> String {
		let mut segments = self.0.iter();
		let mut key = segments.next().cloned().unwrap_or_default();

		for segment in segments {
			key.push('[');
			key.push_str(segment);
			key.push(']');
		}

		key
	}

	fn push(&mut self, segment: impl Into<String>) {
		self.0.push(segment.into());
	}

	fn pop(&mut self) {
		self.0.pop();
	}
}
impl<S> FromIterator<S> for KeyPath
where
	S: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = S>,
	{
		Self(iter.into_iter().map(Into::into).collect())
	}
}

/// Flattened `(compound key, value)` pair prior to percent-encoding.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EncodedPair {
	/// Compound key such as `a[b][0]`.
	pub key: String,
	/// Textual form of the scalar leaf.
	pub value: String,
}
impl EncodedPair {
	/// Creates a pair from raw key and value strings.
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self { key: key.into(), value: value.into() }
	}
}
impl Display for EncodedPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}={}", self.key, self.value)
	}
}

/// Flattens `params` into one pair per scalar leaf.
///
/// Empty sequences and mappings contribute no pairs. A `Null` leaf fails the whole call, and so
/// does a mapping key that is empty or contains brackets: such keys would collide with, or fail to
/// parse back as, other compound keys.
pub fn encode(params: &Params) -> Result<Vec<EncodedPair>, EncodingError> {
	let mut pairs = Vec::new();
	let mut path = KeyPath::default();

	flatten_mapping(&mut path, params, &mut pairs)?;

	Ok(pairs)
}

/// Encodes `params` as an `application/x-www-form-urlencoded` string.
pub fn to_query_string(params: &Params) -> Result<String, EncodingError> {
	let pairs = encode(params)?;
	let mut serializer = Serializer::new(String::new());

	for pair in &pairs {
		serializer.append_pair(&pair.key, &pair.value);
	}

	Ok(serializer.finish())
}

/// Appends the encoded `params` to `url`, joining with `?` or `&` as needed.
pub fn append_to_url(url: &mut Url, params: &Params) -> Result<(), EncodingError> {
	let pairs = encode(params)?;

	if pairs.is_empty() {
		return Ok(());
	}

	url.query_pairs_mut().extend_pairs(pairs.iter().map(|pair| (&pair.key, &pair.value)));

	Ok(())
}

fn flatten(
	path: &mut KeyPath,
	value: &Value,
	pairs: &mut Vec<EncodedPair>,
) -> Result<(), EncodingError> {
	match value {
		Value::Mapping(map) => flatten_mapping(path, map, pairs)?,
		Value::Sequence(items) =>
			for (idx, child) in items.iter().enumerate() {
				path.push(idx.to_string());
				flatten(path, child, pairs)?;
				path.pop();
			},
		leaf => match leaf.scalar_text() {
			Some(text) => pairs.push(EncodedPair::new(path.compound_key(), text)),
			None =>
				return Err(EncodingError::UnsupportedValue {
					key: path.compound_key(),
					kind: leaf.kind(),
				}),
		},
	}

	Ok(())
}

fn flatten_mapping(
	path: &mut KeyPath,
	map: &Params,
	pairs: &mut Vec<EncodedPair>,
) -> Result<(), EncodingError> {
	for (key, child) in map {
		path.push(key.as_str());

		if key.is_empty() || key.contains(['[', ']']) {
			return Err(EncodingError::InvalidKey { key: path.compound_key() });
		}

		flatten(path, child, pairs)?;
		path.pop();
	}

	Ok(())
}
