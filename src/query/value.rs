// crates.io
use serde_json::Number;
// self
use crate::{_prelude::*, query::EncodingError};

/// Top-level parameter mapping accepted by the encoder.
pub type Params = BTreeMap<String, Value>;

/// Nested parameter value: a scalar leaf, an ordered sequence, or a keyed mapping.
///
/// `Null` exists so untyped input (e.g. JSON) can be represented; it has no query form and is
/// rejected by the encoder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	/// Absent value.
	Null,
	/// Boolean scalar rendered as `true` / `false`.
	Bool(bool),
	/// Numeric scalar rendered in its shortest textual form.
	Number(Number),
	/// String scalar rendered verbatim.
	String(String),
	/// Ordered list; element indices become key segments.
	Sequence(Vec<Value>),
	/// String-keyed mapping; keys become key segments.
	Mapping(Params),
}
impl Value {
	/// Returns the textual form of a scalar leaf, or `None` for containers and `Null`.
	pub fn scalar_text(&self) -> Option<String> {
		match self {
			Self::Bool(b) => Some(b.to_string()),
			Self::Number(n) => Some(n.to_string()),
			Self::String(s) => Some(s.clone()),
			Self::Null | Self::Sequence(_) | Self::Mapping(_) => None,
		}
	}

	/// Short label describing the variant, used in error messages.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Number(_) => "number",
			Self::String(_) => "string",
			Self::Sequence(_) => "sequence",
			Self::Mapping(_) => "mapping",
		}
	}
}
impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(b) => Self::Bool(b),
			serde_json::Value::Number(n) => Self::Number(n),
			serde_json::Value::String(s) => Self::String(s),
			serde_json::Value::Array(items) =>
				Self::Sequence(items.into_iter().map(Into::into).collect()),
			serde_json::Value::Object(map) =>
				Self::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
		}
	}
}
impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}
impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}
impl From<&String> for Value {
	fn from(value: &String) -> Self {
		Self::String(value.clone())
	}
}
impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Number(value.into())
	}
}
impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Self::Number(value.into())
	}
}
impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Number(value.into())
	}
}
impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Self::Number(value.into())
	}
}
impl From<f64> for Value {
	/// Non-finite floats have no textual query form and become [`Value::Null`].
	fn from(value: f64) -> Self {
		Number::from_f64(value).map_or(Self::Null, Self::Number)
	}
}
impl<T> From<Vec<T>> for Value
where
	T: Into<Value>,
{
	fn from(items: Vec<T>) -> Self {
		Self::Sequence(items.into_iter().map(Into::into).collect())
	}
}
impl From<Params> for Value {
	fn from(map: Params) -> Self {
		Self::Mapping(map)
	}
}
impl<K, V> FromIterator<(K, V)> for Value
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// Converts any serializable value whose top level is a map or struct into [`Params`].
pub fn to_params<T>(value: &T) -> Result<Params, EncodingError>
where
	T: ?Sized + Serialize,
{
	match Value::from(serde_json::to_value(value)?) {
		Value::Mapping(map) => Ok(map),
		other => Err(EncodingError::NotAMapping { found: other.kind() }),
	}
}
