//! Strongly typed account identifiers used to address the API and scope cached tokens.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
/// Separates the member code from the app id inside cache keys.
pub(crate) const KEY_SEPARATOR: char = ':';

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (member, app).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (member, app).
		kind: &'static str,
	},
	/// The identifier contains the cache-key separator.
	#[error("{kind} identifier contains the reserved character `{reserved}`.")]
	ReservedCharacter {
		/// Kind of identifier (member, app).
		kind: &'static str,
		/// Offending character.
		reserved: char,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (member, app).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { MemberCode, "Developer account code issued by the printing platform.", "Member" }
def_id! { AppId, "Application identifier registered under a member account.", "App" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.contains(KEY_SEPARATOR) {
		return Err(IdentifierError::ReservedCharacter { kind, reserved: KEY_SEPARATOR });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(MemberCode::new(" member-1").is_err(), "Leading whitespace must be rejected.");
		assert!(MemberCode::new("member-1 ").is_err(), "Trailing whitespace must be rejected.");

		let member = MemberCode::new("member-1").expect("Member fixture should be valid.");

		assert_eq!(member.as_ref(), "member-1");
		assert!(AppId::new("").is_err());
		assert!(AppId::new("with space").is_err());
	}

	#[test]
	fn identifiers_reject_the_key_separator() {
		let err = AppId::new("app:1").expect_err("Separator must be rejected.");

		assert_eq!(err, IdentifierError::ReservedCharacter { kind: "App", reserved: ':' });
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let app: AppId =
			serde_json::from_str("\"app-42\"").expect("App id should deserialize successfully.");

		assert_eq!(app.as_ref(), "app-42");
		assert!(serde_json::from_str::<AppId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<MemberCode>("\"a:b\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		MemberCode::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(MemberCode::new(&too_long).is_err());
	}
}
