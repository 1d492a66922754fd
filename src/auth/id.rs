//! Strongly typed identifiers for upstream tokens and team scopes.

// std
use std::{borrow::Borrow, ops::Deref};
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

			/// Returns the identifier as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
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
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
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
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (token, scope).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (token, scope).
		kind: &'static str,
	},
	/// The identifier contains characters that would alter the request path.
	#[error("{kind} identifier contains a path separator.")]
	ContainsSeparator {
		/// Kind of identifier (token, scope).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (token, scope).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { TokenId, "Opaque upstream identifier of an issued token, used for revocation.", "Token" }
def_id! { ScopeId, "Team scope restricting an issued token to part of the upstream account.", "Scope" }

impl ScopeId {
	/// Parses an optional caller value, treating an empty string as "no scope".
	pub fn from_optional(value: Option<&str>) -> Result<Option<Self>, IdentifierError> {
		match value {
			None | Some("") => Ok(None),
			Some(raw) => Self::new(raw).map(Some),
		}
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.contains(['/', '?', '#']) {
		return Err(IdentifierError::ContainsSeparator { kind });
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
	fn identifiers_validate() {
		assert!(TokenId::new(" tok_1").is_err(), "Leading whitespace must be rejected.");
		assert!(TokenId::new("").is_err());
		assert!(TokenId::new("tok/../admin").is_err(), "Path separators must be rejected.");

		let token = TokenId::new("tok_1").expect("Token fixture should be considered valid.");

		assert_eq!(token.as_str(), "tok_1");
		assert_eq!(format!("{token:?}"), "Token(tok_1)");
		assert!(ScopeId::new("team with space").is_err());
	}

	#[test]
	fn optional_scope_treats_empty_as_absent() {
		assert_eq!(ScopeId::from_optional(None), Ok(None));
		assert_eq!(ScopeId::from_optional(Some("")), Ok(None));
		assert_eq!(
			ScopeId::from_optional(Some("team_a")).map(|scope| scope.map(String::from)),
			Ok(Some("team_a".to_owned()))
		);
		assert!(ScopeId::from_optional(Some("a b")).is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let scope: ScopeId =
			serde_json::from_str("\"team_42\"").expect("Scope should deserialize successfully.");

		assert_eq!(scope.as_ref(), "team_42");
		assert!(serde_json::from_str::<ScopeId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<TokenId>("\"\"").is_err());
	}

	#[test]
	fn length_limits() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		TokenId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(matches!(
			TokenId::new(&too_long),
			Err(IdentifierError::TooLong { kind: "Token", max: IDENTIFIER_MAX_LEN })
		));
	}
}
