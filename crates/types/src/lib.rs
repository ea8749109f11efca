//! Validated text and identifier types shared across Slotkeeper crates.
//!
//! Player and slot identifiers arrive from HTTP callers and end up as single path components
//! under the configured save directories, so they are checked once at the boundary and carried
//! as newtypes from then on.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The input cannot be used as a single file name
    #[error("'{0}' is not a valid identifier")]
    UnsafePathComponent(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Checks that `text` can be used verbatim as one file name inside a save directory.
fn validate_path_component(text: NonEmptyText) -> Result<NonEmptyText, TextError> {
    let s = text.as_str();
    let unsafe_component = s == "."
        || s == ".."
        || s.contains(['/', '\\', ':'])
        || s.chars().any(char::is_control);

    if unsafe_component {
        return Err(TextError::UnsafePathComponent(s.to_owned()));
    }
    Ok(text)
}

macro_rules! path_component_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(NonEmptyText);

        impl $name {
            /// Parses and validates an identifier supplied by a caller.
            ///
            /// # Errors
            ///
            /// Returns `TextError::Empty` for blank input and
            /// `TextError::UnsafePathComponent` for separators, `.`/`..` or control characters.
            pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
                validate_path_component(NonEmptyText::new(input)?).map(Self)
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::str::FromStr for $name {
            type Err = TextError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

path_component_id!(
    /// Identifier of a player (the Steam ID used as the player file name).
    PlayerId
);

path_component_id!(
    /// Identifier of a save slot under a player.
    SlotId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  hello ").unwrap();
        assert_eq!(text.as_str(), "hello");
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
    }

    #[test]
    fn player_id_accepts_steam_ids() {
        let id = PlayerId::parse("76561198000000000").unwrap();
        assert_eq!(id.to_string(), "76561198000000000");
    }

    #[test]
    fn slot_id_rejects_traversal_and_separators() {
        for bad in ["..", ".", "a/b", "a\\b", "../etc", "C:x", "bad\nname"] {
            assert!(
                matches!(SlotId::parse(bad), Err(TextError::UnsafePathComponent(_))),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(SlotId::parse(""), Err(TextError::Empty));
    }

    #[test]
    fn slot_id_allows_dots_inside_name() {
        assert_eq!(SlotId::parse("slot.1").unwrap().as_str(), "slot.1");
    }

    #[test]
    fn ids_deserialize_with_validation() {
        let ok: PlayerId = serde_json::from_str("\"123\"").unwrap();
        assert_eq!(ok.as_str(), "123");
        assert!(serde_json::from_str::<PlayerId>("\"../x\"").is_err());
    }
}
