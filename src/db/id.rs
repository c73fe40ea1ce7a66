//! Document identifiers.
//!
//! Threads and replies are addressed by random UUIDs in their hyphenated
//! text form. Anything that does not parse as one is a malformed id and
//! can never match a stored document.

use std::fmt;

use serde::{Serialize, Serializer};
use uuid::Uuid;

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse an identifier supplied by a client.
            ///
            /// Returns `None` for malformed input.
            pub fn parse(s: &str) -> Option<Self> {
                Uuid::parse_str(s.trim()).ok().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

document_id!(
    /// Identifier of a thread.
    ThreadId
);

document_id!(
    /// Identifier of a reply.
    ReplyId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(ThreadId::generate(), ThreadId::generate());
        assert_ne!(ReplyId::generate(), ReplyId::generate());
    }

    #[test]
    fn test_parse_display() {
        let id = ThreadId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(ThreadId::parse(&text), Some(id));
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(ThreadId::parse(""), None);
        assert_eq!(ThreadId::parse("not-an-id"), None);
        // a 24-character hex string of another id scheme
        assert_eq!(ThreadId::parse("0f01cbab2ab94d1650a062b3"), None);
    }

    #[test]
    fn test_serialize_as_string() {
        let id = ReplyId::generate();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
