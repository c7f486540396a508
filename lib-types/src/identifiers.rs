//! Externally-sourced identifiers
//!
//! Values that arrive from the calling environment as plain strings are
//! wrapped here once. Deserialization goes through the same validation, so a
//! snapshot cannot smuggle in a value the constructor would reject.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::errors::{TypeError, TypeResult};

/// Upper bound on external reference length (bytes)
pub const MAX_EXTERNAL_REF_LEN: usize = 64;

/// Upper bound on post content length (bytes)
pub const MAX_CONTENT_LEN: usize = 4096;

/// Identifier of the social artifact a post attests (e.g. a tweet id)
///
/// Non-empty, bounded, and free of whitespace and control characters so that
/// two refs compare equal exactly when they name the same artifact.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalRef(String);

impl ExternalRef {
    /// Validate against the default length bound
    pub fn new(raw: impl Into<String>) -> TypeResult<Self> {
        Self::with_limit(raw, MAX_EXTERNAL_REF_LEN)
    }

    /// Validate against an explicit length bound
    pub fn with_limit(raw: impl Into<String>, max: usize) -> TypeResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(TypeError::EmptyExternalRef);
        }
        if raw.len() > max {
            return Err(TypeError::ExternalRefTooLong { len: raw.len(), max });
        }
        if let Some(c) = raw.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypeError::ExternalRefInvalidChar(c));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for ExternalRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ExternalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalRef({})", self.0)
    }
}

impl fmt::Display for ExternalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ExternalRef {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ExternalRef {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExternalRef> for String {
    fn from(value: ExternalRef) -> Self {
        value.0
    }
}

/// Opaque text payload of a post, immutable once registered
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostContent(String);

impl PostContent {
    /// Validate against the default length bound
    pub fn new(raw: impl Into<String>) -> TypeResult<Self> {
        Self::with_limit(raw, MAX_CONTENT_LEN)
    }

    /// Validate against an explicit length bound
    pub fn with_limit(raw: impl Into<String>, max: usize) -> TypeResult<Self> {
        let raw = raw.into();
        if raw.len() > max {
            return Err(TypeError::ContentTooLong { len: raw.len(), max });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PostContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostContent({} bytes)", self.0.len())
    }
}

impl fmt::Display for PostContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostContent {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostContent> for String {
    fn from(value: PostContent) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_ref_accepts_tweet_id() {
        let r = ExternalRef::new("1234567890").unwrap();
        assert_eq!(r.as_str(), "1234567890");
        assert_eq!(r.to_string(), "1234567890");
    }

    #[test]
    fn test_external_ref_rejects_empty_and_whitespace() {
        assert_eq!(ExternalRef::new(""), Err(TypeError::EmptyExternalRef));
        assert_eq!(
            ExternalRef::new("12 34"),
            Err(TypeError::ExternalRefInvalidChar(' '))
        );
        assert_eq!(
            ExternalRef::new("12\n"),
            Err(TypeError::ExternalRefInvalidChar('\n'))
        );
    }

    #[test]
    fn test_external_ref_length_bound() {
        let long = "9".repeat(MAX_EXTERNAL_REF_LEN + 1);
        assert_eq!(
            ExternalRef::new(long),
            Err(TypeError::ExternalRefTooLong { len: MAX_EXTERNAL_REF_LEN + 1, max: MAX_EXTERNAL_REF_LEN })
        );
        assert!(ExternalRef::with_limit("abc", 3).is_ok());
        assert!(ExternalRef::with_limit("abcd", 3).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let bad = bincode::serialize(&String::from("has space")).unwrap();
        assert!(bincode::deserialize::<ExternalRef>(&bad).is_err());

        let good = bincode::serialize(&String::from("t1")).unwrap();
        let r: ExternalRef = bincode::deserialize(&good).unwrap();
        assert_eq!(r.as_str(), "t1");
    }

    #[test]
    fn test_content_bounds() {
        assert!(PostContent::new("").is_ok());
        assert!(PostContent::new("This is a test tweet about #Monad").is_ok());
        let long = "x".repeat(MAX_CONTENT_LEN + 1);
        assert!(matches!(
            PostContent::new(long),
            Err(TypeError::ContentTooLong { .. })
        ));
    }
}
