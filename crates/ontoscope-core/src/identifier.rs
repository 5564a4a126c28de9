//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type. Store identifiers (IRIs, prefixed
//! names, plain strings) are interned once, so every entity key in the
//! engine is a cheap `Copy` value that compares in constant time.
//!
//! Identifiers are canonicalized when they are interned through
//! [`Id::canonical`]: surrounding whitespace and trailing separators are
//! stripped, so `http://example.org/Person/` and `http://example.org/Person`
//! name the same entity.

use std::{
    cmp::Ordering,
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Characters that end a namespace and start a local name.
const SEPARATORS: [char; 3] = ['#', '/', ':'];

/// Characters stripped from the end of an identifier during canonicalization.
const TRAILING_SEPARATORS: [char; 2] = ['/', '#'];

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use ontoscope_core::identifier::Id;
///
/// let person = Id::new("http://example.org/Person");
/// assert_eq!(person, "http://example.org/Person");
/// assert_eq!(person.local_name(), "Person");
///
/// // Canonical ids ignore trailing separators
/// assert_eq!(Id::canonical(" http://example.org/Person/ "), person);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str, verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontoscope_core::identifier::Id;
    ///
    /// let id = Id::new("ex:Person");
    /// assert_eq!(id, "ex:Person");
    /// ```
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates the canonical `Id` for a raw store identifier.
    ///
    /// Whitespace around the identifier and any trailing `/` or `#` are
    /// removed before interning. An identifier made only of separators
    /// canonicalizes to the empty id.
    pub fn canonical(raw: &str) -> Self {
        Self::new(canonicalize(raw))
    }

    /// Returns the interned string as an owned `String`.
    pub fn as_string(&self) -> String {
        self.with_str(str::to_owned)
    }

    /// Returns the local name: the segment after the last `#`, `/` or `:`.
    ///
    /// Identifiers without any separator are returned whole.
    pub fn local_name(&self) -> String {
        self.with_str(|s| local_name(s).to_owned())
    }

    /// Returns `true` if the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        self.with_str(str::is_empty)
    }

    /// Runs `f` with the interned string, holding the interner lock once.
    pub fn with_str<T>(&self, f: impl FnOnce(&str) -> T) -> T {
        let interner = interner();
        let value = interner.resolve(self.0).unwrap_or_default();
        f(value)
    }

    /// Compares two identifiers by their string value.
    ///
    /// `Id` itself is ordered by nothing meaningful (interning order), so
    /// anything that needs a reproducible order goes through this.
    pub fn cmp_lexical(&self, other: &Id) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        let interner = interner();
        let left = interner.resolve(self.0).unwrap_or_default();
        let right = interner.resolve(other.0).unwrap_or_default();
        left.cmp(right)
    }
}

/// Strips surrounding whitespace and trailing separators from `raw`.
pub fn canonicalize(raw: &str) -> &str {
    raw.trim().trim_end_matches(TRAILING_SEPARATORS)
}

/// Returns the local name of a raw identifier string.
pub fn local_name(raw: &str) -> &str {
    let trimmed = canonicalize(raw);
    match trimmed.rfind(SEPARATORS) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| f.write_str(s))
    }
}

impl std::str::FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        self.with_str(|s| s == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("Person");
        let id2 = Id::new("Person");
        let id3 = Id::new("Place");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "Person");
    }

    #[test]
    fn test_canonical_strips_trailing_separators() {
        let plain = Id::canonical("http://example.org/Person");
        let slash = Id::canonical("http://example.org/Person/");
        let hash = Id::canonical("http://example.org/Person#");
        let padded = Id::canonical("  http://example.org/Person  ");

        assert_eq!(plain, slash);
        assert_eq!(plain, hash);
        assert_eq!(plain, padded);
        assert_eq!(plain, "http://example.org/Person");
    }

    #[test]
    fn test_canonical_only_separators_is_empty() {
        assert!(Id::canonical("//#").is_empty());
        assert!(Id::canonical("   ").is_empty());
    }

    #[test]
    fn test_local_name() {
        assert_eq!(Id::new("http://example.org/onto#Person").local_name(), "Person");
        assert_eq!(Id::new("http://example.org/people/alice").local_name(), "alice");
        assert_eq!(Id::new("ex:Person").local_name(), "Person");
        assert_eq!(Id::new("Person").local_name(), "Person");
        assert_eq!(local_name("http://example.org/Person/"), "Person");
    }

    #[test]
    fn test_cmp_lexical() {
        let a = Id::new("lex_b");
        let b = Id::new("lex_a");

        assert_eq!(a.cmp_lexical(&b), Ordering::Greater);
        assert_eq!(b.cmp_lexical(&a), Ordering::Less);
        assert_eq!(a.cmp_lexical(&a), Ordering::Equal);
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{}", id), "display_test");
        assert_eq!(id.as_string(), "display_test");
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "test_string".into();
        let id2 = Id::new("test_string");

        assert_eq!(id1, id2);
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str_ref() {
        let id = Id::new("Component");
        let name = String::from("Component");

        assert!(id == name.as_str());
        assert!(id != "Element");
    }
}
