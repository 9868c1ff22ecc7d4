//! Doodle identifiers.
//!
//! Every doodle is named `{Class}_{n}` where `n` counts up per class inside
//! one drawing. Names are interned so the id itself is a 4-byte `Copy` key.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// An interned doodle name such as `Lens_4`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoodleId(Spur);

impl DoodleId {
    /// Intern an arbitrary name. Used for ids read back from storage.
    pub fn intern(name: &str) -> Self {
        DoodleId(NAMES.get_or_intern(name))
    }

    /// The `number`-th id of `class`.
    pub fn numbered(class: &str, number: u32) -> Self {
        Self::intern(&format!("{class}_{number}"))
    }

    /// Lowest-free id of `class` given the ids already in use: one past the
    /// largest number `class` has handed out, or `{class}_0`.
    pub fn next_free(class: &str, taken: impl IntoIterator<Item = DoodleId>) -> Self {
        let next = taken
            .into_iter()
            .filter(|id| id.class() == class)
            .filter_map(|id| id.number())
            .max()
            .map_or(0, |n| n.saturating_add(1));
        Self::numbered(class, next)
    }

    pub fn as_str(&self) -> &str {
        NAMES.resolve(&self.0)
    }

    /// Class part of the name; the whole name when there is no `_n` suffix.
    pub fn class(&self) -> &str {
        match self.split() {
            Some((class, _)) => class,
            None => self.as_str(),
        }
    }

    /// Numeric suffix, if the name has one.
    pub fn number(&self) -> Option<u32> {
        self.split().map(|(_, n)| n)
    }

    fn split(&self) -> Option<(&str, u32)> {
        let (class, n) = self.as_str().rsplit_once('_')?;
        Some((class, n.parse().ok()?))
    }
}

impl fmt::Debug for DoodleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DoodleId({})", self.as_str())
    }
}

impl fmt::Display for DoodleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl Serialize for DoodleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DoodleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        if name.is_empty() {
            return Err(serde::de::Error::custom("empty doodle id"));
        }
        Ok(DoodleId::intern(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_name_same_id() {
        let a = DoodleId::intern("Lens_0");
        assert_eq!(a, DoodleId::numbered("Lens", 0));
        assert_eq!(a.class(), "Lens");
        assert_eq!(a.number(), Some(0));
    }

    #[test]
    fn numbering_is_per_class() {
        let taken = [
            DoodleId::numbered("Pulse", 0),
            DoodleId::numbered("Pulse", 1),
            DoodleId::numbered("PulseTrace", 7),
        ];
        assert_eq!(DoodleId::next_free("Pulse", taken), DoodleId::numbered("Pulse", 2));
        assert_eq!(DoodleId::next_free("Lens", taken), DoodleId::numbered("Lens", 0));
    }

    #[test]
    fn loaded_suffixes_are_skipped() {
        let taken = [DoodleId::intern("Lens_41"), DoodleId::intern("Lens_x")];
        assert_eq!(DoodleId::next_free("Lens", taken).as_str(), "Lens_42");
    }

    #[test]
    fn class_with_underscore() {
        let id = DoodleId::numbered("Cup_Disc", 3);
        assert_eq!(id.class(), "Cup_Disc");
        assert_eq!(id.number(), Some(3));
        assert_eq!(DoodleId::intern("Loose").class(), "Loose");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(serde_json::from_str::<DoodleId>("\"\"").is_err());
        let id: DoodleId = serde_json::from_str("\"Drusen_2\"").unwrap();
        assert_eq!(id.number(), Some(2));
    }
}
