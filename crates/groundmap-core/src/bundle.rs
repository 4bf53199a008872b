//! Identifier bundles: everything known about one agent's identity.
//!
//! A bundle maps a namespace tag (`TEXT`, `UP`, `HGNC`, ...) to one identifier.
//! The raw extracted text lives under [`TEXT`]; a bundle holding nothing else
//! is *ungrounded*.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Namespace of the raw text the reader extracted.
pub const TEXT: &str = "TEXT";
/// Namespace whose value is used verbatim as the preferred display name.
pub const INDRA: &str = "INDRA";
/// Protein accession namespace consulted for curated names.
pub const UP: &str = "UP";
/// Placeholder meaning "absent" in delimited resources.
pub const NONE_PLACEHOLDER: &str = "None";

/// Whether a delimited field carries no value.
pub fn is_absent_field(field: &str) -> bool {
    field.is_empty() || field == NONE_PLACEHOLDER
}

/// An immutable namespace → identifier mapping.
///
/// Ordering and hashing ignore insertion order, so two bundles with the same
/// pairs are the same bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierBundle(BTreeMap<String, String>);

impl IdentifierBundle {
    /// A bundle carrying only the extracted text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut refs = BTreeMap::new();
        refs.insert(TEXT.to_string(), text.into());
        Self(refs)
    }

    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.0.get(namespace).map(String::as_str)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.0.contains_key(namespace)
    }

    pub fn text(&self) -> Option<&str> {
        self.get(TEXT)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Only the raw-text namespace is populated.
    pub fn is_ungrounded(&self) -> bool {
        self.0.len() == 1 && self.contains(TEXT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs other than the raw text, in namespace order.
    pub fn groundings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(ns, _)| *ns != TEXT)
    }

    /// Returns a copy with `namespace` set to `id`. The receiver is untouched.
    pub fn with(&self, namespace: impl Into<String>, id: impl Into<String>) -> Self {
        let mut refs = self.0.clone();
        refs.insert(namespace.into(), id.into());
        Self(refs)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IdentifierBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for IdentifierBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (ns, id)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ns}: {id}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_only_bundle_is_ungrounded() {
        let b = IdentifierBundle::from_text("ROS");
        assert!(b.is_ungrounded());
        assert_eq!(b.text(), Some("ROS"));
        assert!(!b.with(UP, "P00533").is_ungrounded());
    }

    #[test]
    fn bundle_without_text_is_not_ungrounded() {
        let b: IdentifierBundle = [(UP, "P00533")].into_iter().collect();
        assert!(!b.is_ungrounded());
        assert_eq!(b.text(), None);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a: IdentifierBundle = [(TEXT, "x"), (UP, "P1")].into_iter().collect();
        let b: IdentifierBundle = [(UP, "P1"), (TEXT, "x")].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "{TEXT: x, UP: P1}");
    }

    #[test]
    fn with_leaves_original_untouched() {
        let a = IdentifierBundle::from_text("x");
        let b = a.with(UP, "P1");
        assert_eq!(a.len(), 1);
        assert_eq!(b.groundings().collect::<Vec<_>>(), vec![(UP, "P1")]);
    }

    #[test]
    fn absent_fields() {
        assert!(is_absent_field(""));
        assert!(is_absent_field("None"));
        assert!(!is_absent_field("none"));
    }
}
