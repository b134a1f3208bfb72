//! Literal text substitutions applied before re-synthesis.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An ordered list of `(old, new)` literal replacements.
///
/// Serialized as a JSON object; key order is preserved on input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifications {
    pairs: Vec<(String, String)>,
}

impl Modifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a replacement; an empty `old` is ignored.
    pub fn push(&mut self, old: impl Into<String>, new: impl Into<String>) {
        let old = old.into();
        if old.is_empty() {
            return;
        }
        self.pairs.push((old, new.into()));
    }

    pub fn with(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.push(old, new);
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(o, n)| (o.as_str(), n.as_str()))
    }

    /// Apply every replacement in order.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (old, new) in &self.pairs {
            if out.contains(old.as_str()) {
                out = out.replace(old.as_str(), new);
            }
        }
        out
    }

    /// Apply to every cell of a table.
    pub fn apply_to_rows(&self, rows: &[Vec<String>]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| self.apply(cell)).collect())
            .collect()
    }

    /// Parse a change list of `AVANT : old APRÈS : new ---` entries.
    ///
    /// Entries may be numbered. Surrounding brackets and quotes are stripped,
    /// `(pas de changement...)` notes are removed, and entries whose old and
    /// new text are equal are dropped.
    pub fn parse_change_list(text: &str) -> Self {
        static ENTRY: OnceLock<Option<Regex>> = OnceLock::new();
        static NOTE: OnceLock<Option<Regex>> = OnceLock::new();

        let entry = ENTRY.get_or_init(|| {
            Regex::new(r"(?is)(?:\d+\.\s*)?AVANT\s*:\s*(.+?)\s*APRÈS\s*:\s*(.+?)\s*---").ok()
        });
        let note = NOTE.get_or_init(|| Regex::new(r"(?i)\s*\(pas de changement.*?\)").ok());
        let (Some(entry), Some(note)) = (entry, note) else {
            return Self::default();
        };

        let mut mods = Self::default();
        for caps in entry.captures_iter(text) {
            let old = strip_decorations(&caps[1]);
            let new = strip_decorations(&caps[2]);
            let new = note.replace_all(&new, "").trim().to_string();

            if !old.is_empty() && !new.is_empty() && old != new {
                log::debug!("Change: {:?} -> {:?}", old, new);
                mods.push(old, new);
            }
        }
        mods
    }
}

fn strip_decorations(s: &str) -> String {
    s.trim()
        .trim_matches(|c| matches!(c, '[' | ']' | '"' | '\''))
        .to_string()
}

impl<O: Into<String>, N: Into<String>> FromIterator<(O, N)> for Modifications {
    fn from_iter<I: IntoIterator<Item = (O, N)>>(iter: I) -> Self {
        let mut mods = Self::default();
        for (old, new) in iter {
            mods.push(old, new);
        }
        mods
    }
}

impl Serialize for Modifications {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (old, new) in &self.pairs {
            map.serialize_entry(old, new)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Modifications {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = Modifications;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of old text to new text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Modifications, A::Error> {
                let mut mods = Modifications::default();
                while let Some((old, new)) = access.next_entry::<String, String>()? {
                    mods.push(old, new);
                }
                Ok(mods)
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}
