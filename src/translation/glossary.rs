/*!
 * Terminology glossary.
 *
 * A glossary maps a source term to the target term every translation must
 * use. It is both handed to providers as a hint and re-applied to their output
 * as literal substring replacement.
 */

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered source-term -> target-term mapping.
///
/// Keys are unique. Iteration order is insertion order (JSON object order when
/// deserialized); re-inserting a key replaces its target but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary {
    entries: Vec<(String, String)>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a term.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let source = source.into();
        let target = target.into();
        match self.entries.iter_mut().find(|(s, _)| *s == source) {
            Some(entry) => entry.1 = target,
            None => self.entries.push((source, target)),
        }
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Terms in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    /// Replace every occurrence of each source term with its target term.
    ///
    /// Replacements run one term at a time in insertion order and are chained:
    /// a later term can match text produced by an earlier replacement, and an
    /// earlier short key can shadow a later overlapping one. Order the glossary
    /// accordingly (longer keys first) when keys overlap.
    pub fn apply(&self, text: &str) -> String {
        self.entries
            .iter()
            .filter(|(source, _)| !source.is_empty())
            .fold(text.to_string(), |acc, (source, target)| {
                acc.replace(source.as_str(), target)
            })
    }

    /// One `source -> target` line per term, as embedded in local prompts
    pub fn hint_lines(&self) -> String {
        self.entries
            .iter()
            .map(|(s, t)| format!("{} -> {}", s, t))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for Glossary {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut glossary = Glossary::new();
        for (s, t) in iter {
            glossary.insert(s, t);
        }
        glossary
    }
}

/// Apply an optional glossary; `None` leaves the text untouched.
pub fn apply_glossary(text: &str, glossary: Option<&Glossary>) -> String {
    match glossary {
        Some(g) if !g.is_empty() => g.apply(text),
        _ => text.to_string(),
    }
}

impl Serialize for Glossary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (s, t) in &self.entries {
            map.serialize_entry(s, t)?;
        }
        map.end()
    }
}

struct GlossaryVisitor;

impl<'de> Visitor<'de> for GlossaryVisitor {
    type Value = Glossary;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of source terms to target terms")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Glossary, A::Error> {
        let mut glossary = Glossary::new();
        while let Some((source, target)) = access.next_entry::<String, String>()? {
            glossary.insert(source, target);
        }
        Ok(glossary)
    }
}

impl<'de> Deserialize<'de> for Glossary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GlossaryVisitor)
    }
}
