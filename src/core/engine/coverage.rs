//! Mapping coverage: how many assessment mappings reference each code

use crate::core::models::{Assessment, MappingKind};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Counts keyed by code, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeCounts {
    entries: Vec<(String, usize)>,
}

impl CodeCounts {
    /// Count for `code`; 0 when it never appeared
    #[must_use]
    pub fn get(&self, code: &str) -> usize {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map_or(0, |(_, n)| *n)
    }

    /// `(code, count)` pairs in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(c, n)| (c.as_str(), *n))
    }

    /// Number of distinct codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no code was counted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return a copy with `code` counted once more
    #[must_use]
    pub fn increment(mut self, code: &str) -> Self {
        match self.entries.iter_mut().find(|(c, _)| c == code) {
            Some((_, n)) => *n += 1,
            None => self.entries.push((code.to_string(), 1)),
        }
        self
    }
}

impl Serialize for CodeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, count) in &self.entries {
            map.serialize_entry(code, count)?;
        }
        map.end()
    }
}

/// Count mapping entries per code across assessments.
///
/// `selector` picks the codes of one mapping list from an assessment; every
/// entry it yields counts once. Two assessments each mapping `GA1` give
/// `GA1 → 2` whatever their weightages.
pub fn coverage_by_code<'a, F, I>(assessments: &'a [Assessment], selector: F) -> CodeCounts
where
    F: Fn(&'a Assessment) -> I,
    I: IntoIterator<Item = &'a str>,
{
    assessments
        .iter()
        .flat_map(selector)
        .fold(CodeCounts::default(), CodeCounts::increment)
}

/// Coverage of one of the standard mapping lists
#[must_use]
pub fn coverage(assessments: &[Assessment], kind: MappingKind) -> CodeCounts {
    coverage_by_code(assessments, |a| a.mapping_codes(kind))
}
