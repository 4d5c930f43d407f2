//! 标识：库所 id 到令牌数的映射，按库所声明顺序保存。
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::net::structure::Weight;

/// Token distribution over places.
///
/// Counts are unsigned, so a negative count can never be observed. Every
/// value handed out by the engine is an owned copy; mutating it has no effect
/// on the engine that produced it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marking(IndexMap<String, Weight>);

impl Marking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens on `place`, 0 if it is not tracked.
    pub fn tokens(&self, place: &str) -> Weight {
        self.0.get(place).copied().unwrap_or(0)
    }

    pub fn set(&mut self, place: impl Into<String>, tokens: Weight) {
        self.0.insert(place.into(), tokens);
    }

    pub fn contains(&self, place: &str) -> bool {
        self.0.contains_key(place)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Weight)> {
        self.0.iter().map(|(place, tokens)| (place.as_str(), *tokens))
    }

    /// Sum of all tokens.
    pub fn total(&self) -> Weight {
        self.0.values().sum()
    }

    pub(crate) fn checked_sub(&mut self, place: &str, weight: Weight) -> Option<Weight> {
        let after = self.tokens(place).checked_sub(weight)?;
        self.set(place, after);
        Some(after)
    }

    pub(crate) fn checked_add(&mut self, place: &str, weight: Weight) -> Option<Weight> {
        let after = self.tokens(place).checked_add(weight)?;
        self.set(place, after);
        Some(after)
    }
}

impl FromIterator<(String, Weight)> for Marking {
    fn from_iter<I: IntoIterator<Item = (String, Weight)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, Weight)> for Marking {
    fn from_iter<I: IntoIterator<Item = (&'a str, Weight)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(place, tokens)| (place.to_owned(), tokens))
                .collect(),
        )
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (place, tokens) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", place, tokens)?;
            first = false;
        }
        Ok(())
    }
}
