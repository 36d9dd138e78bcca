//! Substitution maps used to rename CSS classes and ids.
//!
//! A substitution map is a string-to-string function that must be
//! **injective** (two distinct inputs never share an output) and **stable**
//! (the same input always yields the same output within one compilation).
//! Maps that generate names keep a cache so that both properties hold.

use std::collections::{BTreeMap, HashMap, HashSet};

/// A renaming function for class and id names.
pub trait SubstitutionMap {
    /// The replacement for `key`.
    fn get(&mut self, key: &str) -> String;
}

impl<M: SubstitutionMap + ?Sized> SubstitutionMap for Box<M> {
    fn get(&mut self, key: &str) -> String {
        (**self).get(key)
    }
}

// ============================================================================
// Identity / Simple
// ============================================================================

/// Maps every name to itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentitySubstitutionMap;

impl SubstitutionMap for IdentitySubstitutionMap {
    fn get(&mut self, key: &str) -> String {
        key.to_string()
    }
}

/// Appends an underscore to every name. Readable output for debugging.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleSubstitutionMap;

impl SubstitutionMap for SimpleSubstitutionMap {
    fn get(&mut self, key: &str) -> String {
        format!("{}_", key)
    }
}

// ============================================================================
// Minimal
// ============================================================================

const START_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_";

/// Generates the shortest unused names: `a`, `b`, ..., `Z`, `aa`, `ab`, ...
///
/// Names listed as reserved are never produced.
#[derive(Debug, Default)]
pub struct MinimalSubstitutionMap {
    next_index: u64,
    assigned: HashMap<String, String>,
    reserved: HashSet<String>,
}

impl MinimalSubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map that never generates any of `reserved`.
    pub fn with_reserved<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MinimalSubstitutionMap {
            reserved: reserved.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn generate(&mut self) -> String {
        loop {
            let candidate = Self::name_for(self.next_index);
            self.next_index += 1;
            if !self.reserved.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Bijective numbering: the first char comes from [`START_CHARS`], the
    /// remaining ones from [`CHARS`].
    fn name_for(index: u64) -> String {
        let start_len = START_CHARS.len() as u64;
        let chars_len = CHARS.len() as u64;
        let mut name = vec![START_CHARS[(index % start_len) as usize]];
        let mut rest = index / start_len;
        while rest > 0 {
            rest -= 1;
            name.push(CHARS[(rest % chars_len) as usize]);
            rest /= chars_len;
        }
        String::from_utf8_lossy(&name).into_owned()
    }
}

impl SubstitutionMap for MinimalSubstitutionMap {
    fn get(&mut self, key: &str) -> String {
        if let Some(existing) = self.assigned.get(key) {
            return existing.clone();
        }
        let name = self.generate();
        self.assigned.insert(key.to_string(), name.clone());
        name
    }
}

// ============================================================================
// Splitting
// ============================================================================

/// Renames each `-`-separated part of a name through an inner map.
///
/// `goog-menu-item` becomes `a-b-c` with a minimal inner map, so that shared
/// prefixes across class names shrink together.
#[derive(Debug, Default)]
pub struct SplittingSubstitutionMap<M> {
    inner: M,
}

impl<M: SubstitutionMap> SplittingSubstitutionMap<M> {
    pub fn new(inner: M) -> Self {
        SplittingSubstitutionMap { inner }
    }
}

impl<M: SubstitutionMap> SubstitutionMap for SplittingSubstitutionMap<M> {
    fn get(&mut self, key: &str) -> String {
        if key.is_empty() {
            return String::new();
        }
        key.split('-')
            .map(|part| {
                if part.is_empty() {
                    String::new()
                } else {
                    self.inner.get(part)
                }
            })
            .collect::<Vec<_>>()
            .join("-")
    }
}

// ============================================================================
// Recording
// ============================================================================

/// Wraps a map and records every mapping in first-use order.
///
/// The recorded table is what `--output-renaming-map` writes out.
#[derive(Debug, Default)]
pub struct RecordingSubstitutionMap<M> {
    inner: M,
    order: Vec<String>,
    mappings: HashMap<String, String>,
}

impl<M: SubstitutionMap> RecordingSubstitutionMap<M> {
    pub fn new(inner: M) -> Self {
        RecordingSubstitutionMap {
            inner,
            order: Vec::new(),
            mappings: HashMap::new(),
        }
    }

    /// Recorded `(original, renamed)` pairs in first-use order.
    pub fn mappings(&self) -> Vec<(&str, &str)> {
        self.order
            .iter()
            .filter_map(|key| {
                self.mappings
                    .get(key)
                    .map(|value| (key.as_str(), value.as_str()))
            })
            .collect()
    }

    /// The recorded table keyed by original name.
    pub fn renaming_map(&self) -> BTreeMap<String, String> {
        self.mappings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The recorded table as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.renaming_map())
    }
}

impl<M: SubstitutionMap> SubstitutionMap for RecordingSubstitutionMap<M> {
    fn get(&mut self, key: &str) -> String {
        if let Some(existing) = self.mappings.get(key) {
            return existing.clone();
        }
        let value = self.inner.get(key);
        self.order.push(key.to_string());
        self.mappings.insert(key.to_string(), value.clone());
        value
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_and_simple() {
        assert_eq!(IdentitySubstitutionMap.get("menu"), "menu");
        assert_eq!(SimpleSubstitutionMap.get("menu"), "menu_");
    }

    #[test]
    fn minimal_names_are_short_and_stable() {
        let mut map = MinimalSubstitutionMap::new();
        assert_eq!(map.get("first"), "a");
        assert_eq!(map.get("second"), "b");
        assert_eq!(map.get("first"), "a");
    }

    #[test]
    fn minimal_names_grow_after_alphabet() {
        assert_eq!(MinimalSubstitutionMap::name_for(51), "Z");
        assert_eq!(MinimalSubstitutionMap::name_for(52), "aa");
        assert_eq!(MinimalSubstitutionMap::name_for(53), "ba");
    }

    #[test]
    fn minimal_is_injective() {
        let mut map = MinimalSubstitutionMap::new();
        let outputs: HashSet<String> = (0..5000).map(|i| map.get(&format!("k{}", i))).collect();
        assert_eq!(outputs.len(), 5000);
    }

    #[test]
    fn minimal_skips_reserved() {
        let mut map = MinimalSubstitutionMap::with_reserved(["a", "c"]);
        assert_eq!(map.get("x"), "b");
        assert_eq!(map.get("y"), "d");
    }

    #[test]
    fn splitting_maps_parts() {
        let mut map = SplittingSubstitutionMap::new(MinimalSubstitutionMap::new());
        assert_eq!(map.get("goog-menu"), "a-b");
        assert_eq!(map.get("goog-menu-item"), "a-b-c");
        assert_eq!(map.get("menu"), "b");
    }

    #[test]
    fn recording_keeps_first_use_order() {
        let mut map = RecordingSubstitutionMap::new(SimpleSubstitutionMap);
        map.get("b");
        map.get("a");
        map.get("b");
        assert_eq!(map.mappings(), vec![("b", "b_"), ("a", "a_")]);
        let json = map.to_json().expect("json");
        assert!(json.contains("\"a\": \"a_\""));
    }
}
