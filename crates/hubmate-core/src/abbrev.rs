// ── Abbreviation engine ──
//
// Computes a minimal, collision-free short code per device name, so a
// one-line `/on kl` resolves to the Kitchen Light. Token-growth-then-
// shrink: each round appends every name's entire next token, then
// shrinks each working string back to the shortest prefix that is
// prefix-free against every other distinct working string. Names that
// run out of tokens keep their strings; names that still collide after
// full expansion keep their full concatenation and are reported as
// warnings rather than rejected.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbbrevError {
    #[error("Cannot register more names after finalize was called")]
    Finalized,

    #[error("Name already registered: {0}")]
    Duplicate(String),

    #[error("'{0}' was not registered with this engine")]
    NotRegistered(String),

    #[error("Abbreviations are not available until finalize is called")]
    NotFinalized,
}

struct Entry {
    /// Lowercased name, split on literal spaces. Hyphens and
    /// apostrophes are ordinary characters.
    tokens: Vec<String>,
    next_token: usize,
    working: String,
    /// Length (bytes) reached at the end of the previous round; the
    /// shrink pass only considers prefixes longer than this.
    prev_len: usize,
}

impl Entry {
    fn new(name: &str) -> Self {
        Self {
            tokens: name.split(' ').filter(|t| !t.is_empty()).map(String::from).collect(),
            next_token: 0,
            working: String::new(),
            prev_len: 0,
        }
    }

    fn exhausted(&self) -> bool {
        self.next_token >= self.tokens.len()
    }
}

/// Computes one abbreviation per registered name.
///
/// Deterministic for a fixed registration order; no randomness. Once
/// [`finalize`](Self::finalize) has run the engine is locked: no more
/// names may be registered.
#[derive(Default)]
pub struct AbbreviationEngine {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
    finalized: bool,
}

impl AbbreviationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name. Names are matched case-insensitively; an exact
    /// duplicate (after lowercasing) is rejected.
    pub fn register(&mut self, name: &str) -> Result<(), AbbrevError> {
        if self.finalized {
            return Err(AbbrevError::Finalized);
        }
        let key = name.to_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(AbbrevError::Duplicate(key));
        }
        self.entries.push(Entry::new(&key));
        self.by_name.insert(key, self.entries.len() - 1);
        Ok(())
    }

    /// Compute all abbreviations and lock the engine.
    ///
    /// Returns a warning per pair of names whose final strings are still
    /// prefixes of one another (possible only when one name's full
    /// token concatenation is a prefix of another's); such names keep
    /// their full concatenated strings.
    pub fn finalize(&mut self) -> Vec<String> {
        while self.entries.iter().any(|e| !e.exhausted()) {
            self.grow_round();
            self.shrink_round();
        }
        self.revert_colliders();
        self.finalized = true;
        self.collision_warnings()
    }

    /// The computed abbreviation for a registered name.
    pub fn abbreviation_of(&self, name: &str) -> Result<&str, AbbrevError> {
        if !self.finalized {
            return Err(AbbrevError::NotFinalized);
        }
        let key = name.to_lowercase();
        self.by_name
            .get(&key)
            .map(|&i| self.entries[i].working.as_str())
            .ok_or(AbbrevError::NotRegistered(key))
    }

    // ── Rounds ──────────────────────────────────────────────────────

    /// Append every non-exhausted name's entire next token.
    fn grow_round(&mut self) {
        for entry in &mut self.entries {
            if !entry.exhausted() {
                let token = &entry.tokens[entry.next_token];
                entry.working.push_str(token);
                entry.next_token += 1;
            }
        }
    }

    /// Shrink every working string back to the shortest prefix that is
    /// prefix-free against the other distinct working strings. Names
    /// sharing an identical working string share one cached result and
    /// do not collide with each other this round (later tokens will
    /// tell them apart).
    fn shrink_round(&mut self) {
        let all: HashSet<String> = self.entries.iter().map(|e| e.working.clone()).collect();
        let mut cache: HashMap<String, String> = HashMap::new();

        for entry in &mut self.entries {
            let grown = entry.working.clone();
            let shrunk = cache
                .entry(grown.clone())
                .or_insert_with(|| shortest_free_prefix(&grown, entry.prev_len, &all))
                .clone();
            entry.working = shrunk;
            entry.prev_len = entry.working.len();
        }
    }

    /// Reset every entry whose final string is still in a prefix
    /// relation with another's back to its full token concatenation. A
    /// collision can surface mid-round, after an earlier shrink already
    /// cut an entry down ("Porch Light" against "Porch" ends the rounds
    /// as "plight"/"p"); the unresolved pair keeps "porchlight"/"porch"
    /// instead. Reverting one entry can expose a new overlap with a
    /// third, so repeat until stable.
    fn revert_colliders(&mut self) {
        loop {
            let mut changed = false;
            for i in self.colliding_indices() {
                let full = self.entries[i].tokens.concat();
                if self.entries[i].working != full {
                    self.entries[i].working = full;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn colliding_indices(&self) -> HashSet<usize> {
        let mut out = HashSet::new();
        for i in 0..self.entries.len() {
            for j in (i + 1)..self.entries.len() {
                let a = &self.entries[i].working;
                let b = &self.entries[j].working;
                if a.starts_with(b.as_str()) || b.starts_with(a.as_str()) {
                    out.insert(i);
                    out.insert(j);
                }
            }
        }
        out
    }

    fn collision_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for i in 0..self.entries.len() {
            for j in (i + 1)..self.entries.len() {
                let a = &self.entries[i].working;
                let b = &self.entries[j].working;
                if a.starts_with(b.as_str()) || b.starts_with(a.as_str()) {
                    warnings.push(format!(
                        "unresolved abbreviation collision: '{}' ({}) and '{}' ({})",
                        a,
                        self.entries[i].tokens.join(" "),
                        b,
                        self.entries[j].tokens.join(" "),
                    ));
                }
            }
        }
        warnings
    }
}

/// The shortest prefix of `grown`, longer than `prev_len` bytes, that no
/// other string in `all` begins with and that begins with no other
/// string in `all`. Falls back to the whole string when every prefix
/// collides.
fn shortest_free_prefix(grown: &str, prev_len: usize, all: &HashSet<String>) -> String {
    for end in (prev_len + 1)..=grown.len() {
        if !grown.is_char_boundary(end) {
            continue;
        }
        let candidate = &grown[..end];
        let collides = all
            .iter()
            .any(|other| other != grown && (other.starts_with(candidate) || candidate.starts_with(other.as_str())));
        if !collides {
            return candidate.to_string();
        }
    }
    grown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalized(names: &[&str]) -> AbbreviationEngine {
        let mut engine = AbbreviationEngine::new();
        for name in names {
            engine.register(name).expect("register");
        }
        engine.finalize();
        engine
    }

    #[test]
    fn single_name_shrinks_to_initials() {
        let engine = finalized(&["Kitchen Light"]);
        assert_eq!(engine.abbreviation_of("kitchen light"), Ok("kl"));
    }

    #[test]
    fn non_colliding_names_get_initials() {
        let engine = finalized(&["Kitchen Light", "Bedroom Light", "Living Room Light"]);
        assert_eq!(engine.abbreviation_of("Kitchen Light"), Ok("kl"));
        assert_eq!(engine.abbreviation_of("bedroom light"), Ok("bl"));
        assert_eq!(engine.abbreviation_of("living room light"), Ok("lrl"));
    }

    #[test]
    fn shared_first_token_expands_second_token() {
        let engine = finalized(&["Main Bedroom Light", "Main Bathroom Light"]);
        let bed = engine.abbreviation_of("main bedroom light").expect("bed");
        let bath = engine.abbreviation_of("main bathroom light").expect("bath");

        assert_eq!(bed, "mbel");
        assert_eq!(bath, "mbal");
        assert!(bed.starts_with("mb") && bath.starts_with("mb"));
    }

    #[test]
    fn hyphens_and_apostrophes_are_ordinary_characters() {
        let engine = finalized(&["Kid's Room Light", "Living-Room Light"]);
        assert_eq!(engine.abbreviation_of("kid's room light"), Ok("krl"));
        assert_eq!(engine.abbreviation_of("living-room light"), Ok("ll"));
    }

    #[test]
    fn distinct_names_never_share_an_abbreviation() {
        let names = [
            "Kitchen Light",
            "Kitchen Cabinet Light",
            "Bedroom Light",
            "Bedroom Closet Light",
            "Back Porch Light",
            "Front Porch Light",
        ];
        let engine = finalized(&names);
        let mut seen = HashSet::new();
        for name in names {
            let abbr = engine.abbreviation_of(name).expect("abbr").to_string();
            assert!(seen.insert(abbr.clone()), "duplicate abbreviation {abbr}");
        }
    }

    #[test]
    fn full_prefix_collisions_are_reported_not_fatal() {
        let mut engine = AbbreviationEngine::new();
        engine.register("Sun").expect("register");
        engine.register("Sunroom Light").expect("register");
        let warnings = engine.finalize();

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("sun"), "warning names the collision: {warnings:?}");
        // Both keep their full concatenations.
        assert_eq!(engine.abbreviation_of("sun"), Ok("sun"));
        assert_eq!(engine.abbreviation_of("sunroom light"), Ok("sunroomlight"));
    }

    #[test]
    fn colliders_found_mid_round_keep_full_concatenations() {
        // "porch" collides with "porch light" only in the second round,
        // after both were already shrunk to "p"; the pair must still end
        // up with full concatenations, not the partially shrunk strings.
        let mut engine = AbbreviationEngine::new();
        engine.register("Porch Light").expect("register");
        engine.register("Porch").expect("register");
        let warnings = engine.finalize();

        assert_eq!(warnings.len(), 1);
        assert_eq!(engine.abbreviation_of("porch light"), Ok("porchlight"));
        assert_eq!(engine.abbreviation_of("porch"), Ok("porch"));
    }

    #[test]
    fn register_after_finalize_fails() {
        let mut engine = AbbreviationEngine::new();
        engine.finalize();
        assert_eq!(engine.register("New Device"), Err(AbbrevError::Finalized));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut engine = AbbreviationEngine::new();
        engine.register("Kitchen Light").expect("first");
        assert_eq!(
            engine.register("kitchen light"),
            Err(AbbrevError::Duplicate("kitchen light".into()))
        );
    }

    #[test]
    fn unregistered_name_fails() {
        let engine = finalized(&["Kitchen Light"]);
        assert_eq!(
            engine.abbreviation_of("Pantry Light"),
            Err(AbbrevError::NotRegistered("pantry light".into()))
        );
    }

    #[test]
    fn abbreviations_unavailable_before_finalize() {
        let mut engine = AbbreviationEngine::new();
        engine.register("Kitchen Light").expect("register");
        assert_eq!(
            engine.abbreviation_of("Kitchen Light"),
            Err(AbbrevError::NotFinalized)
        );
    }
}
