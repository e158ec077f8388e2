//! Person-name normalization and identity matching.
//!
//! # Overview
//!
//! Names on the portal come in several spellings for the same person:
//! surname-first with a comma (`"Smith, John"`), with or without accents,
//! with tokens in a different order. There is no stable person id, so
//! identity is recomputed from the strings every run.
//!
//! [`unify`] decides whether two spellings denote the same person using a
//! token-multiset heuristic and, when they do, returns the canonical form
//! built from the second argument.
//!
//! # Matching rule
//!
//! Both names are lower-cased, stripped of diacritics, and split on
//! whitespace into token lists `T1` and `T2`. For every distinct token of
//! `T1` whose multiplicity is the same in both lists, that multiplicity is
//! added to a counter. Under [`MatchRule::Lenient`] the names match when the
//! counter equals `min(|T1|, |T2|)`.
//!
//! The lenient rule accepts a strict token subset: `"John"` matches
//! `"John Smith"`. Existing data relies on that (given name + both
//! surnames vs. given name + first surname), so it stays the default.
//! [`MatchRule::Exact`] additionally requires `|T1| == |T2|`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// How permissive [`unify_with`] is about token-count differences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchRule {
    /// Shorter name's tokens all found with equal multiplicity in the longer one.
    #[default]
    Lenient,
    /// Same token multiset on both sides.
    Exact,
}

/// Remove combining marks after canonical decomposition (`"Pérez"` → `"Perez"`).
#[must_use]
pub fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// Title-case text: a letter is upper-cased when the previous character is
/// not a letter and lower-cased otherwise (`"o'neil"` → `"O'Neil"`).
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Lower-cased, accent-free tokens of a name.
#[must_use]
pub fn tokens(name: &str) -> Vec<String> {
    strip_diacritics(&name.to_lowercase())
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Convert surname-first notation to given-name-first.
///
/// `"Smith, John"` becomes `"John Smith"`; names without a comma are
/// returned trimmed but otherwise untouched.
#[must_use]
pub fn reorder_surname_first(name: &str) -> String {
    if !name.contains(',') {
        return name.trim().to_string();
    }
    name.split(',')
        .rev()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decide whether two names denote the same person under [`MatchRule::Lenient`].
///
/// Returns the canonical form (the second name's normalized tokens, joined
/// and title-cased) on a match, `None` otherwise.
#[must_use]
pub fn unify(name1: &str, name2: &str) -> Option<String> {
    unify_with(name1, name2, MatchRule::Lenient)
}

/// [`unify`] with an explicit [`MatchRule`].
#[must_use]
pub fn unify_with(name1: &str, name2: &str, rule: MatchRule) -> Option<String> {
    let t1 = tokens(name1);
    let t2 = tokens(name2);
    if t1.is_empty() || t2.is_empty() {
        return None;
    }
    if rule == MatchRule::Exact && t1.len() != t2.len() {
        return None;
    }

    let c1 = multiplicities(&t1);
    let c2 = multiplicities(&t2);

    let counter: usize = c1
        .iter()
        .filter(|(word, n1)| c2.get(*word) == Some(*n1))
        .map(|(_, n1)| *n1)
        .sum();

    (counter == t1.len().min(t2.len())).then(|| title_case(&t2.join(" ")))
}

fn multiplicities(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::with_capacity(tokens.len());
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}
