//! Author-name cleaning across a whole collection.
//!
//! # Overview
//!
//! Supervisor names arrive already normalized from the extraction step and
//! are used read-only as the reference set. Author names are normalized
//! here, in three steps per record:
//!
//! 1. strip diacritics;
//! 2. flip surname-first notation (`"Smith, John"` → `"John Smith"`) and
//!    title-case;
//! 3. try [`unify_with`] against every known supervisor and overwrite the
//!    author with the canonical form on a match.
//!
//! After cleaning, any author who also supervises is spelled exactly like
//! their supervisor entry, which is what lets relation extraction dedup by
//! plain string equality.
//!
//! # Ambiguity
//!
//! Supervisors are visited in sorted order and the last match wins, so the
//! outcome is deterministic but still depends on the spellings present.
//!
//! A canonical form can itself match a later supervisor (`"Ana Gil"` →
//! `"Ana Gil Perez"` → `"Gil Perez"`), so the last-match link is followed
//! until a form repeats. The result is the greatest form on that loop,
//! which makes cleaning idempotent. An author is *ambiguous* when the forms
//! matched along the way include more than one distinct canonical form.
//! [`AmbiguityPolicy::Reject`] turns that into an error.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::ErrorCode;
use crate::model::ThesisCollection;
use crate::names::{MatchRule, reorder_surname_first, strip_diacritics, title_case, unify_with};

/// What to do when an author matches several distinct supervisors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// Keep the canonical form of the last matching supervisor in sorted order.
    #[default]
    LastWins,
    /// Fail the run.
    Reject,
}

/// Errors from [`Cleaner::clean`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CleanError {
    #[error("author '{author}' of thesis {thesis_id} matches several supervisors: {}", .candidates.join(", "))]
    AmbiguousAuthor {
        thesis_id: String,
        author: String,
        candidates: Vec<String>,
    },
}

impl CleanError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::AmbiguousAuthor { .. } => ErrorCode::AmbiguousAuthor,
        }
    }
}

/// Counters collected during one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub records: usize,
    pub supervisors: usize,
    /// Authors written surname-first that were flipped.
    pub reordered: usize,
    /// Authors replaced by a supervisor's canonical spelling.
    pub unified: usize,
    /// Thesis ids whose author matched several distinct canonical forms.
    pub ambiguous: Vec<String>,
}

/// Author normalizer configured with a match rule and ambiguity policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cleaner {
    pub rule: MatchRule,
    pub ambiguity: AmbiguityPolicy,
}

impl Cleaner {
    #[must_use]
    pub const fn new(rule: MatchRule, ambiguity: AmbiguityPolicy) -> Self {
        Self { rule, ambiguity }
    }

    /// Normalize every author in `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::AmbiguousAuthor`] only under
    /// [`AmbiguityPolicy::Reject`].
    pub fn clean(&self, collection: ThesisCollection) -> Result<ThesisCollection, CleanError> {
        self.clean_with_report(collection).map(|(cleaned, _)| cleaned)
    }

    /// [`Cleaner::clean`], also returning what changed.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::AmbiguousAuthor`] only under
    /// [`AmbiguityPolicy::Reject`].
    #[instrument(skip(self, collection), fields(records = collection.len()))]
    pub fn clean_with_report(
        &self,
        mut collection: ThesisCollection,
    ) -> Result<(ThesisCollection, CleanReport), CleanError> {
        let supervisors = collection.supervisors();
        let mut report = CleanReport {
            supervisors: supervisors.len(),
            ..CleanReport::default()
        };
        let resolver = Resolver {
            supervisors: &supervisors,
            rule: self.rule,
        };

        for (_, thesis_id, record) in collection.records_mut() {
            report.records += 1;

            let stripped = strip_diacritics(&record.author);
            if stripped.contains(',') {
                report.reordered += 1;
            }
            let flipped = reorder_surname_first(&stripped);
            let before = title_case(&flipped);

            let resolved = resolver.resolve(&flipped);

            if let Some(found) = resolved.as_ref().filter(|r| r.candidates.len() > 1) {
                let candidates: Vec<String> = found.candidates.iter().cloned().collect();
                match self.ambiguity {
                    AmbiguityPolicy::Reject => {
                        return Err(CleanError::AmbiguousAuthor {
                            thesis_id: thesis_id.to_string(),
                            author: before,
                            candidates,
                        });
                    }
                    AmbiguityPolicy::LastWins => {
                        warn!(
                            thesis_id,
                            author = %before,
                            ?candidates,
                            chosen = %found.canonical,
                            "author matches several supervisors"
                        );
                        report.ambiguous.push(thesis_id.to_string());
                    }
                }
            }

            record.author = match resolved {
                Some(Resolution { canonical, .. }) => {
                    if canonical != before {
                        debug!(thesis_id, from = %before, to = %canonical, "author unified");
                        report.unified += 1;
                    }
                    canonical
                }
                None => before,
            };
        }

        Ok((collection, report))
    }
}

struct Resolution {
    canonical: String,
    /// Every distinct canonical form matched while resolving.
    candidates: BTreeSet<String>,
}

struct Resolver<'a> {
    supervisors: &'a BTreeSet<String>,
    rule: MatchRule,
}

impl Resolver<'_> {
    /// Canonical forms `name` unifies with, in supervisor order.
    fn matches(&self, name: &str) -> Vec<String> {
        self.supervisors
            .iter()
            .filter_map(|supervisor| unify_with(name, supervisor, self.rule))
            .collect()
    }

    /// Follow last-match links from `name` until a canonical form repeats.
    ///
    /// `None` when `name` matches no supervisor. Otherwise the greatest form
    /// on the repeating loop, so resolving the result again lands on the
    /// same loop and returns it unchanged.
    fn resolve(&self, name: &str) -> Option<Resolution> {
        let mut candidates = BTreeSet::new();
        let mut path: Vec<String> = Vec::new();
        let mut current = name.to_string();

        loop {
            let matches = self.matches(&current);
            let Some(next) = matches.last().cloned() else {
                break;
            };
            candidates.extend(matches);

            if let Some(start) = path.iter().position(|seen| *seen == next) {
                let canonical = path[start..].iter().max().cloned().unwrap_or(next);
                return Some(Resolution {
                    canonical,
                    candidates,
                });
            }
            path.push(next.clone());
            current = next;
        }

        path.pop().map(|canonical| Resolution {
            canonical,
            candidates,
        })
    }
}

/// Clean with the default rule and policy.
///
/// # Errors
///
/// Never fails under the default [`AmbiguityPolicy::LastWins`]; the
/// `Result` mirrors [`Cleaner::clean`].
pub fn clean(collection: ThesisCollection) -> Result<ThesisCollection, CleanError> {
    Cleaner::default().clean(collection)
}
