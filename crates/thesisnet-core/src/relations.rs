//! Author → supervisor relation extraction.
//!
//! Every (author, supervisor) pair of every record becomes one
//! [`Relation`]. Pairs are deduplicated by exact string equality; no further
//! normalization happens here, so the collection should go through
//! [`crate::clean`] first.
//!
//! [`RelationSet`] is backed by a `BTreeSet`, so iteration is always sorted
//! by author and then supervisor regardless of record order.

use std::collections::BTreeSet;
use std::collections::btree_set;

use serde::Serialize;
use tracing::instrument;

use crate::model::ThesisCollection;

/// "`author` wrote a thesis supervised by `supervisor`."
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Relation {
    pub author: String,
    pub supervisor: String,
}

impl Relation {
    pub fn new(author: impl Into<String>, supervisor: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            supervisor: supervisor.into(),
        }
    }

    /// `true` when a person is recorded as their own supervisor.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.author == self.supervisor
    }
}

/// Deduplicated, sorted set of relations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RelationSet {
    relations: BTreeSet<Relation>,
}

impl RelationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair. Returns `false` if it was already present.
    pub fn insert(&mut self, relation: Relation) -> bool {
        self.relations.insert(relation)
    }

    #[must_use]
    pub fn contains(&self, author: &str, supervisor: &str) -> bool {
        self.relations.contains(&Relation::new(author, supervisor))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Relation> {
        self.relations.iter()
    }

    /// Every name appearing on either side of a relation, sorted.
    #[must_use]
    pub fn people(&self) -> BTreeSet<&str> {
        self.relations
            .iter()
            .flat_map(|r| [r.author.as_str(), r.supervisor.as_str()])
            .collect()
    }
}

impl FromIterator<Relation> for RelationSet {
    fn from_iter<I: IntoIterator<Item = Relation>>(iter: I) -> Self {
        Self {
            relations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RelationSet {
    type Item = &'a Relation;
    type IntoIter = btree_set::Iter<'a, Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collect every (author, supervisor) pair in `collection`.
#[must_use]
#[instrument(skip(collection), fields(records = collection.len()))]
pub fn extract_relations(collection: &ThesisCollection) -> RelationSet {
    collection
        .records()
        .flat_map(|(_, _, record)| {
            record
                .directors
                .iter()
                .map(|supervisor| Relation::new(record.author.as_str(), supervisor.as_str()))
        })
        .collect()
}
