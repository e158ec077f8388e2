//! Thesis record model.
//!
//! A [`ThesisCollection`] groups records by year (free text, as scraped) and
//! then by thesis id (`"{year}-{n}"`). Identity is positional: two records
//! with identical content but different ids are distinct theses.
//!
//! Both levels are `BTreeMap`s so every traversal of a collection is
//! deterministic. Years are compared as strings, not numbers.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One doctoral thesis as listed on the research portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThesisRecord {
    pub title: String,
    pub author: String,
    /// Supervisors in the order the portal lists them.
    pub directors: Vec<String>,
}

impl ThesisRecord {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        directors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            directors: directors.into_iter().map(Into::into).collect(),
        }
    }
}

/// Theses of a single year, keyed by thesis id.
pub type YearTheses = BTreeMap<String, ThesisRecord>;

/// All scraped theses: year → thesis id → record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThesisCollection {
    years: BTreeMap<String, YearTheses>,
}

impl ThesisCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a thesis id in the portal convention.
    #[must_use]
    pub fn thesis_id(year: &str, sequence: usize) -> String {
        format!("{year}-{sequence}")
    }

    /// Insert or replace a record. Returns the previous record under that id.
    pub fn insert(
        &mut self,
        year: impl Into<String>,
        thesis_id: impl Into<String>,
        record: ThesisRecord,
    ) -> Option<ThesisRecord> {
        self.years
            .entry(year.into())
            .or_default()
            .insert(thesis_id.into(), record)
    }

    #[must_use]
    pub fn get(&self, year: &str, thesis_id: &str) -> Option<&ThesisRecord> {
        self.years.get(year)?.get(thesis_id)
    }

    /// Years present in the collection, in string order.
    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.years.keys().map(String::as_str)
    }

    /// Total number of records across all years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.years.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(year, thesis_id, record)` in year then id order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &str, &ThesisRecord)> {
        self.years.iter().flat_map(|(year, theses)| {
            theses
                .iter()
                .map(move |(id, record)| (year.as_str(), id.as_str(), record))
        })
    }

    /// Mutable variant of [`ThesisCollection::records`].
    pub fn records_mut(&mut self) -> impl Iterator<Item = (&str, &str, &mut ThesisRecord)> {
        self.years.iter_mut().flat_map(|(year, theses)| {
            theses
                .iter_mut()
                .map(move |(id, record)| (year.as_str(), id.as_str(), record))
        })
    }

    /// Every distinct supervisor name across the collection.
    #[must_use]
    pub fn supervisors(&self) -> BTreeSet<String> {
        self.records()
            .flat_map(|(_, _, record)| record.directors.iter().cloned())
            .collect()
    }
}

impl FromIterator<(String, String, ThesisRecord)> for ThesisCollection {
    fn from_iter<I: IntoIterator<Item = (String, String, ThesisRecord)>>(iter: I) -> Self {
        let mut collection = Self::new();
        for (year, id, record) in iter {
            collection.insert(year, id, record);
        }
        collection
    }
}
