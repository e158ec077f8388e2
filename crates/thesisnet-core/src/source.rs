//! Where thesis collections come from.
//!
//! # Overview
//!
//! Two seams feed the pipeline:
//!
//! - [`PortalSession`]: a live browser session on the research portal,
//!   implemented outside this crate. [`scrape`] takes the session by value,
//!   so whatever the implementor tears down in `Drop` (browser process,
//!   driver connection) is released as soon as scraping returns, on success
//!   or failure.
//! - [`ThesisSource`]: anything that can hand over a ready collection. The
//!   persisted JSON document is the usual one ([`JsonFileSource`]).
//!
//! The free-text parsing the portal requires (director lists, thesis ids)
//! lives here so browser drivers only deal with DOM text.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::error::ErrorCode;
use crate::model::{ThesisCollection, ThesisRecord};
use crate::names::{strip_diacritics, title_case};
use crate::store::{self, StoreError};

const DIRECTED_BY: &str = "dirigida por ";
const DIRECTOR_SEPARATOR: &str = " y ";

/// Errors from a thesis source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("portal session failed: {0}")]
    Session(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SourceError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Session(_) => ErrorCode::SourceFailed,
            Self::Store(err) => err.code(),
        }
    }
}

/// One thesis entry as rendered on the page, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawThesis {
    pub title: String,
    pub author: String,
    /// The directors block verbatim, e.g. `"Dirigida por Ana Ruiz y Luis Gil"`.
    pub directors_text: String,
}

/// A year heading and the theses listed under it, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGroup {
    pub year: String,
    pub entries: Vec<RawThesis>,
}

/// A live session on the portal's thesis listing.
pub trait PortalSession {
    /// Keep pressing the "load more" control until it disappears.
    ///
    /// Returns how many times it was pressed.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Session`] if the page cannot be driven.
    fn expand_all(&mut self) -> Result<usize, SourceError>;

    /// Read every year group currently rendered.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Session`] if the page cannot be read.
    fn year_groups(&mut self) -> Result<Vec<YearGroup>, SourceError>;
}

/// Anything that can produce a complete collection.
pub trait ThesisSource {
    /// # Errors
    ///
    /// Implementation-specific; see [`SourceError`].
    fn load(&mut self) -> Result<ThesisCollection, SourceError>;
}

/// A persisted thesis document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ThesisSource for JsonFileSource {
    fn load(&mut self) -> Result<ThesisCollection, SourceError> {
        Ok(store::load_collection(&self.path)?)
    }
}

/// Split a directors block into individual, title-cased names.
///
/// The block is lower-cased and stripped of diacritics, the leading
/// `"dirigida por "` marker is dropped, and names are separated on `" y "`.
#[must_use]
pub fn parse_directors(text: &str) -> Vec<String> {
    let lowered = strip_diacritics(&text.to_lowercase());
    let start = lowered.trim_start();
    let body = start.strip_prefix(DIRECTED_BY).unwrap_or(start);
    body.split(DIRECTOR_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(title_case)
        .collect()
}

/// Turn scraped year groups into a collection with `"{year}-{n}"` ids.
#[must_use]
pub fn assemble(groups: Vec<YearGroup>) -> ThesisCollection {
    let mut collection = ThesisCollection::new();
    for group in groups {
        for (i, raw) in group.entries.into_iter().enumerate() {
            let id = ThesisCollection::thesis_id(&group.year, i + 1);
            let record = ThesisRecord {
                title: raw.title,
                author: raw.author,
                directors: parse_directors(&raw.directors_text),
            };
            collection.insert(group.year.clone(), id, record);
        }
    }
    collection
}

/// Drive a portal session to completion and assemble its content.
///
/// The session is consumed and dropped before this returns.
///
/// # Errors
///
/// Propagates any [`SourceError`] from the session.
#[instrument(skip(session))]
pub fn scrape<S: PortalSession>(mut session: S) -> Result<ThesisCollection, SourceError> {
    let clicks = session.expand_all()?;
    debug!(clicks, "listing fully expanded");
    let groups = session.year_groups()?;
    drop(session);

    let collection = assemble(groups);
    info!(records = collection.len(), "portal scraped");
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn parses_two_directors() {
        assert_eq!(
            parse_directors("Dirigida por JOSÉ PÉREZ y Ana María Ruiz"),
            vec!["Jose Perez".to_string(), "Ana Maria Ruiz".to_string()]
        );
    }

    #[test]
    fn parses_single_director_without_marker() {
        assert_eq!(parse_directors("  luis gil  "), vec!["Luis Gil".to_string()]);
    }

    #[test]
    fn empty_block_has_no_directors() {
        assert!(parse_directors("Dirigida por ").is_empty());
    }

    #[test]
    fn assemble_numbers_from_one_in_page_order() {
        let groups = vec![YearGroup {
            year: "2022".to_string(),
            entries: vec![
                RawThesis {
                    title: "First".to_string(),
                    author: "Ruiz, Ana".to_string(),
                    directors_text: "Dirigida por Luis Gil".to_string(),
                },
                RawThesis {
                    title: "Second".to_string(),
                    author: "Bo Li".to_string(),
                    directors_text: "Dirigida por Luis Gil y Jane Doe".to_string(),
                },
            ],
        }];

        let c = assemble(groups);
        assert_eq!(c.get("2022", "2022-1").map(|r| r.title.as_str()), Some("First"));
        let second = c.get("2022", "2022-2").unwrap();
        assert_eq!(second.directors, vec!["Luis Gil", "Jane Doe"]);
        // Authors are left raw for the cleaner.
        assert_eq!(c.get("2022", "2022-1").unwrap().author, "Ruiz, Ana");
    }

    struct FakeSession {
        fail: bool,
        dropped: Rc<Cell<bool>>,
    }

    impl PortalSession for FakeSession {
        fn expand_all(&mut self) -> Result<usize, SourceError> {
            if self.fail {
                Err(SourceError::Session("load more button never settled".to_string()))
            } else {
                Ok(3)
            }
        }

        fn year_groups(&mut self) -> Result<Vec<YearGroup>, SourceError> {
            Ok(vec![YearGroup {
                year: "2021".to_string(),
                entries: vec![RawThesis {
                    title: "T".to_string(),
                    author: "A".to_string(),
                    directors_text: "Dirigida por B".to_string(),
                }],
            }])
        }
    }

    impl Drop for FakeSession {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    #[test]
    fn scrape_releases_session_on_success() {
        let dropped = Rc::new(Cell::new(false));
        let session = FakeSession {
            fail: false,
            dropped: Rc::clone(&dropped),
        };
        let c = scrape(session).unwrap();
        assert_eq!(c.len(), 1);
        assert!(dropped.get());
    }

    #[test]
    fn scrape_releases_session_on_failure() {
        let dropped = Rc::new(Cell::new(false));
        let session = FakeSession {
            fail: true,
            dropped: Rc::clone(&dropped),
        };
        let err = scrape(session).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SourceFailed);
        assert!(dropped.get());
    }

    #[test]
    fn json_source_reports_missing_file() {
        let mut source = JsonFileSource::new("/definitely/not/here/thesis.json");
        let err = source.load().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InputUnreadable);
    }
}
