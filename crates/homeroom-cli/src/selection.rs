//! Building a session from selection files and `--select` flags
//!
//! File format (YAML or JSON, chosen by extension):
//!
//! ```yaml
//! students: 3
//! selections:
//!   "Student 1": [responsibility, consideration]
//!   "Student 3": [courage]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use homeroom_core::{LabelParseError, SelectionState, SessionError, StudentLabel, Taxonomy};
use serde::Deserialize;
use tracing::warn;

/// Errors while reading selections
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// Selection file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid JSON selection file
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid YAML selection file
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Extension is neither JSON nor YAML
    #[error("unsupported selection file '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    /// `--select` value without `LABEL=keywords` shape
    #[error("malformed selection '{0}' (expected LABEL=kw1,kw2)")]
    Malformed(String),

    /// Bad student label
    #[error(transparent)]
    Label(#[from] LabelParseError),

    /// Label outside the session
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Contents of a selection file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionFile {
    /// Number of students, if the file fixes it
    pub students: Option<usize>,
    /// Keywords per student
    pub selections: BTreeMap<StudentLabel, Vec<String>>,
}

impl SelectionFile {
    /// Read a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    /// - `SelectionError::UnsupportedFormat` for other extensions
    /// - `SelectionError::Io` / `Json` / `Yaml` on read or parse failure
    pub fn load(path: &Path) -> Result<Self, SelectionError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let is_json = match extension.as_deref() {
            Some("json") => true,
            Some("yaml" | "yml") => false,
            _ => return Err(SelectionError::UnsupportedFormat(path.to_path_buf())),
        };

        let text = std::fs::read_to_string(path).map_err(|source| SelectionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if is_json {
            serde_json::from_str(&text).map_err(|source| SelectionError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_yaml::from_str(&text).map_err(|source| SelectionError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Highest label mentioned, if any
    #[must_use]
    pub fn highest_label(&self) -> Option<StudentLabel> {
        self.selections.keys().next_back().copied()
    }
}

/// Parse one `--select LABEL=kw1,kw2` value.
///
/// Keywords are trimmed and blanks dropped; case is normalized later by
/// [`SessionInput::into_session`].
///
/// # Errors
/// - `SelectionError::Malformed` without `=`
/// - `SelectionError::Label` for a bad label
pub fn parse_select(value: &str) -> Result<(StudentLabel, Vec<String>), SelectionError> {
    let (label, keywords) = value
        .split_once('=')
        .ok_or_else(|| SelectionError::Malformed(value.to_string()))?;
    let label: StudentLabel = label.parse()?;
    let keywords = keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    Ok((label, keywords))
}

/// Inputs for assembling a session
#[derive(Debug, Clone, Default)]
pub struct SessionInput {
    /// `--students`, overrides the file
    pub students: Option<usize>,
    /// Parsed selection file
    pub file: Option<SelectionFile>,
    /// Parsed `--select` flags, applied after the file
    pub selects: Vec<(StudentLabel, Vec<String>)>,
}

impl SessionInput {
    /// Build the session.
    ///
    /// Student count comes from `--students`, then the file's `students`.
    /// Otherwise it is `default_students`, grown to cover the highest label
    /// the file mentions. A later selection for the same student replaces an
    /// earlier one. Keywords from every source are trimmed and lowercased
    /// before matching against the taxonomy.
    ///
    /// # Errors
    /// - `SelectionError::Session` if a selection names a student past the count
    pub fn into_session(self, default_students: usize) -> Result<SelectionState, SelectionError> {
        let count = self
            .students
            .or_else(|| self.file.as_ref().and_then(|f| f.students))
            .unwrap_or_else(|| {
                let highest = self
                    .file
                    .as_ref()
                    .and_then(SelectionFile::highest_label)
                    .map_or(0, |l| l.number());
                default_students.max(highest)
            });
        let mut session = SelectionState::new(count);

        let from_file = self.file.into_iter().flat_map(|f| f.selections);
        for (label, keywords) in from_file.chain(self.selects) {
            let keywords = normalize(&keywords);
            let (_, rejected) = Taxonomy::global().partition(&keywords);
            if !rejected.is_empty() {
                warn!(%label, ?rejected, "ignoring unknown keywords");
            }
            session.set_keywords(label, &keywords)?;
        }
        Ok(session)
    }
}

fn normalize(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn label(n: usize) -> StudentLabel {
        StudentLabel::new(n).unwrap()
    }

    #[test]
    fn select_flag_parsing() {
        let (l, kws) = parse_select("Student 2= Courage , drive,,").unwrap();
        assert_eq!(l, label(2));
        assert_eq!(kws, vec!["Courage", "drive"]);

        let (l, kws) = parse_select("3=").unwrap();
        assert_eq!(l, label(3));
        assert!(kws.is_empty());
    }

    #[test]
    fn select_flag_errors() {
        assert!(matches!(parse_select("courage"), Err(SelectionError::Malformed(_))));
        assert!(matches!(
            parse_select("Student 0=courage"),
            Err(SelectionError::Label(LabelParseError::Zero))
        ));
        assert!(matches!(
            parse_select("Pupil 1=courage"),
            Err(SelectionError::Label(LabelParseError::Malformed(_)))
        ));
    }

    #[test]
    fn count_precedence() {
        let file = SelectionFile {
            students: Some(4),
            selections: BTreeMap::new(),
        };
        let from_flag = SessionInput {
            students: Some(2),
            file: Some(file.clone()),
            selects: Vec::new(),
        };
        assert_eq!(from_flag.into_session(1).unwrap().student_count(), 2);

        let from_file = SessionInput {
            file: Some(file),
            ..SessionInput::default()
        };
        assert_eq!(from_file.into_session(1).unwrap().student_count(), 4);

        assert_eq!(SessionInput::default().into_session(3).unwrap().student_count(), 3);
    }

    #[test]
    fn uncounted_file_grows_to_highest_label() {
        let mut selections = BTreeMap::new();
        selections.insert(label(5), vec!["wit".to_string()]);
        let input = SessionInput {
            file: Some(SelectionFile {
                students: None,
                selections,
            }),
            ..SessionInput::default()
        };
        let session = input.into_session(1).unwrap();
        assert_eq!(session.student_count(), 5);
        assert!(session.slot(label(5)).unwrap().has_keywords());
    }

    #[test]
    fn flags_override_file_and_unknown_keywords_drop() {
        let mut selections = BTreeMap::new();
        selections.insert(label(1), vec!["courage".to_string()]);
        selections.insert(label(2), vec!["wit".to_string(), "telepathy".to_string()]);
        let input = SessionInput {
            students: Some(2),
            file: Some(SelectionFile {
                students: None,
                selections,
            }),
            selects: vec![(label(1), vec!["drive".to_string()])],
        };

        let session = input.into_session(1).unwrap();
        assert_eq!(session.slot(label(1)).unwrap().keyword_list(), "drive");
        assert_eq!(session.slot(label(2)).unwrap().keyword_list(), "wit");
    }

    #[test]
    fn file_and_flag_keywords_are_normalized_alike() {
        let mut selections = BTreeMap::new();
        selections.insert(label(1), vec![" Courage ".to_string(), "WIT".to_string()]);
        let (flag_label, flag_keywords) = parse_select("2=Courage, Wit").unwrap();
        let input = SessionInput {
            students: Some(2),
            file: Some(SelectionFile {
                students: None,
                selections,
            }),
            selects: vec![(flag_label, flag_keywords)],
        };

        let session = input.into_session(1).unwrap();
        assert_eq!(session.slot(label(1)).unwrap().keyword_list(), "courage, wit");
        assert_eq!(session.slot(label(2)).unwrap().keyword_list(), "courage, wit");
    }

    #[test]
    fn selection_past_count_is_rejected() {
        let input = SessionInput {
            students: Some(1),
            file: None,
            selects: vec![(label(2), vec!["wit".to_string()])],
        };
        assert!(matches!(input.into_session(1), Err(SelectionError::Session(_))));
    }

    proptest::proptest! {
        #[test]
        fn prop_select_round_trips(number in 1usize..500, keywords in proptest::collection::vec("[a-z]{1,12}", 0..6)) {
            let value = format!("Student {number}={}", keywords.join(","));
            let (parsed, parsed_keywords) = parse_select(&value).unwrap();
            proptest::prop_assert_eq!(parsed, label(number));
            proptest::prop_assert_eq!(parsed_keywords, keywords);
        }
    }
}
