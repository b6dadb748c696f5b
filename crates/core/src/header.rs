use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::text::eq_ignore_case;

/// The header row of a table: the ordered column vocabulary.
///
/// Column names are trimmed on construction. Lookups are exact but
/// case-insensitive; when two columns fold to the same name the first one
/// wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    /// Create a header from column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|c| c.as_ref().trim().to_owned())
                .collect(),
        }
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of `name`, compared case-insensitively after trimming.
    pub fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.columns.iter().position(|c| eq_ignore_case(c, name))
    }

    /// Position of `name`, failing with [`TableError::ColumnNotFound`].
    pub fn require(&self, name: &str) -> Result<usize, TableError> {
        self.position(name)
            .ok_or_else(|| TableError::column_not_found(name.trim()))
    }

    /// Returns `true` if a column named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// A copy of this header with `extra` columns appended.
    #[must_use]
    pub fn extended<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns = self.columns.clone();
        columns.extend(extra.into_iter().map(|c| c.as_ref().trim().to_owned()));
        Self { columns }
    }
}
