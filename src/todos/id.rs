//! List identifiers.

use std::fmt;
use std::str::FromStr;

use super::error::TodoError;

/// File extension of every list file.
pub const EXTENSION: &str = "json";

const MAX_LEN: usize = 200;

/// A validated todo-list identifier: the file stem of `<id>.json`.
///
/// Identifiers never contain path separators or NUL and never start with
/// `.`, so `dir.join(id.file_name())` always names a direct, visible child
/// of the data directory.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ListId(String);

impl ListId {
    pub fn parse(raw: &str) -> Result<Self, TodoError> {
        let reason = if raw.is_empty() {
            "Identifier can't be empty"
        } else if raw.len() > MAX_LEN {
            "Identifier is too long"
        } else if raw.starts_with('.') {
            "Identifier can't start with '.'"
        } else if raw.contains(['/', '\\', '\0']) {
            "Identifier can't contain path separators"
        } else {
            return Ok(Self(raw.to_owned()));
        };
        Err(TodoError::InvalidIdentifier { reason })
    }

    /// Recovers the identifier from a directory entry name, if the entry is a list file.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(EXTENSION)?.strip_suffix('.')?;
        Self::parse(stem).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.{EXTENSION}", self.0)
    }

    /// Hidden sibling used for write-then-rename.
    pub(crate) fn temp_file_name(&self) -> String {
        format!(".{}.{EXTENSION}.tmp", self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for ListId {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ListId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for raw in ["groceries", "week 1", "a.b", "übung", "x-y_z"] {
            assert_eq!(ListId::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn rejects_traversal_and_hidden_names() {
        for raw in ["", ".", "..", "../secret", "a/b", "a\\b", ".hidden", "nul\0byte"] {
            assert!(
                matches!(ListId::parse(raw), Err(TodoError::InvalidIdentifier { .. })),
                "{raw:?} should be rejected",
            );
        }
        assert!(ListId::parse(&"x".repeat(MAX_LEN + 1)).is_err());
    }

    #[test]
    fn file_names() {
        let id = ListId::parse("groceries").unwrap();
        assert_eq!(id.file_name(), "groceries.json");
        assert_eq!(id.temp_file_name(), ".groceries.json.tmp");
    }

    #[test]
    fn from_file_name_only_takes_list_files() {
        assert_eq!(ListId::from_file_name("groceries.json").unwrap().as_str(), "groceries");
        assert_eq!(ListId::from_file_name("a.b.json").unwrap().as_str(), "a.b");
        assert!(ListId::from_file_name("notes.txt").is_none());
        assert!(ListId::from_file_name(".groceries.json.tmp").is_none());
        assert!(ListId::from_file_name(".json").is_none());
        assert!(ListId::from_file_name("json").is_none());
    }
}
