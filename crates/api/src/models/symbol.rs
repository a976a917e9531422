use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Zero-based line/column span. Columns count UTF-16 code units so the values
/// can be handed to an editor unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Range {
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    pub fn contains(&self, line: usize, col: usize) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if line == self.start_line && col < self.start_col {
            return false;
        }
        if line == self.end_line && col > self.end_col {
            return false;
        }
        true
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub path: PathBuf,
    pub range: Range,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, range: Range) -> Self {
        Self {
            path: path.into(),
            range,
        }
    }

    /// Location pointing at the first character of a file.
    pub fn file_start(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Range::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_contains_is_inclusive_on_both_ends() {
        let range = Range::new(1, 4, 3, 2);
        assert!(range.contains(1, 4));
        assert!(range.contains(2, 0));
        assert!(range.contains(3, 2));
        assert!(!range.contains(1, 3));
        assert!(!range.contains(3, 3));
        assert!(!range.contains(0, 10));
    }
}
