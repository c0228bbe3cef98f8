//! Layout sniffing for multi-trace CSV files.

use neurotrace_types::Layout;

use crate::columns::is_numeric;

/// Decide once whether a file is row-oriented or column-oriented.
///
/// A file is row-oriented when it has at least two rows, the first cell of the
/// first row is a label (non-numeric), and the rest of that row is numeric:
///
/// ```text
/// time,0,0.001,0.002
/// WT,-65,-64,30
/// ```
///
/// Anything else is treated as column-oriented. Rows must already have blank
/// rows removed.
#[must_use]
pub fn sniff_layout<S: AsRef<str>>(rows: &[Vec<S>]) -> Layout {
    let Some(first) = rows.first() else {
        return Layout::ColumnOriented;
    };
    if rows.len() < 2 {
        return Layout::ColumnOriented;
    }

    let label = first.first().map_or("", |c| c.as_ref().trim());
    if is_numeric(label) {
        return Layout::ColumnOriented;
    }

    let rest = first.get(1..).unwrap_or(&[]);
    if !rest.is_empty() && rest.iter().all(|c| is_numeric(c.as_ref())) {
        Layout::RowOriented
    } else {
        Layout::ColumnOriented
    }
}

/// Whether every cell of a row is whitespace.
#[must_use]
pub fn is_blank_row<S: AsRef<str>>(row: &[S]) -> bool {
    row.iter().all(|c| c.as_ref().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<Vec<&str>> {
        text.lines().map(|l| l.split(',').collect()).collect()
    }

    #[test]
    fn test_row_oriented() {
        let r = rows("time,0,1,2\nWT,-65,-64,30\nKO,-65,-65,-65");
        assert_eq!(sniff_layout(&r), Layout::RowOriented);
    }

    #[test]
    fn test_column_oriented_with_header() {
        let r = rows("time,wt,e999k\n0,-65,-65\n1,-64,-65");
        assert_eq!(sniff_layout(&r), Layout::ColumnOriented);
    }

    #[test]
    fn test_numeric_first_cell_is_column_oriented() {
        let r = rows("0,-65\n1,-64");
        assert_eq!(sniff_layout(&r), Layout::ColumnOriented);
    }

    #[test]
    fn test_single_row_is_column_oriented() {
        let r = rows("time,0,1,2");
        assert_eq!(sniff_layout(&r), Layout::ColumnOriented);
    }

    #[test]
    fn test_label_only_first_row_is_column_oriented() {
        let r = rows("time\nWT");
        assert_eq!(sniff_layout(&r), Layout::ColumnOriented);
    }

    #[test]
    fn test_empty_is_column_oriented() {
        let r: Vec<Vec<&str>> = Vec::new();
        assert_eq!(sniff_layout(&r), Layout::ColumnOriented);
    }

    #[test]
    fn test_blank_row() {
        assert!(is_blank_row(&["", "  ", "\t"]));
        assert!(!is_blank_row(&["", "1"]));
        let empty: [&str; 0] = [];
        assert!(is_blank_row(&empty));
    }
}
