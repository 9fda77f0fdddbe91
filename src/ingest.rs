//! Tabular input: read `(person, manager)` pairs out of a CSV file.
//!
//! Only two columns matter; they are located by header name so the rest
//! of the row (role codes, department fields, whatever the dataset
//! carries) is ignored. Fields are plain integers, optionally quoted.

use crate::adjacency::PersonId;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input file is empty (expected a header row)")]
    Empty,
    #[error("column '{column}' not found in header: {header:?}")]
    MissingColumn { column: String, header: Vec<String> },
    #[error("line {line}: expected at least {want} fields, found {found}")]
    ShortRow {
        line: usize,
        want: usize,
        found: usize,
    },
    #[error("line {line}: invalid person id '{value}'")]
    BadId { line: usize, value: String },
}

/// Read all `(person, manager)` pairs from `path`, locating the two
/// columns by the given header names. Blank lines are skipped; every
/// other row must parse.
pub fn read_pairs<P: AsRef<Path>>(
    path: P,
    id_column: &str,
    manager_column: &str,
) -> Result<Vec<(PersonId, PersonId)>, IngestError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break split_row(&line);
                }
            }
            None => return Err(IngestError::Empty),
        }
    };

    let id_idx = find_column(&header, id_column)?;
    let manager_idx = find_column(&header, manager_column)?;
    let want = id_idx.max(manager_idx) + 1;

    let mut pairs = Vec::new();
    for (line_num, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_row(&line);
        if fields.len() < want {
            return Err(IngestError::ShortRow {
                line: line_num + 1,
                want,
                found: fields.len(),
            });
        }
        let person = parse_id(&fields[id_idx], line_num + 1)?;
        let manager = parse_id(&fields[manager_idx], line_num + 1)?;
        pairs.push((person, manager));
    }

    Ok(pairs)
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',')
        .map(|f| f.trim().trim_matches('"').to_string())
        .collect()
}

fn find_column(header: &[String], name: &str) -> Result<usize, IngestError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| IngestError::MissingColumn {
            column: name.to_string(),
            header: header.to_vec(),
        })
}

fn parse_id(value: &str, line: usize) -> Result<PersonId, IngestError> {
    value.parse().map_err(|_| IngestError::BadId {
        line,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_pairs_by_header_name() {
        let file = write_csv("id,MGR_ID,ROLE_TITLE\n1,2,117961\n2,3,117962\n");
        let pairs = read_pairs(file.path(), "id", "MGR_ID").unwrap();
        assert_eq!(pairs, vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let file = write_csv("MGR_ID,id\n2,1\n");
        let pairs = read_pairs(file.path(), "id", "MGR_ID").unwrap();
        assert_eq!(pairs, vec![(1, 2)]);
    }

    #[test]
    fn test_quoted_and_padded_fields_parse() {
        let file = write_csv("id,MGR_ID\n\"1\", 2\n");
        let pairs = read_pairs(file.path(), "id", "MGR_ID").unwrap();
        assert_eq!(pairs, vec![(1, 2)]);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let file = write_csv("id,MGR_ID\n\n1,2\n\n");
        let pairs = read_pairs(file.path(), "id", "MGR_ID").unwrap();
        assert_eq!(pairs, vec![(1, 2)]);
    }

    #[test]
    fn test_missing_column_lists_header() {
        let file = write_csv("person,boss\n1,2\n");
        match read_pairs(file.path(), "id", "MGR_ID").unwrap_err() {
            IngestError::MissingColumn { column, header } => {
                assert_eq!(column, "id");
                assert_eq!(header, vec!["person", "boss"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let file = write_csv("");
        assert!(matches!(
            read_pairs(file.path(), "id", "MGR_ID").unwrap_err(),
            IngestError::Empty
        ));
    }

    #[test]
    fn test_bad_id_reports_line_number() {
        let file = write_csv("id,MGR_ID\n1,2\nxyz,4\n");
        match read_pairs(file.path(), "id", "MGR_ID").unwrap_err() {
            IngestError::BadId { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "xyz");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_reports_line_number() {
        let file = write_csv("id,MGR_ID\n1\n");
        match read_pairs(file.path(), "id", "MGR_ID").unwrap_err() {
            IngestError::ShortRow { line, found, .. } => {
                assert_eq!(line, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
