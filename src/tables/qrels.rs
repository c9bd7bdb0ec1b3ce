use std::io::{BufRead, Write};
use std::path::Path;

use log::info;

use super::{read_table, sort_for_output, JudgmentTable};
use crate::base::{Label, Len};
use crate::error::{Error, Result};
use crate::utils::io::{create_writer, open_reader};

/// Reads TREC judgments (`qid Q0 docid label`)
pub fn read_qrels<R: BufRead>(reader: R) -> Result<JudgmentTable> {
    read_table(reader, 4, |fields, line_no| {
        let label: Label = fields[3].parse().map_err(|_| {
            Error::format(line_no, format!("invalid relevance label '{}'", fields[3]))
        })?;
        Ok((0, 2, label))
    })
}

/// Loads a TREC judgment file
pub fn load_qrels(path: &Path) -> Result<JudgmentTable> {
    let reader = open_reader(path)?;
    let qrels = read_qrels(reader).map_err(|e| e.with_origin(path))?;
    info!(
        "Loaded {} judgments for {} queries from {}",
        qrels.num_pairs(),
        qrels.len(),
        path.display()
    );
    Ok(qrels)
}

/// Writes judgments in canonical order
pub fn write_qrels(qrels: &JudgmentTable, path: &Path) -> Result<()> {
    let mut out = create_writer(path)?;
    for (qid, docs) in sort_for_output(qrels) {
        for (docid, label) in docs {
            writeln!(out, "{}\tQ0\t{}\t{}", qid, docid, label).map_err(|e| Error::io(path, e))?;
        }
    }
    out.flush().map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::read_qrels;
    use crate::error::Error;

    #[test]
    fn parses_whitespace_separated_lines() {
        let qrels = read_qrels(Cursor::new("1 Q0 d1 2\n1\tQ0\td2\t0\n\n2 0 d1 1\n")).unwrap();
        assert_eq!(qrels.get("1", "d1"), Some(2));
        assert_eq!(qrels.get("1", "d2"), Some(0));
        assert_eq!(qrels.get("2", "d1"), Some(1));
        assert_eq!(qrels.num_pairs(), 3);
    }

    #[test]
    fn rejects_short_lines() {
        let r = read_qrels(Cursor::new("1 Q0 d1 2\n1 Q0 d2\n"));
        assert!(matches!(r, Err(Error::Format { line: 2, .. })));
    }

    #[test]
    fn rejects_non_integer_labels() {
        let r = read_qrels(Cursor::new("1 Q0 d1 0.5\n"));
        assert!(matches!(r, Err(Error::Format { line: 1, .. })));
    }
}
