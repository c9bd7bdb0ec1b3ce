use std::io::{BufRead, Write};
use std::path::Path;

use derivative::Derivative;
use log::info;

use super::{read_table, sort_for_output, ScoreTable};
use crate::base::{Len, Score};
use crate::error::{Error, Result};
use crate::utils::io::{create_writer, open_reader};

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct RunLoadOptions {
    /// Only keep the top-k documents of each query
    /// (None keeps everything, 0 is invalid)
    #[derivative(Default(value = "None"))]
    pub top_k: Option<usize>,
}

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct WriteRunOptions {
    /// Run tag written in the last column
    #[derivative(Default(value = "\"test\".to_string()"))]
    pub tag: String,
}

fn apply_options(mut run: ScoreTable, options: &RunLoadOptions) -> Result<ScoreTable> {
    if let Some(top_k) = options.top_k {
        run.truncate(top_k)?;
    }
    Ok(run)
}

fn check_options(options: &RunLoadOptions) -> Result<()> {
    match options.top_k {
        Some(0) => Err(Error::Configuration(
            "top_k should be a positive integer, got 0".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Reads a TREC run (`qid Q0 docid rank score tag`); rank and tag are ignored
pub fn read_runs<R: BufRead>(reader: R, options: &RunLoadOptions) -> Result<ScoreTable> {
    check_options(options)?;
    let run = read_table(reader, 6, |fields, line_no| {
        let score: Score = fields[4]
            .parse()
            .map_err(|_| Error::format(line_no, format!("invalid score '{}'", fields[4])))?;
        Ok((0, 2, score))
    })?;
    apply_options(run, options)
}

/// Reads a ranked TSV run (`qid docid rank`); the score is the negated rank
pub fn read_runs_ranked_tsv<R: BufRead>(reader: R, options: &RunLoadOptions) -> Result<ScoreTable> {
    check_options(options)?;
    let run = read_table(reader, 3, |fields, line_no| {
        let rank: i64 = fields[2]
            .parse()
            .map_err(|_| Error::format(line_no, format!("invalid rank '{}'", fields[2])))?;
        Ok((0, 1, -(rank as Score)))
    })?;
    apply_options(run, options)
}

fn log_loaded(run: &ScoreTable, path: &Path) {
    info!(
        "Loaded {} scored documents for {} queries from {}",
        run.num_pairs(),
        run.len(),
        path.display()
    );
}

/// Loads a TREC run file
pub fn load_runs(path: &Path, options: &RunLoadOptions) -> Result<ScoreTable> {
    check_options(options)?;
    let reader = open_reader(path)?;
    let run = read_runs(reader, options).map_err(|e| e.with_origin(path))?;
    log_loaded(&run, path);
    Ok(run)
}

/// Loads a ranked TSV run file
pub fn load_runs_ranked_tsv(path: &Path, options: &RunLoadOptions) -> Result<ScoreTable> {
    check_options(options)?;
    let reader = open_reader(path)?;
    let run = read_runs_ranked_tsv(reader, options).map_err(|e| e.with_origin(path))?;
    log_loaded(&run, path);
    Ok(run)
}

/// Writes a run in canonical order, with ranks recomputed from the scores
pub fn write_runs(run: &ScoreTable, path: &Path, options: &WriteRunOptions) -> Result<()> {
    let mut out = create_writer(path)?;
    for (qid, docs) in sort_for_output(run) {
        for (rank, (docid, score)) in docs.iter().enumerate() {
            writeln!(
                out,
                "{}\tQ0\t{}\t{}\t{}\t{}",
                qid,
                docid,
                rank + 1,
                score,
                options.tag
            )
            .map_err(|e| Error::io(path, e))?;
        }
    }
    out.flush().map_err(|e| Error::io(path, e))
}
