//! Helpers for information retrieval experiments: TREC judgments and
//! runs, topic and collection files, and code text preprocessing.

pub mod base;
pub mod error;
pub mod scan;
pub mod tables;
pub mod text;
pub mod utils;

#[cfg(feature = "python")]
mod py;

pub use error::{Error, Result};
pub use scan::{
    scan_collection, scan_collection_tsv, scan_topics, scan_topics_tsv, CollectionDocument, Topic,
    TopicField,
};
pub use tables::qrels::{load_qrels, read_qrels, write_qrels};
pub use tables::runs::{
    load_runs, load_runs_ranked_tsv, read_runs, read_runs_ranked_tsv, write_runs, RunLoadOptions,
    WriteRunOptions,
};
pub use tables::{sort_for_output, JudgmentTable, QueryDocTable, ScoreTable};
