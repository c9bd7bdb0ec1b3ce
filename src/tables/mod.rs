//! Qrels and runs: tables indexed by query and document IDs

pub mod qrels;
pub mod runs;

use std::collections::HashMap;
use std::io::BufRead;

use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::base::{DocId, Label, Len, QueryId, Score, TableValue};
use crate::error::{Error, Result};

/// Judgments: query ID -> document ID -> relevance label
pub type JudgmentTable = QueryDocTable<Label>;

/// Run: query ID -> document ID -> score
pub type ScoreTable = QueryDocTable<Score>;

/// Canonical ordering of a table, as produced by [sort_for_output]
pub type SortedTable<V> = Vec<(QueryId, Vec<(DocId, V)>)>;

/// The documents associated with one query, in insertion order
#[derive(Clone, Debug)]
pub struct QueryEntries<V> {
    qid: QueryId,
    docs: Vec<(DocId, V)>,
    index: HashMap<DocId, usize>,
}

impl<V: TableValue> QueryEntries<V> {
    fn new(qid: QueryId) -> Self {
        Self {
            qid,
            docs: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn qid(&self) -> &str {
        &self.qid
    }

    pub fn get(&self, docid: &str) -> Option<V> {
        self.index.get(docid).map(|&ix| self.docs[ix].1)
    }

    /// Iterates over (document ID, value) in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, V)> {
        self.docs.iter().map(|(docid, value)| (docid.as_str(), *value))
    }

    /// Sets the value of a document, returning the previous one if any.
    /// An existing document keeps its position.
    fn insert(&mut self, docid: DocId, value: V) -> Option<V> {
        match self.index.get(&docid) {
            Some(&ix) => Some(std::mem::replace(&mut self.docs[ix].1, value)),
            None => {
                self.index.insert(docid.clone(), self.docs.len());
                self.docs.push((docid, value));
                None
            }
        }
    }

    /// Documents sorted by decreasing value (ties keep insertion order)
    pub fn ranked(&self) -> Vec<(DocId, V)> {
        let mut docs = self.docs.clone();
        docs.sort_by(|a, b| b.1.rank_cmp(&a.1));
        docs
    }

    fn truncate(&mut self, top_k: usize) {
        let mut docs = std::mem::take(&mut self.docs);
        docs.sort_by(|a, b| b.1.rank_cmp(&a.1));
        docs.truncate(top_k);

        self.index = docs
            .iter()
            .enumerate()
            .map(|(ix, (docid, _))| (docid.clone(), ix))
            .collect();
        self.docs = docs;
    }
}

impl<V> Len for QueryEntries<V> {
    fn len(&self) -> usize {
        self.docs.len()
    }
}

/// A two-level map query ID -> document ID -> value.
///
/// Insertion order is kept at both levels; inserting a pair that is already
/// present overwrites its value (last write wins).
#[derive(Clone, Debug)]
pub struct QueryDocTable<V> {
    queries: Vec<QueryEntries<V>>,
    index: HashMap<QueryId, usize>,
}

impl<V: TableValue> Default for QueryDocTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: TableValue> QueryDocTable<V> {
    pub fn new() -> Self {
        Self {
            queries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Sets the value for a (query, document) pair and returns the
    /// previous value
    pub fn insert(&mut self, qid: &str, docid: &str, value: V) -> Option<V> {
        let ix = match self.index.get(qid) {
            Some(&ix) => ix,
            None => {
                self.index.insert(qid.to_string(), self.queries.len());
                self.queries.push(QueryEntries::new(qid.to_string()));
                self.queries.len() - 1
            }
        };
        self.queries[ix].insert(docid.to_string(), value)
    }

    pub fn get(&self, qid: &str, docid: &str) -> Option<V> {
        self.query(qid).and_then(|q| q.get(docid))
    }

    pub fn query(&self, qid: &str) -> Option<&QueryEntries<V>> {
        self.index.get(qid).map(|&ix| &self.queries[ix])
    }

    /// Iterates over queries in insertion order
    pub fn queries(&self) -> impl Iterator<Item = &QueryEntries<V>> {
        self.queries.iter()
    }

    /// Total number of (query, document) pairs
    pub fn num_pairs(&self) -> usize {
        self.queries.iter().map(|q| q.len()).sum()
    }

    /// Keeps, for each query, the `top_k` documents with the highest values
    pub fn truncate(&mut self, top_k: usize) -> Result<()> {
        if top_k == 0 {
            return Err(Error::Configuration(
                "top_k should be a positive integer, got 0".to_string(),
            ));
        }
        debug!("Keeping the top-{} documents per query", top_k);
        for query in self.queries.iter_mut() {
            query.truncate(top_k);
        }
        Ok(())
    }
}

impl<V> Len for QueryDocTable<V> {
    /// Number of queries
    fn len(&self) -> usize {
        self.queries.len()
    }
}

impl<V: TableValue> PartialEq for QueryDocTable<V> {
    /// Two tables are equal when they hold the same pairs, whatever the order
    fn eq(&self, other: &Self) -> bool {
        self.queries.len() == other.queries.len()
            && self.queries.iter().all(|q| match other.query(&q.qid) {
                Some(o) => o.len() == q.len() && q.iter().all(|(d, v)| o.get(d) == Some(v)),
                None => false,
            })
    }
}

impl<'a, V: TableValue> FromIterator<(&'a str, &'a str, V)> for QueryDocTable<V> {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (qid, docid, value) in iter {
            table.insert(qid, docid, value);
        }
        table
    }
}

struct QueryEntriesMap<'a, V>(&'a QueryEntries<V>);

impl<V: TableValue + Serialize> Serialize for QueryEntriesMap<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.docs.len()))?;
        for (docid, value) in self.0.docs.iter() {
            map.serialize_entry(docid, value)?;
        }
        map.end()
    }
}

impl<V: TableValue + Serialize> Serialize for QueryDocTable<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.queries.len()))?;
        for query in self.queries.iter() {
            map.serialize_entry(&query.qid, &QueryEntriesMap(query))?;
        }
        map.end()
    }
}

/// Returns the table in canonical order: queries sorted by their integer
/// value when all of them are integers (lexical order otherwise), documents
/// sorted by decreasing value
pub fn sort_for_output<V: TableValue>(table: &QueryDocTable<V>) -> SortedTable<V> {
    let mut queries: Vec<&QueryEntries<V>> = table.queries.iter().collect();

    let numeric: Option<Vec<i64>> = queries.iter().map(|q| q.qid.parse().ok()).collect();
    match numeric {
        Some(keys) => {
            let mut keyed: Vec<(i64, &QueryEntries<V>)> = keys.into_iter().zip(queries).collect();
            keyed.sort_by_key(|(key, _)| *key);
            queries = keyed.into_iter().map(|(_, q)| q).collect();
        }
        None => queries.sort_by(|a, b| a.qid.cmp(&b.qid)),
    }

    queries
        .into_iter()
        .map(|q| (q.qid.clone(), q.ranked()))
        .collect()
}

/// Reads a whitespace separated table with `columns` fields per line.
/// Blank lines are skipped.
pub(crate) fn read_table<V, R, F>(reader: R, columns: usize, parse: F) -> Result<QueryDocTable<V>>
where
    V: TableValue,
    R: BufRead,
    F: Fn(&[&str], usize) -> Result<(usize, usize, V)>,
{
    let mut table = QueryDocTable::new();

    for (ix, line) in reader.lines().enumerate() {
        let line_no = ix + 1;
        let line = line.map_err(|e| Error::read(line_no, e))?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != columns {
            return Err(Error::format(
                line_no,
                format!("expected {} columns, got {}", columns, fields.len()),
            ));
        }

        let (qid_ix, docid_ix, value) = parse(fields.as_slice(), line_no)?;
        table.insert(fields[qid_ix], fields[docid_ix], value);
    }

    Ok(table)
}
