use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

pub type QueryId = String;
pub type DocId = String;

/// Relevance label of a judgment
pub type Label = i32;

/// Retrieval score of a run entry
pub type Score = f64;

/// Marks object that have a length
pub trait Len {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Values stored in a query/document table
pub trait TableValue: Copy + PartialEq + Display + FromStr {
    /// Total order used when ranking documents (larger is better)
    fn rank_cmp(&self, other: &Self) -> Ordering;
}

impl TableValue for Label {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl TableValue for Score {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(self, other)
    }
}
