//! Streaming readers for topic and collection files
//!
//! Two families of formats are supported: the TREC SGML-like files
//! (`<num>`, `<title>`, `<DOCNO>`, `<TEXT>`...), parsed by a small line
//! based state machine, and two-column TSV files.

pub mod collection;
pub mod topics;

use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use derivative::Derivative;
use serde::Serialize;

use crate::base::{DocId, QueryId};
use crate::error::{Error, Result};
use crate::utils::io::open_reader;

pub use collection::{scan_collection, CollectionOptions, CollectionScanner, DecodePolicy};
pub use topics::{scan_topics, TopicScanner};

/// Topic fields, in the order they appear in a TREC topic
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicField {
    Title,
    Desc,
    Narr,
}

impl TopicField {
    pub const ALL: [TopicField; 3] = [TopicField::Title, TopicField::Desc, TopicField::Narr];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicField::Title => "title",
            TopicField::Desc => "desc",
            TopicField::Narr => "narr",
        }
    }

    pub fn open_tag(&self) -> String {
        format!("<{}>", self.as_str())
    }

    pub fn close_tag(&self) -> String {
        format!("</{}>", self.as_str())
    }

    /// Label that may prefix the field content on its first line
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TopicField::Title => None,
            TopicField::Desc => Some("Description:"),
            TopicField::Narr => Some("Narrative:"),
        }
    }
}

impl fmt::Display for TopicField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TopicField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "title" => Ok(TopicField::Title),
            "desc" => Ok(TopicField::Desc),
            "narr" => Ok(TopicField::Narr),
            _ => Err(Error::Configuration(format!(
                "unknown topic field '{}' (expected title, desc or narr)",
                s
            ))),
        }
    }
}

/// A query read from a topic file
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Topic {
    pub qid: QueryId,
    pub fields: BTreeMap<TopicField, Vec<String>>,
}

impl Topic {
    pub fn new(qid: QueryId) -> Self {
        Self {
            qid,
            fields: BTreeMap::new(),
        }
    }

    pub fn field(&self, field: TopicField) -> Option<&[String]> {
        self.fields.get(&field).map(|tokens| tokens.as_slice())
    }

    /// Field tokens joined by a space
    pub fn text(&self, field: TopicField) -> Option<String> {
        self.field(field).map(|tokens| tokens.join(" "))
    }
}

/// A document read from a collection file
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CollectionDocument {
    pub docid: DocId,
    pub text: String,
}

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct TsvOptions {
    /// Separator between the ID and the content
    #[derivative(Default(value = "\"\\t\".to_string()"))]
    pub delimiter: String,
}

/// Reads `id<delimiter>content` lines
pub struct TsvScanner<R> {
    reader: R,
    delimiter: String,
    origin: Option<PathBuf>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> TsvScanner<R> {
    pub fn new(reader: R, options: &TsvOptions) -> Result<Self> {
        if options.delimiter.is_empty() {
            return Err(Error::Configuration(
                "the TSV delimiter cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            reader,
            delimiter: options.delimiter.clone(),
            origin: None,
            line_no: 0,
            done: false,
        })
    }

    fn with_origin(mut self, path: &Path) -> Self {
        self.origin = Some(path.to_path_buf());
        self
    }

    fn fail(&mut self, error: Error) -> Option<Result<(String, String)>> {
        self.done = true;
        Some(Err(match &self.origin {
            Some(path) => error.with_origin(path),
            None => error,
        }))
    }
}

impl<R: BufRead> Iterator for TsvScanner<R> {
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        while !self.done {
            line.clear();
            self.line_no += 1;
            match self.reader.read_line(&mut line) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let fields: Vec<&str> = trimmed.split(self.delimiter.as_str()).collect();
                    if fields.len() != 2 {
                        let error = Error::format(
                            self.line_no,
                            format!("expected 2 columns, got {}", fields.len()),
                        );
                        return self.fail(error);
                    }
                    return Some(Ok((fields[0].to_string(), fields[1].to_string())));
                }
                Err(e) => {
                    let error = Error::read(self.line_no, e);
                    return self.fail(error);
                }
            }
        }
        None
    }
}

/// Reads a `qid<delimiter>query` topic file
pub fn scan_topics_tsv(path: &Path, options: &TsvOptions) -> Result<TsvScanner<Box<dyn BufRead>>> {
    Ok(TsvScanner::new(open_reader(path)?, options)?.with_origin(path))
}

/// Reads a `docid<delimiter>text` collection file
pub fn scan_collection_tsv(
    path: &Path,
    options: &TsvOptions,
) -> Result<TsvScanner<Box<dyn BufRead>>> {
    Ok(TsvScanner::new(open_reader(path)?, options)?.with_origin(path))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{TopicField, TsvOptions, TsvScanner};
    use crate::error::Error;

    #[test]
    fn topic_field_names() {
        assert_eq!("desc".parse::<TopicField>().unwrap(), TopicField::Desc);
        assert!(matches!(
            "body".parse::<TopicField>(),
            Err(Error::Configuration(_))
        ));
        assert!(TopicField::Title < TopicField::Desc && TopicField::Desc < TopicField::Narr);
    }

    #[test]
    fn tsv_pairs() {
        let scanner =
            TsvScanner::new(Cursor::new("1\thello world\n\n2\tbye\n"), &TsvOptions::default())
                .unwrap();
        let pairs: Vec<(String, String)> = scanner.map(|r| r.unwrap()).collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "hello world".to_string()),
                ("2".to_string(), "bye".to_string())
            ]
        );
    }

    #[test]
    fn tsv_custom_delimiter() {
        let options = TsvOptions {
            delimiter: "|".to_string(),
        };
        let mut scanner = TsvScanner::new(Cursor::new("d1|some text\n"), &options).unwrap();
        let (docid, text) = scanner.next().unwrap().unwrap();
        assert_eq!(docid, "d1");
        assert_eq!(text, "some text");
        assert!(scanner.next().is_none());
    }

    #[test]
    fn tsv_wrong_column_count_stops() {
        let mut scanner = TsvScanner::new(
            Cursor::new("1\ta\tb\n2\tc\n"),
            &TsvOptions::default(),
        )
        .unwrap();
        assert!(matches!(
            scanner.next(),
            Some(Err(Error::Format { line: 1, .. }))
        ));
        assert!(scanner.next().is_none());
    }

    #[test]
    fn tsv_empty_delimiter() {
        let options = TsvOptions {
            delimiter: String::new(),
        };
        assert!(matches!(
            TsvScanner::new(Cursor::new(""), &options),
            Err(Error::Configuration(_))
        ));
    }
}
