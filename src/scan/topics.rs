use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::debug;

use super::{Topic, TopicField};
use crate::error::{Error, Result};
use crate::utils::io::open_reader;

const NUM_TAG: &str = "<num>";
const NUM_CLOSE_TAG: &str = "</num>";
const NUM_LABEL: &str = "Number:";
const TOP_TAG: &str = "<top>";
const TOP_CLOSE_TAG: &str = "</top>";

/// Streams the topics of a TREC topic file.
///
/// A topic starts at each `<num>` line. The content of a requested field
/// starts after its opening tag and goes on until a blank line, the opening
/// tag of a later field, the end of the topic or the end of the file.
pub struct TopicScanner<R> {
    reader: R,
    fields: Vec<TopicField>,
    origin: Option<PathBuf>,
    line_no: usize,
    /// Line that ended a field and still has to be processed
    pending: Option<String>,
    current: Option<Topic>,
    done: bool,
}

impl<R: BufRead> TopicScanner<R> {
    /// Creates a scanner extracting `fields` (other fields are ignored)
    pub fn new(reader: R, fields: &[TopicField]) -> Self {
        let mut fields = fields.to_vec();
        fields.sort();
        fields.dedup();

        Self {
            reader,
            fields,
            origin: None,
            line_no: 0,
            pending: None,
            current: None,
            done: false,
        }
    }

    fn with_origin(mut self, path: &Path) -> Self {
        self.origin = Some(path.to_path_buf());
        self
    }

    fn locate(&self, error: Error) -> Error {
        match &self.origin {
            Some(path) => error.with_origin(path),
            None => error,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        let mut line = String::new();
        self.line_no += 1;
        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line)),
            Err(e) => Err(Error::read(self.line_no, e)),
        }
    }

    /// Checks that a finished topic has an identifier
    fn complete(&self, topic: Topic) -> Result<Topic> {
        if topic.qid.is_empty() {
            return Err(self.locate(Error::malformed(
                self.line_no,
                "topic fields found before any <num> tag",
            )));
        }
        Ok(topic)
    }

    fn requested_field(&self, line: &str) -> Option<TopicField> {
        self.fields
            .iter()
            .copied()
            .find(|field| line.starts_with(&field.open_tag()))
    }

    /// Whether `line` ends the content of `field`
    fn is_terminator(field: TopicField, line: &str) -> bool {
        line.is_empty()
            || line.starts_with(NUM_TAG)
            || line.starts_with(TOP_TAG)
            || line.starts_with(TOP_CLOSE_TAG)
            || TopicField::ALL
                .iter()
                .filter(|other| **other > field)
                .any(|other| line.starts_with(&other.open_tag()))
    }

    /// Reads the tokens of `field` whose opening tag is on `first_line`
    fn read_field(&mut self, field: TopicField, first_line: &str) -> Result<Vec<String>> {
        let close_tag = field.close_tag();
        let first = first_line
            .replacen(&field.open_tag(), "", 1)
            .replace(&close_tag, "");
        let mut first = first.trim();
        if let Some(label) = field.label() {
            first = first.strip_prefix(label).unwrap_or(first);
        }

        let mut tokens: Vec<String> = first.split_whitespace().map(String::from).collect();

        while let Some(line) = self.next_line()? {
            let trimmed = line.trim();
            if Self::is_terminator(field, trimmed) {
                if !trimmed.is_empty() {
                    self.pending = Some(line);
                }
                break;
            }
            tokens.extend(
                trimmed
                    .replace(&close_tag, "")
                    .split_whitespace()
                    .map(String::from),
            );
        }

        Ok(tokens)
    }

    fn step(&mut self) -> Result<Option<Topic>> {
        loop {
            let line = match self.next_line()? {
                Some(line) => line,
                None => {
                    self.done = true;
                    return match self.current.take() {
                        Some(topic) => self.complete(topic).map(Some),
                        None => Ok(None),
                    };
                }
            };
            let line = line.trim();

            if line.starts_with(NUM_TAG) {
                let qid = line
                    .replace(NUM_TAG, "")
                    .replace(NUM_CLOSE_TAG, "")
                    .replace(NUM_LABEL, "")
                    .trim()
                    .to_string();
                debug!("Reading topic {}", qid);

                if let Some(previous) = self.current.replace(Topic::new(qid)) {
                    return self.complete(previous).map(Some);
                }
                continue;
            }

            if let Some(field) = self.requested_field(line) {
                let tokens = self.read_field(field, line)?;
                self.current
                    .get_or_insert_with(Topic::default)
                    .fields
                    .insert(field, tokens);
            }
        }
    }
}

impl<R: BufRead> Iterator for TopicScanner<R> {
    type Item = Result<Topic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(topic)) => Some(Ok(topic)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(self.locate(e)))
            }
        }
    }
}

/// Streams the topics of a TREC topic file, keeping the given fields
pub fn scan_topics(path: &Path, fields: &[TopicField]) -> Result<TopicScanner<Box<dyn BufRead>>> {
    Ok(TopicScanner::new(open_reader(path)?, fields).with_origin(path))
}
