use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use derivative::Derivative;
use log::warn;

use super::CollectionDocument;
use crate::error::{Error, Result};
use crate::utils::io::open_reader;

const DOCNO_TAG: &str = "<DOCNO>";
const DOCNO_CLOSE_TAG: &str = "</DOCNO>";
const TEXT_TAG: &str = "<TEXT>";
const TEXT_CLOSE_TAG: &str = "</TEXT>";

/// What to do with lines that are not valid UTF-8
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Stop with a decoding error
    Strict,
    /// Drop the line (it is logged and counted)
    Skip,
    /// Replace invalid sequences with U+FFFD
    Lossy,
}

impl FromStr for DecodePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(DecodePolicy::Strict),
            "skip" => Ok(DecodePolicy::Skip),
            "lossy" => Ok(DecodePolicy::Lossy),
            _ => Err(Error::Configuration(format!(
                "unknown decode policy '{}' (expected strict, skip or lossy)",
                s
            ))),
        }
    }
}

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct CollectionOptions {
    #[derivative(Default(value = "DecodePolicy::Skip"))]
    pub decode_policy: DecodePolicy,
}

/// Streams the documents of a TREC collection file.
///
/// Two consecutive blank lines end the stream.
pub struct CollectionScanner<R> {
    reader: R,
    options: CollectionOptions,
    origin: Option<PathBuf>,
    buffer: Vec<u8>,
    line_no: usize,
    skipped: usize,
    /// Identifier of the document being read
    docid: String,
    done: bool,
}

impl<R: BufRead> CollectionScanner<R> {
    pub fn new(reader: R, options: &CollectionOptions) -> Self {
        Self {
            reader,
            options: options.clone(),
            origin: None,
            buffer: Vec::new(),
            line_no: 0,
            skipped: 0,
            docid: String::new(),
            done: false,
        }
    }

    fn with_origin(mut self, path: &Path) -> Self {
        self.origin = Some(path.to_path_buf());
        self
    }

    /// Number of lines dropped because they could not be decoded
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    /// Returns the next trimmed line, or None at the end of the stream
    fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buffer)
                .map_err(|e| Error::read(self.line_no + 1, e))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            match std::str::from_utf8(&self.buffer) {
                Ok(line) => return Ok(Some(line.trim().to_string())),
                Err(_) => match self.options.decode_policy {
                    DecodePolicy::Strict => {
                        return Err(Error::Decode {
                            origin: None,
                            line: self.line_no,
                        })
                    }
                    DecodePolicy::Skip => {
                        self.skipped += 1;
                        warn!("Skipping invalid UTF-8 line {}", self.line_no);
                    }
                    DecodePolicy::Lossy => {
                        return Ok(Some(
                            String::from_utf8_lossy(&self.buffer).trim().to_string(),
                        ))
                    }
                },
            }
        }
    }

    /// Reads the body of a `<TEXT>` block (the opening tag has been read)
    fn read_text(&mut self) -> Result<CollectionDocument> {
        let start = self.line_no;
        let mut text = String::new();
        loop {
            match self.read_line()? {
                Some(line) if line == TEXT_CLOSE_TAG => break,
                Some(line) => text.push_str(&line),
                None => return Err(Error::malformed(start, "unterminated <TEXT> block")),
            }
        }

        if self.docid.is_empty() {
            return Err(Error::malformed(
                start,
                "document text found without a <DOCNO> identifier",
            ));
        }

        Ok(CollectionDocument {
            docid: std::mem::take(&mut self.docid),
            text,
        })
    }

    fn step(&mut self) -> Result<Option<CollectionDocument>> {
        loop {
            let mut line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };

            // A single blank line separates records, two end the stream
            if line.is_empty() {
                line = match self.read_line()? {
                    Some(line) if !line.is_empty() => line,
                    _ => return Ok(None),
                };
            }

            if line.starts_with(DOCNO_TAG) {
                self.docid = line
                    .replace(DOCNO_TAG, "")
                    .replace(DOCNO_CLOSE_TAG, "")
                    .trim()
                    .to_string();
            }

            if line == TEXT_TAG {
                return self.read_text().map(Some);
            }
        }
    }
}

impl<R: BufRead> Iterator for CollectionScanner<R> {
    type Item = Result<CollectionDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(document)) => Some(Ok(document)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(match &self.origin {
                    Some(path) => e.with_origin(path),
                    None => e,
                }))
            }
        }
    }
}

/// Streams the documents of a TREC collection file (`.gz` files are
/// decompressed)
pub fn scan_collection(
    path: &Path,
    options: &CollectionOptions,
) -> Result<CollectionScanner<Box<dyn BufRead>>> {
    Ok(CollectionScanner::new(open_reader(path)?, options).with_origin(path))
}
