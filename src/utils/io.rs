use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use log::debug;

use crate::error::{Error, Result};

/// Opens a file for buffered reading, decompressing `.gz` files on the fly
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::options()
        .read(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let reader: Box<dyn Read> = match extension.as_str() {
        "gz" | "gzip" => Box::new(GzDecoder::new(file)),
        _ => Box::new(file),
    };

    Ok(Box::new(BufReader::new(reader)))
}

/// Creates (or truncates) a file for writing, creating the missing parent
/// directories first
pub fn create_writer(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating directory {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let file = File::options()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;

    Ok(BufWriter::new(file))
}
