use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use flate2::{write::GzEncoder, Compression};
use log::debug;
use temp_dir::TempDir;

/// A temporary directory holding test files
pub struct Fixtures {
    pub dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temporary directory");
        debug!("Fixtures in {}", dir.path().display());
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes a plain text file and returns its path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Error while writing fixture");
        path
    }

    /// Writes a gzip-compressed file and returns its path
    pub fn write_gz(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.path(name);
        let file = File::create(&path).expect("Error while creating fixture");
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(content)
            .expect("Error while compressing fixture");
        encoder.finish().expect("Error while compressing fixture");
        path
    }
}
