use std::collections::HashSet;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::utils::io::open_reader;

/// Gives access to the reserved words of programming languages
pub trait ReservedWordsLoader {
    /// Languages for which reserved words are available
    fn languages(&self) -> Result<Vec<String>>;

    /// Returns the reserved words of `lang`
    fn load(&self, lang: &str) -> Result<HashSet<String>>;
}

/// Reads `<root>/<lang>.txt` files containing one word per line
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl ReservedWordsLoader for DirectoryLoader {
    fn languages(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| Error::io(&self.root, e))?;

        let mut languages = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&self.root, e))?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("txt") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    languages.push(stem.to_string());
                }
            }
        }
        languages.sort();
        Ok(languages)
    }

    fn load(&self, lang: &str) -> Result<HashSet<String>> {
        let languages = self.languages().map_err(|e| {
            Error::Configuration(format!("no reserved words available: {}", e))
        })?;
        if !languages.iter().any(|l| l == lang) {
            return Err(Error::Configuration(format!(
                "reserved words for language {} are not available, choose from {}",
                lang,
                languages.join(",")
            )));
        }

        let path = self.root.join(format!("{}.txt", lang));
        let mut words = HashSet::new();
        for (ix, line) in open_reader(&path)?.lines().enumerate() {
            let line = line.map_err(|e| Error::read(ix + 1, e).with_origin(&path))?;
            let word = line.trim();
            if !word.is_empty() {
                words.insert(word.to_string());
            }
        }
        debug!("Loaded {} reserved words for {}", words.len(), lang);
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use temp_dir::TempDir;

    use super::{DirectoryLoader, ReservedWordsLoader};
    use crate::error::Error;

    #[test]
    fn loads_words() {
        let dir = TempDir::new().expect("Could not create temporary directory");
        std::fs::write(dir.path().join("ruby.txt"), "BEGIN\nEND\nalias\n\n  and \n").unwrap();
        std::fs::write(dir.path().join("go.txt"), "func\n").unwrap();
        std::fs::write(dir.path().join("README"), "not a language\n").unwrap();

        let loader = DirectoryLoader::new(dir.path());
        assert_eq!(loader.languages().unwrap(), vec!["go", "ruby"]);

        let words = loader.load("ruby").unwrap();
        assert_eq!(words.len(), 4);
        assert!(words.contains("and"));
        assert!(words.contains("BEGIN"));
    }

    #[test]
    fn unknown_language() {
        let dir = TempDir::new().expect("Could not create temporary directory");
        std::fs::write(dir.path().join("go.txt"), "func\n").unwrap();

        let loader = DirectoryLoader::new(dir.path());
        match loader.load("cobol") {
            Err(Error::Configuration(message)) => assert!(message.contains("go")),
            _ => panic!("expected a configuration error"),
        }

        let missing = DirectoryLoader::new(&dir.path().join("missing"));
        assert!(matches!(missing.load("go"), Err(Error::Configuration(_))));
    }
}
