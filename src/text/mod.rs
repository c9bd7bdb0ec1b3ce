//! Light preprocessing of source code text

pub mod reserved;

pub use reserved::{DirectoryLoader, ReservedWordsLoader};

use regex::Regex;

use crate::error::{Error, Result};

/// Splits identifiers written in camelCase or snake_case
pub struct CodeTokenizer {
    camel_patterns: [Regex; 2],
}

impl CodeTokenizer {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| Error::Configuration(format!("invalid pattern: {}", e)))
        };
        Ok(Self {
            camel_patterns: [
                compile("(.)([A-Z][a-z]+)")?,
                compile("([a-z0-9])([A-Z])")?,
            ],
        })
    }

    /// Tokenizes `text`, splitting camel-cased words and underscores
    pub fn tokenize(&self, text: &str, lowercase: bool) -> Vec<String> {
        let mut text = text.to_string();
        for pattern in self.camel_patterns.iter() {
            text = pattern.replace_all(&text, "$1 $2").into_owned();
        }

        let mut text = text.replace('_', " ");
        if lowercase {
            text = text.to_lowercase();
        }
        text.split_whitespace().map(String::from).collect()
    }
}

/// Replaces every character but ASCII letters and spaces by a space
pub fn remove_non_alphabet(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_ascii_alphabetic() || c == ' ' { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(String::from).collect()
}

/// Drops the words made of a single character
pub fn remove_unicharacter(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .map(String::from)
        .collect()
}

pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::{join_tokens, remove_non_alphabet, remove_unicharacter, CodeTokenizer};

    const CODE: &str = "func ( t * SecondaryTree ) SeekFirst ( ) ( e * SecondaryEnumerator , err error ) { q := t . first if q == nil { return nil , io . EOF } return btEPool2 . get ( nil , true , 0 , q . d [ 0 ] . k , q , t , atomic . LoadUint64 ( & t . ver ) ) , nil }";

    #[test]
    fn code_tokenize() {
        let tokenizer = CodeTokenizer::new().unwrap();
        let tokens = tokenizer.tokenize(CODE, true);
        assert_eq!(
            join_tokens(&tokens),
            "func ( t * secondary tree ) seek first ( ) ( e * secondary enumerator , err error ) { q := t . \
             first if q == nil { return nil , io . eof } return bt e pool2 . get ( nil , true , 0 , q . d [ 0 ] . \
             k , q , t , atomic . load uint64 ( & t . ver ) ) , nil }"
        );
    }

    #[test]
    fn code_tokenize_keeps_case() {
        let tokenizer = CodeTokenizer::new().unwrap();
        assert_eq!(
            tokenizer.tokenize("getHTTPResponse_code", false),
            vec!["get", "HTTP", "Response", "code"]
        );
    }

    #[test]
    fn non_alphabet() {
        assert_eq!(
            join_tokens(&remove_non_alphabet(CODE)),
            "func t SecondaryTree SeekFirst e SecondaryEnumerator err error q t first if q nil return nil io EOF \
             return btEPool get nil true q d k q t atomic LoadUint t ver nil"
        );
    }

    #[test]
    fn unicharacter() {
        assert_eq!(
            join_tokens(&remove_unicharacter(CODE)),
            "func SecondaryTree SeekFirst SecondaryEnumerator err error := first if == nil return nil io \
             EOF return btEPool2 get nil true atomic LoadUint64 ver nil"
        );
    }
}
