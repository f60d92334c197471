use anyhow::{Result, anyhow};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::io::read_text;

/// Top-level keys of one namespace's JSON file.
#[derive(Debug, Clone)]
pub struct ResourceIndex {
    path: PathBuf,
    symbols: Vec<String>,
}

impl ResourceIndex {
    /// Load `path`. `None` when the file is missing, unreadable or empty.
    pub fn load(path: &Path) -> Option<Self> {
        let content = read_text(path)?;
        Some(Self {
            path: path.to_path_buf(),
            symbols: top_level_symbols(&content),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn into_symbols(self) -> Vec<String> {
        self.symbols
    }
}

/// Top-level property names in document order.
///
/// Documents that are not valid JSON keep every key whose value was read
/// before the scanner gave up.
pub fn top_level_symbols(source: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(source) {
        Ok(Value::Object(map)) => map.keys().cloned().collect(),
        Ok(_) => Vec::new(),
        Err(e) => {
            let (symbols, stopped) = TopLevelKeyScanner::new(source).scan();
            tracing::debug!(
                error = %e,
                recovered = symbols.len(),
                stopped_at = ?stopped.map(|err| err.to_string()),
                "malformed resource JSON, using recovered keys"
            );
            symbols
        }
    }
}

/// Lenient reader for the first level of a JSON object.
///
/// Tolerates missing and trailing commas and `//` or `/* */` comments, and
/// stops at the first error it cannot step over.
struct TopLevelKeyScanner<'a> {
    source: &'a str,
    idx: usize,
    keys: Vec<String>,
}

impl<'a> TopLevelKeyScanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            idx: 0,
            keys: Vec::new(),
        }
    }

    fn scan(mut self) -> (Vec<String>, Option<anyhow::Error>) {
        let stopped = self.scan_object().err();
        (self.keys, stopped)
    }

    fn scan_object(&mut self) -> Result<()> {
        self.skip_trivia();
        if !self.consume_char('{') {
            return Ok(());
        }

        loop {
            self.skip_trivia();
            match self.peek_char() {
                None | Some('}') => return Ok(()),
                Some(',') => {
                    let _ = self.next_char();
                }
                Some('"') => {
                    let key = self.parse_string()?;
                    self.skip_trivia();
                    self.expect_char(':')?;
                    self.skip_trivia();
                    self.skip_value()?;
                    if !self.keys.contains(&key) {
                        self.keys.push(key);
                    }
                }
                Some(other) => {
                    return Err(anyhow!("unexpected '{}' at byte {}", other, self.idx));
                }
            }
        }
    }

    fn remaining(&self) -> &str {
        &self.source[self.idx..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.idx += ch.len_utf8();
        Some(ch)
    }

    fn consume_char(&mut self, target: char) -> bool {
        if self.peek_char() == Some(target) {
            let _ = self.next_char();
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, target: char) -> Result<()> {
        if self.consume_char(target) {
            Ok(())
        } else {
            Err(anyhow!("expected '{}' at byte {}", target, self.idx))
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            while matches!(self.peek_char(), Some(' ' | '\n' | '\r' | '\t')) {
                let _ = self.next_char();
            }
            let rest = self.remaining();
            if rest.starts_with("//") {
                let skip = rest.find('\n').unwrap_or(rest.len());
                self.idx += skip;
            } else if rest.starts_with("/*") {
                let skip = rest[2..].find("*/").map_or(rest.len(), |end| end + 4);
                self.idx += skip;
            } else {
                return;
            }
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        self.expect_char('"')?;
        let mut out = String::new();
        loop {
            let ch = self
                .next_char()
                .ok_or_else(|| anyhow!("unterminated string"))?;
            match ch {
                '"' => return Ok(out),
                '\n' => return Err(anyhow!("newline in string at byte {}", self.idx)),
                '\\' => {
                    let escaped = self
                        .next_char()
                        .ok_or_else(|| anyhow!("unterminated escape sequence"))?;
                    match escaped {
                        'b' => out.push('\u{0008}'),
                        'f' => out.push('\u{000C}'),
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        'u' => {
                            let mut units = vec![self.utf16_unit()?];
                            if (0xD800..0xDC00).contains(&units[0])
                                && self.remaining().starts_with("\\u")
                            {
                                self.idx += 2;
                                units.push(self.utf16_unit()?);
                            }
                            out.extend(
                                char::decode_utf16(units)
                                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)),
                            );
                        }
                        other => out.push(other),
                    }
                }
                other => out.push(other),
            }
        }
    }

    /// Four hex digits of a `\u` escape.
    fn utf16_unit(&mut self) -> Result<u16> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let value = self
                .next_char()
                .and_then(|hex| hex.to_digit(16))
                .ok_or_else(|| anyhow!("invalid unicode escape"))?;
            unit = (unit << 4) | value as u16;
        }
        Ok(unit)
    }

    fn skip_value(&mut self) -> Result<()> {
        match self.peek_char() {
            Some('{') | Some('[') => self.skip_container(),
            Some('"') => self.parse_string().map(|_| ()),
            Some('-' | '0'..='9') => {
                while matches!(
                    self.peek_char(),
                    Some('-' | '+' | '.' | 'e' | 'E' | '0'..='9')
                ) {
                    let _ = self.next_char();
                }
                Ok(())
            }
            Some('t' | 'f' | 'n') => {
                for literal in ["true", "false", "null"] {
                    if self.remaining().starts_with(literal) {
                        self.idx += literal.len();
                        return Ok(());
                    }
                }
                Err(anyhow!("invalid literal at byte {}", self.idx))
            }
            _ => Err(anyhow!("invalid value at byte {}", self.idx)),
        }
    }

    /// Skip a nested object or array without collecting its keys.
    fn skip_container(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            self.skip_trivia();
            let ch = self
                .peek_char()
                .ok_or_else(|| anyhow!("unterminated object or array"))?;
            match ch {
                '"' => {
                    self.parse_string()?;
                    continue;
                }
                '{' | '[' => depth += 1,
                '}' | ']' => {
                    depth -= 1;
                    let _ = self.next_char();
                    if depth == 0 {
                        return Ok(());
                    }
                    continue;
                }
                _ => {}
            }
            let _ = self.next_char();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_document_keeps_document_order() {
        let symbols = top_level_symbols(r#"{"zeta": "z", "alpha": {"nested": 1}, "mid": [1, 2]}"#);
        assert_eq!(symbols, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn non_object_document_has_no_symbols() {
        assert!(top_level_symbols("[1, 2, 3]").is_empty());
        assert!(top_level_symbols("\"text\"").is_empty());
    }

    #[test]
    fn truncated_document_recovers_completed_keys() {
        let symbols = top_level_symbols(r#"{"hello": "Hello", "nested": {"a": "b"}, "bye": "#);
        assert_eq!(symbols, vec!["hello", "nested"]);
    }

    #[test]
    fn missing_and_trailing_commas_are_tolerated() {
        let symbols = top_level_symbols(
            r#"{
  // greeting
  "hello": "Hello"
  "bye": "Bye",
}"#,
        );
        assert_eq!(symbols, vec!["hello", "bye"]);
    }

    #[test]
    fn garbage_yields_empty_list() {
        assert!(top_level_symbols("not json at all").is_empty());
        assert!(top_level_symbols("{ key: 1 }").is_empty());
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_nesting() {
        let symbols = top_level_symbols(r#"{"a": {"x": "}}"}, "b": 1,, "#);
        assert_eq!(symbols, vec!["a", "b"]);
    }

    #[test]
    fn escaped_surrogate_pairs_decode_to_one_char() {
        let symbols = top_level_symbols(
            r#"{"smile \ud83d\ude00": 1, "lone \ud83d": 2, "mixed \ud83d\u0041": 3, "cut": "#,
        );
        assert_eq!(symbols, vec!["smile 😀", "lone \u{FFFD}", "mixed \u{FFFD}A"]);
    }
}
