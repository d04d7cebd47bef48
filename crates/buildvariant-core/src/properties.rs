//! Java `.properties` reader and writer.
//!
//! Implements the line format understood by `java.util.Properties.load`,
//! which is what the Gradle build script uses to read `key.properties`:
//!
//! ```text
//! # comment
//! ! also a comment
//! storeFile=release.keystore
//! keyAlias : upload
//! keyPassword   s3cr\
//!               et
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::error::{Result, VariantError};

/// A parse failure inside a properties document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct PropertiesError {
    /// 1-based line on which the offending logical line starts.
    pub line: usize,
    pub message: String,
}

/// Parsed key/value entries of a properties document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Parses properties from text.
    pub fn parse(content: &str) -> std::result::Result<Self, PropertiesError> {
        let lines = physical_lines(content);
        let mut entries = BTreeMap::new();
        let mut i = 0;

        while i < lines.len() {
            let start_line = i + 1;
            let first = lines[i].trim_start_matches(is_whitespace);
            i += 1;

            if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
                continue;
            }

            let mut logical = String::new();
            let mut current = first;
            loop {
                if ends_with_continuation(current) {
                    logical.push_str(&current[..current.len() - 1]);
                    match lines.get(i) {
                        Some(next) => {
                            current = next.trim_start_matches(is_whitespace);
                            i += 1;
                        }
                        None => break,
                    }
                } else {
                    logical.push_str(current);
                    break;
                }
            }

            let (key, value) = split_entry(&logical, start_line)?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    /// Loads properties from a file.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let content = decode(bytes);
        let properties =
            Self::parse(&content).map_err(|e| VariantError::MalformedProperties {
                path: path.to_path_buf(),
                line: e.line,
                message: e.message,
            })?;

        Ok(Some(properties))
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders a single `key=value` line (without trailing newline).
///
/// Output is pure ASCII: anything outside printable ASCII is written as a
/// `\uXXXX` escape, because Gradle reads the file as ISO-8859-1.
pub fn format_entry(key: &str, value: &str) -> String {
    let mut line = escape(key, true);
    line.push('=');
    line.push_str(&escape(value, false));
    line
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            ' ' if is_key || idx == 0 => out.push_str("\\ "),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
        }
    }
    out
}

/// Decodes file bytes as ISO-8859-1, one char per byte.
///
/// Gradle loads `key.properties` through `Properties.load(InputStream)`,
/// which never interprets UTF-8; non-Latin-1 text must use `\uXXXX`.
fn decode(bytes: Vec<u8>) -> String {
    bytes.into_iter().map(char::from).collect()
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Splits text on `\n`, `\r\n` and `\r`.
fn physical_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = content.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < content.len() {
        lines.push(&content[start..]);
    }

    lines
}

/// An odd number of trailing backslashes joins the next line.
fn ends_with_continuation(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

fn split_entry(line: &str, line_no: usize) -> std::result::Result<(String, String), PropertiesError> {
    let chars: Vec<char> = line.chars().collect();
    let mut key_end = chars.len();
    let mut value_start = chars.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (idx, &c) in chars.iter().enumerate() {
        if !escaped && (c == '=' || c == ':') {
            key_end = idx;
            value_start = idx + 1;
            has_separator = true;
            break;
        }
        if !escaped && is_whitespace(c) {
            key_end = idx;
            value_start = idx + 1;
            break;
        }
        escaped = c == '\\' && !escaped;
    }

    while value_start < chars.len() {
        let c = chars[value_start];
        if !is_whitespace(c) {
            if !has_separator && (c == '=' || c == ':') {
                has_separator = true;
            } else {
                break;
            }
        }
        value_start += 1;
    }

    let key = unescape(&chars[..key_end], line_no)?;
    let value = unescape(&chars[value_start..], line_no)?;
    Ok((key, value))
}

fn unescape(chars: &[char], line_no: usize) -> std::result::Result<String, PropertiesError> {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(&next) = chars.get(i) else {
            break;
        };
        i += 1;

        match next {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => {
                let unit = read_hex_unit(chars, i, line_no)?;
                i += 4;

                if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate: the low half must follow as another escape.
                    let low = if chars.get(i) == Some(&'\\') && chars.get(i + 1) == Some(&'u') {
                        Some(read_hex_unit(chars, i + 2, line_no)?)
                    } else {
                        None
                    };
                    match low {
                        Some(low) if (0xDC00..0xE000).contains(&low) => {
                            i += 6;
                            let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                            out.push(char::from_u32(code).ok_or_else(|| malformed(line_no))?);
                        }
                        _ => return Err(unpaired_surrogate(line_no)),
                    }
                } else {
                    out.push(char::from_u32(unit).ok_or_else(|| unpaired_surrogate(line_no))?);
                }
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn read_hex_unit(chars: &[char], start: usize, line_no: usize) -> std::result::Result<u32, PropertiesError> {
    let digits = chars.get(start..start + 4).ok_or_else(|| malformed(line_no))?;
    digits.iter().try_fold(0u32, |acc, c| {
        c.to_digit(16)
            .map(|d| (acc << 4) | d)
            .ok_or_else(|| malformed(line_no))
    })
}

fn malformed(line: usize) -> PropertiesError {
    PropertiesError {
        line,
        message: "Malformed \\uxxxx encoding".to_string(),
    }
}

fn unpaired_surrogate(line: usize) -> PropertiesError {
    PropertiesError {
        line,
        message: "Unpaired surrogate in \\uxxxx encoding".to_string(),
    }
}
