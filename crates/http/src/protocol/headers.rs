//! Case-insensitive HTTP header storage with incremental parsing.
//!
//! [`Headers`] keeps its entries in insertion order with lower-cased names.
//! A repeated name is merged into the existing entry as a comma separated
//! list, the way list-valued headers are combined on the wire.
//!
//! The [`Headers::parse`] entry point is meant to be fed the front of a
//! growing read buffer: it consumes every complete `name: value\r\n` line it
//! can see, reports how many bytes it used, and tells the caller whether the
//! blank line ending the header block has been reached.

use std::str;

use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;

pub(crate) const CRLF: &[u8] = b"\r\n";

/// Ordered, case-insensitive collection of header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value stored for `name`, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.entries[index].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates `(name, value)` pairs in insertion order. Names are lower-case.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Sets `name` to `value`, overwriting any previous value in place.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.replace(name, value);
    }

    /// Like [`Headers::set`], but hands back the value that was overwritten.
    pub fn replace(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        let name = name.as_ref();
        match self.position(name) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value.into())),
            None => {
                self.entries.push((name.to_ascii_lowercase(), value.into()));
                None
            }
        }
    }

    /// Appends `value` to an existing entry as `old, new`, or inserts it.
    pub fn merge_append(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) {
        let name = name.as_ref();
        let value = value.as_ref();
        match self.position(name) {
            Some(index) => {
                let existing = &mut self.entries[index].1;
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => self.entries.push((name.to_ascii_lowercase(), value.to_owned())),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    /// Consumes the complete header lines at the front of `data`.
    ///
    /// Returns the number of bytes consumed and whether the blank line that
    /// terminates the header block was among them. A trailing partial line is
    /// left in place and reported as zero progress for that line, so callers
    /// can append more bytes and call again from the returned offset.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedHeaderLine`] when any complete line is not
    /// a valid `name: value` field. In that case nothing is stored, even if
    /// earlier lines in `data` were valid.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let mut consumed = 0;
        let mut done = false;
        let mut staged = Vec::new();

        while let Some(line_len) = find_crlf(&data[consumed..]) {
            if line_len == 0 {
                consumed += CRLF.len();
                done = true;
                break;
            }

            let line = &data[consumed..consumed + line_len];
            staged.push(parse_field_line(line)?);
            consumed += line_len + CRLF.len();
        }

        trace!(consumed, done, fields = staged.len(), "parsed header lines");
        for (name, value) in staged {
            self.merge_append(name, value);
        }

        Ok((consumed, done))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|window| window == CRLF)
}

fn parse_field_line(line: &[u8]) -> Result<(String, &str), ParseError> {
    let line = str::from_utf8(line).map_err(|e| {
        ParseError::malformed_header(format!("{} (invalid utf-8 after {} bytes)", String::from_utf8_lossy(line), e.valid_up_to()))
    })?;
    let (name, value) = line.split_once(':').ok_or_else(|| ParseError::malformed_header(line))?;

    // "Host : x" must fail here: whitespace is not a token character.
    let name = name.trim_start();
    ensure!(!name.is_empty() && name.bytes().all(is_token_byte), ParseError::malformed_header(line));

    Ok((name.to_ascii_lowercase(), value.trim()))
}

/// `tchar` from RFC 9110 section 5.6.2.
fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte)
}
