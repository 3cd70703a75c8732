//! Tracker line protocol.
//!
//! Requests are `<command> <urlencoded args>\r\n`. Replies are either
//! `OK <urlencoded values>\r\n` or `ERR <code> <message>\r\n`.

use std::collections::HashMap;
use std::fmt;

use url::form_urlencoded;

use crate::constants::{LINE_TERMINATOR, REPLY_ERR_PREFIX, REPLY_OK_PREFIX};
use crate::error::{MogileError, Result};

/// Commands understood by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetPaths,
    Rename,
    Delete,
    FileDebug,
    CreateOpen,
    CreateClose,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::GetPaths => "get_paths",
            Command::Rename => "rename",
            Command::Delete => "delete",
            Command::FileDebug => "file_debug",
            Command::CreateOpen => "create_open",
            Command::CreateClose => "create_close",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command plus its arguments, in the order they are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    command: Command,
    args: Vec<(&'static str, String)>,
}

impl Request {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.args.push((name, value.into()));
        self
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn args(&self) -> &[(&'static str, String)] {
        &self.args
    }

    /// Serializes the request into its wire line, `\r\n` included.
    ///
    /// Names and values are form-urlencoded exactly once.
    pub fn encode(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.args.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{} {}{}", self.command.as_str(), query, LINE_TERMINATOR)
    }
}

/// Key/value mapping carried by an `OK` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(HashMap<String, String>);

impl Values {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Like [`Values::get`] but treats an empty value as absent.
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        for (k, v) in iter {
            map.entry(k.into()).or_insert_with(|| v.into());
        }
        Values(map)
    }
}

/// Decodes one reply line.
///
/// `OK` is checked before `ERR`. Anything else, including an empty line, is a
/// protocol error. Only the `OK` query must be UTF-8; an `ERR` message is
/// decoded lossily so the code survives arbitrary message bytes.
pub fn decode_reply(line: &[u8]) -> Result<Values> {
    if let Some(query) = line
        .strip_prefix(REPLY_OK_PREFIX.as_bytes())
        .and_then(|rest| rest.strip_suffix(LINE_TERMINATOR.as_bytes()))
    {
        let query = std::str::from_utf8(query)
            .map_err(|_| MogileError::Protocol("reply is not valid utf-8".into()))?;
        return parse_query(query);
    }

    if let Some(rest) = line.strip_prefix(REPLY_ERR_PREFIX.as_bytes()) {
        if let Some(end) = rest.iter().position(u8::is_ascii_whitespace) {
            let (code, message) = rest.split_at(end);
            if let Ok(code) = std::str::from_utf8(code) {
                if !code.is_empty() {
                    return Err(MogileError::application(code, decode_message(message)));
                }
            }
        }
    }

    Err(MogileError::Protocol("invalid tracker reply".into()))
}

/// Parses a urlencoded query string into [`Values`].
///
/// Malformed percent escapes and `;` separators are rejected. When a key
/// repeats, the first value wins.
pub fn parse_query(query: &str) -> Result<Values> {
    validate_query(query)?;
    Ok(form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

fn validate_query(query: &str) -> Result<()> {
    if query.contains(';') {
        return Err(MogileError::Protocol(
            "invalid semicolon separator in reply".into(),
        ));
    }

    let bytes = query.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3).and_then(|h| hex_pair(h[0], h[1]));
            if escape.is_none() {
                return Err(MogileError::Protocol(format!(
                    "invalid escape in reply at offset {}",
                    i
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn decode_message(raw: &[u8]) -> Option<String> {
    let start = raw.iter().position(|b| !b.is_ascii_whitespace())?;
    let end = raw.iter().rposition(|b| !b.is_ascii_whitespace())? + 1;
    let bytes = &raw[start..end];

    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => match bytes.get(i + 1..i + 3).and_then(|h| hex_pair(h[0], h[1])) {
                Some(byte) => {
                    out.push(byte);
                    i += 2;
                }
                None => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    Some(String::from_utf8_lossy(&out).into_owned())
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}
