//! Sub-field encoding for tabular rows
//!
//! Nested content is flattened into single cells:
//!
//! ```text
//! list        a|b|c
//! pair        key=value
//! inner list  x=4;four|y=seven
//! escape      \| \= \; \\
//! ```
//!
//! Every leaf is escaped, so a cell reads back exactly as written. The two
//! things the encoding cannot tell apart from "absent" (an empty element in
//! a list, an optional text that is present but empty) are refused at
//! flatten time instead of being silently dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const LIST_SEP: char = '|';
pub const PAIR_SEP: char = '=';
pub const INNER_SEP: char = ';';
pub const ESCAPE: char = '\\';

/// Default cap on sub-fields per cell
pub const DEFAULT_MAX_SUB_FIELDS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenOptions {
    /// Maximum sub-fields in one cell; `None` means unlimited
    pub max_sub_fields: Option<usize>,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            max_sub_fields: Some(DEFAULT_MAX_SUB_FIELDS),
        }
    }
}

impl FlattenOptions {
    pub fn unlimited() -> Self {
        Self { max_sub_fields: None }
    }
}

/// Why a record cannot be written as a tabular row
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    #[error("column '{column}' needs {count} sub-fields, limit is {limit}")]
    TooManySubFields {
        column: String,
        count: usize,
        limit: usize,
    },

    #[error("column '{column}' contains an empty element, which would read back as absent")]
    EmptyElement { column: String },

    #[error("column '{column}' holds an empty text, which would read back as absent")]
    EmptyOptional { column: String },
}

/// A cell that could not be read back into content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnflattenError {
    pub column: String,
    pub message: String,
}

impl UnflattenError {
    pub fn new(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for UnflattenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.column, self.message)
    }
}

impl std::error::Error for UnflattenError {}

/// Read access to one row by column name
pub trait CellSource {
    fn cell(&self, column: &str) -> Option<&str>;
}

impl CellSource for std::collections::BTreeMap<String, String> {
    fn cell(&self, column: &str) -> Option<&str> {
        self.get(column).map(String::as_str)
    }
}

pub type Cells = Vec<(&'static str, String)>;

// ============================================================================
// ESCAPING
// ============================================================================

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, LIST_SEP | PAIR_SEP | INNER_SEP | ESCAPE) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            // A trailing lone escape is kept literally.
            out.push(chars.next().unwrap_or(ESCAPE));
        } else {
            out.push(c);
        }
    }
    out
}

/// Split on unescaped `sep`, keeping escapes in the parts. Empty input has no parts.
pub fn split(s: &str, sep: char) -> Vec<&str> {
    if s.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == sep {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split `key=value` at the first unescaped `=`; the key comes back unescaped
pub fn split_pair(s: &str) -> Option<(String, &str)> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == PAIR_SEP {
            return Some((unescape(&s[..i]), &s[i + c.len_utf8()..]));
        }
    }
    None
}

// ============================================================================
// ENCODING
// ============================================================================

fn check_count(column: &str, count: usize, opts: &FlattenOptions) -> Result<(), FlattenError> {
    match opts.max_sub_fields {
        Some(limit) if count > limit => Err(FlattenError::TooManySubFields {
            column: column.to_string(),
            count,
            limit,
        }),
        _ => Ok(()),
    }
}

fn encode_leaves<'s>(
    column: &str,
    items: impl IntoIterator<Item = &'s str>,
    sep: char,
    opts: &FlattenOptions,
) -> Result<String, FlattenError> {
    let mut parts = Vec::new();
    for item in items {
        if item.is_empty() {
            return Err(FlattenError::EmptyElement {
                column: column.to_string(),
            });
        }
        parts.push(escape(item));
    }
    check_count(column, parts.len(), opts)?;
    Ok(parts.join(&sep.to_string()))
}

/// `a|b|c`
pub fn encode_list<'s>(
    column: &str,
    items: impl IntoIterator<Item = &'s str>,
    opts: &FlattenOptions,
) -> Result<String, FlattenError> {
    encode_leaves(column, items, LIST_SEP, opts)
}

/// `a;b;c`, for use as the value of a pair
pub fn encode_inner<'s>(
    column: &str,
    items: impl IntoIterator<Item = &'s str>,
    opts: &FlattenOptions,
) -> Result<String, FlattenError> {
    encode_leaves(column, items, INNER_SEP, opts)
}

/// `key=value` where `encoded_value` is already escaped
pub fn pair(key: &str, encoded_value: &str) -> String {
    format!("{}{}{}", escape(key), PAIR_SEP, encoded_value)
}

/// Join already-encoded pairs into one cell
pub fn join_pairs(column: &str, pairs: Vec<String>, opts: &FlattenOptions) -> Result<String, FlattenError> {
    check_count(column, pairs.len(), opts)?;
    Ok(pairs.join(&LIST_SEP.to_string()))
}

/// Optional text: absent is an empty cell, so present-but-empty is refused
pub fn encode_optional(column: &str, value: &Option<String>) -> Result<String, FlattenError> {
    match value {
        Some(s) if s.is_empty() => Err(FlattenError::EmptyOptional {
            column: column.to_string(),
        }),
        Some(s) => Ok(s.clone()),
        None => Ok(String::new()),
    }
}

pub fn encode_number(value: Option<u32>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

// ============================================================================
// DECODING
// ============================================================================

/// Row accessor with typed reads
pub struct CellReader<'a> {
    source: &'a dyn CellSource,
}

impl<'a> CellReader<'a> {
    pub fn new(source: &'a dyn CellSource) -> Self {
        Self { source }
    }

    /// Raw cell, empty when the column is missing
    pub fn text(&self, column: &str) -> String {
        self.source.cell(column).unwrap_or_default().to_string()
    }

    pub fn optional(&self, column: &str) -> Option<String> {
        self.source
            .cell(column)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn list(&self, column: &str) -> Vec<String> {
        split(self.source.cell(column).unwrap_or_default(), LIST_SEP)
            .into_iter()
            .map(unescape)
            .collect()
    }

    /// Pairs with the value left encoded, for nested values
    pub fn raw_pairs(&self, column: &str) -> Result<Vec<(String, &'a str)>, UnflattenError> {
        split(self.source.cell(column).unwrap_or_default(), LIST_SEP)
            .into_iter()
            .map(|part| {
                split_pair(part).ok_or_else(|| {
                    UnflattenError::new(column, format!("expected key=value, got '{}'", part))
                })
            })
            .collect()
    }

    pub fn pairs(&self, column: &str) -> Result<Vec<(String, String)>, UnflattenError> {
        Ok(self
            .raw_pairs(column)?
            .into_iter()
            .map(|(k, v)| (k, unescape(v)))
            .collect())
    }

    pub fn number(&self, column: &str) -> Result<Option<u32>, UnflattenError> {
        match self.optional(column) {
            None => Ok(None),
            Some(s) => s
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| UnflattenError::new(column, format!("'{}' is not a non-negative integer", s))),
        }
    }

    pub fn flag(&self, column: &str) -> Result<Option<bool>, UnflattenError> {
        match self.optional(column).as_deref().map(str::trim) {
            None => Ok(None),
            Some(s) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(s) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(s) => Err(UnflattenError::new(column, format!("'{}' is not true or false", s))),
        }
    }
}

/// Inner list of a pair value
pub fn decode_inner(encoded: &str) -> Vec<String> {
    split(encoded, INNER_SEP).into_iter().map(unescape).collect()
}
