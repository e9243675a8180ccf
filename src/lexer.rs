//! Splitting of a raw input line into an argument vector.
//!
//! There is no quoting, escaping or expansion: every run of delimiter characters
//! separates two tokens, even inside what looks like a quoted string.

use std::ops::Index;

/// Characters that separate tokens: space, tab, carriage return, newline and bell.
pub const TOKEN_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x07'];

/// Ordered tokens of one input line. The first token is the command name.
///
/// Tokens borrow from the line they were cut from, so an `ArgVector` cannot outlive
/// the dispatch cycle of that line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgVector<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> ArgVector<'a> {
    /// The command name, or `None` for a blank line.
    pub fn command(&self) -> Option<&'a str> {
        self.tokens.first().copied()
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[&'a str] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, &'a str> {
        self.tokens.iter()
    }
}

impl<'a> Index<usize> for ArgVector<'a> {
    type Output = &'a str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for ArgVector<'a> {
    type Item = &'a str;
    type IntoIter = std::vec::IntoIter<&'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

fn is_delimiter(ch: char) -> bool {
    TOKEN_DELIMITERS.contains(&ch)
}

/// Splits `line` on runs of [`TOKEN_DELIMITERS`], dropping empty pieces.
///
/// A line made only of delimiters yields an empty vector.
pub fn split_into_tokens(line: &str) -> ArgVector<'_> {
    ArgVector {
        tokens: line
            .split(is_delimiter)
            .filter(|token| !token.is_empty())
            .collect(),
    }
}
