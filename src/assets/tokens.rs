//! Whitespace token stream shared by the text loaders.
//!
//! `#` starts a comment that runs to the end of the line.  Every token keeps
//! its 1-based line number so parse errors can point at it.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

use once_cell::sync::Lazy;
use regex::Regex;

use super::LoadError;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\s#]+").unwrap());

pub struct Tokens<'a> {
    path: PathBuf,
    items: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(path: &Path, text: &'a str) -> Self {
        let items = text
            .lines()
            .enumerate()
            .flat_map(|(i, line)| {
                let code = line.split('#').next().unwrap_or("");
                TOKEN.find_iter(code).map(move |m| (i + 1, m.as_str()))
            })
            .collect();
        Self {
            path: path.to_path_buf(),
            items,
            pos: 0,
        }
    }

    /// Line of the next token, or of the last one at end of input.
    pub fn line(&self) -> usize {
        self.items
            .get(self.pos)
            .or_else(|| self.items.last())
            .map_or(1, |&(l, _)| l)
    }

    pub fn error(&self, line: usize, message: impl Into<String>) -> LoadError {
        LoadError::Parse {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }

    /// Parse the next token as `T`; `what` names the field for the message.
    pub fn next<T>(&mut self, what: &str) -> Result<T, LoadError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(&(line, tok)) = self.items.get(self.pos) else {
            return Err(self.error(self.line(), format!("expected {what}, found end of file")));
        };
        self.pos += 1;
        tok.parse()
            .map_err(|e| self.error(line, format!("bad {what} `{tok}`: {e}")))
    }

    /// Number of tokens not consumed yet.
    pub fn remaining(&self) -> usize {
        self.items.len() - self.pos
    }
}
