// This file is part of Ravenfoot.
//
// Copyright (c) 2025  Ravenfoot contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::error::CatalogError;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Suffixes that mark a file as a language word list, longest first.
pub const WORD_SUFFIXES: [&str; 2] = ["_words_clean.txt", "_words.txt"];
pub const NUMBERS_FILE: &str = "numbers.txt";
pub const SPECIALS_FILE: &str = "special_characters.txt";

/// A named, de-duplicated list of tokens loaded from one or more files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPool {
    name: String,
    tokens: Vec<String>,
}

impl WordPool {
    /// Builds a pool from raw lines, normalizing each one.
    pub fn new<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pool = Self {
            name: name.into(),
            tokens: Vec::new(),
        };
        pool.extend(lines);
        pool
    }

    fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.tokens.iter().cloned().collect();
        for line in lines {
            if let Some(token) = normalize_token(line.as_ref())
                && seen.insert(token.clone())
            {
                self.tokens.push(token);
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn normalize_token(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.nfc().collect())
    }
}

/// A file that matched the naming convention but could not be read.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileRole<'a> {
    Language(&'a str),
    Numbers,
    Specials,
}

fn classify(file_name: &str) -> Option<FileRole<'_>> {
    match file_name {
        NUMBERS_FILE => Some(FileRole::Numbers),
        SPECIALS_FILE => Some(FileRole::Specials),
        _ => WORD_SUFFIXES.iter().find_map(|suffix| {
            file_name
                .strip_suffix(suffix)
                .filter(|language| !language.is_empty())
                .map(FileRole::Language)
        }),
    }
}

/// Every pool discovered in one directory scan.
///
/// A catalog is immutable once built; reloading produces a new value.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    source: Option<PathBuf>,
    languages: BTreeMap<String, WordPool>,
    numbers: Option<WordPool>,
    specials: Option<WordPool>,
    skipped: Vec<SkippedFile>,
}

impl Catalog {
    /// Scans `dir` for word lists.
    ///
    /// Files named `<language>_words_clean.txt` or `<language>_words.txt`
    /// become language pools; `numbers.txt` and `special_characters.txt`
    /// are the reserved pools. Unreadable files are skipped, empty pools
    /// are dropped.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();

        let metadata = fs::metadata(dir).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => CatalogError::NotFound(dir.to_path_buf()),
            _ => CatalogError::Unreadable {
                path: dir.to_path_buf(),
                source,
            },
        })?;
        if !metadata.is_dir() {
            return Err(CatalogError::NotADirectory(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| CatalogError::Unreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .collect();
        // Directory order is platform dependent; keep merges reproducible.
        files.sort();

        let mut catalog = CatalogBuilder::default();
        catalog.source = Some(dir.to_path_buf());

        for path in files {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(role) = classify(file_name) else {
                continue;
            };
            if path.is_dir() {
                continue;
            }

            match read_lines(&path) {
                Ok(lines) => {
                    log::debug!("Loaded {} lines from {}", lines.len(), path.display());
                    match role {
                        FileRole::Language(language) => catalog.add_language(language, lines),
                        FileRole::Numbers => catalog.add_numbers(lines),
                        FileRole::Specials => catalog.add_specials(lines),
                    };
                }
                Err(e) => {
                    log::warn!("Skipping word list {}: {}", path.display(), e);
                    catalog.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(catalog.build())
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Directory the catalog was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn languages(&self) -> impl Iterator<Item = &WordPool> {
        self.languages.values()
    }

    pub fn language(&self, name: &str) -> Option<&WordPool> {
        self.languages.get(name)
    }

    pub fn language_count(&self) -> usize {
        self.languages.len()
    }

    pub fn numbers(&self) -> Option<&WordPool> {
        self.numbers.as_ref()
    }

    pub fn specials(&self) -> Option<&WordPool> {
        self.specials.as_ref()
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Distinct tokens across all language pools, in pool order.
    pub fn word_union(&self) -> Vec<&str> {
        self.word_entries()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    /// Like [`Catalog::word_union`], paired with the first pool holding each token.
    pub fn word_entries(&self) -> Vec<(&str, &WordPool)> {
        let mut seen = HashSet::new();
        self.languages
            .values()
            .flat_map(|pool| pool.tokens().iter().map(move |t| (t.as_str(), pool)))
            .filter(|(token, _)| seen.insert(*token))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.numbers.is_none() && self.specials.is_none()
    }
}

/// Reads a file line by line, dropping bytes that are not valid UTF-8.
fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let bytes = fs::read(path)?;
    Ok(bytes
        .split(|b| *b == b'\n')
        .map(|line| line.utf8_chunks().map(|chunk| chunk.valid()).collect())
        .collect())
}

/// Assembles a [`Catalog`] from in-memory lists.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    source: Option<PathBuf>,
    languages: BTreeMap<String, WordPool>,
    numbers: Option<WordPool>,
    specials: Option<WordPool>,
    skipped: Vec<SkippedFile>,
}

impl CatalogBuilder {
    /// Adds words for `language`, merging with any words already present.
    pub fn add_language<I, S>(&mut self, language: &str, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.languages
            .entry(language.to_owned())
            .or_insert_with(|| WordPool::new(language, std::iter::empty::<&str>()))
            .extend(lines);
        self
    }

    pub fn add_numbers<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.numbers
            .get_or_insert_with(|| WordPool::new("numbers", std::iter::empty::<&str>()))
            .extend(lines);
        self
    }

    pub fn add_specials<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.specials
            .get_or_insert_with(|| {
                WordPool::new("special_characters", std::iter::empty::<&str>())
            })
            .extend(lines);
        self
    }

    pub fn language<I, S>(mut self, language: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_language(language, lines);
        self
    }

    pub fn numbers<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_numbers(lines);
        self
    }

    pub fn specials<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_specials(lines);
        self
    }

    pub fn build(self) -> Catalog {
        let mut languages = self.languages;
        languages.retain(|name, pool| {
            if pool.is_empty() {
                log::debug!("Dropping empty word list \"{}\"", name);
            }
            !pool.is_empty()
        });

        Catalog {
            source: self.source,
            languages,
            numbers: self.numbers.filter(|p| !p.is_empty()),
            specials: self.specials.filter(|p| !p.is_empty()),
            skipped: self.skipped,
        }
    }
}
