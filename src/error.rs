use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Token category a pool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Words,
    Numbers,
    Specials,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Words => "words",
            Category::Numbers => "numbers",
            Category::Specials => "special characters",
        })
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Word list directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Failed to read word list directory {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("No {0} available in the catalog")]
    InsufficientPool(Category),
    #[error("Random source failed: {0}")]
    Rng(#[from] RngError),
}

#[derive(Error, Debug)]
#[error("Operating system entropy source failed: {0}")]
pub struct RngError(pub String);

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to determine home directory")]
    NoHomeDirectory,
    #[error("Failed to write history file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Non-fatal conditions raised while drawing a passphrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Diversity was requested but fewer than two language pools (or fewer
    /// than two words) were available.
    DiversityUnsatisfiable { pools: usize, words: usize },
    /// More tokens were requested than the pool holds; tokens may repeat.
    SamplingFallback {
        category: Category,
        requested: usize,
        available: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DiversityUnsatisfiable { pools, words } => write!(
                f,
                "Language mixing relaxed ({} {}, {} {})",
                pools,
                if *pools == 1 { "word list" } else { "word lists" },
                words,
                if *words == 1 { "word" } else { "words" }
            ),
            Warning::SamplingFallback {
                category,
                requested,
                available,
            } => write!(
                f,
                "Requested {} {} but only {} available; tokens may repeat",
                requested, category, available
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_pool_message() {
        let err = SampleError::InsufficientPool(Category::Specials);
        assert_eq!(err.to_string(), "No special characters available in the catalog");
    }

    #[test]
    fn test_warning_display_pluralization() {
        let single = Warning::DiversityUnsatisfiable { pools: 1, words: 4 };
        assert_eq!(
            single.to_string(),
            "Language mixing relaxed (1 word list, 4 words)"
        );

        let fallback = Warning::SamplingFallback {
            category: Category::Words,
            requested: 5,
            available: 2,
        };
        assert!(fallback.to_string().contains("Requested 5 words"));
    }

    #[test]
    fn test_catalog_error_mentions_path() {
        let err = CatalogError::NotFound(PathBuf::from("/nowhere/library"));
        assert!(err.to_string().contains("/nowhere/library"));
    }
}
