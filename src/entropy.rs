//! Heuristic strength estimate.
//!
//! Each category contributes `count * log2(pool_size)` bits. The figure is a
//! guide for the user, not a proof of unpredictability: it treats every
//! token in a pool as equally likely and knows nothing about the language.

use crate::catalog::Catalog;
use crate::composition::{Arrangement, CompositionRequest};
use crate::error::Category;

pub const FAIR_ENTROPY: f64 = 60.0;
pub const STRONG_ENTROPY: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Weak,
    Fair,
    Strong,
}

impl Strength {
    pub fn label(self) -> &'static str {
        match self {
            Strength::Weak => "Weak",
            Strength::Fair => "Fair",
            Strength::Strong => "Strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryBits {
    pub category: Category,
    pub count: usize,
    pub pool_size: usize,
    pub bits: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntropyEstimate {
    pub bits: f64,
    pub categories: Vec<CategoryBits>,
    /// Extra bits from where decorations land, zero for shuffled output.
    pub placement_bits: f64,
}

impl EntropyEstimate {
    pub fn strength(&self) -> Strength {
        if self.bits >= STRONG_ENTROPY {
            Strength::Strong
        } else if self.bits >= FAIR_ENTROPY {
            Strength::Fair
        } else {
            Strength::Weak
        }
    }
}

fn bits_for(count: usize, pool_size: usize) -> f64 {
    if pool_size <= 1 || count == 0 {
        0.0
    } else {
        count as f64 * (pool_size as f64).log2()
    }
}

/// Estimates the strength of passphrases produced for `request`.
///
/// Depends only on pool sizes and counts, never on drawn tokens. Words are
/// scored against the distinct tokens of all language pools combined.
pub fn estimate(request: &CompositionRequest, catalog: &Catalog) -> EntropyEstimate {
    let pools = [
        (Category::Words, request.words, catalog.word_union().len()),
        (
            Category::Specials,
            request.specials,
            catalog.specials().map_or(0, |p| p.len()),
        ),
        (
            Category::Numbers,
            request.numbers,
            catalog.numbers().map_or(0, |p| p.len()),
        ),
    ];

    let categories: Vec<CategoryBits> = pools
        .into_iter()
        .filter(|(_, _, pool_size)| *pool_size > 0)
        .map(|(category, count, pool_size)| CategoryBits {
            category,
            count,
            pool_size,
            bits: bits_for(count, pool_size),
        })
        .collect();

    let placement_bits = match request.arrangement {
        Arrangement::Decorated if request.words > 0 => {
            let decorations = categories
                .iter()
                .filter(|c| c.category != Category::Words)
                .map(|c| c.count)
                .sum::<usize>();
            decorations as f64 * (2.0 * request.words as f64).log2()
        }
        _ => 0.0,
    };

    let bits = categories.iter().map(|c| c.bits).sum::<f64>() + placement_bits;

    EntropyEstimate {
        bits,
        categories,
        placement_bits,
    }
}
