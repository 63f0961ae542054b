use crate::catalog::{Catalog, WordPool};
use crate::composition::{Arrangement, CompositionRequest};
use crate::entropy::{self, EntropyEstimate};
use crate::error::{Category, SampleError, Warning};
use crate::rng::KeystreamRng;
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::fmt;
use zeroize::Zeroizing;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word { pool: String },
    Number,
    Special,
}

#[derive(Clone)]
pub struct Token {
    pub text: Zeroizing<String>,
    pub kind: TokenKind,
}

impl Token {
    fn new(text: &str, kind: TokenKind) -> Self {
        Self {
            text: Zeroizing::new(text.to_owned()),
            kind,
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Word { .. })
    }

    pub fn pool(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word { pool } => Some(pool),
            _ => None,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("text", &"<redacted>")
            .field("kind", &self.kind)
            .finish()
    }
}

/// One generated passphrase and everything needed to display or log it.
#[derive(Clone)]
pub struct Passphrase {
    value: Zeroizing<String>,
    tokens: Vec<Token>,
    estimate: EntropyEstimate,
    created_at: DateTime<Local>,
    warnings: Vec<Warning>,
}

impl Passphrase {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Tokens in the order they appear in [`Passphrase::as_str`].
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn estimate(&self) -> &EntropyEstimate {
        &self.estimate
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Names of the language pools that contributed at least one word.
    pub fn word_pools(&self) -> HashSet<&str> {
        self.tokens.iter().filter_map(Token::pool).collect()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passphrase")
            .field("value", &"<redacted>")
            .field("tokens", &self.tokens.len())
            .field("bits", &self.estimate.bits)
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Draws a passphrase using a freshly keyed OS-seeded stream.
pub fn sample(
    catalog: &Catalog,
    request: &CompositionRequest,
) -> Result<Passphrase, SampleError> {
    let mut rng = KeystreamRng::from_os_entropy()?;
    sample_with(catalog, request, &mut rng)
}

/// Draws a passphrase from `catalog` using `rng`.
///
/// Fails when a category with a non-zero count has no tokens. Relaxed
/// diversity and with-replacement fallbacks are reported as warnings on
/// the returned passphrase.
pub fn sample_with(
    catalog: &Catalog,
    request: &CompositionRequest,
    rng: &mut KeystreamRng,
) -> Result<Passphrase, SampleError> {
    let mut warnings = Vec::new();

    let specials = required_pool(catalog.specials(), request.specials, Category::Specials)?;
    let numbers = required_pool(catalog.numbers(), request.numbers, Category::Numbers)?;
    let words = draw_words(catalog, request, rng, &mut warnings)?;

    let mut extras = Vec::with_capacity(request.specials + request.numbers);
    if let Some(pool) = specials {
        extras.extend(
            draw_from_pool(pool, request.specials, Category::Specials, rng, &mut warnings)
                .into_iter()
                .map(|t| Token::new(t, TokenKind::Special)),
        );
    }
    if let Some(pool) = numbers {
        extras.extend(
            draw_from_pool(pool, request.numbers, Category::Numbers, rng, &mut warnings)
                .into_iter()
                .map(|t| Token::new(t, TokenKind::Number)),
        );
    }

    let (value, tokens) = match request.arrangement {
        Arrangement::Decorated if !words.is_empty() => decorate(words, extras, request, rng),
        _ => {
            let mut tokens = words;
            tokens.extend(extras);
            rng.shuffle(&mut tokens);
            let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
            (Zeroizing::new(request.join.join(&texts)), tokens)
        }
    };

    Ok(Passphrase {
        value,
        tokens,
        estimate: entropy::estimate(request, catalog),
        created_at: Local::now(),
        warnings,
    })
}

fn required_pool(
    pool: Option<&WordPool>,
    count: usize,
    category: Category,
) -> Result<Option<&WordPool>, SampleError> {
    match (pool, count) {
        (_, 0) => Ok(None),
        (Some(pool), _) => Ok(Some(pool)),
        (None, _) => Err(SampleError::InsufficientPool(category)),
    }
}

fn fallback(category: Category, requested: usize, available: usize) -> Warning {
    log::warn!(
        "Requested {} {} from a pool of {}; drawing with replacement",
        requested,
        category,
        available
    );
    Warning::SamplingFallback {
        category,
        requested,
        available,
    }
}

/// Distinct draws while the pool is large enough, with replacement otherwise.
fn draw_from_pool<'a>(
    pool: &'a WordPool,
    count: usize,
    category: Category,
    rng: &mut KeystreamRng,
    warnings: &mut Vec<Warning>,
) -> Vec<&'a str> {
    let tokens = pool.tokens();
    if count <= tokens.len() {
        rng.sample_indices(tokens.len(), count)
            .into_iter()
            .map(|i| tokens[i].as_str())
            .collect()
    } else {
        warnings.push(fallback(category, count, tokens.len()));
        (0..count)
            .map(|_| tokens[rng.below(tokens.len())].as_str())
            .collect()
    }
}

fn draw_words(
    catalog: &Catalog,
    request: &CompositionRequest,
    rng: &mut KeystreamRng,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<Token>, SampleError> {
    if request.words == 0 {
        return Ok(Vec::new());
    }

    let entries = catalog.word_entries();
    if entries.is_empty() {
        return Err(SampleError::InsufficientPool(Category::Words));
    }

    let pools: Vec<&WordPool> = catalog.languages().collect();
    let mix = request.diversity && pools.len() >= 2 && request.words >= 2;
    if request.diversity && !mix {
        log::debug!(
            "Cannot mix {} words across {} word lists",
            request.words,
            pools.len()
        );
        warnings.push(Warning::DiversityUnsatisfiable {
            pools: pools.len(),
            words: request.words,
        });
    }

    let mut used: HashSet<&str> = HashSet::new();
    let mut words = Vec::with_capacity(request.words);
    let mut repeated = false;

    if mix {
        let (seeds, forced) = draw_mixing_seeds(&pools, rng);
        repeated |= forced;
        for (text, pool) in seeds {
            used.insert(text);
            words.push(Token::new(
                text,
                TokenKind::Word {
                    pool: pool.name().to_owned(),
                },
            ));
        }
    }

    let remaining = request.words - words.len();
    let fresh: Vec<(&str, &WordPool)> = entries
        .iter()
        .copied()
        .filter(|(t, _)| !used.contains(t))
        .collect();

    let drawn: Vec<(&str, &WordPool)> = if remaining <= fresh.len() {
        rng.sample_indices(fresh.len(), remaining)
            .into_iter()
            .map(|i| fresh[i])
            .collect()
    } else {
        repeated = true;
        (0..remaining)
            .map(|_| entries[rng.below(entries.len())])
            .collect()
    };

    if repeated {
        warnings.push(fallback(Category::Words, request.words, entries.len()));
    }

    words.extend(drawn.into_iter().map(|(text, pool)| {
        Token::new(
            text,
            TokenKind::Word {
                pool: pool.name().to_owned(),
            },
        )
    }));

    Ok(words)
}

/// One word from each of two distinct lists.
///
/// The two words differ whenever the lists allow it; the returned flag is
/// set when no such pair exists and a word had to repeat.
fn draw_mixing_seeds<'a>(
    pools: &[&'a WordPool],
    rng: &mut KeystreamRng,
) -> (Vec<(&'a str, &'a WordPool)>, bool) {
    let order = rng.sample_indices(pools.len(), pools.len());
    let (a, b) = (pools[order[0]], pools[order[1]]);
    // The smaller list picks first so the larger one keeps a fresh word.
    let (first, second) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let first_text = first.tokens()[rng.below(first.len())].as_str();

    let candidates = std::iter::once(second).chain(order[2..].iter().map(|&i| pools[i]));
    for pool in candidates {
        let fresh: Vec<&str> = pool
            .tokens()
            .iter()
            .map(String::as_str)
            .filter(|t| *t != first_text)
            .collect();
        if let Some(text) = rng.choose(&fresh) {
            return (vec![(first_text, first), (*text, pool)], false);
        }
    }

    let text = second.tokens()[rng.below(second.len())].as_str();
    (vec![(first_text, first), (text, second)], true)
}

/// Attaches every extra token to the front or back of a random word.
fn decorate(
    mut words: Vec<Token>,
    extras: Vec<Token>,
    request: &CompositionRequest,
    rng: &mut KeystreamRng,
) -> (Zeroizing<String>, Vec<Token>) {
    rng.shuffle(&mut words);

    let mut prefixes: Vec<Vec<Token>> = vec![Vec::new(); words.len()];
    let mut suffixes: Vec<Vec<Token>> = vec![Vec::new(); words.len()];
    for extra in extras {
        let slot = rng.below(words.len());
        if rng.coin() {
            prefixes[slot].push(extra);
        } else {
            suffixes[slot].push(extra);
        }
    }

    let mut tokens = Vec::with_capacity(request.total_tokens());
    let mut units: Vec<Zeroizing<String>> = Vec::with_capacity(words.len());
    for ((word, pre), post) in words.into_iter().zip(prefixes).zip(suffixes) {
        let mut unit = Zeroizing::new(String::new());
        for token in pre.into_iter().chain(std::iter::once(word)).chain(post) {
            unit.push_str(&token.text);
            tokens.push(token);
        }
        units.push(unit);
    }

    let parts: Vec<&str> = units.iter().map(|u| u.as_str()).collect();
    (Zeroizing::new(request.join.join(&parts)), tokens)
}
