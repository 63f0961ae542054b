/// How drawn tokens are glued into the final string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum JoinRule {
    #[default]
    Concatenate,
    Separator(String),
}

impl JoinRule {
    pub fn join<S: AsRef<str>>(&self, parts: &[S]) -> String {
        let sep = match self {
            JoinRule::Concatenate => "",
            JoinRule::Separator(sep) => sep.as_str(),
        };
        let mut out = String::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(part.as_ref());
        }
        out
    }
}

/// Ordering of tokens in the final passphrase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Arrangement {
    /// Every token, of any category, in one random order.
    #[default]
    Shuffled,
    /// Words form the spine; numbers and specials are stuck onto the front
    /// or back of a random word.
    Decorated,
}

/// What a single generation should contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRequest {
    pub words: usize,
    pub specials: usize,
    pub numbers: usize,
    /// Require words from at least two language pools when possible.
    pub diversity: bool,
    pub join: JoinRule,
    pub arrangement: Arrangement,
}

impl CompositionRequest {
    pub const DEFAULT_WORDS: usize = 4;
    pub const DEFAULT_SPECIALS: usize = 2;
    pub const DEFAULT_NUMBERS: usize = 1;

    pub fn new(words: usize, specials: usize, numbers: usize) -> Self {
        Self {
            words,
            specials,
            numbers,
            ..Self::default()
        }
    }

    pub fn with_diversity(mut self, diversity: bool) -> Self {
        self.diversity = diversity;
        self
    }

    pub fn with_join(mut self, join: JoinRule) -> Self {
        self.join = join;
        self
    }

    pub fn with_arrangement(mut self, arrangement: Arrangement) -> Self {
        self.arrangement = arrangement;
        self
    }

    pub fn total_tokens(&self) -> usize {
        self.words + self.specials + self.numbers
    }
}

impl Default for CompositionRequest {
    fn default() -> Self {
        Self {
            words: Self::DEFAULT_WORDS,
            specials: Self::DEFAULT_SPECIALS,
            numbers: Self::DEFAULT_NUMBERS,
            diversity: true,
            join: JoinRule::default(),
            arrangement: Arrangement::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_rules() {
        let parts = ["raven", "7", "foot"];
        assert_eq!(JoinRule::Concatenate.join(&parts), "raven7foot");
        assert_eq!(
            JoinRule::Separator("-".to_string()).join(&parts),
            "raven-7-foot"
        );
        assert_eq!(JoinRule::Concatenate.join::<&str>(&[]), "");
    }

    #[test]
    fn test_default_request() {
        let request = CompositionRequest::default();
        assert_eq!(request.total_tokens(), 7);
        assert!(request.diversity);
        assert_eq!(request.join, JoinRule::Concatenate);
        assert_eq!(request.arrangement, Arrangement::Shuffled);
    }

    #[test]
    fn test_new_keeps_defaults() {
        let request = CompositionRequest::new(3, 0, 2).with_diversity(false);
        assert_eq!((request.words, request.specials, request.numbers), (3, 0, 2));
        assert!(!request.diversity);
    }
}
