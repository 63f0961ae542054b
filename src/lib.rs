pub mod catalog;
pub mod composition;
pub mod entropy;
pub mod error;
pub mod history;
pub mod rng;
pub mod sampler;
pub mod ui;

pub use catalog::{Catalog, CatalogBuilder, WordPool};
pub use composition::{Arrangement, CompositionRequest, JoinRule};
pub use entropy::{EntropyEstimate, Strength, estimate};
pub use error::{CatalogError, Category, HistoryError, SampleError, Warning};
pub use history::HistoryLog;
pub use rng::KeystreamRng;
pub use sampler::{Passphrase, Token, TokenKind, sample, sample_with};
