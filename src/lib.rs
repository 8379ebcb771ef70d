//! BSC wallet and token lens
//!
//! Aggregates on-chain and indexer data for BNB Smart Chain wallets: full
//! portfolio normalization (fungibles, NFTs, USD values), token holder
//! classification, token-list search, and `.bnb` name resolution, exposed
//! both as a library and as agent-facing tools.

pub mod apis;
pub mod config;
pub mod constants;
pub mod context;
pub mod errors;
pub mod holders;
pub mod logger;
pub mod portfolio;
pub mod tokens;
pub mod tools;
pub mod validation;

pub use config::Config;
pub use context::LensContext;
pub use errors::{LensError, LensResult};
pub use holders::get_holders_classification;
pub use portfolio::{get_portfolio, transform_to_portfolio, Portfolio};
pub use tokens::search_tokens;
pub use validation::{is_valid_address, is_valid_domain};
