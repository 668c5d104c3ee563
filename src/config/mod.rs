//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → cloned into OracleClient, TxBuilder, MnemonicWallet
//! ```
//!
//! # Design Decisions
//! - Chain constants (fee schedule, client id, HD path, address prefix,
//!   key prefix) are fields here, never literals in the subsystems
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::FeeConfig;
pub use schema::KeyConfig;
pub use schema::ObservabilityConfig;
pub use schema::PollConfig;
pub use schema::RequestConfig;
