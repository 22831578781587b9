//! Configuration management.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ContinuationsConfig (validated, immutable)
//!     → ContinuationClient::from_config (capabilities chosen once)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty config is valid
//! - The bus backend is selected here, once; call sites never branch
//!   on a mode flag
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BusBackend, BusConfig, ContinuationsConfig, CorrelationConfig, TransportConfig};
