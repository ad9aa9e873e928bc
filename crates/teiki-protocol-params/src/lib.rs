//! # Teiki Protocol Params
//!
//! Validated configuration tables for a protocol instance.
//!
//! Neither table feeds script hashing. They are loaded once, validated, and
//! passed by reference to transaction-building code:
//!
//! - [`ProtocolNonScriptParams`] - fees, share ratios, milestones, durations
//! - [`TransactionConstants`] - output minimums and discount schedules
//!
//! ```rust
//! use teiki_protocol_params::ProtocolNonScriptParams;
//!
//! let params = ProtocolNonScriptParams::default().validated().unwrap();
//! assert_eq!(params.project_milestones.len(), 3);
//! ```

pub mod constants;
pub mod error;
pub mod params;

pub use constants::{TransactionConstants, FRACTION_LIMIT, RATIO_MULTIPLIER};
pub use error::{ConfigError, Result};
pub use params::{DurationMillis, ProtocolNonScriptParams};
