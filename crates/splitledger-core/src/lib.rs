//! splitledger-core
//!
//! Balance aggregation, settlement planning and validation for shared expenses.
//! Depends on splitledger-domain. No CLI, no terminal I/O, no storage.

pub mod balance_service;
pub mod diagnostics;
pub mod error;
pub mod expense_service;
pub mod member_service;
pub mod public_api;
pub mod settlement_service;
pub mod stats_service;

pub use balance_service::*;
pub use diagnostics::snapshot_warnings;
pub use error::CoreError;
pub use expense_service::*;
pub use member_service::*;
pub use public_api::*;
pub use settlement_service::*;
pub use stats_service::*;
