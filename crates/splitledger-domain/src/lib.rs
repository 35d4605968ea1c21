//! splitledger-domain
//!
//! Pure domain models (Member, Expense, Money, balances and transfers).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod balance;
pub mod common;
pub mod expense;
pub mod member;
pub mod money;
pub mod snapshot;

pub use balance::*;
pub use common::*;
pub use expense::*;
pub use member::*;
pub use money::*;
pub use snapshot::*;
