#![doc(test(attr(deny(warnings))))]

//! splitledger splits shared expenses evenly between group members and plans
//! the transfers that settle everyone up.
//!
//! The heavy lifting lives in the workspace crates; this crate wires them into
//! a line-oriented shell and re-exports them for embedding.

pub mod cli;
pub mod errors;
pub mod utils;

pub use splitledger_config;
pub use splitledger_core;
pub use splitledger_domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("splitledger tracing initialized.");
    });
}
