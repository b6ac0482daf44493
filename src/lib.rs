#![doc(test(attr(deny(warnings))))]

//! GPA Core tracks modules across eight semester slots and computes a
//! credit-weighted GPA with an S/U exemption cap.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("GPA Core tracing initialized.");
    });
}
