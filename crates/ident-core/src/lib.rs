//! Core types, the store trait, and the consolidation engine for identity
//! reconciliation.
//!
//! No HTTP or database code lives here; the store and server crates build on
//! it.

// Store impls use native `async fn`; the trait spells out the `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod consolidate;
pub mod contact;
pub mod error;
pub mod store;
pub mod view;

pub use consolidate::Consolidator;
pub use error::{Error, Result};
