//! Implementation of the `#[derive(Model)]` macro.
//!
//! Struct annotations become a `seekql::ModelDescription`, so a registry can
//! be built from plain Rust types.

mod attrs;
mod derive;

pub use derive::model_derive_impl;
