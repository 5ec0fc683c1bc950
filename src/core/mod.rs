//! # Core Module
//!
//! Concurrency primitives shared across the crate.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted value with read-write locking,
//!   used for member grids and for spaces shared between threads

pub mod mt_resource;

pub use mt_resource::MtResource;
