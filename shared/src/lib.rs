//! Shared types and models for the GreenSignal parcel monitor
//!
//! This crate contains the data model, validation and decision engine shared
//! between the backend, the browser dashboard (via WASM), and other
//! components of the system.

pub mod engine;
pub mod indices;
pub mod models;
pub mod types;
pub mod validation;

pub use engine::*;
pub use indices::*;
pub use models::*;
pub use types::*;
pub use validation::*;
