//! HTTP request handlers

pub mod health;
pub mod parcel;

pub use health::health_check;
pub use parcel::*;
