//! External integrations

pub mod imagery;
pub mod yield_model;

pub use imagery::{HttpImageryClient, ImageryError, ImageryProvider};
pub use yield_model::LinearYieldModel;
