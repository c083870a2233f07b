//! Business logic services for the GreenSignal parcel monitor

pub mod parcel;
pub mod series;

pub use parcel::ParcelService;
pub use series::SeriesAssembler;
