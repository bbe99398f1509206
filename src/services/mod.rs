pub mod geocode;
pub mod preview;
pub mod store;
pub mod trips;
