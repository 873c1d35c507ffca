pub mod client;
pub mod memory;
pub mod traits;
pub mod types;

pub use client::HttpPropertyApi;
pub use memory::InMemoryPropertyApi;
pub use traits::PropertyApi;
pub use types::{AmenitiesPayload, BasicInfoPayload};
