//! Text search against the Google Places API (New), mapped into
//! [`BusinessRecord`](leadgen_core::BusinessRecord)s.

pub mod client;
pub mod error;
pub mod types;

pub use client::{PlacesClient, PlacesSearch};
pub use error::PlacesError;
