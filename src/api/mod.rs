pub mod client;
pub mod types;

pub use client::{ExploreBackend, HttpBackend};
pub use types::{ExploreResult, TourismSite, WeatherSnapshot};
