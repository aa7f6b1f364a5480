// flagdex-api: async client for the country directory endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{CountryClient, DEFAULT_ENDPOINT};
pub use error::{Error, FetchFailureKind};
pub use models::RawCountry;
pub use transport::TransportConfig;
