//! Transport layer: SODA query construction and the blocking HTTP client.

pub mod query;
pub mod soda_client;

pub use query::PageQuery;
pub use soda_client::{PageFetcher, SodaClient, SodaClientConfig};
