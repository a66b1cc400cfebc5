mod bounds;
mod http;

pub use bounds::FilterBoundsCache;
pub use http::ApiClient;
