/*
[INPUT]:  Client configuration, endpoint paths and request options
[OUTPUT]: Signed requests and JSON-decoded API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod public;
pub mod request;
pub mod transport;

pub use error::{NicehashError, Result};
pub use request::{Query, RequestOptions};
pub use transport::{RequestSpec, Transport};

pub use client::{NicehashClient, USER_AGENT};
