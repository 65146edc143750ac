/*
[INPUT]:  API credentials and request fields
[OUTPUT]: Signed X-Auth header values
[POS]:    Auth layer - handles NiceHash API request authentication
[UPDATE]: When auth flow or signature methods change
*/

pub mod signer;

pub use signer::HmacSigner;
