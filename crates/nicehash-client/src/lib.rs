/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public NiceHash client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod clock;
pub mod config;
pub mod endpoints;
pub mod format;
pub mod http;

pub use auth::HmacSigner;

pub use clock::{ClockState, ClockSync};

pub use config::{ClientConfig, ConfigOverrides, PRODUCTION_HOST, SANDBOX_HOST};

pub use format::{PathArgs, format_path};

// Re-export commonly used types from http
pub use http::{
    NicehashClient,
    NicehashError,
    Query,
    RequestOptions,
    RequestSpec,
    Result,
    Transport,
};

// Method is part of the request API
pub use reqwest::Method;
