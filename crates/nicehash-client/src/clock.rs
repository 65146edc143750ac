/*
[INPUT]:  Unauthenticated GET /api/v2/time via Transport
[OUTPUT]: Cached server time and clock offset (ping) per client
[POS]:    Clock layer - one-time synchronization before signed calls
[UPDATE]: When changing the time endpoint or offset semantics
*/

use chrono::{DateTime, Utc};
use reqwest::Method;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

use crate::endpoints;
use crate::http::transport::{RequestSpec, Transport, endpoint_url};
use crate::http::{NicehashError, Result};

/// Server clock snapshot taken at first synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    pub server_time_millis: i64,
    /// `server_time_millis` minus local time when the response arrived
    pub offset_millis: i64,
}

impl ClockState {
    pub fn new(server_time_millis: i64, local_time_millis: i64) -> Self {
        Self {
            server_time_millis,
            offset_millis: server_time_millis - local_time_millis,
        }
    }

    /// Local time shifted onto the server clock, in milliseconds
    pub fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis() + self.offset_millis
    }

    pub fn server_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.server_time_millis)
    }
}

/// Memoized clock synchronizer owned by one client.
///
/// Concurrent first callers share one in-flight fetch. A failed fetch leaves
/// the state unset so the next call tries again. There is no expiry.
#[derive(Debug, Default)]
pub struct ClockSync {
    state: OnceCell<ClockState>,
}

impl ClockSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached state, `None` before the first successful sync
    pub fn state(&self) -> Option<ClockState> {
        self.state.get().copied()
    }

    pub fn offset(&self) -> Option<i64> {
        self.state().map(|state| state.offset_millis)
    }

    pub fn server_time(&self) -> Option<i64> {
        self.state().map(|state| state.server_time_millis)
    }

    /// Fetch server time once; later calls return the cached state
    pub async fn ensure_synced(&self, transport: &Transport, base_url: &Url) -> Result<ClockState> {
        let state = self
            .state
            .get_or_try_init(|| fetch_clock_state(transport, base_url))
            .await?;
        Ok(*state)
    }
}

async fn fetch_clock_state(transport: &Transport, base_url: &Url) -> Result<ClockState> {
    let url = endpoint_url(base_url, endpoints::TIME, None)?;
    debug!(%url, "synchronizing clock");

    let response = transport
        .send(RequestSpec::new(Method::GET, url), None)
        .await?;
    let local_time_millis = Utc::now().timestamp_millis();

    let server_time_millis = parse_server_time(&response)?;
    let state = ClockState::new(server_time_millis, local_time_millis);
    info!(
        server_time = state.server_time_millis,
        offset_ms = state.offset_millis,
        "clock synchronized"
    );
    Ok(state)
}

fn parse_server_time(response: &serde_json::Value) -> Result<i64> {
    let field = response.get("serverTime").ok_or_else(|| {
        NicehashError::InvalidResponse(format!("time response missing serverTime: {response}"))
    })?;

    field
        .as_i64()
        .or_else(|| field.as_str().and_then(|raw| raw.parse().ok()))
        .ok_or_else(|| NicehashError::InvalidResponse(format!("invalid serverTime: {field}")))
}
