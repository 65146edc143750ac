/*
[INPUT]:  Endpoint paths and optional query parameters
[OUTPUT]: Public data decoded from JSON (server time, market info)
[POS]:    HTTP layer - unauthenticated endpoints (no signature, no clock sync)
[UPDATE]: When adding public helpers or changing response handling
*/

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::endpoints;
use crate::http::request::Query;
use crate::http::transport::RequestSpec;
use crate::http::{NicehashClient, Result};

impl NicehashClient {
    /// Unauthenticated GET
    ///
    /// GET {endpoint}?{query}
    pub async fn get_public<T>(&self, endpoint: &str, query: Option<&Query>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let encoded = query.filter(|query| !query.is_empty()).map(Query::encode);
        let url = self.endpoint_url(endpoint, encoded.as_deref())?;
        self.transport()
            .send_json(RequestSpec::new(Method::GET, url), None)
            .await
    }

    /// Raw server time response, bypassing the cached clock
    ///
    /// GET /api/v2/time
    pub async fn fetch_server_time(&self) -> Result<serde_json::Value> {
        self.get_public(endpoints::TIME, None).await
    }
}
