/*
[INPUT]:  ClientConfig (host, locale, credentials, org id), endpoint paths, request options
[OUTPUT]: Signed API calls decoded from JSON
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

use crate::auth::HmacSigner;
use crate::clock::{ClockState, ClockSync};
use crate::config::{ClientConfig, ConfigOverrides};
use crate::http::request::RequestOptions;
use crate::http::transport::{RequestSpec, Transport, endpoint_url};
use crate::http::{NicehashError, Result};

/// Value of the `X-User-Agent` header
pub const USER_AGENT: &str = "NHRustClient";

const X_REQUEST_ID: &str = "x-request-id";
const X_USER_AGENT: &str = "x-user-agent";
const X_TIME: &str = "x-time";
const X_NONCE: &str = "x-nonce";
const X_USER_LANG: &str = "x-user-lang";
const X_ORGANIZATION_ID: &str = "x-organization-id";
const X_AUTH: &str = "x-auth";

/// Main HTTP client for the NiceHash API.
///
/// Each instance owns its configuration and clock state. The clock is synced
/// on the first authenticated call and reused for the client's lifetime.
#[derive(Debug)]
pub struct NicehashClient {
    transport: Transport,
    config: ClientConfig,
    base_url: Url,
    signer: Option<HmacSigner>,
    clock: ClockSync,
}

impl NicehashClient {
    /// Create a client from the process environment and defaults
    pub fn new() -> Result<Self> {
        Self::with_config(ConfigOverrides::default().resolve())
    }

    /// Create a client talking to `https://{config.host()}`
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        Self::with_config_and_base_url(config, base_url.as_str())
    }

    /// Create a client with an explicit base URL (e.g. a local mock server).
    ///
    /// Endpoints are appended to the base path, so a gateway prefix is kept.
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let transport = Transport::new(config.timeout())?;
        let signer = match (config.api_key(), config.api_secret()) {
            (Some(key), Some(secret)) => {
                Some(HmacSigner::new(key, secret, config.organization_id()))
            }
            _ => None,
        };

        Ok(Self {
            transport,
            base_url: Url::parse(base_url)?,
            signer,
            clock: ClockSync::new(),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Clock state; empty until the first sync
    pub fn clock(&self) -> &ClockSync {
        &self.clock
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Sync the clock now instead of on the first signed call
    pub async fn sync_clock(&self) -> Result<ClockState> {
        self.clock
            .ensure_synced(&self.transport, &self.base_url)
            .await
    }

    /// Signed GET
    pub async fn get(&self, endpoint: &str, options: RequestOptions) -> Result<serde_json::Value> {
        self.request(Method::GET, endpoint, options).await
    }

    /// Signed POST; the body is sent as JSON
    pub async fn post(&self, endpoint: &str, options: RequestOptions) -> Result<serde_json::Value> {
        self.request(Method::POST, endpoint, options).await
    }

    /// Signed PUT
    pub async fn put(&self, endpoint: &str, options: RequestOptions) -> Result<serde_json::Value> {
        self.request(Method::PUT, endpoint, options).await
    }

    /// Signed DELETE
    pub async fn delete(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<serde_json::Value> {
        self.request(Method::DELETE, endpoint, options).await
    }

    /// Signed call decoded into `T`; failures are logged and returned
    pub async fn request<T>(&self, method: Method, endpoint: &str, options: RequestOptions) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.api_call(method.clone(), endpoint, &options)
            .await
            .inspect_err(|err| error!(%method, endpoint, error = %err, "API call failed"))
    }

    /// Signed call that logs any failure and yields `None` instead of an error
    pub async fn request_or_log(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Option<serde_json::Value> {
        self.request(method, endpoint, options).await.ok()
    }

    async fn api_call<T>(&self, method: Method, endpoint: &str, options: &RequestOptions) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let signer = self
            .signer
            .as_ref()
            .ok_or(NicehashError::MissingCredentials)?;
        let clock = self.sync_clock().await?;

        let nonce = Uuid::new_v4().to_string();
        let timestamp = options
            .time
            .unwrap_or_else(|| clock.now_millis())
            .to_string();
        let body = options.payload();

        // the signature covers the path and query exactly as sent
        let url = self.endpoint_url(endpoint, options.encoded_query().as_deref())?;
        let auth = signer.sign(
            &nonce,
            &timestamp,
            method.as_str(),
            url.path(),
            url.query(),
            body,
        );

        let headers = self.auth_headers(&nonce, &timestamp, &auth)?;
        debug!(%method, %url, nonce = %nonce, timestamp = %timestamp, "dispatching signed request");

        let spec = RequestSpec::new(method, url).with_headers(headers);
        self.transport.send_json(spec, body).await
    }

    /// `endpoint?query` resolved under the base URL
    pub(crate) fn endpoint_url(&self, endpoint: &str, query: Option<&str>) -> Result<Url> {
        endpoint_url(&self.base_url, endpoint, query)
    }

    fn auth_headers(&self, nonce: &str, timestamp: &str, auth: &str) -> Result<HeaderMap> {
        let nonce = HeaderValue::from_str(nonce)?;

        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, nonce.clone());
        headers.insert(X_USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(X_TIME, HeaderValue::from_str(timestamp)?);
        headers.insert(X_NONCE, nonce);
        headers.insert(X_USER_LANG, HeaderValue::from_str(self.config.locale())?);
        headers.insert(
            X_ORGANIZATION_ID,
            HeaderValue::from_str(self.config.organization_id())?,
        );
        headers.insert(X_AUTH, HeaderValue::from_str(auth)?);
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use crate::endpoints;
    use crate::http::request::Query;
    use wiremock::matchers::{body_string, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const SERVER_TIME: i64 = 1_700_000_000_000;

    fn credentials() -> ConfigOverrides {
        ConfigOverrides::default()
            .with_credentials("api-key", "api-secret")
            .with_organization_id("org-1")
            .with_locale("de")
    }

    async fn mount_time(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(endpoints::TIME))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"serverTime": SERVER_TIME})),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    fn client(server: &MockServer, overrides: ConfigOverrides) -> NicehashClient {
        NicehashClient::with_config_and_base_url(overrides.resolve_with(|_| None), &server.uri())
            .expect("client init")
    }

    fn header_str<'a>(request: &'a Request, name: &str) -> &'a str {
        request
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_get_sends_signed_headers() {
        let server = MockServer::start().await;
        mount_time(&server).await;
        Mock::given(method("GET"))
            .and(path("/main/api/v2/accounting/accounts2"))
            .and(header("x-user-agent", USER_AGENT))
            .and(header("x-user-lang", "de"))
            .and(header("x-organization-id", "org-1"))
            .and(header("x-time", "1234"))
            .and(header_exists("x-request-id"))
            .and(header_exists("x-nonce"))
            .and(header_exists("x-auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"total": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, credentials());
        let value = client
            .get(
                "/main/api/v2/accounting/accounts2",
                RequestOptions::new().time(1234),
            )
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!({"total": 1}));

        let requests = server.received_requests().await.unwrap();
        let call = requests
            .iter()
            .find(|request| request.url.path() != endpoints::TIME)
            .unwrap();

        let nonce = header_str(call, "x-nonce");
        assert_eq!(header_str(call, "x-request-id"), nonce);
        assert!(Uuid::parse_str(nonce).is_ok());

        let signer = HmacSigner::new("api-key", "api-secret", "org-1");
        let expected = signer.sign(
            nonce,
            "1234",
            "GET",
            "/main/api/v2/accounting/accounts2",
            None,
            None,
        );
        assert_eq!(header_str(call, "x-auth"), expected);
    }

    #[tokio::test]
    async fn test_query_in_path_matches_signed_query() {
        let server = MockServer::start().await;
        mount_time(&server).await;
        Mock::given(method("GET"))
            .and(path("/main/api/v2/accounting/depositAddresses"))
            .and(query_param("currency", "BTC"))
            .and(query_param("note", "a b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, credentials());
        let query = Query::new().param("currency", "BTC").param("note", "a b");
        client
            .get(
                "/main/api/v2/accounting/depositAddresses",
                RequestOptions::new().query(query.clone()).time(99),
            )
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let call = requests
            .iter()
            .find(|request| request.url.path() != endpoints::TIME)
            .unwrap();
        assert_eq!(call.url.query(), Some(query.encode().as_str()));
        assert_eq!(call.url.query(), Some("currency=BTC&note=a%20b"));

        let signer = HmacSigner::new("api-key", "api-secret", "org-1");
        let expected = signer.sign(
            header_str(call, "x-nonce"),
            "99",
            "GET",
            "/main/api/v2/accounting/depositAddresses",
            Some(&query.encode()),
            None,
        );
        assert_eq!(header_str(call, "x-auth"), expected);
    }

    #[tokio::test]
    async fn test_timestamp_uses_clock_offset() {
        let server = MockServer::start().await;
        mount_time(&server).await;
        Mock::given(method("GET"))
            .and(path("/main/api/v2/mining/rigs2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, credentials());
        client
            .get("/main/api/v2/mining/rigs2", RequestOptions::new())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let call = requests
            .iter()
            .find(|request| request.url.path() != endpoints::TIME)
            .unwrap();
        let sent: i64 = header_str(call, "x-time").parse().unwrap();

        // server clock is fixed in the past; the offset pulls timestamps onto it
        assert!((sent - SERVER_TIME).abs() < 60_000);
        assert_eq!(client.clock().server_time(), Some(SERVER_TIME));
    }

    #[tokio::test]
    async fn test_post_sends_body() {
        let server = MockServer::start().await;
        mount_time(&server).await;
        Mock::given(method("POST"))
            .and(path("/main/api/v2/hashpower/order"))
            .and(header("content-type", "application/json"))
            .and(body_string(r#"{"limit":"0.01"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "o-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, credentials());
        let options = RequestOptions::new()
            .json_body(&serde_json::json!({"limit": "0.01"}))
            .unwrap()
            .time(5);
        let value = client
            .post("/main/api/v2/hashpower/order", options)
            .await
            .unwrap();
        assert_eq!(value["id"], "o-1");

        let requests = server.received_requests().await.unwrap();
        let call = requests
            .iter()
            .find(|request| request.url.path() != endpoints::TIME)
            .unwrap();
        let signer = HmacSigner::new("api-key", "api-secret", "org-1");
        let expected = signer.sign(
            header_str(call, "x-nonce"),
            "5",
            "POST",
            "/main/api/v2/hashpower/order",
            None,
            Some(r#"{"limit":"0.01"}"#),
        );
        assert_eq!(header_str(call, "x-auth"), expected);
    }

    #[tokio::test]
    async fn test_put_and_delete_use_their_methods() {
        let server = MockServer::start().await;
        mount_time(&server).await;
        for verb in ["PUT", "DELETE"] {
            Mock::given(method(verb))
                .and(path("/main/api/v2/hashpower/order/o-1"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({"verb": verb})),
                )
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client(&server, credentials());
        let put = client
            .put("/main/api/v2/hashpower/order/o-1", RequestOptions::new())
            .await
            .unwrap();
        let delete = client
            .delete("/main/api/v2/hashpower/order/o-1", RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(put["verb"], "PUT");
        assert_eq!(delete["verb"], "DELETE");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_without_network() {
        let server = MockServer::start().await;
        let client = client(&server, ConfigOverrides::default());

        let err = client
            .get("/main/api/v2/accounting/accounts2", RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, NicehashError::MissingCredentials));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_or_log_swallows_failures() {
        let server = MockServer::start().await;
        mount_time(&server).await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let client = client(&server, credentials());
        let result = client
            .request_or_log(Method::GET, "/broken", RequestOptions::new())
            .await;
        assert!(result.is_none());
    }

    fn signed_call(requests: &[Request]) -> &Request {
        requests
            .iter()
            .find(|request| !request.url.path().ends_with(endpoints::TIME))
            .unwrap()
    }

    fn assert_signed_as_received(call: &Request, verb: &str, timestamp: &str) {
        let signer = HmacSigner::new("api-key", "api-secret", "org-1");
        let expected = signer.sign(
            header_str(call, "x-nonce"),
            timestamp,
            verb,
            call.url.path(),
            call.url.query(),
            None,
        );
        assert_eq!(header_str(call, "x-auth"), expected);
    }

    #[rstest]
    #[case(
        "/main/api/v2/mining/rig2/my rig",
        None,
        "/main/api/v2/mining/rig2/my%20rig",
        None
    )]
    #[case(
        "/main/api/v2/x/../mining/rigs2",
        None,
        "/main/api/v2/mining/rigs2",
        None
    )]
    #[case(
        "/main/api/v2/hashpower/myOrders?algorithm=SCRYPT",
        Some(("limit", "10")),
        "/main/api/v2/hashpower/myOrders",
        Some("algorithm=SCRYPT&limit=10")
    )]
    #[tokio::test]
    async fn test_signature_covers_url_as_sent(
        #[case] endpoint: &str,
        #[case] param: Option<(&str, &str)>,
        #[case] sent_path: &str,
        #[case] sent_query: Option<&str>,
    ) {
        let server = MockServer::start().await;
        mount_time(&server).await;
        Mock::given(method("GET"))
            .and(path(sent_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut options = RequestOptions::new().time(42);
        if let Some((key, value)) = param {
            options = options.query(Query::new().param(key, value));
        }
        let client = client(&server, credentials());
        client.get(endpoint, options).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let call = signed_call(&requests);
        assert_eq!(call.url.path(), sent_path);
        assert_eq!(call.url.query(), sent_query);
        assert_signed_as_received(call, "GET", "42");
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/api/v2/time"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"serverTime": SERVER_TIME})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gateway/main/api/v2/mining/rigs2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let base_url = format!("{}/gateway", server.uri());
        let client = NicehashClient::with_config_and_base_url(
            credentials().resolve_with(|_| None),
            &base_url,
        )
        .unwrap();
        client
            .get("/main/api/v2/mining/rigs2", RequestOptions::new().time(7))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_signed_as_received(signed_call(&requests), "GET", "7");
    }

    #[test]
    fn test_endpoint_url_without_query_has_no_question_mark() {
        let client = NicehashClient::with_config_and_base_url(
            ClientConfig::default(),
            "https://api-test.nicehash.com",
        )
        .unwrap();

        let url = client.endpoint_url("/main/api/v2/mining/rigs2", None).unwrap();
        assert_eq!(url.as_str(), "https://api-test.nicehash.com/main/api/v2/mining/rigs2");

        let url = client
            .endpoint_url("/main/api/v2/mining/rigs2", Some("size=1"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api-test.nicehash.com/main/api/v2/mining/rigs2?size=1"
        );
    }
}
