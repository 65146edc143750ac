/*
[INPUT]:  Caller-supplied query pairs, body payload and timestamp override
[OUTPUT]: URL-encoded query string shared by signer and transport
[POS]:    HTTP layer - per-call request options
[UPDATE]: When adding request options or changing query encoding
*/

use serde::Serialize;

use crate::http::Result;

/// Ordered query parameters.
///
/// The encoded form is hashed by the signer and appended to the path, so both
/// always see the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, keeping insertion order
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// `k1=v1&k2=v2` with keys and values percent-encoded
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Query::new(), |query, (k, v)| query.param(k, v))
    }
}

/// Options for one API call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub query: Option<Query>,
    pub body: Option<String>,
    /// Explicit timestamp in milliseconds; skips the synced clock
    pub time: Option<i64>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    /// Raw body string, signed and sent as-is
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` to a JSON body
    pub fn json_body<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(payload)?);
        Ok(self)
    }

    pub fn time(mut self, millis: i64) -> Self {
        self.time = Some(millis);
        self
    }

    /// Encoded query, or `None` when there is nothing to send
    pub(crate) fn encoded_query(&self) -> Option<String> {
        self.query
            .as_ref()
            .filter(|query| !query.is_empty())
            .map(Query::encode)
    }

    /// Body to sign and send, skipping empty strings
    pub(crate) fn payload(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}
