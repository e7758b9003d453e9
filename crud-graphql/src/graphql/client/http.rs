//! Instantiation of the transport [`Client`](super::Client) interface over HTTP.
//!
//! This instantiation is built on [`reqwest`]. Documents are posted as
//! `{"query", "variables"}` JSON and responses are read from the standard GraphQL
//! envelope: a non-empty `errors` array is a failure carrying the server's messages,
//! otherwise the contents of `data` are returned.
#![cfg(feature = "http")]

use super::{Document, Endpoint};
use async_trait::async_trait;
use derive_more::From;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use snafu::Snafu;
use std::collections::BTreeMap;
use std::fmt::Display;
use url::Url;

/// Errors returned by the HTTP transport.
#[derive(Debug, Snafu, From)]
pub enum Error {
    /// A failure below the GraphQL layer: connection, TLS, timeout, request encoding.
    #[from]
    #[snafu(display("{source}"))]
    Http { source: reqwest::Error },

    /// The server answered with GraphQL errors.
    #[snafu(display("GraphQL errors: {}", messages.join("; ")))]
    Graphql { messages: Vec<String> },

    /// The server answered with a failure status and no GraphQL envelope.
    #[snafu(display("HTTP {status}: {body}"))]
    Status { status: StatusCode, body: String },

    /// The server answered success but the body was not a GraphQL envelope.
    #[snafu(display("invalid GraphQL response: {source}"))]
    Decode { source: serde_json::Error },

    #[snafu(display("invalid header {name}: {message}"))]
    InvalidHeader { name: String, message: String },

    #[snafu(display("{message}"))]
    Custom { message: String },
}

impl super::Error for Error {
    fn custom(msg: impl Display) -> Self {
        Self::Custom {
            message: msg.to_string(),
        }
    }
}

/// A connection to a GraphQL endpoint over HTTP.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    url: Url,
    headers: HeaderMap,
}

impl Client {
    /// Connect to the endpoint at `url`.
    pub fn new(url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            headers: HeaderMap::new(),
        }
    }

    /// Connect to the endpoint at `url`, sending `headers` with every request.
    pub fn with_headers(url: Url, headers: &BTreeMap<String, String>) -> Result<Self, Error> {
        Ok(Self {
            http: reqwest::Client::new(),
            url,
            headers: build_headers(headers)?,
        })
    }

    /// Execute a raw GraphQL request.
    ///
    /// `query` is GraphQL source and `variables` its variable values. Returns the
    /// contents of the response's `data` field.
    pub async fn execute(&self, query: &str, variables: Map<String, Value>) -> Result<Value, Error> {
        tracing::info!(?variables, "{}", query);
        let response = self
            .http
            .post(self.url.clone())
            .headers(self.headers.clone())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let envelope: Response = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(source) if status.is_success() => return Err(Error::Decode { source }),
            Err(_) => return Err(Error::Status { status, body }),
        };

        // Servers are allowed to report GraphQL errors on failure statuses too; prefer
        // their messages over a bare status code.
        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                return Err(Error::Graphql {
                    messages: errors.into_iter().map(|error| error.message).collect(),
                });
            }
        }
        if !status.is_success() {
            return Err(Error::Status { status, body });
        }

        Ok(envelope.data.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl super::Client for Client {
    type Error = Error;

    async fn request(&self, document: &Document) -> Result<Value, Error> {
        self.execute(&document.render(), document.variable_values())
            .await
    }

    fn rebind(&self, endpoint: Endpoint) -> Result<Self, Error> {
        Ok(Self {
            // Sharing the inner client keeps the connection pool.
            http: self.http.clone(),
            url: endpoint.url,
            headers: build_headers(&endpoint.headers)?,
        })
    }
}

fn build_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let parsed_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| Error::InvalidHeader {
                name: name.clone(),
                message: err.to_string(),
            })?;
        let parsed_value = HeaderValue::from_str(value).map_err(|err| Error::InvalidHeader {
            name: name.clone(),
            message: err.to_string(),
        })?;
        map.insert(parsed_name, parsed_value);
    }
    Ok(map)
}

/// The GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<ResponseError>>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    message: String,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphql::client::Client as _;
    use crate::graphql::document::Variable;
    use crate::init_logging;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    fn client_for(server: &MockServer) -> Client {
        Client::new(server.uri().parse().unwrap())
    }

    #[tokio::test]
    async fn test_execute_returns_data() {
        init_logging();

        let server = server_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "posts": [{ "id": 1 }] }
        })))
        .await;

        let data = client_for(&server)
            .execute("query { posts { id } }", Map::new())
            .await
            .unwrap();
        assert_eq!(data, json!({ "posts": [{ "id": 1 }] }));
    }

    #[tokio::test]
    async fn test_wire_format() {
        init_logging();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(json!({
                "query": "query ($skip: Int) { posts(skip: $skip) { id } }",
                "variables": { "skip": 5 },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let document = Document::query("posts")
            .variable(Variable::untyped("skip", 5))
            .selection(["id"].into());
        client_for(&server).request(&document).await.unwrap();
    }

    #[tokio::test]
    async fn test_graphql_errors_are_failures() {
        init_logging();

        let server = server_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "boom" }, { "message": "also boom" }],
        })))
        .await;

        let err = client_for(&server)
            .execute("query { posts { id } }", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Graphql { .. }));
        assert_eq!(err.to_string(), "GraphQL errors: boom; also boom");
    }

    #[tokio::test]
    async fn test_failure_status_without_envelope() {
        init_logging();

        let server = server_with(ResponseTemplate::new(503).set_body_string("try later")).await;

        let err = client_for(&server)
            .execute("query { posts { id } }", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Status { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_headers_are_sent() {
        init_logging();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let headers = BTreeMap::from([("authorization".to_string(), "Bearer token".to_string())]);
        let client = Client::with_headers(server.uri().parse().unwrap(), &headers).unwrap();
        client.execute("query { ping }", Map::new()).await.unwrap();
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        init_logging();

        let headers = BTreeMap::from([("bad header".to_string(), "value".to_string())]);
        let err = Client::with_headers("http://localhost/".parse().unwrap(), &headers).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { .. }));
    }

    #[tokio::test]
    async fn test_rebind_targets_new_endpoint() {
        init_logging();

        let original = MockServer::start().await;
        let replacement = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-stage", "draft"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "ok": true } })))
            .expect(1)
            .mount(&replacement)
            .await;

        let endpoint = Endpoint::with_headers(
            replacement.uri().parse().unwrap(),
            BTreeMap::from([("x-stage".to_string(), "draft".to_string())]),
        );
        let bound = client_for(&original).rebind(endpoint).unwrap();
        let data = bound.execute("query { ok }", Map::new()).await.unwrap();
        assert_eq!(data, json!({ "ok": true }));
        assert_eq!(original.received_requests().await.unwrap().len(), 0);
    }
}
