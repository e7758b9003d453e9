//! The transport interface used to dispatch GraphQL documents.
//!
//! The translation layer talks to servers exclusively through the [`Client`] trait, so
//! it can be exercised against the scripted [`mock`] transport and deployed against the
//! [`http`] transport (or any other implementation) without change.

use super::document::Document;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;
use url::Url;

pub mod http;
pub mod mock;

/// Errors reported by a transport implementation.
pub trait Error: std::error::Error + Send + Sync + 'static {
    /// An error with a custom message.
    fn custom(msg: impl Display) -> Self;
}

/// The address of a GraphQL endpoint: a URL and the headers to send with every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub url: Url,
    pub headers: BTreeMap<String, String>,
}

impl Endpoint {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: Default::default(),
        }
    }

    pub fn with_headers(url: Url, headers: BTreeMap<String, String>) -> Self {
        Self { url, headers }
    }
}

impl From<Url> for Endpoint {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

/// A connection to a GraphQL server.
#[async_trait]
pub trait Client: Clone + Send + Sync + 'static {
    type Error: Error;

    /// Dispatch a document and return the contents of the response's `data` field.
    async fn request(&self, document: &Document) -> Result<Value, Self::Error>;

    /// A client like this one bound to a different endpoint.
    ///
    /// The receiver is left untouched; the returned client is independent of it apart
    /// from sharing whatever connection pooling the implementation provides.
    fn rebind(&self, endpoint: Endpoint) -> Result<Self, Self::Error>;
}
