//! A mock GraphQL client for testing and prototyping.
//!
//! The mock client executes nothing. Instead, responses are scripted per operation
//! name with [`respond_to`](Client::respond_to) and [`fail`](Client::fail), and every
//! dispatched document is recorded so tests can assert on exactly what would have
//! gone over the wire. Clones share one script, so a test can keep a handle for
//! scripting while the provider under test owns another.
#![cfg(any(test, feature = "mocks"))]

use super::{Document, Endpoint};
use async_trait::async_trait;
use serde_json::Value;
use snafu::Snafu;
use std::collections::{HashMap, VecDeque};
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Errors returned by the mock client.
#[derive(Debug, Snafu)]
#[snafu(display("mock client error: {message}"))]
pub struct Error {
    message: String,
}

impl super::Error for Error {
    fn custom(msg: impl Display) -> Self {
        Self {
            message: msg.to_string(),
        }
    }
}

/// A recorded dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    /// The endpoint the client was rebound to, if it was rebound at all.
    pub endpoint: Option<Endpoint>,
    pub document: Document,
}

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, VecDeque<Result<Value, String>>>,
    requests: Vec<Request>,
}

/// A scriptable stand-in for a GraphQL connection.
#[derive(Clone, Debug, Default)]
pub struct Client {
    script: Arc<Mutex<Script>>,
    endpoint: Option<Endpoint>,
}

impl Client {
    /// Create a client with an empty script.
    pub fn create() -> Self {
        Self::default()
    }

    /// Script a successful response for the next request naming `operation`.
    ///
    /// `data` is the full contents of the response's `data` field, keyed by
    /// operation, exactly as a real server would shape it.
    pub fn respond_to(&self, operation: impl Into<String>, data: Value) {
        self.lock()
            .responses
            .entry(operation.into())
            .or_default()
            .push_back(Ok(data));
    }

    /// Script a failure for the next request naming `operation`.
    pub fn fail(&self, operation: impl Into<String>, message: impl Display) {
        self.lock()
            .responses
            .entry(operation.into())
            .or_default()
            .push_back(Err(message.to_string()));
    }

    /// Every request dispatched so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl super::Client for Client {
    type Error = Error;

    async fn request(&self, document: &Document) -> Result<Value, Error> {
        tracing::info!("{}", document.render());
        let mut script = self.lock();
        script.requests.push(Request {
            endpoint: self.endpoint.clone(),
            document: document.clone(),
        });
        let scripted = script
            .responses
            .get_mut(&document.operation)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(Ok(data)) => Ok(data),
            Some(Err(message)) => Err(Error { message }),
            None => Err(Error {
                message: format!("no scripted response for operation {}", document.operation),
            }),
        }
    }

    fn rebind(&self, endpoint: Endpoint) -> Result<Self, Error> {
        Ok(Self {
            script: self.script.clone(),
            endpoint: Some(endpoint),
        })
    }
}
