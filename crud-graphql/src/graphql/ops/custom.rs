//! Free-form operations that escape the CRUD mold.

use super::Error;
use crate::graphql::client::{Client, Endpoint};
use crate::graphql::document::{Document, OperationKind};
use crate::provider::{CustomRequest, Method, SingleEnvelope};
use serde_json::Value;

/// Execute an operation shaped entirely by the caller.
///
/// The request's meta carries the operation name (required), the selection, and
/// the variables, all used verbatim with no name derivation. A GET-flavored
/// request compiles to a query; every other method compiles to a mutation. When
/// the request names a url, the operation runs against that endpoint instead of
/// the one the client was built with.
pub async fn execute<C: Client>(
    client: &C,
    request: CustomRequest,
) -> Result<SingleEnvelope, Error> {
    let CustomRequest {
        url,
        method,
        headers,
        meta,
    } = request;
    let operation = meta.operation.ok_or(Error::MissingOperation)?;

    let kind = match method {
        Method::Get => OperationKind::Query,
        _ => OperationKind::Mutation,
    };
    let document = Document {
        kind,
        operation,
        variables: meta.variables,
        selection: meta.fields.unwrap_or_default(),
    };

    let mut response = match url {
        Some(url) => {
            let bound = client
                .rebind(Endpoint::with_headers(url, headers))
                .map_err(Error::request)?;
            bound.request(&document).await.map_err(Error::request)?
        }
        None => client.request(&document).await.map_err(Error::request)?,
    };

    Ok(SingleEnvelope {
        data: response.get_mut(document.operation.as_str()).map(Value::take),
    })
}
