//! Fetching a batch of records by id.

use super::{input_type, operation_payload, resource_operation, Error};
use crate::graphql::client::Client;
use crate::graphql::document::{Document, Variable};
use crate::provider::{GetManyRequest, ManyEnvelope};
use serde_json::{json, Value};

/// Fetch every record of `resource` whose id is in `ids`.
///
/// Records come back in whatever order the backend chooses, which need not match
/// `ids`.
pub async fn execute<C: Client>(
    client: &C,
    request: GetManyRequest,
) -> Result<ManyEnvelope, Error> {
    let GetManyRequest {
        resource,
        ids,
        meta,
    } = request;
    let operation = resource_operation(&resource);

    let document = Document::query(&operation)
        .variable(Variable::typed(
            "where",
            input_type(&resource, "WhereInput"),
            json!({ "id_in": ids }),
        ))
        .selection(meta.fields.unwrap_or_default());

    let response = client.request(&document).await.map_err(Error::request)?;
    match operation_payload(response, &operation)? {
        Value::Array(data) => Ok(ManyEnvelope { data }),
        _ => Err(Error::unexpected(operation)),
    }
}
