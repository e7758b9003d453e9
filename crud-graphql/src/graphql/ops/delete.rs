//! Deleting a single record by id.

use super::{default_mutation_selection, delete_operation, input_type, singular_payload, Error};
use crate::graphql::client::Client;
use crate::graphql::document::{Document, Variable};
use crate::provider::{DeleteOneRequest, SingleEnvelope};
use serde_json::json;

/// Delete the record of `resource` with id `id`, returning what the backend
/// reports of the deleted record.
pub async fn execute<C: Client>(
    client: &C,
    request: DeleteOneRequest,
) -> Result<SingleEnvelope, Error> {
    let DeleteOneRequest { resource, id, meta } = request;
    let operation = meta
        .operation
        .unwrap_or_else(|| delete_operation(&resource));

    let document = Document::mutation(&operation)
        .variable(Variable::typed(
            "where",
            input_type(&resource, "WhereUniqueInput!"),
            json!({ "id": id }),
        ))
        .selection(
            meta.fields
                .unwrap_or_else(|| default_mutation_selection(&resource)),
        );

    let response = client.request(&document).await.map_err(Error::request)?;
    let data = singular_payload(response, &operation, &resource)?;
    Ok(SingleEnvelope { data })
}
