//! Updating a single record by id.

use super::{input_type, singular, singular_payload, update_operation, Error};
use crate::graphql::client::Client;
use crate::graphql::document::{Document, Field, SelectionSet, Variable};
use crate::provider::{SingleEnvelope, UpdateRequest};
use serde_json::{json, Map, Value};

/// Update the record of `resource` with id `id` from `variables`.
///
/// The id travels only in the `where` argument; an `id` key inside `variables` is
/// dropped rather than sent as an updatable field.
pub async fn execute<C: Client>(
    client: &C,
    request: UpdateRequest,
) -> Result<SingleEnvelope, Error> {
    let UpdateRequest {
        resource,
        id,
        variables,
        meta,
    } = request;
    let operation = update_operation(&resource);

    let data = variables
        .into_iter()
        .filter(|(key, _)| key != "id")
        .collect::<Map<String, Value>>();
    let record_fields = meta.fields.unwrap_or_else(|| SelectionSet::from(["id"]));

    let document = Document::mutation(&operation)
        .variable(Variable::typed(
            "where",
            input_type(&resource, "WhereUniqueInput!"),
            json!({ "id": id }),
        ))
        .variable(Variable::typed(
            "data",
            input_type(&resource, "UpdateInput!"),
            data,
        ))
        .selection(SelectionSet::from(vec![Field::node(
            singular(&resource),
            record_fields,
        )]));

    let response = client.request(&document).await.map_err(Error::request)?;
    let data = singular_payload(response, &operation, &resource)?;
    Ok(SingleEnvelope { data })
}
