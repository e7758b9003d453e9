//! Paginated, filtered, sorted listing of a resource.

use super::{
    compile_filters, connection_operation, input_type, operation_payload, override_variable,
    sort_token, Error,
};
use crate::graphql::client::Client;
use crate::graphql::document::{Document, Field, SelectionSet, Variable};
use crate::provider::{GetListRequest, ListEnvelope, PaginationMode};
use serde_json::Value;

/// Fetch one page of `resource`, returning the page and the total match count.
pub async fn execute<C: Client>(
    client: &C,
    request: GetListRequest,
) -> Result<ListEnvelope, Error> {
    let GetListRequest {
        resource,
        pagination,
        sorters,
        filters,
        meta,
    } = request;
    let operation = connection_operation(&resource);

    // Caller variables go in first so the derived ones win on collision.
    let mut variables = meta.variables;
    if let Some(token) = sort_token(&sorters) {
        override_variable(
            &mut variables,
            Variable::typed("orderBy", input_type(&resource, "OrderByInput"), token),
        );
    }
    override_variable(
        &mut variables,
        Variable::typed(
            "where",
            input_type(&resource, "WhereInput"),
            compile_filters(&filters)?,
        ),
    );
    if pagination.mode == PaginationMode::Server {
        override_variable(
            &mut variables,
            Variable::untyped(
                "skip",
                u64::from(pagination.current.saturating_sub(1)) * u64::from(pagination.page_size),
            ),
        );
        override_variable(
            &mut variables,
            Variable::untyped("first", pagination.page_size),
        );
    }

    let document = Document::query(&operation)
        .variables(variables)
        .selection(SelectionSet::from(vec![
            Field::node("aggregate", ["count"].into()),
            Field::node(
                "edges",
                SelectionSet::from(vec![Field::node("node", meta.fields.unwrap_or_default())]),
            ),
        ]));

    let response = client.request(&document).await.map_err(Error::request)?;
    let mut connection = operation_payload(response, &operation)?;
    if !connection.is_object() {
        return Err(Error::unexpected(operation));
    }

    let total = connection
        .pointer("/aggregate/count")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::unexpected(format!("{operation}.aggregate.count")))?;
    let data = match connection.get_mut("edges").map(Value::take) {
        Some(Value::Array(edges)) => edges
            .into_iter()
            .map(|mut edge| edge.get_mut("node").map(Value::take).unwrap_or(Value::Null))
            .collect(),
        _ => return Err(Error::unexpected(format!("{operation}.edges"))),
    };

    let envelope = ListEnvelope { data, total };
    tracing::debug!(
        total = envelope.total,
        returned = envelope.data.len(),
        "listed {resource}"
    );
    Ok(envelope)
}
