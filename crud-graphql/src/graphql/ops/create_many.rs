//! Creating a batch of records, one mutation per record.

use super::{create_operation, default_mutation_selection, singular_payload, Error};
use crate::graphql::client::Client;
use crate::graphql::document::{Document, Variable};
use crate::provider::{CreateManyRequest, ManyEnvelope};
use futures::future::try_join_all;
use serde_json::{json, Value};

/// Create one record of `resource` per entry of `variables`.
///
/// The mutations are dispatched concurrently and the envelope is positional: the
/// nth entry is the record created from the nth input. Any failure fails the whole
/// call, but mutations the backend has already accepted are not rolled back.
pub async fn execute<C: Client>(
    client: &C,
    request: CreateManyRequest,
) -> Result<ManyEnvelope, Error> {
    let CreateManyRequest {
        resource,
        variables,
        meta,
    } = request;
    let derived = create_operation(&resource);
    // The input type keeps the resource-derived name even when the operation is
    // overridden, and is camelCase rather than PascalCase on this backend.
    let input_type = format!("{derived}Input");
    let operation = meta.operation.unwrap_or(derived);
    let selection = meta
        .fields
        .unwrap_or_else(|| default_mutation_selection(&resource));

    let documents = variables
        .into_iter()
        .map(|record| {
            Document::mutation(&operation)
                .variable(Variable::typed(
                    "input",
                    input_type.clone(),
                    json!({ "data": record }),
                ))
                .selection(selection.clone())
        })
        .collect::<Vec<_>>();

    let responses = try_join_all(documents.iter().map(|document| client.request(document)))
        .await
        .map_err(Error::request)?;

    let data = responses
        .into_iter()
        .map(|response| {
            Ok(singular_payload(response, &operation, &resource)?.unwrap_or(Value::Null))
        })
        .collect::<Result<_, Error>>()?;

    let envelope = ManyEnvelope { data };
    tracing::debug!(created = envelope.data.len(), "batch created {resource}");
    Ok(envelope)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphql::client::mock;
    use crate::init_logging;
    use crate::provider::Meta;
    use serde_json::{json, Map};

    fn records(titles: &[&str]) -> Vec<Map<String, Value>> {
        titles
            .iter()
            .map(|title| Map::from_iter([("title".to_string(), json!(title))]))
            .collect()
    }

    #[tokio::test]
    async fn test_create_many_dispatches_one_mutation_per_record() {
        init_logging();

        let client = mock::Client::create();
        for id in 1..=3 {
            client.respond_to("createPost", json!({ "createPost": { "post": { "id": id } } }));
        }

        let envelope = execute(
            &client,
            CreateManyRequest {
                resource: "posts".into(),
                variables: records(&["one", "two", "three"]),
                meta: Meta::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            envelope.data,
            vec![
                json!({ "id": 1 }),
                json!({ "id": 2 }),
                json!({ "id": 3 }),
            ],
        );

        let requests = client.requests();
        assert_eq!(requests.len(), 3);
        for (request, title) in requests.iter().zip(["one", "two", "three"]) {
            assert_eq!(
                request.document.render(),
                "mutation ($input: createPostInput) { createPost(input: $input) { post { id } } }",
            );
            assert_eq!(
                Value::from(request.document.variable_values()),
                json!({ "input": { "data": { "title": title } } }),
            );
        }
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_whole_batch() {
        init_logging();

        let client = mock::Client::create();
        client.respond_to("createPost", json!({ "createPost": { "post": { "id": 1 } } }));
        client.fail("createPost", "duplicate slug");
        client.respond_to("createPost", json!({ "createPost": { "post": { "id": 3 } } }));

        let err = execute(
            &client,
            CreateManyRequest {
                resource: "posts".into(),
                variables: records(&["one", "two", "three"]),
                meta: Meta::default(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Request { .. }));
        assert_eq!(err.to_string(), "mock client error: duplicate slug");
    }

    #[tokio::test]
    async fn test_operation_override_keeps_the_derived_input_type() {
        init_logging();

        let client = mock::Client::create();
        client.respond_to("insertPost", json!({ "insertPost": { "post": { "id": 9 } } }));

        let envelope = execute(
            &client,
            CreateManyRequest {
                resource: "posts".into(),
                variables: records(&["one"]),
                meta: Meta {
                    operation: Some("insertPost".into()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
        assert_eq!(envelope.data, vec![json!({ "id": 9 })]);

        assert_eq!(
            client.requests()[0].document.render(),
            "mutation ($input: createPostInput) { insertPost(input: $input) { post { id } } }",
        );
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing() {
        init_logging();

        let client = mock::Client::create();
        let envelope = execute(
            &client,
            CreateManyRequest {
                resource: "posts".into(),
                variables: vec![],
                meta: Meta::default(),
            },
        )
        .await
        .unwrap();
        assert!(envelope.data.is_empty());
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_singular_child_becomes_null() {
        init_logging();

        let client = mock::Client::create();
        client.respond_to("createPost", json!({ "createPost": { "post": { "id": 1 } } }));
        client.respond_to("createPost", json!({ "createPost": {} }));

        let envelope = execute(
            &client,
            CreateManyRequest {
                resource: "posts".into(),
                variables: records(&["one", "two"]),
                meta: Meta::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(envelope.data, vec![json!({ "id": 1 }), Value::Null]);
    }
}
