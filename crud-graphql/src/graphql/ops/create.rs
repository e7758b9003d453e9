//! Creating a single record.

use super::{create_operation, default_mutation_selection, input_type, singular_payload, Error};
use crate::graphql::client::Client;
use crate::graphql::document::{Document, Variable};
use crate::provider::{CreateRequest, SingleEnvelope};

/// Create one record of `resource` from `variables`.
pub async fn execute<C: Client>(
    client: &C,
    request: CreateRequest,
) -> Result<SingleEnvelope, Error> {
    let CreateRequest {
        resource,
        variables,
        meta,
    } = request;
    let operation = create_operation(&resource);

    let document = Document::mutation(&operation)
        .variable(Variable::typed(
            "data",
            input_type(&resource, "CreateInput!"),
            variables,
        ))
        .selection(
            meta.fields
                .unwrap_or_else(|| default_mutation_selection(&resource)),
        );

    let response = client.request(&document).await.map_err(Error::request)?;
    let data = singular_payload(response, &operation, &resource)?;
    Ok(SingleEnvelope { data })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fields;
    use crate::graphql::client::mock;
    use crate::init_logging;
    use crate::provider::Meta;
    use serde_json::{json, Map, Value};

    fn record() -> Map<String, Value> {
        Map::from_iter([
            ("title".to_string(), json!("Hello")),
            ("status".to_string(), json!("DRAFT")),
        ])
    }

    #[tokio::test]
    async fn test_create_compiles_the_mutation() {
        init_logging();

        let client = mock::Client::create();
        client.respond_to("createPost", json!({ "createPost": { "post": { "id": 7 } } }));

        let envelope = execute(
            &client,
            CreateRequest {
                resource: "posts".into(),
                variables: record(),
                meta: Meta::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(envelope.data, Some(json!({ "id": 7 })));

        let document = &client.requests()[0].document;
        assert_eq!(
            document.render(),
            "mutation ($data: PostCreateInput!) { createPost(data: $data) { post { id } } }",
        );
        assert_eq!(
            Value::from(document.variable_values()),
            json!({ "data": { "title": "Hello", "status": "DRAFT" } }),
        );
    }

    #[tokio::test]
    async fn test_custom_fields_replace_the_whole_selection() {
        init_logging();

        let client = mock::Client::create();
        // With a flat selection the response has no singular child, so the envelope
        // comes back empty. Callers selecting their own fields are on their own.
        client.respond_to("createPost", json!({ "createPost": { "id": 7, "title": "Hello" } }));

        let envelope = execute(
            &client,
            CreateRequest {
                resource: "posts".into(),
                variables: record(),
                meta: Meta {
                    fields: Some(fields!["id", "title"]),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
        assert_eq!(envelope.data, None);

        let document = &client.requests()[0].document;
        assert_eq!(
            document.render(),
            "mutation ($data: PostCreateInput!) { createPost(data: $data) { id title } }",
        );
    }

    #[tokio::test]
    async fn test_operation_override_is_ignored() {
        init_logging();

        let client = mock::Client::create();
        client.respond_to("createPost", json!({ "createPost": { "post": { "id": 7 } } }));

        let envelope = execute(
            &client,
            CreateRequest {
                resource: "posts".into(),
                variables: record(),
                meta: Meta {
                    operation: Some("insertPost".into()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
        assert_eq!(envelope.data, Some(json!({ "id": 7 })));

        assert!(client.requests()[0]
            .document
            .render()
            .contains("{ createPost(data: $data)"));
    }

    #[tokio::test]
    async fn test_missing_operation_key_is_an_error() {
        init_logging();

        let client = mock::Client::create();
        client.respond_to("createPost", json!({}));

        let err = execute(
            &client,
            CreateRequest {
                resource: "posts".into(),
                variables: record(),
                meta: Meta::default(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "unexpected response shape at createPost");
    }
}
