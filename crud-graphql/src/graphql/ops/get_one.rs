//! Fetching a single record by id.

use super::{get_many, Error};
use crate::graphql::client::Client;
use crate::provider::{GetManyRequest, GetOneRequest, SingleEnvelope};

/// Fetch the record of `resource` with id `id`.
///
/// This is a batch fetch of one id. An id the backend knows nothing about yields
/// an empty envelope rather than an error.
pub async fn execute<C: Client>(
    client: &C,
    request: GetOneRequest,
) -> Result<SingleEnvelope, Error> {
    let GetOneRequest { resource, id, meta } = request;
    let many = get_many::execute(
        client,
        GetManyRequest {
            resource,
            ids: vec![id],
            meta,
        },
    )
    .await?;
    Ok(SingleEnvelope {
        data: many.data.into_iter().next(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fields;
    use crate::graphql::client::mock;
    use crate::init_logging;
    use crate::provider::Meta;
    use serde_json::{json, Value};

    fn request() -> GetOneRequest {
        GetOneRequest {
            resource: "posts".into(),
            id: json!(7),
            meta: Meta {
                fields: Some(fields!["id", "title"]),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_get_one_is_a_batch_of_one() {
        init_logging();

        let client = mock::Client::create();
        client.respond_to("posts", json!({ "posts": [{ "id": 7, "title": "seven" }] }));

        let envelope = execute(&client, request()).await.unwrap();
        assert_eq!(envelope.data, Some(json!({ "id": 7, "title": "seven" })));

        let document = &client.requests()[0].document;
        assert_eq!(
            Value::from(document.variable_values()),
            json!({ "where": { "id_in": [7] } }),
        );
    }

    #[tokio::test]
    async fn test_unknown_id_yields_an_empty_envelope() {
        init_logging();

        let client = mock::Client::create();
        client.respond_to("posts", json!({ "posts": [] }));

        let envelope = execute(&client, request()).await.unwrap();
        assert_eq!(envelope.data, None);
    }
}
