//! Instantiation of the generic data contract for GraphQL backends.

use super::client::Client;
use super::ops;
use crate::provider::{
    CreateManyRequest, CreateRequest, CustomRequest, DataProvider, DeleteOneRequest,
    GetListRequest, GetManyRequest, GetOneRequest, ListEnvelope, ManyEnvelope, SingleEnvelope,
    UpdateRequest,
};
use async_trait::async_trait;
use derive_more::From;
use url::Url;

pub use ops::Error;

/// A provider talking to an HTTP GraphQL endpoint.
#[cfg(feature = "http")]
pub type HttpProvider = GraphqlProvider<super::client::http::Client>;

/// A [`DataProvider`] which compiles every request into a GraphQL document and
/// dispatches it through a transport [`Client`].
#[derive(Clone, Debug, From)]
pub struct GraphqlProvider<C>(C);

impl<C: Client> GraphqlProvider<C> {
    /// Get the underlying client.
    pub fn inner(&self) -> &C {
        &self.0
    }

    /// Convert into the underlying client.
    pub fn into_inner(self) -> C {
        self.0
    }
}

#[async_trait]
impl<C: Client> DataProvider for GraphqlProvider<C> {
    type Error = Error;

    async fn get_list(&self, request: GetListRequest) -> Result<ListEnvelope, Error> {
        ops::list::execute(&self.0, request).await
    }

    async fn get_many(&self, request: GetManyRequest) -> Result<ManyEnvelope, Error> {
        ops::get_many::execute(&self.0, request).await
    }

    async fn get_one(&self, request: GetOneRequest) -> Result<SingleEnvelope, Error> {
        ops::get_one::execute(&self.0, request).await
    }

    async fn create(&self, request: CreateRequest) -> Result<SingleEnvelope, Error> {
        ops::create::execute(&self.0, request).await
    }

    async fn create_many(&self, request: CreateManyRequest) -> Result<ManyEnvelope, Error> {
        ops::create_many::execute(&self.0, request).await
    }

    async fn update(&self, request: UpdateRequest) -> Result<SingleEnvelope, Error> {
        ops::update::execute(&self.0, request).await
    }

    async fn delete_one(&self, request: DeleteOneRequest) -> Result<SingleEnvelope, Error> {
        ops::delete::execute(&self.0, request).await
    }

    async fn custom(&self, request: CustomRequest) -> Result<SingleEnvelope, Error> {
        ops::custom::execute(&self.0, request).await
    }

    /// There is no meaningful base URL at this layer; transports own their endpoints.
    fn api_url(&self) -> Result<Url, Error> {
        Err(Error::Unsupported { what: "api_url" })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphql::client::mock;
    use crate::init_logging;
    use crate::provider::Meta;
    use serde_json::{json, Map};

    // The ops modules cover each operation's compilation; here we check that the
    // trait surface wires through to them.
    #[tokio::test]
    async fn test_requests_flow_through_the_trait() {
        init_logging();

        let client = mock::Client::create();
        client.respond_to("createPost", json!({ "createPost": { "post": { "id": 1 } } }));
        client.respond_to("posts", json!({ "posts": [{ "id": 1 }] }));

        let provider = GraphqlProvider::from(client.clone());
        let created = provider
            .create(CreateRequest {
                resource: "posts".into(),
                variables: Map::from_iter([("title".to_string(), json!("Hello"))]),
                meta: Meta::default(),
            })
            .await
            .unwrap();
        assert_eq!(created.data, Some(json!({ "id": 1 })));

        let fetched = provider
            .get_one(GetOneRequest {
                resource: "posts".into(),
                id: json!(1),
                meta: Meta::default(),
            })
            .await
            .unwrap();
        assert_eq!(fetched.data, Some(json!({ "id": 1 })));
        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_api_url_is_unsupported() {
        init_logging();

        let provider = GraphqlProvider::from(mock::Client::create());
        let err = provider.api_url().unwrap_err();
        assert_eq!(
            err.to_string(),
            "not implemented on the GraphQL data provider: api_url",
        );
    }
}
