//! Walk a blog-shaped GraphQL backend through the basic CRUD cycle.
//!
//! Point it at any backend exposing the conventional per-resource schema
//! (`postsConnection`, `createPost`, `PostWhereInput`, ...) and it will create a
//! post, rename it, list what is there, and clean up after itself.

use clap::Parser;
use crud_graphql::{graphql::client::http, init_logging, prelude::*};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use url::Url;

#[derive(Clone, Debug, Parser)]
pub struct Options {
    #[clap(
        long,
        env = "BLOG_GRAPHQL_URL",
        default_value = "http://localhost:4000/graphql"
    )]
    url: Url,
    /// Bearer token to send with every request, if the backend wants one.
    #[clap(long, env = "BLOG_GRAPHQL_TOKEN")]
    token: Option<String>,
}

fn provider(opt: &Options) -> HttpProvider {
    let mut headers = BTreeMap::new();
    if let Some(token) = &opt.token {
        headers.insert("authorization".to_string(), format!("Bearer {token}"));
    }
    HttpProvider::from(http::Client::with_headers(opt.url.clone(), &headers).unwrap())
}

#[tokio::main]
async fn main() {
    init_logging();
    let opt = Options::parse();
    let provider = provider(&opt);

    // Create a post. The default selection returns just the new id.
    let created = provider
        .create(CreateRequest {
            resource: "posts".into(),
            variables: Map::from_iter([
                ("title".to_string(), json!("Hello from the data provider")),
                ("content".to_string(), json!("A post created over the wire.")),
            ]),
            meta: Meta::default(),
        })
        .await
        .unwrap();
    let id = created
        .data
        .as_ref()
        .and_then(|post| post.get("id"))
        .cloned()
        .unwrap();
    println!("created post {id}");

    // Rename it, asking for the new title back.
    let updated = provider
        .update(UpdateRequest {
            resource: "posts".into(),
            id: id.clone(),
            variables: Map::from_iter([("title".to_string(), json!("Hello, renamed"))]),
            meta: Meta {
                fields: Some(fields!["id", "title"]),
                ..Default::default()
            },
        })
        .await
        .unwrap();
    println!("updated: {}", updated.data.unwrap_or(Value::Null));

    // List the newest posts whose title mentions "Hello".
    let listed = provider
        .get_list(GetListRequest {
            resource: "posts".into(),
            pagination: Pagination {
                current: 1,
                page_size: 10,
                ..Default::default()
            },
            sorters: vec![Sorter::new("createdAt", SortOrder::Desc)],
            filters: vec![Condition::new("title", FilterOperator::Contains, "Hello").into()],
            meta: Meta {
                fields: Some(fields!["id", "title", "createdAt"]),
                ..Default::default()
            },
        })
        .await
        .unwrap();
    println!("{} matching posts:", listed.total);
    for post in &listed.data {
        println!("  {post}");
    }

    // Clean up.
    provider
        .delete_one(DeleteOneRequest {
            resource: "posts".into(),
            id,
            meta: Meta::default(),
        })
        .await
        .unwrap();
    println!("deleted");
}
