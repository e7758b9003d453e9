//! The generic data-access contract served by this crate.
//!
//! The entrypoint to this module is [`DataProvider`], which describes the interface an
//! application uses to read and write resources without knowing how requests reach a
//! backend. Each method takes a request struct built from plain data (resource names,
//! filters, sorters, pagination, dynamic JSON records) and returns a response envelope.
//! The GraphQL instantiation of this contract lives in
//! [`GraphqlProvider`](crate::graphql::GraphqlProvider).

use crate::graphql::document::{SelectionSet, Variable};
use async_trait::async_trait;
use derive_more::{Display, From};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use url::Url;

/// A source of resources which can be listed, fetched, and mutated.
#[async_trait]
pub trait DataProvider {
    /// Errors reported while serving requests.
    type Error: Error + Send + Sync + 'static;

    /// List a page of records matching the request.
    async fn get_list(&self, request: GetListRequest) -> Result<ListEnvelope, Self::Error>;

    /// Fetch the records with the given ids.
    ///
    /// The order of the returned records is backend-dependent and need not match the
    /// order of the ids.
    async fn get_many(&self, request: GetManyRequest) -> Result<ManyEnvelope, Self::Error>;

    /// Fetch a single record by id.
    ///
    /// Yields an empty envelope, not an error, when the backend returns nothing.
    async fn get_one(&self, request: GetOneRequest) -> Result<SingleEnvelope, Self::Error>;

    /// Create a record.
    async fn create(&self, request: CreateRequest) -> Result<SingleEnvelope, Self::Error>;

    /// Create a batch of records, one request per record, dispatched concurrently.
    ///
    /// Results are returned in input order. If any single request fails the whole batch
    /// fails; records created before the failure are not rolled back.
    async fn create_many(&self, request: CreateManyRequest) -> Result<ManyEnvelope, Self::Error>;

    /// Update the record with the given id.
    async fn update(&self, request: UpdateRequest) -> Result<SingleEnvelope, Self::Error>;

    /// Delete the record with the given id.
    async fn delete_one(&self, request: DeleteOneRequest) -> Result<SingleEnvelope, Self::Error>;

    /// Dispatch a caller-specified operation, bypassing name derivation.
    async fn custom(&self, request: CustomRequest) -> Result<SingleEnvelope, Self::Error>;

    /// The base URL of the backend, for providers that have one.
    fn api_url(&self) -> Result<Url, Self::Error>;
}

/// A request for a page of records.
#[derive(Clone, Debug, Default)]
pub struct GetListRequest {
    /// The resource to list, by its plural name.
    pub resource: String,
    pub pagination: Pagination,
    /// Requested ordering. Only the first sorter is honored.
    pub sorters: Vec<Sorter>,
    pub filters: Vec<Filter>,
    pub meta: Meta,
}

/// A request for a specific set of records.
#[derive(Clone, Debug, Default)]
pub struct GetManyRequest {
    pub resource: String,
    pub ids: Vec<Value>,
    pub meta: Meta,
}

/// A request for a single record.
#[derive(Clone, Debug, Default)]
pub struct GetOneRequest {
    pub resource: String,
    pub id: Value,
    pub meta: Meta,
}

/// A request to create a record from a dynamic JSON object.
#[derive(Clone, Debug, Default)]
pub struct CreateRequest {
    pub resource: String,
    pub variables: Map<String, Value>,
    pub meta: Meta,
}

/// A request to create a batch of records.
#[derive(Clone, Debug, Default)]
pub struct CreateManyRequest {
    pub resource: String,
    pub variables: Vec<Map<String, Value>>,
    pub meta: Meta,
}

/// A request to update a record.
///
/// The identifier is carried separately from the new field values; any `id` key inside
/// `variables` is ignored.
#[derive(Clone, Debug, Default)]
pub struct UpdateRequest {
    pub resource: String,
    pub id: Value,
    pub variables: Map<String, Value>,
    pub meta: Meta,
}

/// A request to delete a record.
#[derive(Clone, Debug, Default)]
pub struct DeleteOneRequest {
    pub resource: String,
    pub id: Value,
    pub meta: Meta,
}

/// A passthrough request naming its operation explicitly via [`Meta::operation`].
#[derive(Clone, Debug, Default)]
pub struct CustomRequest {
    /// An endpoint to use in place of the provider's own, for this call only.
    pub url: Option<Url>,
    /// [`Method::Get`] dispatches a query; anything else dispatches a mutation.
    pub method: Method,
    /// Headers for the replacement endpoint. Ignored unless `url` is given.
    pub headers: BTreeMap<String, String>,
    pub meta: Meta,
}

/// Request metadata that adjusts how an operation is compiled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Meta {
    /// An operation name overriding the derived one.
    ///
    /// Honored by `create_many` and `delete_one`, required by `custom`, and ignored
    /// everywhere else.
    pub operation: Option<String>,
    /// The fields to request in place of each operation's default selection.
    pub fields: Option<SelectionSet>,
    /// Extra variables merged into the compiled document. A derived variable wins over
    /// an extra with the same name.
    pub variables: Vec<Variable>,
}

/// A page of records along with the size of the full matching set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ListEnvelope {
    pub data: Vec<Value>,
    /// The number of records matching the request, regardless of the pagination window.
    pub total: u64,
}

/// An unpaginated set of records.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ManyEnvelope {
    pub data: Vec<Value>,
}

/// At most one record.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SingleEnvelope {
    pub data: Option<Value>,
}

/// A pagination window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// The 1-based page number.
    pub current: u32,
    pub page_size: u32,
    pub mode: PaginationMode,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: 10,
            mode: PaginationMode::Server,
        }
    }
}

/// Who slices the result set into pages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaginationMode {
    /// The backend returns one page at a time.
    #[default]
    Server,
    /// The backend returns everything; the caller paginates.
    Client,
}

/// A requested ordering on a single field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sorter {
    pub field: String,
    pub order: SortOrder,
}

impl Sorter {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// The direction of a [`Sorter`].
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    #[display(fmt = "asc")]
    Asc,
    #[display(fmt = "desc")]
    Desc,
}

/// A single clause in a filter list.
#[derive(Clone, Debug, From, PartialEq)]
pub enum Filter {
    /// A comparison on one field.
    Condition(Condition),
    /// A disjunction or conjunction of comparisons.
    Group(Group),
}

/// A comparison of a field against a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// A logical grouping of conditions.
///
/// Groups hold plain conditions only; grouping clauses do not nest.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub operator: GroupOperator,
    pub conditions: Vec<Condition>,
}

impl Group {
    pub fn new(operator: GroupOperator, conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            operator,
            conditions: conditions.into_iter().collect(),
        }
    }
}

/// The connective of a [`Group`].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum GroupOperator {
    #[display(fmt = "or")]
    Or,
    #[display(fmt = "and")]
    And,
}

/// How a [`Condition`] compares its field against its value.
///
/// `Eq` compiles to the bare field name; every other operator is suffixed onto the
/// field, so the display form of each operator is part of the wire contract.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum FilterOperator {
    #[display(fmt = "eq")]
    Eq,
    #[display(fmt = "ne")]
    Ne,
    #[display(fmt = "lt")]
    Lt,
    #[display(fmt = "gt")]
    Gt,
    #[display(fmt = "lte")]
    Lte,
    #[display(fmt = "gte")]
    Gte,
    #[display(fmt = "in")]
    In,
    #[display(fmt = "nin")]
    Nin,
    #[display(fmt = "contains")]
    Contains,
    #[display(fmt = "ncontains")]
    Ncontains,
    #[display(fmt = "between")]
    Between,
    #[display(fmt = "null")]
    Null,
    #[display(fmt = "nnull")]
    Nnull,
    #[display(fmt = "startswith")]
    StartsWith,
    #[display(fmt = "endswith")]
    EndsWith,
}

/// The HTTP-flavored verb of a [`CustomRequest`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}
