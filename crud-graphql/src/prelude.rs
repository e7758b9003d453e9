//! Common items that you will always want in scope when talking to a GraphQL backend.

pub use crate::fields;
pub use crate::graphql::{
    client::{Client, Endpoint},
    document::{Document, Field, OperationKind, SelectionSet, Variable},
    GraphqlProvider,
};
pub use crate::provider::{
    Condition, CreateManyRequest, CreateRequest, CustomRequest, DataProvider, DeleteOneRequest,
    Filter, FilterOperator, GetListRequest, GetManyRequest, GetOneRequest, Group, GroupOperator,
    ListEnvelope, ManyEnvelope, Meta, Method, Pagination, PaginationMode, SingleEnvelope,
    SortOrder, Sorter, UpdateRequest,
};

#[cfg(feature = "http")]
pub use crate::graphql::HttpProvider;
