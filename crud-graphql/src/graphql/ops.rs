//! Compilation of generic data requests into GraphQL operations.
//!
//! One module per operation. Each has an `execute` function which derives the
//! operation name, argument types, and selection from the request, dispatches the
//! resulting [`Document`] via a [`Client`](super::client::Client), and reshapes the
//! response into the operation's envelope.
//!
//! The naming scheme matches backends which expose a schema per resource: list
//! queries target `<resource>Connection`, mutations target
//! `<verb><SingularResource>`, and argument types are named
//! `<SingularResource><Suffix>`.

use super::document::{Field, SelectionSet, Variable};
use crate::provider::{Filter, FilterOperator, GroupOperator, SortOrder, Sorter};
use convert_case::{Boundary, Case, Casing};
use inflector::Inflector;
use serde_json::{Map, Value};
use snafu::Snafu;
use std::fmt::Display;

pub mod create;
pub mod create_many;
pub mod custom;
pub mod delete;
pub mod get_many;
pub mod get_one;
pub mod list;
pub mod update;

/// Errors returned when compiling or executing an operation.
#[derive(Debug, Snafu)]
pub enum Error {
    /// An error from the underlying transport.
    #[snafu(display("{error}"))]
    Request { error: String },

    /// The request named no operation where one is required.
    #[snafu(display("GraphQL operation name required"))]
    MissingOperation,

    /// The operation exists in the contract but has no GraphQL equivalent.
    #[snafu(display("not implemented on the GraphQL data provider: {what}"))]
    Unsupported { what: &'static str },

    /// A filter list contained more than one group with the same connective.
    #[snafu(display("multiple {operator} filter groups in one filter list"))]
    ConflictingGroups { operator: GroupOperator },

    /// The backend's response did not have the shape the operation implies.
    #[snafu(display("unexpected response shape at {path}"))]
    UnexpectedResponse { path: String },
}

impl Error {
    pub(crate) fn request(error: impl Display) -> Self {
        Self::Request {
            error: error.to_string(),
        }
    }

    pub(crate) fn unexpected(path: impl Into<String>) -> Self {
        Self::UnexpectedResponse { path: path.into() }
    }
}

/// Convert a resource name to camelCase, regardless of its original case convention.
pub(crate) fn camel_case(name: &str) -> String {
    name.with_boundaries(&[
        Boundary::Hyphen,
        Boundary::Underscore,
        Boundary::Space,
        Boundary::LowerUpper,
    ])
    .to_case(Case::Camel)
}

/// Convert a name to PascalCase, regardless of its original case convention.
pub(crate) fn pascal_case(name: &str) -> String {
    name.with_boundaries(&[
        Boundary::Hyphen,
        Boundary::Underscore,
        Boundary::Space,
        Boundary::LowerUpper,
    ])
    .to_case(Case::Pascal)
}

/// The singular form of a (conventionally plural) resource name.
pub(crate) fn singular(resource: &str) -> String {
    resource.to_singular()
}

/// The list query for `resource`, e.g. `postsConnection`.
pub(crate) fn connection_operation(resource: &str) -> String {
    format!("{}Connection", camel_case(resource))
}

/// The plain query for `resource`, e.g. `posts`.
pub(crate) fn resource_operation(resource: &str) -> String {
    camel_case(resource)
}

/// The create mutation for `resource`, e.g. `createPost`.
pub(crate) fn create_operation(resource: &str) -> String {
    camel_case(&format!("create-{}", singular(resource)))
}

/// The update mutation for `resource`, e.g. `updatePost`.
pub(crate) fn update_operation(resource: &str) -> String {
    camel_case(&format!("update-{}", singular(resource)))
}

/// The delete mutation for `resource`, e.g. `deletePost`.
pub(crate) fn delete_operation(resource: &str) -> String {
    camel_case(&format!("delete-{}", singular(resource)))
}

/// The argument type `<SingularResource><suffix>`, e.g. `PostWhereInput`.
pub(crate) fn input_type(resource: &str, suffix: &str) -> String {
    format!("{}{}", pascal_case(&singular(resource)), suffix)
}

/// The ordering token for the first sorter, e.g. `CreatedAt_Desc`.
///
/// Backends of this shape order by a single enum value, so only the first sorter
/// counts. Returns [`None`] when there are no sorters, leaving the backend's default
/// order in effect.
pub(crate) fn sort_token(sorters: &[Sorter]) -> Option<String> {
    sorters.first().map(|sorter| {
        let direction = match sorter.order {
            SortOrder::Asc => "Asc",
            SortOrder::Desc => "Desc",
        };
        format!("{}_{}", pascal_case(&sorter.field), direction)
    })
}

/// Compile a filter list into the fields of a `WhereInput` argument.
///
/// An `Eq` condition becomes the bare field name; any other condition becomes
/// `<field>_<operator>`. A group becomes `_or` or `_and` holding one single-field
/// map per condition, each suffixed with its operator even for `Eq`. Later clauses
/// overwrite earlier ones with the same key, except that a second group with the
/// same connective is rejected rather than silently dropped.
pub(crate) fn compile_filters(filters: &[Filter]) -> Result<Map<String, Value>, Error> {
    let mut arguments = Map::new();
    for filter in filters {
        match filter {
            Filter::Condition(condition) => {
                let key = match condition.operator {
                    FilterOperator::Eq => condition.field.clone(),
                    operator => format!("{}_{}", condition.field, operator),
                };
                arguments.insert(key, condition.value.clone());
            }
            Filter::Group(group) => {
                let clauses = group
                    .conditions
                    .iter()
                    .map(|condition| {
                        let mut clause = Map::new();
                        clause.insert(
                            format!("{}_{}", condition.field, condition.operator),
                            condition.value.clone(),
                        );
                        Value::from(clause)
                    })
                    .collect::<Vec<_>>();
                let key = format!("_{}", group.operator);
                if arguments.insert(key, clauses.into()).is_some() {
                    return Err(Error::ConflictingGroups {
                        operator: group.operator,
                    });
                }
            }
        }
    }
    Ok(arguments)
}

/// Replace any variable named like `variable`, then append it.
///
/// Used to merge caller-supplied variables with derived ones; the derived variable
/// wins on a name collision.
pub(crate) fn override_variable(variables: &mut Vec<Variable>, variable: Variable) {
    variables.retain(|existing| existing.name != variable.name);
    variables.push(variable);
}

/// The selection mutations fall back to when the caller requests nothing specific:
/// the mutated record nested under its singular name, with just its `id`.
pub(crate) fn default_mutation_selection(resource: &str) -> SelectionSet {
    SelectionSet::from(vec![Field::node(
        singular(resource),
        SelectionSet::from(["id"]),
    )])
}

/// Pull the payload keyed by `operation` out of a response.
pub(crate) fn operation_payload(mut response: Value, operation: &str) -> Result<Value, Error> {
    response
        .get_mut(operation)
        .map(Value::take)
        .ok_or_else(|| Error::unexpected(operation))
}

/// Pull the record nested under its singular resource name out of a mutation
/// response, `response.<operation>.<singular>`.
pub(crate) fn singular_payload(
    response: Value,
    operation: &str,
    resource: &str,
) -> Result<Option<Value>, Error> {
    let mut payload = operation_payload(response, operation)?;
    Ok(payload.get_mut(singular(resource).as_str()).map(Value::take))
}
