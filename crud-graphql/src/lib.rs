//! Generic CRUD data access over conventionally shaped GraphQL backends. It consists of
//! two sections:
//!
//! * A [provider] contract, which most users will interact with, describing data access
//!   in backend-neutral terms: list a page of a resource, fetch records by id, create,
//!   update, and delete them. Records are dynamic JSON, so the contract is agnostic to
//!   any particular application's data model.
//! * A [graphql] implementation of that contract, which compiles each request into a
//!   GraphQL document for backends exposing a schema per resource (`postsConnection`,
//!   `createPost`, `PostWhereInput`, and so on), dispatches it over a pluggable
//!   transport, and reshapes the response into the contract's envelopes.
//!
//! The transport is modular: an HTTP client (behind the `http` feature) talks to real
//! servers, and a scripted mock (behind `mocks`) is useful for lightweight testing. It
//! is possible to target your own transport by implementing the
//! [client](graphql::client) trait.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub mod graphql;
pub mod prelude;
pub mod provider;

pub use graphql::document::{Field, SelectionSet};

/// Initialize tracing.
pub fn init_logging() {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        color_eyre::install().unwrap();
        tracing_subscriber::fmt()
            .with_ansi(true)
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    });
}

/// Create a [`SelectionSet`] from a list of fields.
///
/// Leaves are plain expressions; nested selections are written `name => [ ... ]`.
///
/// # Examples
///
/// ```
/// # use crud_graphql::fields;
/// let selection = fields!["id", "author" => ["name"]];
/// assert_eq!(selection.render(), "id author { name }");
/// ```
#[macro_export]
macro_rules! fields {
    (@field $name:expr => $sub:tt) => {
        $crate::Field::node($name, $crate::fields! $sub)
    };
    (@field $name:expr) => {
        $crate::Field::leaf($name)
    };
    [$($name:expr $(=> $sub:tt)?),* $(,)?] => {
        $crate::SelectionSet::from(vec![$($crate::fields!(@field $name $(=> $sub)?)),*])
    };
}
