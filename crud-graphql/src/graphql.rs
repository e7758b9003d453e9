//! Compilation of the generic data contract into GraphQL queries and mutations.
//!
//! This module targets backends which expose a conventionally named schema per
//! resource (`postsConnection`, `createPost`, `PostWhereInput`, ...). The pieces:
//!
//! * [`document`] models and renders the GraphQL documents themselves;
//! * `ops` compiles each generic request into a document and reshapes the
//!   response into the caller's envelope;
//! * [`client`] is the transport seam, with an HTTP implementation and a scripted
//!   mock;
//! * [`provider`] ties the above together into a
//!   [`DataProvider`](crate::provider::DataProvider).

pub mod client;
pub mod document;
mod ops;
pub mod provider;

pub use provider::*;
