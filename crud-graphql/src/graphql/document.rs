//! GraphQL documents assembled from an operation, typed variables, and a field selection.
//!
//! A [`Document`] is the structured form of a single query or mutation. It renders to
//! GraphQL source with [`Document::render`] and carries its variable values separately
//! ([`Document::variable_values`]), matching the usual `{"query", "variables"}` wire
//! shape.

use derive_more::{Display, From};
use itertools::Itertools;
use serde_json::{Map, Value};

/// Whether a document reads or writes.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum OperationKind {
    #[default]
    #[display(fmt = "query")]
    Query,
    #[display(fmt = "mutation")]
    Mutation,
}

/// A document variable: a name, a JSON value, and an optional GraphQL type annotation.
///
/// Variables without an annotation infer one from the value when the document is
/// rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: Value,
    pub ty: Option<String>,
}

impl Variable {
    /// A variable with an explicit GraphQL type annotation.
    pub fn typed(name: impl Into<String>, ty: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ty: Some(ty.into()),
        }
    }

    /// A variable whose GraphQL type is inferred from its value.
    pub fn untyped(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ty: None,
        }
    }

    fn annotation(&self) -> String {
        self.ty.clone().unwrap_or_else(|| infer_type(&self.value))
    }
}

/// The GraphQL type for a JSON value with no explicit annotation.
fn infer_type(value: &Value) -> String {
    match value {
        Value::Bool(_) => "Boolean".into(),
        Value::Number(number) if number.is_f64() => "Float".into(),
        Value::Number(_) => "Int".into(),
        Value::Array(items) => {
            let inner = items
                .first()
                .map(infer_type)
                .unwrap_or_else(|| "String".into());
            format!("[{inner}]")
        }
        _ => "String".into(),
    }
}

/// An ordered set of requested fields.
#[derive(Clone, Debug, Default, From, PartialEq)]
pub struct SelectionSet(Vec<Field>);

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.0
    }

    /// Render this selection as it appears between the braces of a selection set.
    pub fn render(&self) -> String {
        self.0.iter().map(Field::render).join(" ")
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for SelectionSet {
    fn from(names: [S; N]) -> Self {
        Self(names.into_iter().map(Field::leaf).collect())
    }
}

impl FromIterator<Field> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = Field>>(fields: I) -> Self {
        Self(fields.into_iter().collect())
    }
}

/// One requested field: either a scalar leaf or a nested selection.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Leaf(String),
    Node {
        name: String,
        selection: SelectionSet,
    },
}

impl Field {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf(name.into())
    }

    pub fn node(name: impl Into<String>, selection: SelectionSet) -> Self {
        Self::Node {
            name: name.into(),
            selection,
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Leaf(name) => name.clone(),
            // A node with nothing under it renders like a leaf; GraphQL has no empty
            // braces.
            Self::Node { name, selection } if selection.is_empty() => name.clone(),
            Self::Node { name, selection } => format!("{name} {{ {} }}", selection.render()),
        }
    }
}

/// A single GraphQL query or mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub kind: OperationKind,
    pub operation: String,
    pub variables: Vec<Variable>,
    pub selection: SelectionSet,
}

impl Document {
    /// Start a query targeting `operation`.
    pub fn query(operation: impl Into<String>) -> Self {
        Self::new(OperationKind::Query, operation)
    }

    /// Start a mutation targeting `operation`.
    pub fn mutation(operation: impl Into<String>) -> Self {
        Self::new(OperationKind::Mutation, operation)
    }

    fn new(kind: OperationKind, operation: impl Into<String>) -> Self {
        Self {
            kind,
            operation: operation.into(),
            variables: vec![],
            selection: Default::default(),
        }
    }

    /// Add a variable.
    pub fn variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Add a list of variables.
    pub fn variables(mut self, variables: impl IntoIterator<Item = Variable>) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Set the field selection.
    pub fn selection(mut self, selection: SelectionSet) -> Self {
        self.selection = selection;
        self
    }

    /// Render this document as GraphQL source.
    ///
    /// Every variable is declared with its type annotation and passed to the operation
    /// as an argument of the same name. An empty selection renders no braces, which is
    /// how a caller requests an operation's scalar result.
    pub fn render(&self) -> String {
        let mut source = self.kind.to_string();
        if !self.variables.is_empty() {
            let declarations = self
                .variables
                .iter()
                .map(|variable| format!("${}: {}", variable.name, variable.annotation()))
                .join(", ");
            source.push_str(&format!(" ({declarations})"));
        }

        source.push_str(&format!(" {{ {}", self.operation));
        if !self.variables.is_empty() {
            let arguments = self
                .variables
                .iter()
                .map(|variable| format!("{}: ${}", variable.name, variable.name))
                .join(", ");
            source.push_str(&format!("({arguments})"));
        }
        if !self.selection.is_empty() {
            source.push_str(&format!(" {{ {} }}", self.selection.render()));
        }
        source.push_str(" }");
        source
    }

    /// The values to send alongside the rendered source, one entry per variable.
    pub fn variable_values(&self) -> Map<String, Value> {
        self.variables
            .iter()
            .map(|variable| (variable.name.clone(), variable.value.clone()))
            .collect()
    }
}
