//! The handler capability every registered resource exposes.

use async_trait::async_trait;
use axum::http::Method;
use axum::response::Response;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::http::ApiError;

/// Conventional operations a view set answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    List,
    Create,
    Retrieve,
    Update,
    Destroy,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::List,
        Operation::Create,
        Operation::Retrieve,
        Operation::Update,
        Operation::Destroy,
    ];

    /// True for operations addressed at a single record.
    pub fn is_detail(self) -> bool {
        !matches!(self, Operation::List | Operation::Create)
    }

    /// HTTP methods bound to this operation, in table order.
    pub fn methods(self) -> Vec<Method> {
        match self {
            Operation::List | Operation::Retrieve => vec![Method::GET],
            Operation::Create => vec![Method::POST],
            Operation::Update => vec![Method::PUT, Method::PATCH],
            Operation::Destroy => vec![Method::DELETE],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Retrieve => "retrieve",
            Operation::Update => "update",
            Operation::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource handler resolved at startup.
///
/// The router expands every registered view set into the same set of
/// list and detail routes, so implementations never declare paths.
/// Bodies arrive as raw JSON; typed resources deserialize them.
#[async_trait]
pub trait ViewSet: Send + Sync + 'static {
    /// Stem for route names (`<basename>-list`, `<basename>-detail`).
    fn basename(&self) -> &str;

    /// Name of the path parameter on detail routes.
    fn lookup_field(&self) -> &str {
        "id"
    }

    async fn list(&self) -> Result<Response, ApiError>;

    async fn create(&self, body: Value) -> Result<Response, ApiError>;

    async fn retrieve(&self, id: String) -> Result<Response, ApiError>;

    /// Replaces the record, or merges into it when `partial` is set.
    async fn update(&self, id: String, body: Value, partial: bool) -> Result<Response, ApiError>;

    async fn destroy(&self, id: String) -> Result<Response, ApiError>;
}
