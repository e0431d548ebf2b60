//! The built route table.
//!
//! Pure data: patterns, methods and operations, with no handler
//! references, so two builds from the same registrations compare equal.

use axum::http::Method;
use serde::Serialize;
use std::fmt;

use crate::routing::viewset::Operation;

/// One (pattern, method, operation) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub pattern: String,
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub operation: Operation,
    /// Route name, e.g. `trips-detail`.
    pub name: String,
}

/// All routes generated for one registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathGroup {
    pub prefix: String,
    pub basename: String,
    pub list_pattern: String,
    pub detail_pattern: String,
    pub routes: Vec<Route>,
}

impl PathGroup {
    /// Operations reachable through this group, without repeats.
    pub fn operations(&self) -> Vec<Operation> {
        let mut ops: Vec<Operation> = Vec::new();
        for route in &self.routes {
            if !ops.contains(&route.operation) {
                ops.push(route.operation);
            }
        }
        ops
    }
}

/// A prefix where an externally built route group is nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mount {
    pub name: String,
    pub prefix: String,
}

/// Ordered dispatch table handed to the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    groups: Vec<PathGroup>,
    api_root: Option<String>,
    admin: Mount,
}

impl RouteTable {
    pub(crate) fn new(groups: Vec<PathGroup>, api_root: Option<String>, admin: Mount) -> Self {
        Self {
            groups,
            api_root,
            admin,
        }
    }

    /// Path groups in registration order.
    pub fn groups(&self) -> &[PathGroup] {
        &self.groups
    }

    pub fn group(&self, prefix: &str) -> Option<&PathGroup> {
        self.groups.iter().find(|g| g.prefix == prefix)
    }

    /// Pattern of the API root listing, when enabled.
    pub fn api_root(&self) -> Option<&str> {
        self.api_root.as_deref()
    }

    pub fn admin(&self) -> &Mount {
        &self.admin
    }

    /// Mounted sub-applications. The admin group is always the only one.
    pub fn mounts(&self) -> impl Iterator<Item = &Mount> {
        std::iter::once(&self.admin)
    }

    /// Every resource route, flattened in table order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.groups.iter().flat_map(|g| g.routes.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(root) = &self.api_root {
            writeln!(f, "{:<7} {:<32} api-root", "GET", root)?;
        }
        for route in self.routes() {
            writeln!(
                f,
                "{:<7} {:<32} {} ({})",
                route.method.as_str(),
                route.pattern,
                route.name,
                route.operation
            )?;
        }
        write!(f, "{:<7} {:<32} {}", "*", format!("{}/*", self.admin.prefix), self.admin.name)
    }
}

fn serialize_method<S: serde::Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}
