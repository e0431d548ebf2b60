//! Resource routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     (prefix, Arc<dyn ViewSet>) registrations
//!     → builder.rs (validate prefix, reject duplicates)
//!     → build() → table.rs (RouteTable: path groups + api root + admin mount)
//!     → into_router(admin) → axum::Router handed to the HTTP server
//!
//! Per request:
//!     axum matches pattern + method
//!     → dispatch closure (records metrics)
//!     → ViewSet operation (list/create/retrieve/update/destroy)
//! ```
//!
//! # Design Decisions
//! - Registrations are explicit; no name-based reflection
//! - Table derivation is pure: same registrations → equal tables
//! - Table is immutable once built and shared via Arc
//! - Admin group is opaque: nested at its mount, never inspected

pub mod builder;
pub mod error;
pub mod table;
pub mod viewset;

pub use builder::RouteTableBuilder;
pub use error::RoutingError;
pub use table::{Mount, PathGroup, Route, RouteTable};
pub use viewset::{Operation, ViewSet};
