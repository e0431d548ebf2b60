//! Resources served under the API prefix.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → model.rs (ModelViewSet: deserialize, validate, assign id)
//!     → store.rs (DashMap-backed records)
//!     → JSON response
//! ```
//!
//! `trips` and `logs` are the two resources; each is a `ModelViewSet`
//! over its own model type.

pub mod logs;
pub mod model;
pub mod store;
pub mod trips;

use std::sync::Arc;

use crate::config::RoutingConfig;
use crate::routing::{RouteTableBuilder, RoutingError};

pub use logs::{log_sheets_for, LogSheet, LogSheetViewSet};
pub use model::{Model, ModelViewSet};
pub use store::Store;
pub use trips::{Trip, TripViewSet};

/// Builder with both resources registered: `trips` and `logs`.
///
/// Log sheets are checked against the trip store.
pub fn register_all(config: RoutingConfig) -> Result<RouteTableBuilder, RoutingError> {
    let trips = TripViewSet::new();
    let logs = log_sheets_for(trips.store().clone());

    let mut builder = RouteTableBuilder::new(config);
    builder
        .register("trips", Arc::new(trips))?
        .register("logs", Arc::new(logs))?;
    Ok(builder)
}
