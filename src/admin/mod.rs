//! Administrative sub-application.
//!
//! Built as a standalone route group and handed to
//! `RouteTableBuilder::into_router`, which nests it at the admin mount.
//! Paths here are relative to that mount.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Instant;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::config::AdminConfig;
use crate::routing::RouteTable;

/// State shared by the admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub table: Arc<RouteTable>,
    pub config: AdminConfig,
    pub started: Instant,
}

impl AdminState {
    pub fn new(table: RouteTable, config: AdminConfig) -> Self {
        Self {
            table: Arc::new(table),
            config,
            started: Instant::now(),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(get_index))
        .route("/status", get(get_status))
        .route("/routes", get(get_routes))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .with_state(state)
}
