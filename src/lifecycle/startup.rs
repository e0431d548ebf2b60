//! Startup orchestration.
//!
//! # Responsibilities
//! - Register resources and build the route table
//! - Build the admin group against that table
//! - Materialise the routed application
//!
//! # Design Decisions
//! - Fail fast: any routing error is fatal
//! - Listeners start last (traffic only when ready), see `main`

use axum::Router;

use crate::admin::{setup_admin_router, AdminState};
use crate::config::AppConfig;
use crate::resources;
use crate::routing::{RouteTable, RoutingError};

/// Everything the server needs before it binds.
pub struct Application {
    pub table: RouteTable,
    pub router: Router,
}

pub fn build_application(config: &AppConfig) -> Result<Application, RoutingError> {
    let builder = resources::register_all(config.routing.clone())?;
    let table = builder.build();

    let admin = setup_admin_router(AdminState::new(table.clone(), config.admin.clone()));
    let router = builder.into_router(admin)?;

    Ok(Application { table, router })
}
