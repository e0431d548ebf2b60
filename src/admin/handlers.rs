use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::AdminState;
use crate::routing::RouteTable;

#[derive(Serialize)]
pub struct SiteIndex {
    pub site_header: String,
    pub resources: Vec<ResourceLink>,
}

#[derive(Serialize)]
pub struct ResourceLink {
    pub prefix: String,
    pub basename: String,
    pub url: String,
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub resources: usize,
}

pub async fn get_index(State(state): State<AdminState>) -> Json<SiteIndex> {
    let resources = state
        .table
        .groups()
        .iter()
        .map(|g| ResourceLink {
            prefix: g.prefix.clone(),
            basename: g.basename.clone(),
            url: g.list_pattern.clone(),
        })
        .collect();

    Json(SiteIndex {
        site_header: state.config.site_header.clone(),
        resources,
    })
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started.elapsed().as_secs(),
        resources: state.table.groups().len(),
    })
}

pub async fn get_routes(State(state): State<AdminState>) -> Json<RouteTable> {
    Json(state.table.as_ref().clone())
}
