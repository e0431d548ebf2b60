//! Route table construction and materialisation.
//!
//! # Responsibilities
//! - Collect `(prefix, view set)` registrations at startup
//! - Expand each registration into list and detail routes
//! - Turn the table into an axum `Router` with the admin group nested
//!
//! # Design Decisions
//! - Duplicate prefixes and basenames are fatal startup errors
//! - Registration order is table order
//! - Zero registrations build an admin-only table rather than failing

use axum::{
    extract::{rejection::JsonRejection, Path, Request},
    http::{Method, Uri},
    response::{IntoResponse, Response},
    routing::{get, on, MethodFilter, MethodRouter},
    Json, Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::RoutingConfig;
use crate::http::ApiError;
use crate::observability::metrics;
use crate::routing::error::RoutingError;
use crate::routing::table::{Mount, PathGroup, Route, RouteTable};
use crate::routing::viewset::{Operation, ViewSet};

struct Registration {
    prefix: String,
    view_set: Arc<dyn ViewSet>,
}

/// Collects resource registrations and expands them into a [`RouteTable`].
///
/// ```ignore
/// let mut builder = RouteTableBuilder::new(config.routing.clone());
/// builder
///     .register("trips", Arc::new(ModelViewSet::<Trip>::new()))?
///     .register("logs", Arc::new(ModelViewSet::<LogSheet>::new()))?;
/// let app = builder.into_router(admin)?;
/// ```
pub struct RouteTableBuilder {
    config: RoutingConfig,
    registrations: Vec<Registration>,
}

impl RouteTableBuilder {
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            config,
            registrations: Vec::new(),
        }
    }

    /// Bind `prefix` to a view set.
    ///
    /// Leading and trailing slashes are ignored, so `"trips"` and
    /// `"/trips/"` name the same resource.
    pub fn register<V: ViewSet>(
        &mut self,
        prefix: &str,
        view_set: Arc<V>,
    ) -> Result<&mut Self, RoutingError> {
        self.register_dyn(prefix, view_set)
    }

    /// [`register`](Self::register) for view sets that are already type-erased.
    pub fn register_dyn(
        &mut self,
        prefix: &str,
        view_set: Arc<dyn ViewSet>,
    ) -> Result<&mut Self, RoutingError> {
        let prefix = normalize_prefix(prefix)?;

        if self.registrations.iter().any(|r| r.prefix == prefix) {
            return Err(RoutingError::DuplicatePrefix(prefix));
        }

        let basename = view_set.basename();
        if self
            .registrations
            .iter()
            .any(|r| r.view_set.basename() == basename)
        {
            return Err(RoutingError::DuplicateBasename(basename.to_string()));
        }

        tracing::debug!(prefix = %prefix, basename = %basename, "Registered resource");

        self.registrations.push(Registration {
            prefix,
            view_set,
        });
        Ok(self)
    }

    /// Registered prefixes in registration order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(|r| r.prefix.as_str())
    }

    /// Expand registrations into the dispatch table.
    pub fn build(&self) -> RouteTable {
        if self.registrations.is_empty() {
            tracing::warn!("No resources registered; route table holds the admin mount only");
        }

        let api = self.config.api_prefix.trim_end_matches('/');
        let slash = if self.config.trailing_slash { "/" } else { "" };

        let groups = self
            .registrations
            .iter()
            .map(|r| expand(api, slash, r))
            .collect();

        let api_root = self.config.root_view.then(|| {
            if api.is_empty() {
                "/".to_string()
            } else {
                format!("{api}{slash}")
            }
        });

        let admin = Mount {
            name: "admin".to_string(),
            prefix: self.config.admin_prefix.trim_end_matches('/').to_string(),
        };

        RouteTable::new(groups, api_root, admin)
    }

    /// Build the table and materialise it, nesting `admin` at the admin mount.
    pub fn into_router(self, admin: Router) -> Result<Router, RoutingError> {
        let table = self.build();
        let mut router = Router::new();

        for (group, registration) in table.groups().iter().zip(&self.registrations) {
            let resource: Arc<str> = Arc::from(group.prefix.as_str());
            let mut list = MethodRouter::new();
            let mut detail = MethodRouter::new();

            for route in &group.routes {
                let endpoint = endpoint(registration.view_set.clone(), resource.clone(), route)?;
                if route.operation.is_detail() {
                    detail = detail.merge(endpoint);
                } else {
                    list = list.merge(endpoint);
                }
            }

            router = router
                .route(&group.list_pattern, list)
                .route(&group.detail_pattern, detail);
        }

        if let Some(root) = table.api_root() {
            let body = Value::Object(api_root_body(&table));
            router = router.route(
                root,
                get(move || {
                    let body = body.clone();
                    async move { Json(body) }
                }),
            );
        }

        tracing::info!(
            resources = table.groups().len(),
            routes = table.routes().count(),
            admin = %table.admin().prefix,
            "Route table built"
        );

        let admin_prefix = &table.admin().prefix;
        if self.config.trailing_slash {
            // A nested group never sees `{mount}/`, so serve its index there too.
            router = router.route_service(
                &format!("{admin_prefix}/"),
                admin.clone().map_request(mount_index),
            );
        }

        Ok(router.nest(admin_prefix, admin).fallback(not_found))
    }
}

fn normalize_prefix(prefix: &str) -> Result<String, RoutingError> {
    let trimmed = prefix.trim_matches('/');
    let malformed = trimmed
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '*' | '?' | '#'))
        || trimmed.split('/').any(str::is_empty);

    if trimmed.is_empty() || malformed {
        return Err(RoutingError::InvalidPrefix(prefix.to_string()));
    }
    Ok(trimmed.to_string())
}

fn expand(api: &str, slash: &str, registration: &Registration) -> PathGroup {
    let prefix = &registration.prefix;
    let basename = registration.view_set.basename();
    let lookup = registration.view_set.lookup_field();

    let list_pattern = format!("{api}/{prefix}{slash}");
    let detail_pattern = format!("{api}/{prefix}/{{{lookup}}}{slash}");

    let mut routes = Vec::new();
    for op in Operation::ALL {
        let (pattern, name) = if op.is_detail() {
            (&detail_pattern, format!("{basename}-detail"))
        } else {
            (&list_pattern, format!("{basename}-list"))
        };
        for method in op.methods() {
            routes.push(Route {
                pattern: pattern.clone(),
                method,
                operation: op,
                name: name.clone(),
            });
        }
    }

    PathGroup {
        prefix: prefix.clone(),
        basename: basename.to_string(),
        list_pattern,
        detail_pattern,
        routes,
    }
}

fn api_root_body(table: &RouteTable) -> Map<String, Value> {
    table
        .groups()
        .iter()
        .map(|g| (g.prefix.clone(), Value::String(g.list_pattern.clone())))
        .collect()
}

/// Method handler that forwards one route to its view set.
fn endpoint(
    view: Arc<dyn ViewSet>,
    resource: Arc<str>,
    route: &Route,
) -> Result<MethodRouter, RoutingError> {
    let filter = MethodFilter::try_from(route.method.clone())
        .map_err(|_| RoutingError::UnsupportedMethod(route.method.to_string()))?;
    let op = route.operation;

    let method_router = match op {
        Operation::List => on(filter, move || {
            let view = view.clone();
            let resource = resource.clone();
            async move {
                metrics::record_dispatch(&resource, op);
                view.list().await
            }
        }),
        Operation::Create => on(filter, move |body: Result<Json<Value>, JsonRejection>| {
            let view = view.clone();
            let resource = resource.clone();
            async move {
                metrics::record_dispatch(&resource, op);
                view.create(json_body(body)?).await
            }
        }),
        Operation::Retrieve => on(filter, move |Path(id): Path<String>| {
            let view = view.clone();
            let resource = resource.clone();
            async move {
                metrics::record_dispatch(&resource, op);
                view.retrieve(id).await
            }
        }),
        Operation::Update => {
            let partial = route.method == Method::PATCH;
            on(
                filter,
                move |Path(id): Path<String>, body: Result<Json<Value>, JsonRejection>| {
                    let view = view.clone();
                    let resource = resource.clone();
                    async move {
                        metrics::record_dispatch(&resource, op);
                        view.update(id, json_body(body)?, partial).await
                    }
                },
            )
        }
        Operation::Destroy => on(filter, move |Path(id): Path<String>| {
            let view = view.clone();
            let resource = resource.clone();
            async move {
                metrics::record_dispatch(&resource, op);
                view.destroy(id).await
            }
        }),
    };

    Ok(method_router)
}

/// Unparsable JSON is a 400; a wrong content type or unreadable body keeps
/// the status axum assigned it (415, 413).
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| match rejection {
        JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
            ApiError::MalformedBody(rejection.body_text())
        }
        other => ApiError::Rejected(other.status(), other.body_text()),
    })
}

fn mount_index(mut request: Request) -> Request {
    *request.uri_mut() = Uri::from_static("/");
    request
}

async fn not_found() -> Response {
    ApiError::NotFound("Not found.".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;

    struct Stub(&'static str);

    #[async_trait]
    impl ViewSet for Stub {
        fn basename(&self) -> &str {
            self.0
        }
        async fn list(&self) -> Result<Response, ApiError> {
            Ok(StatusCode::OK.into_response())
        }
        async fn create(&self, _body: Value) -> Result<Response, ApiError> {
            Ok(StatusCode::CREATED.into_response())
        }
        async fn retrieve(&self, _id: String) -> Result<Response, ApiError> {
            Ok(StatusCode::OK.into_response())
        }
        async fn update(&self, _id: String, _body: Value, _partial: bool) -> Result<Response, ApiError> {
            Ok(StatusCode::OK.into_response())
        }
        async fn destroy(&self, _id: String) -> Result<Response, ApiError> {
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }

    fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new(RoutingConfig::default())
    }

    #[test]
    fn test_one_group_per_registration_and_one_admin_mount() {
        let mut b = builder();
        b.register("trips", Arc::new(Stub("trip"))).unwrap();
        b.register("logs", Arc::new(Stub("logsheet"))).unwrap();

        let table = b.build();
        assert_eq!(table.groups().len(), 2);
        assert_eq!(table.mounts().count(), 1);
        assert_eq!(table.admin().prefix, "/admin");
    }

    #[test]
    fn test_trips_and_logs_scenario() {
        let mut b = builder();
        b.register("trips", Arc::new(Stub("trip")))
            .unwrap()
            .register("logs", Arc::new(Stub("logsheet")))
            .unwrap();
        let table = b.build();

        let trips = table.group("trips").unwrap();
        assert_eq!(trips.list_pattern, "/api/trips/");
        assert_eq!(trips.detail_pattern, "/api/trips/{id}/");
        assert_eq!(trips.operations(), Operation::ALL.to_vec());

        let logs = table.group("logs").unwrap();
        assert_eq!(logs.list_pattern, "/api/logs/");
        assert_eq!(logs.operations(), Operation::ALL.to_vec());

        assert_eq!(table.api_root(), Some("/api/"));
    }

    #[test]
    fn test_route_names_and_methods() {
        let mut b = builder();
        b.register("trips", Arc::new(Stub("trip"))).unwrap();
        let table = b.build();

        let triples: Vec<_> = table
            .routes()
            .map(|r| (r.method.as_str(), r.pattern.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(
            triples,
            vec![
                ("GET", "/api/trips/", "trip-list"),
                ("POST", "/api/trips/", "trip-list"),
                ("GET", "/api/trips/{id}/", "trip-detail"),
                ("PUT", "/api/trips/{id}/", "trip-detail"),
                ("PATCH", "/api/trips/{id}/", "trip-detail"),
                ("DELETE", "/api/trips/{id}/", "trip-detail"),
            ]
        );
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let mut b = builder();
        b.register("trips", Arc::new(Stub("trip"))).unwrap();
        let err = b.register("/trips/", Arc::new(Stub("other"))).err();
        assert_eq!(err, Some(RoutingError::DuplicatePrefix("trips".to_string())));
        assert_eq!(b.prefixes().count(), 1);
    }

    #[test]
    fn test_duplicate_basename_rejected() {
        let mut b = builder();
        b.register("trips", Arc::new(Stub("trip"))).unwrap();
        let err = b.register("journeys", Arc::new(Stub("trip"))).err();
        assert_eq!(err, Some(RoutingError::DuplicateBasename("trip".to_string())));
    }

    #[test]
    fn test_invalid_prefixes() {
        let mut b = builder();
        for prefix in ["", "/", "//", "a b", "{id}", "x*", "a//b"] {
            assert!(
                matches!(
                    b.register(prefix, Arc::new(Stub("x"))),
                    Err(RoutingError::InvalidPrefix(_))
                ),
                "prefix {prefix:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_nested_prefix_keeps_segments() {
        let mut b = builder();
        b.register("/fleet/trips/", Arc::new(Stub("trip"))).unwrap();
        let table = b.build();
        assert_eq!(table.groups()[0].list_pattern, "/api/fleet/trips/");
    }

    #[test]
    fn test_register_type_erased_view_sets() {
        let registry: Vec<(&str, Arc<dyn ViewSet>)> = vec![
            ("trips", Arc::new(Stub("trip"))),
            ("logs", Arc::new(Stub("logsheet"))),
        ];

        let mut b = builder();
        for (prefix, view_set) in registry {
            b.register_dyn(prefix, view_set).unwrap();
        }
        assert_eq!(b.prefixes().collect::<Vec<_>>(), vec!["trips", "logs"]);

        let err = b.register_dyn("trips", Arc::new(Stub("other"))).err();
        assert_eq!(err, Some(RoutingError::DuplicatePrefix("trips".to_string())));
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut b = builder();
        b.register("trips", Arc::new(Stub("trip"))).unwrap();
        b.register("logs", Arc::new(Stub("logsheet"))).unwrap();
        assert_eq!(b.build(), b.build());
    }

    #[test]
    fn test_empty_build_holds_admin_only() {
        let table = builder().build();
        assert!(table.is_empty());
        assert_eq!(table.routes().count(), 0);
        assert_eq!(table.mounts().count(), 1);
    }

    #[tokio::test]
    async fn test_empty_router_serves_root_and_admin() {
        use axum::body::Body;
        use axum::http::Request;

        let admin = Router::new().route("/", get(|| async { "admin" }));
        let router = builder().into_router(admin).unwrap();

        let send = |uri: &'static str| {
            let router = router.clone();
            async move {
                let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
                let response = router.oneshot(request).await.unwrap();
                let status = response.status();
                let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
                (status, bytes)
            }
        };

        let (status, body) = send("/api/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"{}");

        for uri in ["/admin", "/admin/"] {
            let (status, body) = send(uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(&body[..], b"admin");
        }

        let (status, _) = send("/api/trips/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_without_trailing_slash_or_root() {
        let config = RoutingConfig {
            trailing_slash: false,
            root_view: false,
            api_prefix: "/v1/".to_string(),
            ..RoutingConfig::default()
        };
        let mut b = RouteTableBuilder::new(config);
        b.register("trips", Arc::new(Stub("trip"))).unwrap();
        let table = b.build();

        let trips = table.group("trips").unwrap();
        assert_eq!(trips.list_pattern, "/v1/trips");
        assert_eq!(trips.detail_pattern, "/v1/trips/{id}");
        assert_eq!(table.api_root(), None);
    }

    #[test]
    fn test_display_lists_every_route() {
        let mut b = builder();
        b.register("trips", Arc::new(Stub("trip"))).unwrap();
        let rendered = b.build().to_string();
        assert!(rendered.contains("/api/trips/{id}/"));
        assert!(rendered.contains("trip-detail (destroy)"));
        assert!(rendered.ends_with("admin"));
    }
}
