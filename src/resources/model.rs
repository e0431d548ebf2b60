//! Generic CRUD view set over a [`Store`].

use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::http::ApiError;
use crate::resources::store::Store;
use crate::routing::ViewSet;

/// A record type served by [`ModelViewSet`].
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Stem for route names.
    const BASENAME: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    /// Field-level checks run on every create and update.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Cross-record check run after [`Model::validate`], e.g. a foreign key.
pub type Check<M> = Arc<dyn Fn(&M) -> Result<(), ApiError> + Send + Sync>;

pub struct ModelViewSet<M> {
    store: Arc<Store<M>>,
    checks: Vec<Check<M>>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> ModelViewSet<M> {
    pub fn new() -> Self {
        Self::with_store(Arc::new(Store::new()))
    }

    pub fn with_store(store: Arc<Store<M>>) -> Self {
        Self {
            store,
            checks: Vec::new(),
            _model: PhantomData,
        }
    }

    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&M) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        self.checks.push(Arc::new(check));
        self
    }

    pub fn store(&self) -> &Arc<Store<M>> {
        &self.store
    }

    fn lookup(id: &str) -> Result<u64, ApiError> {
        id.parse::<u64>().map_err(|_| not_found())
    }

    fn validate(&self, record: &M) -> Result<(), ApiError> {
        record.validate()?;
        self.checks.iter().try_for_each(|check| check(record))
    }
}

impl<M: Model> Default for ModelViewSet<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<M: Model> ViewSet for ModelViewSet<M> {
    fn basename(&self) -> &str {
        M::BASENAME
    }

    async fn list(&self) -> Result<Response, ApiError> {
        Ok(Json(self.store.all()).into_response())
    }

    async fn create(&self, body: Value) -> Result<Response, ApiError> {
        let mut record: M = deserialize(require_object(body)?)?;
        self.validate(&record)?;

        let id = self.store.next_id();
        record.set_id(id);
        self.store.insert(record.id(), record.clone());

        tracing::info!(resource = M::BASENAME, id, "Record created");
        Ok((StatusCode::CREATED, Json(record)).into_response())
    }

    async fn retrieve(&self, id: String) -> Result<Response, ApiError> {
        let id = Self::lookup(&id)?;
        let record = self.store.get(id).ok_or_else(not_found)?;
        Ok(Json(record).into_response())
    }

    async fn update(&self, id: String, body: Value, partial: bool) -> Result<Response, ApiError> {
        let id = Self::lookup(&id)?;
        let changes = require_object(body)?;

        let updated = self
            .store
            .try_update(id, |current| -> Result<M, ApiError> {
                let merged = if partial {
                    merge(to_value(current)?, changes)
                } else {
                    changes
                };
                let mut record: M = deserialize(merged)?;
                record.set_id(id);
                self.validate(&record)?;
                Ok(record)
            })
            .ok_or_else(not_found)??;

        tracing::info!(resource = M::BASENAME, id, partial, "Record updated");
        Ok(Json(updated).into_response())
    }

    async fn destroy(&self, id: String) -> Result<Response, ApiError> {
        let id = Self::lookup(&id)?;
        self.store.remove(id).ok_or_else(not_found)?;

        tracing::info!(resource = M::BASENAME, id, "Record deleted");
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Not found.".to_string())
}

fn require_object(body: Value) -> Result<Value, ApiError> {
    if body.is_object() {
        Ok(body)
    } else {
        Err(ApiError::MalformedBody("expected a JSON object".to_string()))
    }
}

fn deserialize<M: DeserializeOwned>(value: Value) -> Result<M, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Validation(e.to_string()))
}

fn to_value<M: Serialize>(record: &M) -> Result<Value, ApiError> {
    serde_json::to_value(record).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Overlay the top-level fields of `changes` onto `base`.
fn merge(mut base: Value, changes: Value) -> Value {
    if let (Some(base_fields), Value::Object(changed)) = (base.as_object_mut(), changes) {
        base_fields.extend(changed);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(default)]
        id: u64,
        text: String,
    }

    impl Model for Note {
        const BASENAME: &'static str = "note";

        fn id(&self) -> u64 {
            self.id
        }

        fn set_id(&mut self, id: u64) {
            self.id = id;
        }

        fn validate(&self) -> Result<(), ApiError> {
            if self.text.is_empty() {
                return Err(ApiError::Validation("text: may not be blank".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_merge_overlays_top_level_fields() {
        let merged = merge(json!({"id": 1, "text": "a"}), json!({"text": "b"}));
        assert_eq!(merged, json!({"id": 1, "text": "b"}));
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_ignores_client_id() {
        let view = ModelViewSet::<Note>::new();
        let response = view.create(json!({"id": 42, "text": "hi"})).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            view.store().get(1),
            Some(Note {
                id: 1,
                text: "hi".to_string()
            })
        );
        assert!(view.store().get(42).is_none());
    }

    #[tokio::test]
    async fn test_invalid_create_is_not_stored() {
        let view = ModelViewSet::<Note>::new();
        let err = view.create(json!({"text": ""})).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = view.create(json!({})).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = view.create(json!(["text"])).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));

        assert!(view.store().is_empty());
    }

    #[tokio::test]
    async fn test_full_update_requires_every_field() {
        let view = ModelViewSet::<Note>::new();
        view.create(json!({"text": "a"})).await.unwrap();

        let err = view.update("1".into(), json!({}), false).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        view.update("1".into(), json!({}), true).await.unwrap();
        assert_eq!(view.store().get(1).unwrap().text, "a");
    }

    #[tokio::test]
    async fn test_checks_run_on_create_and_update() {
        let view = ModelViewSet::<Note>::new().with_check(|note: &Note| {
            if note.text.len() > 3 {
                return Err(ApiError::Validation("text: too long".to_string()));
            }
            Ok(())
        });

        let err = view.create(json!({"text": "long"})).await.unwrap_err();
        assert_eq!(err, ApiError::Validation("text: too long".to_string()));

        view.create(json!({"text": "ok"})).await.unwrap();
        let err = view
            .update("1".into(), json!({"text": "longer"}), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(view.store().get(1).unwrap().text, "ok");
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let view = ModelViewSet::<Note>::new();
        for id in ["1", "abc", "-1"] {
            assert!(matches!(
                view.retrieve(id.to_string()).await,
                Err(ApiError::NotFound(_))
            ));
            assert!(matches!(
                view.destroy(id.to_string()).await,
                Err(ApiError::NotFound(_))
            ));
        }
    }
}
