//! Generic CRUD endpoints over any [`HttpResource`].
//!
//! Each collection is served under `/api/v1/<collection>`:
//!
//! ```text
//! GET    /api/v1/users         list, ordered by id
//! POST   /api/v1/users         create, 201
//! GET    /api/v1/users/{id}    fetch
//! PUT    /api/v1/users/{id}    replace with a full payload
//! PATCH  /api/v1/users/{id}    merge with the stored record, then replace
//! DELETE /api/v1/users/{id}    delete, 204
//! ```
//!
//! Entity specifics (payload shape, validation and merge) live in the
//! [`HttpResource`] implementations next to this module.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpResponse, Scope, web};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{Entity, ResourceRepository};

use super::ApiResult;
use super::error::{invalid_type, malformed_body, persistence_error};
use super::state::HttpState;

/// Base path shared by every collection.
pub const API_BASE: &str = "/api/v1";

/// An entity exposed as a resource collection.
pub trait HttpResource: Entity + Serialize {
    /// Collection segment under [`API_BASE`].
    const COLLECTION: &'static str;

    /// Write payload; every field is optional so missing keys can be
    /// reported, and merged on partial update.
    type Payload: DeserializeOwned + Default + 'static;

    /// Repository backing the collection.
    fn repository(state: &HttpState) -> &Arc<dyn ResourceRepository<Self>>;

    /// Validate a complete payload into a storable draft.
    fn validate(payload: Self::Payload) -> Result<Self::Draft, Error>;

    /// Fill fields missing from `patch` with the values stored in `current`.
    fn merge(current: &Self, patch: Self::Payload) -> Self::Payload;
}

fn not_found<R: HttpResource>(raw_id: &str) -> Error {
    Error::not_found(format!("{} {raw_id} not found", R::NAME))
}

/// Non-numeric identifiers can never match a record, so they are 404s.
fn parse_id<R: HttpResource>(raw_id: &str) -> Result<R::Id, Error> {
    raw_id
        .parse::<i64>()
        .map(R::Id::from)
        .map_err(|_| not_found::<R>(raw_id))
}

/// Decode a body into the collection's payload.
///
/// When the object as a whole does not fit, each key is tried alone so the
/// error can name the first one whose value has the wrong type.
fn decode_payload<R: HttpResource>(body: &Value) -> Result<R::Payload, Error> {
    <R::Payload as Deserialize>::deserialize(body).map_err(|err| {
        let offending = body.as_object().and_then(|object| {
            object.iter().find_map(|(key, value)| {
                let single = Map::from_iter([(key.clone(), value.clone())]);
                <R::Payload as Deserialize>::deserialize(&Value::Object(single))
                    .err()
                    .map(|key_err| (key, key_err))
            })
        });
        match offending {
            Some((key, key_err)) => invalid_type(key, &key_err),
            None => malformed_body(&err),
        }
    })
}

async fn list<R: HttpResource>(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<R>>> {
    let records = R::repository(&state)
        .list()
        .await
        .map_err(persistence_error)?;
    Ok(web::Json(records))
}

async fn fetch<R: HttpResource>(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<R>> {
    let id = parse_id::<R>(&path)?;
    R::repository(&state)
        .find(id)
        .await
        .map_err(persistence_error)?
        .map(web::Json)
        .ok_or_else(|| not_found::<R>(&path))
}

async fn create<R: HttpResource>(
    state: web::Data<HttpState>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let draft = R::validate(decode_payload::<R>(&body)?)?;
    let record = R::repository(&state)
        .create(draft)
        .await
        .map_err(persistence_error)?;
    let id = record.id();
    info!(resource = R::NAME, %id, "record created");
    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("{API_BASE}/{}/{id}", R::COLLECTION),
        ))
        .json(record))
}

async fn store_replacement<R: HttpResource>(
    state: &HttpState,
    raw_id: &str,
    id: R::Id,
    payload: R::Payload,
) -> ApiResult<web::Json<R>> {
    let draft = R::validate(payload)?;
    let record = R::repository(state)
        .replace(id, draft)
        .await
        .map_err(persistence_error)?
        .ok_or_else(|| not_found::<R>(raw_id))?;
    info!(resource = R::NAME, %id, "record replaced");
    Ok(web::Json(record))
}

async fn replace<R: HttpResource>(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<web::Json<R>> {
    let id = parse_id::<R>(&path)?;
    let payload = decode_payload::<R>(&body)?;
    store_replacement::<R>(&state, &path, id, payload).await
}

async fn partial_update<R: HttpResource>(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<web::Json<R>> {
    let id = parse_id::<R>(&path)?;
    let patch = decode_payload::<R>(&body)?;
    let current = R::repository(&state)
        .find(id)
        .await
        .map_err(persistence_error)?
        .ok_or_else(|| not_found::<R>(&path))?;
    let merged = R::merge(&current, patch);
    store_replacement::<R>(&state, &path, id, merged).await
}

async fn delete<R: HttpResource>(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id::<R>(&path)?;
    let removed = R::repository(&state)
        .delete(id)
        .await
        .map_err(persistence_error)?;
    if !removed {
        return Err(not_found::<R>(&path));
    }
    info!(resource = R::NAME, %id, "record deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Routes for one collection, relative to [`API_BASE`].
///
/// Each path is registered with and without a trailing slash.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::domain::User;
/// use backend::inbound::http::resource::resource_scope;
///
/// let app = App::new().service(web::scope("/api/v1").service(resource_scope::<User>()));
/// # let _ = app;
/// ```
pub fn resource_scope<R: HttpResource>() -> Scope {
    let mut scope = web::scope(&format!("/{}", R::COLLECTION));
    for path in ["", "/"] {
        scope = scope
            .route(path, web::get().to(list::<R>))
            .route(path, web::post().to(create::<R>));
    }
    for path in ["/{id}", "/{id}/"] {
        scope = scope
            .route(path, web::get().to(fetch::<R>))
            .route(path, web::put().to(replace::<R>))
            .route(path, web::patch().to(partial_update::<R>))
            .route(path, web::delete().to(delete::<R>));
    }
    scope
}
