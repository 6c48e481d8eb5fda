use axum::body::Bytes;
use axum::extract::{Path, Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::contact::{Contact, DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::store::ContactStore;

/// Failures surfaced to clients. Every variant renders as HTTP 500 with a
/// fixed message; the underlying store error stays in the server log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Couldn't create a new contact. Please try again.")]
    Insert(anyhow::Error),
    #[error("Couldn't fetch the records. Try again.")]
    FetchAll(anyhow::Error),
    #[error("No records match the given parameter.")]
    NoMatch,
    #[error("Couldn't fetch the records. Retry.")]
    FetchOne(anyhow::Error),
    #[error("Changing the record failed. Try again.")]
    Update(anyhow::Error),
    #[error("Couldn't delete the record. Try again.")]
    Delete(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Insert(source)
            | ApiError::FetchAll(source)
            | ApiError::FetchOne(source)
            | ApiError::Update(source)
            | ApiError::Delete(source) => error!("{source:#}"),
            ApiError::NoMatch => error!("{self}"),
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Build the application router over the given store.
///
/// Both routes accept every HTTP method; the wildcard remainder after
/// `/api/` is the optional record identifier.
pub fn router<S: ContactStore>(store: S) -> Router {
    Router::new()
        .route("/api/", any(api_handler::<S>))
        .route("/api/*param", any(api_handler::<S>))
        .layer(middleware::from_fn(access_log))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Log method and URL for every incoming request before dispatch.
async fn access_log(request: Request, next: Next) -> Response {
    info!("{} {}", request.method(), request.uri());
    next.run(request).await
}

/// Single entry point for the contacts API, dispatching on HTTP method.
async fn api_handler<S: ContactStore>(
    State(store): State<S>,
    method: Method,
    param: Option<Path<String>>,
    body: Bytes,
) -> Response {
    let param = param.map(|Path(param)| param).unwrap_or_default();

    match method {
        Method::POST => create_contact(&store, &body).await.into_response(),
        Method::GET if param.is_empty() => list_contacts(&store).await.into_response(),
        Method::GET => get_contact(&store, &param).await.into_response(),
        Method::PUT => update_contact(&store, &param, &body).await.into_response(),
        Method::DELETE => delete_contact(&store, &param).await.into_response(),
        other => {
            // No body is written for unhandled methods, so clients see a
            // bare 200.
            warn!("unhandled method: {other}");
            ().into_response()
        }
    }
}

async fn create_contact<S: ContactStore>(
    store: &S,
    body: &[u8],
) -> Result<Json<InsertOutcome>, ApiError> {
    let contact = decode_contact(body);
    let outcome = store
        .insert(contact.into())
        .await
        .map_err(ApiError::Insert)?;
    Ok(Json(outcome))
}

async fn list_contacts<S: ContactStore>(store: &S) -> Result<Json<Vec<Contact>>, ApiError> {
    let documents = store.all().await.map_err(ApiError::FetchAll)?;
    Ok(Json(documents.into_iter().map(Contact::from).collect()))
}

async fn get_contact<S: ContactStore>(store: &S, param: &str) -> Result<Json<Contact>, ApiError> {
    let document = store
        .get(parse_id(param))
        .await
        .map_err(ApiError::FetchOne)?
        .ok_or(ApiError::NoMatch)?;
    Ok(Json(document.into()))
}

async fn update_contact<S: ContactStore>(
    store: &S,
    param: &str,
    body: &[u8],
) -> Result<Json<UpdateOutcome>, ApiError> {
    let contact = decode_contact(body);
    let outcome = store
        .set_phone(parse_id(param), &contact.phone)
        .await
        .map_err(ApiError::Update)?;
    Ok(Json(outcome))
}

async fn delete_contact<S: ContactStore>(
    store: &S,
    param: &str,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let outcome = store
        .remove(parse_id(param))
        .await
        .map_err(ApiError::Delete)?;
    Ok(Json(outcome))
}

/// A body that fails to decode yields a default contact and the operation
/// proceeds with it.
fn decode_contact(body: &[u8]) -> Contact {
    serde_json::from_slice(body).unwrap_or_default()
}

/// A malformed identifier degrades to the all-zero ObjectId, which matches
/// no record, rather than being rejected outright.
fn parse_id(param: &str) -> ObjectId {
    ObjectId::parse_str(param).unwrap_or_else(|_| ObjectId::from_bytes([0; 12]))
}
