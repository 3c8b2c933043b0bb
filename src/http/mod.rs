// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON HTTP API under `/api`.
//!
//! Callers are identified by `x-user-id` (plus optional `x-user-email` / `x-user-name`) set by an
//! upstream authenticator. The catalog sits behind one async mutex, so saves are serialized
//! per process.

use std::fmt;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::auth::Principal;
use crate::catalog::{Catalog, CatalogError, DiagramPatch, ListQuery, NewDiagram, DEFAULT_PAGE_LIMIT};
use crate::expansion::ExpansionState;
use crate::layout::{compute_layout, Canvas, FishboneLayout, Theme};
use crate::model::{decode_path, BoneStatus, Diagram, DiagramId, NodePath, UserId};
use crate::ops::{ApplyError, BonePatch, EffectPatch, Op};
use crate::render::render_svg;
use crate::store::{bones_from_records, BoneRecord, DiagramRecord, DiagramStore, RecordError};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

pub type BoxedStore = Box<dyn DiagramStore + Send>;

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Mutex<Catalog<BoxedStore>>>,
}

impl AppState {
    pub fn new(store: impl DiagramStore + Send + 'static) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(Catalog::new(Box::new(store)))),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    Catalog(CatalogError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Catalog(err) => match err {
                CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
                CatalogError::Access(_) => StatusCode::FORBIDDEN,
                CatalogError::Apply(ApplyError::Tree(tree)) if tree.is_not_found() => {
                    StatusCode::NOT_FOUND
                }
                CatalogError::Content(_) | CatalogError::Apply(_) => StatusCode::BAD_REQUEST,
                CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "missing or invalid {USER_ID_HEADER} header"),
            Self::BadRequest(message) | Self::NotFound(message) => f.write_str(message),
            Self::Catalog(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        // Store failures carry file system paths.
        let message = if status.is_server_error() {
            "internal error".to_owned()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER).ok_or(ApiError::Unauthorized)?;
        let user_id = UserId::new(user_id).map_err(|_| ApiError::Unauthorized)?;
        Ok(Principal::new(
            user_id,
            header_value(parts, USER_EMAIL_HEADER).unwrap_or_default(),
            header_value(parts, USER_NAME_HEADER).unwrap_or_default(),
        ))
    }
}

fn diagram_id(raw: &str) -> Result<DiagramId, ApiError> {
    DiagramId::new(raw).map_err(|_| ApiError::NotFound(format!("diagram {raw} not found")))
}

fn record(diagram: &Diagram) -> Json<DiagramRecord> {
    Json(DiagramRecord::from(diagram))
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    page: Option<usize>,
    limit: Option<usize>,
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDiagramBody {
    name: String,
    creator: String,
    effect_label: String,
    #[serde(default)]
    effect_info: Option<String>,
    #[serde(default)]
    effect_meta: Option<String>,
    #[serde(default)]
    roots: Vec<BoneRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDiagramBody {
    name: Option<String>,
    creator: Option<String>,
    effect_label: Option<String>,
    effect_info: Option<String>,
    effect_meta: Option<String>,
    roots: Option<Vec<BoneRecord>>,
}

/// Edit-form fields for a bone (or, at `effect`, the effect node). An empty `status` clears it.
#[derive(Debug, Default, Deserialize)]
struct PatchBody {
    label: Option<String>,
    info: Option<String>,
    metadata: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LayoutParams {
    width: Option<f64>,
    height: Option<f64>,
    theme: Option<String>,
    expanded: Option<String>,
    selected: Option<String>,
}

impl LayoutParams {
    fn canvas(&self) -> Result<Canvas, ApiError> {
        let default = Canvas::default();
        let width = self.width.unwrap_or(default.width);
        let height = self.height.unwrap_or(default.height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ApiError::BadRequest(
                "width and height must be positive numbers".to_owned(),
            ));
        }
        Ok(Canvas::new(width, height))
    }

    fn layout(&self, diagram: &Diagram) -> Result<FishboneLayout, ApiError> {
        let theme = match self.theme.as_deref() {
            Some(raw) => raw
                .parse::<Theme>()
                .map_err(|err| ApiError::BadRequest(err.to_string()))?,
            None => Theme::default(),
        };
        let expanded = self
            .expanded
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .collect::<ExpansionState>();

        Ok(compute_layout(
            diagram,
            self.canvas()?,
            theme,
            &expanded,
            self.selected.as_deref(),
        ))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/diagrams", get(list_own).post(create_diagram))
        .route("/api/diagrams/public", get(list_public))
        .route("/api/diagrams/stats", get(stats))
        .route(
            "/api/diagrams/{id}",
            get(get_diagram).put(update_diagram).delete(delete_diagram),
        )
        .route(
            "/api/diagrams/{id}/bones/{path}",
            post(insert_bone).put(patch_bone).delete(delete_bone),
        )
        .route("/api/diagrams/{id}/layout", get(diagram_layout))
        .route("/api/diagrams/{id}/svg", get(diagram_svg))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
}

async fn list_diagrams(
    state: &AppState,
    params: ListParams,
    owner: Option<&UserId>,
) -> Result<Response, ApiError> {
    let catalog = state.catalog.lock().await;
    if params.page.is_none() && params.limit.is_none() && params.search.is_none() {
        let diagrams = catalog.list_all(owner)?;
        let records = diagrams.iter().map(DiagramRecord::from).collect::<Vec<_>>();
        return Ok(Json(records).into_response());
    }

    let query = ListQuery {
        page: params.page.unwrap_or(1),
        limit: params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        search: params.search,
    };
    let page = catalog.list(&query, owner)?.map(|diagram| DiagramRecord::from(&diagram));
    Ok(Json(page).into_response())
}

async fn list_own(
    State(state): State<AppState>,
    principal: Principal,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    list_diagrams(&state, params, Some(principal.user_id())).await
}

async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    list_diagrams(&state, params, None).await
}

async fn stats(State(state): State<AppState>, _principal: Principal) -> Result<Response, ApiError> {
    let stats = state.catalog.lock().await.stats()?;
    Ok(Json(stats).into_response())
}

async fn create_diagram(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<CreateDiagramBody>,
) -> Result<Response, ApiError> {
    let new = NewDiagram {
        name: body.name,
        creator: body.creator,
        effect_label: body.effect_label,
        effect_info: body.effect_info,
        effect_meta: body.effect_meta,
        roots: bones_from_records(body.roots)?,
    };
    let diagram = state.catalog.lock().await.create(new, &principal)?;
    Ok((StatusCode::CREATED, record(&diagram)).into_response())
}

async fn get_diagram(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<DiagramRecord>, ApiError> {
    let id = diagram_id(&id)?;
    let diagram = state.catalog.lock().await.get(&id, &principal)?;
    Ok(record(&diagram))
}

async fn update_diagram(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(body): Json<UpdateDiagramBody>,
) -> Result<Json<DiagramRecord>, ApiError> {
    let id = diagram_id(&id)?;
    let patch = DiagramPatch {
        name: body.name,
        creator: body.creator,
        effect_label: body.effect_label,
        effect_info: body.effect_info,
        effect_meta: body.effect_meta,
        roots: body.roots.map(bones_from_records).transpose()?,
    };
    let diagram = state.catalog.lock().await.update(&id, &principal, patch)?;
    Ok(record(&diagram))
}

async fn delete_diagram(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = diagram_id(&id)?;
    state.catalog.lock().await.delete(&id, &principal)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply(state: &AppState, principal: &Principal, id: &str, op: Op) -> Result<Diagram, ApiError> {
    let id = diagram_id(id)?;
    let (diagram, _) = state.catalog.lock().await.apply(&id, principal, &op)?;
    Ok(diagram)
}

async fn insert_bone(
    State(state): State<AppState>,
    principal: Principal,
    Path((id, parent)): Path<(String, String)>,
    Json(body): Json<BoneRecord>,
) -> Result<Response, ApiError> {
    let op = Op::InsertBone {
        parent,
        bone: body.into_bone()?,
    };
    let diagram = apply(&state, &principal, &id, op).await?;
    Ok((StatusCode::CREATED, record(&diagram)).into_response())
}

async fn patch_bone(
    State(state): State<AppState>,
    principal: Principal,
    Path((id, path)): Path<(String, String)>,
    Json(body): Json<PatchBody>,
) -> Result<Json<DiagramRecord>, ApiError> {
    let is_effect = matches!(decode_path(&path), Ok(NodePath::Effect));
    let op = if is_effect {
        if body.status.is_some() {
            return Err(ApiError::BadRequest("the effect node has no status".to_owned()));
        }
        Op::UpdateEffect {
            patch: EffectPatch {
                label: body.label,
                info: body.info,
                meta: body.metadata,
            },
        }
    } else {
        let status = match body.status.as_deref() {
            None => None,
            Some("") => Some(None),
            Some(raw) => Some(Some(
                raw.parse::<BoneStatus>()
                    .map_err(|err| ApiError::BadRequest(err.to_string()))?,
            )),
        };
        Op::PatchBone {
            path,
            patch: BonePatch {
                label: body.label,
                info: body.info,
                metadata: body.metadata,
                status,
            },
        }
    };
    let diagram = apply(&state, &principal, &id, op).await?;
    Ok(record(&diagram))
}

async fn delete_bone(
    State(state): State<AppState>,
    principal: Principal,
    Path((id, path)): Path<(String, String)>,
) -> Result<Json<DiagramRecord>, ApiError> {
    let diagram = apply(&state, &principal, &id, Op::DeleteBone { path }).await?;
    Ok(record(&diagram))
}

async fn load_for_view(
    state: &AppState,
    principal: &Principal,
    id: &str,
) -> Result<Diagram, ApiError> {
    let id = diagram_id(id)?;
    let diagram = state.catalog.lock().await.get(&id, principal)?;
    Ok(diagram)
}

async fn diagram_layout(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Query(params): Query<LayoutParams>,
) -> Result<Json<FishboneLayout>, ApiError> {
    let diagram = load_for_view(&state, &principal, &id).await?;
    Ok(Json(params.layout(&diagram)?))
}

async fn diagram_svg(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Query(params): Query<LayoutParams>,
) -> Result<Response, ApiError> {
    let diagram = load_for_view(&state, &principal, &id).await?;
    let svg = render_svg(&params.layout(&diagram)?);
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

#[cfg(test)]
mod tests;
