use axum::{
    extract::{Extension, Form, Query},
    http::StatusCode,
    response::{Html, Json, Redirect},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_sessions::Session;

use crate::deal_engine::{Category, DealQuery, DealSection, Product, Selection, Store};
use crate::error::{SelectionError, SessionError};
use crate::render::render_page;
use crate::routes::AppState;
use crate::session::{dispatch, SessionEvent, SessionState};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Store,
    Category,
    DealSection,
}

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    pub dimension: Dimension,
    pub value: String,
}

impl FilterForm {
    fn into_event(self) -> Result<SessionEvent, SelectionError> {
        Ok(match self.dimension {
            Dimension::Store => SessionEvent::StoreChanged(self.value.parse()?),
            Dimension::Category => SessionEvent::CategoryChanged(self.value.parse()?),
            Dimension::DealSection => SessionEvent::DealSectionChanged(self.value.parse()?),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiDealsQuery {
    pub store: Option<String>,
    pub category: Option<String>,
    pub deal_section: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ApiDealsResponse {
    pub products: Vec<Product>,
    pub page: u32,
    /// `None` once `page` is the last addressable page.
    pub next_page: Option<u32>,
    pub warning: Option<String>,
}

pub fn deal_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(show_page))
        .route("/filters", post(change_filter))
        .route("/load-more", post(load_more))
        .route("/session/end", post(end_session))
        .route("/api/deals", get(api_deals))
        .route("/health", get(health))
        .layer(state.sessions.layer())
        .layer(Extension(state))
}

fn session_failure(err: SessionError) -> StatusCode {
    tracing::error!("Session store failure: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Renders the caller's session, or a fresh page when there is none. Only
/// actions start sessions.
async fn show_page(
    Extension(app): Extension<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, StatusCode> {
    let Some(handle) = app.sessions.lookup(&session).await.map_err(session_failure)? else {
        return Ok(Html(render_page(&SessionState::default())));
    };

    let mut state = handle.lock().await;
    let body = render_page(&state);
    state.clear_warnings();
    Ok(Html(body))
}

async fn change_filter(
    Extension(app): Extension<Arc<AppState>>,
    session: Session,
    Form(form): Form<FilterForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let event = form.into_event().map_err(|e| {
        tracing::warn!("Rejected filter change: {}", e);
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let handle = app
        .sessions
        .open(&session)
        .await
        .map_err(|e| (session_failure(e), "session unavailable".to_string()))?;
    dispatch(&app.engine, &mut *handle.lock().await, event).await;
    Ok(Redirect::to("/"))
}

async fn load_more(
    Extension(app): Extension<Arc<AppState>>,
    session: Session,
) -> Result<Redirect, StatusCode> {
    let handle = app.sessions.open(&session).await.map_err(session_failure)?;
    // The lock is held across the fetch; a second click waits for the first.
    let mut state = handle.lock().await;
    dispatch(&app.engine, &mut state, SessionEvent::LoadMoreClicked).await;
    Ok(Redirect::to("/"))
}

async fn end_session(
    Extension(app): Extension<Arc<AppState>>,
    session: Session,
) -> Result<Redirect, StatusCode> {
    app.sessions.end(&session).await.map_err(session_failure)?;
    Ok(Redirect::to("/"))
}

fn parse_or_default<T>(value: Option<&str>) -> Result<T, SelectionError>
where
    T: std::str::FromStr<Err = SelectionError> + Default,
{
    value.map(str::parse::<T>).transpose().map(Option::unwrap_or_default)
}

async fn api_deals(
    Extension(app): Extension<Arc<AppState>>,
    Query(params): Query<ApiDealsQuery>,
) -> Result<Json<ApiDealsResponse>, (StatusCode, String)> {
    let bad_request = |e: SelectionError| (StatusCode::BAD_REQUEST, e.to_string());
    let selection = Selection {
        store: parse_or_default::<Store>(params.store.as_deref()).map_err(bad_request)?,
        category: parse_or_default::<Category>(params.category.as_deref()).map_err(bad_request)?,
        deal_section: parse_or_default::<DealSection>(params.deal_section.as_deref())
            .map_err(bad_request)?,
    };

    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err((StatusCode::BAD_REQUEST, "page must be at least 1".to_string()));
    }

    let response = match app.engine.scrape(&DealQuery { selection, page }).await {
        Ok(products) => ApiDealsResponse {
            next_page: if products.is_empty() { Some(page) } else { page.checked_add(1) },
            products,
            page,
            warning: None,
        },
        Err(e) => ApiDealsResponse {
            products: Vec::new(),
            page,
            next_page: Some(page),
            warning: Some(e.to_string()),
        },
    };

    Ok(Json(response))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "deal-scraper"}))
}
