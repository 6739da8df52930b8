//! Web front end: list past reports, accept a query, show one report.
//! Three routes plus a health probe; no JSON API, no authentication.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::config::AppConfig;
use crate::flash::{self, Flash, FLASH_COOKIE};
use crate::pages;
use crate::pipeline::DynAgent;
use crate::store::ReportStore;

/// The index shows more history than the store's default lookup limit.
const INDEX_LIST_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct AppState {
    pub store: ReportStore,
    pub agent: DynAgent,
    pub missing_keys: Vec<&'static str>,
    pub secret: Arc<String>,
}

impl AppState {
    pub fn new(store: ReportStore, agent: DynAgent, config: &AppConfig) -> Self {
        Self {
            store,
            agent,
            missing_keys: config.missing_keys(),
            secret: Arc::new(config.session_secret.clone()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(index))
        .route("/run", post(run))
        .route("/report/{id}", get(view_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct RunForm {
    #[serde(default)]
    query: String,
}

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let flash = take_flash(&state, &headers);
    let reports = match state.store.list(INDEX_LIST_LIMIT).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "listing reports failed");
            return internal_error();
        }
    };
    let html = pages::index(&reports, &state.missing_keys, flash.as_ref());
    rendered(html, flash.is_some())
}

async fn run(State(state): State<AppState>, Form(form): Form<RunForm>) -> Response {
    let query = form.query.trim().to_string();
    if query.is_empty() {
        return redirect_with_flash(&state, Flash::error("Please enter a query."), "/");
    }

    match state.agent.run(&query).await {
        Ok(outcome) => {
            let id = match state
                .store
                .save(&query, &outcome.summary, &outcome.sources)
                .await
            {
                Ok(id) => id,
                Err(e) => {
                    error!(error = %e, "saving report failed");
                    return redirect_with_flash(&state, Flash::error("Failed to save report."), "/");
                }
            };
            let target = format!("/report/{id}");
            if outcome.errors.is_empty() {
                Redirect::to(&target).into_response()
            } else {
                let notice =
                    Flash::warning(format!("Some sources were skipped: {}", outcome.errors.len()));
                redirect_with_flash(&state, notice, &target)
            }
        }
        Err(e) => redirect_with_flash(&state, Flash::error(e.to_string()), "/"),
    }
}

async fn view_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let flash = take_flash(&state, &headers);
    match state.store.get(id).await {
        Ok(Some(report)) => rendered(pages::report(&report, flash.as_ref()), flash.is_some()),
        Ok(None) => redirect_with_flash(&state, Flash::error("Report not found."), "/"),
        Err(e) => {
            error!(error = %e, id, "loading report failed");
            internal_error()
        }
    }
}

/// Pull a valid flash out of the request's cookies, if any.
fn take_flash(state: &AppState, headers: &HeaderMap) -> Option<Flash> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let value = cookies.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        (name == FLASH_COOKIE).then_some(value)
    })?;
    flash::decode(&state.secret, value)
}

/// A rendered page; clears the flash cookie when one was consumed.
fn rendered(html: String, had_flash: bool) -> Response {
    if had_flash {
        (
            [(
                header::SET_COOKIE,
                format!("{FLASH_COOKIE}=; Path=/; Max-Age=0; HttpOnly"),
            )],
            Html(html),
        )
            .into_response()
    } else {
        Html(html).into_response()
    }
}

fn redirect_with_flash(state: &AppState, flash_value: Flash, target: &str) -> Response {
    let cookie = format!(
        "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        flash::encode(&state.secret, &flash_value)
    );
    ([(header::SET_COOKIE, cookie)], Redirect::to(target)).into_response()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}
