//! Browser front end: one page per variant.

mod page;

pub use page::{render_index, render_not_found, VariantPage};

use std::sync::Arc;

use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use entex_core::Variant;

use crate::analyzer::{Outcome, Slot, Workbench};

#[derive(Clone)]
pub struct AppState {
    workbench: Arc<Workbench>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(workbench: Workbench, shutdown: CancellationToken) -> Self {
        Self {
            workbench: Arc::new(workbench),
            shutdown,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    #[error("{0} has no Clear action")]
    NotClearable(Variant),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        debug!("{}", self);
        let name = match &self {
            WebError::UnknownVariant(name) => name.clone(),
            WebError::NotClearable(variant) => format!("{}/clear", variant.slug()),
        };
        (StatusCode::NOT_FOUND, Html(render_not_found(&name))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/:variant", get(show))
        .route("/:variant/analyze", post(analyze))
        .route("/:variant/clear", post(clear))
        .with_state(state)
}

/// Serve until the shutdown token is cancelled.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

fn resolve<'a>(state: &'a AppState, name: &str) -> Result<&'a Slot, WebError> {
    let variant: Variant = name
        .parse()
        .map_err(|_| WebError::UnknownVariant(name.to_string()))?;
    Ok(state.workbench.slot(variant))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.workbench))
}

async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, WebError> {
    let slot = resolve(&state, &name)?;
    Ok(Html(VariantPage::new(slot).render()))
}

async fn analyze(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Form(form): Form<AnalyzeForm>,
) -> Result<Html<String>, WebError> {
    let slot = resolve(&state, &name)?;
    let page = VariantPage::new(slot).with_input(&form.text);

    let outcome = match slot {
        Slot::Ready(extractor) => {
            let cancel = state.shutdown.child_token();
            extractor.analyze(&form.text, &cancel).await
        }
        Slot::Unavailable { .. } => return Ok(Html(page.render())),
    };

    info!(
        "{} analyze finished: {}",
        slot.profile().variant,
        match &outcome {
            Outcome::Warning { .. } => "warning",
            Outcome::Success { .. } => "success",
            Outcome::Failure { .. } => "failure",
        }
    );
    Ok(Html(page.with_outcome(&outcome).render()))
}

async fn clear(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, WebError> {
    let slot = resolve(&state, &name)?;
    let profile = slot.profile();
    if !profile.presentation.clearable {
        return Err(WebError::NotClearable(profile.variant));
    }
    Ok(Html(VariantPage::new(slot).render()))
}
