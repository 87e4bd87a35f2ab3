//! HTTP surface: the lookup form plus a small JSON API

mod page;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Json, Router};
use log::{debug, error, info};
use serde::Deserialize;

use crate::config::Config;
use crate::lookup::{AlumniMatch, LookupService};

pub use page::{escape_html, render_page};

#[derive(Clone)]
pub struct AppState {
    lookup: LookupService,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub skill: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillParams {
    pub skill: Option<String>,
}

pub fn router(lookup: LookupService) -> Router {
    Router::new()
        .route("/", get(index).post(search))
        .route("/api/skills", get(api_skills))
        .route("/api/alumni", get(api_alumni))
        .with_state(AppState { lookup })
}

/// Serve over an existing store. Refuses to start when the store is absent.
pub async fn serve(config: &Config) -> Result<()> {
    let lookup = LookupService::new(config);
    lookup.check_store()?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    info!("Listening on http://{}", config.bind);
    axum::serve(listener, router(lookup)).await?;

    Ok(())
}

/// Run store reads off the async runtime; each gets its own connection
async fn blocking<T, F>(f: F) -> T
where
    T: Default + Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap_or_else(|e| {
        error!("Lookup task failed: {}", e);
        T::default()
    })
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let skills = blocking(move || state.lookup.all_skills().into_items_logged("skill catalog")).await;
    Html(render_page("", &skills, None))
}

async fn search(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Html<String> {
    let skill = form.skill.trim().to_string();
    debug!("Search for {:?}", skill);

    let query = skill.clone();
    let (skills, matches) = blocking(move || {
        let skills = state.lookup.all_skills().into_items_logged("skill catalog");
        let matches = state
            .lookup
            .find_alumni_by_skill(&query)
            .into_items_logged("alumni");
        (skills, matches)
    })
    .await;

    Html(render_page(&skill, &skills, Some(matches.as_slice())))
}

async fn api_skills(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(blocking(move || state.lookup.all_skills().into_items_logged("skill catalog")).await)
}

async fn api_alumni(
    State(state): State<AppState>,
    Query(params): Query<SkillParams>,
) -> Json<Vec<AlumniMatch>> {
    let skill = params.skill.unwrap_or_default().trim().to_string();
    Json(
        blocking(move || {
            state
                .lookup
                .find_alumni_by_skill(&skill)
                .into_items_logged("alumni")
        })
        .await,
    )
}
