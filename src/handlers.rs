use crate::actions::Action;
use crate::clipboard::Clipboard;
use crate::errors::AppError;
use crate::models::{ClickForm, ClickRequest, EntriesResponse, HabitRecord, PresetResponse};
use crate::navigation::{Navigation, Page, PageQuery};
use crate::notifications::Notification;
use crate::offline::FetchError;
use crate::repository::{export_markdown, get_all_sorted};
use crate::state::AppState;
use crate::ui::{render_index, IndexView};
use axum::{
    extract::{Path, Query, State},
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::Local;
use tracing::debug;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    if query.page.is_none() {
        return Ok(Redirect::to(&Navigation::default().url()).into_response());
    }

    let navigation = Navigation::from_query(&query);
    let entries = get_all_sorted(state.store.as_ref()).await?;
    let export = state.clipboard.read_text().await;
    let notifications = state.notifications.active().await;

    let view = IndexView {
        navigation,
        presets: &state.presets,
        entries: &entries,
        export: export.as_deref(),
        notifications: &notifications,
    };
    Ok(Html(render_index(&view)).into_response())
}

pub async fn click_form(
    State(state): State<AppState>,
    Form(form): Form<ClickForm>,
) -> Result<Redirect, AppError> {
    let action = Action::parse(&form.target, form.text.as_deref())?;
    let current = form.page.as_deref().and_then(Page::parse).unwrap_or_default();
    let mut navigation = Navigation::new(current);
    if let Some(page) = apply_action(&state, action).await? {
        navigation.set_page(page);
    }
    Ok(Redirect::to(&navigation.url()))
}

pub async fn click(
    State(state): State<AppState>,
    Json(payload): Json<ClickRequest>,
) -> Result<Json<EntriesResponse>, AppError> {
    let action = Action::parse(&payload.target, payload.text.as_deref())?;
    let mut navigation = Navigation::default();
    if let Some(page) = apply_action(&state, action).await? {
        navigation.set_page(page);
    }
    let entries = get_all_sorted(state.store.as_ref()).await?;
    Ok(Json(EntriesResponse {
        page: navigation.page().as_str().to_string(),
        entries,
    }))
}

pub async fn get_habits(State(state): State<AppState>) -> Result<Json<Vec<HabitRecord>>, AppError> {
    Ok(Json(get_all_sorted(state.store.as_ref()).await?))
}

pub async fn get_presets(State(state): State<AppState>) -> Json<Vec<PresetResponse>> {
    Json(
        state
            .presets
            .iter()
            .map(|preset| PresetResponse {
                id: preset.button_id.clone(),
                label: preset.label.clone(),
            })
            .collect(),
    )
}

pub async fn get_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let markdown = export_to_clipboard(&state).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], markdown))
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.notifications.active().await)
}

pub async fn notification_click(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Redirect {
    Redirect::to(state.notifications.click(&tag).await)
}

pub async fn asset(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, AppError> {
    if method != Method::GET && method != Method::HEAD {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }

    let response = state
        .assets
        .fetch(uri.path())
        .await
        .map_err(|err: FetchError| AppError::gateway_timeout(err.to_string()))?;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, [(header::CONTENT_TYPE, response.content_type)], response.body).into_response())
}

/// Runs one click. Returns the page to navigate to, if the action navigates.
///
/// Store writes finish before this returns, so whatever renders next sees them.
pub async fn apply_action(state: &AppState, action: Action) -> Result<Option<Page>, AppError> {
    debug!(?action, mutates = action.mutates(), "applying action");
    match action {
        Action::Navigate(page) => return Ok(Some(page)),
        Action::Export => {
            export_to_clipboard(state).await?;
        }
        Action::Delete(id) => state.store.remove(&id).await?,
        Action::Duplicate(id) => {
            let source = state
                .store
                .get(&id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("no habit with id '{id}'")))?;
            add_record(state, HabitRecord::new(source.description)).await?;
        }
        Action::AddPreset(button_id) => {
            let label = state
                .presets
                .label(&button_id)
                .ok_or_else(|| AppError::bad_request(format!("unknown habit button '{button_id}'")))?;
            add_record(state, HabitRecord::new(label)).await?;
        }
        Action::AddCustom(text) => add_record(state, HabitRecord::new(text)).await?,
    }
    Ok(None)
}

async fn add_record(state: &AppState, record: HabitRecord) -> Result<(), AppError> {
    let id = record.id.clone();
    state.store.set(&id, record).await?;
    Ok(())
}

async fn export_to_clipboard(state: &AppState) -> Result<String, AppError> {
    let entries = get_all_sorted(state.store.as_ref()).await?;
    let markdown = export_markdown(&entries, &Local);
    state.clipboard.write_text(markdown.clone()).await;
    Ok(markdown)
}
