use crate::dates::today;
use crate::errors::AppError;
use crate::history::{DEFAULT_HISTORY_DAYS, HistoryRow};
use crate::models::{
    CalendarQuery, CheckIn, CheckInRequest, HistoryQuery, PrayerTypeEntry, PrayerTypeRequest,
    TodayResponse,
};
use crate::registry::PrayerType;
use crate::share::{ShareCard, streak_headline};
use crate::state::AppState;
use crate::storage::BlobStore;
use crate::store::CheckInStore;
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::{Html, Redirect},
};

const MAX_CALENDAR_DAYS: u32 = 366;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    Html(render_index(&store))
}

pub async fn get_today(State(state): State<AppState>) -> Json<TodayResponse> {
    let store = state.store.lock().await;
    Json(today_response(&store))
}

pub async fn check_in(
    State(state): State<AppState>,
    Json(payload): Json<CheckInRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let prayer_type = selected_prayer_type(payload.prayer_type.as_deref())?;
    state
        .with_store(move |store| store.record_check_in(prayer_type))
        .await?;
    let store = state.store.lock().await;
    Ok(Json(today_response(&store)))
}

pub async fn check_in_form(
    State(state): State<AppState>,
    Form(payload): Form<CheckInRequest>,
) -> Result<Redirect, AppError> {
    let prayer_type = selected_prayer_type(payload.prayer_type.as_deref())?;
    state
        .with_store(move |store| store.record_check_in(prayer_type))
        .await?;
    Ok(Redirect::to("/"))
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<CheckIn>> {
    let store = state.store.lock().await;
    Json(store.history(query.limit))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Json<Vec<HistoryRow>> {
    let days = query
        .days
        .unwrap_or(DEFAULT_HISTORY_DAYS)
        .min(MAX_CALENDAR_DAYS);
    let store = state.store.lock().await;
    Json(store.calendar(days))
}

pub async fn list_prayer_types(State(state): State<AppState>) -> Json<Vec<PrayerTypeEntry>> {
    let store = state.store.lock().await;
    Json(prayer_type_entries(&store))
}

pub async fn add_prayer_type(
    State(state): State<AppState>,
    Json(payload): Json<PrayerTypeRequest>,
) -> Result<Json<Vec<PrayerTypeEntry>>, AppError> {
    let prayer_type = new_prayer_type(&payload.name)?;
    state
        .with_store(move |store| store.add_prayer_type(prayer_type))
        .await?;
    let store = state.store.lock().await;
    Ok(Json(prayer_type_entries(&store)))
}

pub async fn add_prayer_type_form(
    State(state): State<AppState>,
    Form(payload): Form<PrayerTypeRequest>,
) -> Result<Redirect, AppError> {
    let prayer_type = new_prayer_type(&payload.name)?;
    state
        .with_store(move |store| store.add_prayer_type(prayer_type))
        .await?;
    Ok(Redirect::to("/"))
}

pub async fn remove_prayer_type(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<PrayerTypeEntry>>, AppError> {
    let prayer_type = existing_prayer_type(&name)?;
    state
        .with_store(move |store| store.remove_prayer_type(&prayer_type))
        .await?;
    let store = state.store.lock().await;
    Ok(Json(prayer_type_entries(&store)))
}

pub async fn remove_prayer_type_form(
    State(state): State<AppState>,
    Form(payload): Form<PrayerTypeRequest>,
) -> Result<Redirect, AppError> {
    let prayer_type = existing_prayer_type(&payload.name)?;
    state
        .with_store(move |store| store.remove_prayer_type(&prayer_type))
        .await?;
    Ok(Redirect::to("/"))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    state.with_store(|store| store.reset()).await?;
    let store = state.store.lock().await;
    Ok(Json(today_response(&store)))
}

pub async fn reset_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.with_store(|store| store.reset()).await?;
    Ok(Redirect::to("/"))
}

pub async fn get_share(State(state): State<AppState>) -> Json<ShareCard> {
    let store = state.store.lock().await;
    Json(ShareCard::new(store.current_streak(), store.longest_streak()))
}

fn today_response<B: BlobStore>(store: &CheckInStore<B>) -> TodayResponse {
    let check_in = store.today_check_in();
    let current_streak = store.current_streak();
    TodayResponse {
        date: today(),
        checked_in: store.is_checked_in_today(),
        prayer_type: check_in.and_then(|c| c.prayer_type.clone()),
        current_streak,
        longest_streak: store.longest_streak(),
        headline: streak_headline(current_streak),
    }
}

fn prayer_type_entries<B: BlobStore>(store: &CheckInStore<B>) -> Vec<PrayerTypeEntry> {
    store
        .prayer_types()
        .iter()
        .map(|prayer_type| PrayerTypeEntry {
            label: prayer_type.label(),
            name: prayer_type.clone(),
        })
        .collect()
}

/// Names typed into the add form are trimmed and lower-cased. Everything
/// else matches stored names exactly, apart from surrounding whitespace.
fn new_prayer_type(raw: &str) -> Result<PrayerType, AppError> {
    PrayerType::new(raw.trim().to_lowercase()).map_err(AppError::from)
}

fn existing_prayer_type(raw: &str) -> Result<PrayerType, AppError> {
    PrayerType::new(raw).map_err(AppError::from)
}

/// A blank selection means an untagged check-in.
fn selected_prayer_type(raw: Option<&str>) -> Result<Option<PrayerType>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => PrayerType::new(value).map(Some).map_err(AppError::from),
    }
}
