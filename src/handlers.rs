use crate::auth;
use crate::errors::AppError;
use crate::goals::{add_goal, remove_goal};
use crate::ledger::{Toggle, start_message};
use crate::models::{
    ActionResponse, AuthResponse, CreateEventRequest, CreateGoalRequest, CreateProjectRequest,
    CreateTodoRequest, DashboardResponse, DateQuery, Event, Goal, LoginRequest, ProgressResponse,
    SignupRequest, StatsResponse, ThemePayload, TimerResponse, Todo, WeekResponse,
};
use crate::state::{AppState, Inner};
use crate::stats::build_stats;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use chrono::NaiveDateTime;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let inner = state.lock().await?;
    let dashboard = inner.tracker.dashboard(state.now());
    Ok(Html(render_index(&dashboard, inner.tracker.theme)))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let inner = state.lock().await?;
    Ok(Json(inner.tracker.dashboard(state.now())))
}

pub async fn get_timer(State(state): State<AppState>) -> Result<Json<TimerResponse>, AppError> {
    let inner = state.lock().await?;
    Ok(Json(TimerResponse {
        active_project_id: inner.tracker.ledger.active_id().map(str::to_string),
        elapsed: state.clock.current(),
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let inner = state.lock().await?;
    Ok(Json(build_stats(&inner.tracker.ledger)))
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    inner
        .tracker
        .ledger
        .create(&payload.name, payload.color.as_deref(), now)?;
    respond(&mut inner, now, "Project created".to_string()).await
}

pub async fn start_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let previous = inner.tracker.ledger.start(&id, now)?;
    inner.tracker.streak.on_timer_start(now.date());
    sync_clock(&state, &inner);
    respond(&mut inner, now, start_message(previous.as_ref())).await
}

pub async fn stop_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let summary = inner.tracker.ledger.stop(&id, now)?;
    sync_clock(&state, &inner);
    respond(&mut inner, now, summary.message()).await
}

pub async fn toggle_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let message = match inner.tracker.ledger.toggle(&id, now)? {
        Toggle::Started { previous } => {
            inner.tracker.streak.on_timer_start(now.date());
            start_message(previous.as_ref())
        }
        Toggle::Stopped(summary) => summary.message(),
    };
    sync_clock(&state, &inner);
    respond(&mut inner, now, message).await
}

pub async fn complete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let (project, stopped) = inner.tracker.ledger.complete(&id, now)?;
    sync_clock(&state, &inner);
    let message = match stopped {
        Some(summary) => format!("{} {} marked as completed", summary.message(), project.name),
        None => format!("{} marked as completed", project.name),
    };
    respond(&mut inner, now, message).await
}

pub async fn request_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    inner.tracker.ledger.request_delete(&id)?;
    let message = "This will permanently remove the project and its tracked time.".to_string();
    respond(&mut inner, now, message).await
}

pub async fn confirm_delete(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let project = inner.tracker.ledger.confirm_delete()?;
    sync_clock(&state, &inner);
    respond(&mut inner, now, format!("{} deleted", project.name)).await
}

pub async fn cancel_delete(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    inner.tracker.ledger.cancel_delete();
    respond(&mut inner, now, "Deletion cancelled".to_string()).await
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let inner = state.lock().await?;
    Ok(Json(inner.tracker.calendar.events().to_vec()))
}

pub async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<WeekResponse>, AppError> {
    let inner = state.lock().await?;
    let today = state.now().date();
    let selected = query.date.unwrap_or(today);
    Ok(Json(inner.tracker.calendar.week(selected, today)))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<Event>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let event = inner
        .tracker
        .calendar
        .add_event(
            &payload.title,
            payload.project.as_deref(),
            payload.time.as_deref(),
            payload.date.unwrap_or(now.date()),
            now,
        )?
        .clone();
    save(&mut inner, now).await?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let event = inner.tracker.calendar.remove_event(&id)?;
    save(&mut inner, now).await?;
    Ok(Json(event))
}

pub async fn list_goals(State(state): State<AppState>) -> Result<Json<Vec<Goal>>, AppError> {
    let inner = state.lock().await?;
    Ok(Json(inner.tracker.goals.clone()))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let goal = add_goal(
        &mut inner.tracker.goals,
        &payload.name,
        payload.target,
        payload.color.as_deref(),
        payload.kind,
        payload.unit.as_deref(),
        now,
    )?;
    save(&mut inner, now).await?;
    Ok(Json(goal))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Goal>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let goal = remove_goal(&mut inner.tracker.goals, &id)?;
    save(&mut inner, now).await?;
    Ok(Json(goal))
}

pub async fn get_progress(
    State(state): State<AppState>,
) -> Result<Json<ProgressResponse>, AppError> {
    let inner = state.lock().await?;
    Ok(Json(inner.tracker.progress_report()))
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let inner = state.lock().await?;
    Ok(Json(inner.tracker.todos.items().to_vec()))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let todo = inner.tracker.todos.add(&payload.text, now)?.clone();
    save(&mut inner, now).await?;
    Ok(Json(todo))
}

pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let todo = inner.tracker.todos.toggle(&id)?.clone();
    save(&mut inner, now).await?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    let todo = inner.tracker.todos.remove(&id)?;
    save(&mut inner, now).await?;
    Ok(Json(todo))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let mut inner = state.lock().await?;
    inner.tracker.user = Some(auth::login(&payload.email, &payload.password)?);
    save(&mut inner, state.now()).await?;
    Ok(Json(inner.tracker.auth()))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let mut inner = state.lock().await?;
    let now = state.now();
    inner.tracker.user = Some(auth::signup(
        &payload.name,
        &payload.email,
        &payload.password,
        now,
    )?);
    save(&mut inner, now).await?;
    Ok(Json(inner.tracker.auth()))
}

pub async fn logout(State(state): State<AppState>) -> Result<Json<AuthResponse>, AppError> {
    let mut inner = state.lock().await?;
    inner.tracker.user = None;
    save(&mut inner, state.now()).await?;
    Ok(Json(inner.tracker.auth()))
}

pub async fn get_me(State(state): State<AppState>) -> Result<Json<AuthResponse>, AppError> {
    let inner = state.lock().await?;
    Ok(Json(inner.tracker.auth()))
}

pub async fn get_theme(State(state): State<AppState>) -> Result<Json<ThemePayload>, AppError> {
    let inner = state.lock().await?;
    Ok(Json(ThemePayload {
        theme: inner.tracker.theme,
    }))
}

pub async fn set_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemePayload>,
) -> Result<Json<ThemePayload>, AppError> {
    let mut inner = state.lock().await?;
    inner.tracker.theme = payload.theme;
    save(&mut inner, state.now()).await?;
    Ok(Json(payload))
}

fn sync_clock(state: &AppState, inner: &Inner) {
    state.clock.restart(inner.tracker.ledger.running());
}

async fn save(inner: &mut Inner, now: NaiveDateTime) -> Result<(), AppError> {
    inner.tracker.refresh_progress(now);
    inner.persist().await
}

async fn respond(
    inner: &mut Inner,
    now: NaiveDateTime,
    message: String,
) -> Result<Json<ActionResponse>, AppError> {
    save(inner, now).await?;
    Ok(Json(ActionResponse {
        message,
        dashboard: inner.tracker.dashboard(now),
    }))
}
