use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/timer", get(handlers::get_timer))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/projects", post(handlers::create_project))
        .route("/api/projects/delete/confirm", post(handlers::confirm_delete))
        .route("/api/projects/delete/cancel", post(handlers::cancel_delete))
        .route("/api/projects/:id/start", post(handlers::start_project))
        .route("/api/projects/:id/stop", post(handlers::stop_project))
        .route("/api/projects/:id/toggle", post(handlers::toggle_project))
        .route("/api/projects/:id/complete", post(handlers::complete_project))
        .route("/api/projects/:id/delete", post(handlers::request_delete))
        .route(
            "/api/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route("/api/events/week", get(handlers::get_week))
        .route("/api/events/:id", delete(handlers::delete_event))
        .route(
            "/api/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route("/api/goals/:id", delete(handlers::delete_goal))
        .route("/api/progress", get(handlers::get_progress))
        .route(
            "/api/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route("/api/todos/:id/toggle", post(handlers::toggle_todo))
        .route("/api/todos/:id", delete(handlers::delete_todo))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/me", get(handlers::get_me))
        .route(
            "/api/theme",
            get(handlers::get_theme).post(handlers::set_theme),
        )
        .with_state(state)
}
