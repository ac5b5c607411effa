mod attendance;
pub mod auth;
mod employees;
pub mod error;
mod leaves;
mod validation;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/validate", get(auth::validate));

    // Protected API routes
    let api_routes = Router::new()
        // Employee directory
        .route("/employees", get(employees::list_employees))
        .route("/employees", post(employees::add_employee))
        .route("/employees/search", get(employees::search_employees))
        .route("/employees/:id", get(employees::get_employee))
        .route("/employees/:id", put(employees::update_employee))
        .route("/employees/:id", delete(employees::delete_employee))
        // Leave applications
        .route("/leaves", get(leaves::list_leaves))
        .route("/leaves", post(leaves::submit_leave))
        .route("/leaves/:id", put(leaves::update_leave_status))
        // Attendance
        .route("/attendance", post(attendance::record_attendance))
        .route("/attendance/:employee_id", get(attendance::attendance_report))
        // Protected by auth
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
