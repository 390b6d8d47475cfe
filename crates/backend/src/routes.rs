use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, state::AppState};

/// Every route of the application
pub fn configure_routes(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::a001_employee::root))
        .route("/health", get(|| async { "ok" }))
        // A001 Employee handlers
        .route(
            "/employees/",
            get(handlers::a001_employee::list_all).post(handlers::a001_employee::create),
        )
        .route(
            "/employees/:id",
            get(handlers::a001_employee::get_by_id)
                .put(handlers::a001_employee::update)
                .delete(handlers::a001_employee::delete),
        )
        .route(
            "/employees/bulk_delete/",
            delete(handlers::a001_employee::bulk_delete),
        )
        .route(
            "/employees/bulk_add/",
            post(handlers::a001_employee::bulk_add),
        )
        // U501 Import employees from a spreadsheet
        .route(
            "/employees/upload/",
            post(handlers::a001_employee::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/employees/export/", get(handlers::a001_employee::export))
        .with_state(state)
}
