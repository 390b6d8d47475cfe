use sea_orm::DatabaseConnection;

/// Shared by every handler. The connection is a pool, cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}
