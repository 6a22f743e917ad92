mod login;
mod register;

use axum::Router;
use axum::routing::{get, post};

use crate::app::AppState;

pub use login::{current_user, handle_login, handle_logout};
pub use register::handle_register;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/me", get(current_user))
}
