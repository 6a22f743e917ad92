mod json;
mod session;

pub use json::ApiJson;
pub use session::{
    clear_user_session, get_current_user_id, require_user, resolve_owner, set_user_session,
};

use axum::response::Html;
use chrono::{NaiveDateTime, Utc};
use tera::{Context, Tera};

use crate::features::errors::ApiError;

pub fn render_template(
    tera: &Tera,
    template_name: &str,
    context: Context,
) -> Result<Html<String>, ApiError> {
    let body = tera.render(template_name, &context).map_err(|e| {
        log::error!("Error rendering template {}: {}", template_name, e);
        e
    })?;
    Ok(Html(body))
}

/// Current UTC time without an offset, as stored in the database
pub fn utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
