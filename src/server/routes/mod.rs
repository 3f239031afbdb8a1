mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use std::collections::BTreeMap;

use axum::Json;
use serde::Serialize;

use crate::db::Category;

use super::error::AppError;

/// `{"success": true, ...body}`
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

pub type ApiResponse<T> = Result<Json<Envelope<T>>, AppError>;

pub fn success<T: Serialize>(body: T) -> ApiResponse<T> {
    Ok(Json(Envelope {
        success: true,
        body,
    }))
}

/// Categories keyed by id, the shape the web client renders its menus from.
pub fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}
