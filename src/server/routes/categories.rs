use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::categories::{find_category, get_all_categories},
        queries::questions::list_questions,
        Question,
    },
    server::{app::AppState, error::AppError, extract::AppPath},
};

use super::{category_map, success, ApiResponse};

#[derive(Serialize)]
struct CategoriesBody {
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: String,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesBody> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(AppError::NotFound("no categories found".into()));
    }
    success(CategoriesBody {
        total_categories: categories.len(),
        categories: category_map(categories),
    })
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<CategoryQuestionsBody> {
    let category = find_category(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id} not found")))?;
    let questions = list_questions(&pool, Some(category.id)).await?;

    tracing::debug!(category_id = id, count = questions.len(), "Listed category questions");
    success(CategoryQuestionsBody {
        total_questions: questions.len(),
        questions,
        current_category: category.kind,
    })
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
}
