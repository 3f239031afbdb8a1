use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::{AppState, Pagination},
        error::AppError,
        extract::{AppJson, AppPath, AppQuery},
    },
};

use super::{category_map, success, ApiResponse};

#[derive(Deserialize)]
struct PageQuery {
    page: Option<i64>,
}

#[derive(Deserialize)]
struct CreateQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct Created {
    created: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct SearchResults {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<String>,
}

fn page_number(page: Option<i64>) -> Result<i64, AppError> {
    match page {
        None => Ok(1),
        Some(n) if n >= 1 => Ok(n),
        Some(n) => Err(AppError::BadRequest(format!(
            "page must be a positive integer, got {n}"
        ))),
    }
}

async fn fetch_page(
    pool: &SqlitePool,
    pagination: Pagination,
    page: i64,
) -> sqlx::Result<Vec<Question>> {
    let (limit, offset) = pagination.limit_offset(page);
    questions::get_questions_page(pool, limit, offset).await
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    State(pagination): State<Pagination>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let page = page_number(query.page)?;
    let current = fetch_page(&pool, pagination, page).await?;
    if current.is_empty() {
        return Err(AppError::NotFound(format!("page {page} has no questions")));
    }

    success(QuestionsPage {
        questions: current,
        total_questions: questions::count_questions(&pool).await?,
        categories: category_map(categories::get_all_categories(&pool).await?),
        current_category: None,
    })
}

async fn create_question(
    State(pool): State<SqlitePool>,
    State(pagination): State<Pagination>,
    AppJson(body): AppJson<CreateQuestion>,
) -> ApiResponse<Created> {
    let new_question = NewQuestion {
        question: body.question,
        answer: body.answer,
        category: body.category,
        difficulty: body.difficulty,
    };
    new_question.validate()?;
    if categories::find_category(&pool, new_question.category)
        .await?
        .is_none()
    {
        return Err(AppError::Unprocessable(format!(
            "category {} does not exist",
            new_question.category
        )));
    }

    let id = questions::create_question(&pool, &new_question).await?;
    tracing::info!(
        question_id = id,
        category = new_question.category,
        difficulty = new_question.difficulty,
        "Question created"
    );

    success(Created {
        created: id,
        questions: fetch_page(&pool, pagination, 1).await?,
        total_questions: questions::count_questions(&pool).await?,
    })
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    State(pagination): State<Pagination>,
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResponse<Deleted> {
    let page = page_number(query.page)?;
    if !questions::delete_question(&pool, id).await? {
        return Err(AppError::NotFound(format!("question {id} not found")));
    }
    tracing::info!(question_id = id, "Question deleted");

    success(Deleted {
        deleted: id,
        questions: fetch_page(&pool, pagination, page).await?,
        total_questions: questions::count_questions(&pool).await?,
    })
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    AppJson(body): AppJson<SearchRequest>,
) -> ApiResponse<SearchResults> {
    let found = questions::search_questions(&pool, &body.search_term).await?;
    tracing::debug!(term = %body.search_term, count = found.len(), "Searched questions");

    success(SearchResults {
        total_questions: found.len(),
        questions: found,
        current_category: None,
    })
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
}
