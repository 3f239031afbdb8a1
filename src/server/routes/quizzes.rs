use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::categories, Question},
    quiz::{self, CategoryFilter, QuizRng, QuizTurn},
    server::{
        app::AppState,
        deserializers::{ids, Id},
        extract::AppJson,
    },
    telemetry::{QUESTIONS_SERVED, QUIZZES_EXHAUSTED},
};

use super::{success, ApiResponse};

#[derive(Deserialize)]
struct QuizRequest {
    previous_questions: Vec<Id>,
    quiz_category: QuizCategory,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(default)]
    id: Option<Id>,
}

/// Metric label for category ids that have no stored category.
const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Serialize)]
struct NextQuestion {
    question: Option<Question>,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    State(rng): State<QuizRng>,
    AppJson(body): AppJson<QuizRequest>,
) -> ApiResponse<NextQuestion> {
    let category = CategoryFilter::from_id(body.quiz_category.id.map(|id| id.0));
    let turn = QuizTurn::new(category, ids(body.previous_questions));

    let question = quiz::next_question(&pool, &turn, &rng).await?;
    match &question {
        Some(q) => {
            QUESTIONS_SERVED
                .with_label_values(&[category.to_string().as_str()])
                .inc();
            tracing::info!(category = %category, question_id = q.id, "Served quiz question");
        }
        None => {
            let label = exhausted_label(&pool, category).await?;
            QUIZZES_EXHAUSTED.with_label_values(&[label.as_str()]).inc();
            tracing::info!(category = %category, "No quiz questions left");
        }
    }

    success(NextQuestion { question })
}

// Client-supplied ids only become labels once they name a stored category.
async fn exhausted_label(pool: &SqlitePool, category: CategoryFilter) -> sqlx::Result<String> {
    if let CategoryFilter::Only(id) = category {
        if categories::find_category(pool, id).await?.is_none() {
            return Ok(UNKNOWN_CATEGORY.to_string());
        }
    }
    Ok(category.to_string())
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(play_quiz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory;

    #[tokio::test]
    async fn exhausted_label_hides_unknown_ids() {
        let pool = in_memory().await.unwrap();

        assert_eq!(
            exhausted_label(&pool, CategoryFilter::Only(3)).await.unwrap(),
            "3"
        );
        assert_eq!(
            exhausted_label(&pool, CategoryFilter::Only(4242)).await.unwrap(),
            UNKNOWN_CATEGORY
        );
        assert_eq!(
            exhausted_label(&pool, CategoryFilter::Any).await.unwrap(),
            "all"
        );
    }
}
