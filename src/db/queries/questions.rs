use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// A question that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub const MIN_DIFFICULTY: i64 = 1;
pub const MAX_DIFFICULTY: i64 = 5;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuestion {
    #[error("question text must not be empty")]
    EmptyQuestion,
    #[error("answer must not be empty")]
    EmptyAnswer,
    #[error("difficulty must be between 1 and 5, got {0}")]
    Difficulty(i64),
}

impl NewQuestion {
    pub fn validate(&self) -> Result<(), InvalidQuestion> {
        if self.question.trim().is_empty() {
            return Err(InvalidQuestion::EmptyQuestion);
        }
        if self.answer.trim().is_empty() {
            return Err(InvalidQuestion::EmptyAnswer);
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(InvalidQuestion::Difficulty(self.difficulty));
        }
        Ok(())
    }
}

impl From<&Question> for NewQuestion {
    fn from(q: &Question) -> Self {
        NewQuestion {
            question: q.question.clone(),
            answer: q.answer.clone(),
            category: q.category,
            difficulty: q.difficulty,
        }
    }
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    list_questions(pool, None).await
}

/// Every question, optionally restricted to one category, ordered by id.
pub async fn list_questions(
    pool: &SqlitePool,
    category: Option<i64>,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE ?1 IS NULL OR questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn get_questions_page(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        ORDER BY id LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `false` when no question had that id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let affected = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(affected > 0)
}

/// Case-insensitive substring search over the question text.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let pattern = format!("%{}%", escape_like(term));
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.question LIKE ?1 ESCAPE '\'
        ORDER BY id
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
}

// LIKE wildcards in user input match literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory;

    fn new_question(difficulty: i64) -> NewQuestion {
        NewQuestion {
            question: "What is the capital of Peru?".into(),
            answer: "Lima".into(),
            category: 3,
            difficulty,
        }
    }

    #[test]
    fn validation_rejects_bad_questions() {
        assert_eq!(new_question(3).validate(), Ok(()));
        assert_eq!(
            new_question(0).validate(),
            Err(InvalidQuestion::Difficulty(0))
        );
        assert_eq!(
            new_question(6).validate(),
            Err(InvalidQuestion::Difficulty(6))
        );

        let blank = NewQuestion {
            question: "   ".into(),
            ..new_question(1)
        };
        assert_eq!(blank.validate(), Err(InvalidQuestion::EmptyQuestion));

        let no_answer = NewQuestion {
            answer: String::new(),
            ..new_question(1)
        };
        assert_eq!(no_answer.validate(), Err(InvalidQuestion::EmptyAnswer));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("actor"), "actor");
    }

    #[tokio::test]
    async fn list_questions_filters_by_category() {
        let pool = in_memory().await.unwrap();

        let geography = list_questions(&pool, Some(3)).await.unwrap();
        assert_eq!(
            geography.iter().map(|q| q.id).collect::<Vec<_>>(),
            [13, 14, 15]
        );

        let all = list_questions(&pool, None).await.unwrap();
        assert_eq!(all.len() as i64, count_questions(&pool).await.unwrap());
        assert!(list_questions(&pool, Some(42)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pages_are_ordered_by_id() {
        let pool = in_memory().await.unwrap();

        let first = get_questions_page(&pool, 10, 0).await.unwrap();
        let second = get_questions_page(&pool, 10, 10).await.unwrap();

        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 9);
        assert!(first.last().unwrap().id < second.first().unwrap().id);
        assert!(get_questions_page(&pool, 10, 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_and_delete_question() {
        let pool = in_memory().await.unwrap();
        let before = count_questions(&pool).await.unwrap();

        let id = create_question(&pool, &new_question(2)).await.unwrap();
        let stored = get_question_by_id(&pool, id).await.unwrap();
        assert_eq!(NewQuestion::from(&stored), new_question(2));
        assert_eq!(count_questions(&pool).await.unwrap(), before + 1);

        assert!(delete_question(&pool, id).await.unwrap());
        assert!(!delete_question(&pool, id).await.unwrap());
        assert_eq!(count_questions(&pool).await.unwrap(), before);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let pool = in_memory().await.unwrap();

        let first = create_question(&pool, &new_question(1)).await.unwrap();
        delete_question(&pool, first).await.unwrap();
        let second = create_question(&pool, &new_question(1)).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let pool = in_memory().await.unwrap();

        let hits = search_questions(&pool, "ACTOR").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 4);

        let world_cup = search_questions(&pool, "world cup").await.unwrap();
        assert_eq!(world_cup.iter().map(|q| q.id).collect::<Vec<_>>(), [10, 11]);

        assert!(search_questions(&pool, "%").await.unwrap().is_empty());
    }
}
