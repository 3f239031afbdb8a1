pub mod categories;
pub mod questions;

use sqlx::SqlitePool;

use categories::Category;
use questions::Question;

/// Replace every category and question with the given rows, keeping their ids.
///
/// Runs in one transaction: either the whole data set is swapped in or the
/// store is left untouched.
pub async fn replace_all(
    pool: &SqlitePool,
    categories: &[Category],
    questions: &[Question],
) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM questions").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM categories").execute(&mut *tx).await?;

    for category in categories {
        sqlx::query(
            r#"
INSERT INTO categories (id, type) VALUES (?1, ?2)
            "#,
        )
        .bind(category.id)
        .bind(&category.kind)
        .execute(&mut *tx)
        .await?;
    }

    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Replaced trivia data"
    );
    Ok(())
}
