//! CSV import and export of the whole trivia data set.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use super::queries::categories::get_all_categories;
use super::queries::questions::{get_all_questions, NewQuestion};
use super::queries::replace_all;
use super::{Category, Question};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: &[impl Serialize]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut rdr =
        csv::Reader::from_path(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut out = Vec::new();
    for (n, record) in rdr.deserialize().enumerate() {
        let record: T =
            record.with_context(|| format!("{}: bad record #{}", path.display(), n + 1))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    write_to(&dir.join(CATEGORIES_FILE), &categories)?;
    write_to(&dir.join(QUESTIONS_FILE), &questions)?;
    tracing::info!(
        dir = %dir.display(),
        categories = categories.len(),
        questions = questions.len(),
        "Exported trivia data"
    );
    Ok(())
}

pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    for question in &questions {
        NewQuestion::from(question)
            .validate()
            .with_context(|| format!("Question {} is invalid", question.id))?;
    }
    replace_all(pool, &categories, &questions).await?;
    Ok(())
}
