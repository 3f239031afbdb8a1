//! Next-question selection for quiz play.
//!
//! A quiz session lives entirely on the client: every turn sends the ids
//! already shown and the chosen category. The server keeps nothing between
//! turns, so selection is a pure function of the stored questions, the
//! turn's filter and a random generator.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::db::queries::questions::list_questions;
use crate::db::Question;

/// Which categories a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Any,
    Only(i64),
}

impl CategoryFilter {
    /// `0` is the "all categories" entry clients send.
    pub fn from_id(id: Option<i64>) -> Self {
        match id {
            None | Some(0) => CategoryFilter::Any,
            Some(id) => CategoryFilter::Only(id),
        }
    }

    pub fn category_id(self) -> Option<i64> {
        match self {
            CategoryFilter::Any => None,
            CategoryFilter::Only(id) => Some(id),
        }
    }

    pub fn matches(self, question: &Question) -> bool {
        match self {
            CategoryFilter::Any => true,
            CategoryFilter::Only(id) => question.category == id,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::Any => f.write_str("all"),
            CategoryFilter::Only(id) => write!(f, "{id}"),
        }
    }
}

/// One quiz turn as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizTurn {
    pub category: CategoryFilter,
    pub previous_questions: HashSet<i64>,
}

impl QuizTurn {
    pub fn new(
        category: CategoryFilter,
        previous_questions: impl IntoIterator<Item = i64>,
    ) -> Self {
        QuizTurn {
            category,
            previous_questions: previous_questions.into_iter().collect(),
        }
    }

    pub fn is_candidate(&self, question: &Question) -> bool {
        self.category.matches(question) && !self.previous_questions.contains(&question.id)
    }
}

/// Questions eligible for this turn.
pub fn candidates<'a>(questions: &'a [Question], turn: &QuizTurn) -> Vec<&'a Question> {
    questions.iter().filter(|q| turn.is_candidate(q)).collect()
}

/// Pick one candidate uniformly at random, or `None` once the category is exhausted.
pub fn select_next_question<R>(
    questions: &[Question],
    turn: &QuizTurn,
    rng: &mut R,
) -> Option<Question>
where
    R: Rng + ?Sized,
{
    candidates(questions, turn).choose(rng).map(|q| (*q).clone())
}

/// Shared random source for quiz play.
///
/// Seeded generators make selection reproducible; unseeded ones draw from OS
/// entropy.
#[derive(Clone)]
pub struct QuizRng(Arc<Mutex<StdRng>>);

impl QuizRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        QuizRng(Arc::new(Mutex::new(rng)))
    }

    pub async fn pick(&self, questions: &[Question], turn: &QuizTurn) -> Option<Question> {
        let mut rng = self.0.lock().await;
        select_next_question(questions, turn, &mut *rng)
    }
}

/// Load the turn's category from the store and pick the next question.
pub async fn next_question(
    pool: &SqlitePool,
    turn: &QuizTurn,
    rng: &QuizRng,
) -> sqlx::Result<Option<Question>> {
    let questions = list_questions(pool, turn.category.category_id()).await?;
    let question = rng.pick(&questions, turn).await;
    tracing::debug!(
        category = %turn.category,
        previous = turn.previous_questions.len(),
        stored = questions.len(),
        picked = ?question.as_ref().map(|q| q.id),
        "Selected next quiz question"
    );
    Ok(question)
}
