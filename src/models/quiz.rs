// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{error::AppError, utils::html::clean_html};

/// A quiz with its full question/answer key, loaded in one read.
///
/// Questions keep their stored order (insertion order). Grading matches
/// submissions against this order, so it must not be re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSnapshot {
    pub id: i64,
    pub lesson_id: i64,
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// One row of the quiz/question/answer LEFT JOIN, ordered by question then answer id.
#[derive(Debug, FromRow)]
pub struct QuizKeyRow {
    pub quiz_id: i64,
    pub lesson_id: i64,
    pub title: Option<String>,
    pub question_id: Option<i64>,
    pub question_text: Option<String>,
    pub answer_id: Option<i64>,
    pub answer_text: Option<String>,
    pub is_correct: Option<bool>,
}

impl QuizSnapshot {
    /// Folds the flat join rows into a snapshot. Returns `None` for an empty row set.
    pub fn from_rows(rows: Vec<QuizKeyRow>) -> Option<Self> {
        let first = rows.first()?;
        let mut snapshot = QuizSnapshot {
            id: first.quiz_id,
            lesson_id: first.lesson_id,
            title: first.title.clone(),
            questions: Vec::new(),
        };

        for row in rows {
            let (Some(question_id), Some(question_text)) = (row.question_id, row.question_text)
            else {
                continue;
            };

            let needs_new = snapshot
                .questions
                .last()
                .is_none_or(|q| q.id != question_id);
            if needs_new {
                snapshot.questions.push(Question {
                    id: question_id,
                    text: question_text,
                    answers: Vec::new(),
                });
            }

            if let (Some(answer_id), Some(answer_text), Some(question)) =
                (row.answer_id, row.answer_text, snapshot.questions.last_mut())
            {
                question.answers.push(Answer {
                    id: answer_id,
                    text: answer_text,
                    is_correct: row.is_correct.unwrap_or(false),
                });
            }
        }

        Some(snapshot)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Strips correctness flags for delivery to quiz takers.
    pub fn to_public(&self) -> PublicQuiz {
        PublicQuiz {
            id: self.id,
            lesson_id: self.lesson_id,
            title: self.title.clone(),
            questions: self
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    id: q.id,
                    text: q.text.clone(),
                    answers: q
                        .answers
                        .iter()
                        .map(|a| PublicAnswer {
                            id: a.id,
                            text: a.text.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// DTO for sending a quiz to the client (excludes `is_correct`).
#[derive(Debug, Serialize)]
pub struct PublicQuiz {
    pub id: i64,
    pub lesson_id: i64,
    pub title: Option<String>,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    pub answers: Vec<PublicAnswer>,
}

#[derive(Debug, Serialize)]
pub struct PublicAnswer {
    pub id: i64,
    pub text: String,
}

/// DTO for authoring a quiz. Every field except `title` is mandatory.
///
/// Text limits are checked on the sanitized `QuizDraft`, since that is what gets stored.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateQuizRequest {
    pub title: Option<String>,

    #[validate(length(min = 1, message = "A quiz needs at least one question"))]
    pub questions: Vec<CreateQuestionRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    pub text: String,
    pub answers: Vec<CreateAnswerRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAnswerRequest {
    pub text: String,
    pub is_correct: bool,
}

/// Sanitized authoring input handed to the store.
/// Lengths match the column sizes and count characters.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct QuizDraft {
    #[validate(length(max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "A quiz needs at least one question"), nested)]
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct QuestionDraft {
    #[validate(length(min = 1, max = 300))]
    pub text: String,

    #[validate(nested)]
    pub answers: Vec<AnswerDraft>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct AnswerDraft {
    #[validate(length(min = 1, max = 200))]
    pub text: String,
    pub is_correct: bool,
}

impl QuizDraft {
    /// Sanitizes the request, then validates what will actually be stored.
    /// Markup that cleans down to nothing fails the non-empty rules.
    pub fn from_request(req: CreateQuizRequest) -> Result<Self, AppError> {
        let draft = QuizDraft {
            title: req.title.map(|t| clean_html(&t)),
            questions: req
                .questions
                .into_iter()
                .map(|q| QuestionDraft {
                    text: clean_html(&q.text),
                    answers: q
                        .answers
                        .into_iter()
                        .map(|a| AnswerDraft {
                            text: clean_html(&a.text),
                            is_correct: a.is_correct,
                        })
                        .collect(),
                })
                .collect(),
        };
        draft.validate()?;
        Ok(draft)
    }
}
