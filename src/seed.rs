// src/seed.rs

use crate::{
    error::AppError,
    models::{
        lesson::{AccessTier, NewLesson},
        quiz::{AnswerDraft, QuestionDraft, QuizDraft},
    },
    store::CatalogStore,
};

/// Owner of the demo lessons. Tokens for this user id may author quizzes on them.
pub const DEMO_OWNER_ID: i64 = 1;

/// Seeds one lesson per access tier, plus a two-question quiz on the public lesson.
/// Does nothing when the store already has lessons.
pub async fn seed_demo(catalog: &dyn CatalogStore, demo_token: &str) -> Result<(), AppError> {
    if !catalog.list_lessons(None).await?.is_empty() {
        tracing::info!("Store already has lessons, skipping demo seed.");
        return Ok(());
    }

    tracing::info!("Seeding demo lessons...");
    let category_id = catalog.create_category("Getting started").await?;

    let mut public_lesson_id = None;
    for (title, tier) in [
        ("Welcome", AccessTier::Public),
        ("Members only", AccessTier::Registered),
        ("Private preview", AccessTier::Token),
    ] {
        let lesson = catalog
            .create_lesson(NewLesson {
                title: title.to_string(),
                description: format!("Demo {} lesson", tier),
                owner_id: Some(DEMO_OWNER_ID),
                category_id,
                access_tier: tier,
                token: (tier == AccessTier::Token).then(|| demo_token.to_string()),
            })
            .await?;
        if tier == AccessTier::Public {
            public_lesson_id = Some(lesson.id);
        }
    }

    if let Some(lesson_id) = public_lesson_id {
        catalog.create_quiz(lesson_id, demo_quiz()).await?;
    }

    tracing::info!("Demo data seeded.");
    Ok(())
}

fn demo_quiz() -> QuizDraft {
    let answer = |text: &str, is_correct: bool| AnswerDraft {
        text: text.to_string(),
        is_correct,
    };

    QuizDraft {
        title: Some("Warm-up".to_string()),
        questions: vec![
            QuestionDraft {
                text: "Which tier is open to anonymous visitors?".to_string(),
                answers: vec![
                    answer("public", true),
                    answer("registered", false),
                    answer("token", false),
                ],
            },
            QuestionDraft {
                text: "How many quizzes can a lesson own?".to_string(),
                answers: vec![answer("One", true), answer("Unlimited", false)],
            },
        ],
    }
}
