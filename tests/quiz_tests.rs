// tests/quiz_tests.rs

mod common;

use common::{LESSON_TOKEN, TestApp, bearer, spawn_app};
use portal::models::lesson::AccessTier;
use serde_json::{Value, json};

const OWNER: i64 = 1;

fn two_question_quiz() -> Value {
    json!({
        "title": "Borrow checker",
        "questions": [
            {
                "text": "Can two &mut borrows overlap?",
                "answers": [
                    { "text": "Yes", "is_correct": false },
                    { "text": "No", "is_correct": true }
                ]
            },
            {
                "text": "Which trait enables cloning?",
                "answers": [
                    { "text": "Copy", "is_correct": false },
                    { "text": "Clone", "is_correct": true }
                ]
            }
        ]
    })
}

/// Posts a quiz payload as the lesson owner.
async fn create_quiz(app: &TestApp, lesson_id: i64, payload: &Value) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/api/lessons/{}/quiz/create", lesson_id)))
        .header("Authorization", bearer(OWNER, "user"))
        .json(payload)
        .send()
        .await
        .expect("Create quiz failed")
}

/// (correct, wrong) answer ids per question, in question order.
fn answer_ids(quiz: &Value) -> Vec<(i64, i64)> {
    quiz["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| {
            let answers = q["answers"].as_array().unwrap();
            let wrong = answers[0]["id"].as_i64().unwrap();
            let correct = answers[1]["id"].as_i64().unwrap();
            (correct, wrong)
        })
        .collect()
}

async fn submit(app: &TestApp, lesson_id: i64, user_id: i64, answers: Value) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/api/lessons/{}/quiz/submit", lesson_id)))
        .header("Authorization", bearer(user_id, "user"))
        .json(&json!({ "answers": answers }))
        .send()
        .await
        .expect("Submit failed")
}

async fn analytics(app: &TestApp, lesson_id: i64, auth: Option<String>) -> Value {
    let mut req = app
        .client
        .get(app.url(&format!("/api/lessons/{}/quiz/analytics", lesson_id)));
    if let Some(header) = auth {
        req = req.header("Authorization", header);
    }
    req.send().await.unwrap().json().await.unwrap()
}

#[tokio::test]
async fn quiz_flow_grades_and_aggregates() {
    // Arrange
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;

    let created = create_quiz(&app, lesson.id, &two_question_quiz()).await;
    assert_eq!(created.status().as_u16(), 201);
    let quiz: Value = created.json().await.unwrap();
    assert!(quiz["questions"][0]["answers"][0].get("is_correct").is_none());
    let ids = answer_ids(&quiz);

    // Act: first question right, second answered with an id from another question
    let half = submit(&app, lesson.id, 2, json!([ids[0].0, ids[0].0])).await;
    assert_eq!(half.status().as_u16(), 201);
    let half: Value = half.json().await.unwrap();
    assert_eq!(half["score"], 50.0);

    let full = submit(&app, lesson.id, 2, json!([ids[0].0, ids[1].0])).await;
    let full: Value = full.json().await.unwrap();
    assert_eq!(full["score"], 100.0);

    let zero = submit(&app, lesson.id, 3, json!([ids[0].1, 424242])).await;
    let zero: Value = zero.json().await.unwrap();
    assert_eq!(zero["score"], 0.0);

    // Assert
    let summary = analytics(&app, lesson.id, Some(bearer(2, "user"))).await;
    assert_eq!(summary["attempts_count"], 3);
    assert_eq!(summary["average_score"], 50.0);
    assert_eq!(summary["user_last_attempt"]["score"], 100.0);
    assert_eq!(summary["user_last_attempt"]["user_id"], 2);

    let anonymous = analytics(&app, lesson.id, None).await;
    assert_eq!(anonymous["attempts_count"], 3);
    assert!(anonymous["user_last_attempt"].is_null());
}

#[tokio::test]
async fn analytics_without_attempts() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;
    create_quiz(&app, lesson.id, &two_question_quiz()).await;

    let summary = analytics(&app, lesson.id, Some(bearer(2, "user"))).await;

    assert_eq!(summary["average_score"], 0.0);
    assert_eq!(summary["attempts_count"], 0);
    assert!(summary["user_last_attempt"].is_null());
}

#[tokio::test]
async fn answer_count_mismatch_is_400_and_not_recorded() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;
    let quiz: Value = create_quiz(&app, lesson.id, &two_question_quiz())
        .await
        .json()
        .await
        .unwrap();
    let ids = answer_ids(&quiz);

    let short = submit(&app, lesson.id, 2, json!([ids[0].0])).await;
    assert_eq!(short.status().as_u16(), 400);

    let empty = submit(&app, lesson.id, 2, json!([])).await;
    assert_eq!(empty.status().as_u16(), 400);

    let mistyped = submit(&app, lesson.id, 2, json!(["a", "b"])).await;
    assert_eq!(mistyped.status().as_u16(), 400);

    let summary = analytics(&app, lesson.id, None).await;
    assert_eq!(summary["attempts_count"], 0);
}

#[tokio::test]
async fn submission_requires_authentication() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;
    create_quiz(&app, lesson.id, &two_question_quiz()).await;

    let response = app
        .client
        .post(app.url(&format!("/api/lessons/{}/quiz/submit", lesson.id)))
        .json(&json!({ "answers": [1, 2] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn second_quiz_is_a_conflict() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;

    let first = create_quiz(&app, lesson.id, &two_question_quiz()).await;
    assert_eq!(first.status().as_u16(), 201);

    let second = create_quiz(
        &app,
        lesson.id,
        &json!({ "questions": [{ "text": "Replacement?", "answers": [] }] }),
    )
    .await;
    assert_eq!(second.status().as_u16(), 409);

    // The first quiz is untouched.
    let quiz: Value = app
        .client
        .get(app.url(&format!("/api/lessons/{}/quiz", lesson.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(quiz["questions"].as_array().unwrap().len(), 2);
    assert_eq!(quiz["title"], "Borrow checker");
}

#[tokio::test]
async fn malformed_authoring_payload_is_400() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;

    let missing_is_correct = json!({
        "questions": [{ "text": "Q", "answers": [{ "text": "A" }] }]
    });
    let missing_answers = json!({ "questions": [{ "text": "Q" }] });
    let missing_text = json!({ "questions": [{ "answers": [] }] });

    for payload in [missing_is_correct, missing_answers, missing_text] {
        let response = create_quiz(&app, lesson.id, &payload).await;
        assert_eq!(response.status().as_u16(), 400, "payload: {}", payload);
    }

    // Nothing was created.
    let quiz = app
        .client
        .get(app.url(&format!("/api/lessons/{}/quiz", lesson.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(quiz.status().as_u16(), 404);
}

#[tokio::test]
async fn only_the_owner_can_author() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;

    let response = app
        .client
        .post(app.url(&format!("/api/lessons/{}/quiz/create", lesson.id)))
        .header("Authorization", bearer(OWNER + 1, "user"))
        .json(&two_question_quiz())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn token_lesson_quiz_is_gated() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Token, OWNER).await;
    let quiz: Value = create_quiz(&app, lesson.id, &two_question_quiz())
        .await
        .json()
        .await
        .unwrap();
    let ids = answer_ids(&quiz);

    let without_token = app
        .client
        .get(app.url(&format!("/api/lessons/{}/quiz", lesson.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(without_token.status().as_u16(), 403);

    let denied = submit(&app, lesson.id, 2, json!([ids[0].0, ids[1].0])).await;
    assert_eq!(denied.status().as_u16(), 403);

    let allowed = app
        .client
        .post(app.url(&format!(
            "/api/lessons/{}/quiz/submit?token={}",
            lesson.id, LESSON_TOKEN
        )))
        .header("Authorization", bearer(2, "user"))
        .json(&json!({ "answers": [ids[0].0, ids[1].0] }))
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status().as_u16(), 201);
}

#[tokio::test]
async fn quiz_for_lesson_without_quiz_is_404() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;

    let response = app
        .client
        .get(app.url(&format!("/api/lessons/{}/quiz/analytics", lesson.id)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn authored_text_is_limited_after_sanitizing() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;

    // 100 `<` escape to 400 characters, past the 300 allowed for question text.
    let escaped = json!({
        "questions": [{ "text": "<".repeat(100), "answers": [{ "text": "ok", "is_correct": true }] }]
    });
    let stripped = json!({
        "questions": [{ "text": "Q", "answers": [{ "text": "<script>x</script>", "is_correct": true }] }]
    });

    for payload in [escaped, stripped] {
        let response = create_quiz(&app, lesson.id, &payload).await;
        assert_eq!(response.status().as_u16(), 400, "payload: {}", payload);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn plain_authored_text_is_stored_verbatim() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;

    let quiz: Value = create_quiz(&app, lesson.id, &two_question_quiz())
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(quiz["questions"][0]["text"], "Can two &mut borrows overlap?");
}

#[tokio::test]
async fn unparsable_body_is_400_with_error_field() {
    let app = spawn_app().await;
    let lesson = app.lesson(AccessTier::Public, OWNER).await;
    create_quiz(&app, lesson.id, &two_question_quiz()).await;

    for path in ["quiz/submit", "quiz/create"] {
        let response = app
            .client
            .post(app.url(&format!("/api/lessons/{}/{}", lesson.id, path)))
            .header("Authorization", bearer(OWNER, "user"))
            .body("answers=1,2")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400, "path: {}", path);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string(), "path: {}", path);
    }

    let summary = analytics(&app, lesson.id, None).await;
    assert_eq!(summary["attempts_count"], 0);
}
