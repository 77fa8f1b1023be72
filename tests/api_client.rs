//! Integration tests for the HTTP boundary: status mapping, verbatim error
//! messages, request shapes, and cache behavior over a real socket.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quizdeck::api::types::{AnswerKey, AnswerOptions, Difficulty, QuestionDraft, Track};
use quizdeck::api::ApiClient;
use quizdeck::cache::FreshnessPolicy;
use quizdeck::error::ApiError;
use quizdeck::QuizClient;

fn question_json(id: &str, title: &str) -> serde_json::Value {
  json!({
    "_id": id,
    "title": title,
    "description": "pick one",
    "options": { "A": "a", "B": "b", "C": "c", "D": "d" },
    "answer": "B",
    "difficulty": "easy",
    "type": "FE",
    "createdAt": "2024-03-01T10:00:00Z",
    "updatedAt": null
  })
}

fn draft() -> QuestionDraft {
  QuestionDraft {
    title: "Lifetimes".to_string(),
    description: "pick one".to_string(),
    options: AnswerOptions {
      a: "a".to_string(),
      b: "b".to_string(),
      c: "c".to_string(),
      d: "d".to_string(),
    },
    answer: AnswerKey::B,
    difficulty: Difficulty::Easy,
    track: Track::Frontend,
  }
}

async fn client_for(server: &MockServer) -> ApiClient {
  let base = Url::parse(&server.uri()).unwrap();
  ApiClient::new(base, Some("secret-token".to_string()))
}

#[tokio::test]
async fn test_list_questions_maps_wire_to_domain() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/question"))
    .and(header("authorization", "Bearer secret-token"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(json!([
        question_json("q1", "Ownership"),
        question_json("q2", "Borrowing"),
      ])),
    )
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let questions = api.list_questions().await.unwrap();

  assert_eq!(questions.len(), 2);
  assert_eq!(questions[0].id, "q1");
  assert_eq!(questions[0].answer, AnswerKey::B);
  assert_eq!(questions[1].title, "Borrowing");
}

#[tokio::test]
async fn test_404_maps_to_not_found_with_verbatim_message() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/question/missing"))
    .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "question not found" })))
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let err = api.get_question("missing").await.unwrap_err();

  assert_eq!(
    err,
    ApiError::NotFound {
      message: "question not found".to_string()
    }
  );
}

#[tokio::test]
async fn test_400_maps_to_validation_with_field_messages() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/question"))
    .respond_with(
      ResponseTemplate::new(400)
        .set_body_json(json!({ "message": ["title is required", "answer is invalid"] })),
    )
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let err = api.create_question(&draft()).await.unwrap_err();

  match err {
    ApiError::Validation { fields, .. } => {
      assert_eq!(
        fields,
        vec!["title is required".to_string(), "answer is invalid".to_string()]
      );
    }
    other => panic!("expected Validation, got {:?}", other),
  }
}

#[tokio::test]
async fn test_5xx_maps_to_server_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/quiz"))
    .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let err = api.list_quizzes().await.unwrap_err();

  assert!(matches!(err, ApiError::Server { status: 503, .. }));
}

#[tokio::test]
async fn test_unreachable_host_maps_to_network_error() {
  // Discard port; nothing listens there
  let base = Url::parse("http://127.0.0.1:9/api").unwrap();
  let api = ApiClient::new(base, None);

  let err = api.list_questions().await.unwrap_err();

  assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn test_malformed_payload_is_rejected_at_the_boundary() {
  let server = MockServer::start().await;
  let mut body = question_json("q1", "Ownership");
  body["__v"] = json!(3);
  Mock::given(method("GET"))
    .and(path("/question"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([body])))
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let err = api.list_questions().await.unwrap_err();

  assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_create_question_posts_draft_and_parses_entity() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/question"))
    .and(body_json(json!({
      "title": "Lifetimes",
      "description": "pick one",
      "options": { "A": "a", "B": "b", "C": "c", "D": "d" },
      "answer": "B",
      "difficulty": "easy",
      "type": "FE"
    })))
    .respond_with(ResponseTemplate::new(201).set_body_json(question_json("q9", "Lifetimes")))
    .expect(1)
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let created = api.create_question(&draft()).await.unwrap();

  assert_eq!(created.id, "q9");
}

#[tokio::test]
async fn test_update_uses_put_on_the_entity_path() {
  let server = MockServer::start().await;
  Mock::given(method("PUT"))
    .and(path("/question/q1"))
    .respond_with(ResponseTemplate::new(200).set_body_json(question_json("q1", "Lifetimes")))
    .expect(1)
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let updated = api.update_question("q1", &draft()).await.unwrap();

  assert_eq!(updated.title, "Lifetimes");
}

#[tokio::test]
async fn test_delete_parses_acknowledgement() {
  let server = MockServer::start().await;
  Mock::given(method("DELETE"))
    .and(path("/question/q1"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
    .expect(1)
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  api.delete_question("q1").await.unwrap();
}

#[tokio::test]
async fn test_join_quiz_posts_code() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/quiz/join"))
    .and(body_json(json!({ "code": "F74A" })))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_json(json!({ "message": "joined successfully", "quiz": "z1" })),
    )
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let receipt = api.join_quiz("F74A").await.unwrap();

  assert_eq!(receipt.quiz_id, "z1");
  assert_eq!(receipt.message, "joined successfully");
}

#[tokio::test]
async fn test_cached_client_lists_once_within_ttl() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/question"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([question_json("q1", "One")])))
    .expect(1)
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let client = QuizClient::new(api, FreshnessPolicy::default());

  let first = client.list_questions(false).await.unwrap();
  let second = client.list_questions(false).await.unwrap();

  assert_eq!(first, second);
  // The mock's expect(1) verifies only one request reached the server
}

#[tokio::test]
async fn test_cached_client_delete_rolls_back_on_server_refusal() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/quiz"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
      "_id": "z1",
      "code": "F74A",
      "title": "Weekly quiz",
      "description": "d",
      "duration": 30,
      "questions_number": 10,
      "score_per_question": 5,
      "schadule": "2024-05-01T09:00:00Z",
      "difficulty": "medium",
      "type": "FE",
      "group": "g1",
      "status": "open",
      "participants": 2
    }])))
    .mount(&server)
    .await;
  Mock::given(method("DELETE"))
    .and(path("/quiz/z1"))
    .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "quiz already started" })))
    .mount(&server)
    .await;

  let api = client_for(&server).await;
  let client = QuizClient::new(api, FreshnessPolicy::default());

  client.list_quizzes(false).await.unwrap();
  let err = client.delete_quiz("z1").await.unwrap_err();

  assert_eq!(err.to_string(), "quiz already started");
  // The optimistic removal was rolled back
  assert_eq!(client.quizzes().store().items().len(), 1);
  assert!(client.quizzes().store().last_error().is_some());
}
