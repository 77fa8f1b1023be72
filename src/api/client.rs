//! HTTP client for the quiz backend.
//!
//! A pure transport adapter: one method per endpoint, no caching and no
//! retries. Every response is validated against the wire types before a
//! domain value is handed out, and every failure is mapped into [`ApiError`].

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

use super::types::{
  Group, GroupDraft, JoinReceipt, Question, QuestionDraft, Quiz, QuizDraft, QuizResult, Student,
  SubmitReceipt, SubmittedAnswer,
};
use super::wire::{
  ApiAck, ApiGroup, ApiJoinResponse, ApiQuestion, ApiQuiz, ApiQuizResult, ApiStudent,
  ApiSubmitResponse,
};

/// Quiz backend API client.
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base: Url,
  token: Option<String>,
}

impl ApiClient {
  /// Create a client against the given base URL, e.g. `https://host/api`.
  pub fn new(base: Url, token: Option<String>) -> Self {
    Self::with_http(reqwest::Client::new(), base, token)
  }

  /// Create a client with a pre-configured `reqwest::Client` (custom
  /// timeouts, proxies, test doubles).
  pub fn with_http(http: reqwest::Client, base: Url, token: Option<String>) -> Self {
    Self { http, base, token }
  }

  fn endpoint(&self, path: &str) -> String {
    format!(
      "{}/{}",
      self.base.as_str().trim_end_matches('/'),
      path.trim_start_matches('/')
    )
  }

  async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
    let request = match &self.token {
      Some(token) => request.bearer_auth(token),
      None => request,
    };

    let response = request.send().await.map_err(ApiError::from)?;
    let status = response.status();
    let body = response.text().await.map_err(ApiError::from)?;

    if !status.is_success() {
      return Err(ApiError::from_status(status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    let url = self.endpoint(path);
    debug!(%url, "GET");
    self.send(self.http.request(Method::GET, url)).await
  }

  async fn post<T: DeserializeOwned>(
    &self,
    path: &str,
    body: &impl Serialize,
  ) -> Result<T, ApiError> {
    let url = self.endpoint(path);
    debug!(%url, "POST");
    self.send(self.http.request(Method::POST, url).json(body)).await
  }

  async fn put<T: DeserializeOwned>(
    &self,
    path: &str,
    body: &impl Serialize,
  ) -> Result<T, ApiError> {
    let url = self.endpoint(path);
    debug!(%url, "PUT");
    self.send(self.http.request(Method::PUT, url).json(body)).await
  }

  async fn delete(&self, path: &str) -> Result<(), ApiError> {
    let url = self.endpoint(path);
    debug!(%url, "DELETE");
    let _: ApiAck = self.send(self.http.request(Method::DELETE, url)).await?;
    Ok(())
  }

  // ==========================================================================
  // Questions
  // ==========================================================================

  pub async fn list_questions(&self) -> Result<Vec<Question>, ApiError> {
    let questions: Vec<ApiQuestion> = self.get("question").await?;
    Ok(questions.into_iter().map(Question::from).collect())
  }

  pub async fn get_question(&self, id: &str) -> Result<Question, ApiError> {
    let question: ApiQuestion = self.get(&format!("question/{}", id)).await?;
    Ok(question.into())
  }

  pub async fn create_question(&self, draft: &QuestionDraft) -> Result<Question, ApiError> {
    let question: ApiQuestion = self.post("question", draft).await?;
    Ok(question.into())
  }

  pub async fn update_question(
    &self,
    id: &str,
    draft: &QuestionDraft,
  ) -> Result<Question, ApiError> {
    let question: ApiQuestion = self.put(&format!("question/{}", id), draft).await?;
    Ok(question.into())
  }

  pub async fn delete_question(&self, id: &str) -> Result<(), ApiError> {
    self.delete(&format!("question/{}", id)).await
  }

  // ==========================================================================
  // Quizzes
  // ==========================================================================

  pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, ApiError> {
    let quizzes: Vec<ApiQuiz> = self.get("quiz").await?;
    Ok(quizzes.into_iter().map(Quiz::from).collect())
  }

  pub async fn get_quiz(&self, id: &str) -> Result<Quiz, ApiError> {
    let quiz: ApiQuiz = self.get(&format!("quiz/{}", id)).await?;
    Ok(quiz.into())
  }

  pub async fn create_quiz(&self, draft: &QuizDraft) -> Result<Quiz, ApiError> {
    let quiz: ApiQuiz = self.post("quiz", draft).await?;
    Ok(quiz.into())
  }

  pub async fn update_quiz(&self, id: &str, draft: &QuizDraft) -> Result<Quiz, ApiError> {
    let quiz: ApiQuiz = self.put(&format!("quiz/{}", id), draft).await?;
    Ok(quiz.into())
  }

  pub async fn delete_quiz(&self, id: &str) -> Result<(), ApiError> {
    self.delete(&format!("quiz/{}", id)).await
  }

  /// Join a quiz with the short code shown to students.
  pub async fn join_quiz(&self, code: &str) -> Result<JoinReceipt, ApiError> {
    let body = serde_json::json!({ "code": code });
    let response: ApiJoinResponse = self.post("quiz/join", &body).await?;
    Ok(JoinReceipt {
      quiz_id: response.quiz,
      message: response.message,
    })
  }

  /// Submit a student's answers for a quiz.
  pub async fn submit_answers(
    &self,
    quiz_id: &str,
    answers: &[SubmittedAnswer],
  ) -> Result<SubmitReceipt, ApiError> {
    let body = serde_json::json!({ "quiz": quiz_id, "answers": answers });
    let response: ApiSubmitResponse = self.post("quiz/submit", &body).await?;
    Ok(SubmitReceipt {
      message: response.message,
      score: response.score,
    })
  }

  /// Server-graded results, read-only.
  pub async fn list_results(&self) -> Result<Vec<QuizResult>, ApiError> {
    let results: Vec<ApiQuizResult> = self.get("quiz/result").await?;
    Ok(results.into_iter().map(QuizResult::from).collect())
  }

  // ==========================================================================
  // Groups
  // ==========================================================================

  pub async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
    let groups: Vec<ApiGroup> = self.get("group").await?;
    Ok(groups.into_iter().map(Group::from).collect())
  }

  pub async fn get_group(&self, id: &str) -> Result<Group, ApiError> {
    let group: ApiGroup = self.get(&format!("group/{}", id)).await?;
    Ok(group.into())
  }

  pub async fn create_group(&self, draft: &GroupDraft) -> Result<Group, ApiError> {
    let group: ApiGroup = self.post("group", draft).await?;
    Ok(group.into())
  }

  pub async fn update_group(&self, id: &str, draft: &GroupDraft) -> Result<Group, ApiError> {
    let group: ApiGroup = self.put(&format!("group/{}", id), draft).await?;
    Ok(group.into())
  }

  pub async fn delete_group(&self, id: &str) -> Result<(), ApiError> {
    self.delete(&format!("group/{}", id)).await
  }

  // ==========================================================================
  // Students
  // ==========================================================================

  pub async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
    let students: Vec<ApiStudent> = self.get("student").await?;
    Ok(students.into_iter().map(Student::from).collect())
  }

  pub async fn get_student(&self, id: &str) -> Result<Student, ApiError> {
    let student: ApiStudent = self.get(&format!("student/{}", id)).await?;
    Ok(student.into())
  }
}
