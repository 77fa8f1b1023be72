//! Cached quiz client that wraps the API client with per-resource caching.

use crate::api::types::{
  Group, GroupDraft, JoinReceipt, Question, QuestionDraft, Quiz, QuizDraft, QuizResult, Student,
  SubmitReceipt, SubmittedAnswer,
};
use crate::api::ApiClient;
use crate::cache::{FreshnessPolicy, ResourceCache};
use crate::error::ApiError;

/// Quiz client with transparent caching support.
///
/// Wraps the underlying [`ApiClient`] and provides the same API, routed
/// through one cache per resource type: lists are served from cache within
/// the freshness TTL, concurrent fetches are collapsed, deletes apply
/// optimistically and roll back on failure, creates and updates wait for
/// the server. Join and submit are write actions and pass through uncached.
#[derive(Clone)]
pub struct QuizClient {
  api: ApiClient,
  questions: ResourceCache<Question>,
  quizzes: ResourceCache<Quiz>,
  groups: ResourceCache<Group>,
  students: ResourceCache<Student>,
  results: ResourceCache<QuizResult>,
}

impl QuizClient {
  /// Create a cached client; every resource shares the same freshness
  /// policy.
  pub fn new(api: ApiClient, policy: FreshnessPolicy) -> Self {
    Self {
      api,
      questions: ResourceCache::new(policy),
      quizzes: ResourceCache::new(policy),
      groups: ResourceCache::new(policy),
      students: ResourceCache::new(policy),
      results: ResourceCache::new(policy),
    }
  }

  // ==========================================================================
  // Read access to the per-resource caches (for views and projections)
  // ==========================================================================

  pub fn questions(&self) -> &ResourceCache<Question> {
    &self.questions
  }

  pub fn quizzes(&self) -> &ResourceCache<Quiz> {
    &self.quizzes
  }

  pub fn groups(&self) -> &ResourceCache<Group> {
    &self.groups
  }

  pub fn students(&self) -> &ResourceCache<Student> {
    &self.students
  }

  pub fn results(&self) -> &ResourceCache<QuizResult> {
    &self.results
  }

  // ==========================================================================
  // Questions
  // ==========================================================================

  pub async fn list_questions(&self, force: bool) -> Result<Vec<Question>, ApiError> {
    let api = self.api.clone();
    self
      .questions
      .list(force, || async move { api.list_questions().await })
      .await
  }

  pub async fn question(&self, id: &str) -> Result<Question, ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .questions
      .get(id, false, || async move { api.get_question(&target).await })
      .await
  }

  pub async fn create_question(&self, draft: QuestionDraft) -> Result<Question, ApiError> {
    let api = self.api.clone();
    self
      .questions
      .create(|| async move { api.create_question(&draft).await })
      .await
  }

  pub async fn update_question(
    &self,
    id: &str,
    draft: QuestionDraft,
  ) -> Result<Question, ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .questions
      .update(id, || async move { api.update_question(&target, &draft).await })
      .await
  }

  pub async fn delete_question(&self, id: &str) -> Result<(), ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .questions
      .delete(id, || async move { api.delete_question(&target).await })
      .await
  }

  // ==========================================================================
  // Quizzes
  // ==========================================================================

  pub async fn list_quizzes(&self, force: bool) -> Result<Vec<Quiz>, ApiError> {
    let api = self.api.clone();
    self
      .quizzes
      .list(force, || async move { api.list_quizzes().await })
      .await
  }

  pub async fn quiz(&self, id: &str) -> Result<Quiz, ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .quizzes
      .get(id, false, || async move { api.get_quiz(&target).await })
      .await
  }

  pub async fn create_quiz(&self, draft: QuizDraft) -> Result<Quiz, ApiError> {
    let api = self.api.clone();
    self
      .quizzes
      .create(|| async move { api.create_quiz(&draft).await })
      .await
  }

  pub async fn update_quiz(&self, id: &str, draft: QuizDraft) -> Result<Quiz, ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .quizzes
      .update(id, || async move { api.update_quiz(&target, &draft).await })
      .await
  }

  pub async fn delete_quiz(&self, id: &str) -> Result<(), ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .quizzes
      .delete(id, || async move { api.delete_quiz(&target).await })
      .await
  }

  /// Join a quiz by code (not cached - write action).
  pub async fn join_quiz(&self, code: &str) -> Result<JoinReceipt, ApiError> {
    self.api.join_quiz(code).await
  }

  /// Submit answers for a quiz (not cached - write action).
  pub async fn submit_answers(
    &self,
    quiz_id: &str,
    answers: &[SubmittedAnswer],
  ) -> Result<SubmitReceipt, ApiError> {
    self.api.submit_answers(quiz_id, answers).await
  }

  pub async fn list_results(&self, force: bool) -> Result<Vec<QuizResult>, ApiError> {
    let api = self.api.clone();
    self
      .results
      .list(force, || async move { api.list_results().await })
      .await
  }

  // ==========================================================================
  // Groups
  // ==========================================================================

  pub async fn list_groups(&self, force: bool) -> Result<Vec<Group>, ApiError> {
    let api = self.api.clone();
    self
      .groups
      .list(force, || async move { api.list_groups().await })
      .await
  }

  pub async fn group(&self, id: &str) -> Result<Group, ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .groups
      .get(id, false, || async move { api.get_group(&target).await })
      .await
  }

  pub async fn create_group(&self, draft: GroupDraft) -> Result<Group, ApiError> {
    let api = self.api.clone();
    self
      .groups
      .create(|| async move { api.create_group(&draft).await })
      .await
  }

  pub async fn update_group(&self, id: &str, draft: GroupDraft) -> Result<Group, ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .groups
      .update(id, || async move { api.update_group(&target, &draft).await })
      .await
  }

  pub async fn delete_group(&self, id: &str) -> Result<(), ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .groups
      .delete(id, || async move { api.delete_group(&target).await })
      .await
  }

  // ==========================================================================
  // Students
  // ==========================================================================

  pub async fn list_students(&self, force: bool) -> Result<Vec<Student>, ApiError> {
    let api = self.api.clone();
    self
      .students
      .list(force, || async move { api.list_students().await })
      .await
  }

  pub async fn student(&self, id: &str) -> Result<Student, ApiError> {
    let api = self.api.clone();
    let target = id.to_string();
    self
      .students
      .get(id, false, || async move { api.get_student(&target).await })
      .await
  }

  // ==========================================================================
  // Bulk refresh
  // ==========================================================================

  /// Refetch every collection concurrently, e.g. after login or on an
  /// explicit refresh action.
  pub async fn refresh_all(&self) -> Result<(), ApiError> {
    let (questions, quizzes, groups, students, results) = futures::join!(
      self.list_questions(true),
      self.list_quizzes(true),
      self.list_groups(true),
      self.list_students(true),
      self.list_results(true),
    );

    questions?;
    quizzes?;
    groups?;
    students?;
    results?;
    Ok(())
  }
}
