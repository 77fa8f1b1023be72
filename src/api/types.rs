use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the four answer slots of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerKey {
  A,
  B,
  C,
  D,
}

/// Question / quiz difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

/// Which track a question or quiz targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
  #[serde(rename = "FE")]
  Frontend,
  #[serde(rename = "BE")]
  Backend,
}

/// Whether a quiz is still accepting participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
  Open,
  Closed,
}

impl std::fmt::Display for AnswerKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      AnswerKey::A => "A",
      AnswerKey::B => "B",
      AnswerKey::C => "C",
      AnswerKey::D => "D",
    };
    f.write_str(label)
  }
}

impl std::fmt::Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    };
    f.write_str(label)
  }
}

impl std::fmt::Display for Track {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Track::Frontend => "FE",
      Track::Backend => "BE",
    };
    f.write_str(label)
  }
}

impl std::fmt::Display for QuizStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      QuizStatus::Open => "open",
      QuizStatus::Closed => "closed",
    };
    f.write_str(label)
  }
}

/// The four option texts of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOptions {
  #[serde(rename = "A")]
  pub a: String,
  #[serde(rename = "B")]
  pub b: String,
  #[serde(rename = "C")]
  pub c: String,
  #[serde(rename = "D")]
  pub d: String,
}

/// A bank question
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
  pub id: String,
  pub title: String,
  pub description: String,
  pub options: AnswerOptions,
  pub answer: AnswerKey,
  pub difficulty: Difficulty,
  pub track: Track,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// A scheduled quiz
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
  pub id: String,
  /// Short join code students enter
  pub code: String,
  pub title: String,
  pub description: String,
  /// Duration in minutes
  pub duration: u32,
  pub questions_number: u32,
  pub score_per_question: u32,
  pub scheduled_at: DateTime<Utc>,
  pub difficulty: Difficulty,
  pub track: Track,
  /// Group the quiz is assigned to
  pub group: String,
  pub status: QuizStatus,
  /// Number of students who joined so far
  pub participants: u32,
}

/// A student group
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
  pub id: String,
  pub name: String,
  /// Student ids in this group
  pub students: Vec<String>,
  pub max_students: u32,
}

/// A registered student
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub status: String,
  pub group: Option<String>,
}

impl Student {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// Per-student score within a finished quiz
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantScore {
  pub student: String,
  pub score: u32,
}

/// Server-derived result of a quiz, read-only
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
  pub quiz: Quiz,
  pub participants: Vec<ParticipantScore>,
}

// ============================================================================
// Drafts posted back to the API
// ============================================================================

/// Payload for creating or updating a question.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDraft {
  pub title: String,
  pub description: String,
  pub options: AnswerOptions,
  pub answer: AnswerKey,
  pub difficulty: Difficulty,
  #[serde(rename = "type")]
  pub track: Track,
}

/// Payload for creating or updating a quiz.
#[derive(Debug, Clone, Serialize)]
pub struct QuizDraft {
  pub title: String,
  pub description: String,
  pub duration: u32,
  pub questions_number: u32,
  pub score_per_question: u32,
  /// The backend spells this field "schadule"
  #[serde(rename = "schadule")]
  pub scheduled_at: DateTime<Utc>,
  pub difficulty: Difficulty,
  #[serde(rename = "type")]
  pub track: Track,
  pub group: String,
}

/// Payload for creating or updating a group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupDraft {
  pub name: String,
  pub students: Vec<String>,
  pub max_students: u32,
}

/// One answer of a student's submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedAnswer {
  pub question: String,
  pub answer: AnswerKey,
}

// ============================================================================
// Action receipts
// ============================================================================

/// Acknowledgement of joining a quiz by code.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinReceipt {
  pub quiz_id: String,
  pub message: String,
}

/// Acknowledgement of submitting answers.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
  pub message: String,
  /// Present once the quiz has been auto-graded
  pub score: Option<u32>,
}
