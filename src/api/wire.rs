//! Serde-deserializable types matching the quiz backend's API responses.
//!
//! These types are separate from domain types to allow strict
//! deserialization at the transport boundary: unknown fields and missing
//! required fields are rejected here, so loosely-typed payloads never reach
//! the cache. Field names follow the backend's spelling, including its
//! `schadule` misspelling.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::types::{
  AnswerKey, AnswerOptions, Difficulty, Group, ParticipantScore, Question, Quiz, QuizResult,
  QuizStatus, Student, Track,
};

// ============================================================================
// Resource payloads
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiQuestion {
  #[serde(rename = "_id")]
  pub id: String,
  pub title: String,
  pub description: String,
  pub options: AnswerOptions,
  pub answer: AnswerKey,
  pub difficulty: Difficulty,
  #[serde(rename = "type")]
  pub track: Track,
  #[serde(rename = "createdAt")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(rename = "updatedAt")]
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiQuiz {
  #[serde(rename = "_id")]
  pub id: String,
  pub code: String,
  pub title: String,
  pub description: String,
  pub duration: u32,
  pub questions_number: u32,
  pub score_per_question: u32,
  pub schadule: DateTime<Utc>,
  pub difficulty: Difficulty,
  #[serde(rename = "type")]
  pub track: Track,
  pub group: String,
  pub status: QuizStatus,
  pub participants: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiGroup {
  #[serde(rename = "_id")]
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub students: Vec<String>,
  pub max_students: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiStudent {
  #[serde(rename = "_id")]
  pub id: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub status: String,
  pub group: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiParticipantScore {
  pub student: String,
  pub score: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiQuizResult {
  pub quiz: ApiQuiz,
  #[serde(default)]
  pub participants: Vec<ApiParticipantScore>,
}

// ============================================================================
// Action responses
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiJoinResponse {
  pub message: String,
  /// Id of the joined quiz
  pub quiz: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSubmitResponse {
  pub message: String,
  /// Present once the quiz has been auto-graded
  pub score: Option<u32>,
}

/// Delete and other acknowledge-only endpoints return just a message.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiAck {
  pub message: String,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl From<ApiQuestion> for Question {
  fn from(q: ApiQuestion) -> Self {
    Question {
      id: q.id,
      title: q.title,
      description: q.description,
      options: q.options,
      answer: q.answer,
      difficulty: q.difficulty,
      track: q.track,
      created_at: q.created_at,
      updated_at: q.updated_at,
    }
  }
}

impl From<ApiQuiz> for Quiz {
  fn from(q: ApiQuiz) -> Self {
    Quiz {
      id: q.id,
      code: q.code,
      title: q.title,
      description: q.description,
      duration: q.duration,
      questions_number: q.questions_number,
      score_per_question: q.score_per_question,
      scheduled_at: q.schadule,
      difficulty: q.difficulty,
      track: q.track,
      group: q.group,
      status: q.status,
      participants: q.participants,
    }
  }
}

impl From<ApiGroup> for Group {
  fn from(g: ApiGroup) -> Self {
    Group {
      id: g.id,
      name: g.name,
      students: g.students,
      max_students: g.max_students,
    }
  }
}

impl From<ApiStudent> for Student {
  fn from(s: ApiStudent) -> Self {
    Student {
      id: s.id,
      first_name: s.first_name,
      last_name: s.last_name,
      email: s.email,
      status: s.status,
      group: s.group,
    }
  }
}

impl From<ApiQuizResult> for QuizResult {
  fn from(r: ApiQuizResult) -> Self {
    QuizResult {
      quiz: r.quiz.into(),
      participants: r
        .participants
        .into_iter()
        .map(|p| ParticipantScore {
          student: p.student,
          score: p.score,
        })
        .collect(),
    }
  }
}
