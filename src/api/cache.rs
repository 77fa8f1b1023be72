//! Cache and search implementations for quiz domain types.

use crate::cache::Cacheable;
use crate::view::Searchable;

use super::types::{Group, Question, Quiz, QuizResult, Student};

// ============================================================================
// Cacheable implementations
// ============================================================================

impl Cacheable for Question {
  fn id(&self) -> &str {
    &self.id
  }

  fn resource_name() -> &'static str {
    "question"
  }
}

impl Cacheable for Quiz {
  fn id(&self) -> &str {
    &self.id
  }

  fn resource_name() -> &'static str {
    "quiz"
  }
}

impl Cacheable for Group {
  fn id(&self) -> &str {
    &self.id
  }

  fn resource_name() -> &'static str {
    "group"
  }
}

impl Cacheable for Student {
  fn id(&self) -> &str {
    &self.id
  }

  fn resource_name() -> &'static str {
    "student"
  }
}

impl Cacheable for QuizResult {
  // Results are keyed by the quiz they grade
  fn id(&self) -> &str {
    &self.quiz.id
  }

  fn resource_name() -> &'static str {
    "quiz_result"
  }
}

// ============================================================================
// Searchable implementations
// ============================================================================

impl Searchable for Question {
  fn search_fields(&self) -> Vec<&str> {
    vec![&self.title, &self.description]
  }
}

impl Searchable for Quiz {
  fn search_fields(&self) -> Vec<&str> {
    vec![&self.title, &self.description, &self.code]
  }
}

impl Searchable for Group {
  fn search_fields(&self) -> Vec<&str> {
    vec![&self.name]
  }
}

impl Searchable for Student {
  fn search_fields(&self) -> Vec<&str> {
    vec![&self.first_name, &self.last_name, &self.email]
  }
}

impl Searchable for QuizResult {
  fn search_fields(&self) -> Vec<&str> {
    vec![&self.quiz.title, &self.quiz.code]
  }
}
