use clap::{Args as ClapArgs, Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

use quizdeck::api::types::{Group, Question, Quiz, QuizResult, Student};
use quizdeck::api::ApiClient;
use quizdeck::cache::FreshnessPolicy;
use quizdeck::config::Config;
use quizdeck::view::{project, Page, Searchable, ViewQuery};
use quizdeck::QuizClient;

#[derive(Parser, Debug)]
#[command(name = "quizdeck")]
#[command(about = "Headless client for the quiz-management platform")]
#[command(version)]
struct Cli {
  /// Path to config file (default: $XDG_CONFIG_HOME/quizdeck/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Override the API base URL from the config
  #[arg(long)]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Manage bank questions
  Questions {
    #[command(subcommand)]
    action: CrudAction,
  },
  /// Manage quizzes
  Quizzes {
    #[command(subcommand)]
    action: QuizAction,
  },
  /// Manage student groups
  Groups {
    #[command(subcommand)]
    action: CrudAction,
  },
  /// Browse registered students
  Students {
    #[command(subcommand)]
    action: ReadAction,
  },
  /// Browse server-graded quiz results
  Results(ListArgs),
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
  /// Bypass the cache and refetch
  #[arg(long)]
  force: bool,

  /// Case-insensitive search over the visible fields
  #[arg(long)]
  search: Option<String>,

  /// 1-indexed page (clamped to the last valid page)
  #[arg(long, default_value_t = 1)]
  page: usize,

  #[arg(long, default_value_t = 10)]
  page_size: usize,
}

#[derive(Subcommand, Debug)]
enum CrudAction {
  List(ListArgs),
  /// Show one entity by id
  Get { id: String },
  /// Delete by id
  Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum QuizAction {
  List(ListArgs),
  Get { id: String },
  Delete { id: String },
  /// Join a quiz with the short code shown to students
  Join { code: String },
}

#[derive(Subcommand, Debug)]
enum ReadAction {
  List(ListArgs),
  Get { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizdeck=info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let config = Config::load(cli.config.as_deref())?;
  let base = cli.url.unwrap_or_else(|| config.api.url.clone());
  let base = Url::parse(&base).map_err(|e| eyre!("Invalid API base URL {}: {}", base, e))?;
  let token = Config::api_token()?;

  let http = reqwest::Client::builder()
    .timeout(Duration::from_secs(config.api.timeout_secs))
    .build()?;
  let api = ApiClient::with_http(http, base, Some(token));
  let policy =
    FreshnessPolicy::new(chrono::Duration::minutes(config.cache.ttl_minutes as i64));
  let client = QuizClient::new(api, policy);

  match cli.command {
    Command::Questions { action } => match action {
      CrudAction::List(args) => {
        let items = client.list_questions(args.force).await?;
        print_page(&paginate(&items, &args), print_question_row);
      }
      CrudAction::Get { id } => {
        let question = client.question(&id).await?;
        print_question(&question);
      }
      CrudAction::Delete { id } => {
        client.delete_question(&id).await?;
        println!("deleted question {}", id);
      }
    },
    Command::Quizzes { action } => match action {
      QuizAction::List(args) => {
        let items = client.list_quizzes(args.force).await?;
        print_page(&paginate(&items, &args), print_quiz_row);
      }
      QuizAction::Get { id } => {
        let quiz = client.quiz(&id).await?;
        print_quiz(&quiz);
      }
      QuizAction::Delete { id } => {
        client.delete_quiz(&id).await?;
        println!("deleted quiz {}", id);
      }
      QuizAction::Join { code } => {
        let receipt = client.join_quiz(&code).await?;
        println!("{} (quiz {})", receipt.message, receipt.quiz_id);
      }
    },
    Command::Groups { action } => match action {
      CrudAction::List(args) => {
        let items = client.list_groups(args.force).await?;
        print_page(&paginate(&items, &args), print_group_row);
      }
      CrudAction::Get { id } => {
        let group = client.group(&id).await?;
        print_group_row(&group);
      }
      CrudAction::Delete { id } => {
        client.delete_group(&id).await?;
        println!("deleted group {}", id);
      }
    },
    Command::Students { action } => match action {
      ReadAction::List(args) => {
        let items = client.list_students(args.force).await?;
        print_page(&paginate(&items, &args), print_student_row);
      }
      ReadAction::Get { id } => {
        let student = client.student(&id).await?;
        print_student_row(&student);
      }
    },
    Command::Results(args) => {
      let items = client.list_results(args.force).await?;
      print_page(&paginate(&items, &args), print_result_row);
    }
  }

  Ok(())
}

fn paginate<T: Clone + Searchable>(items: &[T], args: &ListArgs) -> Page<T> {
  let mut query = ViewQuery::new()
    .with_page(args.page)
    .with_page_size(args.page_size);
  if let Some(term) = &args.search {
    query = query.with_search(term.clone());
  }
  project(items, &query)
}

fn print_page<T>(page: &Page<T>, row: impl Fn(&T)) {
  for item in &page.items {
    row(item);
  }
  eprintln!(
    "page {}/{} ({} total)",
    page.page, page.total_pages, page.total_items
  );
}

fn print_question_row(question: &Question) {
  println!(
    "{:<26} {:<8} {:<4} {}",
    question.id, question.difficulty, question.track, question.title
  );
}

fn print_question(question: &Question) {
  print_question_row(question);
  println!("  {}", question.description);
  println!(
    "  A: {}  B: {}  C: {}  D: {}  (answer: {})",
    question.options.a,
    question.options.b,
    question.options.c,
    question.options.d,
    question.answer
  );
}

fn print_quiz_row(quiz: &Quiz) {
  println!(
    "{:<26} {:<6} {:<8} {:<8} {}",
    quiz.id, quiz.code, quiz.status, quiz.difficulty, quiz.title
  );
}

fn print_quiz(quiz: &Quiz) {
  print_quiz_row(quiz);
  println!("  {}", quiz.description);
  println!(
    "  scheduled {} | {} min | {} questions x {} pts | {} joined",
    quiz.scheduled_at, quiz.duration, quiz.questions_number, quiz.score_per_question,
    quiz.participants
  );
}

fn print_group_row(group: &Group) {
  println!(
    "{:<26} {:<24} {}/{} students",
    group.id,
    group.name,
    group.students.len(),
    group.max_students
  );
}

fn print_student_row(student: &Student) {
  println!(
    "{:<26} {:<24} {}",
    student.id,
    student.full_name(),
    student.email
  );
}

fn print_result_row(result: &QuizResult) {
  let scored: u32 = result.participants.iter().map(|p| p.score).sum();
  println!(
    "{:<26} {:<6} {:<32} {} participants, {} pts total",
    result.quiz.id,
    result.quiz.code,
    result.quiz.title,
    result.participants.len(),
    scored
  );
}
