use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::AsyncReadExt;

use study_forge::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::dto::{
        request::{GenerateFlashcardsRequest, GenerateQuizRequest},
        response::{ApiResponse, ErrorResponse},
    },
};

/// Generate flashcards, quizzes and summaries from study text.
///
/// Input is read from --file or stdin. Results are printed as JSON.
/// Set LLM_MODE=live and GEMINI_API_KEY to use a real model.
#[derive(Parser, Debug)]
#[command(name = "study-forge", author, version, about)]
struct Cli {
    /// Read the input text from this file instead of stdin
    #[arg(short, long, value_name = "PATH", global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate flashcards
    Flashcards {
        #[arg(short, long, default_value_t = 10)]
        count: u32,
    },
    /// Generate a multiple-choice quiz
    Quiz {
        #[arg(short, long, default_value_t = 10)]
        count: u32,
    },
    /// Summarize the text
    Summary,
    /// Ask the study assistant a question
    Ask,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    log::info!(
        "Starting in {} mode (model {})",
        config.generation_mode,
        config.model_name
    );
    if config.missing_live_credential() {
        log::warn!("LLM_MODE is live but GEMINI_API_KEY is not set; generation calls will fail");
    }

    let state = AppState::new(config);

    match run(&state, cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{} ({})", err, err.cause());
            println!("{}", to_json(&ErrorResponse::from(&err)));
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState, cli: Cli) -> AppResult<String> {
    let input = read_input(cli.file.as_ref()).await?;

    let output = match cli.command {
        Command::Flashcards { count } => {
            let cards = state
                .flashcard_service
                .generate_flashcards(GenerateFlashcardsRequest::new(input, count))
                .await?;
            let message = format!("Generated {} flashcards", cards.len());
            to_json(&ApiResponse::new(cards, message))
        }
        Command::Quiz { count } => {
            let quiz = state
                .quiz_service
                .generate_quiz(GenerateQuizRequest::new(input, count))
                .await?;
            let message = format!("Generated {} questions", quiz.len());
            to_json(&ApiResponse::new(quiz, message))
        }
        Command::Summary => {
            let summary = state.summary_service.generate_summary(&input).await?;
            to_json(&ApiResponse::new(summary, "Summary generated"))
        }
        Command::Ask => {
            let answer = state.assistant_service.respond(&input).await?;
            to_json(&ApiResponse::new(answer, "Response generated"))
        }
    };

    Ok(output)
}

async fn read_input(file: Option<&PathBuf>) -> AppResult<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::InternalError(format!("Failed to read {}: {}", path.display(), e))
        }),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to read stdin: {}", e)))?;
            Ok(buf)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {}\", \"code\": \"INTERNAL_ERROR\"}}", e))
}
