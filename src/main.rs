//! Interactive terminal interview.
//!
//! Usage:
//!
//! ```text
//! cardio-triage                 run a new interview
//! cardio-triage --check         probe the configured language model
//! cardio-triage --resume <id>   continue a saved interview
//! ```
//!
//! Configuration comes from `CARDIO_TRIAGE__*` environment variables (see
//! [`cardio_triage::config`]).

use std::error::Error;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardio_triage::adapters::ai::build_provider;
use cardio_triage::adapters::{FileSnapshotStore, InMemorySnapshotStore, MarkdownReportRenderer};
use cardio_triage::application::{
    parse_answer, ConnectionChecker, ControllerSettings, InterviewController,
};
use cardio_triage::config::AppConfig;
use cardio_triage::domain::foundation::SessionId;
use cardio_triage::domain::interview::{
    InterviewStatus, Question, QuestionCatalog, QuestionType, Sex,
};
use cardio_triage::ports::{RenderOptions, SnapshotStore};

type Input = Lines<BufReader<Stdin>>;

enum Command {
    Interview,
    Check,
    Resume(SessionId),
}

fn parse_args() -> Result<Command, Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => Ok(Command::Interview),
        ["--check"] => Ok(Command::Check),
        ["--resume", id] => Ok(Command::Resume(id.parse()?)),
        _ => Err("usage: cardio-triage [--check | --resume <session-id>]".into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardio_triage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = parse_args()?;

    let config = AppConfig::load()?;
    config.validate()?;

    let provider = build_provider(&config.llm)?;

    if let Command::Check = command {
        let report = ConnectionChecker::new(provider).check().await;
        println!(
            "{} ({}): {}",
            report.provider.name, report.provider.model, report.status
        );
        return Ok(());
    }

    let snapshots: Arc<dyn SnapshotStore> = match &config.storage.snapshot_dir {
        Some(dir) if config.storage.is_persistent() => Arc::new(FileSnapshotStore::new(dir)),
        _ => Arc::new(InMemorySnapshotStore::new()),
    };

    let catalog = QuestionCatalog::cardiology()?;
    let mut controller = InterviewController::new(
        catalog.into_questions(),
        provider,
        snapshots,
        Arc::new(MarkdownReportRenderer::new()),
        ControllerSettings {
            request_timeout: config.interview.request_timeout(),
            report_dir: config.interview.report_dir.clone(),
        },
    );

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    match command {
        Command::Resume(id) => {
            controller.resume(id).await?;
            println!("Resumed interview {}.", id.short());
        }
        _ => start(&mut controller, &mut input).await?,
    }

    run(&mut controller, &mut input).await
}

/// Asks for demographics until the controller accepts them.
async fn start(controller: &mut InterviewController, input: &mut Input) -> Result<(), Box<dyn Error>> {
    println!("Cardiology pre-visit interview\n");
    loop {
        let patient_id = prompt(input, "Patient identifier: ").await?;
        let sex = loop {
            let value = prompt(input, "Sex (m/f): ").await?;
            match Sex::parse(&value) {
                Some(sex) => break sex,
                None => println!("Please enter m or f."),
            }
        };
        let age = prompt(input, "Age: ").await?;
        let Ok(age) = age.trim().parse::<u32>() else {
            println!("Please enter the age in whole years.\n");
            continue;
        };

        match controller.start(&patient_id, sex, age).await {
            Ok(id) => {
                println!("\nInterview {} started.\n", id.short());
                return Ok(());
            }
            Err(err) => println!("{}\n", err.user_message()),
        }
    }
}

/// Drives the interview from its current status to the exported report.
async fn run(controller: &mut InterviewController, input: &mut Input) -> Result<(), Box<dyn Error>> {
    loop {
        match controller.session().status() {
            InterviewStatus::Phase1 | InterviewStatus::Phase2 => {
                answer_questions(controller, input).await?;
                submit(controller, input).await?;
            }
            InterviewStatus::Completed => {
                let path = controller.export_report(&RenderOptions::full()).await?;
                println!("\nReport written to {}", path.display());
                return Ok(());
            }
            InterviewStatus::Idle => return Ok(()),
            InterviewStatus::Analyzing | InterviewStatus::GeneratingReport => {
                controller.abandon_pending("The previous request did not finish.")?;
            }
        }
    }
}

/// Walks the active phase until the last question is answered.
async fn answer_questions(
    controller: &mut InterviewController,
    input: &mut Input,
) -> Result<(), Box<dyn Error>> {
    if controller.session().status() == InterviewStatus::Phase2 && controller.session().current_index() == 0 {
        println!("\nA few follow-up questions based on your answers:\n");
    }

    loop {
        let session = controller.session();
        let Some(question) = session.current_question().cloned() else {
            return Ok(());
        };
        print_question(
            &question,
            session.current_index() + 1,
            session.total_questions(),
            session.answers().get(&question.id).map(|a| a.describe(&question)),
        );

        let line = prompt(input, "> ").await?;
        if line.trim() == "<" {
            controller.retreat()?;
            continue;
        }

        match parse_answer(&question, &line) {
            Ok(Some(answer)) => controller.set_answer(question.id.clone(), answer)?,
            Ok(None) => {}
            Err(err) => {
                println!("{}\n", err);
                continue;
            }
        }

        if !controller.is_current_answered() {
            println!("This question needs an answer.\n");
            continue;
        }
        if controller.session().is_last_question() {
            return Ok(());
        }
        controller.advance()?;
    }
}

/// Sends the phase off, offering a retry when the call fails.
async fn submit(controller: &mut InterviewController, input: &mut Input) -> Result<(), Box<dyn Error>> {
    loop {
        let result = match controller.session().status() {
            InterviewStatus::Phase1 => {
                println!("\nAnalyzing your answers...");
                controller.complete_phase1().await.map(|_| ())
            }
            InterviewStatus::Phase2 => {
                println!("\nPreparing the report...");
                controller.complete_phase2().await.map(|_| ())
            }
            _ => return Ok(()),
        };

        match result {
            Ok(()) => return Ok(()),
            Err(err) => {
                println!("{}", err.user_message());
                let again = prompt(input, "Try again? [Y/n/<] ").await?;
                match again.trim().to_ascii_lowercase().as_str() {
                    "n" | "no" => return Err(err.into()),
                    "<" => return Ok(()),
                    _ => {}
                }
            }
        }
    }
}

fn print_question(question: &Question, number: usize, total: usize, current: Option<String>) {
    println!(
        "[{}/{}] {}: {}",
        number,
        total,
        question.category.display_name(),
        question.text
    );
    if let Some(help) = &question.help_text {
        println!("    {}", help);
    }
    for (i, option) in question.options.iter().enumerate() {
        println!("    {}. {}", i + 1, option.label);
    }
    match question.question_type {
        QuestionType::Multiselect => println!("    (numbers separated by commas)"),
        QuestionType::Scale => {
            let scale = question.scale.clone().unwrap_or_default();
            println!(
                "    {} ({}) to {} ({})",
                scale.min,
                scale.min_label.as_deref().unwrap_or("lowest"),
                scale.max,
                scale.max_label.as_deref().unwrap_or("highest")
            );
        }
        _ => {}
    }
    if question.allow_other {
        println!(
            "    other:{}",
            question.other_placeholder.as_deref().unwrap_or("<your own words>")
        );
    }
    if let Some(placeholder) = &question.placeholder {
        println!("    e.g. {}", placeholder);
    }
    if let Some(current) = current {
        println!("    current answer: {}", current);
    }
    if !question.required {
        println!("    (optional, press Enter to skip)");
    }
}

async fn prompt(input: &mut Input, text: &str) -> Result<String, Box<dyn Error>> {
    use std::io::Write;
    print!("{}", text);
    std::io::stdout().flush()?;
    input
        .next_line()
        .await?
        .ok_or_else(|| "input closed".into())
}
