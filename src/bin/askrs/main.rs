use anyhow::Result;
use colored::*;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use askrs::pipeline::logging::PipelineLogger;
use askrs::providers::create_provider;
use askrs::{Config, SearchClient, SearchWorkflow, ui};

mod cli;
use cli::{CliCommand, parse_input};

const TRACE_DIR_ENV: &str = "ASKRS_TRACE_DIR";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    ui::init_logging();

    // Both credentials are required up front; a bad environment aborts here,
    // not on the first question.
    let config = Config::from_env()?;
    let provider = create_provider(&config)?;
    let search = SearchClient::serpapi(config.search_key.clone())?;

    let mut workflow = SearchWorkflow::new(provider, search);
    if let Ok(dir) = std::env::var(TRACE_DIR_ENV) {
        if !dir.trim().is_empty() {
            workflow = workflow.with_trace(PipelineLogger::new(dir.into())?);
        }
    }

    ui::header(&workflow.status());
    println!(
        "{}",
        "Ask a question. Commands: /steps <question>, /status; quit/exit/q or an empty line to leave."
            .dimmed()
    );

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "?".cyan().bold()));

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                match parse_input(&line) {
                    CliCommand::Quit => {
                        ui::goodbye();
                        break;
                    }
                    CliCommand::Status => ui::workflow_status(&workflow.status()),
                    CliCommand::StepByStep(question) if question.is_empty() => {
                        println!("{}", "usage: /steps <question>".dimmed());
                    }
                    CliCommand::StepByStep(question) => {
                        let outcome = workflow.run_step_by_step(&question).await;
                        ui::answer(&outcome.content);
                        if outcome.metadata.success {
                            ui::query_used(&outcome.metadata.search_query);
                        } else if let Some(error) = &outcome.metadata.error {
                            ui::turn_error(error);
                        }
                    }
                    CliCommand::Ask(question) => {
                        let outcome = workflow.run(&question).await;
                        ui::answer(&outcome.content);
                        if outcome.metadata.success {
                            ui::query_used(&outcome.metadata.search_query);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                ui::goodbye();
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e:?}");
                break;
            }
        }
    }

    Ok(())
}
