// irbis-cli/src/main.rs
mod models;
mod rendering;

use anyhow::{anyhow, Context, Result};
use colored::*;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::{Config as RustylineConfig, DefaultEditor};
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use irbis_core::{
    config::{ResponderConfig, RetrievalConfig},
    responder::Responder,
    retrieval::RetrievalClient,
    store::{ConversationStore, FileThreadStore, ThreadId},
    tools::get_data::GetDataTool,
    Transcript,
};

use crate::models::cli::Cli;
use crate::rendering::render_tool_card;

const THREADS_SUBDIR: &str = ".irbis/threads";

struct ChatSession {
    responder: Responder,
    store: FileThreadStore,
    thread_id: ThreadId,
    transcript: Transcript,
}

impl ChatSession {
    /// Runs one turn and prints its tool cards and answer. The transcript is
    /// saved even when the turn fails so context is not lost.
    async fn turn(&mut self, input: &str) -> Result<()> {
        let spinner = make_spinner();
        let result = self.responder.respond(&mut self.transcript, input).await;
        spinner.finish_and_clear();

        let save_result = self.store.save(&self.thread_id, &self.transcript);

        match result {
            Ok(output) => {
                for record in &output.tool_calls {
                    println!("\n{}\n", render_tool_card(record));
                }
                println!("{}", output.final_text);
                save_result.context("Failed to save conversation thread")?;
                info!(thread_id = %self.thread_id, "Saved conversation thread.");
                Ok(())
            }
            Err(e) => {
                if let Err(save_err) = save_result {
                    warn!(thread_id = %self.thread_id, error = %save_err, "Failed to save thread after a failed turn.");
                }
                Err(e.into())
            }
        }
    }
}

fn make_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "-"]),
    );
    pb.set_message("Thinking...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn print_welcome(thread_id: ThreadId, model_name: &str) {
    println!("\n{}", "irbis - chat with your data".cyan().bold());
    println!("{}: {}", "Thread".cyan(), thread_id);
    println!("{}: {}", "Model".cyan(), model_name);
    println!(
        "{}",
        "Type 'exit', 'quit', Ctrl-D, or an empty line to quit. Type 'new' for a fresh thread."
            .dimmed()
    );
    println!();
}

async fn run_interactive(
    session: &mut ChatSession,
    model_name: &str,
    system_prompt: &str,
) -> Result<()> {
    print_welcome(session.thread_id, model_name);

    let rl_config = RustylineConfig::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl = DefaultEditor::with_config(rl_config)?;

    let history_file = dirs::cache_dir().map(|d| d.join("irbis").join("cli_history.txt"));
    if let Some(path) = &history_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        rl.load_history(path).ok();
    }

    let prompt = format!("{} ", ">".green().bold());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty()
                    || trimmed.eq_ignore_ascii_case("exit")
                    || trimmed.eq_ignore_ascii_case("quit")
                {
                    break;
                }
                if trimmed.eq_ignore_ascii_case("new") {
                    session.thread_id = ThreadId::new();
                    session.transcript = Transcript::new(system_prompt);
                    println!("\n{}", "Starting a new conversation...".cyan());
                    print_welcome(session.thread_id, model_name);
                    continue;
                }
                if let Err(e) = session.turn(trimmed).await {
                    error!("Turn failed: {:#}", e);
                    eprintln!("\n{} {:#}", "Turn failed:".red(), e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error reading input: {}", err.to_string().red());
                break;
            }
        }
    }

    if let Some(path) = &history_file {
        rl.save_history(path).ok();
    }

    println!("\n{}\n", "Conversation saved. Exiting.".cyan());
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let responder_config = ResponderConfig::from_env(cli.model.clone())?;
    let retrieval_config = RetrievalConfig::from_env()?;

    let model_name = responder_config.model.model_name.clone();
    let system_prompt = responder_config.system_prompt.clone();

    let retrieval_client = RetrievalClient::new(retrieval_config)?;
    let tool_provider = Arc::new(GetDataTool::new(retrieval_client));
    let responder = Responder::new(responder_config, tool_provider)?;
    let store = FileThreadStore::new(THREADS_SUBDIR);

    let (thread_id, transcript) = match cli.thread {
        Some(id) => {
            let transcript = store
                .load(&id)?
                .ok_or_else(|| anyhow!("No conversation thread found with id {}", id))?;
            info!(thread_id = %id, "Resumed conversation thread.");
            (id, transcript)
        }
        None => (ThreadId::new(), Transcript::new(&system_prompt)),
    };

    let mut session = ChatSession {
        responder,
        store,
        thread_id,
        transcript,
    };

    if let Some(turn_text) = cli.turn {
        return session.turn(&turn_text).await;
    }
    run_interactive(&mut session, &model_name, &system_prompt).await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {:#}", e);
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
