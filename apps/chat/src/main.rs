//! Interactive chat CLI for llama-stack agents.
//!
//! Creates an agent and a session, then reads prompts from stdin and
//! renders each streamed turn as it arrives. Tool and shield activity is
//! shown inline as colored notices.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use llamastack_async::types::agents::AgentConfig;
use llamastack_async::types::messages::{BlockKind, BlockUpdate, TurnCreateRequest};
use llamastack_async::{Client, Conversation, StackConfig, TurnAccumulator, drive};

#[derive(Parser)]
#[command(name = "stackchat")]
#[command(about = "Chat with a llama-stack agent, streaming the response")]
#[command(version)]
struct Cli {
    /// Model identifier served by the stack
    #[arg(short, long, default_value = "meta-llama/Llama-3.2-3B-Instruct")]
    model: String,

    /// Server base URL (defaults to LLAMA_STACK_BASE_URL, then localhost:8321)
    #[arg(long)]
    base_url: Option<String>,

    /// System instructions for the agent
    #[arg(long, default_value = "You are a helpful assistant.")]
    system: String,

    /// Tool group to enable, e.g. builtin::wolfram_alpha (repeatable)
    #[arg(long = "tool")]
    tools: Vec<String>,

    /// Shield applied to user input (repeatable)
    #[arg(long = "input-shield")]
    input_shields: Vec<String>,

    /// Shield applied to assistant output (repeatable)
    #[arg(long = "output-shield")]
    output_shields: Vec<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Prints streamed block updates, emitting only the unseen suffix of each
/// block so cumulative snapshots render as a live stream.
#[derive(Default)]
struct Renderer {
    printed: HashMap<usize, usize>,
}

impl Renderer {
    fn show(&mut self, update: &BlockUpdate) {
        let seen = self.printed.entry(update.index).or_insert(0);
        let fresh = &update.content[*seen..];
        if fresh.is_empty() {
            return;
        }
        match update.kind {
            BlockKind::Text => print!("{fresh}"),
            BlockKind::ToolNotice => println!("{}", fresh.cyan()),
            BlockKind::SafetyNotice => println!("{}", fresh.yellow()),
        }
        let _ = std::io::stdout().flush();
        *seen = update.content.len();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    let mut config = StackConfig::new();
    if let Some(base) = &cli.base_url {
        config = config.with_base_url(base.clone());
    }
    let client = Client::with_config(config);

    let agent = client
        .agents()
        .create(AgentConfig {
            model: cli.model.clone(),
            instructions: cli.system.clone(),
            tools: cli.tools.clone(),
            input_shields: cli.input_shields.clone(),
            output_shields: cli.output_shields.clone(),
            sampling_params: None,
        })
        .await
        .context("failed to create agent")?;
    let session = client
        .agents()
        .create_session(&agent.agent_id, "stackchat")
        .await
        .context("failed to create session")?;

    println!(
        "{} model={} session={}  (type 'exit' to quit)",
        "connected".green(),
        cli.model,
        session.session_id
    );

    let mut history = Conversation::new(session.session_id.clone()).with_system(&cli.system);
    let stdin = std::io::stdin();

    loop {
        print!("{} ", ">".bold());
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt == "exit" || prompt == "quit" {
            break;
        }

        history.push_user(prompt);
        let stream = client
            .turns()
            .create_stream(
                &agent.agent_id,
                &session.session_id,
                TurnCreateRequest::from_user(prompt),
            )
            .await
            .context("failed to start turn")?;

        let mut acc = TurnAccumulator::new(session.session_id.clone());
        let mut renderer = Renderer::default();
        match drive(stream, &mut acc, |update| renderer.show(update)).await {
            Ok(message) => {
                println!();
                if acc.unrecognized_events() > 0 {
                    tracing::debug!(
                        count = acc.unrecognized_events(),
                        "skipped unrecognized stream events"
                    );
                }
                history.record(&message);
            }
            Err(e) => {
                println!();
                eprintln!("{} {e}", "stream failed:".red());
                let partial = acc.current_text();
                if !partial.is_empty() {
                    eprintln!("{} {partial}", "partial response:".dimmed());
                }
            }
        }
    }

    Ok(())
}
