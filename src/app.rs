//! Terminal front end: wires the CLI to a [`SessionController`].

use std::io::Write;

use clap::CommandFactory;
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use crate::api::Role;
use crate::cli::{parse_chat_input, Args, ChatInput, Command};
use crate::config::{ClientConfig, FileConfig};
use crate::display::{print_header, render_section, render_status, render_turn};
use crate::document::DocumentFile;
use crate::render::render_report;
use crate::session::{SessionController, SessionEvent};
use crate::transport::{Backend, HttpBackend};

/// Resolve configuration from the config file (if any) and flags.
pub fn load_config(args: &Args) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    Ok(ClientConfig::from_sources(&file, &args.overrides())?)
}

pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if let Command::Completions { shell } = &args.command {
        let mut cmd = Args::command();
        clap_complete::generate(*shell, &mut cmd, "legal-lens", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&args)?;
    info!(base_url = %config.base_url, require_pdf = config.require_pdf, "configuration resolved");
    let require_pdf = config.require_pdf;
    let base_url = config.base_url.clone();
    let backend = HttpBackend::new(config);

    match args.command {
        Command::Ping => {
            let health = backend.health().await?;
            println!("{} {}", "ok".bright_green().bold(), health.message);
            Ok(())
        }
        Command::Chat { file } => {
            let doc = DocumentFile::from_path(&file).await?;
            print_header(&format!("Chat: {}", doc.name), &base_url);
            run_chat(backend, require_pdf, doc).await
        }
        Command::Analyze { file, html } => {
            let doc = DocumentFile::from_path(&file).await?;
            print_header(&format!("Analysis: {}", doc.name), &base_url);
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut ctl = SessionController::new(backend, require_pdf).with_events(tx);

            let outcome = ctl.analyze_document(&doc).await;
            drain_events(&mut rx);
            let sections = outcome?;
            if sections.is_empty() {
                // Unstructured replies were already shown as the status line.
                if ctl.ui().status.is_empty() {
                    println!("{}", "No recognised sections in the analysis.".bright_black());
                }
                return Ok(());
            }

            match html {
                Some(path) => {
                    tokio::fs::write(&path, render_report(&doc.name, &sections)).await?;
                    println!(
                        "Wrote {} sections to {}",
                        sections.len(),
                        path.display().to_string().bright_white()
                    );
                }
                None => {
                    for section in &sections {
                        println!("{}\n", render_section(section));
                    }
                }
            }
            Ok(())
        }
        Command::Completions { .. } => Ok(()),
    }
}

async fn run_chat<B: Backend>(
    backend: B,
    require_pdf: bool,
    doc: DocumentFile,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ctl = SessionController::new(backend, require_pdf).with_events(tx);

    if !ctl.upload_document(&doc).await {
        drain_events(&mut rx);
        return Err(ctl.ui().status.clone().into());
    }
    drain_events(&mut rx);
    println!("{}", "Type a question, /reset to start over, /quit to leave.".bright_black());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".bright_green());
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_chat_input(&line) {
            ChatInput::Quit => break,
            ChatInput::Reset => {
                ctl.reset();
                drain_events(&mut rx);
                if !ctl.upload_document(&doc).await {
                    drain_events(&mut rx);
                    return Err(ctl.ui().status.clone().into());
                }
                drain_events(&mut rx);
            }
            ChatInput::Message(text) => {
                let Some(pending) = ctl.begin_turn(text) else {
                    continue;
                };
                drain_events(&mut rx);
                let result = ctl.backend().chat(pending.request()).await;
                ctl.finish_turn(pending, result);
                drain_events(&mut rx);
            }
        }
    }
    Ok(())
}

/// Print whatever the controller published since the last drain.
fn drain_events(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            // The user's own line is already on screen.
            SessionEvent::TurnAppended(turn) if turn.role == Role::User => {}
            SessionEvent::TurnAppended(turn) => println!("{}\n", render_turn(&turn)),
            SessionEvent::StatusChanged { status, is_error } if !status.is_empty() => {
                eprintln!("{}", render_status(&status, is_error))
            }
            SessionEvent::LoadingChanged(true) => eprintln!("{}", "...".bright_black()),
            _ => {}
        }
    }
}
