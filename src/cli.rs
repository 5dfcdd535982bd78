use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "legal-lens")]
#[command(version)]
#[command(about = "Upload a PDF to the legal analysis backend, then chat about it or get a sectioned analysis")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL (overrides config file and host heuristic)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Host the front end runs on; localhost/loopback selects the local backend
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Path to a TOML config file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Upload files even when they don't look like PDFs
    #[arg(long, global = true)]
    pub allow_any_file: bool,

    /// Debug-level logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Upload a document and chat about it interactively
    Chat {
        /// PDF to upload
        file: PathBuf,
    },
    /// One-shot analysis split into sections
    Analyze {
        /// PDF to analyze
        file: PathBuf,

        /// Write HTML cards to this path instead of printing to the terminal
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Check that the backend is reachable
    Ping,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            host: self.host.clone(),
            allow_any_file: self.allow_any_file,
        }
    }
}

/// What a line typed in chat mode means.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatInput<'a> {
    Quit,
    Reset,
    Message(&'a str),
}

pub fn parse_chat_input(line: &str) -> ChatInput<'_> {
    match line.trim() {
        "/quit" | "/exit" => ChatInput::Quit,
        "/reset" => ChatInput::Reset,
        _ => ChatInput::Message(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_chat() {
        let args = Args::parse_from(["legal-lens", "chat", "lease.pdf"]);
        assert_eq!(
            args.command,
            Command::Chat {
                file: PathBuf::from("lease.pdf")
            }
        );
        assert!(args.base_url.is_none());
        assert!(!args.allow_any_file);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_parse_analyze_with_html() {
        let args = Args::parse_from(["legal-lens", "analyze", "lease.pdf", "--html", "out.html"]);
        assert_eq!(
            args.command,
            Command::Analyze {
                file: PathBuf::from("lease.pdf"),
                html: Some(PathBuf::from("out.html")),
            }
        );
    }

    #[test]
    fn test_args_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "legal-lens",
            "ping",
            "--base-url",
            "http://127.0.0.1:8000",
            "--verbose",
        ]);
        assert_eq!(args.command, Command::Ping);
        assert_eq!(args.base_url.as_deref(), Some("http://127.0.0.1:8000"));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "legal-lens",
            "--host",
            "localhost",
            "--allow-any-file",
            "chat",
            "x.pdf",
        ]);
        let o = args.overrides();
        assert_eq!(o.host.as_deref(), Some("localhost"));
        assert!(o.allow_any_file);
        assert!(o.base_url.is_none());
    }

    #[test]
    fn test_args_config_short() {
        let args = Args::parse_from(["legal-lens", "-c", "cfg.toml", "ping"]);
        assert_eq!(args.config, Some(PathBuf::from("cfg.toml")));
    }

    #[test]
    fn test_args_completions() {
        let args = Args::parse_from(["legal-lens", "completions", "bash"]);
        assert_eq!(args.command, Command::Completions { shell: Shell::Bash });
    }

    #[test]
    fn test_args_missing_subcommand_is_error() {
        assert!(Args::try_parse_from(["legal-lens"]).is_err());
    }

    #[test]
    fn test_chat_input_commands() {
        assert_eq!(parse_chat_input("/quit"), ChatInput::Quit);
        assert_eq!(parse_chat_input(" /exit \n"), ChatInput::Quit);
        assert_eq!(parse_chat_input("/reset"), ChatInput::Reset);
        assert_eq!(parse_chat_input("what is clause 4?"), ChatInput::Message("what is clause 4?"));
    }
}
