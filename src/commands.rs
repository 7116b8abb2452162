use crate::presenter;
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::io::BufRead;
use std::path::PathBuf;
use tokio::sync::mpsc;

pub const HELP: &str = "\
Commands:
  login <username> <password>      log in
  register <username> <password>  create an account
  logout                           log out and reset
  file <path>                      select an image file
  camera start | camera stop       control the camera
  lang <en|hi|ta|te>               recommendation language
  analyze                          detect emotion and fetch songs
  status                           show the current state
  help                             show this help
  quit                             exit";

/// A user action read from the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Login { username: String, password: String },
    Register { username: String, password: String },
    Logout,
    SelectFile(PathBuf),
    StartCamera,
    StopCamera,
    Language(String),
    Analyze,
    Status,
    Help,
    Quit,
}

type Build = fn(&Captures<'_>) -> UiCommand;

fn rule(pattern: &str, build: Build) -> (Regex, Build) {
    (Regex::new(pattern).unwrap(), build)
}

/// Parses shell lines into `UiCommand`s
pub struct CommandParser {
    rules: Vec<(Regex, Build)>,
}

impl CommandParser {
    pub fn new() -> Self {
        let rules = vec![
            rule(r"(?i)^login\s+(\S+)\s+(\S+)$", |c| UiCommand::Login {
                username: c[1].to_string(),
                password: c[2].to_string(),
            }),
            rule(r"(?i)^register\s+(\S+)\s+(\S+)$", |c| UiCommand::Register {
                username: c[1].to_string(),
                password: c[2].to_string(),
            }),
            rule(r"(?i)^logout$", |_| UiCommand::Logout),
            rule(r#"(?i)^file\s+"?([^"]+?)"?$"#, |c| {
                UiCommand::SelectFile(PathBuf::from(&c[1]))
            }),
            rule(r"(?i)^camera\s+(?:start|on)$", |_| UiCommand::StartCamera),
            rule(r"(?i)^camera\s+(?:stop|off)$", |_| UiCommand::StopCamera),
            rule(r"(?i)^lang(?:uage)?\s+(\S+)$", |c| {
                UiCommand::Language(c[1].to_string())
            }),
            rule(r"(?i)^analy[sz]e$", |_| UiCommand::Analyze),
            rule(r"(?i)^status$", |_| UiCommand::Status),
            rule(r"(?i)^(?:help|\?)$", |_| UiCommand::Help),
            rule(r"(?i)^(?:quit|exit)$", |_| UiCommand::Quit),
        ];

        Self { rules }
    }

    pub fn parse(&self, line: &str) -> Option<UiCommand> {
        let line = line.trim();
        self.rules
            .iter()
            .find_map(|(re, build)| re.captures(line).map(|c| build(&c)))
    }
}

/// Read commands from stdin and forward them until EOF.
///
/// Blocks on stdin, so run it on a dedicated thread rather than the runtime.
pub fn monitor_stdin(tx: mpsc::Sender<UiCommand>) -> Result<()> {
    let parser = CommandParser::new();

    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match parser.parse(&line) {
            Some(cmd) => {
                tracing::debug!("Command: {:?}", cmd);
                if tx.blocking_send(cmd).is_err() {
                    break;
                }
            }
            None => presenter::notice(&format!("Unknown command: {} (type 'help')", line.trim())),
        }
    }

    tracing::debug!("stdin closed");
    Ok(())
}
