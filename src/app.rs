use crate::analysis::{AnalysisPipeline, HttpEmotionService};
use crate::auth::CredentialStore;
use crate::capture::{JpegFrameEncoder, SnapshotCamera, still};
use crate::commands::{self, UiCommand};
use crate::config::Config;
use crate::error::{AppError, InvalidInputError};
use crate::language::Language;
use crate::orchestrator::Orchestrator;
use crate::presenter;
use crate::services::CameraHandle;

use anyhow::Result;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct App {
    credentials: CredentialStore,
    user: Option<String>,
    orchestrator: Orchestrator,
    command_rx: mpsc::Receiver<UiCommand>,
    presenter: Option<JoinHandle<()>>,
}

impl App {
    /// Must be called inside a LocalSet.
    pub fn new(config: Config) -> Result<Self> {
        let camera = Self::setup_camera(&config);
        let service = HttpEmotionService::new(&config.api_url, Duration::from_secs(config.timeout))?;
        let pipeline = AnalysisPipeline::new(Rc::new(service));
        let orchestrator = Orchestrator::new(camera, pipeline, config.language);

        let presenter_task = tokio::spawn(presenter::present_states(orchestrator.subscribe()));
        let command_rx = Self::setup_command_input();

        tracing::info!("Using emotion service at {}", config.api_url);
        presenter::notice("Welcome! Log in to get your music recommendations (type 'help').");

        Ok(Self::from_parts(orchestrator, command_rx, Some(presenter_task)))
    }

    fn from_parts(
        orchestrator: Orchestrator,
        command_rx: mpsc::Receiver<UiCommand>,
        presenter: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            credentials: CredentialStore::default(),
            user: None,
            orchestrator,
            command_rx,
            presenter,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        loop {
            tracing::debug!("Main loop: waiting for event");
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(UiCommand::Quit) => break,
                    None => {
                        tracing::info!("Input closed");
                        self.finish_pending().await;
                        break;
                    }
                    Some(command) => {
                        if let Err(e) = self.handle_command(command).await {
                            tracing::warn!("Command failed: {}", e);
                            presenter::notice(&format!("Error: {}", e));
                        }
                    }
                },
                Some(completion) = self.orchestrator.next_completion() => {
                    self.orchestrator.apply_completion(completion);
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    break;
                }
            }
        }

        self.orchestrator.shutdown().await;
        tracing::info!("Shutdown complete");

        // Closing the state channel lets the presenter print the last state and return
        let presenter_task = self.presenter.take();
        drop(self);
        if let Some(task) = presenter_task {
            let _ = task.await;
        }
        Ok(())
    }

    /// Let a running analysis finish so its result is still shown.
    async fn finish_pending(&mut self) {
        if !self.orchestrator.state().is_analyzing() {
            return;
        }

        tracing::info!("Waiting for the running analysis before exit");
        tokio::select! {
            _ = self.orchestrator.settle() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, abandoning analysis");
            }
        }
    }

    async fn handle_command(&mut self, command: UiCommand) -> Result<(), AppError> {
        match command {
            UiCommand::Help => presenter::notice(commands::HELP),
            UiCommand::Login { username, password } => self.handle_login(&username, &password),
            UiCommand::Register { username, password } => {
                self.credentials.register(&username, &password)?;
                tracing::info!("Registered user {}", username);
                presenter::notice("Registration successful! Please log in.");
            }
            UiCommand::Logout => self.handle_logout().await,
            UiCommand::Quit => {}
            _ if self.user.is_none() => presenter::notice("Please log in first."),
            UiCommand::SelectFile(path) => self.handle_select_file(&path).await?,
            UiCommand::StartCamera => {
                self.orchestrator.start_camera().await?;
            }
            UiCommand::StopCamera => self.orchestrator.stop_camera().await,
            UiCommand::Language(code) => {
                let language: Language = code.parse()?;
                if !self.orchestrator.set_language(language) {
                    presenter::notice("Cannot change language while analyzing.");
                }
            }
            UiCommand::Analyze => self.orchestrator.analyze().await?,
            UiCommand::Status => {
                presenter::notice(&format!(
                    "Language: {}\nSource: {}\n{}",
                    self.orchestrator.language(),
                    presenter::describe_source(self.orchestrator.current_source()),
                    presenter::render(&self.orchestrator.state())
                ));
            }
        }

        Ok(())
    }

    fn handle_login(&mut self, username: &str, password: &str) {
        if self.credentials.login(username, password) {
            tracing::info!("User {} logged in", username);
            self.user = Some(username.to_string());
            presenter::notice(&format!("Logged in as {}.", username));
        } else {
            presenter::notice("Invalid credentials!");
        }
    }

    async fn handle_logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!("User {} logged out", user);
            self.orchestrator.reset().await;
            presenter::notice("Logged out.");
        }
    }

    async fn handle_select_file(&mut self, path: &Path) -> Result<(), AppError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| InvalidInputError::Unreadable(format!("{}: {}", path.display(), e)))?;
        let mime = still::sniff_mime(&bytes);

        self.orchestrator.select_file(bytes, &mime).await
    }

    fn setup_camera(config: &Config) -> CameraHandle {
        let device = SnapshotCamera::new(&config.camera_feed_path);
        let encoder = JpegFrameEncoder::new(config.jpeg_quality);

        // Spawned with spawn_local because device streams are !Send
        CameraHandle::spawn(Box::new(device), Box::new(encoder))
    }

    fn setup_command_input() -> mpsc::Receiver<UiCommand> {
        let (command_tx, command_rx) = mpsc::channel(10);
        std::thread::spawn(move || {
            if let Err(e) = commands::monitor_stdin(command_tx) {
                tracing::error!("Command input failed: {}", e);
            }
        });
        command_rx
    }
}
