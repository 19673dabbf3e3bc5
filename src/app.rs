use crate::commands::{Dispatcher, Feedback, Outcome};
use crate::config::Config;
use crate::core::error::Result;
use crate::core::session::Session;
use crate::display;
use crate::input::{self, LineReader, ReadOutcome};
use crate::tips;
use futures::FutureExt;
use is_terminal::IsTerminal;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, warn};

pub struct Application {
    pub session: Session,
    pub dispatcher: Dispatcher,
    tipped_at: u64,
}

enum Step {
    Continue,
    Stop,
}

impl Application {
    pub fn new(session: Session, dispatcher: Dispatcher) -> Self {
        Self {
            session,
            dispatcher,
            tipped_at: 0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let interactive = std::io::stdin().is_terminal();
        let mut reader = if interactive {
            LineReader::interactive(
                Config::history_path(),
                self.session.config().terminal.history_size,
            )?
        } else {
            LineReader::piped()
        };

        if interactive {
            // Ctrl-C while a command runs stops the command, not the shell.
            tokio::spawn(async { while tokio::signal::ctrl_c().await.is_ok() {} });
            self.greet().await;
        }

        self.run_with(&mut reader, interactive).await;

        if let Err(e) = reader.save_history() {
            warn!("{}", e);
        }
        Ok(())
    }

    /// Reads and handles lines until an exit token, end of input or a
    /// broken reader.
    pub async fn run_with(&mut self, reader: &mut LineReader, interactive: bool) {
        loop {
            let prompt = if interactive {
                input::styled_prompt(
                    self.session.working_directory(),
                    self.session.conversational_mode(),
                )
            } else {
                String::new()
            };

            let line = match reader.read(&prompt) {
                Ok(ReadOutcome::Line(line)) => line,
                Ok(ReadOutcome::Interrupted) => {
                    if self.session.conversational_mode() {
                        self.session.toggle_conversation_mode();
                        display::render(&Feedback::Info("Exited chat mode".to_string()));
                    }
                    continue;
                }
                Ok(ReadOutcome::Eof) => {
                    display::goodbye("Goodbye!");
                    break;
                }
                Err(e) => {
                    error!("reading input failed: {}", e);
                    break;
                }
            };

            if let Step::Stop = contained(self.handle_line(&line)).await {
                break;
            }

            if interactive {
                // Keep file-name completion relative to where the user is.
                if let Err(e) = std::env::set_current_dir(self.session.working_directory()) {
                    warn!("could not follow directory change: {}", e);
                }
                self.show_tips();
            }
        }
    }

    async fn greet(&self) {
        if !self.session.ai_enabled() {
            display::banner(
                self.session.active_model(),
                self.dispatcher.assistant().base_url(),
                false,
            );
            display::ai_disabled_notice();
            return;
        }
        let available = self.dispatcher.assistant().is_available().await;
        info!(available, "assistance service probed");
        display::banner(
            self.session.active_model(),
            self.dispatcher.assistant().base_url(),
            available,
        );
    }

    async fn handle_line(&mut self, line: &str) -> Step {
        match self.dispatcher.dispatch(line, &mut self.session).await {
            Outcome::Continue(feedback) => {
                if let Some(feedback) = feedback {
                    display::render(&feedback);
                }
                Step::Continue
            }
            Outcome::Terminate(farewell) => {
                display::goodbye(&farewell);
                Step::Stop
            }
            Outcome::Delegate(command) => {
                self.run_delegated(&command).await;
                Step::Continue
            }
        }
    }

    async fn run_delegated(&self, command: &str) {
        let result = match self.dispatcher.delegate(command, &self.session) {
            Ok(result) => result,
            Err(e) => {
                display::render(&Feedback::Error(e.to_string()));
                return;
            }
        };

        display::command_output(&result);
        for note in self
            .dispatcher
            .follow_up(command, &result, &self.session)
            .await
        {
            display::render(&note);
        }
    }

    fn show_tips(&mut self) {
        let interval = self.session.config().terminal.tips_interval;
        let count = self.session.input_count();
        if interval == 0 || count == 0 || count % interval != 0 || count == self.tipped_at {
            return;
        }
        self.tipped_at = count;

        let tips = tips::contextual_tips(
            self.session.working_directory(),
            self.session.recent_inputs(),
        );
        display::tips(&tips);
    }
}

/// A panic while handling one line is reported and the session goes on.
async fn contained(line: impl Future<Output = Step>) -> Step {
    match AssertUnwindSafe(line).catch_unwind().await {
        Ok(step) => step,
        Err(_) => {
            error!("panic while handling a line");
            display::render(&Feedback::Error(
                "Internal error while handling that line; the session continues.".to_string(),
            ));
            Step::Continue
        }
    }
}
