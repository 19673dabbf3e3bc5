use super::registry::{self, Builtin, Command, Parameterized};
use super::{Feedback, Outcome, handler};
use crate::assist::{AssistanceClient, Reply};
use crate::core::error::Result;
use crate::core::executor::{COMMAND_NOT_FOUND, CommandResult, execute_command};
use crate::core::session::Session;
use crate::system::SystemInfo;
use crate::tips;
use regex::Regex;
use tracing::debug;

pub struct Dispatcher {
    assistant: AssistanceClient,
    system: SystemInfo,
    env_var: Regex,
}

impl Dispatcher {
    pub fn new(assistant: AssistanceClient, system: SystemInfo) -> Result<Self> {
        Ok(Self {
            assistant,
            system,
            env_var: handler::env_var_pattern()?,
        })
    }

    pub fn assistant(&self) -> &AssistanceClient {
        &self.assistant
    }

    /// Classifies one line and handles everything except delegated commands,
    /// which come back as [`Outcome::Delegate`] for [`Dispatcher::delegate`].
    pub async fn dispatch(&self, line: &str, session: &mut Session) -> Outcome {
        let line = line.trim();
        if line.is_empty() {
            return Outcome::Continue(None);
        }
        session.record_input(line);

        let command = registry::classify(line, session.conversational_mode());
        debug!(?command, "dispatching");

        match command {
            Command::Exit => Outcome::Terminate("Goodbye!".to_string()),
            Command::Builtin(builtin) => Outcome::Continue(self.run_builtin(builtin, session).await),
            Command::Parameterized(kind, arg) => {
                Outcome::Continue(self.run_parameterized(kind, arg, session).await)
            }
            Command::HelpRequest("") => Outcome::Continue(Some(Feedback::Info(
                "Usage: <command>? (e.g. git?, docker?, ls?)".to_string(),
            ))),
            Command::HelpRequest(name) => {
                let reply = self.assistant.get_help(session, name).await;
                Outcome::Continue(Some(reply_feedback(reply)))
            }
            Command::Chat(message) => {
                let reply = self.assistant.chat(session, message).await;
                Outcome::Continue(Some(reply_feedback(reply)))
            }
            Command::Delegate(line) => Outcome::Delegate(line.to_string()),
        }
    }

    async fn run_builtin(&self, builtin: Builtin, session: &mut Session) -> Option<Feedback> {
        let feedback = match builtin {
            Builtin::Help => handler::help(),
            Builtin::ToggleChat => handler::toggle_chat(session),
            Builtin::ClearScreen => Feedback::ClearScreen,
            Builtin::ListModels => handler::list_models(&self.assistant, session).await,
            Builtin::ShowConfig => handler::show_config(session),
            Builtin::History => handler::history(session),
        };
        Some(feedback)
    }

    async fn run_parameterized(
        &self,
        kind: Parameterized,
        arg: &str,
        session: &mut Session,
    ) -> Option<Feedback> {
        match kind {
            Parameterized::SwitchModel => {
                Some(handler::switch_model(&self.assistant, session, arg).await)
            }
            Parameterized::ChangeDirectory => handler::change_directory(session, arg, &self.env_var),
            Parameterized::ConfigValue => Some(handler::config_value(session, arg)),
            Parameterized::SetConfig => {
                Some(handler::set_config(&self.assistant, session, arg).await)
            }
        }
    }

    /// Runs a delegated line in the session's directory.
    pub fn delegate(&self, line: &str, session: &Session) -> Result<CommandResult> {
        execute_command(line, session.working_directory(), &self.system)
    }

    pub fn wants_error_analysis(&self, result: &CommandResult, session: &Session) -> bool {
        !result.success() && session.ai_enabled() && session.config().ai.help_on_error
    }

    /// Suggestions and, when enabled, AI analysis for a failed command.
    pub async fn follow_up(
        &self,
        line: &str,
        result: &CommandResult,
        session: &Session,
    ) -> Vec<Feedback> {
        let mut notes = Vec::new();
        if result.success() {
            return notes;
        }

        if result.exit_status == COMMAND_NOT_FOUND {
            let program = line.split_whitespace().next().unwrap_or_default();
            let suggestions = tips::suggest_commands(program);
            if !suggestions.is_empty() {
                notes.push(Feedback::Info(format!(
                    "Did you mean: {}",
                    suggestions.join(", ")
                )));
            }
        }

        if self.wants_error_analysis(result, session) {
            let reply = self
                .assistant
                .analyze_error(session, line, &result.stderr)
                .await;
            notes.push(reply_feedback(reply));
        }

        notes
    }
}

fn reply_feedback(reply: Reply) -> Feedback {
    let text = reply.text().to_string();
    if reply.is_generated() {
        Feedback::Answer(text)
    } else {
        Feedback::Warning(text)
    }
}
