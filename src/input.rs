use crate::commands::registry;
use crate::core::error::{Result, TermsageError};

use console::style;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use std::borrow::Cow;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Built-in tokens for the first word, file names everywhere else
pub struct ShellCompleter {
    filename_completer: FilenameCompleter,
    command_names: Vec<&'static str>,
}

impl ShellCompleter {
    pub fn new() -> Self {
        Self {
            filename_completer: FilenameCompleter::new(),
            command_names: registry::command_names(),
        }
    }

    fn complete_command(&self, word: &str) -> Vec<Pair> {
        self.command_names
            .iter()
            .filter(|name| name.starts_with(word))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect()
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let word = head.trim_start();
        if !word.is_empty() && !word.contains(char::is_whitespace) {
            let matches = self.complete_command(word);
            if !matches.is_empty() {
                return Ok((pos - word.len(), matches));
            }
        }

        self.filename_completer.complete(line, pos, ctx)
    }
}

pub struct ShellHelper {
    completer: ShellCompleter,
    hinter: HistoryHinter,
}

impl ShellHelper {
    pub fn new() -> Self {
        Self {
            completer: ShellCompleter::new(),
            hinter: HistoryHinter {},
        }
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ShellHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }
}

// Shell lines may legitimately contain unbalanced brackets.
impl Validator for ShellHelper {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C
    Interrupted,
    /// Ctrl-D or end of piped input
    Eof,
}

/// Line source: an editor on a terminal, plain lines when stdin is piped.
pub enum LineReader {
    Interactive {
        editor: Box<Editor<ShellHelper, FileHistory>>,
        history_path: PathBuf,
    },
    Piped(Box<dyn BufRead>),
    #[cfg(test)]
    Scripted(std::collections::VecDeque<ReadOutcome>),
}

impl LineReader {
    pub fn interactive(history_path: PathBuf, history_size: usize) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(false)
            .max_history_size(history_size.max(1))
            .map_err(|e| TermsageError::Input(format!("Invalid history size: {}", e)))?
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(config)
            .map_err(|e| TermsageError::Input(format!("Failed to create line editor: {}", e)))?;
        editor.set_helper(Some(ShellHelper::new()));

        if let Err(e) = editor.load_history(&history_path) {
            debug!("no history loaded from {}: {}", history_path.display(), e);
        }

        Ok(LineReader::Interactive {
            editor: Box::new(editor),
            history_path,
        })
    }

    pub fn piped() -> Self {
        Self::from_reader(io::stdin().lock())
    }

    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        LineReader::Piped(Box::new(reader))
    }

    pub fn read(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self {
            LineReader::Interactive { editor, .. } => match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(e) = editor.add_history_entry(line.as_str()) {
                            warn!("could not add history entry: {}", e);
                        }
                    }
                    Ok(ReadOutcome::Line(line))
                }
                Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
                Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
                Err(err) => Err(TermsageError::Input(format!("Input error: {}", err))),
            },
            LineReader::Piped(stdin) => {
                let mut line = String::new();
                match stdin.read_line(&mut line)? {
                    0 => Ok(ReadOutcome::Eof),
                    _ => Ok(ReadOutcome::Line(line.trim_end_matches(['\n', '\r']).to_string())),
                }
            }
            #[cfg(test)]
            LineReader::Scripted(outcomes) => Ok(outcomes.pop_front().unwrap_or(ReadOutcome::Eof)),
        }
    }

    pub fn save_history(&mut self) -> Result<()> {
        let LineReader::Interactive {
            editor,
            history_path,
        } = self
        else {
            return Ok(());
        };

        if let Some(parent) = history_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        editor
            .save_history(history_path.as_path())
            .map_err(|e| TermsageError::Input(format!("Failed to save history: {}", e)))
    }
}

/// `~/src/app [chat] $ `, with the home directory abbreviated.
pub fn prompt_text(dir: &Path, home: Option<&Path>, conversational: bool) -> String {
    let shown = match home.and_then(|h| dir.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => dir.display().to_string(),
    };
    let mode = if conversational { " [chat]" } else { "" };
    format!("{}{} $ ", shown, mode)
}

pub fn styled_prompt(dir: &Path, conversational: bool) -> String {
    let plain = prompt_text(dir, dirs::home_dir().as_deref(), conversational);
    if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        plain
    } else if conversational {
        style(plain).bold().magenta().to_string()
    } else {
        style(plain).bold().cyan().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piped_lines_lose_their_line_endings() {
        let mut reader = LineReader::from_reader(io::Cursor::new("ls -la\r\necho hi\n"));

        assert_eq!(reader.read("").unwrap(), ReadOutcome::Line("ls -la".to_string()));
        assert_eq!(reader.read("").unwrap(), ReadOutcome::Line("echo hi".to_string()));
        assert_eq!(reader.read("").unwrap(), ReadOutcome::Eof);
        assert!(reader.save_history().is_ok());
    }

    #[test]
    fn prompt_abbreviates_home() {
        let home = Path::new("/home/ada");
        assert_eq!(prompt_text(Path::new("/home/ada"), Some(home), false), "~ $ ");
        assert_eq!(
            prompt_text(Path::new("/home/ada/src/app"), Some(home), false),
            "~/src/app $ "
        );
        assert_eq!(prompt_text(Path::new("/tmp"), Some(home), true), "/tmp [chat] $ ");
        assert_eq!(prompt_text(Path::new("/tmp"), None, false), "/tmp $ ");
    }

    #[test]
    fn first_word_completes_to_builtins() {
        let completer = ShellCompleter::new();
        let names: Vec<String> = completer
            .complete_command("/mo")
            .into_iter()
            .map(|p| p.replacement)
            .collect();
        assert_eq!(names, vec!["/model".to_string(), "/models".to_string()]);
        assert!(completer.complete_command("zz").is_empty());
    }
}
