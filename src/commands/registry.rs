//! Fixed table of recognized inputs and the classifier over it.
//! All matching is exact and case-sensitive.

pub const HELP_MARKER: char = '?';

pub const EXIT_TOKENS: &[&str] = &["exit", "/exit", "quit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Help,
    ToggleChat,
    ClearScreen,
    ListModels,
    ShowConfig,
    History,
}

/// Built-ins that take an argument after the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameterized {
    SwitchModel,
    ChangeDirectory,
    ConfigValue,
    SetConfig,
}

pub struct BuiltinSpec<T> {
    pub token: &'static str,
    pub kind: T,
    pub usage: &'static str,
}

pub const BUILTINS: &[BuiltinSpec<Builtin>] = &[
    BuiltinSpec {
        token: "help",
        kind: Builtin::Help,
        usage: "help - Show this reference",
    },
    BuiltinSpec {
        token: "/chat",
        kind: Builtin::ToggleChat,
        usage: "/chat - Toggle chat mode (every line goes to the AI)",
    },
    BuiltinSpec {
        token: "clear",
        kind: Builtin::ClearScreen,
        usage: "clear - Clear the screen",
    },
    BuiltinSpec {
        token: "/models",
        kind: Builtin::ListModels,
        usage: "/models - List installed models",
    },
    BuiltinSpec {
        token: "/config",
        kind: Builtin::ShowConfig,
        usage: "/config [key] - Show the configuration, or one value (e.g. ai.model)",
    },
    BuiltinSpec {
        token: "/history",
        kind: Builtin::History,
        usage: "/history - Show recent inputs",
    },
];

pub const PARAMETERIZED: &[BuiltinSpec<Parameterized>] = &[
    BuiltinSpec {
        token: "/model",
        kind: Parameterized::SwitchModel,
        usage: "/model <name> - Switch the AI model",
    },
    BuiltinSpec {
        token: "cd",
        kind: Parameterized::ChangeDirectory,
        usage: "cd [path] - Change directory",
    },
    BuiltinSpec {
        token: "/config",
        kind: Parameterized::ConfigValue,
        usage: "",
    },
    BuiltinSpec {
        token: "/set",
        kind: Parameterized::SetConfig,
        usage: "/set <key> <value> - Change a setting (e.g. /set ai.help_on_error false)",
    },
];

/// What a trimmed, non-empty line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Builtin(Builtin),
    /// The argument is trimmed and may be empty.
    Parameterized(Parameterized, &'a str),
    /// The line minus the marker, trimmed; may be empty.
    HelpRequest(&'a str),
    Chat(&'a str),
    Delegate(&'a str),
}

pub fn classify(line: &str, conversational_mode: bool) -> Command<'_> {
    if EXIT_TOKENS.contains(&line) {
        return Command::Exit;
    }

    if let Some(spec) = BUILTINS.iter().find(|spec| spec.token == line) {
        return Command::Builtin(spec.kind);
    }

    for spec in PARAMETERIZED {
        if let Some(rest) = line.strip_prefix(spec.token) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return Command::Parameterized(spec.kind, rest.trim());
            }
        }
    }

    if let Some(command) = line.strip_suffix(HELP_MARKER) {
        return Command::HelpRequest(command.trim());
    }

    if conversational_mode {
        return Command::Chat(line);
    }

    Command::Delegate(line)
}

/// Every token the shell handles itself, for completion.
pub fn command_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = EXIT_TOKENS.to_vec();
    names.extend(BUILTINS.iter().map(|spec| spec.token));
    names.extend(PARAMETERIZED.iter().map(|spec| spec.token));
    names.sort_unstable();
    names.dedup();
    names
}

pub fn usage_lines() -> Vec<&'static str> {
    BUILTINS
        .iter()
        .map(|spec| spec.usage)
        .chain(PARAMETERIZED.iter().map(|spec| spec.usage))
        .filter(|usage| !usage.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_tokens_win() {
        for token in EXIT_TOKENS {
            assert_eq!(classify(token, false), Command::Exit);
            assert_eq!(classify(token, true), Command::Exit);
        }
    }

    #[test]
    fn every_builtin_token_is_recognized() {
        for spec in BUILTINS {
            assert_eq!(classify(spec.token, false), Command::Builtin(spec.kind));
            assert_eq!(classify(spec.token, true), Command::Builtin(spec.kind));
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(classify("EXIT", false), Command::Delegate("EXIT"));
        assert_eq!(classify("Clear", false), Command::Delegate("Clear"));
        assert_eq!(classify("/Models", false), Command::Delegate("/Models"));
    }

    #[test]
    fn parameterized_tokens_split_their_argument() {
        assert_eq!(
            classify("/model   mistral ", false),
            Command::Parameterized(Parameterized::SwitchModel, "mistral")
        );
        assert_eq!(
            classify("/model", false),
            Command::Parameterized(Parameterized::SwitchModel, "")
        );
        assert_eq!(
            classify("cd", false),
            Command::Parameterized(Parameterized::ChangeDirectory, "")
        );
        assert_eq!(
            classify("/config ai.model", false),
            Command::Parameterized(Parameterized::ConfigValue, "ai.model")
        );
    }

    #[test]
    fn token_prefixes_of_other_words_fall_through() {
        assert_eq!(classify("/models", false), Command::Builtin(Builtin::ListModels));
        assert_eq!(classify("cdrecord x", false), Command::Delegate("cdrecord x"));
        assert_eq!(classify("/modelx", false), Command::Delegate("/modelx"));
    }

    #[test]
    fn trailing_marker_is_a_help_request() {
        assert_eq!(classify("ls?", false), Command::HelpRequest("ls"));
        assert_eq!(classify("git commit ?", true), Command::HelpRequest("git commit"));
        assert_eq!(classify("?", false), Command::HelpRequest(""));
    }

    #[test]
    fn chat_mode_takes_everything_else() {
        assert_eq!(classify("what is inode", true), Command::Chat("what is inode"));
        assert_eq!(classify("what is inode", false), Command::Delegate("what is inode"));
    }

    #[test]
    fn names_cover_all_tokens_once() {
        let names = command_names();
        assert!(names.contains(&"/model"));
        assert!(names.contains(&"quit"));
        assert_eq!(names.iter().filter(|n| **n == "/config").count(), 1);
    }
}
