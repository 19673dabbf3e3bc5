use crate::system::SystemInfo;

/// Keeps the tail of long stderr output, where the actual error usually is.
const MAX_ERROR_CHARS: usize = 2000;

const HELP_PROMPT: &str = "You are a helpful terminal assistant. Explain this command concisely:

Command: {command}
System: {os_info}, shell {shell}
Context: {context}

Provide:
1. What the command does
2. Common usage examples
3. Important flags/options
4. Any safety warnings if needed

Keep it concise and practical, and prefer examples that fit the context.";

const CHAT_PROMPT: &str = "You are a helpful terminal assistant on {os_info} using {shell}. \
The user is asking: {message}

Provide a helpful, practical response. If it's about terminal commands, include examples. \
Be concise but thorough.";

const ERROR_PROMPT: &str = "You are a helpful terminal assistant. A command failed on {os_info} ({shell}):

Command: {command}
Error: {error}

Provide specific suggestions to fix this error. Include:
1. Most likely cause
2. Specific commands to try
3. Alternative approaches if needed

Be concise and practical.";

pub fn help(command: &str, context: &str, system: &SystemInfo) -> String {
    HELP_PROMPT
        .replace("{os_info}", &system.os_info)
        .replace("{shell}", &system.shell_name())
        .replace("{context}", context)
        .replace("{command}", command)
}

pub fn chat(message: &str, system: &SystemInfo) -> String {
    CHAT_PROMPT
        .replace("{os_info}", &system.os_info)
        .replace("{shell}", &system.shell_name())
        .replace("{message}", message)
}

pub fn error_analysis(command: &str, stderr: &str, system: &SystemInfo) -> String {
    let error = tail(stderr.trim(), MAX_ERROR_CHARS);
    let error = if error.is_empty() {
        "(no error output)"
    } else {
        error
    };

    ERROR_PROMPT
        .replace("{os_info}", &system.os_info)
        .replace("{shell}", &system.shell_name())
        .replace("{command}", command)
        .replace("{error}", error)
}

fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let start = text
        .char_indices()
        .nth(count - max_chars)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &text[start..]
}
