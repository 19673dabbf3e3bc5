use crate::assist::context::ProjectContext;
use std::collections::VecDeque;
use std::path::Path;

const MAX_TIPS: usize = 2;
const MAX_SUGGESTIONS: usize = 3;

const COMMON_COMMANDS: &[&str] = &[
    "ls", "cd", "pwd", "mkdir", "rm", "cp", "mv", "cat", "less", "grep", "find", "git", "docker",
    "npm", "pip", "python", "node", "cargo", "make", "vim", "nano", "tar", "curl", "wget", "ssh",
    "scp", "systemctl", "ps", "top", "kill", "chmod", "chown", "df", "du",
];

/// At most two hints based on the directory and the last input.
pub fn contextual_tips(dir: &Path, recent_inputs: &VecDeque<String>) -> Vec<String> {
    let mut tips: Vec<String> = ProjectContext::detect(dir)
        .markers()
        .iter()
        .map(|m| {
            format!(
                "This looks like {}. Try: {}? for {} help",
                m.description, m.tool, m.tool
            )
        })
        .collect();

    if let Some(last) = recent_inputs.back() {
        let program = last.split_whitespace().next().unwrap_or("");
        if program == "git" && !last.ends_with('?') {
            tips.push("Hint: add ? to a command for help (e.g. git?)".to_string());
        }
    }

    tips.truncate(MAX_TIPS);
    tips
}

/// Guesses for a program name the shell could not find.
pub fn suggest_commands(program: &str) -> Vec<String> {
    if program.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &str)> = COMMON_COMMANDS
        .iter()
        .filter(|cmd| **cmd != program)
        .filter_map(|cmd| {
            let distance = edit_distance(program, cmd);
            if cmd.starts_with(program) {
                Some((0, *cmd))
            } else if distance <= 2 && distance < program.len() {
                Some((distance, *cmd))
            } else {
                None
            }
        })
        .collect();
    scored.sort();

    let mut suggestions: Vec<String> = scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, cmd)| cmd.to_string())
        .collect();
    if !program.ends_with('?') {
        suggestions.push(format!("{}?", program));
    }
    suggestions
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }
    previous[b.len()]
}
