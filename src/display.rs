use crate::commands::Feedback;
use crate::core::executor::CommandResult;
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use termimad::MadSkin;

pub fn banner(model: &str, base_url: &str, ai_available: bool) {
    let term = Term::stdout();
    let width = std::cmp::min(term.size().1 as usize, 72).max(40);

    println!("{}", style("─".repeat(width)).dim().cyan());
    println!(
        "{} {}",
        style("termsage").bold().cyan(),
        style(env!("CARGO_PKG_VERSION")).dim()
    );
    println!("Type a command, append ? for help (e.g. tar?), /chat to talk, help for more.");
    if ai_available {
        println!(
            "{} AI ready: {} at {}",
            style("●").green(),
            style(model).bold(),
            base_url
        );
    } else {
        println!(
            "{} AI unavailable at {}. Commands still run; start it with: ollama serve",
            style("●").yellow(),
            base_url
        );
    }
    println!("{}", style("─".repeat(width)).dim().cyan());
}

pub fn ai_disabled_notice() {
    println!(
        "{}",
        style("AI assistance is disabled. Enable it with: /set ai.enabled true").dim()
    );
}

pub fn render(feedback: &Feedback) {
    match feedback {
        Feedback::Success(text) => println!("{} {}", style("✓").bold().green(), text),
        Feedback::Info(text) => println!("{} {}", style("ℹ").bold().blue(), text),
        Feedback::Warning(text) => println!("{} {}", style("!").bold().yellow(), style(text).yellow()),
        Feedback::Error(text) => eprintln!("{} {}", style("✗").bold().red(), style(text).red()),
        Feedback::Text(text) => println!("{}", text),
        Feedback::Answer(text) => answer(text),
        Feedback::ClearScreen => {
            if Term::stdout().clear_screen().is_err() {
                // Not a terminal; ANSI clear is the best we can do.
                print!("\x1B[2J\x1B[1;1H");
                let _ = io::stdout().flush();
            }
        }
    }
}

/// Ticks on stderr until finished; draws nothing when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.dim} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Model output, rendered as Markdown.
pub fn answer(text: &str) {
    println!("\n{}", style("🤖 AI").bold().blue());
    let skin = MadSkin::default();
    skin.print_text(text);
    println!();
}

/// Output of a delegated command; stderr goes to stderr.
pub fn command_output(result: &CommandResult) {
    if !result.stdout.is_empty() {
        print!("{}", result.stdout);
        if !result.stdout.ends_with('\n') {
            println!();
        }
        let _ = io::stdout().flush();
    }
    if !result.stderr.is_empty() {
        eprint!("{}", style(&result.stderr).red());
        if !result.stderr.ends_with('\n') {
            eprintln!();
        }
    }
    if !result.success() {
        println!(
            "{}",
            style(format!("exit status {}", result.exit_status)).dim().red()
        );
    }
}

pub fn tips(tips: &[String]) {
    for tip in tips {
        println!("{} {}", style("💡").dim(), style(tip).dim());
    }
}

pub fn goodbye(message: &str) {
    println!("{}", style(message).bold().cyan());
}
