use std::env;
use std::path::Path;

/// How a command line is handed to the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Cmd,        // cmd.exe /C
    PowerShell, // powershell -Command
    Posix,      // sh, bash, zsh, fish: all take -c
}

impl ShellType {
    pub fn command_flag(&self) -> &'static str {
        match self {
            ShellType::Cmd => "/C",
            ShellType::PowerShell => "-Command",
            ShellType::Posix => "-c",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os_info: String,
    pub shell_path: String,
    pub shell_type: ShellType,
}

impl SystemInfo {
    pub fn new() -> Self {
        let info = os_info::get();
        let os_info = format!("{} {} {}", info.os_type(), info.version(), info.bitness());
        let (shell_path, shell_type) = detect_shell();

        SystemInfo {
            os_info,
            shell_path,
            shell_type,
        }
    }

    /// Short name of the interpreter, e.g. `zsh`.
    pub fn shell_name(&self) -> String {
        Path::new(&self.shell_path)
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("sh")
            .to_lowercase()
    }
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_shell() -> (String, ShellType) {
    if cfg!(target_os = "windows") {
        if env::var("PSModulePath").is_ok() {
            return ("powershell.exe".to_string(), ShellType::PowerShell);
        }
        (
            env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
            ShellType::Cmd,
        )
    } else {
        let shell_path = env::var("SHELL")
            .ok()
            .filter(|s| !s.is_empty() && Path::new(s).exists())
            .unwrap_or_else(|| "/bin/sh".to_string());
        (shell_path, ShellType::Posix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_an_interpreter() {
        let info = SystemInfo::new();
        assert!(!info.shell_path.is_empty());
        assert!(!info.os_info.is_empty());
        if cfg!(unix) {
            assert_eq!(info.shell_type, ShellType::Posix);
            assert_eq!(info.shell_type.command_flag(), "-c");
        }
    }
}
