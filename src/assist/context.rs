use std::path::Path;

/// A file whose presence says something about the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub file: &'static str,
    pub description: &'static str,
    /// The tool most worth a `?` in such a directory.
    pub tool: &'static str,
}

pub const MARKERS: &[Marker] = &[
    Marker {
        file: ".git",
        description: "a git repository",
        tool: "git",
    },
    Marker {
        file: "package.json",
        description: "a Node.js project",
        tool: "npm",
    },
    Marker {
        file: "Dockerfile",
        description: "a Docker build context",
        tool: "docker",
    },
    Marker {
        file: "Cargo.toml",
        description: "a Rust project",
        tool: "cargo",
    },
    Marker {
        file: "requirements.txt",
        description: "a Python project",
        tool: "pip",
    },
    Marker {
        file: "pyproject.toml",
        description: "a Python project",
        tool: "pip",
    },
    Marker {
        file: "Makefile",
        description: "a Makefile",
        tool: "make",
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContext {
    found: Vec<Marker>,
}

impl ProjectContext {
    pub fn detect(dir: &Path) -> Self {
        let mut found: Vec<Marker> = Vec::new();
        for marker in MARKERS {
            if dir.join(marker.file).exists()
                && !found.iter().any(|m| m.description == marker.description)
            {
                found.push(*marker);
            }
        }
        Self { found }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.found
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "no project files detected in the current directory".to_string();
        }
        let kinds: Vec<&str> = self.found.iter().map(|m| m.description).collect();
        format!("the current directory is {}", kinds.join(" and "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_directory_has_no_context() {
        let dir = TempDir::new().unwrap();
        let context = ProjectContext::detect(dir.path());

        assert!(context.is_empty());
        assert!(context.describe().contains("no project files"));
    }

    #[test]
    fn detects_git_and_docker_markers() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("Dockerfile"), "FROM scratch\n").unwrap();

        let context = ProjectContext::detect(dir.path());
        let tools: Vec<&str> = context.markers().iter().map(|m| m.tool).collect();

        assert_eq!(tools, vec!["git", "docker"]);
        assert_eq!(
            context.describe(),
            "the current directory is a git repository and a Docker build context"
        );
    }

    #[test]
    fn python_is_reported_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("requirements.txt"), "").unwrap();
        fs::write(dir.path().join("pyproject.toml"), "").unwrap();

        let context = ProjectContext::detect(dir.path());
        assert_eq!(context.markers().len(), 1);
    }
}
