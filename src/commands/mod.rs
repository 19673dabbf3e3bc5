pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::Dispatcher;

/// Something to show the user after a line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
    /// Preformatted block, printed as-is.
    Text(String),
    /// Model output.
    Answer(String),
    ClearScreen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The session goes on, possibly changed.
    Continue(Option<Feedback>),
    /// The session ends; carries the farewell.
    Terminate(String),
    /// Not ours: run the line through the shell.
    Delegate(String),
}
