use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "AI-assisted interactive shell", long_about = None)]
pub struct Args {
    /// Settings file to use instead of ~/.termsage/config.yaml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Model for this session only (not saved)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Inference service URL for this session only
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Run without AI assistance
    #[arg(long)]
    pub no_ai: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
