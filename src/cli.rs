use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Parser)]
#[command(name = "naughty-nice", about = "Naughty or nice quiz backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve(ServeArgs),
    /// Hammer a running instance and report latencies
    Load(LoadArgs),
}

impl Cli {
    /// Subcommand to run, `serve` when none was given.
    pub fn command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }
}

// Serialized into the configuration layers, so only flags that were
// actually passed override the file and environment values.
#[derive(Debug, Default, Args, Serialize)]
pub struct ServeArgs {
    /// Address to bind the HTTP listener to
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Port to bind the HTTP listener to
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Redis URL of the leaderboard cache
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,
    /// MongoDB connection string of the document store
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mongodb_uri: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct LoadArgs {
    /// Base URL of the instance under test
    #[arg(long, default_value = "http://localhost:3000")]
    pub target: String,
    #[arg(long, value_enum, default_value_t = Scenario::Mixed)]
    pub scenario: Scenario,
    /// Number of requests in flight at once
    #[arg(long, default_value_t = 10)]
    pub users: usize,
    /// Total number of requests to send
    #[arg(long, default_value_t = 200)]
    pub requests: usize,
    #[arg(long, default_value_t = 5)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Leaderboard reads only
    Leaderboard,
    /// Score submissions only
    Submit,
    /// Mostly reads, one submission every ten requests
    Mixed,
    /// Full front-end sessions: health, questions, submission, leaderboard
    Journey,
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scenario::Leaderboard => write!(f, "leaderboard"),
            Scenario::Submit => write!(f, "submit"),
            Scenario::Mixed => write!(f, "mixed"),
            Scenario::Journey => write!(f, "journey"),
        }
    }
}
