use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the config file.
    #[clap(short, long, default_value = "skillex.yaml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start skillex as a service.
    Daemon {},

    /// Extract skills from a single job description and print them as JSON.
    Extract {
        /// The job description text. Read from stdin when omitted.
        description: Option<String>,
    },
}
