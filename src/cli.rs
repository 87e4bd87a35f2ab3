use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "alumni-matcher")]
#[command(version, about = "Find alumni by skill, ranked by proficiency")]
pub struct Cli {
    /// SQLite database path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// SQL schema file used by setup
    #[arg(long, global = true)]
    pub schema_file: Option<PathBuf>,

    /// JSON config file (defaults to config.json in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recreate the database from the schema file, optionally loading a CSV
    Setup {
        /// CSV with FirstName, LastName, SkillName, ProficiencyLevel columns
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List alumni with a skill, best first
    Lookup {
        /// Skill name (case-insensitive)
        skill: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all known skill names
    Skills,

    /// Print the schema generated from the table definitions
    Schema,

    /// Start the web lookup form
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
