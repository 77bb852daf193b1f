//! HealthBridge CLI - local accounts and symptom checks in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{account, assess, config, logs, status};

/// HealthBridge - local accounts and symptom checks
#[derive(Parser)]
#[command(name = "hb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        /// Full name
        full_name: String,
        /// Email address
        email: String,
        /// Password (prompted or read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Accept the Terms of Service and Privacy Policy
        #[arg(long)]
        accept_terms: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in with email and password
    Login {
        /// Email address
        email: String,
        /// Password (prompted or read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether an account exists for an email
    Exists {
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the account registered under an email
    Find {
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every registered account
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Request a password reset
    ForgotPassword {
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show store status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assess vital signs and symptoms
    Assess(assess::AssessArgs),

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// View and change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { full_name, email, password, accept_terms, json } => {
            account::register(&full_name, &email, password, accept_terms, json)
        }
        Commands::Login { email, password, json } => account::login(&email, password, json),
        Commands::Exists { email, json } => account::exists(&email, json),
        Commands::Find { email, json } => account::find(&email, json),
        Commands::Clear { force, json } => account::clear(force, json),
        Commands::ForgotPassword { email, json } => account::forgot_password(&email, json),
        Commands::Status { json } => status::run(json),
        Commands::Assess(args) => assess::run(args),
        Commands::Logs { command } => logs::run(command),
        Commands::Config { command } => config::run(command),
    }
}
