//! Command-line definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rollcall_domain::ProfileCreationRequest;

/// rollcall - register and look up student profiles
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (JSON or TOML). Without it, env vars then standard paths are tried
    #[arg(short, long, env = "ROLLCALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use an in-process profile store instead of the remote one.
    /// Runs without store credentials; sign-in commands then target a local
    /// stack at http://127.0.0.1:54321
    #[arg(long)]
    pub memory: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "ROLLCALL_LOG_JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a profile, optionally signing the account up first
    Register(RegisterArgs),

    /// Sign in and show the profile for the signed-in identity
    Login {
        email: String,

        #[arg(long, env = "ROLLCALL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the profile stored for an email
    Lookup { email: String },

    /// Advisory check whether an email already has a profile
    Exists { email: String },

    /// Count-only probe of the profile store
    Check,

    /// Send a password reset email
    ResetPassword { email: String },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RegisterArgs {
    pub email: String,

    /// Sign the account up with the identity provider before creating the profile
    #[arg(long, env = "ROLLCALL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub group: String,

    #[arg(long)]
    pub year: i32,

    #[arg(long)]
    pub specialization: String,
}

impl RegisterArgs {
    pub fn to_request(&self) -> ProfileCreationRequest {
        ProfileCreationRequest {
            email: self.email.clone(),
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
            group: self.group.clone(),
            year: self.year,
            specialization: self.specialization.clone(),
        }
    }
}
