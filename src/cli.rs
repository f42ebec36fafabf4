use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "tfvar",
    about = "tfvar: update Terraform Cloud / Enterprise workspace variables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config (defaults to <config dir>/tfvar/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API address (falls back to TFE_ADDRESS, then https://app.terraform.io)
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set the value of a workspace variable, looked up by key.
    /// Example:
    ///   tfvar update-value --org acme --workspace prod --key region --value eu-west-1
    UpdateValue(UpdateValueArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::UpdateValue(_) => "update-value",
        }
    }
}

// Required inputs are validated after parsing so failures come out as JSON.
#[derive(Args, Debug, Clone, Default)]
pub struct UpdateValueArgs {
    /// Organization name (falls back to TFE_ORG)
    #[arg(long, value_name = "ORG")]
    pub org: Option<String>,
    /// API token (falls back to TFE_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,
    /// Workspace name
    #[arg(long, value_name = "NAME")]
    pub workspace: Option<String>,
    /// Variable key
    #[arg(long, value_name = "KEY")]
    pub key: Option<String>,
    /// New value; may be empty to clear the variable
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    pub value: Option<String>,
}
