use anyhow::Result;
use clap::Parser;
use inquire::validator::Validation;
use url::Url;

use crate::commands::Context;

#[derive(Parser, Debug)]
pub enum ConnectionCommand {
    /// Test a backend and save it as the active connection
    Add(AddCommand),
    #[clap(alias = "rm")]
    Remove(RemoveCommand),
    #[clap(alias = "ls")]
    List(ListCommand),
    /// Make a saved connection the active one
    Use(UseCommand),
    Rename(RenameCommand),
    /// Check that a saved connection still reaches its backend
    Test(TestCommand),
}

impl ConnectionCommand {
    pub async fn run(&self, context: &Context) -> Result<()> {
        match self {
            ConnectionCommand::Add(cmd) => cmd.run(context).await,
            ConnectionCommand::Remove(cmd) => cmd.run(context),
            ConnectionCommand::List(cmd) => cmd.run(context),
            ConnectionCommand::Use(cmd) => cmd.run(context),
            ConnectionCommand::Rename(cmd) => cmd.run(context),
            ConnectionCommand::Test(cmd) => cmd.run(context).await,
        }
    }
}

#[derive(Parser, Debug)]
pub struct AddCommand {
    /// Display name, defaults to the project name reported by the backend
    #[clap(short, long)]
    pub name: Option<String>,
    #[clap(short, long)]
    pub url: Option<String>,
    /// Service role key, `${VAR}` references are expanded when connecting
    #[clap(short, long, env = "BB_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub key: Option<String>,
}

#[derive(Parser, Debug)]
pub struct RemoveCommand {
    /// Connection id or name
    pub connection: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ListCommand {}

#[derive(Parser, Debug)]
pub struct UseCommand {
    /// Connection id or name
    pub connection: Option<String>,
}

#[derive(Parser, Debug)]
pub struct RenameCommand {
    /// Connection id or name
    pub connection: String,
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct TestCommand {
    /// Connection id or name, defaults to the active one
    pub connection: Option<String>,
}

#[allow(clippy::unnecessary_wraps)]
pub fn validate_url(url: &str) -> Result<Validation, Box<dyn std::error::Error + Send + Sync>> {
    match Url::parse(url) {
        Ok(url) => {
            // The meta API prefix is appended by the client
            if url.path().contains("/api/meta") {
                Ok(Validation::Invalid(
                    "⚠️ URL should not include '/api/meta' - it is added automatically.\nExample: Use 'https://project.example.com' instead of 'https://project.example.com/api/meta'".into()
                ))
            } else if !matches!(url.scheme(), "http" | "https") {
                Ok(Validation::Invalid("⚠️ URL must start with http:// or https://".into()))
            } else {
                Ok(Validation::Valid)
            }
        }
        Err(error) => Ok(Validation::Invalid(error.into())),
    }
}
