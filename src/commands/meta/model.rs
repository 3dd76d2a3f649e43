use clap::{Parser, Subcommand};

use crate::betterbase::model::meta::{LogFilter, MethodFilter, WebhookInput};

/// Dashboard views of the active connection. Each prints the payload as JSON.
#[derive(Subcommand, Debug)]
pub enum MetaCommand {
    /// Project name, id and creation date
    Project,
    /// Aggregate counters (users, tables, requests, buckets)
    Stats,
    /// Project, stats and request chart fetched concurrently
    Overview,
    #[clap(subcommand)]
    Tables(TablesCommand),
    #[clap(subcommand)]
    Users(UsersCommand),
    #[clap(subcommand)]
    Logs(LogsCommand),
    /// API keys issued for the project
    Keys,
    /// Realtime connection and channel statistics
    Realtime,
    /// Database provider and its capabilities
    Provider,
    /// Introspected GraphQL schema
    Graphql,
    #[clap(subcommand)]
    Webhooks(WebhooksCommand),
    #[clap(subcommand)]
    Storage(StorageCommand),
    /// Deployed edge functions
    Functions,
}

#[derive(Subcommand, Debug)]
pub enum TablesCommand {
    #[clap(alias = "ls")]
    List,
    /// Page through the rows of a table
    Rows(RowsArgs),
    /// Row level security policies grouped per table
    Policies,
}

#[derive(Parser, Debug)]
pub struct RowsArgs {
    pub table: String,
    #[clap(short, long, default_value_t = 50)]
    pub limit: u32,
    #[clap(short, long, default_value_t = 0)]
    pub offset: u32,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    #[clap(alias = "ls")]
    List(PageArgs),
    #[clap(alias = "rm")]
    Delete { id: String },
}

#[derive(Parser, Debug)]
pub struct PageArgs {
    #[clap(short, long, default_value_t = 20)]
    pub limit: u32,
    #[clap(short, long, default_value_t = 0)]
    pub offset: u32,
}

#[derive(Subcommand, Debug)]
pub enum LogsCommand {
    #[clap(alias = "ls")]
    List(LogArgs),
    /// Hourly request and error counts
    Chart,
}

#[derive(Parser, Debug)]
pub struct LogArgs {
    #[clap(short, long, default_value_t = 50)]
    pub limit: u32,
    #[clap(short, long, default_value_t = 0)]
    pub offset: u32,
    #[clap(short, long, value_enum)]
    pub method: Option<MethodFilter>,
    #[clap(long)]
    pub status_min: Option<u16>,
    #[clap(long)]
    pub status_max: Option<u16>,
}

impl From<&LogArgs> for LogFilter {
    fn from(args: &LogArgs) -> Self {
        LogFilter {
            limit: args.limit,
            offset: args.offset,
            method: args.method,
            status_min: args.status_min,
            status_max: args.status_max,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum WebhooksCommand {
    #[clap(alias = "ls")]
    List,
    Create(WebhookArgs),
    Update {
        id: String,
        #[clap(flatten)]
        args: WebhookArgs,
    },
    #[clap(alias = "rm")]
    Delete { id: String },
    /// Fire a test delivery
    Test { id: String },
}

#[derive(Parser, Debug)]
pub struct WebhookArgs {
    #[clap(long)]
    pub name: Option<String>,
    #[clap(long)]
    pub table: Option<String>,
    /// Comma separated, e.g. INSERT,UPDATE
    #[clap(long, value_delimiter = ',')]
    pub events: Option<Vec<String>>,
    #[clap(long)]
    pub url: Option<String>,
    #[clap(long)]
    pub secret: Option<String>,
    #[clap(long)]
    pub enabled: Option<bool>,
}

impl From<&WebhookArgs> for WebhookInput {
    fn from(args: &WebhookArgs) -> Self {
        WebhookInput {
            name: args.name.clone(),
            table: args.table.clone(),
            events: args.events.clone(),
            url: args.url.clone(),
            secret: args.secret.clone(),
            enabled: args.enabled,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum StorageCommand {
    Buckets,
    Files {
        bucket: String,
        #[clap(short, long)]
        prefix: Option<String>,
    },
    /// Delete a file from a bucket
    Rm { bucket: String, key: String },
}
