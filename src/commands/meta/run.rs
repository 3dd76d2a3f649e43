use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::model::{
    LogsCommand, MetaCommand, StorageCommand, TablesCommand, UsersCommand, WebhooksCommand,
};
use crate::betterbase::client::result::MetaResult;
use crate::betterbase::client::MetaClient;
use crate::betterbase::model::meta::{LogFilter, WebhookInput};
use crate::betterbase::traits::{
    FunctionOperations, LogOperations, ProjectOperations, StorageOperations, TableOperations,
    UserOperations, WebhookOperations,
};
use crate::commands::Context;

/// Prints the payload as pretty JSON. The row count goes to stderr so the
/// JSON on stdout stays pipeable.
fn print_result<T: Serialize>(result: MetaResult<T>) -> Result<()> {
    if let Some(error) = result.error {
        return Err(anyhow::anyhow!(error));
    }
    if let Some(data) = result.data {
        println!("{}", serde_json::to_string_pretty(&data)?);
    }
    if let Some(count) = result.count {
        eprintln!("{count} total");
    }
    Ok(())
}

/// Cancels outstanding requests on Ctrl-C.
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling in-flight requests");
            token.cancel();
        }
    });
    cancel
}

impl MetaCommand {
    pub async fn run(&self, context: &Context) -> Result<()> {
        let store = context.open_store()?;
        let client = context
            .active_client(&store)?
            .with_cancellation(cancel_on_interrupt());
        debug!("Running {self:?}");

        let outcome = match self {
            MetaCommand::Project => print_result(client.get_project().await),
            MetaCommand::Stats => print_result(client.get_stats().await),
            MetaCommand::Overview => overview(&client).await,
            MetaCommand::Tables(cmd) => cmd.run(&client).await,
            MetaCommand::Users(cmd) => cmd.run(&client).await,
            MetaCommand::Logs(cmd) => cmd.run(&client).await,
            MetaCommand::Keys => print_result(client.list_api_keys().await),
            MetaCommand::Realtime => print_result(client.get_realtime_stats().await),
            MetaCommand::Provider => print_result(client.get_provider().await),
            MetaCommand::Graphql => print_result(client.get_graphql_schema().await),
            MetaCommand::Webhooks(cmd) => cmd.run(&client).await,
            MetaCommand::Storage(cmd) => cmd.run(&client).await,
            MetaCommand::Functions => print_result(client.list_functions().await),
        };

        if client.cancellation_token().is_cancelled() {
            warn!("Interrupted before all requests completed");
        }
        outcome
    }
}

/// Each panel of the overview fails on its own; one failed fetch does not
/// hide the others.
async fn overview(client: &MetaClient) -> Result<()> {
    let (project, stats, chart) = futures::join!(
        client.get_project(),
        client.get_stats(),
        client.get_log_chart()
    );

    let overview = json!({
        "project": project.data,
        "stats": stats.data,
        "chart": chart.data,
        "errors": {
            "project": project.error,
            "stats": stats.error,
            "chart": chart.error,
        },
    });
    println!("{}", serde_json::to_string_pretty(&overview)?);

    let failures: Vec<String> = [
        ("project", project.error),
        ("stats", stats.error),
        ("chart", chart.error),
    ]
    .into_iter()
    .filter_map(|(panel, error)| error.map(|e| format!("{panel}: {e}")))
    .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Overview incomplete ({})",
            failures.join(", ")
        ))
    }
}

impl TablesCommand {
    async fn run(&self, client: &MetaClient) -> Result<()> {
        match self {
            TablesCommand::List => print_result(client.list_tables().await),
            TablesCommand::Rows(args) => print_result(
                client
                    .get_table_rows(&args.table, args.limit, args.offset)
                    .await,
            ),
            TablesCommand::Policies => print_result(client.list_rls_policies().await),
        }
    }
}

impl UsersCommand {
    async fn run(&self, client: &MetaClient) -> Result<()> {
        match self {
            UsersCommand::List(page) => {
                print_result(client.list_users(page.limit, page.offset).await)
            }
            UsersCommand::Delete { id } => print_result(client.delete_user(id).await),
        }
    }
}

impl LogsCommand {
    async fn run(&self, client: &MetaClient) -> Result<()> {
        match self {
            LogsCommand::List(args) => {
                print_result(client.list_logs(&LogFilter::from(args)).await)
            }
            LogsCommand::Chart => print_result(client.get_log_chart().await),
        }
    }
}

impl WebhooksCommand {
    async fn run(&self, client: &MetaClient) -> Result<()> {
        match self {
            WebhooksCommand::List => print_result(client.list_webhooks().await),
            WebhooksCommand::Create(args) => {
                print_result(client.create_webhook(&WebhookInput::from(args)).await)
            }
            WebhooksCommand::Update { id, args } => {
                print_result(client.update_webhook(id, &WebhookInput::from(args)).await)
            }
            WebhooksCommand::Delete { id } => print_result(client.delete_webhook(id).await),
            WebhooksCommand::Test { id } => print_result(client.test_webhook(id).await),
        }
    }
}

impl StorageCommand {
    async fn run(&self, client: &MetaClient) -> Result<()> {
        match self {
            StorageCommand::Buckets => print_result(client.list_buckets().await),
            StorageCommand::Files { bucket, prefix } => {
                print_result(client.list_files(bucket, prefix.as_deref()).await)
            }
            StorageCommand::Rm { bucket, key } => {
                print_result(client.delete_file(bucket, key).await)
            }
        }
    }
}
