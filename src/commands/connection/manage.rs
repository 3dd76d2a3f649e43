use anyhow::Result;
use inquire::Select;
use log::info;
use time::format_description::well_known::Rfc3339;

use super::model::{ListCommand, RemoveCommand, RenameCommand, TestCommand, UseCommand};
use crate::betterbase::client::MetaClient;
use crate::betterbase::store::{ConnectionStore, FileStorage};
use crate::betterbase::traits::MetaApi;
use crate::commands::{resolve_connection, Context};

/// Resolves `connection` or asks the operator to pick one.
fn pick_connection(
    store: &ConnectionStore<FileStorage>,
    connection: Option<&String>,
) -> Result<Option<String>> {
    if store.connections().is_empty() {
        println!("❌ No connections saved in {}", store.location());
        return Ok(None);
    }

    let id_or_name = match connection {
        Some(id_or_name) => id_or_name.clone(),
        None => {
            let labels: Vec<String> = store
                .connections()
                .iter()
                .map(|c| format!("{} ({})", c.name, c.id))
                .collect();
            let picked = Select::new("connection", labels.clone()).prompt()?;
            let index = labels.iter().position(|l| *l == picked).unwrap_or_default();
            store.connections()[index].id.clone()
        }
    };

    resolve_connection(store, &id_or_name)
        .map(Some)
        .ok_or_else(|| anyhow::anyhow!("🤔 Connection '{id_or_name}' not found"))
}

impl RemoveCommand {
    pub fn run(&self, context: &Context) -> Result<()> {
        let mut store = context.open_store()?;
        let Some(id) = pick_connection(&store, self.connection.as_ref())? else {
            return Ok(());
        };

        store.remove_connection(&id)?;
        println!("✅ Connection removed successfully!");
        match store.get_active() {
            Some(active) => println!("   Active connection is now {}", active.name),
            None => println!("   No active connection left"),
        }
        Ok(())
    }
}

impl ListCommand {
    pub fn run(&self, context: &Context) -> Result<()> {
        let store = context.open_store()?;
        if store.connections().is_empty() {
            println!("No connections saved in {}", store.location());
            return Ok(());
        }

        for connection in store.connections() {
            let marker = if store.active_id() == Some(connection.id.as_str()) {
                "*"
            } else {
                " "
            };
            let last_connected = connection
                .last_connected_at
                .and_then(|at| at.format(&Rfc3339).ok())
                .unwrap_or_else(|| "never".to_string());
            println!(
                "{marker} {}  {}  {}  last connected: {last_connected}",
                connection.id, connection.name, connection.url
            );
        }
        Ok(())
    }
}

impl UseCommand {
    pub fn run(&self, context: &Context) -> Result<()> {
        let mut store = context.open_store()?;
        let Some(id) = pick_connection(&store, self.connection.as_ref())? else {
            return Ok(());
        };

        store.set_active(&id)?;
        info!("Active connection set to {id}");
        println!("✅ Now using {id}");
        Ok(())
    }
}

impl RenameCommand {
    pub fn run(&self, context: &Context) -> Result<()> {
        let mut store = context.open_store()?;
        let Some(id) = pick_connection(&store, Some(&self.connection))? else {
            return Ok(());
        };

        store.rename_connection(&id, &self.name)?;
        println!("✅ Connection renamed to {}", self.name);
        Ok(())
    }
}

impl TestCommand {
    pub async fn run(&self, context: &Context) -> Result<()> {
        let mut store = context.open_store()?;
        let id = match &self.connection {
            Some(connection) => resolve_connection(&store, connection)
                .ok_or_else(|| anyhow::anyhow!("🤔 Connection '{connection}' not found"))?,
            None => store
                .active_id()
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("No active connection to test"))?,
        };
        let Some(connection) = store.get(&id) else {
            return Err(anyhow::anyhow!("🤔 Connection '{id}' not found"));
        };

        let client = MetaClient::new(connection, &context.settings)?;
        let check = client.test_connection().await;
        if check.ok {
            store.update_last_connected(&id)?;
            println!("✅ {} is reachable", client.base_url());
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "{} failed: {}",
                client.base_url(),
                check.error.unwrap_or_default()
            ))
        }
    }
}
