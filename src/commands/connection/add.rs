use anyhow::Result;
use inquire::{Password, PasswordDisplayMode};

use super::model::{validate_url, AddCommand};
use crate::betterbase::onboarding::{self, Candidate};
use crate::commands::Context;

impl AddCommand {
    pub async fn run(&self, context: &Context) -> Result<()> {
        let url = match &self.url {
            Some(url) => url.clone(),
            None => inquire::Text::new("backend url")
                .with_placeholder("https://project.example.com")
                .with_validator(validate_url)
                .prompt()?,
        };

        let service_role_key = match &self.key {
            Some(key) => key.clone(),
            None => {
                println!("\n📝 The service role key can be pasted directly or given as ${{VAR}}.");
                println!("   Environment references are expanded each time a client is built.\n");
                Password::new("service role key")
                    .with_display_mode(PasswordDisplayMode::Masked)
                    .without_confirmation()
                    .prompt()?
            }
        };

        let name = match &self.name {
            Some(name) => Some(name.clone()),
            None => Some(
                inquire::Text::new("name")
                    .with_help_message("Leave empty to use the project name")
                    .prompt()?,
            )
            .filter(|name| !name.trim().is_empty()),
        };

        let mut store = context.open_store()?;
        let candidate = Candidate {
            name,
            url,
            service_role_key,
        };

        println!("🔌 Testing connection...");
        let connection = onboarding::connect(&mut store, candidate, &context.settings).await?;

        println!(
            "✅ Connected to {} ({}) and saved as the active connection",
            connection.name, connection.project_id
        );
        Ok(())
    }
}
