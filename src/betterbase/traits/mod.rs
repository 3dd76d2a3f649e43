pub mod functions;
pub mod logs;
pub mod project;
pub mod storage;
pub mod tables;
pub mod users;
pub mod webhooks;

pub use functions::FunctionOperations;
pub use logs::LogOperations;
pub use project::ProjectOperations;
pub use storage::StorageOperations;
pub use tables::TableOperations;
pub use users::UserOperations;
pub use webhooks::WebhookOperations;

use async_trait::async_trait;

use crate::betterbase::client::result::ConnectionCheck;

/// Super-trait combining every meta-API operation group.
/// Views and commands depend on this rather than on the concrete client.
#[async_trait]
pub trait MetaApi:
    ProjectOperations
    + TableOperations
    + UserOperations
    + LogOperations
    + WebhookOperations
    + StorageOperations
    + FunctionOperations
{
    /// Base URL the client talks to, without a trailing slash
    fn base_url(&self) -> &str;

    /// Validates the bound connection with a project-info fetch.
    /// `ok` is true exactly when that fetch reported no error.
    async fn test_connection(&self) -> ConnectionCheck {
        let result = self.get_project().await;
        ConnectionCheck::from(&result)
    }
}
