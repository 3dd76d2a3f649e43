pub mod functions;
pub mod logs;
pub mod project;
pub mod realtime;
pub mod schema;
pub mod storage;
pub mod tables;
pub(crate) mod timestamp;
pub mod users;
pub mod webhooks;

pub use functions::EdgeFunction;
pub use logs::{LogBucket, LogFilter, MethodFilter, RequestLog};
pub use project::{ApiKey, ProjectInfo, ProjectStats, ProviderInfo};
pub use realtime::RealtimeStats;
pub use schema::{GraphqlSchema, TablePolicies};
pub use storage::{StorageBucket, StorageFile};
pub use tables::{TableInfo, TableRow};
pub use users::AuthUser;
pub use webhooks::{Webhook, WebhookInput, WebhookTestResult};

use serde::{Deserialize, Serialize};

/// Whatever a mutating endpoint (a delete) answers with. The shape differs
/// per backend version (`true`, `{"deleted":true}`, an id), so it is kept
/// as raw JSON and printed as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Acknowledgement(pub serde_json::Value);
