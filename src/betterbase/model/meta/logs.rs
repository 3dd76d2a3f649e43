use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use time::OffsetDateTime;

/// One entry of the backend's request log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    pub id: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<OffsetDateTime>,
}

/// Hourly bucket of the request chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBucket {
    pub hour: String,
    #[serde(default)]
    pub requests: u64,
    #[serde(default)]
    pub errors: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, EnumIter, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum MethodFilter {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Filter and pagination for the request log listing.
#[derive(Debug, Clone, PartialEq)]
pub struct LogFilter {
    pub limit: u32,
    pub offset: u32,
    pub method: Option<MethodFilter>,
    pub status_min: Option<u16>,
    pub status_max: Option<u16>,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            method: None,
            status_min: None,
            status_max: None,
        }
    }
}

impl LogFilter {
    /// Query pairs in the order the backend documents them. Unset filters
    /// are left out entirely.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(method) = self.method {
            pairs.push(("method", method.to_string()));
        }
        if let Some(min) = self.status_min {
            pairs.push(("statusMin", min.to_string()));
        }
        if let Some(max) = self.status_max {
            pairs.push(("statusMax", max.to_string()));
        }
        pairs
    }
}
