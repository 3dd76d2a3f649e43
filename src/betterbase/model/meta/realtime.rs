use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeStats {
    #[serde(default)]
    pub connections: u64,
    #[serde(default)]
    pub subscriptions: u64,
    #[serde(default)]
    pub channels: Vec<ChannelStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub name: String,
    #[serde(default)]
    pub subscribers: u64,
}
