use serde::{Deserialize, Serialize};

/// Uniform result of every meta-API call.
///
/// Exactly one of `data` and `error` is meaningful. Transport failures,
/// HTTP failures and backend-reported failures all end up in `error`; a
/// call never returns `Err` or panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaResult<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl<T> MetaResult<T> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            count: None,
        }
    }
}

/// Outcome of validating a candidate connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionCheck {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<&MetaResult<T>> for ConnectionCheck {
    fn from(result: &MetaResult<T>) -> Self {
        match &result.error {
            None => ConnectionCheck {
                ok: true,
                error: None,
            },
            Some(error) => ConnectionCheck {
                ok: false,
                error: Some(error.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_maps_error_presence() {
        let ok = MetaResult {
            data: Some(1u8),
            error: None,
            count: None,
        };
        assert_eq!(
            ConnectionCheck::from(&ok),
            ConnectionCheck {
                ok: true,
                error: None
            }
        );

        let failed: MetaResult<u8> = MetaResult::failure("HTTP 401");
        let check = ConnectionCheck::from(&failed);
        assert!(!check.ok);
        assert_eq!(check.error.as_deref(), Some("HTTP 401"));
    }

    #[test]
    fn successful_check_omits_error_key() {
        let check = ConnectionCheck {
            ok: true,
            error: None,
        };
        assert_eq!(
            serde_json::to_value(&check).unwrap(),
            serde_json::json!({"ok": true})
        );
    }
}
