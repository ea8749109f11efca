//! Request and response bodies.
//!
//! Requests default every field so that a missing parameter surfaces as an empty value and can
//! be reported by name, instead of failing deserialisation as a whole. Responses follow the
//! shapes game-server tooling already consumes: a `success` (or `exists`) flag, a payload, and an
//! `error` string that is omitted when empty.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Accepts `true`/`false` booleans as well as the query-string spellings
/// `"true"`, `"false"`, `"1"`, `"0"`, `"yes"`, `"no"`.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Flag::Bool(b)) => Ok(b),
        Some(Flag::Number(n)) => Ok(n != 0),
        Some(Flag::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean '{other}'"
            ))),
        },
    }
}

// Requests

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct PlayerReq {
    pub steamid: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct SlotReq {
    pub steamid: String,
    pub slot_id: String,
}

/// Transfer and empty-slot name their target slot `old_slot_id`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct OldSlotReq {
    pub steamid: String,
    pub old_slot_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct WriteSlotReq {
    pub steamid: String,
    pub file_name: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct FilePathReq {
    pub file_path: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct WriteFileReq {
    pub file_path: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct DeleteFileReq {
    pub file_path: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub backup: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct DeletePlayerReq {
    pub steamid: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub backup: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct DeleteSlotReq {
    pub steamid: String,
    pub slot_id: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub backup: bool,
}

// Responses

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
}

/// Body of 400 and 405 responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckRes {
    pub exists: bool,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON content of a player or slot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentRes {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContentRes {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.to_string()),
        }
    }
}

/// Response of transfer and restore-slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransferRes {
    pub success: bool,
    pub message: String,
    pub player_file: String,
    pub slot_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferRes {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmptySlotRes {
    pub success: bool,
    pub message: String,
    pub slot_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmptySlotRes {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WriteSlotRes {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteSlotRes {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// Raw text of an arbitrary file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileContentRes {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileContentRes {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WriteFileRes {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteFileRes {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileInfoRes {
    pub success: bool,
    pub exists: bool,
    pub is_directory: bool,
    pub size: u64,
    /// RFC 3339, UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileInfoRes {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// Response of delete-file, delete-player-file and delete-slot-file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteRes {
    pub success: bool,
    pub message: String,
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteRes {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_default_missing_fields() {
        let req: SlotReq = serde_json::from_value(json!({"steamid": "1"})).unwrap();
        assert_eq!(req.steamid, "1");
        assert_eq!(req.slot_id, "");
    }

    #[test]
    fn requests_ignore_unknown_fields() {
        let req: PlayerReq =
            serde_json::from_value(json!({"steamid": "1", "old_slot_id": "x"})).unwrap();
        assert_eq!(req.steamid, "1");
    }

    #[test]
    fn flag_accepts_booleans_and_query_spellings() {
        for (input, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!("true"), true),
            (json!("1"), true),
            (json!("no"), false),
            (json!(""), false),
            (json!(1), true),
            (json!(null), false),
        ] {
            let req: DeleteFileReq =
                serde_json::from_value(json!({"file_path": "a", "backup": input})).unwrap();
            assert_eq!(req.backup, expected);
        }

        let missing: DeleteFileReq = serde_json::from_value(json!({"file_path": "a"})).unwrap();
        assert!(!missing.backup);

        assert!(
            serde_json::from_value::<DeleteFileReq>(json!({"file_path": "a", "backup": "maybe"}))
                .is_err()
        );
    }

    #[test]
    fn write_slot_null_data_is_none() {
        let req: WriteSlotReq =
            serde_json::from_value(json!({"steamid": "1", "file_name": "s", "data": null}))
                .unwrap();
        assert!(req.data.is_none());
    }

    #[test]
    fn failure_responses_omit_empty_optionals() {
        let json = serde_json::to_value(TransferRes::failure("Player file not found")).unwrap();
        assert_eq!(
            json,
            json!({
                "success": false,
                "message": "",
                "player_file": "",
                "slot_file": "",
                "error": "Player file not found"
            })
        );

        let json = serde_json::to_value(FileContentRes::failure("nope")).unwrap();
        assert_eq!(json, json!({"success": false, "error": "nope"}));
    }
}
