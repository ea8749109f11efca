//! Request decoding shared by every data endpoint.
//!
//! Game-server tooling calls the same endpoint either as `GET` with a query string or as
//! `POST` with a JSON body. [`Params`] accepts both, deserialises into the endpoint's request
//! type and rejects requests whose required fields are empty.

use crate::error::ApiError;
use api_shared::{
    DeleteFileReq, DeletePlayerReq, DeleteSlotReq, FilePathReq, OldSlotReq, PlayerReq, SlotReq,
    WriteFileReq, WriteSlotReq,
};
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Query, Request};
use axum::http::{Method, Uri};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A request body the [`Params`] extractor can produce.
pub trait ApiRequest: DeserializeOwned + Send {
    /// Query parameters whose text is itself a JSON document.
    const JSON_FIELDS: &'static [&'static str] = &[];

    /// Required fields that are absent or blank, in declaration order.
    fn missing_fields(&self) -> Vec<&'static str>;
}

/// Extracts `T` from the query string (`GET`, `HEAD`) or the JSON body (any other method).
#[derive(Debug)]
pub struct Params<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Params<T>
where
    S: Send + Sync,
    T: ApiRequest,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let params: T = if req.method() == Method::GET || req.method() == Method::HEAD {
            from_query(req.uri())?
        } else {
            let body = Bytes::from_request(req, state).await.map_err(|e| {
                tracing::warn!("Failed to read request body: {}", e);
                ApiError::InvalidJson
            })?;
            serde_json::from_slice(&body).map_err(|e| {
                tracing::warn!("Invalid JSON body: {}", e);
                ApiError::InvalidJson
            })?
        };

        let missing = params.missing_fields();
        if !missing.is_empty() {
            return Err(ApiError::MissingParameters(missing));
        }

        Ok(Params(params))
    }
}

fn from_query<T: ApiRequest>(uri: &Uri) -> Result<T, ApiError> {
    let Query(pairs) =
        Query::<HashMap<String, String>>::try_from_uri(uri).map_err(|e| {
            ApiError::InvalidParameter {
                field: "query",
                reason: e.body_text(),
            }
        })?;

    let mut map = Map::new();
    for (key, text) in pairs {
        let value = if T::JSON_FIELDS.contains(&key.as_str()) {
            if text.trim().is_empty() {
                continue;
            }
            serde_json::from_str(&text).map_err(|e| {
                tracing::warn!("Invalid JSON in query parameter {}: {}", key, e);
                ApiError::InvalidJson
            })?
        } else {
            Value::String(text)
        };
        map.insert(key, value);
    }

    serde_json::from_value(Value::Object(map)).map_err(|e| ApiError::InvalidParameter {
        field: "query",
        reason: e.to_string(),
    })
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn missing<'a>(fields: impl IntoIterator<Item = (&'static str, &'a str)>) -> Vec<&'static str> {
    fields
        .into_iter()
        .filter(|(_, value)| blank(value))
        .map(|(name, _)| name)
        .collect()
}

impl ApiRequest for PlayerReq {
    fn missing_fields(&self) -> Vec<&'static str> {
        missing([("steamid", self.steamid.as_str())])
    }
}

impl ApiRequest for SlotReq {
    fn missing_fields(&self) -> Vec<&'static str> {
        missing([("steamid", self.steamid.as_str()), ("slot_id", self.slot_id.as_str())])
    }
}

impl ApiRequest for OldSlotReq {
    fn missing_fields(&self) -> Vec<&'static str> {
        missing([
            ("steamid", self.steamid.as_str()),
            ("old_slot_id", self.old_slot_id.as_str()),
        ])
    }
}

impl ApiRequest for WriteSlotReq {
    const JSON_FIELDS: &'static [&'static str] = &["data"];

    fn missing_fields(&self) -> Vec<&'static str> {
        missing([
            ("steamid", self.steamid.as_str()),
            ("file_name", self.file_name.as_str()),
        ])
    }
}

impl ApiRequest for FilePathReq {
    fn missing_fields(&self) -> Vec<&'static str> {
        missing([("file_path", self.file_path.as_str())])
    }
}

impl ApiRequest for WriteFileReq {
    const JSON_FIELDS: &'static [&'static str] = &["data"];

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut fields = missing([("file_path", self.file_path.as_str())]);
        if matches!(self.data, None | Some(Value::Null)) {
            fields.push("data");
        }
        fields
    }
}

impl ApiRequest for DeleteFileReq {
    fn missing_fields(&self) -> Vec<&'static str> {
        missing([("file_path", self.file_path.as_str())])
    }
}

impl ApiRequest for DeletePlayerReq {
    fn missing_fields(&self) -> Vec<&'static str> {
        missing([("steamid", self.steamid.as_str())])
    }
}

impl ApiRequest for DeleteSlotReq {
    fn missing_fields(&self) -> Vec<&'static str> {
        missing([("steamid", self.steamid.as_str()), ("slot_id", self.slot_id.as_str())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn query_strings_become_fields() {
        let req: SlotReq = from_query(&uri("/slot-file?steamid=1&slot_id=s%201")).unwrap();
        assert_eq!(req.steamid, "1");
        assert_eq!(req.slot_id, "s 1");
    }

    #[test]
    fn query_json_field_is_parsed() {
        let req: WriteSlotReq =
            from_query(&uri("/write-slot?steamid=1&file_name=s&data=%7B%22a%22%3A1%7D")).unwrap();
        assert_eq!(req.data, Some(json!({"a": 1})));
    }

    #[test]
    fn query_empty_json_field_is_absent() {
        let req: WriteSlotReq = from_query(&uri("/write-slot?steamid=1&file_name=s&data=")).unwrap();
        assert!(req.data.is_none());
    }

    #[test]
    fn query_invalid_json_field_is_rejected() {
        let result = from_query::<WriteSlotReq>(&uri("/write-slot?steamid=1&file_name=s&data=%7Bx"));
        assert!(matches!(result, Err(ApiError::InvalidJson)));
    }

    #[test]
    fn query_backup_flag_spellings() {
        let req: DeleteFileReq = from_query(&uri("/delete-file?file_path=a&backup=1")).unwrap();
        assert!(req.backup);
        let req: DeleteFileReq = from_query(&uri("/delete-file?file_path=a")).unwrap();
        assert!(!req.backup);
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        assert_eq!(SlotReq::default().missing_fields(), ["steamid", "slot_id"]);

        let req = SlotReq {
            steamid: "1".into(),
            slot_id: "  ".into(),
        };
        assert_eq!(req.missing_fields(), ["slot_id"]);

        let req = WriteFileReq {
            file_path: "a".into(),
            data: Some(Value::Null),
        };
        assert_eq!(req.missing_fields(), ["data"]);
    }
}
