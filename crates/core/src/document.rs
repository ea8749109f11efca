//! Slot document normalisation.
//!
//! Player and slot files are opaque JSON objects except for the `slot_id` key. This module
//! parses them into an order-preserving map, patches `slot_id`, and re-serialises with
//! two-space indentation so rewritten files keep their original key order.

use crate::config::SlotIdPolicy;
use crate::constants::{CREATED_KEY, CREATED_TIMESTAMP_FORMAT, DATAFILE_KEY, SLOT_ID_KEY};
use crate::{SaveError, SaveResult};
use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use slotkeeper_types::SlotId;

/// Build the document written for a slot that has no data.
///
/// `created` adds the creation timestamp used when a slot is synthesised on restore or by an
/// empty write.
pub fn default_slot(slot: &SlotId, created: Option<DateTime<Local>>) -> Value {
    let mut doc = Map::new();
    doc.insert(SLOT_ID_KEY.into(), Value::String(slot.to_string()));
    doc.insert(DATAFILE_KEY.into(), Value::Null);
    if let Some(at) = created {
        doc.insert(
            CREATED_KEY.into(),
            Value::String(at.format(CREATED_TIMESTAMP_FORMAT).to_string()),
        );
    }
    Value::Object(doc)
}

/// Serialise with two-space indentation.
pub fn to_pretty(value: &Value) -> SaveResult<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(SaveError::Serialization)
}

/// Prepare player file bytes for storage in a slot.
///
/// Unparseable input, non-object documents and empty objects are replaced by
/// [`default_slot`] without a timestamp. Otherwise `slot_id` is inserted when missing and
/// handled per `policy` when present.
pub fn normalise_for_slot(bytes: &[u8], slot: &SlotId, policy: SlotIdPolicy) -> SaveResult<Vec<u8>> {
    let mut doc = match serde_json::from_slice::<Map<String, Value>>(bytes) {
        Ok(doc) if !doc.is_empty() => doc,
        _ => {
            tracing::info!("Player data for slot {} is empty or invalid, using default", slot);
            return to_pretty(&default_slot(slot, None));
        }
    };

    let write_id = match policy {
        SlotIdPolicy::Overwrite => true,
        SlotIdPolicy::Preserve => !doc.contains_key(SLOT_ID_KEY),
    };
    if write_id {
        doc.insert(SLOT_ID_KEY.into(), Value::String(slot.to_string()));
    }

    to_pretty(&Value::Object(doc))
}

/// Parse slot file bytes and force `slot_id` to `slot`.
///
/// # Errors
///
/// Returns the parse error if `bytes` is not a JSON object.
pub fn restamp(bytes: &[u8], slot: &SlotId) -> Result<Value, serde_json::Error> {
    let mut doc = serde_json::from_slice::<Map<String, Value>>(bytes)?;
    doc.insert(SLOT_ID_KEY.into(), Value::String(slot.to_string()));
    Ok(Value::Object(doc))
}

/// Whether a write-slot payload should be replaced by the default document.
pub fn is_blank(data: Option<&Value>) -> bool {
    match data {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}
