//! Conversions between request/response JSON and stored BSON documents.

use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Parse a path identifier into an ObjectId.
pub fn parse_object_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Convert a client-submitted JSON object into a BSON document.
pub fn document_from_json(object: Map<String, Value>) -> Result<Document, StoreError> {
    Ok(bson::to_document(&object)?)
}

/// Render a stored document as plain JSON.
///
/// ObjectIds become hex strings and datetimes become RFC 3339 strings, which
/// is what clients of the portal expect for `_id` and `jobId` comparisons.
/// Everything else uses relaxed extended JSON.
pub fn document_to_json(document: Document) -> Value {
    let map: Map<String, Value> = document
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect();
    Value::Object(map)
}

pub(crate) fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
