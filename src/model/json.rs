// ==============================================================================
// JSON Dump of the Resolved Model
// ==============================================================================
//
// `--emit json` writes the resolved messages instead of the C header, for
// tooling that wants ids and layouts without parsing C. Key order is fixed by
// building each object in an `IndexMap`:
//
//   { "messages": [ { id, reply_id, name, kind, oneway, modifiers, doc,
//                     args, rets, size, reply_size, msg_type, reply_msg_type } ],
//     "msgid_max": N }
//
// A field list is the string "any" or an array of `{ name, type, count }`.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::message::{Field, FieldList, Message};

/// Serialize resolved messages and the highest allocated id.
pub fn messages_to_json(messages: &[Message], msgid_max: u32) -> Value {
    let mut obj = IndexMap::new();
    obj.insert(
        "messages".to_string(),
        Value::Array(messages.iter().map(message_to_json).collect()),
    );
    obj.insert("msgid_max".to_string(), Value::from(msgid_max));
    indexmap_to_value(obj)
}

fn message_to_json(msg: &Message) -> Value {
    let mut obj = IndexMap::new();
    obj.insert("id".to_string(), Value::from(msg.id));
    obj.insert("reply_id".to_string(), optional(msg.reply_id));
    obj.insert("name".to_string(), Value::String(msg.name.clone()));
    obj.insert(
        "kind".to_string(),
        Value::String(msg.kind.keyword().to_string()),
    );
    obj.insert("oneway".to_string(), Value::Bool(msg.oneway));
    obj.insert(
        "modifiers".to_string(),
        Value::Array(
            msg.modifiers
                .iter()
                .map(|m| Value::String(m.keyword().to_string()))
                .collect(),
        ),
    );
    obj.insert(
        "doc".to_string(),
        msg.doc.clone().map_or(Value::Null, Value::String),
    );
    obj.insert("args".to_string(), field_list_to_json(&msg.args));
    obj.insert("rets".to_string(), field_list_to_json(&msg.rets));
    obj.insert("size".to_string(), Value::from(msg.size));
    obj.insert("reply_size".to_string(), optional(msg.reply_size));
    obj.insert("msg_type".to_string(), Value::from(msg.msg_type()));
    obj.insert("reply_msg_type".to_string(), optional(msg.reply_msg_type()));
    indexmap_to_value(obj)
}

fn field_list_to_json(list: &FieldList) -> Value {
    match list {
        FieldList::Any => Value::String("any".to_string()),
        FieldList::Fields(fields) => Value::Array(fields.iter().map(field_to_json).collect()),
    }
}

fn field_to_json(field: &Field) -> Value {
    let mut obj = IndexMap::new();
    obj.insert("name".to_string(), Value::String(field.name.clone()));
    obj.insert(
        "type".to_string(),
        Value::String(field.ty.idl_name().to_string()),
    );
    obj.insert("count".to_string(), optional(field.ty.count()));
    indexmap_to_value(obj)
}

fn optional<T: Into<Value>>(value: Option<T>) -> Value {
    value.map_or(Value::Null, Into::into)
}

/// Convert an `IndexMap` to a `serde_json::Value::Object`, preserving insertion order.
fn indexmap_to_value(map: IndexMap<String, Value>) -> Value {
    let json_map: Map<String, Value> = map.into_iter().collect();
    Value::Object(json_map)
}
