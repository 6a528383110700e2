use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::classifier;
use crate::parsers;
use crate::protocols::{self, adapter_for};
use crate::types::TransactionRecord;
use crate::wire::UiTransactionWithMeta;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = JSON)]
    fn parse(s: &str) -> JsValue;
}

fn to_js(value: &serde_json::Value) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json_str) => parse(&json_str),
        Err(_) => JsValue::NULL,
    }
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}

/// Decode one `getBlock` / `getTransaction` entry in `jsonParsed` encoding.
fn decode_transaction(tx_json: &str, block_time: Option<i64>) -> Result<TransactionRecord, String> {
    serde_json::from_str::<UiTransactionWithMeta>(tx_json)
        .map(|tx| tx.into_record(block_time))
        .map_err(|e| format!("Invalid transaction JSON: {e}"))
}

/// Returns the DEX table: name, program id and whether events are extracted.
#[wasm_bindgen]
pub fn known_dexes() -> JsValue {
    let result: Vec<serde_json::Value> = protocols::known_dexes()
        .map(|(dex, program_id)| {
            serde_json::json!({
                "name": dex.as_str(),
                "programId": program_id,
                "parsed": adapter_for(dex).is_some(),
            })
        })
        .collect();
    to_js(&serde_json::Value::Array(result))
}

/// Classify one transaction against the program tables.
#[wasm_bindgen]
pub fn classify_transaction(tx_json: &str) -> JsValue {
    let record = match decode_transaction(tx_json, None) {
        Ok(record) => record,
        Err(msg) => return error_result(&msg),
    };
    match serde_json::to_value(classifier::classify(&record)) {
        Ok(value) => to_js(&value),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Extract the domain event of one transaction. Returns `null` when the
/// transaction carries no event.
#[wasm_bindgen]
pub fn extract_event(tx_json: &str, block_time: Option<f64>) -> JsValue {
    let record = match decode_transaction(tx_json, block_time.map(|t| t as i64)) {
        Ok(record) => record,
        Err(msg) => return error_result(&msg),
    };
    match parsers::extract_event(&record) {
        None => JsValue::NULL,
        Some(Ok(event)) => {
            let serializer = serde_wasm_bindgen::Serializer::json_compatible();
            event
                .serialize(&serializer)
                .unwrap_or_else(|e| error_result(&e.to_string()))
        }
        Some(Err(e)) => error_result(&e.to_string()),
    }
}
