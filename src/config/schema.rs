use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "crawl": {
                "type": "object",
                "properties": {
                    "max_pages": { "type": "integer", "minimum": 1 },
                    "dynamic_threshold": { "type": "integer", "minimum": 1 },
                    "enable_dynamic": { "type": "boolean" },
                    "user_agent": { "type": "string" }
                },
                "additionalProperties": false
            },
            "timeouts": {
                "type": "object",
                "properties": {
                    "static_fetch_secs": { "type": "integer", "minimum": 1 },
                    "dynamic_render_secs": { "type": "integer", "minimum": 1 },
                    "settle_secs": { "type": "integer", "minimum": 0 },
                    "index_query_secs": { "type": "integer", "minimum": 1 }
                },
                "additionalProperties": false
            },
            "scan": {
                "type": "object",
                "properties": {
                    "workers": { "type": "integer", "minimum": 1, "maximum": 10 }
                },
                "additionalProperties": false
            },
            "knowledge": {
                "type": "object",
                "properties": {
                    "endpoint": { "type": "string", "format": "uri" },
                    "api_key": { "type": "string" },
                    "top_k": { "type": "integer", "minimum": 1 }
                },
                "additionalProperties": false
            }
        },
        "additionalProperties": false
    })
});
