use std::io;

use matchbook_core::{CoreError, SuccessEnvelope};
use serde::Serialize;
use serde_json::{Value, json};

const JSON_VERSION: &str = "v1";

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let value = match success.command.as_str() {
        "reconcile" | "po show" => json!({
            "ok": true,
            "version": JSON_VERSION,
            "data": success.data.clone()
        }),
        "po list" => render_po_list_json(&success.data),
        _ => {
            return Err(io::Error::other(format!(
                "JSON output is not supported for command `{}`",
                success.command
            )));
        }
    };

    serialize_json_pretty(&value)
}

pub fn render_error_json(error: &CoreError) -> io::Result<String> {
    let payload = json!({
        "error": {
            "code": error.code,
            "message": error.message,
            "recovery_steps": error.recovery_steps,
        }
    });
    serialize_json_pretty(&payload)
}

// `po list` returns a raw array so it pipes straight into jq and friends.
fn render_po_list_json(data: &Value) -> Value {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Value::Array(rows)
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use matchbook_core::SuccessEnvelope;
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    fn success(command: &str, data: Value) -> SuccessEnvelope {
        SuccessEnvelope {
            ok: true,
            command: command.to_string(),
            version: "0.1.0".to_string(),
            data,
        }
    }

    #[test]
    fn reconcile_json_uses_structured_envelope() {
        let payload = success(
            "reconcile",
            json!({"run_id": "run_1", "escalation_required": false}),
        );

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(true));
                assert_eq!(value["version"], Value::String("v1".to_string()));
                assert_eq!(value["data"]["run_id"], Value::String("run_1".to_string()));
            }
        }
    }

    #[test]
    fn po_list_json_returns_raw_array() {
        let payload = success(
            "po list",
            json!({
                "rows": [
                    {"po_number": "PO-2024-001", "supplier": "Acme Ltd"}
                ]
            }),
        );

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert!(value.is_array());
                assert_eq!(
                    value[0]["po_number"],
                    Value::String("PO-2024-001".to_string())
                );
            }
        }
    }

    #[test]
    fn runtime_error_json_uses_universal_shape() {
        let error = matchbook_core::CoreError::new(
            "po_not_found",
            "missing",
            vec!["run po list".to_string()],
        );
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(
                    value["error"]["code"],
                    Value::String("po_not_found".to_string())
                );
                assert!(value.get("ok").is_none());
            }
        }
    }

    #[test]
    fn unsupported_command_is_an_io_error() {
        let payload = success("mystery", json!({}));
        assert!(render_success_json(&payload).is_err());
    }
}
