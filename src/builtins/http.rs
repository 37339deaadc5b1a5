//! HTTP client builtins backed by ureq, plus JSON decoding.
//!
//! The default header map is process-wide state: every request sends the
//! current map, and `setHeaders` replaces it wholesale.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use super::{expect_arity, BuiltinDef};
use crate::interp::value::{StructInstance, Value};
use crate::typeck::types::Type;

const TIMEOUT: Duration = Duration::from_secs(30);

pub fn response_type_fields() -> Vec<(String, Type)> {
    vec![
        ("statusCode".to_string(), Type::Int),
        ("body".to_string(), Type::Str),
        ("headers".to_string(), Type::Array),
    ]
}

fn response_ty() -> Type {
    Type::Named("HTTPResponse".to_string())
}

pub fn builtins() -> Vec<BuiltinDef> {
    vec![
        BuiltinDef::new("HTTP.get", vec![Type::Str], response_ty(), get),
        BuiltinDef::new("HTTP.post", vec![Type::Str, Type::Str], response_ty(), post),
        BuiltinDef::new("HTTP.put", vec![Type::Str, Type::Str], response_ty(), put),
        BuiltinDef::new("HTTP.delete", vec![Type::Str], response_ty(), delete),
        BuiltinDef::new("HTTP.setHeaders", vec![Type::Array], Type::Void, set_headers),
        BuiltinDef::new("HTTP.getHeader", vec![response_ty(), Type::Str], Type::Str, get_header),
        BuiltinDef::new("HTTP.parseJSON", vec![Type::Str], Type::Any, parse_json),
    ]
}

fn default_headers() -> &'static Mutex<HashMap<String, String>> {
    static HEADERS: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
    HEADERS.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert("User-Agent".to_string(), "BurnLang/1.0".to_string());
        map.insert("Accept".to_string(), "application/json".to_string());
        Mutex::new(map)
    })
}

/// Reset the default header map to its seeded state. Test hook.
pub fn reset_default_headers() {
    let mut map = default_headers().lock().unwrap();
    map.clear();
    map.insert("User-Agent".to_string(), "BurnLang/1.0".to_string());
    map.insert("Accept".to_string(), "application/json".to_string());
}

fn current_headers() -> Vec<(String, String)> {
    default_headers()
        .lock()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn str_arg(name: &str, value: &Value) -> Result<String, String> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(format!("{name}: expected string, got {}", other.type_name())),
    }
}

fn request(name: &str, method: &str, url: &str, body: Option<&str>) -> Result<Value, String> {
    let mut req = ureq::request(method, url).timeout(TIMEOUT);
    for (key, value) in current_headers() {
        req = req.set(&key, &value);
    }

    let result = match body {
        Some(body) => req.send_string(body),
        None => req.call(),
    };

    let response = match result {
        Ok(resp) => resp,
        // non-2xx statuses still produce a response value
        Err(ureq::Error::Status(_, resp)) => resp,
        Err(e) => return Err(format!("{name}: HTTP {method} failed: {e}")),
    };

    let status = response.status() as i64;
    let headers: Vec<Value> = response
        .headers_names()
        .iter()
        .map(|h| {
            let value = response.header(h).unwrap_or("");
            Value::Str(format!("{h}: {value}"))
        })
        .collect();
    let body = response
        .into_string()
        .map_err(|e| format!("{name}: failed to read response body: {e}"))?;

    let mut fields = HashMap::new();
    fields.insert("statusCode".to_string(), Value::Int(status));
    fields.insert("body".to_string(), Value::Str(body));
    fields.insert("headers".to_string(), Value::array(headers));
    Ok(Value::Struct(Rc::new(StructInstance {
        type_name: "HTTPResponse".to_string(),
        fields: RefCell::new(fields),
    })))
}

fn get(args: &[Value]) -> Result<Value, String> {
    expect_arity("HTTP.get", args, 1)?;
    let url = str_arg("HTTP.get", &args[0])?;
    request("HTTP.get", "GET", &url, None)
}

fn post(args: &[Value]) -> Result<Value, String> {
    expect_arity("HTTP.post", args, 2)?;
    let url = str_arg("HTTP.post", &args[0])?;
    let body = str_arg("HTTP.post", &args[1])?;
    request("HTTP.post", "POST", &url, Some(&body))
}

fn put(args: &[Value]) -> Result<Value, String> {
    expect_arity("HTTP.put", args, 2)?;
    let url = str_arg("HTTP.put", &args[0])?;
    let body = str_arg("HTTP.put", &args[1])?;
    request("HTTP.put", "PUT", &url, Some(&body))
}

fn delete(args: &[Value]) -> Result<Value, String> {
    expect_arity("HTTP.delete", args, 1)?;
    let url = str_arg("HTTP.delete", &args[0])?;
    request("HTTP.delete", "DELETE", &url, None)
}

/// Replace the process-wide default headers from an array of
/// `"Name: Value"` strings. The swap is all-or-nothing.
fn set_headers(args: &[Value]) -> Result<Value, String> {
    expect_arity("setHeaders", args, 1)?;
    let Value::Array(items) = &args[0] else {
        return Err(format!("setHeaders: expected array, got {}", args[0].type_name()));
    };

    let mut new_map = HashMap::new();
    for item in items.borrow().iter() {
        let Value::Str(entry) = item else {
            return Err(format!(
                "setHeaders: header entries must be strings, got {}",
                item.type_name()
            ));
        };
        let Some((name, value)) = entry.split_once(':') else {
            return Err(format!("setHeaders: malformed header '{entry}', expected 'Name: Value'"));
        };
        new_map.insert(name.trim().to_string(), value.trim().to_string());
    }

    *default_headers().lock().unwrap() = new_map;
    Ok(Value::Null)
}

/// Case-insensitive header lookup in a response's `headers` array; returns
/// an empty string when absent.
fn get_header(args: &[Value]) -> Result<Value, String> {
    expect_arity("getHeader", args, 2)?;
    let Value::Struct(inst) = &args[0] else {
        return Err(format!("getHeader: expected HTTPResponse, got {}", args[0].type_name()));
    };
    let wanted = str_arg("getHeader", &args[1])?.to_lowercase();

    let fields = inst.fields.borrow();
    let Some(Value::Array(headers)) = fields.get("headers") else {
        return Err("getHeader: response has no headers array".to_string());
    };

    for item in headers.borrow().iter() {
        if let Value::Str(entry) = item {
            if let Some((name, value)) = entry.split_once(':') {
                if name.trim().to_lowercase() == wanted {
                    return Ok(Value::Str(value.trim().to_string()));
                }
            }
        }
    }
    Ok(Value::Str(String::new()))
}

fn parse_json(args: &[Value]) -> Result<Value, String> {
    expect_arity("parseJSON", args, 1)?;
    let text = str_arg("parseJSON", &args[0])?;
    let json: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("parseJSON: {e}"))?;
    Ok(json_to_value(&json))
}

/// JSON objects become `Object` structs, arrays become arrays, primitives
/// map onto themselves, and null becomes null.
fn json_to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Array(items) => {
            Value::array(items.iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(map) => {
            let mut fields = HashMap::new();
            for (key, value) in map {
                fields.insert(key.clone(), json_to_value(value));
            }
            Value::Struct(Rc::new(StructInstance {
                type_name: "Object".to_string(),
                fields: RefCell::new(fields),
            }))
        }
    }
}

/// Test hook: the current default headers as `"Name: Value"` values.
pub fn default_header_entries() -> Vec<String> {
    let mut entries: Vec<String> = default_headers()
        .lock()
        .unwrap()
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect();
    entries.sort();
    entries
}
