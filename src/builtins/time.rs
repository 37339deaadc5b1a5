//! Clock builtins. `Time.sleep` blocks the evaluator's thread; everything
//! else reads the wall clock.

use chrono::Local;

use super::{expect_arity, BuiltinDef};
use crate::interp::value::Value;
use crate::typeck::types::Type;

pub fn builtins() -> Vec<BuiltinDef> {
    vec![
        BuiltinDef::new("Time.now", vec![], Type::Str, now),
        BuiltinDef::new("Time.sleep", vec![Type::Int], Type::Void, sleep),
        BuiltinDef::new("Time.timestamp", vec![], Type::Int, timestamp),
        BuiltinDef::new("Time.format", vec![Type::Str], Type::Str, format),
    ]
}

fn now(args: &[Value]) -> Result<Value, String> {
    expect_arity("now", args, 0)?;
    Ok(Value::Str(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()))
}

fn sleep(args: &[Value]) -> Result<Value, String> {
    expect_arity("sleep", args, 1)?;
    let Value::Int(ms) = &args[0] else {
        return Err(format!("sleep: expected int milliseconds, got {}", args[0].type_name()));
    };
    if *ms > 0 {
        std::thread::sleep(std::time::Duration::from_millis(*ms as u64));
    }
    Ok(Value::Null)
}

fn timestamp(args: &[Value]) -> Result<Value, String> {
    expect_arity("timestamp", args, 0)?;
    Ok(Value::Int(Local::now().timestamp()))
}

/// Substitute `YYYY MM DD HH mm ss` tokens with the current local time.
fn format(args: &[Value]) -> Result<Value, String> {
    expect_arity("format", args, 1)?;
    let Value::Str(fmt) = &args[0] else {
        return Err(format!("format: expected string, got {}", args[0].type_name()));
    };
    let now = Local::now();
    let out = fmt
        .replace("YYYY", &now.format("%Y").to_string())
        .replace("MM", &now.format("%m").to_string())
        .replace("DD", &now.format("%d").to_string())
        .replace("HH", &now.format("%H").to_string())
        .replace("mm", &now.format("%M").to_string())
        .replace("ss", &now.format("%S").to_string());
    Ok(Value::Str(out))
}
