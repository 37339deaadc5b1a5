//! Console and conversion builtins: print, toString, input, toInt,
//! toFloat, len.

use std::io::Write;

use super::{expect_arity, BuiltinDef};
use crate::interp::value::Value;
use crate::typeck::types::Type;

pub fn builtins() -> Vec<BuiltinDef> {
    vec![
        BuiltinDef::new("print", vec![Type::Any], Type::Void, print),
        BuiltinDef::new("toString", vec![Type::Any], Type::Str, to_string),
        BuiltinDef::new("input", vec![Type::Str], Type::Str, input),
        BuiltinDef::new("toInt", vec![Type::Any], Type::Int, to_int),
        BuiltinDef::new("toFloat", vec![Type::Any], Type::Float, to_float),
        BuiltinDef::new("len", vec![Type::Any], Type::Int, len),
    ]
}

fn print(args: &[Value]) -> Result<Value, String> {
    expect_arity("print", args, 1)?;
    println!("{}", args[0]);
    Ok(Value::Null)
}

fn to_string(args: &[Value]) -> Result<Value, String> {
    expect_arity("toString", args, 1)?;
    Ok(Value::Str(args[0].to_string()))
}

fn input(args: &[Value]) -> Result<Value, String> {
    expect_arity("input", args, 1)?;
    let Value::Str(prompt) = &args[0] else {
        return Err(format!("input: prompt must be a string, got {}", args[0].type_name()));
    };
    print!("{prompt}");
    std::io::stdout().flush().map_err(|e| format!("input: {e}"))?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| format!("input: {e}"))?;
    Ok(Value::Str(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn to_int(args: &[Value]) -> Result<Value, String> {
    expect_arity("toInt", args, 1)?;
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(n) => Ok(Value::Int(n.trunc() as i64)),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("toInt: cannot convert '{s}' to int")),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        other => Err(format!("toInt: cannot convert {} to int", other.type_name())),
    }
}

fn to_float(args: &[Value]) -> Result<Value, String> {
    expect_arity("toFloat", args, 1)?;
    match &args[0] {
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Float(n) => Ok(Value::Float(*n)),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("toFloat: cannot convert '{s}' to float")),
        other => Err(format!("toFloat: cannot convert {} to float", other.type_name())),
    }
}

fn len(args: &[Value]) -> Result<Value, String> {
    expect_arity("len", args, 1)?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::Array(items) => Ok(Value::Int(items.borrow().len() as i64)),
        other => Err(format!("len: expected string or array, got {}", other.type_name())),
    }
}
