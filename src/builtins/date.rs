//! Calendar builtins. `Date` is an ordinary struct value
//! `{ year, month, day }`; the arithmetic here is pure except for the
//! wall-clock reads.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{Datelike, Local};

use super::{expect_arity, BuiltinDef};
use crate::interp::value::{StructInstance, Value};
use crate::typeck::types::Type;

pub fn type_fields() -> Vec<(String, Type)> {
    vec![
        ("year".to_string(), Type::Int),
        ("month".to_string(), Type::Int),
        ("day".to_string(), Type::Int),
    ]
}

fn date_ty() -> Type {
    Type::Named("Date".to_string())
}

pub fn builtins() -> Vec<BuiltinDef> {
    vec![
        BuiltinDef::new("Date.now", vec![], date_ty(), now),
        BuiltinDef::new("Date.today", vec![], Type::Str, today),
        BuiltinDef::new("Date.createDate", vec![Type::Int, Type::Int, Type::Int], date_ty(), create_date),
        BuiltinDef::new("Date.formatDate", vec![date_ty()], Type::Str, format_date),
        BuiltinDef::new("Date.currentYear", vec![], Type::Int, current_year),
        BuiltinDef::new("Date.currentMonth", vec![], Type::Int, current_month),
        BuiltinDef::new("Date.currentDay", vec![], Type::Int, current_day),
        BuiltinDef::new("Date.isLeapYear", vec![Type::Int], Type::Bool, is_leap_year),
        BuiltinDef::new("Date.daysInMonth", vec![Type::Int, Type::Int], Type::Int, days_in_month),
        BuiltinDef::new("Date.dayOfWeek", vec![date_ty()], Type::Int, day_of_week),
        BuiltinDef::new("Date.addDays", vec![date_ty(), Type::Int], date_ty(), add_days),
        BuiltinDef::new("Date.subtractDays", vec![date_ty(), Type::Int], date_ty(), subtract_days),
    ]
}

fn make_date(year: i64, month: i64, day: i64) -> Value {
    let mut fields = HashMap::new();
    fields.insert("year".to_string(), Value::Int(year));
    fields.insert("month".to_string(), Value::Int(month));
    fields.insert("day".to_string(), Value::Int(day));
    Value::Struct(Rc::new(StructInstance {
        type_name: "Date".to_string(),
        fields: RefCell::new(fields),
    }))
}

fn date_parts(name: &str, value: &Value) -> Result<(i64, i64, i64), String> {
    let Value::Struct(inst) = value else {
        return Err(format!("{name}: expected a Date, got {}", value.type_name()));
    };
    let fields = inst.fields.borrow();
    let part = |key: &str| match fields.get(key) {
        Some(Value::Int(n)) => Ok(*n),
        _ => Err(format!("{name}: Date is missing an integer '{key}' field")),
    };
    Ok((part("year")?, part("month")?, part("day")?))
}

fn int_arg(name: &str, value: &Value) -> Result<i64, String> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(format!("{name}: expected int, got {}", other.type_name())),
    }
}

fn leap(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn month_days(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if leap(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn now(args: &[Value]) -> Result<Value, String> {
    expect_arity("now", args, 0)?;
    let today = Local::now().date_naive();
    Ok(make_date(today.year() as i64, today.month() as i64, today.day() as i64))
}

fn today(args: &[Value]) -> Result<Value, String> {
    expect_arity("today", args, 0)?;
    let today = Local::now().date_naive();
    Ok(Value::Str(format!(
        "{:04}-{:02}-{:02}",
        today.year(),
        today.month(),
        today.day()
    )))
}

fn create_date(args: &[Value]) -> Result<Value, String> {
    expect_arity("createDate", args, 3)?;
    let year = int_arg("createDate", &args[0])?;
    let month = int_arg("createDate", &args[1])?;
    let day = int_arg("createDate", &args[2])?;
    if !(1..=12).contains(&month) {
        return Err(format!("createDate: month out of range: {month}"));
    }
    if day < 1 || day > month_days(year, month) {
        return Err(format!("createDate: day out of range: {day}"));
    }
    Ok(make_date(year, month, day))
}

fn format_date(args: &[Value]) -> Result<Value, String> {
    expect_arity("formatDate", args, 1)?;
    let (y, m, d) = date_parts("formatDate", &args[0])?;
    Ok(Value::Str(format!("{y:04}-{m:02}-{d:02}")))
}

fn current_year(args: &[Value]) -> Result<Value, String> {
    expect_arity("currentYear", args, 0)?;
    Ok(Value::Int(Local::now().year() as i64))
}

fn current_month(args: &[Value]) -> Result<Value, String> {
    expect_arity("currentMonth", args, 0)?;
    Ok(Value::Int(Local::now().month() as i64))
}

fn current_day(args: &[Value]) -> Result<Value, String> {
    expect_arity("currentDay", args, 0)?;
    Ok(Value::Int(Local::now().day() as i64))
}

fn is_leap_year(args: &[Value]) -> Result<Value, String> {
    expect_arity("isLeapYear", args, 1)?;
    Ok(Value::Bool(leap(int_arg("isLeapYear", &args[0])?)))
}

fn days_in_month(args: &[Value]) -> Result<Value, String> {
    expect_arity("daysInMonth", args, 2)?;
    let year = int_arg("daysInMonth", &args[0])?;
    let month = int_arg("daysInMonth", &args[1])?;
    let days = month_days(year, month);
    if days == 0 {
        return Err(format!("daysInMonth: month out of range: {month}"));
    }
    Ok(Value::Int(days))
}

/// Zeller's congruence: 0 = Saturday, ..., 6 = Friday.
fn day_of_week(args: &[Value]) -> Result<Value, String> {
    expect_arity("dayOfWeek", args, 1)?;
    let (mut year, mut month, day) = date_parts("dayOfWeek", &args[0])?;
    if month < 3 {
        month += 12;
        year -= 1;
    }
    let k = year % 100;
    let j = year / 100;
    let h = (day + 13 * (month + 1) / 5 + k + k / 4 + j / 4 + 5 * j).rem_euclid(7);
    Ok(Value::Int(h))
}

fn shift_days(mut year: i64, mut month: i64, mut day: i64, n: i64) -> (i64, i64, i64) {
    let mut remaining = n;
    while remaining > 0 {
        day += 1;
        if day > month_days(year, month) {
            day = 1;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
        remaining -= 1;
    }
    while remaining < 0 {
        day -= 1;
        if day < 1 {
            month -= 1;
            if month < 1 {
                month = 12;
                year -= 1;
            }
            day = month_days(year, month);
        }
        remaining += 1;
    }
    (year, month, day)
}

fn add_days(args: &[Value]) -> Result<Value, String> {
    expect_arity("addDays", args, 2)?;
    let (y, m, d) = date_parts("addDays", &args[0])?;
    let n = int_arg("addDays", &args[1])?;
    let (y, m, d) = shift_days(y, m, d, n);
    Ok(make_date(y, m, d))
}

fn subtract_days(args: &[Value]) -> Result<Value, String> {
    expect_arity("subtractDays", args, 2)?;
    let (y, m, d) = date_parts("subtractDays", &args[0])?;
    let n = int_arg("subtractDays", &args[1])?;
    let (y, m, d) = shift_days(y, m, d, -n);
    Ok(make_date(y, m, d))
}
