use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::builtins::BuiltinDef;
use crate::parser::ast::Function;

/// A runtime value. Arrays and struct instances are shared references:
/// mutation through one holder is visible to every other holder.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
    Array(Rc<RefCell<Vec<Value>>>),
    Struct(Rc<StructInstance>),
    Class(Rc<ClassDef>),
    Function(Rc<Function>),
    Builtin(&'static BuiltinDef),
}

#[derive(Debug)]
pub struct StructInstance {
    pub type_name: String,
    pub fields: RefCell<HashMap<String, Value>>,
}

#[derive(Debug)]
pub struct ClassDef {
    pub name: String,
    pub methods: HashMap<String, Rc<Function>>,
    pub statics: HashMap<String, Rc<Function>>,
    pub fields: Vec<(String, String)>,
}

impl Value {
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Null => "null".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Struct(s) => s.type_name.clone(),
            Value::Class(c) => format!("class {}", c.name),
            Value::Function(_) => "function".to_string(),
            Value::Builtin(_) => "builtin".to_string(),
        }
    }

    /// Numeric view used by arithmetic and cross-kind comparison.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => {
                // whole floats print without a decimal tail
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Str(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Struct(s) => {
                write!(f, "{} {{", s.type_name)?;
                let fields = s.fields.borrow();
                let mut entries: Vec<_> = fields.iter().collect();
                entries.sort_by_key(|(k, _)| *k);
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {key}: {value}")?;
                }
                write!(f, " }}")
            }
            Value::Class(c) => write!(f, "<class {}>", c.name),
            Value::Function(func) => write!(f, "<fun {}>", func.name.node),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
        }
    }
}
