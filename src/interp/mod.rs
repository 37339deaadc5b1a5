pub mod env;
pub mod value;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;

use crate::diagnostics::Error;
use crate::parser::ast::*;
use crate::span::{Span, Spanned};
use env::Environment;
use value::{ClassDef, StructInstance, Value};

/// How a statement finished. Return values travel up the statement loops as
/// `Returned` until the enclosing function call consumes them; there is no
/// unwinding.
#[derive(Debug)]
pub enum Outcome {
    Normal(Value),
    Returned(Value),
}

pub struct Interpreter {
    pub env: Environment,
    pub functions: HashMap<String, Rc<Function>>,
    pub classes: HashMap<String, Rc<ClassDef>>,
    /// Record type rows, kept for import merging.
    pub types: HashMap<String, Vec<(String, String)>>,
    /// Canonicalized paths of every module already imported, shared with
    /// child contexts so cyclic imports terminate.
    pub visited: Rc<RefCell<HashSet<PathBuf>>>,
    /// Directory imports resolve against.
    pub base_dir: PathBuf,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            env: Environment::with_builtins(),
            functions: HashMap::new(),
            classes: HashMap::new(),
            types: HashMap::new(),
            visited: Rc::new(RefCell::new(HashSet::new())),
            base_dir: PathBuf::from("."),
        }
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        let mut interp = Self::new();
        interp.base_dir = base_dir;
        interp
    }

    /// A child context for evaluating an imported module: fresh tables and
    /// environment, shared visited set.
    pub fn child(&self, base_dir: PathBuf) -> Self {
        let mut interp = Self::new();
        interp.visited = Rc::clone(&self.visited);
        interp.base_dir = base_dir;
        interp
    }

    /// Run a program: register declarations, evaluate them in order, then
    /// invoke `main` when defined. The result is `main`'s value, or the
    /// last top-level value without one.
    pub fn interpret(&mut self, program: &Program) -> Result<Value, Error> {
        let last = self.run_decls(program)?;
        if let Some(main) = self.functions.get("main").cloned() {
            let span = main.name.span;
            return self.call_function(&main, Vec::new(), None, span);
        }
        Ok(last)
    }

    /// Register and evaluate a program's declarations without invoking
    /// `main`. Imported modules and REPL lines run through here.
    pub fn run_decls(&mut self, program: &Program) -> Result<Value, Error> {
        self.register_decls(&program.decls);

        let mut last = Value::Null;
        for decl in &program.decls {
            match self.exec_decl(decl)? {
                Outcome::Returned(v) | Outcome::Normal(v) => last = v,
            }
        }
        Ok(last)
    }

    /// First walk: classes, record types, and functions enter their tables
    /// before any statement runs, so later declarations resolve.
    pub fn register_decls(&mut self, decls: &[Spanned<Decl>]) {
        for decl in decls {
            match &decl.node {
                Decl::TypeDef(td) => {
                    let fields = td
                        .fields
                        .iter()
                        .map(|f| (f.name.node.clone(), f.ty.node.clone()))
                        .collect();
                    self.types.insert(td.name.node.clone(), fields);
                }
                Decl::Class(c) => {
                    let class = Rc::new(ClassDef {
                        name: c.name.node.clone(),
                        methods: c
                            .methods
                            .iter()
                            .map(|m| (m.node.name.node.clone(), Rc::new(m.node.clone())))
                            .collect(),
                        statics: c
                            .statics
                            .iter()
                            .map(|m| (m.node.name.node.clone(), Rc::new(m.node.clone())))
                            .collect(),
                        fields: Vec::new(),
                    });
                    self.types.entry(c.name.node.clone()).or_default();
                    self.env.define(c.name.node.clone(), Value::Class(Rc::clone(&class)));
                    self.classes.insert(c.name.node.clone(), class);
                }
                Decl::Function(f) => {
                    self.functions.insert(f.name.node.clone(), Rc::new(f.clone()));
                }
                _ => {}
            }
        }
    }

    fn exec_decl(&mut self, decl: &Spanned<Decl>) -> Result<Outcome, Error> {
        match &decl.node {
            Decl::Import(paths) => {
                for path in paths {
                    crate::imports::resolve_import(self, &path.node, path.span)?;
                }
                Ok(Outcome::Normal(Value::Null))
            }
            Decl::TypeDef(_) | Decl::Class(_) => Ok(Outcome::Normal(Value::Null)),
            Decl::Function(f) => {
                // top-level functions were registered by the first walk;
                // block-local declarations land here
                self.functions
                    .entry(f.name.node.clone())
                    .or_insert_with(|| Rc::new(f.clone()));
                Ok(Outcome::Normal(Value::Null))
            }
            Decl::Var(v) => {
                let value = match &v.init {
                    Some(init) => self.eval(init)?,
                    None => Value::Null,
                };
                self.env.define(v.name.node.clone(), value);
                Ok(Outcome::Normal(Value::Null))
            }
            Decl::Stmt(s) => self.exec_stmt(s),
        }
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Outcome, Error> {
        match stmt {
            Stmt::Block(block) => self.exec_block(block),
            Stmt::Return(value) => {
                let v = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Null,
                };
                Ok(Outcome::Returned(v))
            }
            Stmt::If { cond, then, els } => {
                if self.eval_condition(cond)? {
                    self.exec_block(&then.node)
                } else if let Some(els) = els {
                    self.exec_block(&els.node)
                } else {
                    Ok(Outcome::Normal(Value::Null))
                }
            }
            Stmt::While { cond, body } => {
                while self.eval_condition(cond)? {
                    if let Outcome::Returned(v) = self.exec_block(&body.node)? {
                        return Ok(Outcome::Returned(v));
                    }
                }
                Ok(Outcome::Normal(Value::Null))
            }
            Stmt::For { init, cond, incr, body } => {
                if let Some(init) = init {
                    self.exec_decl(init)?;
                }
                loop {
                    if let Some(cond) = cond {
                        if !self.eval_condition(cond)? {
                            break;
                        }
                    }
                    if let Outcome::Returned(v) = self.exec_block(&body.node)? {
                        return Ok(Outcome::Returned(v));
                    }
                    if let Some(incr) = incr {
                        self.eval(incr)?;
                    }
                }
                Ok(Outcome::Normal(Value::Null))
            }
            Stmt::Expr(expr) => Ok(Outcome::Normal(self.eval(expr)?)),
        }
    }

    /// A block runs its declarations in order, short-circuiting on the
    /// first `Returned`. Its normal value is the last statement's value.
    fn exec_block(&mut self, block: &Block) -> Result<Outcome, Error> {
        let mut last = Value::Null;
        for decl in &block.decls {
            match self.exec_decl(decl)? {
                Outcome::Returned(v) => return Ok(Outcome::Returned(v)),
                Outcome::Normal(v) => last = v,
            }
        }
        Ok(Outcome::Normal(last))
    }

    fn eval_condition(&mut self, cond: &Spanned<Expr>) -> Result<bool, Error> {
        match self.eval(cond)? {
            Value::Bool(b) => Ok(b),
            other => Err(Error::runtime(
                format!("condition must be a bool, got {}", other.type_name()),
                cond.span,
            )),
        }
    }

    pub fn eval(&mut self, expr: &Spanned<Expr>) -> Result<Value, Error> {
        let span = expr.span;
        match &expr.node {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(n) => Ok(Value::Float(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Variable(name) => self.lookup(name, span),
            Expr::Assign { name, value } => {
                let v = self.eval(value)?;
                self.env.define(name.node.clone(), v.clone());
                Ok(v)
            }
            Expr::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs, span),
            Expr::Unary { op, operand } => {
                let v = self.eval(operand)?;
                match (op, v) {
                    (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(-n)),
                    (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnaryOp::Neg, v) => Err(Error::runtime(
                        format!("cannot negate a value of type {}", v.type_name()),
                        span,
                    )),
                    (UnaryOp::Not, v) => Err(Error::runtime(
                        format!("'!' requires a bool, got {}", v.type_name()),
                        span,
                    )),
                }
            }
            Expr::Get { object, field } => {
                let obj = self.eval(object)?;
                match obj {
                    Value::Struct(inst) => {
                        inst.fields.borrow().get(&field.node).cloned().ok_or_else(|| {
                            Error::runtime(
                                format!(
                                    "unknown field '{}' on {}",
                                    field.node, inst.type_name
                                ),
                                field.span,
                            )
                        })
                    }
                    other => Err(Error::runtime(
                        format!(
                            "cannot access field '{}' on a value of type {}",
                            field.node,
                            other.type_name()
                        ),
                        span,
                    )),
                }
            }
            Expr::Set { object, field, value } => {
                let obj = self.eval(object)?;
                let v = self.eval(value)?;
                match obj {
                    Value::Struct(inst) => {
                        inst.fields.borrow_mut().insert(field.node.clone(), v.clone());
                        Ok(v)
                    }
                    other => Err(Error::runtime(
                        format!(
                            "cannot set field '{}' on a value of type {}",
                            field.node,
                            other.type_name()
                        ),
                        span,
                    )),
                }
            }
            Expr::Call { callee, args } => self.eval_call(callee, args, span),
            Expr::ClassCall { class, method, args, .. } => {
                let arg_values = self.eval_args(args)?;
                self.call_class_method(&class.node, &method.node, None, arg_values, span)
            }
            Expr::Index { array, index } => {
                let arr = self.eval(array)?;
                let Value::Array(items) = arr else {
                    return Err(Error::runtime(
                        format!("cannot index a value of type {}", arr.type_name()),
                        span,
                    ));
                };
                let idx = match self.eval(index)? {
                    Value::Int(i) => i,
                    other => {
                        return Err(Error::runtime(
                            format!("array index must be an int, got {}", other.type_name()),
                            index.span,
                        ));
                    }
                };
                let items = items.borrow();
                if idx < 0 || idx as usize >= items.len() {
                    return Err(Error::runtime(
                        format!("array index out of bounds: {idx}"),
                        span,
                    ));
                }
                Ok(items[idx as usize].clone())
            }
            Expr::ArrayLit(elements) => {
                let values = self.eval_args(elements)?;
                Ok(Value::array(values))
            }
            Expr::StructLit { name, fields } => {
                let type_name = name
                    .as_ref()
                    .map(|n| n.node.clone())
                    .unwrap_or_else(|| "Object".to_string());
                let mut map = HashMap::new();
                for (fname, fvalue) in fields {
                    let v = self.eval(fvalue)?;
                    map.insert(fname.node.clone(), v);
                }
                Ok(Value::Struct(Rc::new(StructInstance {
                    type_name,
                    fields: RefCell::new(map),
                })))
            }
        }
    }

    fn lookup(&self, name: &str, span: Span) -> Result<Value, Error> {
        if let Some(v) = self.env.get(name) {
            return Ok(v.clone());
        }
        if let Some(f) = self.functions.get(name) {
            return Ok(Value::Function(Rc::clone(f)));
        }
        if let Some(c) = self.classes.get(name) {
            return Ok(Value::Class(Rc::clone(c)));
        }
        Err(Error::runtime(format!("undefined variable '{name}'"), span))
    }

    fn eval_args(&mut self, args: &[Spanned<Expr>]) -> Result<Vec<Value>, Error> {
        args.iter().map(|a| self.eval(a)).collect()
    }

    fn eval_call(
        &mut self,
        callee: &Spanned<Expr>,
        args: &[Spanned<Expr>],
        span: Span,
    ) -> Result<Value, Error> {
        // `C.m(...)` where C is not a local variable: class-qualified call
        if let Expr::Get { object, field } = &callee.node {
            if let Expr::Variable(cname) = &object.node {
                if self.env.get(cname).is_none() {
                    let arg_values = self.eval_args(args)?;
                    return self.call_class_method(cname, &field.node, None, arg_values, span);
                }
            }

            // method call on a receiver value
            let receiver = self.eval(object)?;
            let arg_values = self.eval_args(args)?;
            return match &receiver {
                Value::Struct(inst) => {
                    let class_name = inst.type_name.clone();
                    self.call_class_method(
                        &class_name,
                        &field.node,
                        Some(receiver.clone()),
                        arg_values,
                        span,
                    )
                }
                Value::Class(c) => {
                    let class_name = c.name.clone();
                    self.call_class_method(&class_name, &field.node, None, arg_values, span)
                }
                other => Err(Error::runtime(
                    format!(
                        "unknown method '{}' on a value of type {}",
                        field.node,
                        other.type_name()
                    ),
                    span,
                )),
            };
        }

        // plain call by name
        if let Expr::Variable(fname) = &callee.node {
            match self.env.get(fname).cloned() {
                Some(Value::Builtin(b)) => {
                    let arg_values = self.eval_args(args)?;
                    return (b.handler)(&arg_values).map_err(|msg| Error::runtime(msg, span));
                }
                Some(Value::Function(f)) => {
                    let arg_values = self.eval_args(args)?;
                    return self.call_function(&f, arg_values, None, span);
                }
                _ => {}
            }
            if let Some(f) = self.functions.get(fname).cloned() {
                let arg_values = self.eval_args(args)?;
                return self.call_function(&f, arg_values, None, span);
            }
            return Err(Error::runtime(format!("undefined function '{fname}'"), callee.span));
        }

        // anything else must evaluate to something callable
        let target = self.eval(callee)?;
        let arg_values = self.eval_args(args)?;
        match target {
            Value::Function(f) => self.call_function(&f, arg_values, None, span),
            Value::Builtin(b) => (b.handler)(&arg_values).map_err(|msg| Error::runtime(msg, span)),
            other => Err(Error::runtime(
                format!("cannot call a value of type {}", other.type_name()),
                span,
            )),
        }
    }

    /// Dispatch `<class>.<method>` in order: instance method (when a
    /// receiver is present), static method, then a builtin registered
    /// under the qualified name.
    fn call_class_method(
        &mut self,
        class: &str,
        method: &str,
        receiver: Option<Value>,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, Error> {
        if let Some(class_def) = self.classes.get(class).cloned() {
            if receiver.is_some() {
                if let Some(f) = class_def.methods.get(method) {
                    return self.call_function(&f.clone(), args, receiver, span);
                }
            }
            if let Some(f) = class_def.statics.get(method) {
                return self.call_function(&f.clone(), args, None, span);
            }
        }

        let qualified = format!("{class}.{method}");
        if let Some(Value::Builtin(b)) = self.env.get(&qualified) {
            let b = *b;
            return (b.handler)(&args).map_err(|msg| Error::runtime(msg, span));
        }

        match self.classes.get(class) {
            Some(class_def) if class_def.methods.contains_key(method) => Err(Error::runtime(
                format!("method '{method}' of class '{class}' requires an instance"),
                span,
            )),
            Some(_) => Err(Error::runtime(
                format!("unknown method '{method}' on class '{class}'"),
                span,
            )),
            None => Err(Error::runtime(format!("unknown class '{class}'"), span)),
        }
    }

    /// Execute a user function: the caller's environment is swapped for a
    /// fresh one holding only builtins and the bindings below, and restored
    /// on every exit path.
    pub fn call_function(
        &mut self,
        func: &Rc<Function>,
        args: Vec<Value>,
        this: Option<Value>,
        span: Span,
    ) -> Result<Value, Error> {
        if args.len() != func.params.len() {
            return Err(Error::runtime(
                format!(
                    "function '{}' expects {} argument{}, got {}",
                    func.name.node,
                    func.params.len(),
                    if func.params.len() == 1 { "" } else { "s" },
                    args.len()
                ),
                span,
            ));
        }

        let saved = std::mem::replace(&mut self.env, Environment::with_builtins());
        if let Some(this) = this {
            self.env.define("this", this);
        }
        for (param, arg) in func.params.iter().zip(args) {
            self.env.define(param.name.node.clone(), arg);
        }

        let result = self.exec_block(&func.body.node);
        self.env = saved;

        match result? {
            Outcome::Returned(v) | Outcome::Normal(v) => Ok(v),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        lhs: &Spanned<Expr>,
        rhs: &Spanned<Expr>,
        span: Span,
    ) -> Result<Value, Error> {
        // logical operators short-circuit
        if matches!(op, BinOp::And | BinOp::Or) {
            let l = self.eval_logic_operand(lhs, op)?;
            if op == BinOp::And && !l {
                return Ok(Value::Bool(false));
            }
            if op == BinOp::Or && l {
                return Ok(Value::Bool(true));
            }
            let r = self.eval_logic_operand(rhs, op)?;
            return Ok(Value::Bool(r));
        }

        let l = self.eval(lhs)?;
        let r = self.eval(rhs)?;
        binary_op(op, l, r, span)
    }

    fn eval_logic_operand(&mut self, expr: &Spanned<Expr>, op: BinOp) -> Result<bool, Error> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(Error::runtime(
                format!(
                    "'{}' requires bool operands, got {}",
                    op.symbol(),
                    other.type_name()
                ),
                expr.span,
            )),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn binary_op(op: BinOp, l: Value, r: Value, span: Span) -> Result<Value, Error> {
    use BinOp::*;
    match op {
        Add => match (&l, &r) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
            _ => numeric_op(op, &l, &r, span, |a, b| a + b),
        },
        Sub => match (&l, &r) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
            _ => numeric_op(op, &l, &r, span, |a, b| a - b),
        },
        Mul => match (&l, &r) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
            _ => numeric_op(op, &l, &r, span, |a, b| a * b),
        },
        Div => match (&l, &r) {
            (Value::Int(a), Value::Int(b)) => {
                if *b == 0 {
                    Err(Error::runtime("division/modulo by zero", span))
                } else {
                    Ok(Value::Int(a / b))
                }
            }
            _ => numeric_op(op, &l, &r, span, |a, b| a / b),
        },
        Mod => match (&l, &r) {
            (Value::Int(a), Value::Int(b)) => {
                if *b == 0 {
                    Err(Error::runtime("division/modulo by zero", span))
                } else {
                    Ok(Value::Int(a % b))
                }
            }
            (Value::Float(_), x) | (x, Value::Float(_)) if x.as_f64().is_some() => {
                let (a, b) = (l.as_f64().unwrap(), r.as_f64().unwrap());
                if b == 0.0 {
                    Err(Error::runtime("division/modulo by zero", span))
                } else {
                    Ok(Value::Float(a % b))
                }
            }
            _ => Err(invalid_operands(op, &l, &r, span)),
        },
        Eq => Ok(Value::Bool(values_equal(&l, &r))),
        Neq => Ok(Value::Bool(!values_equal(&l, &r))),
        Lt | Gt | LtEq | GtEq => compare(op, &l, &r, span),
        And | Or => unreachable!("logical operators are handled by eval_binary"),
    }
}

fn numeric_op(
    op: BinOp,
    l: &Value,
    r: &Value,
    span: Span,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, Error> {
    match (l.as_f64(), r.as_f64()) {
        (Some(a), Some(b)) => Ok(Value::Float(f(a, b))),
        _ => Err(invalid_operands(op, l, r, span)),
    }
}

fn invalid_operands(op: BinOp, l: &Value, r: &Value, span: Span) -> Error {
    Error::runtime(
        format!(
            "invalid operand types for '{}': {} and {}",
            op.symbol(),
            l.type_name(),
            r.type_name()
        ),
        span,
    )
}

pub fn values_equal(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Null, Value::Null) => true,
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Struct(a), Value::Struct(b)) => Rc::ptr_eq(a, b),
        _ => match (l.as_f64(), r.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn compare(op: BinOp, l: &Value, r: &Value, span: Span) -> Result<Value, Error> {
    let ordering = match (l, r) {
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        _ => match (l.as_f64(), r.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(invalid_operands(op, l, r, span)),
        },
    };
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    let result = match op {
        BinOp::Lt => ordering.is_lt(),
        BinOp::Gt => ordering.is_gt(),
        BinOp::LtEq => ordering.is_le(),
        BinOp::GtEq => ordering.is_ge(),
        _ => unreachable!(),
    };
    Ok(Value::Bool(result))
}
