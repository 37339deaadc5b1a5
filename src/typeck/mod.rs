pub mod env;
pub mod types;

use crate::diagnostics::Error;
use crate::parser::ast::*;
use crate::span::{Span, Spanned};
use env::{FuncSig, TypeEnv};
use types::Type;

/// Type-check a program against a fresh prelude-seeded environment.
///
/// Checking mutates the AST in two ways: bare struct literals get their type
/// name filled in from context, and class-qualified calls are lowered to
/// `Expr::ClassCall`.
pub fn type_check(program: &mut Program) -> Result<TypeEnv, Error> {
    let mut env = TypeEnv::with_prelude();
    check_program(&mut env, program)?;
    Ok(env)
}

/// Check a program against an existing environment (REPL, import contexts).
pub fn check_program(env: &mut TypeEnv, program: &mut Program) -> Result<(), Error> {
    register_decls(env, &program.decls)?;
    for decl in &mut program.decls {
        let span = decl.span;
        check_decl(env, &mut decl.node, span)?;
    }
    Ok(())
}

/// Register declarations already merged into an interpreter (imported
/// modules) so the importer's own check sees their signatures.
pub fn seed_imports(env: &mut TypeEnv, interp: &crate::interp::Interpreter) -> Result<(), Error> {
    for (name, fields) in &interp.types {
        env.types.entry(name.clone()).or_insert_with(|| {
            fields
                .iter()
                .map(|(fname, fty)| (fname.clone(), Type::from_name(fty)))
                .collect()
        });
    }
    for (name, class) in &interp.classes {
        let mut methods = std::collections::HashMap::new();
        for (mname, m) in &class.methods {
            methods.insert(mname.clone(), function_sig(env, m)?);
        }
        for (mname, m) in &class.statics {
            methods.insert(format!("static.{mname}"), function_sig(env, m)?);
        }
        env.classes.entry(name.clone()).or_insert(methods);
    }
    for (name, func) in &interp.functions {
        let sig = function_sig(env, func)?;
        env.functions.entry(name.clone()).or_insert(sig);
    }
    Ok(())
}

fn resolve_type(env: &TypeEnv, name: &Spanned<String>) -> Result<Type, Error> {
    let ty = Type::from_name(&name.node);
    if matches!(ty, Type::Named(_)) && !env.is_known_type(&name.node) {
        return Err(Error::type_err(format!("unknown type '{}'", name.node), name.span));
    }
    Ok(ty)
}

fn function_sig(env: &TypeEnv, func: &Function) -> Result<FuncSig, Error> {
    let mut params = Vec::new();
    for p in &func.params {
        params.push(resolve_type(env, &p.ty)?);
    }
    let return_type = match &func.return_type {
        Some(rt) => resolve_type(env, rt)?,
        None => Type::Void,
    };
    Ok(FuncSig { params, return_type })
}

/// Pass 1: register every type, class, and function name so forward
/// references resolve, then resolve their signatures.
fn register_decls(env: &mut TypeEnv, decls: &[Spanned<Decl>]) -> Result<(), Error> {
    // 1a: names only
    for decl in decls {
        match &decl.node {
            Decl::TypeDef(td) => {
                env.types.insert(td.name.node.clone(), Vec::new());
            }
            Decl::Class(c) => {
                // classes also reserve a row in the type table
                env.types.insert(c.name.node.clone(), Vec::new());
                env.classes.insert(c.name.node.clone(), Default::default());
            }
            _ => {}
        }
    }

    // 1b: field lists and signatures
    for decl in decls {
        match &decl.node {
            Decl::TypeDef(td) => {
                let mut fields = Vec::new();
                for f in &td.fields {
                    fields.push((f.name.node.clone(), resolve_type(env, &f.ty)?));
                }
                env.types.insert(td.name.node.clone(), fields);
            }
            Decl::Class(c) => {
                let mut methods = std::collections::HashMap::new();
                for m in &c.methods {
                    methods.insert(m.node.name.node.clone(), function_sig(env, &m.node)?);
                }
                for m in &c.statics {
                    methods
                        .insert(format!("static.{}", m.node.name.node), function_sig(env, &m.node)?);
                }
                env.classes.insert(c.name.node.clone(), methods);
            }
            Decl::Function(f) => {
                let sig = function_sig(env, f)?;
                env.functions.insert(f.name.node.clone(), sig);
            }
            _ => {}
        }
    }

    Ok(())
}

fn check_decl(env: &mut TypeEnv, decl: &mut Decl, span: Span) -> Result<(), Error> {
    match decl {
        Decl::Import(_) => Ok(()),
        Decl::TypeDef(_) => Ok(()),
        Decl::Class(c) => {
            let class_name = c.name.node.clone();
            for m in &mut c.methods {
                check_function(env, &mut m.node, Some(&class_name))?;
            }
            for m in &mut c.statics {
                check_function(env, &mut m.node, None)?;
            }
            Ok(())
        }
        Decl::Function(f) => {
            // blocks may declare functions the registration pass never saw
            if !env.functions.contains_key(&f.name.node) {
                let sig = function_sig(env, f)?;
                env.functions.insert(f.name.node.clone(), sig);
            }
            check_function(env, f, None)
        }
        Decl::Var(v) => check_var(env, v, span),
        Decl::Stmt(s) => check_stmt(env, s, span, None),
    }
}

fn check_function(env: &mut TypeEnv, func: &mut Function, this_class: Option<&str>) -> Result<(), Error> {
    let sig = function_sig(env, func)?;
    // function bodies see builtins and parameters only, never the
    // caller's variables
    let saved = env.enter_function();
    if let Some(class) = this_class {
        env.define("this".to_string(), Type::Named(class.to_string()));
    }
    for (p, ty) in func.params.iter().zip(&sig.params) {
        env.define(p.name.node.clone(), ty.clone());
    }

    let result = check_block(env, &mut func.body.node, Some(&sig.return_type));
    env.exit_function(saved);
    result?;

    if sig.return_type != Type::Void && !block_returns(&func.body.node) {
        return Err(Error::type_err(
            format!(
                "missing return: not all paths in function '{}' return {}",
                func.name.node, sig.return_type
            ),
            func.name.span,
        ));
    }
    Ok(())
}

fn check_block(env: &mut TypeEnv, block: &mut Block, ret: Option<&Type>) -> Result<(), Error> {
    for decl in &mut block.decls {
        let span = decl.span;
        match &mut decl.node {
            Decl::Stmt(s) => check_stmt(env, s, span, ret)?,
            other => check_decl(env, other, span)?,
        }
    }
    Ok(())
}

fn check_stmt(env: &mut TypeEnv, stmt: &mut Stmt, span: Span, ret: Option<&Type>) -> Result<(), Error> {
    match stmt {
        Stmt::Block(block) => {
            env.push_scope();
            let result = check_block(env, block, ret);
            env.pop_scope();
            result
        }
        Stmt::Return(value) => {
            let Some(expected) = ret else {
                return Err(Error::type_err("return outside of a function", span));
            };
            match value {
                Some(expr) => {
                    if *expected == Type::Void {
                        return Err(Error::type_err(
                            "void function cannot return a value",
                            expr.span,
                        ));
                    }
                    fill_struct_lit_name(expr, expected);
                    let actual = infer_expr(env, expr)?;
                    if !expected.accepts(&actual) {
                        return Err(Error::type_err(
                            format!("return type mismatch: expected {expected}, got {actual}"),
                            expr.span,
                        ));
                    }
                    Ok(())
                }
                None => {
                    if *expected != Type::Void {
                        return Err(Error::type_err(
                            format!("function must return a value of type {expected}"),
                            span,
                        ));
                    }
                    Ok(())
                }
            }
        }
        Stmt::If { cond, then, els } => {
            expect_bool_cond(env, cond)?;
            env.push_scope();
            let result = check_block(env, &mut then.node, ret);
            env.pop_scope();
            result?;
            if let Some(els) = els {
                env.push_scope();
                let result = check_block(env, &mut els.node, ret);
                env.pop_scope();
                result?;
            }
            Ok(())
        }
        Stmt::While { cond, body } => {
            expect_bool_cond(env, cond)?;
            env.push_scope();
            let result = check_block(env, &mut body.node, ret);
            env.pop_scope();
            result
        }
        Stmt::For { init, cond, incr, body } => {
            env.push_scope();
            let result = (|| {
                if let Some(init) = init {
                    let init_span = init.span;
                    check_decl(env, &mut init.node, init_span)?;
                }
                if let Some(cond) = cond {
                    expect_bool_cond(env, cond)?;
                }
                if let Some(incr) = incr {
                    infer_expr(env, incr)?;
                }
                check_block(env, &mut body.node, ret)
            })();
            env.pop_scope();
            result
        }
        Stmt::Expr(expr) => infer_expr(env, expr).map(|_| ()),
    }
}

fn expect_bool_cond(env: &mut TypeEnv, cond: &mut Spanned<Expr>) -> Result<(), Error> {
    let ty = infer_expr(env, cond)?;
    if !Type::Bool.accepts(&ty) {
        return Err(Error::type_err(
            format!("condition must be bool, got {ty}"),
            cond.span,
        ));
    }
    Ok(())
}

fn check_var(env: &mut TypeEnv, v: &mut VarDecl, span: Span) -> Result<(), Error> {
    if v.is_const && v.init.is_none() {
        return Err(Error::type_err(
            format!("const '{}' requires an initializer", v.name.node),
            span,
        ));
    }

    let declared = match &v.ty {
        Some(t) => Some(resolve_type(env, t)?),
        None => None,
    };

    let ty = match &mut v.init {
        Some(init) => {
            if let Some(declared) = &declared {
                fill_struct_lit_name(init, declared);
            }
            let inferred = infer_expr(env, init)?;
            if inferred == Type::Void {
                return Err(Error::type_err(
                    format!("cannot assign void to variable '{}'", v.name.node),
                    init.span,
                ));
            }
            match declared {
                Some(declared) => {
                    if !declared.accepts(&inferred) {
                        return Err(Error::type_err(
                            format!(
                                "type mismatch: '{}' declared {declared} but initialized with {inferred}",
                                v.name.node
                            ),
                            init.span,
                        ));
                    }
                    declared
                }
                None => inferred,
            }
        }
        None => match declared {
            Some(declared) => declared,
            None => {
                return Err(Error::type_err(
                    format!("variable '{}' needs a type or an initializer", v.name.node),
                    span,
                ));
            }
        },
    };

    // remember the element type of array bindings with literal initializers
    if let Some(init) = &v.init {
        if let Some(elem) = array_element_type(env, init) {
            env.array_types.insert(v.name.node.clone(), elem);
        }
    }

    if v.is_const {
        env.define_const(v.name.node.clone(), ty);
    } else {
        env.define(v.name.node.clone(), ty);
    }
    Ok(())
}

fn array_element_type(env: &mut TypeEnv, init: &Spanned<Expr>) -> Option<Type> {
    match &init.node {
        Expr::ArrayLit(elements) => {
            // elements were already inferred; re-derive from the first
            elements.first().and_then(|e| peek_type(env, e))
        }
        Expr::Variable(name) => env.array_types.get(name.as_str()).cloned(),
        _ => None,
    }
}

/// Best-effort type of an already-checked expression, for array element
/// recording only.
fn peek_type(env: &mut TypeEnv, expr: &Spanned<Expr>) -> Option<Type> {
    let mut clone = expr.clone();
    infer_expr(env, &mut clone).ok()
}

/// Give a bare `{ ... }` literal its type name from context: the declared
/// variable type, the enclosing return type, or the parameter type.
fn fill_struct_lit_name(expr: &mut Spanned<Expr>, ty: &Type) {
    if let Expr::StructLit { name, .. } = &mut expr.node {
        if name.is_none() {
            if let Type::Named(n) = ty {
                *name = Some(Spanned::new(n.clone(), expr.span));
            }
        }
    }
}

fn infer_expr(env: &mut TypeEnv, expr: &mut Spanned<Expr>) -> Result<Type, Error> {
    let span = expr.span;
    match &mut expr.node {
        Expr::Int(_) => Ok(Type::Int),
        Expr::Float(_) => Ok(Type::Float),
        Expr::Str(_) => Ok(Type::Str),
        Expr::Bool(_) => Ok(Type::Bool),
        Expr::Variable(name) => match env.lookup(name) {
            Some(ty) => Ok(ty.clone()),
            None => Err(Error::type_err(format!("unknown variable '{name}'"), span)),
        },
        Expr::Assign { name, value } => {
            let Some(target) = env.lookup(&name.node).cloned() else {
                return Err(Error::type_err(
                    format!("unknown variable '{}'", name.node),
                    name.span,
                ));
            };
            if env.is_const(&name.node) {
                return Err(Error::type_err(
                    format!("cannot assign to constant '{}'", name.node),
                    name.span,
                ));
            }
            fill_struct_lit_name(value, &target);
            let actual = infer_expr(env, value)?;
            if !target.accepts(&actual) {
                return Err(Error::type_err(
                    format!("cannot assign {actual} to '{}' of type {target}", name.node),
                    value.span,
                ));
            }
            Ok(actual)
        }
        Expr::Binary { op, lhs, rhs } => {
            let op = *op;
            let lt = infer_expr(env, lhs)?;
            let rt = infer_expr(env, rhs)?;
            infer_binary(op, &lt, &rt, span)
        }
        Expr::Unary { op, operand } => {
            let op = *op;
            let ty = infer_expr(env, operand)?;
            match op {
                UnaryOp::Neg if ty.is_numeric() || ty == Type::Any => Ok(ty),
                UnaryOp::Not if ty == Type::Bool || ty == Type::Any => Ok(Type::Bool),
                UnaryOp::Neg => Err(Error::type_err(
                    format!("cannot negate a value of type {ty}"),
                    span,
                )),
                UnaryOp::Not => Err(Error::type_err(
                    format!("'!' requires bool, got {ty}"),
                    span,
                )),
            }
        }
        Expr::Get { object, field } => {
            // a class-qualified name is only meaningful as a call target
            if let Expr::Variable(obj_name) = &object.node {
                if env.lookup(obj_name).is_none() && env.is_class(obj_name) {
                    return Err(Error::type_err(
                        format!(
                            "'{}.{}' is a method reference; call it with arguments",
                            obj_name, field.node
                        ),
                        span,
                    ));
                }
            }
            let obj_ty = infer_expr(env, object)?;
            field_type(env, &obj_ty, field, span)
        }
        Expr::Set { object, field, value } => {
            let obj_ty = infer_expr(env, object)?;
            let field_ty = field_type(env, &obj_ty, field, span)?;
            fill_struct_lit_name(value, &field_ty);
            let actual = infer_expr(env, value)?;
            if !field_ty.accepts(&actual) {
                return Err(Error::type_err(
                    format!(
                        "cannot assign {actual} to field '{}' of type {field_ty}",
                        field.node
                    ),
                    value.span,
                ));
            }
            Ok(actual)
        }
        Expr::Call { .. } => infer_call(env, expr),
        Expr::ClassCall { class, method, args, is_static } => {
            let class = class.clone();
            let method = method.clone();
            let is_static = *is_static;
            check_class_call(env, &class, &method, args, is_static, span)
        }
        Expr::Index { array, index } => {
            let arr_ty = infer_expr(env, array)?;
            if arr_ty != Type::Array && arr_ty != Type::Any {
                return Err(Error::type_err(
                    format!("cannot index a value of type {arr_ty}"),
                    span,
                ));
            }
            let idx_ty = infer_expr(env, index)?;
            if !Type::Int.accepts(&idx_ty) {
                return Err(Error::type_err(
                    format!("array index must be int, got {idx_ty}"),
                    index.span,
                ));
            }
            if let Expr::Variable(name) = &array.node {
                if let Some(elem) = env.array_types.get(name.as_str()) {
                    return Ok(elem.clone());
                }
            }
            Ok(Type::Any)
        }
        Expr::ArrayLit(elements) => {
            let mut elem_ty: Option<Type> = None;
            for e in elements.iter_mut() {
                let ty = infer_expr(env, e)?;
                match &elem_ty {
                    None => elem_ty = Some(ty),
                    Some(expected) if expected.accepts(&ty) => {}
                    Some(expected) => {
                        return Err(Error::type_err(
                            format!("array elements must share a type: found {expected} and {ty}"),
                            e.span,
                        ));
                    }
                }
            }
            Ok(Type::Array)
        }
        Expr::StructLit { name, fields } => {
            let Some(name) = name.clone() else {
                return Err(Error::type_err(
                    "cannot infer the type of this struct literal; annotate the variable or name the type",
                    span,
                ));
            };
            check_struct_lit(env, &name, fields, span)
        }
    }
}

fn infer_binary(op: BinOp, lt: &Type, rt: &Type, span: Span) -> Result<Type, Error> {
    use BinOp::*;
    match op {
        Add | Sub | Mul | Div | Mod => {
            if *lt == Type::Any || *rt == Type::Any {
                return Ok(Type::Any);
            }
            if op == Add && *lt == Type::Str && *rt == Type::Str {
                return Ok(Type::Str);
            }
            if lt.is_numeric() && rt.is_numeric() {
                if *lt == Type::Float || *rt == Type::Float {
                    return Ok(Type::Float);
                }
                return Ok(Type::Int);
            }
            Err(Error::type_err(
                format!("invalid operand types for '{}': {lt} and {rt}", op.symbol()),
                span,
            ))
        }
        And | Or => {
            if (Type::Bool.accepts(lt)) && (Type::Bool.accepts(rt)) {
                Ok(Type::Bool)
            } else {
                Err(Error::type_err(
                    format!("'{}' requires bool operands, got {lt} and {rt}", op.symbol()),
                    span,
                ))
            }
        }
        Eq | Neq | Lt | Gt | LtEq | GtEq => {
            let comparable = (lt.is_numeric() && rt.is_numeric())
                || *lt == Type::Any
                || *rt == Type::Any
                || lt == rt;
            if comparable {
                Ok(Type::Bool)
            } else {
                Err(Error::type_err(
                    format!("cannot compare {lt} with {rt}"),
                    span,
                ))
            }
        }
    }
}

fn field_type(
    env: &TypeEnv,
    obj_ty: &Type,
    field: &Spanned<String>,
    span: Span,
) -> Result<Type, Error> {
    match obj_ty {
        Type::Any => Ok(Type::Any),
        Type::Named(n) => {
            // class instances carry open state; records are closed
            if env.is_class(n) && env.types.get(n).is_none_or(|f| f.is_empty()) {
                return Ok(Type::Any);
            }
            match env.types.get(n) {
                Some(fields) => fields
                    .iter()
                    .find(|(fname, _)| fname == &field.node)
                    .map(|(_, ty)| ty.clone())
                    .ok_or_else(|| {
                        Error::type_err(
                            format!("unknown field '{}' on {n}", field.node),
                            field.span,
                        )
                    }),
                None => Err(Error::type_err(format!("unknown type '{n}'"), span)),
            }
        }
        other => Err(Error::type_err(
            format!("cannot access field '{}' on a value of type {other}", field.node),
            span,
        )),
    }
}

/// Type a call expression. Class-qualified calls are lowered to
/// `Expr::ClassCall` in place.
fn infer_call(env: &mut TypeEnv, expr: &mut Spanned<Expr>) -> Result<Type, Error> {
    let span = expr.span;

    // `C.m(args)` where C names a class and not a variable: static
    // dispatch, lowered in place
    let lowered = match &expr.node {
        Expr::Call { callee, .. } => match &callee.node {
            Expr::Get { object, field } => match &object.node {
                Expr::Variable(class_name)
                    if env.lookup(class_name).is_none() && env.is_class(class_name) =>
                {
                    Some((Spanned::new(class_name.clone(), object.span), field.clone()))
                }
                _ => None,
            },
            _ => None,
        },
        _ => unreachable!(),
    };
    if let Some((class, method)) = lowered {
        let Expr::Call { args, .. } = &mut expr.node else { unreachable!() };
        let mut arg_exprs = std::mem::take(args);
        let result = check_class_call(env, &class, &method, &mut arg_exprs, true, span)?;
        expr.node = Expr::ClassCall { class, method, args: arg_exprs, is_static: true };
        return Ok(result);
    }

    let Expr::Call { callee, args } = &mut expr.node else { unreachable!() };

    // `obj.m(args)`: instance dispatch on the receiver's class
    if let Expr::Get { object, field } = &mut callee.node {
        let obj_ty = infer_expr(env, object)?;
        let method = field.clone();
        return match &obj_ty {
            Type::Any => {
                for a in args.iter_mut() {
                    infer_expr(env, a)?;
                }
                Ok(Type::Any)
            }
            Type::Named(n) if env.is_class(n) => {
                let class = Spanned::new(n.clone(), object.span);
                check_class_call(env, &class, &method, args, false, span)
            }
            other => Err(Error::type_err(
                format!("cannot call method '{}' on a value of type {other}", method.node),
                span,
            )),
        };
    }

    // plain function call by name
    if let Expr::Variable(fname) = &callee.node {
        let fname = fname.clone();
        let Some(sig) = env.functions.get(&fname).cloned() else {
            return Err(Error::type_err(format!("unknown function '{fname}'"), callee.span));
        };
        check_args(env, &fname, &sig, args, span)?;
        return Ok(sig.return_type);
    }

    Err(Error::type_err("expression is not callable", span))
}

fn check_class_call(
    env: &mut TypeEnv,
    class: &Spanned<String>,
    method: &Spanned<String>,
    args: &mut [Spanned<Expr>],
    is_static: bool,
    span: Span,
) -> Result<Type, Error> {
    let Some(methods) = env.classes.get(&class.node) else {
        return Err(Error::type_err(format!("unknown class '{}'", class.node), class.span));
    };

    let key = if is_static {
        format!("static.{}", method.node)
    } else {
        method.node.clone()
    };
    let other_key = if is_static {
        method.node.clone()
    } else {
        format!("static.{}", method.node)
    };

    let Some(sig) = methods.get(&key).cloned() else {
        if methods.contains_key(&other_key) {
            let msg = if is_static {
                format!(
                    "method '{}' of class '{}' is not static; call it on an instance",
                    method.node, class.node
                )
            } else {
                format!(
                    "method '{}' of class '{}' is static; call it on the class",
                    method.node, class.node
                )
            };
            return Err(Error::type_err(msg, method.span));
        }
        return Err(Error::type_err(
            format!("unknown method '{}' on class '{}'", method.node, class.node),
            method.span,
        ));
    };

    let label = format!("{}.{}", class.node, method.node);
    check_args(env, &label, &sig, args, span)?;
    Ok(sig.return_type)
}

fn check_args(
    env: &mut TypeEnv,
    label: &str,
    sig: &FuncSig,
    args: &mut [Spanned<Expr>],
    span: Span,
) -> Result<(), Error> {
    if args.len() != sig.params.len() {
        return Err(Error::type_err(
            format!(
                "'{label}' expects {} argument{}, got {}",
                sig.params.len(),
                if sig.params.len() == 1 { "" } else { "s" },
                args.len()
            ),
            span,
        ));
    }
    for (i, (arg, expected)) in args.iter_mut().zip(&sig.params).enumerate() {
        fill_struct_lit_name(arg, expected);
        let actual = infer_expr(env, arg)?;
        if !expected.accepts(&actual) {
            return Err(Error::type_err(
                format!("argument {} of '{label}' expects {expected}, got {actual}", i + 1),
                arg.span,
            ));
        }
    }
    Ok(())
}

fn check_struct_lit(
    env: &mut TypeEnv,
    name: &Spanned<String>,
    fields: &mut [(Spanned<String>, Spanned<Expr>)],
    span: Span,
) -> Result<Type, Error> {
    if env.is_class(&name.node) {
        // class instances: open field set
        for (_, value) in fields.iter_mut() {
            infer_expr(env, value)?;
        }
        return Ok(Type::Named(name.node.clone()));
    }

    let Some(decl_fields) = env.types.get(&name.node).cloned() else {
        return Err(Error::type_err(format!("unknown type '{}'", name.node), name.span));
    };

    for (fname, value) in fields.iter_mut() {
        let Some((_, expected)) = decl_fields.iter().find(|(n, _)| n == &fname.node) else {
            return Err(Error::type_err(
                format!("unknown field '{}' on {}", fname.node, name.node),
                fname.span,
            ));
        };
        fill_struct_lit_name(value, expected);
        let actual = infer_expr(env, value)?;
        if !expected.accepts(&actual) {
            return Err(Error::type_err(
                format!(
                    "field '{}' of {} expects {expected}, got {actual}",
                    fname.node, name.node
                ),
                value.span,
            ));
        }
    }

    for (decl_name, _) in &decl_fields {
        if !fields.iter().any(|(n, _)| &n.node == decl_name) {
            return Err(Error::type_err(
                format!("missing field '{decl_name}' in {} literal", name.node),
                span,
            ));
        }
    }

    Ok(Type::Named(name.node.clone()))
}

/// Does every path through this block reach a `return`?
fn block_returns(block: &Block) -> bool {
    block.decls.iter().any(|d| decl_returns(&d.node))
}

fn decl_returns(decl: &Decl) -> bool {
    match decl {
        Decl::Stmt(Stmt::Return(_)) => true,
        Decl::Stmt(Stmt::Block(block)) => block_returns(block),
        Decl::Stmt(Stmt::If { then, els, .. }) => match els {
            Some(els) => block_returns(&then.node) && block_returns(&els.node),
            None => false,
        },
        _ => false,
    }
}
