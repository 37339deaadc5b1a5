//! Debug dumps of the token stream and AST for `burn run --debug`.

use std::fmt::Write;

use crate::lexer::token::Token;
use crate::parser::ast::*;
use crate::span::Spanned;

pub fn dump_tokens(source: &str, tokens: &[Spanned<Token>]) -> String {
    let mut out = String::new();
    for tok in tokens {
        let (line, col) = crate::span::line_col(source, tok.span.start);
        let lexeme = &source[tok.span.start..tok.span.end];
        let _ = writeln!(out, "{line}:{col}\t{:?}\t{lexeme:?}", tok.node);
    }
    out.push_str("EOF\n");
    out
}

pub fn dump_program(program: &Program) -> String {
    let mut out = String::new();
    for decl in &program.decls {
        write_decl(&mut out, &decl.node, 0);
    }
    out
}

fn pad(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_decl(out: &mut String, decl: &Decl, depth: usize) {
    match decl {
        Decl::Import(paths) => {
            pad(out, depth);
            let names: Vec<&str> = paths.iter().map(|p| p.node.raw.as_str()).collect();
            let _ = writeln!(out, "Import({})", names.join(", "));
        }
        Decl::TypeDef(td) => {
            pad(out, depth);
            let fields: Vec<String> = td
                .fields
                .iter()
                .map(|f| format!("{}: {}", f.name.node, f.ty.node))
                .collect();
            let _ = writeln!(out, "TypeDef {} {{ {} }}", td.name.node, fields.join(", "));
        }
        Decl::Class(c) => {
            pad(out, depth);
            let _ = writeln!(out, "Class {}", c.name.node);
            for m in &c.methods {
                write_function(out, &m.node, depth + 1, "method");
            }
            for m in &c.statics {
                write_function(out, &m.node, depth + 1, "static");
            }
        }
        Decl::Function(f) => write_function(out, f, depth, "Function"),
        Decl::Var(v) => {
            pad(out, depth);
            let kind = if v.is_const { "Const" } else { "Var" };
            let ty = v.ty.as_ref().map(|t| format!(": {}", t.node)).unwrap_or_default();
            let _ = writeln!(out, "{kind} {}{ty}", v.name.node);
            if let Some(init) = &v.init {
                write_expr(out, &init.node, depth + 1);
            }
        }
        Decl::Stmt(s) => write_stmt(out, s, depth),
    }
}

fn write_function(out: &mut String, f: &Function, depth: usize, label: &str) {
    pad(out, depth);
    let params: Vec<String> = f
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name.node, p.ty.node))
        .collect();
    let ret = f
        .return_type
        .as_ref()
        .map(|t| format!(": {}", t.node))
        .unwrap_or_default();
    let _ = writeln!(out, "{label} {}({}){ret}", f.name.node, params.join(", "));
    for decl in &f.body.node.decls {
        write_decl(out, &decl.node, depth + 1);
    }
}

fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    match stmt {
        Stmt::Block(block) => {
            pad(out, depth);
            out.push_str("Block\n");
            for decl in &block.decls {
                write_decl(out, &decl.node, depth + 1);
            }
        }
        Stmt::Return(value) => {
            pad(out, depth);
            out.push_str("Return\n");
            if let Some(value) = value {
                write_expr(out, &value.node, depth + 1);
            }
        }
        Stmt::If { cond, then, els } => {
            pad(out, depth);
            out.push_str("If\n");
            write_expr(out, &cond.node, depth + 1);
            for decl in &then.node.decls {
                write_decl(out, &decl.node, depth + 1);
            }
            if let Some(els) = els {
                pad(out, depth);
                out.push_str("Else\n");
                for decl in &els.node.decls {
                    write_decl(out, &decl.node, depth + 1);
                }
            }
        }
        Stmt::While { cond, body } => {
            pad(out, depth);
            out.push_str("While\n");
            write_expr(out, &cond.node, depth + 1);
            for decl in &body.node.decls {
                write_decl(out, &decl.node, depth + 1);
            }
        }
        Stmt::For { init, cond, incr, body } => {
            pad(out, depth);
            out.push_str("For\n");
            if let Some(init) = init {
                write_decl(out, &init.node, depth + 1);
            }
            if let Some(cond) = cond {
                write_expr(out, &cond.node, depth + 1);
            }
            if let Some(incr) = incr {
                write_expr(out, &incr.node, depth + 1);
            }
            for decl in &body.node.decls {
                write_decl(out, &decl.node, depth + 1);
            }
        }
        Stmt::Expr(expr) => write_expr(out, &expr.node, depth),
    }
}

fn write_expr(out: &mut String, expr: &Expr, depth: usize) {
    pad(out, depth);
    match expr {
        Expr::Int(n) => {
            let _ = writeln!(out, "Int {n}");
        }
        Expr::Float(n) => {
            let _ = writeln!(out, "Float {n}");
        }
        Expr::Str(s) => {
            let _ = writeln!(out, "Str {s:?}");
        }
        Expr::Bool(b) => {
            let _ = writeln!(out, "Bool {b}");
        }
        Expr::Variable(name) => {
            let _ = writeln!(out, "Variable {name}");
        }
        Expr::Assign { name, value } => {
            let _ = writeln!(out, "Assign {}", name.node);
            write_expr(out, &value.node, depth + 1);
        }
        Expr::Binary { op, lhs, rhs } => {
            let _ = writeln!(out, "Binary {}", op.symbol());
            write_expr(out, &lhs.node, depth + 1);
            write_expr(out, &rhs.node, depth + 1);
        }
        Expr::Unary { op, operand } => {
            let sym = match op {
                UnaryOp::Neg => "-",
                UnaryOp::Not => "!",
            };
            let _ = writeln!(out, "Unary {sym}");
            write_expr(out, &operand.node, depth + 1);
        }
        Expr::Get { object, field } => {
            let _ = writeln!(out, "Get .{}", field.node);
            write_expr(out, &object.node, depth + 1);
        }
        Expr::Set { object, field, value } => {
            let _ = writeln!(out, "Set .{}", field.node);
            write_expr(out, &object.node, depth + 1);
            write_expr(out, &value.node, depth + 1);
        }
        Expr::Call { callee, args } => {
            let _ = writeln!(out, "Call");
            write_expr(out, &callee.node, depth + 1);
            for arg in args {
                write_expr(out, &arg.node, depth + 1);
            }
        }
        Expr::Index { array, index } => {
            let _ = writeln!(out, "Index");
            write_expr(out, &array.node, depth + 1);
            write_expr(out, &index.node, depth + 1);
        }
        Expr::ArrayLit(elements) => {
            let _ = writeln!(out, "ArrayLit[{}]", elements.len());
            for e in elements {
                write_expr(out, &e.node, depth + 1);
            }
        }
        Expr::StructLit { name, fields } => {
            let label = name.as_ref().map(|n| n.node.as_str()).unwrap_or("<inferred>");
            let _ = writeln!(out, "StructLit {label}");
            for (fname, fvalue) in fields {
                pad(out, depth + 1);
                let _ = writeln!(out, "{}:", fname.node);
                write_expr(out, &fvalue.node, depth + 2);
            }
        }
        Expr::ClassCall { class, method, args, is_static } => {
            let kind = if *is_static { "static" } else { "instance" };
            let _ = writeln!(out, "ClassCall {}.{} ({kind})", class.node, method.node);
            for arg in args {
                write_expr(out, &arg.node, depth + 1);
            }
        }
    }
}
