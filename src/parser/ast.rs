use crate::span::Spanned;

#[derive(Debug, Clone)]
pub struct Program {
    pub decls: Vec<Spanned<Decl>>,
}

/// One import target. `raw` is the path as written; `path` is the rewritten
/// candidate (bare names map into `src/lib/std/`, everything else gains a
/// `.bn` suffix when missing).
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPath {
    pub raw: String,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct TypeField {
    pub name: Spanned<String>,
    pub ty: Spanned<String>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Spanned<String>,
    pub ty: Spanned<String>,
}

#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: Spanned<String>,
    pub fields: Vec<TypeField>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Spanned<String>,
    pub methods: Vec<Spanned<Function>>,
    pub statics: Vec<Spanned<Function>>,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    pub return_type: Option<Spanned<String>>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: Spanned<String>,
    pub ty: Option<Spanned<String>>,
    pub init: Option<Spanned<Expr>>,
    pub is_const: bool,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub decls: Vec<Spanned<Decl>>,
}

/// Top-level and block-level forms. Statements are declarations too, so a
/// block body is just a list of these.
#[derive(Debug, Clone)]
pub enum Decl {
    Import(Vec<Spanned<ImportPath>>),
    TypeDef(TypeDef),
    Class(ClassDecl),
    Function(Function),
    Var(VarDecl),
    Stmt(Stmt),
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(Block),
    Return(Option<Spanned<Expr>>),
    If {
        cond: Spanned<Expr>,
        then: Spanned<Block>,
        els: Option<Spanned<Block>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Spanned<Block>,
    },
    For {
        init: Option<Box<Spanned<Decl>>>,
        cond: Option<Spanned<Expr>>,
        incr: Option<Spanned<Expr>>,
        body: Spanned<Block>,
    },
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Variable(String),
    Assign {
        name: Spanned<String>,
        value: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Get {
        object: Box<Spanned<Expr>>,
        field: Spanned<String>,
    },
    Set {
        object: Box<Spanned<Expr>>,
        field: Spanned<String>,
        value: Box<Spanned<Expr>>,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Index {
        array: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    ArrayLit(Vec<Spanned<Expr>>),
    /// `name` is None for a bare `{ ... }` literal until the type checker
    /// fills it in from context.
    StructLit {
        name: Option<Spanned<String>>,
        fields: Vec<(Spanned<String>, Spanned<Expr>)>,
    },
    /// Class-qualified call, produced by the checker's lowering of
    /// `Call(Get(Variable(C), m), args)` when `C` names a class.
    ClassCall {
        class: Spanned<String>,
        method: Spanned<String>,
        args: Vec<Spanned<Expr>>,
        is_static: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}
