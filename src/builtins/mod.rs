pub mod console;
pub mod date;
pub mod http;
pub mod time;

use std::sync::OnceLock;

use crate::interp::env::Environment;
use crate::interp::value::Value;
use crate::typeck::env::{FuncSig, TypeEnv};
use crate::typeck::types::Type;

pub type BuiltinHandler = fn(&[Value]) -> Result<Value, String>;

/// One native binding. The same table seeds the type checker's prelude and
/// every interpreter environment, so the two can never drift apart.
pub struct BuiltinDef {
    /// Bare (`print`) or class-qualified (`Date.addDays`).
    pub name: String,
    pub params: Vec<Type>,
    pub ret: Type,
    pub handler: BuiltinHandler,
}

impl std::fmt::Debug for BuiltinDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinDef").field("name", &self.name).finish()
    }
}

impl BuiltinDef {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Type>,
        ret: Type,
        handler: BuiltinHandler,
    ) -> Self {
        Self { name: name.into(), params, ret, handler }
    }
}

static REGISTRY: OnceLock<Vec<BuiltinDef>> = OnceLock::new();

/// The full builtin table in registration order: console, date, time, http.
/// Class-qualified entries are followed by bare aliases where the library
/// binds them; on a bare-name collision the first registration wins.
pub fn registry() -> &'static [BuiltinDef] {
    REGISTRY.get_or_init(|| {
        let mut defs = Vec::new();
        defs.extend(console::builtins());
        with_bare_aliases(&mut defs, date::builtins());
        with_bare_aliases(&mut defs, time::builtins());
        defs.extend(http::builtins());
        defs
    })
}

/// Append qualified entries plus a bare alias for each, skipping aliases
/// whose name is already bound.
fn with_bare_aliases(defs: &mut Vec<BuiltinDef>, qualified: Vec<BuiltinDef>) {
    for def in qualified {
        let bare = def.name.split('.').next_back().unwrap_or(&def.name).to_string();
        let alias = (!defs.iter().any(|d| d.name == bare)).then(|| BuiltinDef {
            name: bare,
            params: def.params.clone(),
            ret: def.ret.clone(),
            handler: def.handler,
        });
        defs.push(def);
        defs.extend(alias);
    }
}

/// Register the builtin signatures, struct types, and class method rows in
/// a type environment (the checker's prelude).
pub fn seed_type_env(env: &mut TypeEnv) {
    env.types.insert("Date".to_string(), date::type_fields());
    env.types.insert("HTTPResponse".to_string(), http::response_type_fields());
    env.types.insert("Object".to_string(), Vec::new());

    for def in registry() {
        let sig = FuncSig { params: def.params.clone(), return_type: def.ret.clone() };
        match def.name.split_once('.') {
            Some((class, method)) => {
                env.classes
                    .entry(class.to_string())
                    .or_default()
                    .insert(format!("static.{method}"), sig);
            }
            None => {
                env.functions.entry(def.name.clone()).or_insert(sig);
            }
        }
    }
}

/// Bind every builtin into an interpreter environment. Qualified names are
/// bound verbatim; method dispatch resolves `<class>.<method>` against them.
pub fn seed_environment(env: &mut Environment) {
    for def in registry() {
        if env.get(&def.name).is_none() {
            env.define(def.name.clone(), Value::Builtin(def));
        }
    }
}

/// Shared arity guard for handlers.
pub(crate) fn expect_arity(name: &str, args: &[Value], count: usize) -> Result<(), String> {
    if args.len() != count {
        return Err(format!(
            "{name}: expected {count} argument{}, got {}",
            if count == 1 { "" } else { "s" },
            args.len()
        ));
    }
    Ok(())
}
