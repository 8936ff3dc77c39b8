use crate::config::ContextDeclaration;
use crate::errors::{ContextError, Result};
use crate::host::Host;
use crate::store::ContextStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub const PREFIX: &str = "contextually.";
pub const SET_CONTEXT: &str = "contextually.setContext";
pub const GET_CONTEXT: &str = "contextually.getContext";

pub fn turn_on_name(context: &str) -> String {
    format!("{PREFIX}turnOn{context}")
}

pub fn turn_off_name(context: &str) -> String {
    format!("{PREFIX}turnOff{context}")
}

pub fn toggle_name(context: &str) -> String {
    format!("{PREFIX}toggle{context}")
}

/// A host command bound to the context store.
pub trait Command: Send + Sync {
    fn name(&self) -> String;
    fn arity(&self) -> std::ops::RangeInclusive<usize>;
    fn call(&self, store: &mut ContextStore, host: &mut dyn Host, args: &[Value]) -> Result<Value>;
}

/// Command name → handler. Registering a taken name replaces the old handler.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    inner: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The generic set/get commands every activation provides.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(builtins::SetContext);
        registry.register(builtins::GetContext);
        registry
    }

    /// Bind the commands a declaration asks for.
    pub fn bind(&mut self, decl: &Arc<ContextDeclaration>) {
        if decl.auto_commands {
            self.register(builtins::TurnOn(Arc::clone(decl)));
            self.register(builtins::TurnOff(Arc::clone(decl)));
            self.register(builtins::Toggle(Arc::clone(decl)));
        }
    }

    pub fn register<C: Command + 'static>(&mut self, c: C) {
        let name = c.name();
        if self.inner.insert(name.clone(), Arc::new(c)).is_some() {
            tracing::debug!(%name, "command re-registered, previous handler replaced");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.inner.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn execute(
        &self,
        name: &str,
        store: &mut ContextStore,
        host: &mut dyn Host,
        args: &[Value],
    ) -> Result<Value> {
        let command = self
            .get(name)
            .ok_or_else(|| ContextError::UnknownCommand(name.to_string()))?;
        if !command.arity().contains(&args.len()) {
            return Err(ContextError::InvalidArguments {
                command: name.to_string(),
                reason: format!("expected {:?} arguments, got {}", command.arity(), args.len()),
            });
        }
        command.call(store, host, args)
    }
}

pub mod builtins {
    use super::*;
    use crate::value::ContextValue;

    pub struct TurnOn(pub Arc<ContextDeclaration>);
    impl Command for TurnOn {
        fn name(&self) -> String { turn_on_name(&self.0.name) }
        fn arity(&self) -> std::ops::RangeInclusive<usize> { 0..=0 }
        fn call(&self, store: &mut ContextStore, host: &mut dyn Host, _: &[Value]) -> Result<Value> {
            store.set_context(&self.0, ContextValue::Bool(true), host);
            Ok(Value::Null)
        }
    }

    pub struct TurnOff(pub Arc<ContextDeclaration>);
    impl Command for TurnOff {
        fn name(&self) -> String { turn_off_name(&self.0.name) }
        fn arity(&self) -> std::ops::RangeInclusive<usize> { 0..=0 }
        fn call(&self, store: &mut ContextStore, host: &mut dyn Host, _: &[Value]) -> Result<Value> {
            store.set_context(&self.0, ContextValue::Bool(false), host);
            Ok(Value::Null)
        }
    }

    /// Negates a boolean context. Non-boolean values are left alone.
    pub struct Toggle(pub Arc<ContextDeclaration>);
    impl Command for Toggle {
        fn name(&self) -> String { toggle_name(&self.0.name) }
        fn arity(&self) -> std::ops::RangeInclusive<usize> { 0..=0 }
        fn call(&self, store: &mut ContextStore, host: &mut dyn Host, _: &[Value]) -> Result<Value> {
            let current = store
                .get_value(&self.0.name)
                .cloned()
                .unwrap_or_else(|| self.0.initial.clone());
            match current.as_bool() {
                Some(b) => store.set_context(&self.0, ContextValue::Bool(!b), host),
                None => tracing::warn!(name = %self.0.name, %current, "toggle ignored, context is not boolean"),
            }
            Ok(Value::Null)
        }
    }

    /// `setContext(name, value)`, also accepting a single `[name, value]` array.
    pub struct SetContext;
    impl Command for SetContext {
        fn name(&self) -> String { SET_CONTEXT.to_string() }
        fn arity(&self) -> std::ops::RangeInclusive<usize> { 1..=2 }
        fn call(&self, store: &mut ContextStore, host: &mut dyn Host, args: &[Value]) -> Result<Value> {
            let pair = match args {
                [Value::Array(inner)] => inner.as_slice(),
                _ => args,
            };
            let invalid = |reason: &str| ContextError::InvalidArguments {
                command: SET_CONTEXT.to_string(),
                reason: reason.to_string(),
            };
            let [name, value] = pair else {
                return Err(invalid("expected a name and a value"));
            };
            let name = name
                .as_str()
                .filter(|n| !n.is_empty())
                .ok_or_else(|| invalid("name must be a non-empty string"))?;
            let value = ContextValue::from_json(value)
                .ok_or_else(|| invalid("value must be a boolean, number or string"))?;
            let decl = Arc::new(ContextDeclaration::ad_hoc(name, value.clone()));
            store.set_context(&decl, value, host);
            Ok(Value::Null)
        }
    }

    /// Read back the cached value; `null` for contexts never set.
    pub struct GetContext;
    impl Command for GetContext {
        fn name(&self) -> String { GET_CONTEXT.to_string() }
        fn arity(&self) -> std::ops::RangeInclusive<usize> { 1..=1 }
        fn call(&self, store: &mut ContextStore, _: &mut dyn Host, args: &[Value]) -> Result<Value> {
            let name = args.first().and_then(Value::as_str).unwrap_or("");
            Ok(store.get_value(name).map(ContextValue::to_json).unwrap_or(Value::Null))
        }
    }
}
