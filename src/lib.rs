pub mod errors;
pub mod value;
pub mod vocabulary;
pub mod config;
pub mod host;
pub mod store;
pub mod commands; // host command surface
mod view;

use serde_json::Value;
use std::sync::Arc;

use commands::CommandRegistry;
use config::{ContextDeclaration, Settings};
use errors::Result;
use host::Host;
use store::ContextStore;

/// An activated set of contexts bound to a host.
///
/// Activation normalizes the settings, sends every declared initial value to
/// the host and binds the commands. Nothing is persisted: a new activation
/// always starts from the declared defaults.
pub struct Contextually<H: Host> {
    host: H,
    store: ContextStore,
    commands: CommandRegistry,
    declarations: Vec<Arc<ContextDeclaration>>,
}

impl<H: Host> Contextually<H> {
    pub fn activate(settings: &Settings, host: H) -> Self {
        let mut this = Self {
            host,
            store: ContextStore::new(),
            commands: CommandRegistry::with_builtins(),
            declarations: Vec::new(),
        };
        for decl in settings.declarations() {
            let decl = Arc::new(decl);
            this.store
                .set_context(&decl, decl.initial.clone(), &mut this.host);
            this.commands.bind(&decl);
            this.declarations.push(decl);
        }
        tracing::info!(
            contexts = this.declarations.len(),
            commands = this.commands.names().count(),
            "contexts activated"
        );
        this
    }

    /// Invoke a registered command by name.
    pub fn execute(&mut self, command: &str, args: &[Value]) -> Result<Value> {
        self.commands
            .execute(command, &mut self.store, &mut self.host, args)
    }

    pub fn get_value(&self, name: &str) -> Option<&value::ContextValue> {
        self.store.get_value(name)
    }

    pub fn declarations(&self) -> &[Arc<ContextDeclaration>] {
        &self.declarations
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Dispose owned status items and hand the host back.
    pub fn deactivate(mut self) -> H {
        self.store.teardown(&mut self.host);
        self.host
    }
}

/// Convenience: activate from a JSON settings document.
pub fn activate<H: Host>(settings_json: &str, host: H) -> Result<Contextually<H>> {
    let settings = Settings::from_json_str(settings_json)?;
    Ok(Contextually::activate(&settings, host))
}

pub use config::normalize;
pub use host::MemoryHost;
pub use value::ContextValue;
pub use vocabulary::{cursorify, map_background_color, CursorStyle};
