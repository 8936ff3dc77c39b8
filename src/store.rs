use crate::config::ContextDeclaration;
use crate::host::{Host, StatusHandle};
use crate::value::ContextValue;
use crate::view;
use std::collections::HashMap;
use std::sync::Arc;

/// Live state for one context.
#[derive(Debug, Clone)]
pub struct RuntimeEntry {
    pub declaration: Arc<ContextDeclaration>,
    pub current: ContextValue,
    pub status: Option<StatusHandle>,
}

/// Name → runtime entry, and the only place context values change.
///
/// The host exposes no read API for the flags it is sent, so the cached value
/// here always equals the last value sent downstream.
#[derive(Debug, Default)]
pub struct ContextStore {
    entries: HashMap<String, RuntimeEntry>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `value` to the host, update the cached value and project the view.
    ///
    /// An existing entry keeps the declaration it was created with, so a
    /// context set through the generic command still uses its configured
    /// mappings.
    pub fn set_context(
        &mut self,
        decl: &Arc<ContextDeclaration>,
        value: ContextValue,
        host: &mut dyn Host,
    ) {
        host.set_context(&decl.name, &value);

        let mut entry = match self.entries.remove(&decl.name) {
            Some(entry) => entry,
            None => {
                let status = decl
                    .first_status_view()
                    .map(|view| host.create_status_item(view.alignment, view.priority));
                tracing::debug!(name = %decl.name, has_status = status.is_some(), "context created");
                RuntimeEntry {
                    declaration: Arc::clone(decl),
                    current: value.clone(),
                    status,
                }
            }
        };

        tracing::debug!(name = %decl.name, %value, "context set");
        entry.current = value;
        view::project(&entry, host);
        self.entries.insert(decl.name.clone(), entry);
    }

    pub fn get_value(&self, name: &str) -> Option<&ContextValue> {
        self.entries.get(name).map(|e| &e.current)
    }

    pub fn entry(&self, name: &str) -> Option<&RuntimeEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuntimeEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Dispose every owned status item and forget all entries.
    pub fn teardown(&mut self, host: &mut dyn Host) {
        for (_, entry) in self.entries.drain() {
            if let Some(handle) = entry.status {
                host.dispose_status_item(handle);
            }
        }
    }
}
