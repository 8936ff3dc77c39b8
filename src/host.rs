//! The host surfaces this crate drives but does not own.
//!
//! The host context registry is write-only: once a flag is sent there is no
//! way to read it back, which is why [`crate::store::ContextStore`] keeps its
//! own copy.

use crate::value::ContextValue;
use crate::vocabulary::{Alignment, CursorStyle, StatusColor};
use serde::Serialize;
use std::collections::BTreeMap;

/// Opaque reference to a status item created by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StatusHandle(pub u64);

/// Fields written to a status item on every projection. `None` clears.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub text: String,
    pub color: Option<StatusColor>,
    pub background_color: Option<StatusColor>,
}

/// One-way "set named flag" notification.
pub trait ContextSink {
    fn set_context(&mut self, name: &str, value: &ContextValue);
}

pub trait EditorSurface {
    /// Returns `false` when there is no active editor to apply the style to.
    fn set_cursor_style(&mut self, style: CursorStyle) -> bool;
}

pub trait StatusSurface {
    fn create_status_item(&mut self, alignment: Alignment, priority: i32) -> StatusHandle;
    /// Overwrite the item's fields and make it visible.
    fn update_status_item(&mut self, handle: StatusHandle, update: &StatusUpdate);
    fn hide_status_item(&mut self, handle: StatusHandle);
    fn dispose_status_item(&mut self, handle: StatusHandle);
}

/// Everything the core needs from its host.
pub trait Host: ContextSink + EditorSurface + StatusSurface {}

impl<T: ContextSink + EditorSurface + StatusSurface> Host for T {}

/// An outbound call, as recorded by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    SetContext {
        name: String,
        value: ContextValue,
    },
    Cursor {
        style: CursorStyle,
    },
    StatusCreated {
        handle: StatusHandle,
        alignment: Alignment,
        priority: i32,
    },
    StatusUpdated {
        handle: StatusHandle,
        update: StatusUpdate,
    },
    StatusHidden {
        handle: StatusHandle,
    },
    StatusDisposed {
        handle: StatusHandle,
    },
}

/// A status item as the in-memory host currently shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusItem {
    pub alignment: Alignment,
    pub priority: i32,
    pub visible: bool,
    pub content: Option<StatusUpdate>,
}

/// In-memory host that records every call. Used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    /// Whether an editor is open to receive cursor changes.
    pub editor_open: bool,
    pub cursor: CursorStyle,
    pub events: Vec<HostEvent>,
    flags: BTreeMap<String, ContextValue>,
    items: BTreeMap<u64, StatusItem>,
    next_handle: u64,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            editor_open: true,
            cursor: CursorStyle::default(),
            events: Vec::new(),
            flags: BTreeMap::new(),
            items: BTreeMap::new(),
            next_handle: 1,
        }
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_editor() -> Self {
        Self {
            editor_open: false,
            ..Self::default()
        }
    }

    /// The last value sent for `name`.
    pub fn flag(&self, name: &str) -> Option<&ContextValue> {
        self.flags.get(name)
    }

    pub fn flags(&self) -> &BTreeMap<String, ContextValue> {
        &self.flags
    }

    pub fn status_item(&self, handle: StatusHandle) -> Option<&StatusItem> {
        self.items.get(&handle.0)
    }

    pub fn status_items(&self) -> impl Iterator<Item = (StatusHandle, &StatusItem)> {
        self.items.iter().map(|(id, item)| (StatusHandle(*id), item))
    }

    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ContextSink for MemoryHost {
    fn set_context(&mut self, name: &str, value: &ContextValue) {
        self.flags.insert(name.to_string(), value.clone());
        self.events.push(HostEvent::SetContext {
            name: name.to_string(),
            value: value.clone(),
        });
    }
}

impl EditorSurface for MemoryHost {
    fn set_cursor_style(&mut self, style: CursorStyle) -> bool {
        if !self.editor_open {
            return false;
        }
        self.cursor = style;
        self.events.push(HostEvent::Cursor { style });
        true
    }
}

impl StatusSurface for MemoryHost {
    fn create_status_item(&mut self, alignment: Alignment, priority: i32) -> StatusHandle {
        let handle = StatusHandle(self.next_handle);
        self.next_handle += 1;
        self.items.insert(
            handle.0,
            StatusItem {
                alignment,
                priority,
                visible: false,
                content: None,
            },
        );
        self.events.push(HostEvent::StatusCreated {
            handle,
            alignment,
            priority,
        });
        handle
    }

    fn update_status_item(&mut self, handle: StatusHandle, update: &StatusUpdate) {
        if let Some(item) = self.items.get_mut(&handle.0) {
            item.content = Some(update.clone());
            item.visible = true;
        }
        self.events.push(HostEvent::StatusUpdated {
            handle,
            update: update.clone(),
        });
    }

    fn hide_status_item(&mut self, handle: StatusHandle) {
        if let Some(item) = self.items.get_mut(&handle.0) {
            item.visible = false;
        }
        self.events.push(HostEvent::StatusHidden { handle });
    }

    fn dispose_status_item(&mut self, handle: StatusHandle) {
        self.items.remove(&handle.0);
        self.events.push(HostEvent::StatusDisposed { handle });
    }
}
