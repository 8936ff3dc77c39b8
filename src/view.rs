use crate::host::{Host, StatusUpdate};
use crate::store::RuntimeEntry;
use crate::vocabulary::CursorStyle;

/// Apply the view mapped to the entry's current value.
///
/// Unmapped values (or mappings without a cursor) reset the cursor to the
/// host default line style. The status item is rewritten from the matching
/// mapping, or hidden when that mapping carries no status view.
pub fn project(entry: &RuntimeEntry, host: &mut dyn Host) {
    let mapping = entry.declaration.mapping_for(&entry.current);

    let style = mapping
        .and_then(|m| m.cursor_style)
        .unwrap_or(CursorStyle::Line);
    if !host.set_cursor_style(style) {
        tracing::trace!(name = %entry.declaration.name, "no active editor, cursor unchanged");
    }

    let Some(handle) = entry.status else {
        return;
    };
    match mapping.and_then(|m| m.status_view.as_ref()) {
        Some(view) => host.update_status_item(
            handle,
            &StatusUpdate {
                text: view.text.clone(),
                color: view.color.clone(),
                background_color: view.background_color.clone(),
            },
        ),
        None => host.hide_status_item(handle),
    }
}
