use contextually::host::HostEvent;
use contextually::{activate, ContextValue, CursorStyle, MemoryHost};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn turn_on_bare_flag() {
    let mut app = activate(r#"{"contextually.contexts": ["myFlag"]}"#, MemoryHost::new()).unwrap();
    app.host_mut().take_events();
    app.execute("contextually.turnOnmyFlag", &[]).unwrap();
    assert_eq!(
        app.host().events[0],
        HostEvent::SetContext { name: "myFlag".into(), value: ContextValue::Bool(true) }
    );
    assert_eq!(app.get_value("myFlag"), Some(&ContextValue::Bool(true)));
}

#[test]
fn triple_styles_only_the_true_state() {
    let mut app = activate(
        r#"{"contextually.contexts": [["mode", "dark", "underline"]]}"#,
        MemoryHost::new(),
    )
    .unwrap();
    assert_eq!(app.host().cursor, CursorStyle::Line);
    app.execute("contextually.setContext", &[json!("mode"), json!(true)]).unwrap();
    assert_eq!(app.host().cursor, CursorStyle::Underline);
    app.execute("contextually.setContext", &[json!("mode"), json!("dark")]).unwrap();
    assert_eq!(app.host().cursor, CursorStyle::Line);
}

#[test]
fn toggle_twice() {
    let mut app = activate(r#"{"contextually": {"contexts": ["t"]}}"#, MemoryHost::new()).unwrap();
    app.execute("contextually.togglet", &[]).unwrap();
    assert_eq!(app.get_value("t"), Some(&ContextValue::Bool(true)));
    app.execute("contextually.togglet", &[]).unwrap();
    assert_eq!(app.get_value("t"), Some(&ContextValue::Bool(false)));
    assert_eq!(app.host().flag("t"), Some(&ContextValue::Bool(false)));
}

#[test]
fn undeclared_context_gets_an_ad_hoc_entry() {
    let mut app = activate(r#"{"contextually.contexts": []}"#, MemoryHost::new()).unwrap();
    app.execute("contextually.setContext", &[json!(["ghost", "boo"])]).unwrap();
    assert_eq!(app.get_value("ghost"), Some(&ContextValue::from("boo")));
    assert_eq!(app.host().cursor, CursorStyle::Line);
    assert_eq!(app.host().status_items().count(), 0);
    assert!(!app.commands().contains("contextually.toggleghost"));
}

#[test]
fn duplicate_names_first_declaration_owns_the_entry() {
    let app = activate(
        r#"{"contextually.contexts": [["d", true, "block"], ["d", false]]}"#,
        MemoryHost::new(),
    )
    .unwrap();
    assert_eq!(app.get_value("d"), Some(&ContextValue::Bool(false)));
    assert_eq!(app.store().entry("d").unwrap().declaration.mappings.len(), 1);
    assert_eq!(app.declarations().len(), 2);
}

#[test]
fn status_view_lifecycle() {
    let settings = r#"{"contextually.contexts": [
        {"name": "rec", "initial": false, "map": [
            {"val": true, "cursor": "block", "text": "REC", "backgroundColor": "error", "alignment": "right", "priority": 10}
        ]}
    ]}"#;
    let mut app = activate(settings, MemoryHost::new()).unwrap();
    let handle = app.store().entry("rec").unwrap().status.unwrap();
    assert_eq!(app.host().status_item(handle).unwrap().priority, 10);
    assert!(!app.host().status_item(handle).unwrap().visible);

    app.execute("contextually.turnOnrec", &[]).unwrap();
    let item = app.host().status_item(handle).unwrap();
    assert!(item.visible);
    assert_eq!(item.content.as_ref().unwrap().text, "REC");

    let host = app.deactivate();
    assert!(host.status_item(handle).is_none());
    assert_eq!(host.events.last(), Some(&HostEvent::StatusDisposed { handle }));
}

#[test]
fn bad_settings_document_is_an_error() {
    assert!(activate("not json", MemoryHost::new()).is_err());
}
