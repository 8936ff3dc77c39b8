use contextually::config::ContextDeclaration;
use contextually::host::HostEvent;
use contextually::store::ContextStore;
use contextually::{normalize, ContextValue, MemoryHost};
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn context_value() -> impl Strategy<Value = ContextValue> {
    prop_oneof![
        any::<bool>().prop_map(ContextValue::Bool),
        (-1000i32..1000).prop_map(|n| ContextValue::Number(n as f64)),
        "[a-z]{0,8}".prop_map(ContextValue::Str),
    ]
}

fn mapped() -> Arc<ContextDeclaration> {
    Arc::new(
        normalize(&[json!({
            "name": "p",
            "initial": false,
            "map": [[true, "block", "ON"], ["x", "underline"], [1, "line-thin"]]
        })])
        .remove(0),
    )
}

proptest! {
    #[test]
    fn set_then_get_round_trips(v in context_value()) {
        let mut host = MemoryHost::new();
        let mut store = ContextStore::new();
        store.set_context(&mapped(), v.clone(), &mut host);
        prop_assert_eq!(store.get_value("p"), Some(&v));
        prop_assert_eq!(host.flag("p"), Some(&v));
    }

    #[test]
    fn setting_twice_projects_the_same_view(v in context_value()) {
        let mut host = MemoryHost::new();
        let mut store = ContextStore::new();
        let d = mapped();
        store.set_context(&d, v.clone(), &mut host);
        let first: Vec<HostEvent> = host.take_events()
            .into_iter()
            .filter(|e| !matches!(e, HostEvent::StatusCreated { .. }))
            .collect();
        let cursor = host.cursor;
        store.set_context(&d, v.clone(), &mut host);
        prop_assert_eq!(host.take_events(), first);
        prop_assert_eq!(host.cursor, cursor);
        prop_assert_eq!(store.get_value("p"), Some(&v));
    }

    #[test]
    fn toggle_parity(n in 0usize..12) {
        let mut app = contextually::activate(r#"{"contextually.contexts": ["f"]}"#, MemoryHost::new()).unwrap();
        for _ in 0..n {
            app.execute("contextually.togglef", &[]).unwrap();
        }
        prop_assert_eq!(app.get_value("f"), Some(&ContextValue::Bool(n % 2 == 1)));
    }
}
