// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property tests for the UI message handler boundary.
#![allow(clippy::unwrap_used, missing_docs)]

use mockup_dry_tests::{loaded_message, loaded_record, selection_message, selection_record};
use mockup_proto::{Inbound, Message, Source, EXPORT_ERROR_MESSAGE, KINDS};
use mockup_ui::{Disposition, MessageHandler, Store, ViewerHandle};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn junk() -> BoxedStrategy<Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        ".{0,8}".prop_map(Value::from),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(|v| json!(v)),
    ]
    .boxed()
}

fn record() -> impl Strategy<Value = Value> {
    let tag = prop_oneof![
        prop::sample::select(KINDS.to_vec()).prop_map(String::from),
        "[a-z-]{0,12}",
    ];
    let object = (tag, prop::collection::btree_map("[a-zA-Z]{1,12}", junk(), 0..4)).prop_map(
        |(tag, fields)| {
            let mut map = Map::new();
            map.insert("type".into(), Value::from(tag));
            map.extend(fields);
            Value::Object(map)
        },
    );
    prop_oneof![
        3 => object,
        1 => junk(),
        1 => Just(selection_record("a")),
        1 => Just(json!({"type": "selection-loading", "isLoading": true})),
        1 => Just(loaded_record("a", &[1, 2, 3], 1, 1)),
        1 => Just(json!({"type": "export-error", "error": "detail"})),
    ]
}

fn source() -> impl Strategy<Value = Source> {
    prop_oneof![Just(Source::Parent), "[a-z]{1,6}".prop_map(Source::Other)]
}

proptest! {
    #[test]
    fn arbitrary_sequences_never_escape_the_boundary(
        records in prop::collection::vec((source(), record()), 0..40)
    ) {
        let mut h: MessageHandler<ViewerHandle> = MessageHandler::new(Store::default());
        for (source, data) in records {
            let d = h.handle(&Inbound { source, data });
            if d == Disposition::Failed {
                prop_assert!(!h.store().selection.is_loading);
            }
            let err = h.store().selection.error.as_deref();
            prop_assert!(err.is_none() || err == Some(EXPORT_ERROR_MESSAGE));
        }
    }

    #[test]
    fn unknown_tags_change_nothing(
        prefix in "[a-z]{1,8}",
        fields in prop::collection::btree_map("[a-z]{1,6}", junk(), 0..4),
    ) {
        let tag = format!("{prefix}-bogus");
        let mut h: MessageHandler<ViewerHandle> = MessageHandler::new(Store::default());
        h.handle(&Inbound::from_parent(selection_record("a")));
        h.handle(&Inbound::from_parent(json!({"type": "theme", "content": "dark"})));
        let before = h.store().clone();

        let mut map = Map::new();
        map.extend(fields);
        map.insert("type".into(), Value::from(tag.clone()));
        let d = h.handle(&Inbound::from_parent(Value::Object(map)));
        prop_assert_eq!(d, Disposition::Unknown(tag));
        prop_assert_eq!(h.store(), &before);
    }

    #[test]
    fn stale_exports_leave_the_export_alone(
        current in "[a-z0-9]{1,8}",
        late in "[a-z0-9]{1,8}",
        bytes in prop::collection::vec(any::<u8>(), 1..32),
    ) {
        prop_assume!(current != late);
        let mut h: MessageHandler<ViewerHandle> = MessageHandler::new(Store::default());
        h.handle(&Inbound::from_parent(selection_record(&current)));
        h.handle(&Inbound::from_parent(loaded_record(&current, &[7, 7, 7], 1, 1)));
        let before = h.store().clone();

        let d = h.handle(&Inbound::from_parent(loaded_record(&late, &bytes, 1, 1)));
        prop_assert_eq!(d, Disposition::Stale(late));
        prop_assert_eq!(h.store(), &before);
    }

    #[test]
    fn export_error_after_loading_shows_fixed_text(detail in ".{0,64}") {
        let mut h: MessageHandler<ViewerHandle> = MessageHandler::new(Store::default());
        h.handle(&Inbound::from_parent(json!({"type": "selection-loading", "isLoading": true})));
        h.handle(&Inbound::from_parent(json!({"type": "export-error", "error": detail})));
        prop_assert!(!h.store().selection.is_loading);
        prop_assert_eq!(h.store().selection.error.as_deref(), Some(EXPORT_ERROR_MESSAGE));
    }
}

#[test]
fn bogus_type_is_a_no_op() {
    let mut h: MessageHandler<ViewerHandle> = MessageHandler::new(Store::default());
    let before = h.store().clone();
    assert_eq!(
        h.handle(&Inbound::from_parent(json!({"type": "bogus"}))),
        Disposition::Unknown("bogus".into())
    );
    assert_eq!(h.store(), &before);
}

#[test]
fn null_selection_resets_rasters_flags_and_error() {
    let mut h: MessageHandler<ViewerHandle> = MessageHandler::new(Store::with_pixel_size(6));
    for rec in [
        json!({"type": "theme", "content": "dark"}),
        selection_record("a"),
        json!({"type": "selection-loading", "isLoading": true}),
        loaded_record("a", &[1, 2, 3], 1, 1),
        json!({"type": "export-error", "error": "late failure"}),
        json!({"type": "selection", "content": null}),
    ] {
        h.handle(&Inbound::from_parent(rec));
    }
    let sel = &h.store().selection;
    assert!(sel.exported_image.is_none());
    assert!(sel.original_image.is_none());
    assert!(sel.preview_image.is_none());
    assert!(!sel.is_loading && !sel.is_pixelizing && !sel.is_uploading_fill);
    assert!(sel.error.is_none());
    assert_eq!(sel.pixel_size, 6);
    assert_eq!(h.store().theme.token, "dark");
}

#[test]
fn export_without_a_selection_is_dropped() {
    let mut h: MessageHandler<ViewerHandle> = MessageHandler::new(Store::default());
    h.handle_message(&Source::Parent, &selection_message("a"));
    h.handle_message(&Source::Parent, &Message::Selection { content: None });
    h.handle_message(&Source::Parent, &Message::SelectionLoading { is_loading: true });

    let outcome = h.handle_message(&Source::Parent, &loaded_message("", vec![1, 2, 3], 1, 1));

    assert_eq!(outcome, Disposition::Stale(String::new()));
    let sel = &h.store().selection;
    assert!(!sel.has_selection());
    assert!(sel.exported_image.is_none());
    assert!(sel.is_loading);
}
