use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;

use headers_editor::editor::events::{EditorEvent, Notification};
use headers_editor::model::{HeaderRecord, HeaderSchema, HeaderValue};
use headers_editor::{EditorConfig, HeadersEditor};

fn config() -> EditorConfig {
    EditorConfig {
        mount_delay: Duration::from_millis(1),
        ..EditorConfig::default()
    }
}

fn declared(name: &str, value: &str) -> HeaderRecord {
    HeaderRecord::new(
        name,
        HeaderValue::Single(value.to_string()),
        HeaderSchema::default(),
    )
}

/// Records every emitted event.
fn recorder(editor: &mut HeadersEditor) -> Rc<RefCell<Vec<EditorEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    editor.add_listener(move |n| sink.borrow_mut().push(n.event.clone()));
    events
}

fn content_type_events(events: &[EditorEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            EditorEvent::ContentTypeChanged { value } => Some(value.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn content_type_is_extracted_and_updated_in_place() {
    let mut ed = HeadersEditor::new(config());
    let events = recorder(&mut ed);

    ed.set_value("Content-Type: application/json\nX-Foo: 1");
    assert_eq!(ed.content_type(), Some("application/json"));

    ed.set_content_type(Some("text/plain".to_string()));
    assert_eq!(ed.value(), Some("Content-Type: text/plain\nX-Foo: 1"));
    assert_eq!(ed.content_type(), Some("text/plain"));

    let model = ed.view_model();
    assert_eq!(model.len(), 2);
    assert_eq!(model[0].value, HeaderValue::Single("text/plain".into()));

    assert_eq!(
        content_type_events(&events.borrow()),
        ["application/json", "text/plain"]
    );
}

#[test]
fn content_type_is_appended_when_missing() {
    let mut ed = HeadersEditor::new(config());
    ed.set_value("Accept: */*");
    ed.set_content_type(Some("application/xml".to_string()));
    assert_eq!(ed.value(), Some("Accept: */*\nContent-Type: application/xml"));
}

#[test]
fn removing_the_line_clears_the_content_type() {
    let mut ed = HeadersEditor::new(config());
    let events = recorder(&mut ed);

    ed.set_value("content-type: text/csv");
    ed.set_value("Accept: */*");

    assert_eq!(ed.content_type(), None);
    assert_eq!(content_type_events(&events.borrow()), ["text/csv", ""]);
}

#[test]
fn external_content_type_is_written_but_not_echoed() {
    let mut ed = HeadersEditor::new(config());
    ed.set_value("Accept: */*");
    let events = recorder(&mut ed);

    ed.handle(&Notification::new(EditorEvent::ContentTypeChanged {
        value: "text/csv".into(),
    }));

    assert_eq!(ed.value(), Some("Accept: */*\nContent-Type: text/csv"));
    assert!(content_type_events(&events.borrow()).is_empty());
}

#[test]
fn read_only_editor_tracks_but_does_not_write() {
    let mut ed = HeadersEditor::new(EditorConfig {
        read_only: true,
        ..config()
    });
    ed.set_value("Accept: */*");

    ed.set_content_type(Some("text/plain".to_string()));
    assert_eq!(ed.content_type(), Some("text/plain"));
    assert_eq!(ed.value(), Some("Accept: */*"));

    ed.source_edited("X: 1");
    assert_eq!(ed.value(), Some("Accept: */*"));
}

#[test]
fn source_mode_mounts_view_with_serialized_model() {
    let mut ed = HeadersEditor::new(config());
    ed.set_view_model(vec![declared("Accept", "*/*"), declared("X-Id", "7")]);

    async_std::task::block_on(ed.set_source_mode(true));

    assert!(ed.source_mode());
    let view = ed.source_view().expect("source view is visible");
    assert!(view.is_mounted());
    assert_eq!(view.value(), "Accept: */*\nX-Id: 7");
}

#[test]
fn no_source_editor_keeps_the_form() {
    let mut ed = HeadersEditor::new(EditorConfig {
        no_source_editor: true,
        ..config()
    });
    async_std::task::block_on(ed.set_source_mode(true));
    assert!(!ed.source_mode());
}

#[test]
fn source_edit_is_announced_and_reconciled() {
    let mut ed = HeadersEditor::new(config());
    ed.set_view_model(vec![declared("Accept", "*/*")]);
    async_std::task::block_on(ed.set_source_mode(true));
    let events = recorder(&mut ed);

    ed.source_edited("Accept: text/html\nX-New: 1");

    assert!(events.borrow().contains(&EditorEvent::HeadersChanged {
        value: "Accept: text/html\nX-New: 1".into()
    }));
    let model = ed.view_model();
    assert_eq!(model.len(), 2);
    assert_eq!(model[0].value, HeaderValue::Single("text/html".into()));
    assert!(model[1].schema.is_custom);
}

#[test]
fn cancelled_source_edit_defers_reconciliation_to_form_switch() {
    let mut ed = HeadersEditor::new(config());
    ed.set_view_model(vec![declared("Accept", "*/*")]);
    async_std::task::block_on(ed.set_source_mode(true));
    ed.add_listener(|n| {
        if matches!(n.event, EditorEvent::HeadersChanged { .. }) {
            n.prevent_default();
        }
    });

    ed.source_edited("Accept: */*\nX-New: 1");
    assert_eq!(ed.value(), Some("Accept: */*\nX-New: 1"));
    assert_eq!(ed.view_model().len(), 1);

    async_std::task::block_on(ed.set_source_mode(false));
    assert_eq!(ed.view_model().len(), 2);
}

#[test]
fn external_patch_updates_visible_source_view() {
    let mut ed = HeadersEditor::new(config());
    ed.set_value("Accept: */*");
    async_std::task::block_on(ed.set_source_mode(true));

    ed.handle(&Notification::new(EditorEvent::HeaderChanged {
        name: "X-Trace".into(),
        value: "on".into(),
    }));

    assert_eq!(
        ed.source_view().map(|v| v.value()),
        Some("Accept: */*\nX-Trace: on")
    );
}

#[test]
fn form_edit_keeps_unnamed_rows() {
    let mut ed = HeadersEditor::new(config());
    let events = recorder(&mut ed);

    let mut blank = declared("", "");
    blank.schema.is_custom = true;
    ed.form_edited(vec![declared("Accept", "*/*"), blank]);

    assert_eq!(ed.value(), Some("Accept: */*"));
    assert_eq!(ed.view_model().len(), 2);
    assert!(events.borrow().contains(&EditorEvent::HeadersChanged {
        value: "Accept: */*".into()
    }));
}

#[test]
fn amf_headers_drive_the_model_and_validation() {
    let headers = json!([
        {
            "http://a.ml/vocabularies/core#name": [{"@value": "X-Api-Key"}],
            "http://a.ml/vocabularies/apiContract#required": [{"@value": true}],
            "http://a.ml/vocabularies/shapes#schema": [{
                "http://www.w3.org/ns/shacl#datatype": [{"@id": "http://www.w3.org/2001/XMLSchema#string"}]
            }]
        },
        {
            "http://a.ml/vocabularies/core#name": [{"@value": "Accept"}],
            "http://a.ml/vocabularies/shapes#schema": [{
                "http://www.w3.org/ns/shacl#defaultValueStr": [{"@value": "*/*"}]
            }]
        }
    ]);

    let mut ed = HeadersEditor::new(EditorConfig {
        auto_validate: true,
        ..config()
    });
    let events = recorder(&mut ed);
    ed.set_amf_headers(Some(headers));

    assert_eq!(ed.model_to_value(None), "X-Api-Key: \nAccept: */*");

    ed.set_value("Accept: */*");
    assert!(ed.invalid());
    assert!(ed.validation_report().contains_key("X-Api-Key"));

    ed.set_value("Accept: */*\nx-api-key: secret");
    assert!(!ed.invalid());
    assert_eq!(ed.view_model()[0].name, "X-Api-Key");

    let invalid_changes: Vec<bool> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            EditorEvent::InvalidChanged { invalid } => Some(*invalid),
            _ => None,
        })
        .collect();
    assert_eq!(invalid_changes, [true, false]);
}

fn accept_with_default() -> serde_json::Value {
    json!([{
        "http://a.ml/vocabularies/core#name": [{"@value": "Accept"}],
        "http://a.ml/vocabularies/core#description": [{"@value": "Media types"}],
        "http://a.ml/vocabularies/shapes#schema": [{
            "http://www.w3.org/ns/shacl#defaultValueStr": [{"@value": "*/*"}]
        }]
    }])
}

#[test]
fn amf_default_survives_a_source_round_trip() {
    let mut ed = HeadersEditor::new(config());
    ed.set_amf_headers(Some(accept_with_default()));
    assert_eq!(ed.value(), Some("Accept: */*"));

    async_std::task::block_on(ed.set_source_mode(true));
    assert_eq!(ed.source_view().map(|v| v.value()), Some("Accept: */*"));
    async_std::task::block_on(ed.set_source_mode(false));

    assert_eq!(ed.view_model().len(), 1);
    assert_eq!(ed.view_model()[0].value, HeaderValue::Single("*/*".into()));
}

#[test]
fn content_type_is_added_next_to_a_replaced_model() {
    let mut ed = HeadersEditor::new(config());
    ed.set_view_model(vec![declared("Accept", "*/*")]);

    ed.set_content_type(Some("application/json".to_string()));

    assert_eq!(
        ed.value(),
        Some("Accept: */*\nContent-Type: application/json")
    );
    let model = ed.view_model();
    assert_eq!(model.len(), 2);
    assert_eq!(model[0].value, HeaderValue::Single("*/*".into()));
    assert!(model[1].schema.is_custom);
}

#[test]
fn header_patch_keeps_amf_records() {
    let mut ed = HeadersEditor::new(config());
    ed.set_amf_headers(Some(accept_with_default()));

    ed.handle(&Notification::new(EditorEvent::HeaderChanged {
        name: "X-Trace".into(),
        value: "1".into(),
    }));

    assert_eq!(ed.value(), Some("Accept: */*\nX-Trace: 1"));
    assert_eq!(ed.view_model()[0].value, HeaderValue::Single("*/*".into()));
}

#[test]
fn source_validation_checks_the_displayed_text() {
    let mut ed = HeadersEditor::new(config());
    ed.set_view_model(vec![declared("Accept", "*/*")]);
    async_std::task::block_on(ed.set_source_mode(true));
    assert!(ed.validate());

    ed.source_edited("Accept: */*\nbad header");
    assert!(!ed.validate());
    assert!(ed.invalid());
}

#[test]
fn no_docs_rebuilds_the_model_without_descriptions() {
    let mut ed = HeadersEditor::new(config());
    ed.set_amf_headers(Some(accept_with_default()));
    assert_eq!(
        ed.view_model()[0].schema.description.as_deref(),
        Some("Media types")
    );

    ed.set_no_docs(true);
    assert_eq!(ed.view_model()[0].schema.description, None);
    assert_eq!(ed.value(), Some("Accept: */*"));

    ed.set_no_docs(false);
    assert_eq!(
        ed.view_model()[0].schema.description.as_deref(),
        Some("Media types")
    );
}
