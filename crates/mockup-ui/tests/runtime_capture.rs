// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! End-to-end UI runtime tests: records in, outbound messages and viewer captures out.
#![allow(clippy::unwrap_used, clippy::panic, missing_docs)]

use mockup_capture::{decode_png, CaptureRequest, MockFactory, MockFailure, SoftwareFactory};
use mockup_dry_tests::{loaded_record, selection_record, solid_png};
use mockup_proto::{Inbound, Message, EXPORT_ERROR_MESSAGE};
use mockup_scene_port::{CameraState, RendererFactory, Scene};
use mockup_ui::runtime::theme_background;
use mockup_ui::ui_effects::{FakeEffectsRunner, RealEffectsRunner, UiEffectsRunner};
use mockup_ui::{Store, UiEvent, UiRuntime, Viewer};
use serde_json::json;

fn runtime<F: RendererFactory, R: UiEffectsRunner>(factory: F, effects: R) -> UiRuntime<F, R> {
    let viewer = Viewer::new(Scene::default(), CameraState::default());
    UiRuntime::new(
        Store::default(),
        viewer,
        factory,
        CaptureRequest::sized(32, 24),
        effects,
    )
}

fn parent(v: serde_json::Value) -> Inbound {
    Inbound::from_parent(v)
}

async fn select_and_load<F: RendererFactory, R: UiEffectsRunner>(rt: &mut UiRuntime<F, R>, id: &str) {
    let png = solid_png(4, 4, [200, 40, 40, 255]);
    assert!(rt.on_record(&parent(selection_record(id))).await.is_empty());
    assert!(rt.on_record(&parent(loaded_record(id, &png, 4, 4))).await.is_empty());
}

#[tokio::test]
async fn capture_request_posts_upload_and_restores_background() {
    let mut rt = runtime(SoftwareFactory, RealEffectsRunner::default());
    select_and_load(&mut rt, "a").await;
    let bg = rt.viewer().scene().background;
    assert_eq!(bg, Some(theme_background("light")));

    let out = rt.on_record(&parent(json!({"type": "capture-screenshot"}))).await;
    let [Message::UploadScreenshot { image_data }] = out.as_slice() else {
        panic!("expected one upload, got {out:?}");
    };
    let frame = decode_png(image_data).unwrap();
    assert_eq!((frame.width, frame.height), (32, 24));
    assert_eq!(frame.pixel(0, 0).map(|p| p[3]), Some(0));
    assert_eq!(rt.viewer().scene().background, bg);
    assert!(rt.store().selection.is_uploading_fill);

    rt.on_record(&parent(json!({"type": "fill-upload-complete"}))).await;
    assert!(!rt.store().selection.is_uploading_fill);
}

#[tokio::test]
async fn repeated_captures_have_identical_length() {
    let mut rt = runtime(SoftwareFactory, RealEffectsRunner::default());
    select_and_load(&mut rt, "a").await;
    let mut lens = Vec::new();
    for _ in 0..3 {
        let out = rt.on_record(&parent(json!({"type": "capture-screenshot"}))).await;
        let [Message::UploadScreenshot { image_data }] = out.as_slice() else {
            panic!("expected one upload, got {out:?}");
        };
        lens.push(image_data.len());
    }
    assert!(lens.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn failed_capture_becomes_export_error() {
    for failure in [
        MockFailure::Acquire,
        MockFailure::Render,
        MockFailure::Readback,
        MockFailure::MalformedFrame,
    ] {
        let factory = MockFactory::failing(failure);
        let probe = factory.probe.clone();
        let mut rt = runtime(factory, FakeEffectsRunner::default());
        rt.on_record(&parent(json!({"type": "theme", "content": "dark"}))).await;
        rt.on_record(&parent(json!({"type": "selection-loading", "isLoading": true}))).await;

        let out = rt.on_record(&parent(json!({"type": "capture-screenshot"}))).await;
        assert!(out.is_empty(), "{failure:?}");
        let sel = &rt.store().selection;
        assert_eq!(sel.error.as_deref(), Some(EXPORT_ERROR_MESSAGE), "{failure:?}");
        assert!(!sel.is_loading);
        assert_eq!(rt.viewer().scene().background, Some(theme_background("dark")));
        assert_eq!(probe.live(), 0, "{failure:?}");
    }
}

#[tokio::test]
async fn closed_viewer_drops_capture_silently() {
    let factory = MockFactory::new();
    let probe = factory.probe.clone();
    let mut rt = runtime(factory, FakeEffectsRunner::default());
    rt.close_viewer();
    let out = rt.on_record(&parent(json!({"type": "capture-screenshot"}))).await;
    assert!(out.is_empty());
    assert_eq!(probe.created(), 0);
    assert!(rt.store().selection.error.is_none());
}

#[tokio::test]
async fn capture_from_foreign_source_is_ignored() {
    let factory = MockFactory::new();
    let probe = factory.probe.clone();
    let mut rt = runtime(factory, FakeEffectsRunner::default());
    let out = rt
        .on_record(&Inbound {
            source: mockup_proto::Source::Other("extension".into()),
            data: json!({"type": "capture-screenshot"}),
        })
        .await;
    assert!(out.is_empty());
    assert_eq!(probe.created(), 0);
}

#[tokio::test]
async fn late_export_for_previous_selection_does_not_overwrite() {
    let mut rt = runtime(MockFactory::new(), FakeEffectsRunner::default());
    rt.on_record(&parent(selection_record("a"))).await;
    rt.on_record(&parent(json!({"type": "selection-loading", "isLoading": true}))).await;
    rt.on_record(&parent(selection_record("b"))).await;
    rt.on_record(&parent(loaded_record("b", &solid_png(2, 2, [0, 0, 255, 255]), 2, 2)))
        .await;
    let b_export = rt.store().selection.exported_image.clone();
    assert!(b_export.is_some());

    rt.on_record(&parent(loaded_record("a", &solid_png(2, 2, [255, 0, 0, 255]), 2, 2)))
        .await;
    assert_eq!(rt.store().selection.id, "b");
    assert_eq!(rt.store().selection.exported_image, b_export);
}

#[tokio::test]
async fn viewer_screen_follows_the_selection_image() {
    let mut rt = runtime(MockFactory::new(), FakeEffectsRunner::default());
    select_and_load(&mut rt, "a").await;
    let tex = rt.viewer().scene().screen.clone().unwrap();
    assert_eq!((tex.width, tex.height), (4, 4));
    assert_eq!(&tex.pixels[..4], &[200, 40, 40, 255]);

    rt.on_record(&parent(json!({"type": "selection", "content": null}))).await;
    assert!(rt.viewer().scene().screen.is_none());
}

#[tokio::test]
async fn pixelate_then_apply_fill() {
    let mut rt = runtime(MockFactory::new(), RealEffectsRunner::default());
    select_and_load(&mut rt, "a").await;

    assert!(rt.on_ui_event(UiEvent::PixelateRequested { pixel_size: 2 }).is_empty());
    let sel = &rt.store().selection;
    assert!(!sel.is_pixelizing);
    assert_eq!(sel.pixel_size, 2);
    assert_eq!(sel.original_image.as_ref().map(|i| i.data.len()), Some(64));
    let preview = sel.preview_image.clone().unwrap();

    let out = rt.on_ui_event(UiEvent::ApplyFillRequested {
        add_new_layer: false,
        should_delete_first: true,
    });
    let [Message::UpdateImageFill {
        image_data,
        original_fill,
        should_delete_first,
        ..
    }] = out.as_slice()
    else {
        panic!("expected update-image-fill, got {out:?}");
    };
    assert_eq!(image_data, &preview.data);
    assert!(*should_delete_first);
    assert_eq!(
        original_fill.fill_image.as_ref().map(|i| i.id.as_str()),
        Some("a-img")
    );
    assert!(rt.store().selection.is_uploading_fill);
}

#[tokio::test]
async fn injected_pixelate_failure_surfaces_error() {
    let mut rt = runtime(
        MockFactory::new(),
        FakeEffectsRunner {
            fail_pixelate: true,
            ..FakeEffectsRunner::default()
        },
    );
    select_and_load(&mut rt, "a").await;
    rt.on_ui_event(UiEvent::PixelateRequested { pixel_size: 3 });
    assert!(!rt.store().selection.is_pixelizing);
    assert!(rt.store().selection.error.is_some());
    assert_eq!(rt.effects().calls.len(), 1);

    let out = rt.on_ui_event(UiEvent::DeleteTopLayerRequested);
    assert_eq!(out, vec![Message::DeleteTopLayer]);
}
