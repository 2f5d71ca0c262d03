//! Behavioral properties of the signature compositor

use sigletter::signature::{
    clear, merge_into_carrier, merge_stroke, AuthoringSurface, Fragment, PenConfig,
    SignatureDocument, SignatureState, StrokeBatch, ViewBox,
};
use sigletter::Error;

fn batch(n: usize, w: f64, h: f64) -> StrokeBatch {
    let path = format!(r#"<path d="M {n} {n} L {m} {m}" stroke="black"/>"#, n = n, m = n + 10);
    StrokeBatch::new(vec![Fragment::new(path)], w, h).unwrap()
}

#[test]
fn first_merge_adopts_surface_and_fragment() {
    for (w, h) in [(300.0, 300.0), (640.0, 480.0), (1.5, 2.5)] {
        let b = batch(1, w, h);
        let doc = merge_stroke(&b, None).unwrap();
        assert_eq!(doc.content(), b.fragments());
        assert_eq!(doc.width(), Some(w.to_string().as_str()));
        assert_eq!(doc.height(), Some(h.to_string().as_str()));
        assert_eq!(doc.view_box(), Some(ViewBox::origin(w, h)));
    }
}

#[test]
fn history_is_append_only() {
    let sizes = [300.0, 150.0, 600.0, 75.0, 300.0, 420.0];
    let mut doc: Option<SignatureDocument> = None;
    let mut snapshots: Vec<Vec<String>> = Vec::new();

    for (i, size) in sizes.iter().enumerate() {
        doc = merge_stroke(&batch(i, *size, *size), doc.as_ref());
        let current = doc.as_ref().unwrap();
        assert_eq!(current.content().len(), i + 1);
        snapshots.push(current.content().iter().map(|f| f.as_str().to_string()).collect());
    }

    let last = snapshots.last().unwrap();
    for snap in &snapshots {
        assert_eq!(&last[..snap.len()], &snap[..]);
    }
}

#[test]
fn scale_follows_surface_ratio() {
    let base = SignatureDocument::for_surface(vec![Fragment::new("<path/>")], 400.0, 400.0).unwrap();

    let small = merge_stroke(&batch(0, 200.0, 200.0), Some(&base)).unwrap();
    let t = small.content()[1].transform().unwrap();
    assert_eq!((t.scale_x, t.scale_y), (2.0, 2.0));

    let same = merge_stroke(&batch(0, 400.0, 400.0), Some(&base)).unwrap();
    let t = same.content()[1].transform().unwrap();
    assert_eq!((t.scale_x, t.scale_y), (1.0, 1.0));
}

#[test]
fn translation_follows_view_box_origin() {
    let imported = SignatureDocument::parse(
        r#"<svg width="100" height="100" viewBox="-50 20 200 100"><path d="M0 0"/></svg>"#,
    )
    .unwrap();
    let merged = merge_stroke(&batch(0, 100.0, 100.0), Some(&imported)).unwrap();
    let t = merged.content()[1].transform().unwrap();
    assert_eq!((t.scale_x, t.scale_y, t.translate_x, t.translate_y), (2.0, 1.0, -50.0, 20.0));
    assert_eq!(merged.view_box(), imported.view_box());
}

#[test]
fn clear_then_merge_matches_fresh_merge() {
    let b = batch(7, 250.0, 250.0);
    let _ = merge_stroke(&batch(1, 100.0, 100.0), None);
    assert_eq!(merge_stroke(&b, clear().as_ref()), merge_stroke(&b, None));
}

#[test]
fn bad_import_keeps_existing_signature() {
    let state = SignatureState::new().apply_stroke(&batch(1, 300.0, 300.0));
    for bytes in [
        &b"\x89PNG\r\n\x1a\n"[..],
        &b"{\"not\": \"svg\"}"[..],
        &b"<html><body/></html>"[..],
    ] {
        let err = state.import(bytes).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
    assert_eq!(state.document().unwrap().content().len(), 1);
}

#[test]
fn import_then_draw_extends_imported_file() {
    let file = br#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="500" height="250" viewBox="0 0 500 250">
  <path d="M 0 0 L 500 250" stroke="black"/>
</svg>"#;
    let state = SignatureState::new().import(file).unwrap();
    let state = state.apply_stroke(&batch(3, 250.0, 250.0));
    let doc = state.document().unwrap();
    assert_eq!((doc.width(), doc.height()), (Some("500"), Some("250")));
    let t = doc.content()[1].transform().unwrap();
    assert_eq!((t.scale_x, t.scale_y), (2.0, 1.0));
}

#[test]
fn imported_physical_size_survives_drawing() {
    let file = br#"<svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" viewBox="0 0 210 297"><path d="M 0 0 L 210 297"/></svg>"#;
    let state = SignatureState::new()
        .import(file)
        .unwrap()
        .apply_stroke(&batch(4, 105.0, 105.0));
    let doc = state.document().unwrap();
    assert!(doc.to_svg().starts_with(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" viewBox="0 0 210 297">"#
    ));
    let t = doc.content()[1].transform().unwrap();
    assert_eq!((t.scale_x, t.scale_y), (2.0, 297.0 / 105.0));
}

#[test]
fn end_to_end_draw_resize_draw() {
    let mut surface = AuthoringSurface::new(300.0, PenConfig::default()).unwrap();
    let mut state = SignatureState::new();

    surface.pointer_down(10.0, 10.0);
    surface.pointer_move(60.0, 80.0);
    state = state.apply_stroke(&surface.pointer_up().unwrap());
    let doc = state.document().unwrap();
    assert_eq!((doc.width(), doc.height()), (Some("300"), Some("300")));
    assert_eq!(doc.content().len(), 1);

    surface.resize(150.0).unwrap();
    surface.pointer_down(5.0, 5.0);
    surface.pointer_move(30.0, 40.0);
    state = state.apply_stroke(&surface.pointer_up().unwrap());

    let doc = state.document().unwrap();
    assert_eq!((doc.width(), doc.height()), (Some("300"), Some("300")));
    assert_eq!(doc.content().len(), 2);
    let t = doc.content()[1].transform().unwrap();
    assert_eq!((t.scale_x, t.scale_y), (2.0, 2.0));
}

#[test]
fn corrupted_carrier_recovers_with_new_stroke() {
    let b = batch(2, 200.0, 200.0);
    let doc = merge_into_carrier(&b, Some("data:image/svg+xml;base64,!!!not-base64!!!")).unwrap();
    assert_eq!(doc.content(), b.fragments());
    assert_eq!((doc.width(), doc.height()), (Some("200"), Some("200")));
}

#[test]
fn surface_export_becomes_batch() {
    let exported = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 320 320" width="320" height="320"><path d="M 1 1 L 2 2" fill="none"></path><path d="M 2 2 L 3 3" fill="none"></path></svg>"#;
    let b = StrokeBatch::from_svg(exported, 320.0, 320.0).unwrap();
    assert_eq!(b.fragments().len(), 2);

    let base = SignatureDocument::for_surface(vec![Fragment::new("<path/>")], 640.0, 640.0).unwrap();
    let merged = merge_stroke(&b, Some(&base)).unwrap();
    assert_eq!(merged.content().len(), 2);
    assert_eq!(
        merged.content()[1].as_str(),
        r#"<g transform="matrix(2 0 0 2 0 0)"><path d="M 1 1 L 2 2" fill="none"></path><path d="M 2 2 L 3 3" fill="none"></path></g>"#
    );
}
