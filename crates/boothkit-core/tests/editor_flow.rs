//! End-to-end editing session: preset, drag with snapping, distribution,
//! save and reopen.

use boothkit_core::{
    BoundingBox, Editor, EditorConfig, EditorError, Orientation, PresetError, SerializableColor, SnapKind, StoreError,
    Template, paper_dimensions,
};
use kurbo::Point;

#[test]
fn test_preset_drag_distribute_save() {
    let mut editor = Editor::from_preset(3, Orientation::Landscape, EditorConfig::default()).unwrap();
    editor.info.template_name = "Birthday".to_string();
    editor.set_background_image("/background.png");
    assert_eq!(editor.store().len(), 4);

    // pic-1 starts at (20, 202); drop it near the top-left margin corner
    editor.begin_drag("pic-1").unwrap();
    let preview = editor.drag_by(22.0, -160.0).unwrap();
    assert!(preview.snapped(SnapKind::LeftMargin));
    assert!(preview.snapped(SnapKind::TopMargin));
    let dropped = editor.end_drag().unwrap().unwrap();
    assert_eq!((dropped.x, dropped.y), (40.0, 40.0));

    let before = editor.store().snapshot();
    editor.distribute(Some(3)).unwrap();
    // the snapshot taken before distributing is untouched
    assert_eq!(before[1].bounds, dropped);

    let paper = paper_dimensions(Orientation::Landscape).bounds();
    for shape in editor.store().pictures() {
        assert!(shape.bounds.is_within(&paper));
        assert_eq!(shape.bounds.y, 202.0);
    }

    let json = editor.to_template().to_json().unwrap();
    let reopened = Editor::from_template(&Template::from_json(&json).unwrap(), EditorConfig::default()).unwrap();
    let ids: Vec<_> = reopened.store().iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec!["pic-background", "pic-1", "pic-2", "pic-3"]);
    assert_eq!(reopened.info.template_name, "Birthday");
}

#[test]
fn test_errors_surface_to_caller() {
    let mut editor = Editor::new(Orientation::Portrait, EditorConfig::default());
    assert_eq!(editor.begin_drag("ghost"), Err(StoreError::NotFound("ghost".to_string())));
    assert!(editor.select("ghost").is_err());
    assert_eq!(
        Editor::from_preset(7, Orientation::Portrait, EditorConfig::default()).err(),
        Some(EditorError::Preset(PresetError::UnsupportedCount(7)))
    );
    assert!(editor.hit_test(Point::new(300.0, 450.0)).is_none());
}

#[test]
fn test_guides_follow_drag_and_clear_on_drop() {
    let mut editor = Editor::new(Orientation::Landscape, EditorConfig::default());
    let a = editor.add_placeholder(Some("Guest One".to_string())).unwrap();
    let b = editor.add_placeholder(None).unwrap();
    // both start centered at (400, 250)
    editor.place_shape(&a, BoundingBox::new(100.0, 300.0, 100.0, 100.0)).unwrap();

    editor.begin_drag(&b).unwrap();
    let result = editor.drag_by(-297.0, 50.0).unwrap();
    assert_eq!(result.bounds, BoundingBox::new(100.0, 300.0, 100.0, 100.0));
    assert_eq!(editor.guides().vertical, Some(150.0));
    assert_eq!(editor.guides().horizontal, Some(350.0));

    editor.end_drag().unwrap();
    assert!(editor.guides().is_empty());
}

#[test]
fn test_center_guides_with_background() {
    let mut editor = Editor::new(Orientation::Landscape, EditorConfig::default());
    editor.set_background_color(SerializableColor::rgb(0xd2, 0x83, 0x83));
    let a = editor.add_placeholder(None).unwrap();
    let b = editor.add_placeholder(None).unwrap();
    editor.place_shape(&a, BoundingBox::new(400.0, 300.0, 100.0, 100.0)).unwrap();

    let result = editor.place_shape(&b, BoundingBox::new(402.0, 300.0, 100.0, 100.0)).unwrap();
    assert_eq!(result.bounds, BoundingBox::new(400.0, 300.0, 100.0, 100.0));
    assert_eq!(result.guides.vertical, Some(450.0));
    assert_eq!(result.guides.horizontal, Some(350.0));
}
