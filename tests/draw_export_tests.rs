use chrono::{Local, TimeZone};
use drawy::draw::bitmap::Bitmap;
use drawy::draw::save::{export_png, EXPORT_FILE_PREFIX};
use drawy::draw::settings_store::{load_from_path, save_to_path};
use drawy::draw::{Color, DrawSettings, DrawView, TouchAction, TouchEvent};
use tempfile::tempdir;

#[test]
fn committed_stroke_survives_png_export() {
    let dir = tempdir().expect("temp dir");
    let settings = DrawSettings {
        canvas_width: 48,
        canvas_height: 48,
        paint_thickness: 6.0,
        export_root: Some(dir.path().to_string_lossy().into_owned()),
        ..DrawSettings::default()
    };
    let mut view = DrawView::new(&settings).expect("view");
    view.on_touch(&TouchEvent::new(TouchAction::Down, 0, 8.0, 24.0, 1));
    view.on_touch(&TouchEvent::new(TouchAction::Move, 0, 40.0, 24.0, 1));
    view.on_touch(&TouchEvent::new(TouchAction::Up, 0, 40.0, 24.0, 1));
    // Still in flight when exported below.
    view.on_touch(&TouchEvent::new(TouchAction::Down, 0, 24.0, 4.0, 1));

    let now = Local
        .with_ymd_and_hms(2026, 3, 14, 15, 9, 26)
        .single()
        .expect("date time");
    let path = export_png(view.export_bitmap(), &settings, now).expect("export");
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some(format!("{EXPORT_FILE_PREFIX}_20260314_1509.png").as_str())
    );
    assert_eq!(path.parent(), Some(dir.path().join("Drawy").as_path()));

    let decoded = Bitmap::load(&path).expect("decode export");
    assert_eq!(decoded.dimensions(), (48, 48));
    assert_eq!(decoded.pixel(24, 24), Color::BLACK);
    assert_eq!(decoded.pixel(24, 4), Color::WHITE);
}

#[test]
fn imported_photo_replaces_canvas() {
    let dir = tempdir().expect("temp dir");
    let photo_path = dir.path().join("photo.png");
    let photo = Bitmap::new(12, 7, Color::rgba(200, 100, 50, 255)).expect("photo");
    photo
        .into_rgba_image()
        .expect("rgba image")
        .save(&photo_path).expect("write photo");

    let mut view = DrawView::new(&DrawSettings::default()).expect("view");
    view.reset_canvas_bitmap(Bitmap::load(&photo_path).expect("load photo"));
    assert_eq!(view.dimensions(), (12, 7));
    assert_eq!(view.export_bitmap().pixel(11, 6), Color::rgba(200, 100, 50, 255));

    view.reset_canvas_color(0xFF00_0000);
    assert_eq!(view.dimensions(), (12, 7));
    assert_eq!(view.export_bitmap().pixel(0, 0), Color::BLACK);
}

#[test]
fn settings_file_drives_view_defaults() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("draw_settings.json");
    std::fs::write(
        &path,
        r#"{ "canvas_width": 40, "canvas_height": 30, "paint_color": { "r": 1, "g": 2, "b": 3, "a": 255 }, "paint_thickness": -1 }"#,
    )
    .expect("write settings");

    let settings = load_from_path(&path).expect("load settings");
    let view = DrawView::new(&settings).expect("view");
    assert_eq!(view.dimensions(), (40, 30));
    assert_eq!(view.brush_color(), 0xFF01_0203);
    assert_eq!(view.brush_thickness(), 10.0);

    save_to_path(&path, &settings).expect("save settings");
    assert_eq!(load_from_path(&path).expect("reload"), settings);
}
