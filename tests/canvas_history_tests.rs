use kids_sketchpad::{BrushSettings, Canvas, Point, Rgb, Size};

const RED: Rgb = Rgb::new(255, 0, 0);
const BLUE: Rgb = Rgb::new(0, 0, 255);
const GREEN: Rgb = Rgb::new(0, 200, 0);

fn blank() -> Canvas {
    Canvas::new(Size::new(800, 600), Rgb::WHITE).unwrap()
}

fn stroke(c: &mut Canvas, points: &[(f32, f32)], brush: &BrushSettings) {
    let (first, rest) = points.split_first().unwrap();
    c.begin_stroke(Point::new(first.0, first.1), brush);
    for p in rest {
        c.extend_stroke(Point::new(p.0, p.1), brush);
    }
    c.end_stroke();
}

fn is_blank(c: &Canvas) -> bool {
    c.surface().pixels.iter().all(|&p| p == Rgb::WHITE.0)
}

#[test]
fn red_stroke_undo_redo_scenario() {
    let mut c = blank();
    let red = BrushSettings::new(RED, 8);
    stroke(&mut c, &[(100.0, 100.0), (300.0, 100.0)], &red);

    assert_eq!(c.history_len(), 2);
    assert_eq!(c.cursor(), 1);
    assert_eq!(c.pixel(200, 100), Some(RED));
    assert_eq!(c.pixel(200, 103), Some(RED));
    assert_eq!(c.pixel(200, 110), Some(Rgb::WHITE));

    assert!(c.undo());
    assert!(is_blank(&c));
    assert_eq!(c.cursor(), 0);

    assert!(c.redo());
    assert_eq!(c.pixel(200, 100), Some(RED));
    assert_eq!(c.cursor(), 1);
}

#[test]
fn history_grows_by_one_per_completed_stroke() {
    let mut c = blank();
    let b = BrushSettings::new(BLUE, 4);
    for i in 0..6 {
        let y = 50.0 + i as f32 * 40.0;
        stroke(&mut c, &[(10.0, y), (200.0, y + 5.0), (300.0, y)], &b);
        assert_eq!(c.history_len(), i + 2);
        assert_eq!(c.cursor(), c.history_len() - 1);
    }
}

#[test]
fn undo_then_redo_is_pixel_identical() {
    let mut c = blank();
    stroke(&mut c, &[(10.0, 10.0), (90.0, 90.0)], &BrushSettings::new(RED, 6));
    stroke(&mut c, &[(90.0, 10.0), (10.0, 90.0)], &BrushSettings::new(BLUE, 10));
    stroke(&mut c, &[(50.0, 0.0), (50.0, 100.0)], &BrushSettings::new(GREEN, 2));

    c.undo();
    let before = c.surface().clone();
    c.undo();
    c.redo();
    assert_eq!(c.surface(), &before);
    assert_eq!(c.cursor(), 2);
}

#[test]
fn new_stroke_after_undo_drops_the_redo_branch() {
    let mut c = blank();
    stroke(&mut c, &[(100.0, 100.0), (200.0, 100.0)], &BrushSettings::new(RED, 8)); // A
    stroke(&mut c, &[(100.0, 300.0), (200.0, 300.0)], &BrushSettings::new(BLUE, 8)); // B
    c.undo();
    stroke(&mut c, &[(100.0, 500.0), (200.0, 500.0)], &BrushSettings::new(GREEN, 8)); // C

    assert_eq!(c.history_len(), 3);
    assert!(!c.can_redo());
    assert!(!c.redo());
    assert_eq!(c.pixel(150, 100), Some(RED));
    assert_eq!(c.pixel(150, 300), Some(Rgb::WHITE));
    assert_eq!(c.pixel(150, 500), Some(GREEN));

    c.undo();
    assert_eq!(c.pixel(150, 100), Some(RED));
    assert_eq!(c.pixel(150, 300), Some(Rgb::WHITE));
    assert_eq!(c.pixel(150, 500), Some(Rgb::WHITE));
}

#[test]
fn clear_is_undoable() {
    let mut c = blank();
    stroke(&mut c, &[(100.0, 100.0), (300.0, 200.0)], &BrushSettings::new(RED, 8));
    let drawn = c.surface().clone();

    c.clear();
    assert!(is_blank(&c));
    assert_eq!(c.history_len(), 3);

    assert!(c.undo());
    assert_eq!(c.surface(), &drawn);
}

#[test]
fn eraser_restores_exact_background() {
    let bg = Rgb::new(0xFA, 0xF0, 0xE6);
    let mut c = Canvas::new(Size::new(200, 200), bg).unwrap();
    stroke(&mut c, &[(20.0, 100.0), (180.0, 100.0)], &BrushSettings::new(RED, 10));
    assert_eq!(c.pixel(100, 100), Some(RED));

    let mut eraser = BrushSettings::new(RED, 20);
    eraser.toggle_eraser();
    stroke(&mut c, &[(60.0, 100.0), (140.0, 100.0)], &eraser);

    for x in 60..=140 {
        assert_eq!(c.pixel(x, 100), Some(bg), "x = {x}");
    }
    assert_eq!(c.pixel(30, 100), Some(RED));
}

#[test]
fn resize_keeps_the_overlap() {
    let mut c = blank();
    let b = BrushSettings::new(RED, 8);
    stroke(&mut c, &[(100.0, 100.0), (700.0, 100.0)], &b);

    c.resize(Size::new(400, 300), &b).unwrap();
    assert_eq!(c.size(), Size::new(400, 300));
    assert_eq!(c.pixel(200, 100), Some(RED));

    c.resize(Size::new(1000, 700), &b).unwrap();
    assert_eq!(c.pixel(200, 100), Some(RED));
    assert_eq!(c.pixel(600, 100), Some(Rgb::WHITE)); // cut off by the shrink
    assert_eq!(c.pixel(900, 650), Some(Rgb::WHITE));
}

#[test]
fn scaled_input_lands_on_backing_pixels() {
    let mut c = blank();
    // window shows the 800x600 surface at half size
    let display = Size::new(400, 300);
    let b = BrushSettings::new(RED, 2);
    let p = c.to_surface(Point::new(50.0, 50.0), display);
    c.begin_stroke(p, &b);
    c.end_stroke();
    assert_eq!(c.pixel(100, 100), Some(RED));
    assert_eq!(c.pixel(50, 50), Some(Rgb::WHITE));
}

#[test]
fn export_is_png_and_leaves_history_alone() {
    let mut c = blank();
    stroke(&mut c, &[(1.0, 1.0), (5.0, 5.0)], &BrushSettings::new(RED, 2));
    let bytes = c.export_image().unwrap();
    assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    assert_eq!(c.history_len(), 2);
    assert_eq!(c.cursor(), 1);
}
