// What you SEE:
// • A white page. Hold Left Mouse to draw; Z undo, Y redo, C clear.
// • E toggles the eraser, [ and ] change brush size, 1-9 pick a color.
// • S saves the drawing, P takes a photo with the camera. Both land in --out-dir.
// • TAB then the PIN enters parent mode (review only, no drawing). TAB again leaves. ESC quits.

use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use kids_sketchpad::brush::{BrushSettings, DEFAULT_BRUSH_WIDTH, PALETTE};
use kids_sketchpad::camera::CameraCapture;
use kids_sketchpad::draw::{Action, Drawer, draw_crosshair, draw_ring, draw_text_5x7};
use kids_sketchpad::session::Session;
use kids_sketchpad::store::{ContentStore, ContentType, FsContentStore, NewContent, OwnerId, save_drawing, save_photo};
use kids_sketchpad::{Canvas, Error, Point, Rgb, Size};

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Parser, Debug)]
#[command(name = "kids-sketchpad", version, about = "Draw, snap photos, and keep them in a portfolio")]
struct Args {
    /// Backing surface width in pixels
    #[arg(long, default_value_t = 800)]
    width: usize,

    /// Backing surface height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Page color as RRGGBB
    #[arg(long, default_value = "FFFFFF", value_parser = parse_color)]
    background: Rgb,

    /// Directory saved works are written to
    #[arg(long, default_value = "works")]
    out_dir: String,

    /// Camera index used for photos
    #[arg(long, default_value_t = 0)]
    camera: u32,

    /// Child profile that owns new works
    #[arg(long, default_value = "default-child")]
    owner: String,

    /// PIN that unlocks parent mode
    #[arg(long, default_value = "0000")]
    pin: String,
}

fn parse_color(s: &str) -> Result<Rgb, String> {
    Rgb::from_hex(s).ok_or_else(|| format!("expected RRGGBB, got {s:?}"))
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut canvas = match Canvas::new(Size::new(args.width, args.height), args.background) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "drawing unavailable");
            return Err(e);
        }
    };
    let mut drawer = Drawer::new("Kids Sketchpad", args.width, args.height)?;
    let mut store = FsContentStore::open(&args.out_dir)?;
    let mut session = Session::for_child(OwnerId::Profile(args.owner.clone()));
    let mut brush = BrushSettings::new(PALETTE[1], DEFAULT_BRUSH_WIDTH);
    let mut camera: Option<CameraCapture> = None;
    info!(out_dir = %store.root().display(), "ready");

    let mut last_display = drawer.display_size();
    let mut pin_entry: Option<String> = None;
    let mut works_shown = 0usize;
    let mut status: Option<(String, Instant)> = None;

    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Layout: follow the window when it changes size. */
        let display = drawer.display_size();
        if display != last_display && !display.is_empty() {
            canvas.end_stroke();
            if let Err(e) = canvas.resize(display, &brush) {
                warn!(error = %e, "resize skipped");
            }
            last_display = display;
        }

        /* 2) PIN entry swallows digit keys until it is complete. */
        if let Some(buf) = pin_entry.as_mut() {
            buf.push_str(&drawer.digits_pressed());
            if buf.len() >= args.pin.len() {
                match session.enter_parent_mode(buf, &args.pin) {
                    Ok(()) => {
                        works_shown = list_works(&store, &session);
                        status = Some(("PARENT MODE".into(), Instant::now()));
                    }
                    Err(e) => {
                        warn!(error = %e, "parent mode refused");
                        status = Some(("WRONG PIN".into(), Instant::now()));
                    }
                }
                pin_entry = None;
            }
        }

        /* 3) Keyboard actions. */
        for action in drawer.poll_actions() {
            if pin_entry.is_some() && !matches!(action, Action::ToggleParent) {
                continue;
            }
            match action {
                Action::ToggleParent => {
                    if session.is_parent() {
                        session.exit_parent_mode();
                        status = Some(("CHILD MODE".into(), Instant::now()));
                    } else if pin_entry.take().is_none() {
                        canvas.end_stroke();
                        pin_entry = Some(String::new());
                    }
                }
                _ if session.is_parent() => {}
                Action::Undo => { canvas.undo(); }
                Action::Redo => { canvas.redo(); }
                Action::Clear => canvas.clear(),
                Action::ToggleEraser => brush.toggle_eraser(),
                Action::BrushBigger => brush.nudge_width(2),
                Action::BrushSmaller => brush.nudge_width(-2),
                Action::PickColor(i) => {
                    if let Some(c) = PALETTE.get(i) {
                        brush.color = *c;
                        brush.eraser = false;
                    }
                }
                Action::Save => {
                    canvas.end_stroke();
                    let msg = match save_current(&canvas, &mut store, &session) {
                        Ok(()) => "SAVED!",
                        Err(e) => {
                            warn!(error = %e, "save failed; drawing kept");
                            "SAVE FAILED - PRESS S TO RETRY"
                        }
                    };
                    status = Some((msg.into(), Instant::now()));
                }
                Action::Photo => {
                    let msg = match take_photo(&mut camera, args.camera, &mut store, &session) {
                        Ok(()) => "PHOTO SAVED!",
                        Err(e) => {
                            warn!(error = %e, "photo failed");
                            "PHOTO FAILED"
                        }
                    };
                    status = Some((msg.into(), Instant::now()));
                }
            }
        }

        /* 4) Mouse: down starts a stroke, moving extends it, up finishes it. */
        let mouse = drawer.mouse_pos().map(|(x, y)| canvas.to_surface(Point::new(x, y), display));
        let drawing_allowed = !session.is_parent() && pin_entry.is_none();
        match (drawer.left_mouse_down() && drawing_allowed, canvas.is_drawing(), mouse) {
            (true, false, Some(p)) => canvas.begin_stroke(p, &brush),
            (true, true, Some(p)) => canvas.extend_stroke(p, &brush),
            (false, true, _) => canvas.end_stroke(),
            _ => {}
        }

        /* 5) Compose: drawing, then brush preview, then HUD. */
        let mut screen = canvas.surface().clone();
        if let Some(p) = mouse {
            let (cx, cy) = (p.x as i32, p.y as i32);
            if drawing_allowed {
                draw_ring(&mut screen, cx, cy, (brush.width() / 2) as i32, 0x00_88_88_88);
            }
            draw_crosshair(&mut screen, cx, cy, 8, brush.ink(canvas.background()).0);
        }

        if status.as_ref().is_some_and(|(_, at)| at.elapsed() > STATUS_TTL) {
            status = None;
        }
        let hud = hud_line(&canvas, &brush, &session, pin_entry.as_deref(), works_shown);
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);
        if let Some((msg, _)) = &status {
            draw_text_5x7(&mut screen, 8, 20, msg, 0x00_FF_CC_33);
        }

        drawer.present(&screen)?;
    }

    Ok(())
}

fn hud_line(canvas: &Canvas, brush: &BrushSettings, session: &Session, pin: Option<&str>, works: usize) -> String {
    if let Some(typed) = pin {
        return format!("PARENT PIN: {}", ".".repeat(typed.len()));
    }
    if session.is_parent() {
        return format!("PARENT | WORKS: {works} | TAB: BACK");
    }
    let tool = if brush.eraser { "ERASE" } else { "DRAW" };
    format!(
        "{tool} | SIZE {} | STEP {}/{}",
        brush.width(),
        canvas.cursor(),
        canvas.history_len() - 1
    )
}

fn list_works(store: &FsContentStore, session: &Session) -> usize {
    let Some(owner) = session.selected_child() else { return 0 };
    match store.list(owner) {
        Ok(records) => records.len(),
        Err(e) => {
            warn!(error = %e, "could not list works");
            0
        }
    }
}

fn save_current(canvas: &Canvas, store: &mut FsContentStore, session: &Session) -> Result<(), Error> {
    let title = format!("Drawing {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
    let meta = NewContent::new(title, ContentType::Drawing, session.owner_for_new_work()?);
    save_drawing(canvas, store, &meta)?;
    Ok(())
}

fn take_photo(
    camera: &mut Option<CameraCapture>,
    index: u32,
    store: &mut FsContentStore,
    session: &Session,
) -> Result<(), Error> {
    // opened on first use; the app works fine on machines without a camera
    let cam = match camera.take() {
        Some(cam) => cam,
        None => CameraCapture::new(index, 640, 480)?,
    };
    let cam = camera.insert(cam);
    let (w, h) = cam.resolution();
    let photo = cam.capture_still()?;
    info!(width = w, height = h, "photo captured");
    let title = format!("Photo {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
    let meta = NewContent::new(title, ContentType::Photo, session.owner_for_new_work()?);
    save_photo(&photo, store, &meta)?;
    Ok(())
}
