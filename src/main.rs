use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

use slideboard::acquire::{self, AcquisitionChain, DecodedImage};
use slideboard::config::{PALETTE, SETTINGS_FILE};
use slideboard::coords::CoordinateMapper;
use slideboard::error::AcquireError;
use slideboard::export::PdfiumExporter;
use slideboard::interaction::{PointerSource, PointerTracker};
use slideboard::persistence::{BlobStore, FileBlobStore, MemoryBlobStore};
use slideboard::resize::ResizeCoordinator;
use slideboard::ui::{self, Layout, ToolbarHit};
use slideboard::{Outcome, Point, PointerPhase, ResizeToggle, Settings, Size, Whiteboard};

const TITLE: &str = "Slideboard";
const NOTICE_DURATION: Duration = Duration::from_secs(3);
const INITIAL_WINDOW: Size = Size::new(1024, 768);
/// Sidebar scroll per wheel notch, in pixels
const SCROLL_LINE: f32 = 50.0;

/// Results posted back to the event loop from worker threads
#[derive(Debug)]
enum UserEvent {
    ImageAcquired(Result<DecodedImage, AcquireError>),
}

struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    board: Whiteboard,
    blobs: Box<dyn BlobStore>,
    layout: Layout,
    resize: ResizeCoordinator,
    mapper: CoordinateMapper,
    tracker: PointerTracker,
    proxy: EventLoopProxy<UserEvent>,
    acquiring: bool,
    exporter: Option<PdfiumExporter>,
    cursor_pos: Point,
    window_size: Size,
    modifiers: ModifiersState,
    autosave: Option<Duration>,
    last_save: Instant,
    notice_until: Option<Instant>,
}

impl App {
    fn new(board: Whiteboard, blobs: Box<dyn BlobStore>, proxy: EventLoopProxy<UserEvent>) -> Self {
        let settings = board.settings();
        let layout = Layout::new(settings);
        let resize = ResizeCoordinator::new(settings);
        let mapper = CoordinateMapper::new(resize.canvas_origin(), board.size());
        let autosave = (settings.autosave_secs > 0).then(|| Duration::from_secs(settings.autosave_secs));

        App {
            window: None,
            pixels: None,
            layout,
            resize,
            mapper,
            tracker: PointerTracker::new(),
            proxy,
            acquiring: false,
            exporter: None,
            cursor_pos: Point::default(),
            window_size: INITIAL_WINDOW,
            modifiers: ModifiersState::empty(),
            autosave,
            last_save: Instant::now(),
            notice_until: None,
            board,
            blobs,
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Non-fatal message for the user, shown in the title bar for a moment
    fn notify(&mut self, message: &str) {
        info!("{message}");
        if let Some(window) = &self.window {
            window.set_title(&format!("{TITLE} - {message}"));
            self.notice_until = Some(Instant::now() + NOTICE_DURATION);
        }
    }

    fn redraw_board(&mut self) {
        self.board.render();
        self.request_redraw();
    }

    fn save(&mut self) {
        match self.board.save(self.blobs.as_mut()) {
            Ok(()) => debug!("board saved"),
            Err(e) => warn!(error = %e, "save failed, keeping session state"),
        }
        self.last_save = Instant::now();
    }

    fn resize_window(&mut self, size: Size) {
        self.window_size = size;
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(size.width, size.height) {
                error!(error = %e, "failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(size.width, size.height) {
                error!(error = %e, "failed to resize buffer");
            }
        }
        self.resize.apply(&mut self.board, size);
        self.mapper.set_size(self.board.size());
        self.layout.scroll_sidebar(0.0, self.board.thumbnails(), size.height);
        self.redraw_board();
    }

    /// Select the slide `step` places away from the current one and scroll
    /// the sidebar to it
    fn step_slide(&mut self, step: isize) {
        let Some(index) = self.board.store().current().checked_add_signed(step) else {
            return;
        };
        if self.board.select_slide(index) {
            self.layout.reveal_active(self.board.thumbnails(), self.window_size.height);
            self.redraw_board();
        }
    }

    fn dispatch_pointer(&mut self, source: PointerSource, phase: PointerPhase, device: Point) {
        let position = self.mapper.to_canvas(device);
        let Some(event) = self.tracker.track(source, phase, position) else {
            return;
        };
        if self.board.handle_pointer(event) != Outcome::Nothing {
            self.redraw_board();
        }
    }

    /// Press at a window position: toolbar and sidebar clicks first, then
    /// the canvas.
    fn press(&mut self, source: PointerSource, device: Point) {
        if self.tracker.active().is_none() {
            if self.layout.in_toolbar(device) {
                if let Some(ToolbarHit::Color(i)) = self.layout.toolbar_hit(device) {
                    self.board.set_color(PALETTE[i]);
                    self.request_redraw();
                }
                return;
            }
            if self.layout.in_sidebar(device) {
                if self.board.click_thumbnail(self.layout.to_sidebar(device)).is_some() {
                    self.redraw_board();
                }
                return;
            }
            if !self.mapper.contains_device(device) {
                return;
            }
        }
        self.dispatch_pointer(source, PointerPhase::Down, device);
    }

    fn handle_touch(&mut self, touch: Touch) {
        let device = Point::new(touch.location.x as f32, touch.location.y as f32);
        let source = PointerSource::Touch(touch.id);
        match touch.phase {
            TouchPhase::Started => self.press(source, device),
            TouchPhase::Moved => self.dispatch_pointer(source, PointerPhase::Move, device),
            TouchPhase::Ended => self.dispatch_pointer(source, PointerPhase::Up, device),
            TouchPhase::Cancelled => self.dispatch_pointer(source, PointerPhase::Cancel, device),
        }
    }

    /// Acquire an image on a worker thread; the result comes back as a
    /// `UserEvent`.
    fn start_acquisition(&mut self, chain: fn() -> AcquisitionChain) {
        if self.acquiring {
            debug!("image acquisition already in progress");
            return;
        }
        self.acquiring = true;
        let proxy = self.proxy.clone();
        std::thread::spawn(move || {
            let result = chain().acquire();
            if proxy.send_event(UserEvent::ImageAcquired(result)).is_err() {
                debug!("event loop closed before image arrived");
            }
        });
    }

    fn insert_image(&mut self, image: DecodedImage) {
        self.board.insert_image(image);
        self.redraw_board();
        self.notify("Drag to move, red corner to resize, R to finish");
    }

    fn toggle_resize(&mut self) {
        match self.board.toggle_resize() {
            ResizeToggle::NoOverlay => self.notify("Paste an image first (P or Ctrl+V) to resize it"),
            ResizeToggle::Entered => self.redraw_board(),
            ResizeToggle::Finished => {
                self.redraw_board();
                self.notify("Image placed");
            }
        }
    }

    fn export(&mut self) {
        if self.exporter.is_none() {
            match PdfiumExporter::new() {
                Ok(exporter) => self.exporter = Some(exporter),
                Err(e) => {
                    warn!(error = %e, "PDF export unavailable");
                    self.notify(&format!("Export failed: {e}"));
                    return;
                }
            }
        }
        let Some(exporter) = self.exporter.as_ref() else {
            return;
        };
        let result = self.board.export(exporter);
        self.redraw_board();

        let path = self.board.settings().export_path();
        match result.and_then(|bytes| std::fs::write(&path, bytes).map_err(Into::into)) {
            Ok(()) => self.notify(&format!("Exported {}", path.display())),
            Err(e) => {
                warn!(error = %e, "export failed");
                self.notify(&format!("Export failed: {e}"));
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, keycode: KeyCode) {
        let ctrl = self.modifiers.control_key() || self.modifiers.super_key();
        match keycode {
            KeyCode::Escape => {
                self.save();
                event_loop.exit();
            }
            KeyCode::KeyV if ctrl => self.start_acquisition(AcquisitionChain::clipboard_only),
            KeyCode::KeyS if ctrl => {
                self.save();
                self.notify("Saved");
            }
            KeyCode::KeyP => self.start_acquisition(AcquisitionChain::standard),
            KeyCode::KeyN => {
                self.board.new_slide();
                self.layout.reveal_active(self.board.thumbnails(), self.window_size.height);
                self.redraw_board();
            }
            KeyCode::PageUp => self.step_slide(-1),
            KeyCode::PageDown => self.step_slide(1),
            KeyCode::KeyC if !ctrl => {
                self.board.clear();
                self.redraw_board();
            }
            KeyCode::KeyE => {
                let erasing = self.board.toggle_eraser();
                debug!(erasing, "eraser toggled");
                self.request_redraw();
            }
            KeyCode::KeyR => self.toggle_resize(),
            KeyCode::KeyX => self.export(),
            KeyCode::BracketRight | KeyCode::Equal | KeyCode::NumpadAdd => {
                let width = self.board.pen().width + 1.0;
                self.board.set_pen_width(width);
                self.request_redraw();
            }
            KeyCode::BracketLeft | KeyCode::Minus | KeyCode::NumpadSubtract => {
                let width = self.board.pen().width - 1.0;
                self.board.set_pen_width(width);
                self.request_redraw();
            }
            _ => {}
        }
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.pixels.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(INITIAL_WINDOW.width, INITIAL_WINDOW.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!(error = %e, "failed to create window");
                event_loop.exit();
                return;
            }
        };
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        match Pixels::new(size.width, size.height, surface_texture) {
            Ok(pixels) => self.pixels = Some(pixels),
            Err(e) => {
                error!(error = %e, "failed to create pixel buffer");
                event_loop.exit();
                return;
            }
        }
        self.window = Some(window);

        // Decode stored slides at the real canvas size, never the placeholder's
        let window_size = Size::new(size.width, size.height);
        let settings = self.board.settings().clone();
        self.board = self.resize.load_board(settings, window_size, self.blobs.as_ref());
        self.resize_window(window_size);
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::ImageAcquired(result) => {
                self.acquiring = false;
                match result {
                    Ok(image) => self.insert_image(image),
                    Err(e) => {
                        warn!(error = %e, "image acquisition failed");
                        self.notify(&e.to_string());
                    }
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("closing slideboard");
                self.save();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    self.resize_window(Size::new(new_size.width, new_size.height));
                }
            }

            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.modifiers = new_modifiers.state();
            }

            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                let device = self.cursor_pos;
                match state {
                    ElementState::Pressed => self.press(PointerSource::Mouse, device),
                    ElementState::Released => self.dispatch_pointer(PointerSource::Mouse, PointerPhase::Up, device),
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_pos = Point::new(position.x as f32, position.y as f32);
                self.dispatch_pointer(PointerSource::Mouse, PointerPhase::Move, self.cursor_pos);
            }

            WindowEvent::CursorLeft { .. } => {
                self.dispatch_pointer(PointerSource::Mouse, PointerPhase::Leave, self.cursor_pos);
            }

            WindowEvent::Touch(touch) => self.handle_touch(touch),

            WindowEvent::MouseWheel { delta, .. } => {
                if self.layout.in_sidebar(self.cursor_pos) {
                    let pixels = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y * SCROLL_LINE,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                    };
                    self.layout.scroll_sidebar(-pixels, self.board.thumbnails(), self.window_size.height);
                    self.request_redraw();
                    return;
                }
                let step = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y.signum(),
                    MouseScrollDelta::PixelDelta(pos) => (pos.y as f32).signum(),
                };
                let width = self.board.pen().width + step;
                self.board.set_pen_width(width);
                self.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(keycode) = event.physical_key {
                        self.handle_key(event_loop, keycode);
                    }
                }
            }

            WindowEvent::DroppedFile(path) => {
                if !acquire::is_image_path(&path) {
                    warn!(path = %path.display(), "dropped file is not a supported image format");
                    return;
                }
                match acquire::decode_file(&path) {
                    Ok(image) => self.insert_image(image),
                    Err(e) => {
                        warn!(error = %e, "could not load dropped image");
                        self.notify(&e.to_string());
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(pixels) = &mut self.pixels {
                    ui::paint(pixels.frame_mut(), self.window_size, &self.layout, &self.board);
                    if let Err(e) = pixels.render() {
                        error!(error = %e, "render error");
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let mut next_wake: Option<Instant> = None;

        if let Some(until) = self.notice_until {
            if now >= until {
                self.notice_until = None;
                if let Some(window) = &self.window {
                    window.set_title(TITLE);
                }
            } else {
                next_wake = Some(until);
            }
        }

        if let Some(interval) = self.autosave {
            if self.board.has_unsaved_changes() && now.duration_since(self.last_save) >= interval {
                self.save();
            }
            let due = self.last_save + interval;
            next_wake = Some(next_wake.map_or(due, |w| w.min(due)));
        }

        match next_wake {
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slideboard=info")))
        .init();

    let settings = Settings::load_or_default(Path::new(SETTINGS_FILE));

    let blobs: Box<dyn BlobStore> = match FileBlobStore::open(&settings.storage_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(path = %settings.storage_path.display(), error = %e, "storage unavailable, slides will not persist");
            Box::new(MemoryBlobStore::new())
        }
    };

    // Slides are loaded once the window exists and its size is known
    let canvas = ResizeCoordinator::new(&settings).target_size(INITIAL_WINDOW);
    let board = Whiteboard::new(settings, canvas);

    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(board, blobs, event_loop.create_proxy());
    event_loop.run_app(&mut app)?;
    Ok(())
}
