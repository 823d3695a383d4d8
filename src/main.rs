//! Crown Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlImageElement,
        KeyboardEvent, MouseEvent,
    };

    use crown_dash::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
    use crown_dash::platform::{KeyState, KeyValueStore, LocalStorage, MemoryStore};
    use crown_dash::renderer::{RenderState, VertexBatch};
    use crown_dash::sim::{LevelSet, Overlay, TickInput};
    use crown_dash::ui::{Hud, apply_events};
    use crown_dash::{Game, HighScores, SettingToggle, Settings};

    /// Player sprite, relative to the page
    const SPRITE_URL: &str = "assets/player.png";

    fn overlay_id(overlay: Overlay) -> &'static str {
        match overlay {
            Overlay::GameOver => "gameOver",
            Overlay::LevelComplete => "levelComplete",
            Overlay::LevelTransition => "levelTransition",
        }
    }

    /// HUD backed by the page's DOM elements
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn overlay(&self, overlay: Overlay) -> Option<Element> {
            self.document.get_element_by_id(overlay_id(overlay))
        }

        fn show(&self, overlay: Overlay) {
            if let Some(el) = self.overlay(overlay) {
                let _ = el.class_list().remove_2("hidden", "fade-out");
            }
        }
    }

    impl Hud for DomHud {
        fn set_score(&mut self, score: u64) {
            self.set_text("score", &score.to_string());
        }

        fn set_high_score(&mut self, score: u64) {
            self.set_text("highScore", &score.to_string());
        }

        fn set_lives(&mut self, lives: u32) {
            self.set_text("lives", &lives.to_string());
        }

        fn set_fps(&mut self, fps: u32) {
            self.set_text("fps", &fps.to_string());
        }

        fn show_game_over(&mut self, score: u64) {
            self.set_text("finalScore", &score.to_string());
            self.show(Overlay::GameOver);
        }

        fn show_level_complete(&mut self, score: u64) {
            self.set_text("completeScore", &score.to_string());
            self.show(Overlay::LevelComplete);
        }

        fn show_transition(&mut self, completed_level: u32, score: u64) {
            self.set_text("transitionLevelNumber", &completed_level.to_string());
            self.set_text("transitionScore", &score.to_string());
            self.show(Overlay::LevelTransition);
        }

        fn fade_overlay(&mut self, overlay: Overlay) {
            if let Some(el) = self.overlay(overlay) {
                let _ = el.class_list().add_1("fade-out");
            }
        }

        fn hide_overlay(&mut self, overlay: Overlay) {
            if let Some(el) = self.overlay(overlay) {
                let _ = el.class_list().add_1("hidden");
                let _ = el.class_list().remove_1("fade-out");
            }
        }
    }

    /// Browser app holding the game and its host resources
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        batch: VertexBatch,
        keys: KeyState,
        hud: DomHud,
        settings_store: Box<dyn KeyValueStore>,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            self.batch.clear();
            let input = TickInput::from_source(&self.keys);
            self.game.frame(&mut self.batch, &input, time);
            self.render();

            let events = self.game.drain_events();
            apply_events(&mut self.hud, &events);
            if self.game.settings().show_fps {
                self.hud.set_fps(self.game.fps());
            }
        }

        fn toggle_setting(&mut self, toggle: SettingToggle) {
            self.game
                .toggle_setting(toggle, self.settings_store.as_mut());
            if !self.game.settings().show_fps {
                self.hud.set_text("fps", "-");
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.batch.vertices()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn open_storage() -> Box<dyn KeyValueStore> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; scores last for this session only", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub async fn run() -> Result<(), String> {
        log::info!("Crown Dash starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "#canvas is not a canvas")?;

        // Backing size follows the displayed size; the shader scales the world to fit
        let dpr = window.device_pixel_ratio();
        let (client_w, client_h) = match (canvas.client_width(), canvas.client_height()) {
            (w, h) if w > 0 && h > 0 => (w as f64, h as f64),
            _ => (VIEWPORT_WIDTH as f64, VIEWPORT_HEIGHT as f64),
        };
        let width = (client_w * dpr) as u32;
        let height = (client_h * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings_store = open_storage();
        let settings = Settings::load(settings_store.as_ref());
        let store = open_storage();
        let keys = KeyState::new(settings.key_bindings.clone());
        let levels = LevelSet::builtin().map_err(|e| e.to_string())?;
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(levels, HighScores::new(store), settings, seed)
            .map_err(|e| e.to_string())?;

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("failed to create surface: {}", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("failed to get adapter: {}", e))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| format!("failed to create device: {}", e))?;

        let app = Rc::new(RefCell::new(App {
            game,
            render_state: Some(render_state),
            batch: VertexBatch::new(),
            keys,
            hud: DomHud {
                document: document.clone(),
            },
            settings_store,
        }));

        load_sprite(&document, app.clone());
        setup_keyboard(app.clone());
        setup_buttons(&document, app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Crown Dash running!");
        Ok(())
    }

    /// Fetch the player image; until it arrives (or if it never does) a
    /// placeholder block is drawn instead
    fn load_sprite(document: &Document, app: Rc<RefCell<App>>) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Cannot create image element: {:?}", e);
                return;
            }
        };

        {
            let image_clone = image.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                match read_pixels(&document, &image_clone) {
                    Ok((pixels, w, h)) => {
                        let mut guard = app.borrow_mut();
                        let app = &mut *guard;
                        if let Some(ref mut render_state) = app.render_state {
                            render_state.set_sprite(&pixels, w, h);
                            app.batch.set_sprite_ready(true);
                        }
                    }
                    Err(e) => log::warn!("Sprite decode failed: {:?}", e),
                }
            });
            image.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                log::warn!("Sprite {} failed to load, using placeholder", SPRITE_URL);
            });
            image.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        image.set_src(SPRITE_URL);
    }

    /// RGBA8 pixels of a loaded image via an offscreen 2D canvas
    fn read_pixels(
        document: &Document,
        image: &HtmlImageElement,
    ) -> Result<(Vec<u8>, u32, u32), JsValue> {
        let (w, h) = (image.natural_width(), image.natural_height());
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(w);
        canvas.set_height(h);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        ctx.draw_image_with_html_image_element(image, 0.0, 0.0)?;
        let data = ctx.get_image_data(0.0, 0.0, w as f64, h as f64)?;
        Ok((data.data().0, w, h))
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if let Some(toggle) = SettingToggle::for_key(&key) {
                    if !event.repeat() {
                        app.borrow_mut().toggle_setting(toggle);
                    }
                    return;
                }
                if app.borrow_mut().keys.key_down(&key) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key-ups are lost while the window is unfocused
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().keys.release_all();
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        // The final-level screen reuses restart
        for id in ["restartBtn", "nextLevelBtn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    app.borrow_mut().game.restart();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("transitionContinueBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.skip_transition();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }

    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Crown Dash (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted run with no window: drives the frame loop into a vertex batch
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use crown_dash::platform::MemoryStore;
    use crown_dash::renderer::VertexBatch;
    use crown_dash::sim::{LevelError, LevelSet, Overlay, TickInput};
    use crown_dash::ui::{LogHud, apply_events};
    use crown_dash::{Game, HighScores, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// One minute of play
    const DEMO_FRAMES: u32 = 60 * 60;

    pub fn run() -> Result<(), LevelError> {
        let levels = LevelSet::builtin()?;
        let high_scores = HighScores::new(Box::new(MemoryStore::new()));
        let mut game = Game::new(levels, high_scores, Settings::default(), 42)?;
        let mut batch = VertexBatch::new();
        let mut hud = LogHud::default();
        let mut peak_vertices = 0;

        for frame in 0..DEMO_FRAMES {
            batch.clear();
            // Run right, hopping in short bursts
            let input = TickInput {
                left: false,
                right: true,
                jump: frame % 40 < 8,
            };
            game.frame(&mut batch, &input, frame as f64 * FRAME_MS);
            peak_vertices = peak_vertices.max(batch.len());

            apply_events(&mut hud, &game.drain_events());
            if matches!(hud.overlay, Some(Overlay::GameOver | Overlay::LevelComplete)) {
                break;
            }
        }

        log::info!(
            "Demo finished on level {} with score {} and {} lives ({} particles, peak {} vertices)",
            game.state.current_level(),
            hud.score,
            hud.lives,
            game.state.particles.len(),
            peak_vertices
        );
        println!(
            "level {} score {} high score {} lives {}",
            game.state.current_level(),
            hud.score,
            hud.high_score,
            hud.lives
        );
        Ok(())
    }
}
