//! Turret Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use turret_shooter::input::client_to_ndc_x;
    use turret_shooter::renderer::{RenderState, StartupError, draw_list, sync_all};
    use turret_shooter::sim::{GameState, tick};
    use turret_shooter::{Controls, InputEvent, Tuning};

    const CANVAS_ID: &str = "canvas";
    /// Primary mouse button
    const PRIMARY_BUTTON: i16 = 0;

    type MoveListener = Closure<dyn FnMut(MouseEvent)>;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: RenderState,
        controls: Controls,
        canvas: HtmlCanvasElement,
        /// Registered on press, removed on release
        move_listener: Option<MoveListener>,
    }

    impl Game {
        fn pointer_x(&self, event: &MouseEvent) -> f32 {
            let rect = self.canvas.get_bounding_client_rect();
            client_to_ndc_x(event.client_x() as f32, rect.left() as f32, rect.width() as f32)
        }

        /// Apply an input event; turret moves are pushed to the GPU at once
        fn input(&mut self, event: InputEvent) {
            let mut offsets = self.render_state.offsets();
            self.controls.apply(&mut self.state, event, &mut offsets);
        }

        /// One frame: tick, sync changed slices, draw
        fn frame(&mut self) {
            let input = self.controls.take_tick_input();
            let report = tick(&mut self.state, &input);
            if !report.hits.is_empty() {
                log::debug!("{} hit(s), score {}", report.hits.len(), self.state.score.score());
            }

            sync_all(&mut self.state, &mut self.render_state.offsets());

            let draws = draw_list(&self.state);
            match self.render_state.render(&draws) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Turret Shooter starting...");

        match start().await {
            Ok(game) => {
                request_animation_frame(game);
                log::info!("Turret Shooter running!");
            }
            Err(e) => {
                log::error!("Startup failed: {}", e);
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(&format!("Cannot start the game: {e}"));
                }
            }
        }
    }

    /// Build the graphics context and game. Nothing runs unless this succeeds.
    async fn start() -> Result<Rc<RefCell<Game>>, StartupError> {
        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let canvas: HtmlCanvasElement = window
            .document()
            .and_then(|d| d.get_element_by_id(CANVAS_ID))
            .and_then(|el| el.dyn_into().ok())
            .ok_or(StartupError::MissingCanvas(CANVAS_ID))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::load();
        let seed = tuning.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let state = GameState::new(tuning, seed);
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, &state).await?;

        let game = Rc::new(RefCell::new(Game {
            state,
            render_state,
            controls: Controls::new(),
            canvas: canvas.clone(),
            move_listener: None,
        }));

        setup_input_handlers(&canvas, game.clone());
        Ok(game)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Press: record the drag anchor and start listening for moves
        {
            let game = game.clone();
            let window = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != PRIMARY_BUTTON {
                    return;
                }
                let mut g = game.borrow_mut();
                let x = g.pointer_x(&event);
                g.input(InputEvent::Press { x });

                let drag_game = game.clone();
                let listener: MoveListener = Closure::new(move |event: MouseEvent| {
                    let mut g = drag_game.borrow_mut();
                    let x = g.pointer_x(&event);
                    g.input(InputEvent::Drag { x });
                });
                let _ = window.add_event_listener_with_callback(
                    "mousemove",
                    listener.as_ref().unchecked_ref(),
                );
                if let Some(old) = g.move_listener.replace(listener) {
                    let _ = window.remove_event_listener_with_callback(
                        "mousemove",
                        old.as_ref().unchecked_ref(),
                    );
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release: drop the move listener, ending the drag
        {
            let game = game.clone();
            let target = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != PRIMARY_BUTTON {
                    return;
                }
                let mut g = game.borrow_mut();
                if let Some(listener) = g.move_listener.take() {
                    let _ = target.remove_event_listener_with_callback(
                        "mousemove",
                        listener.as_ref().unchecked_ref(),
                    );
                }
                g.input(InputEvent::Release);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " {
                    event.prevent_default();
                    game.borrow_mut().input(InputEvent::Fire);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Turret Shooter (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the playable version");

    headless_run(3_600);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play `ticks` frames against a CPU mirror of the offset buffer
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(ticks: u64) {
    use turret_shooter::renderer::{ShadowBuffer, draw_list, sync_all};
    use turret_shooter::sim::{GameState, tick};
    use turret_shooter::{Controls, InputEvent, Tuning};

    let tuning = Tuning::load();
    let seed = tuning.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    let mut state = GameState::new(tuning, seed);
    let mut shadow = ShadowBuffer::new(state.layout.total_vertices());
    let mut controls = Controls::new();
    log::info!("Headless run with seed {} for {} ticks", seed, ticks);

    // Sweep the turret back and forth, firing at a steady cadence
    controls.apply(&mut state, InputEvent::Press { x: 0.0 }, &mut shadow);
    let mut pushes = 0;
    for t in 0..ticks {
        let x = (t as f32 * 0.02).sin() * 0.9;
        controls.apply(&mut state, InputEvent::Drag { x }, &mut shadow);
        if t % 12 == 0 {
            controls.apply(&mut state, InputEvent::Fire, &mut shadow);
        }
        let input = controls.take_tick_input();
        tick(&mut state, &input);
        pushes += sync_all(&mut state, &mut shadow);
    }
    controls.apply(&mut state, InputEvent::Release, &mut shadow);

    log::info!(
        "Done: score {}, {} difficulty ramps, {} slice uploads, {} draws in last frame",
        state.score.score(),
        state.score.wraps(),
        pushes,
        draw_list(&state).len()
    );
}
