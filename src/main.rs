//! Holdout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use glam::Vec2;
    use holdout::audio::{AudioManager, SoundEffect};
    use holdout::consts::*;
    use holdout::progress::ControlScheme;
    use holdout::sim::{GamePhase, GameState, TickInput, tick};
    use holdout::{BalanceConfig, PlayerProgress, Settings};

    /// Held movement/aim keys, sampled into TickInput every frame
    #[derive(Default)]
    struct HeldKeys {
        up: bool,
        down: bool,
        left: bool,
        right: bool,
        aim_up: bool,
        aim_down: bool,
        aim_left: bool,
        aim_right: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        balance: BalanceConfig,
        progress: PlayerProgress,
        settings: Settings,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        keys: HeldKeys,
        mouse_pos: Vec2,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let balance = BalanceConfig::default();
            let progress = PlayerProgress::load();
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            Self {
                state: GameState::new(seed, &progress, &balance),
                balance,
                progress,
                settings,
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                keys: HeldKeys::default(),
                mouse_pos: Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
                last_phase: GamePhase::Menu,
            }
        }

        fn start_level(&mut self, level: u32) {
            self.state.start_level(level, &self.progress, &self.balance);
            self.accumulator = 0.0;
            self.input = TickInput::default();
            log::info!("Level {} started", level);
        }

        /// Sample held keys and mouse into this frame's input
        fn gather_input(&mut self) {
            let mut dir = Vec2::ZERO;
            if self.keys.up {
                dir.y -= 1.0;
            }
            if self.keys.down {
                dir.y += 1.0;
            }
            if self.keys.left {
                dir.x -= 1.0;
            }
            if self.keys.right {
                dir.x += 1.0;
            }
            self.input.move_dir = dir;

            self.input.aim_angle = match self.progress.control_scheme {
                ControlScheme::MouseAim => {
                    let to_mouse = self.mouse_pos - self.state.player.pos;
                    (to_mouse.length_squared() > 1.0).then(|| to_mouse.y.atan2(to_mouse.x))
                }
                ControlScheme::Keyboard => {
                    let mut aim = Vec2::ZERO;
                    if self.keys.aim_up {
                        aim.y -= 1.0;
                    }
                    if self.keys.aim_down {
                        aim.y += 1.0;
                    }
                    if self.keys.aim_left {
                        aim.x -= 1.0;
                    }
                    if self.keys.aim_right {
                        aim.x += 1.0;
                    }
                    (aim != Vec2::ZERO).then(|| aim.y.atan2(aim.x))
                }
            };
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;
            self.gather_input();

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT, &self.balance);
                self.dispatch_audio();
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
            }

            // Persist progress on phase transitions
            let phase = self.state.phase;
            if phase != self.last_phase {
                match phase {
                    GamePhase::RoundComplete => {
                        self.progress
                            .complete_level(self.state.level, self.state.money_earned);
                        self.progress.save();
                        log::info!(
                            "Level {} complete, banked {} money",
                            self.state.level,
                            self.state.money_earned
                        );
                    }
                    GamePhase::GameOver => {
                        // Permadeath: everything but the control scheme goes
                        self.progress.reset();
                        self.progress.save();
                        log::info!("Run over after {} kills", self.state.total_kills);
                    }
                    _ => {}
                }
                self.last_phase = phase;
            }
        }

        /// Forward this tick's events to the audio sink
        fn dispatch_audio(&self) {
            for event in &self.state.events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-health .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!(
                    "{:.0}/{:.0}",
                    self.state.player.health.max(0.0),
                    self.state.player.max_health
                )));
            }

            if let Some(el) = document.query_selector("#hud-money .hud-value").ok().flatten() {
                let total = self.progress.money + self.state.money_earned;
                el.set_text_content(Some(&total.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.level.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-timer .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.0}", self.state.round_timer.ceil())));
            }

            if let Some(el) = document.query_selector("#hud-kills .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.total_kills.to_string()));
            }

            // Phase overlays
            if let Some(el) = document.get_element_by_id("pause-menu") {
                let class = if self.state.paused { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("round-complete") {
                let class = if self.state.phase == GamePhase::RoundComplete {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(kills_el) = document.get_element_by_id("final-kills") {
                        kills_el.set_text_content(Some(&self.state.total_kills.to_string()));
                    }
                    if let Some(level_el) = document.get_element_by_id("final-level") {
                        level_el.set_text_content(Some(&self.state.level.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Holdout starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_menu_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Holdout running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - aim at the cursor in canvas coordinates
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let scale_x = CANVAS_WIDTH / rect.width() as f32;
                let scale_y = CANVAS_HEIGHT / rect.height() as f32;
                let x = (event.client_x() as f32 - rect.left() as f32) * scale_x;
                let y = (event.client_y() as f32 - rect.top() as f32) * scale_y;
                game.borrow_mut().mouse_pos = Vec2::new(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - resume audio (browsers require a gesture)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow().audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard down
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "w" | "W" => g.keys.up = true,
                    "s" | "S" => g.keys.down = true,
                    "a" | "A" => g.keys.left = true,
                    "d" | "D" => g.keys.right = true,
                    "ArrowUp" => g.keys.aim_up = true,
                    "ArrowDown" => g.keys.aim_down = true,
                    "ArrowLeft" => g.keys.aim_left = true,
                    "ArrowRight" => g.keys.aim_right = true,
                    "Escape" => g.input.pause = true,
                    " " | "Enter" => match g.state.phase {
                        GamePhase::Menu => {
                            let level = g.progress.unlocked_levels;
                            g.start_level(level);
                        }
                        GamePhase::RoundComplete => {
                            let level = (g.state.level + 1).min(TOTAL_LEVELS);
                            g.start_level(level);
                        }
                        GamePhase::GameOver => {
                            let seed = js_sys::Date::now() as u64;
                            let balance = BalanceConfig::default();
                            g.state = GameState::new(seed, &g.progress, &balance);
                            g.start_level(1);
                        }
                        _ => {}
                    },
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "w" | "W" => g.keys.up = false,
                    "s" | "S" => g.keys.down = false,
                    "a" | "A" => g.keys.left = false,
                    "d" | "D" => g.keys.right = false,
                    "ArrowUp" => g.keys.aim_up = false,
                    "ArrowDown" => g.keys.aim_down = false,
                    "ArrowLeft" => g.keys.aim_left = false,
                    "ArrowRight" => g.keys.aim_right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Resume button on the pause overlay
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.pause = true; // Toggle back to playing
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart button on the game-over overlay
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                let balance = BalanceConfig::default();
                g.state = GameState::new(seed, &g.progress, &balance);
                g.start_level(1);
                log::info!("New run started with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing && !g.state.paused {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game_blur = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game_blur.borrow_mut();
                if g.state.phase == GamePhase::Playing && !g.state.paused {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus - restore audio
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use holdout::consts::*;
    use holdout::sim::{GamePhase, GameState, TickInput, tick};
    use holdout::{BalanceConfig, PlayerProgress};

    env_logger::init();
    log::info!("Holdout (native) starting...");
    log::info!("Native mode runs a headless demo round - run with `trunk serve` for web version");

    let balance = BalanceConfig::default();
    let progress = PlayerProgress::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(42);

    let mut state = GameState::new(seed, &progress, &balance);
    state.start_level(1, &progress, &balance);

    let input = TickInput::default();
    let mut ticks = 0u64;
    while state.phase == GamePhase::Playing && ticks < (ROUND_DURATION / SIM_DT) as u64 + 120 {
        tick(&mut state, &input, SIM_DT, &balance);
        ticks += 1;
    }

    log::info!(
        "Demo round finished: phase {:?}, {} kills, {} money, {} ticks",
        state.phase,
        state.total_kills,
        state.money_earned,
        ticks
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
