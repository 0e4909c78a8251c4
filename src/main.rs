//! Reflex Dash entry point
//!
//! On the web this mounts the game on the page and runs the frame loop.
//! Natively it plays one seeded round on autopilot and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent};

    use reflex_dash::consts::MAX_FRAME_MS;
    use reflex_dash::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
    use reflex_dash::platform;
    use reflex_dash::records::{RecordKeeper, format_date};
    use reflex_dash::sim::{PlayArea, Round, RoundEvent, RoundPhase};

    type Keeper = Rc<RefCell<RecordKeeper<Box<dyn KeyValueStore>>>>;

    /// Game instance holding all state
    struct Game {
        round: Round,
        keeper: Keeper,
        last_time: f64,
        /// Sub-millisecond remainder carried between frames
        carry_ms: f64,
        /// Target ids currently in the DOM
        rendered_targets: Vec<u32>,
        /// Feedback ids currently in the DOM
        rendered_feedback: Vec<u32>,
        /// Show the game-over panel on the next HUD update
        show_results: bool,
    }

    impl Game {
        fn new(seed: u64, keeper: Keeper) -> Self {
            let mut round = Round::new(seed);
            let sink = keeper.clone();
            round.set_reporter(move |score| {
                use reflex_dash::ScoreReporter;
                sink.borrow_mut().round_ended(score);
            });
            Self {
                round,
                keeper,
                last_time: 0.0,
                carry_ms: 0.0,
                rendered_targets: Vec::new(),
                rendered_feedback: Vec::new(),
                show_results: false,
            }
        }

        /// Advance the round by a frame delta
        fn update(&mut self, dt_ms: f64) {
            let total = self.carry_ms + dt_ms.clamp(0.0, MAX_FRAME_MS);
            let whole = total.floor();
            self.carry_ms = total - whole;

            let events = self.round.advance(whole as u32);
            self.handle_events(&events);
        }

        fn handle_events(&mut self, events: &[RoundEvent]) {
            for event in events {
                if let RoundEvent::Ended { final_score } = event {
                    log::info!("Final score: {}", final_score);
                    self.show_results = true;
                }
            }
        }

        fn start(&mut self, document: &Document) {
            if let Some(area) = play_area_size(document) {
                self.round.set_area(area);
            }
            self.show_results = false;
            self.round.start();
        }

        fn reset(&mut self) {
            self.show_results = false;
            self.round.reset();
        }

        fn hit(&mut self, target_id: u32) {
            let events = self.round.hit(target_id);
            self.handle_events(&events);
        }

        /// Sync targets and floating messages into the play area
        fn render(&mut self, document: &Document) {
            let Some(area) = document.get_element_by_id("play-area") else {
                return;
            };

            let target_ids: Vec<u32> = self.round.targets().iter().map(|t| t.id).collect();
            if target_ids != self.rendered_targets {
                for old in collect(&area, ".target") {
                    old.remove();
                }
                for target in self.round.targets() {
                    let Ok(el) = document.create_element("div") else {
                        continue;
                    };
                    let _ = el.set_attribute("class", "target");
                    let _ = el.set_attribute("data-target-id", &target.id.to_string());
                    let half = target.size / 2.0;
                    set_style(&el, "left", &format!("{}px", target.pos.x - half));
                    set_style(&el, "top", &format!("{}px", target.pos.y - half));
                    set_style(&el, "width", &format!("{}px", target.size));
                    set_style(&el, "height", &format!("{}px", target.size));
                    let _ = area.append_child(&el);
                }
                self.rendered_targets = target_ids;
            }

            let feedback_ids: Vec<u32> = self.round.feedback().iter().map(|f| f.id).collect();
            if feedback_ids != self.rendered_feedback {
                for old in collect(&area, ".hit-message") {
                    old.remove();
                }
                for msg in self.round.feedback() {
                    let Ok(el) = document.create_element("div") else {
                        continue;
                    };
                    let _ = el.set_attribute("class", "hit-message");
                    el.set_text_content(Some(&msg.message));
                    set_style(&el, "left", &format!("{}px", msg.pos.x - 50.0));
                    set_style(&el, "top", &format!("{}px", msg.pos.y - 50.0));
                    let _ = area.append_child(&el);
                }
                self.rendered_feedback = feedback_ids;
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            set_text(document, "#hud-time .hud-value", &format!("{}s", self.round.time_remaining()));
            set_text(document, "#hud-tier .hud-value", self.round.tier().as_str());
            set_text(document, "#hud-score .hud-value", &self.round.score().to_string());
            set_text(document, "#hud-streak .hud-value", &self.round.streak().to_string());

            if let Some(el) = document.get_element_by_id("hud-time") {
                let class = if self.round.is_running() && self.round.time_remaining() <= 10 {
                    "hud-item urgent"
                } else {
                    "hud-item"
                };
                let _ = el.set_attribute("class", class);
            }

            let phase = self.round.phase();
            set_visible(document, "start-panel", phase == RoundPhase::Idle);
            set_visible(document, "game-over", phase == RoundPhase::Ended);

            if self.show_results {
                self.show_results = false;
                self.fill_results(document);
            }
        }

        fn fill_results(&self, document: &Document) {
            let keeper = self.keeper.borrow();
            let record = keeper.record();
            let new_best = keeper.last_outcome().is_some_and(|o| o.new_best);

            set_text(document, "#final-score", &self.round.score().to_string());
            set_text(document, "#best-score", &record.best_score.to_string());
            set_visible(document, "new-best", new_best);
            if let Some(at) = record.last_played_ms {
                set_text(document, "#last-played", &format_date(at, platform::now_ms()));
            }

            if let Some(list) = document.get_element_by_id("previous-scores") {
                list.set_text_content(None);
                for (i, score) in record.previous_scores.iter().enumerate() {
                    if let Ok(item) = document.create_element("li") {
                        item.set_text_content(Some(&format!("Try {}: {} pts", i + 1, score)));
                        let _ = list.append_child(&item);
                    }
                }
            }
        }
    }

    fn collect(parent: &Element, selector: &str) -> Vec<Element> {
        let mut out = Vec::new();
        if let Ok(nodes) = parent.query_selector_all(selector) {
            for i in 0..nodes.length() {
                if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    out.push(el);
                }
            }
        }
        out
    }

    fn set_style(el: &Element, prop: &str, value: &str) {
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property(prop, value);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    fn play_area_size(document: &Document) -> Option<PlayArea> {
        let rect = document.get_element_by_id("play-area")?.get_bounding_client_rect();
        Some(PlayArea::new(rect.width() as f32, rect.height() as f32))
    }

    fn open_keeper() -> Keeper {
        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}; scores will not persist");
                Box::new(MemoryStore::new())
            }
        };
        Rc::new(RefCell::new(RecordKeeper::new(store)))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Reflex Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let seed = platform::seed_from_clock();
        let game = Rc::new(RefCell::new(Game::new(seed, open_keeper())));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&document, game.clone());
        setup_buttons(&document, game.clone());

        request_animation_frame(game);
        log::info!("Reflex Dash running!");
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(area) = document.get_element_by_id("play-area") else {
            log::error!("No #play-area element, input disabled");
            return;
        };

        // Mouse down on a target registers a hit (faster than click)
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let id = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute("data-target-id"))
                .and_then(|id| id.parse::<u32>().ok());
            if let Some(id) = id {
                event.prevent_default();
                game.borrow_mut().hit(id);
            }
        });
        let _ = area.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Start
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                game.borrow_mut().start(&document);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Play again goes back to the start panel
        if let Some(btn) = document.get_element_by_id("again-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().reset();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 { time - g.last_time } else { 0.0 };
            g.last_time = time;

            g.update(dt);
            g.render(&document);
            g.update_hud(&document);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Reflex Dash (native) starting...");
    log::info!("Native mode plays a headless round - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(reflex_dash::platform::seed_from_clock);

    let score = autopilot::play_round(seed, autopilot::REACTION_MS);
    println!("Seed {seed}: final score {score}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless player that clicks each batch after a fixed reaction time
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use std::cell::RefCell;
    use std::rc::Rc;

    use reflex_dash::persistence::MemoryStore;
    use reflex_dash::records::RecordKeeper;
    use reflex_dash::sim::{Round, RoundEvent, RoundPhase};
    use reflex_dash::ScoreReporter;

    /// Milliseconds the autopilot waits before clicking a fresh batch
    pub const REACTION_MS: u32 = 350;
    /// Simulated frame length
    const FRAME_MS: u32 = 16;

    pub fn play_round(seed: u64, reaction_ms: u32) -> u32 {
        // A refill restarts the wait, so a zero wait would never let time pass
        let reaction_ms = reaction_ms.max(1);
        let keeper = Rc::new(RefCell::new(RecordKeeper::new(MemoryStore::new())));
        let mut round = Round::new(seed);
        let sink = keeper.clone();
        round.set_reporter(move |score| sink.borrow_mut().round_ended(score));

        let mut since_spawn = 0;
        let mut events = round.start();

        while round.phase() == RoundPhase::Running {
            if events.iter().any(|e| matches!(e, RoundEvent::Spawned { .. })) {
                since_spawn = 0;
            }

            events = if since_spawn >= reaction_ms {
                match round.targets().first().map(|t| t.id) {
                    Some(id) => round.hit(id),
                    None => Vec::new(),
                }
            } else {
                Vec::new()
            };
            // A hit that leaves targets behind keeps the clock running for the rest
            if events.iter().any(|e| matches!(e, RoundEvent::Hit { .. })) {
                continue;
            }

            events = round.advance(FRAME_MS);
            since_spawn += FRAME_MS;
        }

        let keeper = keeper.borrow();
        log::info!(
            "Autopilot finished: score {}, best {}, games {}",
            round.score(),
            keeper.record().best_score,
            keeper.record().total_games
        );
        round.score()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_autopilot_scores() {
            assert!(play_round(7, REACTION_MS) > 0);
        }

        #[test]
        fn test_too_slow_autopilot_scores_nothing() {
            // Hard batches vanish after 600 ms, Easy after 1000 ms
            assert_eq!(play_round(7, 5_000), 0);
        }

        #[test]
        fn test_instant_autopilot_finishes() {
            assert!(play_round(5, 0) > 0);
        }

        #[test]
        fn test_autopilot_is_deterministic() {
            assert_eq!(play_round(11, 200), play_round(11, 200));
        }
    }
}
