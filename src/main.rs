//! Brickbreak entry point
//!
//! Runs a headless demo session: the idle-mode AI plays a full run with
//! the fixed-timestep loop a renderer frontend would drive, exercising
//! persistence along the way.

use std::time::Instant;

use brickbreak::assets::{AssetLibrary, sounds};
use brickbreak::consts::*;
use brickbreak::sim::{GamePhase, GameState, TickInput, tick};
use brickbreak::{HighScores, Settings, Storage};

const SAVE_KEY: &str = "brickbreak_save";

/// Game instance holding all state
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    // Track phase for auto-save
    last_phase: GamePhase,
}

impl Game {
    fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(seed),
            accumulator: 0.0,
            input: TickInput::default(),
            last_phase: GamePhase::Menu,
        }
    }

    /// Run simulation ticks for one frame delta
    fn update(&mut self, dt_ms: f32, storage: &Storage) {
        let dt_ms = dt_ms.min(MAX_FRAME_DELTA_MS);
        self.accumulator += dt_ms;

        let mut substeps = 0;
        while self.accumulator >= FRAME_TIME_MS && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, FRAME_TIME_MS);
            self.accumulator -= FRAME_TIME_MS;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.launch = false;
            self.input.pause = false;
            self.input.start = false;
            self.input.skip_level = false;
        }

        // Auto-save on phase transitions
        let current_phase = self.state.phase;
        if current_phase != self.last_phase {
            match current_phase {
                GamePhase::Paused | GamePhase::LevelComplete => self.save_game(storage),
                GamePhase::GameOver | GamePhase::GameComplete => {
                    storage.remove_item(SAVE_KEY);
                }
                _ => {}
            }
            self.last_phase = current_phase;
        }
    }

    /// Save game state for resume
    fn save_game(&self, storage: &Storage) {
        match serde_json::to_string(&self.state) {
            Ok(json) => {
                storage.set_item(SAVE_KEY, &json);
                log::info!("Game saved (level {})", self.state.level_index + 1);
            }
            Err(e) => log::warn!("Failed to serialize save: {e}"),
        }
    }
}

/// Load a saved game for resume
fn load_saved_game(storage: &Storage) -> Option<GameState> {
    let json = storage.get_item(SAVE_KEY)?;
    match serde_json::from_str(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("Ignoring corrupt save: {e}");
            None
        }
    }
}

fn unix_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::init();
    log::info!("Brickbreak starting...");

    let storage = Storage::open_default();
    let settings = Settings::load(&storage);
    let mut high_scores = HighScores::load(&storage);

    let mut assets = AssetLibrary::load(
        "assets",
        &[
            "paddle", "ball", "brick_normal", "brick_strong", "brick_unbreakable", "item",
        ],
        |loaded, total| log::debug!("Loading assets {loaded}/{total}"),
    );
    assets.set_volume(settings.effective_sfx_volume());

    let seed = unix_timestamp_ms();
    let mut game = match load_saved_game(&storage) {
        Some(state) => {
            log::info!(
                "Resuming saved game at level {} with score {}",
                state.level_index + 1,
                state.score
            );
            let mut game = Game::new(seed);
            game.last_phase = state.phase;
            game.state = state;
            game
        }
        None => Game::new(seed),
    };
    if let Some(top) = high_scores.top_score() {
        game.state.high_score = game.state.high_score.max(top);
    }
    log::info!("Game initialized with seed: {seed}");

    // Demo session: the idle AI carries the run
    game.input.idle_mode = true;
    game.input.start = true;
    if game.state.phase == GamePhase::Paused {
        // A resumed save may be sitting paused
        game.input.pause = true;
    }

    // Ten minutes of simulated play, tops
    let tick_budget: u32 = 60 * 60 * 10;
    let started = Instant::now();
    let mut last_level = game.state.level_index;

    for _ in 0..tick_budget {
        game.update(FRAME_TIME_MS, &storage);

        if game.state.level_index != last_level {
            last_level = game.state.level_index;
            log::info!(
                "Reached level {} with score {}",
                last_level + 1,
                game.state.score
            );
        }

        match game.state.phase {
            GamePhase::GameOver | GamePhase::GameComplete => break,
            _ => {}
        }
    }

    let state = &game.state;
    log::info!(
        "Demo finished after {} ticks ({}ms wall): phase {:?}, level {} ({:.0}% cleared), score {}",
        state.time_ticks,
        started.elapsed().as_millis(),
        state.phase,
        state.level_index + 1,
        state.level.clear_fraction() * 100.0,
        state.score
    );
    if state.phase == GamePhase::GameOver {
        assets.play_audio(sounds::GAME_OVER, 1.0);
    }

    if high_scores.qualifies(state.score) {
        let rank = high_scores.add_score(state.score, state.level_index + 1, unix_timestamp_ms());
        if let Some(rank) = rank {
            log::info!("New high score! Rank {rank}");
        }
        high_scores.save(&storage);
    }

    println!(
        "Final: score {} at level {} ({:?})",
        state.score,
        state.level_index + 1,
        state.phase
    );
}
