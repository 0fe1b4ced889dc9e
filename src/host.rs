//! The host element: start control, viewport fit and game mounting.
//!
//! At most one engine instance is alive. It is mounted when the start
//! control is activated, and disposed when the scene reports game over, when
//! the viewport changes size (a fresh instance replaces it if the game is
//! still started), and on shutdown.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::engine::{Game, HostSignal};
use crate::input::CursorKeys;
use crate::scene::GameScene;

/// Available drawing area in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Largest 9:16 area that fits the viewport, capped at 720×1280.
pub fn fit_game_area(viewport: Viewport) -> Viewport {
    let (w, h) = (viewport.width as f64, viewport.height as f64);
    let height = 1280f64.min(w * 16.0 / 9.0).min(h);
    let width = 720f64.min(h * 9.0 / 16.0).min(w);
    Viewport {
        width: width.floor() as u32,
        height: height.floor() as u32,
    }
}

pub struct Host {
    config: GameConfig,
    assets_dir: PathBuf,
    seed: Option<u64>,
    viewport: Viewport,
    started: bool,
    game: Option<Game<GameScene>>,
    mounts: u64,
    last_score: Option<u32>,
}

impl Host {
    pub fn new(config: GameConfig, assets_dir: PathBuf, seed: Option<u64>, viewport: Viewport) -> Self {
        Self {
            config,
            assets_dir,
            seed,
            viewport,
            started: false,
            game: None,
            mounts: 0,
            last_score: None,
        }
    }

    pub fn game_started(&self) -> bool {
        self.started
    }

    /// Shown while the game is not started, and as soon as the running
    /// scene has flagged game over.
    pub fn start_button_visible(&self) -> bool {
        !self.started || self.game.as_ref().is_some_and(|g| g.scene().is_game_over())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn game_area(&self) -> Viewport {
        fit_game_area(self.viewport)
    }

    pub fn game(&self) -> Option<&Game<GameScene>> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut Game<GameScene>> {
        self.game.as_mut()
    }

    /// Number of engine instances created so far.
    pub fn mounts(&self) -> u64 {
        self.mounts
    }

    /// Score of the most recently finished game.
    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    /// Activate the start control. Ignored while a game is running.
    pub fn click_start(&mut self) {
        if self.started {
            return;
        }
        log::info!("Start pressed");
        self.started = true;
        self.remount();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        log::info!(
            "Viewport {}x{} -> {}x{}",
            self.viewport.width,
            self.viewport.height,
            viewport.width,
            viewport.height
        );
        self.viewport = viewport;
        if self.started {
            self.remount();
        }
    }

    /// Run one frame of the mounted game, if any.
    pub fn frame(&mut self, input: &CursorKeys) -> HostSignal {
        let Some(game) = self.game.as_mut() else {
            return HostSignal::Continue;
        };
        let signal = game.step(input);
        if let HostSignal::GameOver { score } = signal {
            log::info!("Game over with score {score}");
            self.last_score = Some(score);
            self.started = false;
            self.unmount();
        }
        signal
    }

    pub fn shutdown(&mut self) {
        self.started = false;
        self.unmount();
    }

    fn unmount(&mut self) {
        if let Some(game) = self.game.take() {
            game.destroy();
        }
    }

    fn remount(&mut self) {
        self.unmount();
        self.mounts += 1;
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.mounts)),
            None => StdRng::from_entropy(),
        };
        self.game = Some(Game::boot(&self.config, GameScene::new(), &self.assets_dir, rng));
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.unmount();
    }
}
