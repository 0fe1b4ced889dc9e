//! The engine instance and the scene lifecycle.
//!
//! A [`Game`] boots a [`Scene`] (preload, asset load, create) and then runs
//! one frame per [`Game::step`]: physics step, physics callbacks, the scene's
//! update, animation tick. The scene owns its gameplay state; the engine
//! hands it the shared [`Systems`] on every call.

use std::path::Path;

use rand::rngs::StdRng;

use crate::anims::AnimationManager;
use crate::arcade::{GroupId, PhysicsEvent, SpriteId, Vec2, World};
use crate::assets::{Loader, TextureManager};
use crate::config::GameConfig;
use crate::input::CursorKeys;

/// What the scene asks of the host after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostSignal {
    Continue,
    /// Go back to the "not started" state.
    GameOver { score: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextId(pub usize);

/// A static, non-physics image.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub x: f32,
    pub y: f32,
    pub texture: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// Top-left corner.
    pub x: f32,
    pub y: f32,
    pub content: String,
    pub font_px: u32,
    pub color: u32,
}

/// Placement of a batch of group members: the first at `(x, y)`, each next
/// one offset by `(step_x, step_y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridStep {
    pub x: f32,
    pub y: f32,
    pub step_x: f32,
    pub step_y: f32,
}

/// The subsystems a scene works with.
#[derive(Debug)]
pub struct Systems {
    pub physics: World,
    pub anims: AnimationManager,
    pub textures: TextureManager,
    pub images: Vec<Image>,
    pub texts: Vec<Text>,
}

impl Systems {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            physics: World::new(config.width as f32, config.height as f32, config.gravity_y),
            anims: AnimationManager::default(),
            textures: TextureManager::default(),
            images: Vec::new(),
            texts: Vec::new(),
        }
    }

    fn frame_size(&self, texture: &str) -> Vec2 {
        let (w, h) = self.textures.frame_size(texture);
        Vec2::new(w, h)
    }

    pub fn add_image(&mut self, x: f32, y: f32, texture: &str) {
        self.images.push(Image { x, y, texture: texture.to_string() });
    }

    pub fn add_text(&mut self, x: f32, y: f32, content: &str, font_px: u32, color: u32) -> TextId {
        self.texts.push(Text {
            x,
            y,
            content: content.to_string(),
            font_px,
            color,
        });
        TextId(self.texts.len() - 1)
    }

    pub fn set_text(&mut self, id: TextId, content: String) {
        self.texts[id.0].content = content;
    }

    pub fn text(&self, id: TextId) -> &Text {
        &self.texts[id.0]
    }

    /// A dynamic physics sprite sized to one frame of `texture`.
    pub fn add_sprite(&mut self, x: f32, y: f32, texture: &str) -> SpriteId {
        let size = self.frame_size(texture);
        self.physics.add_sprite(x, y, texture, size)
    }

    pub fn create_in_group(&mut self, group: GroupId, x: f32, y: f32, texture: &str) -> SpriteId {
        let size = self.frame_size(texture);
        self.physics.create_in_group(group, x, y, texture, size)
    }

    /// `1 + repeat` members of `texture` laid out along `grid`.
    pub fn create_multiple(&mut self, group: GroupId, texture: &str, repeat: usize, grid: GridStep) -> Vec<SpriteId> {
        (0..=repeat)
            .map(|i| {
                let x = grid.x + grid.step_x * i as f32;
                let y = grid.y + grid.step_y * i as f32;
                self.create_in_group(group, x, y, texture)
            })
            .collect()
    }

    /// Play animation `key` on `sprite` and show its current frame.
    pub fn play(&mut self, sprite: SpriteId, key: &str, ignore_if_playing: bool) {
        let target = self.physics.sprite_mut(sprite);
        if let Some(frame) = target.anim.play(&self.anims, key, ignore_if_playing) {
            target.texture.clone_from(&frame.texture);
            target.frame = frame.frame;
        }
    }

    fn tick_animations(&mut self, dt_us: u64) {
        let anims = &self.anims;
        for sprite in self.physics.sprites_mut() {
            if sprite.anim.key.is_none() {
                continue;
            }
            if let Some(frame) = sprite.anim.tick(anims, dt_us) {
                sprite.texture.clone_from(&frame.texture);
                sprite.frame = frame.frame;
            }
        }
    }
}

/// Lifecycle hooks the engine drives. Randomness is injected so a seeded
/// RNG reproduces a session.
pub trait Scene {
    fn key(&self) -> &'static str;

    /// Queue the assets the scene needs.
    fn preload(&mut self, load: &mut Loader);

    /// Build the scene once assets are registered.
    fn create(&mut self, sys: &mut Systems, rng: &mut StdRng);

    /// Called for every notifying physics contact, before `update`.
    fn on_physics_event(&mut self, sys: &mut Systems, event: PhysicsEvent, rng: &mut StdRng);

    /// Per-frame logic.
    fn update(&mut self, sys: &mut Systems, input: &CursorKeys) -> HostSignal;
}

/// One running engine instance. Dropping or [`Game::destroy`]ing it ends the
/// run loop; there is no way to step a destroyed instance.
#[derive(Debug)]
pub struct Game<S: Scene> {
    config: GameConfig,
    scene: S,
    sys: Systems,
    rng: StdRng,
    frame: u64,
}

impl<S: Scene> Game<S> {
    pub fn boot(config: &GameConfig, mut scene: S, assets_dir: &Path, mut rng: StdRng) -> Self {
        log::info!(
            "Booting scene '{}' ({}x{}, gravity {})",
            scene.key(),
            config.width,
            config.height,
            config.gravity_y
        );
        let mut sys = Systems::new(config);

        let mut loader = Loader::default();
        scene.preload(&mut loader);
        sys.textures.load(&loader, assets_dir);

        scene.create(&mut sys, &mut rng);
        log::info!("Scene '{}' created", scene.key());

        Self {
            config: config.clone(),
            scene,
            sys,
            rng,
            frame: 0,
        }
    }

    /// Run one frame at the configured rate.
    pub fn step(&mut self, input: &CursorKeys) -> HostSignal {
        let dt = self.config.frame_dt();
        self.step_with_dt(input, dt)
    }

    pub fn step_with_dt(&mut self, input: &CursorKeys, dt: f32) -> HostSignal {
        self.frame += 1;
        for event in self.sys.physics.step(dt) {
            self.scene.on_physics_event(&mut self.sys, event, &mut self.rng);
        }
        let signal = self.scene.update(&mut self.sys, input);
        self.sys.tick_animations((dt * 1_000_000.0) as u64);
        signal
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn systems(&self) -> &Systems {
        &self.sys
    }

    pub fn systems_mut(&mut self) -> &mut Systems {
        &mut self.sys
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Dispose of the instance.
    pub fn destroy(self) {
        log::info!("Destroying scene '{}' after {} frames", self.scene.key(), self.frame);
    }
}
