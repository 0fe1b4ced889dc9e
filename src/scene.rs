//! The star-catching scene.

use rand::rngs::StdRng;
use rand::Rng;

use crate::anims::{generate_frame_numbers, AnimationDef, FrameRef};
use crate::arcade::{GroupKind, PhysicsEvent};
use crate::assets::Loader;
use crate::compute::{collect_star, hit_bomb, score_label, steer_player};
use crate::engine::{GridStep, HostSignal, Scene, Systems};
use crate::entities::{
    AnimKey, GameStatus, SceneState, DUDE_FRAME_HEIGHT, DUDE_FRAME_WIDTH, PLATFORMS, PLAYER_BOUNCE,
    PLAYER_START, SCORE_COLOR, SCORE_FONT_PX, SCORE_TEXT_POS, STAR_BOUNCE_MAX, STAR_BOUNCE_MIN, STAR_COUNT,
    STAR_START_X, STAR_STEP_X, TEX_BOMB, TEX_DUDE, TEX_GROUND, TEX_SKY, TEX_STAR,
};
use crate::input::CursorKeys;

#[derive(Debug, Default)]
pub struct GameScene {
    state: Option<SceneState>,
}

impl GameScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the scene has been created.
    pub fn state(&self) -> Option<&SceneState> {
        self.state.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.score)
    }

    pub fn is_game_over(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.status == GameStatus::GameOver)
    }
}

/// Walk left, face the camera, walk right.
pub fn player_animations() -> Vec<AnimationDef> {
    vec![
        AnimationDef {
            key: AnimKey::Left.as_str().to_string(),
            frames: generate_frame_numbers(TEX_DUDE, 0, 3),
            frame_rate: 10,
            repeat: -1,
        },
        AnimationDef {
            key: AnimKey::Turn.as_str().to_string(),
            frames: vec![FrameRef { texture: TEX_DUDE.to_string(), frame: 4 }],
            frame_rate: 20,
            repeat: 0,
        },
        AnimationDef {
            key: AnimKey::Right.as_str().to_string(),
            frames: generate_frame_numbers(TEX_DUDE, 5, 8),
            frame_rate: 10,
            repeat: -1,
        },
    ]
}

impl Scene for GameScene {
    fn key(&self) -> &'static str {
        "GameScene"
    }

    fn preload(&mut self, load: &mut Loader) {
        log::info!("Preloading assets");
        load.image(TEX_SKY, "sky-01.jpg");
        load.image(TEX_GROUND, "platform.png");
        load.image(TEX_STAR, "star.png");
        load.image(TEX_BOMB, "bomb.png");
        load.spritesheet(TEX_DUDE, "dude.png", DUDE_FRAME_WIDTH, DUDE_FRAME_HEIGHT);
    }

    fn create(&mut self, sys: &mut Systems, rng: &mut StdRng) {
        let (half_w, half_h) = (sys.physics.bounds.width / 2.0, sys.physics.bounds.height / 2.0);
        sys.add_image(half_w, half_h, TEX_SKY);

        let platforms = sys.physics.add_group(GroupKind::Static);
        for placement in &PLATFORMS {
            let id = sys.create_in_group(platforms, placement.x, placement.y, TEX_GROUND);
            if placement.scale != 1.0 {
                sys.physics.set_scale(id, placement.scale);
                sys.physics.refresh_body(id);
            }
        }

        let player = sys.add_sprite(PLAYER_START.0, PLAYER_START.1, TEX_DUDE);
        {
            let body = &mut sys.physics.sprite_mut(player).body;
            body.bounce.x = PLAYER_BOUNCE;
            body.bounce.y = PLAYER_BOUNCE;
            body.collide_world_bounds = true;
        }

        for def in player_animations() {
            sys.anims.create(def);
        }

        let stars = sys.physics.add_group(GroupKind::Dynamic);
        let grid = GridStep {
            x: STAR_START_X,
            y: 0.0,
            step_x: STAR_STEP_X,
            step_y: 0.0,
        };
        for star in sys.create_multiple(stars, TEX_STAR, STAR_COUNT - 1, grid) {
            sys.physics.sprite_mut(star).body.bounce.y = rng.gen_range(STAR_BOUNCE_MIN..STAR_BOUNCE_MAX);
        }

        let bombs = sys.physics.add_group(GroupKind::Dynamic);

        let score_text = sys.add_text(
            SCORE_TEXT_POS.0,
            SCORE_TEXT_POS.1,
            &score_label(0),
            SCORE_FONT_PX,
            SCORE_COLOR,
        );

        sys.physics.add_collider(player, platforms, false);
        sys.physics.add_collider(stars, platforms, false);
        sys.physics.add_collider(bombs, platforms, false);
        let star_pickup = sys.physics.add_overlap(player, stars);
        let bomb_hit = sys.physics.add_collider(player, bombs, true);

        self.state = Some(SceneState {
            player,
            platforms,
            stars,
            bombs,
            score_text,
            star_pickup,
            bomb_hit,
            score: 0,
            status: GameStatus::Playing,
        });
    }

    fn on_physics_event(&mut self, sys: &mut Systems, event: PhysicsEvent, rng: &mut StdRng) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if event.rule == state.star_pickup {
            collect_star(state, sys, event.b, rng);
        } else if event.rule == state.bomb_hit {
            hit_bomb(state, sys);
        }
    }

    fn update(&mut self, sys: &mut Systems, input: &CursorKeys) -> HostSignal {
        let Some(state) = self.state.as_ref() else {
            return HostSignal::Continue;
        };
        if state.status == GameStatus::GameOver {
            return HostSignal::GameOver { score: state.score };
        }
        steer_player(state, sys, input);
        HostSignal::Continue
    }
}
