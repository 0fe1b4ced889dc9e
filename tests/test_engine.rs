use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use star_catcher::config::GameConfig;
use star_catcher::engine::{Game, HostSignal};
use star_catcher::entities::*;
use star_catcher::input::CursorKeys;
use star_catcher::scene::GameScene;

fn boot() -> (Game<GameScene>, TempDir) {
    let assets = tempfile::tempdir().expect("tempdir");
    let game = Game::boot(
        &GameConfig::default(),
        GameScene::new(),
        assets.path(),
        StdRng::seed_from_u64(7),
    );
    (game, assets)
}

fn state(game: &Game<GameScene>) -> SceneState {
    game.scene().state().cloned().expect("scene created")
}

#[test]
fn boot_builds_the_level() {
    let (game, _assets) = boot();
    let s = state(&game);
    let sys = game.systems();

    assert_eq!(sys.physics.members(s.platforms).len(), PLATFORMS.len());
    let ground = sys.physics.sprite(sys.physics.members(s.platforms)[0]);
    assert_eq!(ground.body.size.x, 800.0);
    assert_eq!(ground.body.size.y, 64.0);
    assert!(ground.body.immovable);

    let player = sys.physics.sprite(s.player);
    assert_eq!((player.x(), player.y()), PLAYER_START);
    assert_eq!(player.body.size.x, DUDE_FRAME_WIDTH as f32);
    assert_eq!(player.body.size.y, DUDE_FRAME_HEIGHT as f32);
    assert!(player.body.collide_world_bounds);

    assert_eq!(sys.physics.members(s.stars).len(), STAR_COUNT);
    for &id in sys.physics.members(s.stars) {
        let bounce = sys.physics.sprite(id).body.bounce.y;
        assert!((STAR_BOUNCE_MIN..STAR_BOUNCE_MAX).contains(&bounce));
    }
    assert!(sys.physics.members(s.bombs).is_empty());
    assert_eq!(sys.anims.len(), 3);
    assert_eq!(sys.text(s.score_text).content, "Score: 0");
    assert_eq!(sys.images.len(), 1);
    assert!(sys.textures.get(TEX_DUDE).is_some_and(|t| t.missing));
}

#[test]
fn overlapping_a_star_scores_through_the_run_loop() {
    let (mut game, _assets) = boot();
    let s = state(&game);
    let star = game.systems().physics.members(s.stars)[2];
    let (px, py) = {
        let p = game.systems().physics.sprite(s.player);
        (p.x(), p.y())
    };
    game.systems_mut().physics.sprite_mut(star).body.position.x = px;
    game.systems_mut().physics.sprite_mut(star).body.position.y = py;

    let signal = game.step(&CursorKeys::default());

    assert_eq!(signal, HostSignal::Continue);
    assert_eq!(game.scene().score(), SCORE_PER_STAR);
    assert!(!game.systems().physics.sprite(star).is_active());
}

#[test]
fn touching_a_bomb_ends_the_game_in_the_same_frame() {
    let (mut game, _assets) = boot();
    let s = state(&game);
    let (px, py) = {
        let p = game.systems().physics.sprite(s.player);
        (p.x(), p.y())
    };
    game.systems_mut().create_in_group(s.bombs, px, py, TEX_BOMB);

    let signal = game.step(&CursorKeys::default());

    assert_eq!(signal, HostSignal::GameOver { score: 0 });
    assert!(game.scene().is_game_over());
    assert!(game.systems().physics.is_paused());
    assert_eq!(game.systems().physics.sprite(s.player).tint, Some(HIT_TINT));
}

#[test]
fn player_lands_on_the_ground_and_can_jump() {
    let (mut game, _assets) = boot();
    let s = state(&game);
    let up = CursorKeys { up: true, ..Default::default() };

    // Airborne at spawn: no jump.
    game.step(&up);
    assert!(game.systems().physics.sprite(s.player).body.velocity.y > 0.0);

    for _ in 0..120 {
        game.step(&CursorKeys::default());
    }
    let player = game.systems().physics.sprite(s.player);
    assert!(player.body.touching.down);
    let ground_top = 1248.0 - 32.0;
    assert!((player.body.bottom() - ground_top).abs() < 0.5, "bottom = {}", player.body.bottom());

    game.step(&up);
    assert_eq!(game.systems().physics.sprite(s.player).body.velocity.y, -PLAYER_JUMP_SPEED);
    let before = game.systems().physics.sprite(s.player).y();
    game.step(&CursorKeys::default());
    assert!(game.systems().physics.sprite(s.player).y() < before);
}

#[test]
fn walking_animation_advances_with_frames() {
    let (mut game, _assets) = boot();
    let s = state(&game);
    let right = CursorKeys { right: true, ..Default::default() };

    let mut seen = Vec::new();
    for _ in 0..12 {
        game.step(&right);
        seen.push(game.systems().physics.sprite(s.player).frame);
    }
    assert!(seen.iter().all(|f| (5..=8).contains(f)), "frames: {seen:?}");
    assert!(seen.iter().any(|&f| f != seen[0]), "animation never advanced");
}

#[test]
fn frame_counter_and_destroy() {
    let (mut game, _assets) = boot();
    for _ in 0..5 {
        game.step(&CursorKeys::default());
    }
    assert_eq!(game.frame(), 5);
    game.destroy();
}
