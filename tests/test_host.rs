use tempfile::TempDir;

use star_catcher::config::GameConfig;
use star_catcher::engine::HostSignal;
use star_catcher::entities::TEX_BOMB;
use star_catcher::host::{fit_game_area, Host, Viewport};
use star_catcher::input::CursorKeys;

const TALL: Viewport = Viewport { width: 800, height: 1600 };

fn make_host() -> (Host, TempDir) {
    let assets = tempfile::tempdir().expect("tempdir");
    let host = Host::new(GameConfig::default(), assets.path().to_path_buf(), Some(3), TALL);
    (host, assets)
}

/// Drop a bomb onto the player of the running game.
fn plant_bomb(host: &mut Host) {
    let game = host.game_mut().expect("game running");
    let state = game.scene().state().cloned().expect("scene created");
    let player = game.systems().physics.sprite(state.player);
    let (x, y) = (player.x(), player.y());
    game.systems_mut().create_in_group(state.bombs, x, y, TEX_BOMB);
}

// ── fit_game_area ─────────────────────────────────────────────────────────────

#[test]
fn fit_caps_at_native_size() {
    let area = fit_game_area(Viewport { width: 3000, height: 3000 });
    assert_eq!(area, Viewport { width: 720, height: 1280 });
}

#[test]
fn fit_in_a_wide_viewport_is_height_bound() {
    let area = fit_game_area(Viewport { width: 1920, height: 1080 });
    assert_eq!(area, Viewport { width: 607, height: 1080 });
}

#[test]
fn fit_in_a_narrow_viewport_is_width_bound() {
    let area = fit_game_area(Viewport { width: 400, height: 2000 });
    assert_eq!(area, Viewport { width: 400, height: 711 });
}

// ── Start control ─────────────────────────────────────────────────────────────

#[test]
fn start_control_shown_before_start() {
    let (host, _assets) = make_host();
    assert!(!host.game_started());
    assert!(host.start_button_visible());
    assert!(host.game().is_none());
}

#[test]
fn start_mounts_one_game_and_hides_the_control() {
    let (mut host, _assets) = make_host();
    host.click_start();
    assert!(host.game_started());
    assert!(!host.start_button_visible());
    assert!(host.game().is_some());
    assert_eq!(host.mounts(), 1);

    // A second press while running does nothing.
    host.click_start();
    assert_eq!(host.mounts(), 1);
}

#[test]
fn frames_without_a_game_are_noops() {
    let (mut host, _assets) = make_host();
    assert_eq!(host.frame(&CursorKeys::default()), HostSignal::Continue);
    assert!(host.game().is_none());
}

#[test]
fn game_over_returns_to_the_start_control() {
    let (mut host, _assets) = make_host();
    host.click_start();
    for _ in 0..3 {
        assert_eq!(host.frame(&CursorKeys::default()), HostSignal::Continue);
        assert!(!host.start_button_visible());
    }

    plant_bomb(&mut host);
    let signal = host.frame(&CursorKeys::default());

    assert_eq!(signal, HostSignal::GameOver { score: 0 });
    assert!(!host.game_started());
    assert!(host.game().is_none());
    assert!(host.start_button_visible());
    assert_eq!(host.last_score(), Some(0));

    // And it can be started again.
    host.click_start();
    assert!(!host.start_button_visible());
    assert_eq!(host.mounts(), 2);
}

#[test]
fn start_control_shows_as_soon_as_the_scene_ends() {
    let (mut host, _assets) = make_host();
    host.click_start();
    plant_bomb(&mut host);

    let game = host.game_mut().expect("game running");
    assert_eq!(game.step(&CursorKeys::default()), HostSignal::GameOver { score: 0 });

    // The game is still mounted, but its scene is over.
    assert!(host.game_started());
    assert!(host.game().is_some_and(|g| g.scene().is_game_over()));
    assert!(host.start_button_visible());
}

// ── Resize ────────────────────────────────────────────────────────────────────

#[test]
fn resize_remounts_a_running_game() {
    let (mut host, _assets) = make_host();
    host.click_start();
    for _ in 0..10 {
        host.frame(&CursorKeys::default());
    }
    assert_eq!(host.game().map(|g| g.frame()), Some(10));

    host.resize(Viewport { width: 1024, height: 768 });

    assert_eq!(host.mounts(), 2);
    assert_eq!(host.game().map(|g| g.frame()), Some(0));
    assert!(host.game_started());
    assert_eq!(host.game_area(), fit_game_area(Viewport { width: 1024, height: 768 }));
}

#[test]
fn same_size_resize_keeps_the_game() {
    let (mut host, _assets) = make_host();
    host.click_start();
    host.frame(&CursorKeys::default());
    host.resize(TALL);
    assert_eq!(host.mounts(), 1);
    assert_eq!(host.game().map(|g| g.frame()), Some(1));
}

#[test]
fn resize_while_stopped_mounts_nothing() {
    let (mut host, _assets) = make_host();
    host.resize(Viewport { width: 640, height: 480 });
    assert_eq!(host.mounts(), 0);
    assert!(host.game().is_none());
    assert!(host.start_button_visible());
}

#[test]
fn shutdown_disposes_the_game() {
    let (mut host, _assets) = make_host();
    host.click_start();
    host.shutdown();
    assert!(host.game().is_none());
    assert!(!host.game_started());
    assert!(host.start_button_visible());
}
