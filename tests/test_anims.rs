use star_catcher::anims::*;
use star_catcher::scene::player_animations;

fn manager() -> AnimationManager {
    let mut anims = AnimationManager::default();
    for def in player_animations() {
        assert!(anims.create(def));
    }
    anims
}

fn frame_of(frame: Option<&FrameRef>) -> Option<u16> {
    frame.map(|f| f.frame)
}

#[test]
fn player_animation_table() {
    let anims = manager();
    let left = anims.get("left").expect("left");
    assert_eq!(left.frames, generate_frame_numbers("dude", 0, 3));
    assert_eq!((left.frame_rate, left.repeat), (10, -1));

    let turn = anims.get("turn").expect("turn");
    assert_eq!(turn.frames, vec![FrameRef { texture: "dude".to_string(), frame: 4 }]);
    assert_eq!((turn.frame_rate, turn.repeat), (20, 0));

    let right = anims.get("right").expect("right");
    assert_eq!(right.frames, generate_frame_numbers("dude", 5, 8));
    assert_eq!((right.frame_rate, right.repeat), (10, -1));
}

#[test]
fn duplicate_keys_are_rejected() {
    let mut anims = manager();
    let again = player_animations().remove(0);
    assert!(!anims.create(again));
    assert_eq!(anims.len(), 3);
}

#[test]
fn looping_animation_wraps() {
    let anims = manager();
    let mut state = AnimationState::default();
    assert_eq!(frame_of(state.play(&anims, "right", false)), Some(5));
    assert_eq!(frame_of(state.tick(&anims, 100_000)), Some(6));
    // 350 ms more: 7, 8, then back to 5 with 50 ms left over.
    assert_eq!(frame_of(state.tick(&anims, 350_000)), Some(5));
    assert_eq!(state.elapsed_us, 50_000);
    assert!(!state.finished);
}

#[test]
fn single_frame_animation_finishes() {
    let anims = manager();
    let mut state = AnimationState::default();
    assert_eq!(frame_of(state.play(&anims, "turn", false)), Some(4));
    assert!(state.is_playing("turn"));
    assert_eq!(frame_of(state.tick(&anims, 60_000)), Some(4));
    assert!(state.finished);
    assert!(!state.is_playing("turn"));
}

#[test]
fn ignore_if_playing_keeps_progress() {
    let anims = manager();
    let mut state = AnimationState::default();
    state.play(&anims, "left", true);
    state.tick(&anims, 150_000);
    assert_eq!(state.frame_index, 1);

    assert_eq!(frame_of(state.play(&anims, "left", true)), Some(1));
    assert_eq!(state.frame_index, 1);

    assert_eq!(frame_of(state.play(&anims, "left", false)), Some(0));
    assert_eq!(state.frame_index, 0);
}

#[test]
fn switching_animation_restarts() {
    let anims = manager();
    let mut state = AnimationState::default();
    state.play(&anims, "left", true);
    state.tick(&anims, 250_000);
    assert_eq!(frame_of(state.play(&anims, "right", true)), Some(5));
    assert_eq!(state.key.as_deref(), Some("right"));
}

#[test]
fn counted_repeats_then_stop() {
    let mut anims = AnimationManager::default();
    anims.create(AnimationDef {
        key: "blink".to_string(),
        frames: generate_frame_numbers("eye", 0, 1),
        frame_rate: 10,
        repeat: 1,
    });
    let mut state = AnimationState::default();
    state.play(&anims, "blink", false);
    state.tick(&anims, 300_000);
    assert!(!state.finished);
    assert_eq!(frame_of(state.tick(&anims, 100_000)), Some(1));
    assert!(state.finished);
}

#[test]
fn unknown_animation_is_ignored() {
    let anims = manager();
    let mut state = AnimationState::default();
    assert!(state.play(&anims, "moonwalk", false).is_none());
    assert!(state.key.is_none());
    assert!(state.tick(&anims, 100_000).is_none());
}
