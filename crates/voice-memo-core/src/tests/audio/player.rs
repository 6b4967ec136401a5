use crate::{
    Artifact, AudioError, AudioSession, Player, SessionHolder,
    tests::support::{FakePlayback, FakeSession, Rig, SharedRig},
};

use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

fn player_for(rig: Rig, secs: u64) -> (SharedRig, AudioSession, Player) {
    let rig = Rc::new(RefCell::new(rig));
    let session = AudioSession::new(Box::new(FakeSession(Rc::clone(&rig))));
    let artifact = Artifact {
        id: "10:00:00.m4a".to_string(),
        path: PathBuf::from("10:00:00.m4a"),
        duration: Duration::from_secs(secs),
    };
    rig.borrow_mut().open_players += 1;
    let device = Box::new(FakePlayback {
        rig: Rc::clone(&rig),
        duration: Duration::from_secs(secs),
    });
    let player = Player::new(device, session.clone(), artifact);
    (rig, session, player)
}

/// WHAT: Playing holds the session, so a recorder cannot take it
/// WHY: Exclusive use of the audio hardware
#[test]
#[allow(clippy::unwrap_used)]
fn given_player_playing_when_recorder_acquires_then_refused() {
    // Given
    let (_rig, session, mut player) = player_for(Rig::default(), 30);

    // When
    player.play().unwrap();

    // Then
    assert!(player.is_playing());
    assert_eq!(session.holder(), Some(SessionHolder::Player));
    assert!(session.acquire(SessionHolder::Recorder).is_err());

    // When: Stopping
    player.stop();

    // Then: Released
    assert_eq!(session.holder(), None);
}

/// WHAT: Remaining time is duration minus position, floored at zero
/// WHY: Drives the countdown during playback
#[test]
#[allow(clippy::unwrap_used)]
fn given_position_when_asking_remaining_then_duration_minus_position() {
    // Given
    let (rig, _session, mut player) = player_for(Rig::default(), 45);
    player.play().unwrap();

    // When/Then
    rig.borrow_mut().playback_position = Duration::from_secs(20);
    assert_eq!(player.remaining(), Duration::from_secs(25));
    assert_eq!(player.current_time(), Duration::from_secs(20));

    rig.borrow_mut().playback_position = Duration::from_secs(50);
    assert_eq!(player.remaining(), Duration::ZERO);
    assert_eq!(player.duration(), Duration::from_secs(45));
    assert_eq!(player.artifact().id, "10:00:00.m4a");
}

/// WHAT: Device refusal is a playback failure and releases the session
/// WHY: Failures degrade to an alert with nothing held
#[test]
fn given_device_refusing_when_playing_then_playback_failed_and_released() {
    // Given
    let (rig, session, mut player) = player_for(
        Rig {
            fail_play: true,
            ..Rig::default()
        },
        10,
    );

    // When
    let result = player.play();

    // Then
    assert!(matches!(result, Err(AudioError::PlaybackFailed { .. })));
    assert_eq!(session.holder(), None);
    assert_eq!(rig.borrow().activations, rig.borrow().deactivations);
}

/// WHAT: Stopping after playback ran out only releases the session
/// WHY: The device is already idle at the end of the artifact
#[test]
#[allow(clippy::unwrap_used)]
fn given_playback_ran_out_when_stopping_then_session_released() {
    // Given
    let (rig, session, mut player) = player_for(Rig::default(), 10);
    player.play().unwrap();
    rig.borrow_mut().playing = false;

    // When
    player.stop();

    // Then
    assert_eq!(session.holder(), None);
    assert!(!rig.borrow().session_active);
}
