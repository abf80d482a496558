use std::time::Duration;

use super::thread::classify_end;
use super::types::AudioEvent;

#[test]
fn sink_running_dry_near_the_end_is_a_normal_end() {
    let event = classify_end(Duration::from_secs(179), Some(Duration::from_secs(180)));
    assert_eq!(event, AudioEvent::Ended);
}

#[test]
fn sink_running_dry_immediately_is_an_error() {
    let event = classify_end(Duration::from_millis(100), Some(Duration::from_secs(180)));
    assert!(matches!(event, AudioEvent::Error(_)));
}

#[test]
fn unknown_or_tiny_totals_always_end_normally() {
    assert_eq!(classify_end(Duration::ZERO, None), AudioEvent::Ended);
    assert_eq!(
        classify_end(Duration::from_millis(500), Some(Duration::from_millis(900))),
        AudioEvent::Ended
    );
}
