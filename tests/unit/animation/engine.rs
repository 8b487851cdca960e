use super::*;
use crate::animation::clock::SteppedClock;
use crate::animation::frame::StatItem;
use crate::encode::sink::InMemoryEncoder;

fn engine() -> FrameEngine<InMemoryEncoder> {
    let settings = EngineSettings {
        fps: 10,
        ..EngineSettings::default()
    };
    FrameEngine::new(&settings, FontBook::empty(), InMemoryEncoder::new()).unwrap()
}

fn request(duration_secs: u32) -> AnimationRequest {
    AnimationRequest {
        style: VideoStyle::Cinematic,
        canvas: Canvas {
            width: 64,
            height: 48,
        },
        duration_secs,
        content: VideoContent {
            title: "TOTAL EXISTENCE".to_string(),
            subtitle: "ADA".to_string(),
            items: ["YEARS", "MONTHS"]
                .iter()
                .map(|l| StatItem {
                    label: l.to_string(),
                    value: 12,
                })
                .collect(),
            finale: StatItem {
                label: "SECONDS ALIVE".to_string(),
                value: 1_000,
            },
        },
    }
}

fn indices(e: &FrameEngine<InMemoryEncoder>) -> Vec<u64> {
    e.encoder().frames().iter().map(|(i, _)| i.0).collect()
}

#[test]
fn stepped_run_pushes_every_frame_in_order() {
    let mut e = engine();
    e.start(request(1)).unwrap();
    assert_eq!(e.state(), EngineState::Running);
    let stream = e.run_to_end(&mut SteppedClock::new(e.fps())).unwrap();
    assert_eq!(stream.frames, 10);
    assert_eq!(indices(&e), (0..10).collect::<Vec<_>>());
    assert_eq!(e.state(), EngineState::Idle);
    assert!(e.context().is_none());
}

#[test]
fn late_ticks_catch_up_and_early_ticks_yield() {
    let mut e = engine();
    e.start(request(1)).unwrap();
    match e.tick(Duration::from_millis(550)).unwrap() {
        TickOutcome::Pending { drawn, total } => assert_eq!((drawn, total), (6, 10)),
        TickOutcome::Finished(_) => panic!("finished early"),
    }
    match e.tick(Duration::from_millis(300)).unwrap() {
        TickOutcome::Pending { drawn, .. } => assert_eq!(drawn, 6),
        TickOutcome::Finished(_) => panic!("finished early"),
    }
    assert_eq!(e.next_frame_due(), Some(Duration::from_millis(600)));
    let TickOutcome::Finished(stream) = e.tick(Duration::from_secs(2)).unwrap() else {
        panic!("expected the run to finish");
    };
    assert_eq!(stream.frames, 10);
    assert_eq!(indices(&e), (0..10).collect::<Vec<_>>());
}

#[test]
fn cancel_discards_partial_output() {
    let mut e = engine();
    e.start(request(1)).unwrap();
    e.tick(Duration::from_millis(250)).unwrap();
    e.cancel();
    assert_eq!(e.state(), EngineState::Idle);
    assert!(e.encoder().was_aborted());
    assert!(e.encoder().frames().is_empty());
    assert!(e.tick(Duration::from_secs(5)).is_err());
}

#[test]
fn second_start_is_busy() {
    let mut e = engine();
    e.start(request(1)).unwrap();
    let err = e.start(request(1)).unwrap_err();
    assert!(matches!(err, ExportError::Busy(_)));
    e.cancel();
    e.start(request(1)).unwrap();
}

#[test]
fn zero_duration_never_starts() {
    let mut e = engine();
    assert!(e.start(request(0)).is_err());
    assert_eq!(e.state(), EngineState::Idle);
}

#[test]
fn stills_leave_the_engine_idle() {
    let e = engine();
    let frame = e.render_still(&request(1), 1_000).unwrap();
    assert_eq!((frame.width, frame.height), (64, 48));
    assert_eq!(e.state(), EngineState::Idle);
    assert!(e.encoder().frames().is_empty());
}
