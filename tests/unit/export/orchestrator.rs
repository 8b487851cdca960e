use super::*;
use crate::animation::clock::SteppedClock;
use crate::encode::sink::InMemoryEncoder;
use crate::export::host::MemoryHost;
use crate::model::config::{AspectRatio, QualityTier, VideoStyle};
use crate::model::payload::MilestonePayload;
use chrono::NaiveDate;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn profile() -> Profile {
    Profile {
        name: "Ada Lovelace".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        birth_time: "08:30".to_string(),
        ..Profile::default()
    }
}

fn milestone() -> Payload {
    Payload::Milestone(MilestonePayload {
        id: "m1".to_string(),
        title: "Launch Day".to_string(),
        description: String::new(),
        date: at(2024, 3, 13),
        category: "Custom".to_string(),
        is_past: false,
        color: "#6366f1".to_string(),
        value: None,
        unit: None,
        event_name: None,
    })
}

fn still_config(format: StaticFormat) -> ExportConfig {
    ExportConfig {
        aspect_ratio: AspectRatio::Square,
        quality: QualityTier::Standard,
        output: OutputKind::Static { format },
        ..ExportConfig::default()
    }
}

fn video_config() -> ExportConfig {
    ExportConfig {
        aspect_ratio: AspectRatio::Square,
        output: OutputKind::Animated {
            duration_secs: 1,
            style: VideoStyle::Minimal,
        },
        ..ExportConfig::default()
    }
}

fn exporter_for(config: ExportConfig, profile: Profile) -> Exporter<MemoryHost> {
    let settings = EngineSettings {
        fps: 4,
        ..EngineSettings::default()
    };
    Exporter::new(
        config,
        profile,
        settings,
        FontBook::empty(),
        MemoryHost::new(),
        Box::new(InMemoryEncoder::new()),
    )
    .unwrap()
}

fn exporter(config: ExportConfig) -> Exporter<MemoryHost> {
    exporter_for(config, profile())
}

#[test]
fn static_export_is_named_and_delivered() {
    let mut ex = exporter(still_config(StaticFormat::Png));
    let out = ex
        .export_static(&milestone(), DeliveryMode::Download, at(2024, 3, 1))
        .unwrap();
    assert_eq!(out.artifact.filename, "adalovelace_launchday_12days_left.png");
    assert_eq!(out.artifact.mime, "image/png");
    assert!(out.artifact.bytes.starts_with(b"\x89PNG"));
    assert_eq!(ex.state(), ExportState::Idle);
    assert_eq!(ex.host().delivered().len(), 1);
}

#[test]
fn static_export_rejects_animated_config() {
    let mut ex = exporter(video_config());
    let err = ex
        .export_static(&milestone(), DeliveryMode::Download, at(2024, 3, 1))
        .unwrap_err();
    assert!(matches!(err, ExportError::Validation(_)));
    assert_eq!(ex.state(), ExportState::Idle);
}

#[test]
fn failed_capture_returns_to_idle_and_delivers_nothing() {
    let broken = Profile {
        avatar: Some(vec![1, 2, 3]),
        ..profile()
    };
    let mut ex = exporter_for(still_config(StaticFormat::Svg), broken);
    let err = ex
        .export_static(&milestone(), DeliveryMode::Download, at(2024, 3, 1))
        .unwrap_err();
    assert!(matches!(err, ExportError::Capture(_)));
    assert_eq!(ex.state(), ExportState::Idle);
    assert!(ex.host().delivered().is_empty());
}

#[test]
fn video_export_runs_to_completion() {
    let mut ex = exporter(video_config());
    let fps = ex.engine().fps();
    let out = ex
        .export_animated(
            &milestone(),
            DeliveryMode::Share,
            at(2024, 3, 20),
            &mut SteppedClock::new(fps),
        )
        .unwrap();
    assert_eq!(out.artifact.filename, "adalovelace_launchday_7days_ago.json");
    let manifest: serde_json::Value = serde_json::from_slice(&out.artifact.bytes).unwrap();
    assert_eq!(manifest["frames"], serde_json::json!([0, 1, 2, 3]));
    assert_eq!(manifest["width"], 1080);
    assert_eq!(ex.state(), ExportState::Idle);
    assert_eq!(ex.host().delivered()[0].0, DeliveryMode::Share);
}

#[test]
fn restarting_a_video_cancels_the_previous_run() {
    let mut ex = exporter(video_config());
    let now = at(2024, 3, 1);
    ex.start_animated(&milestone(), DeliveryMode::Download, now)
        .unwrap();
    ex.tick(Duration::from_millis(600)).unwrap();
    ex.start_animated(&milestone(), DeliveryMode::Download, now)
        .unwrap();
    assert_eq!(ex.state(), ExportState::RenderingVideo);
    match ex.tick(Duration::ZERO).unwrap() {
        VideoProgress::Rendering { drawn, total } => assert_eq!((drawn, total), (1, 4)),
        VideoProgress::Done(_) => panic!("new run finished immediately"),
    }
}

#[test]
fn static_export_preempts_a_running_video() {
    let mut ex = exporter(video_config());
    let now = at(2024, 3, 1);
    ex.start_animated(&milestone(), DeliveryMode::Download, now)
        .unwrap();
    ex.set_config(still_config(StaticFormat::Svg)).unwrap();
    let out = ex
        .export_static(&milestone(), DeliveryMode::Download, now)
        .unwrap();
    assert!(out.artifact.filename.ends_with(".svg"));
    assert_eq!(ex.state(), ExportState::Idle);
    assert_eq!(ex.engine().state(), EngineState::Idle);
    assert!(ex.tick(Duration::from_secs(1)).is_err());
    assert_eq!(ex.host().delivered().len(), 1);
}

#[test]
fn cancel_discards_the_video() {
    let mut ex = exporter(video_config());
    ex.start_animated(&milestone(), DeliveryMode::Download, at(2024, 3, 1))
        .unwrap();
    ex.tick(Duration::from_millis(300)).unwrap();
    ex.cancel();
    assert_eq!(ex.state(), ExportState::Idle);
    assert!(ex.tick(Duration::from_secs(5)).is_err());
    assert!(ex.host().delivered().is_empty());
}

#[test]
fn preview_state_survives_a_capture() {
    let mut ex = exporter(still_config(StaticFormat::Svg));
    let now = at(2024, 3, 1);
    let viewport = Viewport {
        width: 560.0,
        height: 560.0,
    };
    let pixels = ex.open_preview(&milestone(), viewport, now).unwrap();
    let scale = ex.preview_scale().unwrap();
    assert!((scale - 0.5).abs() < 1e-9);
    assert_eq!(pixels.width, 540);
    assert_eq!(ex.state(), ExportState::Previewing);

    ex.export_static(&milestone(), DeliveryMode::Download, now)
        .unwrap();
    assert_eq!(ex.state(), ExportState::Previewing);

    ex.close_preview();
    assert_eq!(ex.state(), ExportState::Idle);
    assert!(ex.resize_preview(viewport).is_err());
}

#[test]
fn static_export_reuses_a_matching_preview() {
    let mut ex = exporter(still_config(StaticFormat::Png));
    let now = at(2024, 3, 1);
    let viewport = Viewport {
        width: 560.0,
        height: 560.0,
    };
    ex.open_preview(&milestone(), viewport, now).unwrap();
    let shown = ex.scene_for(&milestone(), now);
    assert!(ex.preview_showing(&shown).is_some());
    assert!(ex.preview_showing(&ex.scene_for(&milestone(), at(2024, 3, 2))).is_none());

    let from_preview = ex
        .export_static(&milestone(), DeliveryMode::Download, now)
        .unwrap();
    ex.close_preview();
    let fresh = ex
        .export_static(&milestone(), DeliveryMode::Download, now)
        .unwrap();
    assert_eq!(from_preview.artifact, fresh.artifact);

    ex.open_preview(&milestone(), viewport, now).unwrap();
    ex.set_config(ExportConfig {
        theme: crate::theme::tokens::ThemeId::Cyberpunk,
        ..still_config(StaticFormat::Png)
    })
    .unwrap();
    assert!(ex.preview_showing(&ex.scene_for(&milestone(), now)).is_none());
}
