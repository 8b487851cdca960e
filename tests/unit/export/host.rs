use super::*;

fn png() -> RenderedArtifact {
    RenderedArtifact {
        bytes: vec![0x89, b'P', b'N', b'G'],
        mime: "image/png",
        filename: "ada_launch_today.png".to_string(),
    }
}

fn pdf() -> RenderedArtifact {
    RenderedArtifact {
        bytes: b"%PDF-1.3".to_vec(),
        mime: "application/pdf",
        filename: "ada_launch_today.pdf".to_string(),
    }
}

#[test]
fn memory_host_keeps_accepted_artifacts() {
    let mut host = MemoryHost::new();
    for mode in [DeliveryMode::Download, DeliveryMode::Share, DeliveryMode::Clipboard] {
        let out = host.deliver(&png(), mode).unwrap();
        assert_eq!(out, DeliveryOutcome::Delivered { location: None });
    }
    assert_eq!(host.delivered().len(), 3);
}

#[test]
fn unsupported_modes_are_skipped_not_errors() {
    let mut host = MemoryHost::download_only();
    let share = host.deliver(&png(), DeliveryMode::Share).unwrap();
    let copy = host.deliver(&png(), DeliveryMode::Clipboard).unwrap();
    assert!(matches!(share, DeliveryOutcome::Skipped { .. }));
    assert!(matches!(copy, DeliveryOutcome::Skipped { .. }));
    assert!(host.delivered().is_empty());
}

#[test]
fn clipboard_refuses_documents() {
    let mut host = MemoryHost::new();
    let out = host.deliver(&pdf(), DeliveryMode::Clipboard).unwrap();
    assert!(matches!(out, DeliveryOutcome::Skipped { .. }));
}

#[test]
fn directory_host_writes_downloads() {
    let dir = std::env::temp_dir().join(format!("milestone-export-host-{}", std::process::id()));
    let mut host = DirectoryHost::new(&dir);
    let out = host.deliver(&png(), DeliveryMode::Download).unwrap();
    let path = dir.join("ada_launch_today.png");
    assert_eq!(out, DeliveryOutcome::Delivered { location: Some(path.clone()) });
    assert_eq!(std::fs::read(&path).unwrap(), png().bytes);
    assert!(matches!(
        host.deliver(&png(), DeliveryMode::Share).unwrap(),
        DeliveryOutcome::Skipped { .. }
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
