use super::*;

fn fps(n: u32) -> Fps {
    Fps::new(n, 1).unwrap()
}

#[test]
fn ten_seconds_at_sixty() {
    let t = Timeline::new(10, fps(60), 6).unwrap();
    assert_eq!(t.total_frames, 600);
    assert_eq!(t.title, Stage { start: 0, len: 90 });
    let starts: Vec<u64> = t.stats.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![90, 150, 210, 270, 330, 390]);
    assert!(t.stats.iter().all(|s| s.len == 40));
    assert_eq!(t.finale, Stage { start: 450, len: 60 });
}

#[test]
fn finale_starts_at_three_quarters() {
    for secs in [5, 10, 15] {
        for rate in [24, 30, 60] {
            let t = Timeline::new(secs, fps(rate), 6).unwrap();
            let total = t.total_frames as f64;
            assert_eq!(t.finale.start, (0.75 * total).ceil() as u64);
            assert!(t.finale.end() < t.total_frames);
            for s in &t.stats {
                assert!(s.start < t.finale.start);
                assert!(s.end() < t.total_frames);
            }
        }
    }
}

#[test]
fn many_stats_are_compressed_before_the_finale() {
    let t = Timeline::new(5, fps(60), 12).unwrap();
    let mut prev = 0;
    for s in &t.stats {
        assert!(s.start >= prev);
        assert!(s.start < t.finale.start);
        prev = s.start;
    }
}

#[test]
fn windows_scale_with_fps() {
    let t = Timeline::new(10, fps(30), 1).unwrap();
    assert_eq!(t.stats[0].len, 20);
    assert_eq!(t.finale.len, 30);
}

#[test]
fn progress_is_clamped() {
    let s = Stage { start: 10, len: 4 };
    assert_eq!(s.progress(9), None);
    assert_eq!(s.progress(10), Some(0.0));
    assert_eq!(s.progress(12), Some(0.5));
    assert_eq!(s.progress(100), Some(1.0));
}

#[test]
fn zero_duration_is_rejected() {
    assert!(Timeline::new(0, fps(60), 6).is_err());
}
