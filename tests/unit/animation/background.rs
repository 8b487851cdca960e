use super::*;

fn canvas() -> Canvas {
    Canvas {
        width: 1080,
        height: 1920,
    }
}

#[test]
fn particles_depend_only_on_seed() {
    let a = seed_particles(42, canvas());
    assert_eq!(a.len(), PARTICLE_COUNT);
    assert_eq!(a, seed_particles(42, canvas()));
    assert_ne!(a, seed_particles(43, canvas()));
    for p in &a {
        assert!((0.0..1080.0).contains(&p.x));
        assert!((0.0..1920.0).contains(&p.y));
        assert!((-1.0..1.0).contains(&p.speed_x));
        assert!((0.0..4.0).contains(&p.size));
        assert!((0.0..0.5).contains(&p.alpha));
    }
}

#[test]
fn cinematic_dust_drifts_up_and_wraps() {
    let particles = vec![Particle {
        x: 10.0,
        y: 1.0,
        speed_x: 0.0,
        speed_y: 0.0,
        size: 2.0,
        alpha: 0.5,
        offset: 0.0,
    }];
    let at = |frame| match overlay(VideoStyle::Cinematic, frame, &particles, canvas())[0] {
        Mark::Dot { center, .. } => center.y,
        Mark::Bar { .. } => panic!("expected a dot"),
    };
    assert_eq!(at(0), 0.5);
    assert_eq!(at(2), 1920.0 - 0.5);
}

#[test]
fn neon_grid_scrolls_by_two_pixels_per_frame() {
    let first_row = |frame| {
        overlay(VideoStyle::Neon, frame, &[], canvas())
            .into_iter()
            .find_map(|m| match m {
                Mark::Bar { rect, .. } if rect.width() > 1000.0 => Some(rect.center().y),
                _ => None,
            })
            .unwrap()
    };
    assert_eq!(first_row(0), 0.0);
    assert_eq!(first_row(10), 20.0);
    assert_eq!(first_row(50), 0.0);
}

#[test]
fn overlays_are_pure() {
    let p = seed_particles(9, canvas());
    for style in VideoStyle::ALL {
        assert_eq!(overlay(*style, 77, &p, canvas()), overlay(*style, 77, &p, canvas()));
    }
    assert!(overlay(VideoStyle::Retro, 5, &p, canvas()).is_empty());
}

#[test]
fn static_layers_are_opaque_and_styled() {
    let small = Canvas {
        width: 40,
        height: 60,
    };
    for style in VideoStyle::ALL {
        let px = static_layer(*style, small);
        assert_eq!(px.len(), 40 * 60 * 4);
        assert!(px.chunks_exact(4).all(|p| p[3] == 255));
    }
    let neon = static_layer(VideoStyle::Neon, small);
    assert_eq!(&neon[..4], &[5, 5, 5, 255]);
    let minimal = static_layer(VideoStyle::Minimal, small);
    assert!(minimal[0] > 240);
}
