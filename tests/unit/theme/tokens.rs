use super::*;

#[test]
fn light_theme_matches_table() {
    let t = resolve(ThemeId::Light);
    assert_eq!(t.base.css_triplet(), "248 250 252");
    assert_eq!(t.primary.css_triplet(), "79 70 229");
    assert_eq!(t.text.hex(), "#0f172a");
}

#[test]
fn formats_agree_on_components() {
    for id in ThemeId::ALL {
        let t = resolve(id);
        for c in [t.base, t.card, t.text, t.muted, t.primary, t.border, t.input] {
            let packed = c.packed();
            assert_eq!((packed >> 16) as u8, c.r);
            assert_eq!((packed >> 8) as u8, c.g);
            assert_eq!(packed as u8, c.b);
            assert_eq!(Rgb::parse_hex(&c.hex()), Some(c));
            let parts: Vec<u8> = c
                .css_triplet()
                .split(' ')
                .map(|p| p.parse().unwrap())
                .collect();
            assert_eq!(parts, vec![c.r, c.g, c.b]);
        }
    }
}

#[test]
fn ids_round_trip_through_strings_and_serde() {
    for id in ThemeId::ALL {
        assert_eq!(id.as_str().parse::<ThemeId>().unwrap(), id);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_str()));
    }
}

#[test]
fn unknown_theme_fails_at_parse_boundary() {
    assert!("vaporwave".parse::<ThemeId>().is_err());
    assert!(serde_json::from_str::<ThemeId>("\"vaporwave\"").is_err());
}

#[test]
fn darkness_follows_base_token() {
    assert!(!ThemeId::Light.is_dark());
    assert!(ThemeId::Dark.is_dark());
    assert!(ThemeId::Amoled.is_dark());
    assert!(!ThemeId::Historical.is_dark());
}

#[test]
fn short_hex_expands() {
    assert_eq!(Rgb::parse_hex("#fff"), Some(Rgb::new(255, 255, 255)));
    assert_eq!(Rgb::parse_hex("zzz"), None);
    assert_eq!(Rgb::parse_hex("#12345"), None);
}
