mod stats_props {
    use chrono::{DateTime, NaiveDateTime};
    use milestone_export::StatPayload;
    use milestone_export::stats::cosmic::{TROPICAL_YEAR_DAYS, compute_cosmic};
    use milestone_export::stats::elapsed::{ElapsedBreakdown, compute_elapsed};
    use proptest::prelude::*;

    // 1900-01-01 .. 2100-01-01
    const MIN_TS: i64 = -2_208_988_800;
    const MAX_TS: i64 = 4_102_444_800;

    fn instant() -> impl Strategy<Value = NaiveDateTime> {
        (MIN_TS..MAX_TS).prop_map(|s| {
            DateTime::from_timestamp(s, 0)
                .map(|d| d.naive_utc())
                .unwrap_or_default()
        })
    }

    fn units(e: &ElapsedBreakdown) -> [u64; 7] {
        [
            e.years, e.months, e.weeks, e.days, e.hours, e.minutes, e.seconds,
        ]
    }

    proptest! {
        #[test]
        fn argument_order_does_not_matter(a in instant(), b in instant()) {
            prop_assert_eq!(compute_elapsed(a, b), compute_elapsed(b, a));
        }

        #[test]
        fn units_agree_with_each_other(a in instant(), b in instant()) {
            let e = compute_elapsed(a, b);
            prop_assert!(e.months / 12 <= e.years && e.years <= e.months / 12 + 1);
            prop_assert_eq!(e.weeks, e.days / 7);
            prop_assert_eq!(e.days, e.hours / 24);
            prop_assert_eq!(e.hours, e.minutes / 60);
            prop_assert_eq!(e.minutes, e.seconds / 60);
        }

        #[test]
        fn units_never_shrink_as_time_passes(a in instant(), b in instant(), c in instant()) {
            let mut v = [a, b, c];
            v.sort();
            let near = units(&compute_elapsed(v[0], v[1]));
            let far = units(&compute_elapsed(v[0], v[2]));
            for (n, f) in near.iter().zip(far.iter()) {
                prop_assert!(n <= f);
            }
        }

        #[test]
        fn cosmic_days_match_elapsed_days(a in instant(), b in instant()) {
            let e = compute_elapsed(a, b);
            let c = compute_cosmic(a, b);
            prop_assert_eq!(c.day_count, e.days);
            prop_assert_eq!(c.minute_hand_cycles, e.hours);
            prop_assert_eq!(c.second_hand_cycles, e.minutes);
            let solar: f64 = c.solar_years.parse().unwrap();
            prop_assert!((solar - c.day_count as f64 / TROPICAL_YEAR_DAYS).abs() <= 0.005 + 1e-9);
        }

        #[test]
        fn stat_payload_mirrors_the_breakdown(a in instant(), b in instant()) {
            let e = compute_elapsed(a, b);
            let p = StatPayload::between(a, b);
            let values: Vec<u64> = p.iter().map(|(_, v)| v).collect();
            prop_assert_eq!(values, units(&e).to_vec());
        }
    }

    #[test]
    fn one_day_and_ten_years() {
        let d = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap();
        let e = compute_elapsed(d("2000-01-01T00:00:00"), d("2000-01-02T00:00:00"));
        assert_eq!((e.days, e.hours), (1, 24));
        let c = compute_cosmic(d("2000-01-01T00:00:00"), d("2000-01-02T00:00:00"));
        assert_eq!(c.day_count, 1);
        assert_eq!(c.solar_years, "0.00");
        let ten = compute_cosmic(d("2000-01-01T00:00:00"), d("2009-12-31T00:00:00"));
        assert_eq!(ten.day_count, 3652);
        assert_eq!(ten.solar_years, "10.00");
    }
}
