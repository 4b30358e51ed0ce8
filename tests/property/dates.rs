use chrono::{NaiveDate, TimeDelta};
use proptest::prelude::*;
use respcheck::config::{Margin, MarginUnit};
use respcheck::dates::{compare_dates, looks_like_date, parse_date_str};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn margin_boundary_is_inclusive(amount in 0u32..10_000, offset_secs in 0i64..86_400) {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
            + TimeDelta::seconds(offset_secs);
        let margin = Margin::new(MarginUnit::Minutes, amount);
        let edge = TimeDelta::minutes(i64::from(amount));
        let past = TimeDelta::minutes(i64::from(amount) + 1);

        let mut unmatched = Vec::new();
        compare_dates(expected, expected + edge, "k", &mut unmatched, &margin);
        compare_dates(expected, expected - edge, "k", &mut unmatched, &margin);
        prop_assert!(unmatched.is_empty());

        compare_dates(expected, expected + past, "k", &mut unmatched, &margin);
        compare_dates(expected, expected - past, "k", &mut unmatched, &margin);
        prop_assert_eq!(unmatched.len(), 2);
    }

    #[test]
    fn fraction_digits_never_break_parsing(digits in "[0-9]{1,20}", zulu in any::<bool>()) {
        let raw = format!("2024-03-01T12:00:00.{}{}", digits, if zulu { "Z" } else { "" });
        prop_assert!(parse_date_str(&raw, None).is_some(), "failed on {}", raw);
    }

    #[test]
    fn sniffed_strings_always_parse(
        year in 1970i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
        fraction in proptest::option::of("[0-9]{1,12}"),
        space_separated in any::<bool>(),
        zone in prop_oneof![
            Just(""), Just("Z"), Just("+02:00"), Just("-0300"), Just("-03"),
        ],
    ) {
        let raw = format!(
            "{:04}-{:02}-{:02}{}{:02}:{:02}:{:02}{}{}",
            year,
            month,
            day,
            if space_separated { " " } else { "T" },
            hour,
            minute,
            second,
            fraction.map(|f| format!(".{}", f)).unwrap_or_default(),
            zone,
        );
        let sniffed = looks_like_date(&raw);
        prop_assert_eq!(sniffed, !space_separated && zone != "-03", "sniff on {}", raw);
        if sniffed {
            prop_assert!(parse_date_str(&raw, None).is_some(), "failed on {}", raw);
        }
    }

    #[test]
    fn arbitrary_string_never_panics(s in "\\PC{0,40}") {
        let _ = parse_date_str(&s, None);
    }
}
