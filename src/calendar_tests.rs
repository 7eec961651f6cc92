// src/calendar_tests.rs

#[cfg(test)]
mod tests {
    use crate::calendar::*;
    use crate::test_support::d;
    use chrono::{Datelike, Duration, NaiveDate};

    #[test]
    fn test_window_for_reference_friday() {
        let anchor = d("2024-03-15");
        let (window, labels) = build_window(anchor).unwrap();

        assert_eq!(window.dates().len(), WINDOW_LEN);
        assert_eq!(window.first(), d("2024-03-08"));
        assert_eq!(window.last(), d("2024-03-22"));
        assert_eq!(window.anchor(), anchor);
        assert_eq!(window.dates()[7], anchor);

        // 2024-03-08 is a Friday, so the rotation starts on "pa".
        assert_eq!(labels.keys(), vec!["pa", "so", "ne", "po", "ut", "st", "ct"]);
    }

    #[test]
    fn test_window_is_contiguous_for_every_anchor_in_a_leap_year() {
        let mut anchor = d("2023-12-20");
        let end = d("2025-01-10");

        while anchor <= end {
            let (window, _) = build_window(anchor).unwrap();
            assert_eq!(window.anchor(), anchor, "anchor not centered for {}", anchor);
            for pair in window.dates().windows(2) {
                assert_eq!(
                    pair[1] - pair[0],
                    Duration::days(1),
                    "gap between {} and {} (anchor {})",
                    pair[0],
                    pair[1],
                    anchor
                );
            }
            anchor += Duration::days(1);
        }
    }

    #[test]
    fn test_window_rolls_over_month_and_year_boundaries() {
        let (window, _) = build_window(d("2025-01-03")).unwrap();
        assert_eq!(window.first(), d("2024-12-27"));
        assert_eq!(window.last(), d("2025-01-10"));

        let (window, _) = build_window(d("2024-03-01")).unwrap();
        assert!(window.contains(d("2024-02-29")), "leap day missing from window");
        assert_eq!(window.first(), d("2024-02-23"));
        assert_eq!(window.last(), d("2024-03-08"));

        let (window, _) = build_window(d("2023-03-01")).unwrap();
        assert_eq!(window.first(), d("2023-02-22"));
        assert!(!window.contains(d("2023-03-09")));
    }

    #[test]
    fn test_rotation_is_cyclic_for_every_weekday() {
        // 2024-03-11 is a Monday; walk one full week of anchors.
        for offset in 0..7 {
            let anchor = d("2024-03-11") + Duration::days(offset);
            let (_, rotation) = build_window(anchor).unwrap();

            let mut restored = *rotation.labels();
            restored.rotate_right(rotation.offset());
            assert_eq!(
                restored, CANONICAL_LABELS,
                "rotation for {} ({:?}) is not a cyclic shift",
                anchor,
                anchor.weekday()
            );
        }
    }

    #[test]
    fn test_labels_line_up_with_every_window_column() {
        for offset in 0..14 {
            let anchor = d("2024-12-28") + Duration::days(offset);
            let (window, rotation) = build_window(anchor).unwrap();

            for (column, date) in window.iter().enumerate() {
                assert_eq!(
                    rotation.label_for_column(column),
                    DayLabel::from_weekday(date.weekday()),
                    "column {} ({}) mislabelled for anchor {}",
                    column,
                    date,
                    anchor
                );
            }
        }
    }

    #[test]
    fn test_sunday_anchor_uses_negative_modulo() {
        // Sunday is weekday index 0, so the start index is -8.
        let (_, rotation) = build_window(d("2024-03-17")).unwrap();
        assert_eq!(rotation.labels()[0], DayLabel::Sunday);
        assert_eq!(rotation.offset(), 6);
        assert_eq!(rotation.keys(), vec!["ne", "po", "ut", "st", "ct", "pa", "so"]);
    }

    #[test]
    fn test_window_near_date_range_limit_is_rejected() {
        let result = build_window(NaiveDate::MAX);
        assert_eq!(result, Err(CalendarError::DateOutOfRange(NaiveDate::MAX)));

        let near_max = NaiveDate::MAX - Duration::days(7);
        assert!(build_window(near_max).is_ok());
    }

    #[test]
    fn test_grid_json_shape() {
        let (window, rotation) = build_window(d("2024-03-15")).unwrap();
        let window_json = serde_json::to_value(&window).unwrap();
        let rotation_json = serde_json::to_value(&rotation).unwrap();

        assert_eq!(window_json.as_array().map(|a| a.len()), Some(WINDOW_LEN));
        assert_eq!(window_json[7], "2024-03-15");
        assert_eq!(
            rotation_json,
            serde_json::json!(["pa", "so", "ne", "po", "ut", "st", "ct"])
        );
    }
}
