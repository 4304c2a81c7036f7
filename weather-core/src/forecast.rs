//! Reduction of 3-hour forecast samples to per-day summaries.

use std::{collections::HashSet, convert::Infallible};

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};

use crate::{
    model::{ForecastDay, RawSample},
    present::{icon_for, round_half_up},
};

pub const MAX_DAYS: usize = 5;

const DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// [`reduce_at`] with day boundaries in UTC.
pub fn reduce(samples: &[RawSample]) -> Vec<ForecastDay> {
    reduce_at(samples, Utc.fix())
}

/// Keeps the first sample of each day-of-week label, in input order, up to [`MAX_DAYS`].
///
/// Samples are grouped by weekday name rather than calendar date, so samples
/// a week apart share one bucket.
pub fn reduce_at(samples: &[RawSample], offset: FixedOffset) -> Vec<ForecastDay> {
    let reduced = try_reduce_at(
        samples,
        offset,
        |s| Ok::<_, Infallible>(s.timestamp),
        |s| Ok(s.clone()),
    );

    match reduced {
        Ok(days) => days,
        Err(never) => match never {},
    }
}

/// Same reduction over entries that are decoded lazily.
///
/// `timestamp` runs on every entry inspected; `into_sample` only on entries
/// that open a new day, so a broken entry on an already-seen day is skipped
/// like any other duplicate.
pub fn try_reduce_at<T, E>(
    entries: impl IntoIterator<Item = T>,
    offset: FixedOffset,
    timestamp: impl Fn(&T) -> Result<DateTime<Utc>, E>,
    into_sample: impl Fn(T) -> Result<RawSample, E>,
) -> Result<Vec<ForecastDay>, E> {
    let mut seen = HashSet::new();
    let mut days = Vec::with_capacity(MAX_DAYS);

    for entry in entries {
        if days.len() == MAX_DAYS {
            break;
        }

        let label = day_label(timestamp(&entry)?, offset);
        if seen.contains(label) {
            continue;
        }

        let sample = into_sample(entry)?;
        seen.insert(label);
        days.push(ForecastDay {
            day: label.to_string(),
            temperature_c: round_half_up(sample.temperature_c),
            description: sample.description,
            icon: icon_for(&sample.condition),
        });
    }

    Ok(days)
}

fn day_label(timestamp: DateTime<Utc>, offset: FixedOffset) -> &'static str {
    DAYS[timestamp.with_timezone(&offset).weekday().num_days_from_sunday() as usize]
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    use super::*;
    use crate::present::IconKey;

    fn sample(ts: DateTime<Utc>, temp: f64, condition: &str) -> RawSample {
        RawSample {
            timestamp: ts,
            temperature_c: temp,
            condition: condition.to_string(),
            description: format!("{} sky", condition.to_lowercase()),
        }
    }

    fn three_hourly(start: DateTime<Utc>, count: usize) -> Vec<RawSample> {
        (0..count)
            .map(|i| {
                sample(start + Duration::hours(3 * i as i64), 10.0 + i as f64 * 0.1, "Clear")
            })
            .collect()
    }

    #[test]
    fn empty_input_gives_nothing() {
        assert!(reduce(&[]).is_empty());
    }

    #[test]
    fn forty_samples_over_six_days_give_five_in_order() {
        // Monday 2026-10-19 12:00 UTC; 40 samples run into Saturday.
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let days = reduce(&three_hourly(start, 40));

        let labels: Vec<_> = days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(labels, ["Mon", "Tue", "Wed", "Thu", "Fri"]);
    }

    #[test]
    fn first_sample_of_each_day_wins() {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 21, 0, 0).unwrap();
        let samples = vec![
            sample(start, 7.5, "Rain"),
            sample(start + Duration::hours(3), 4.4, "Snow"),
            sample(start + Duration::hours(6), 30.0, "Clear"),
        ];

        let days = reduce(&samples);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, "Mon");
        assert_eq!(days[0].temperature_c, 8);
        assert_eq!(days[0].icon, IconKey::CloudRain);
        assert_eq!(days[0].description, "rain sky");
        assert_eq!(days[1].day, "Tue");
        assert_eq!(days[1].temperature_c, 4);
        assert_eq!(days[1].icon, IconKey::Snowflake);
    }

    #[test]
    fn never_repeats_a_label() {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        // Two weeks of samples at one per day: only five distinct labels come out.
        let samples: Vec<_> = (0..14)
            .map(|i| sample(start + Duration::days(i), 1.0, "Clouds"))
            .collect();

        let days = reduce(&samples);
        assert_eq!(days.len(), MAX_DAYS);
        let unique: HashSet<_> = days.iter().map(|d| d.day.clone()).collect();
        assert_eq!(unique.len(), days.len());
    }

    #[test]
    fn weekday_aliasing_is_preserved() {
        let monday = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let samples =
            vec![sample(monday, 1.0, "Clear"), sample(monday + Duration::weeks(1), 2.0, "Rain")];

        let days = reduce(&samples);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temperature_c, 1);
    }

    #[test]
    fn offset_moves_day_boundary() {
        // 22:00 UTC Monday is already Tuesday at UTC+3.
        let ts = Utc.with_ymd_and_hms(2026, 10, 19, 22, 0, 0).unwrap();
        let samples = vec![sample(ts, 5.0, "Mist")];

        assert_eq!(reduce(&samples)[0].day, "Mon");
        let east = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(reduce_at(&samples, east)[0].day, "Tue");
    }

    #[test]
    fn lazy_reduction_skips_broken_entries_on_seen_days() {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let entries: Vec<(DateTime<Utc>, Option<f64>)> =
            vec![(start, Some(9.6)), (start + Duration::hours(3), None)];

        let days = try_reduce_at(
            entries,
            Utc.fix(),
            |(ts, _)| Ok::<_, &str>(*ts),
            |(ts, temp)| {
                Ok(RawSample {
                    timestamp: ts,
                    temperature_c: temp.ok_or("no temperature")?,
                    condition: "Clear".into(),
                    description: "clear sky".into(),
                })
            },
        )
        .unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temperature_c, 10);
    }

    #[test]
    fn lazy_reduction_fails_on_broken_entry_opening_a_day() {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let entries = vec![start];

        let err = try_reduce_at(
            entries,
            Utc.fix(),
            |ts| Ok(*ts),
            |_| Err::<RawSample, _>("no temperature"),
        )
        .unwrap_err();
        assert_eq!(err, "no temperature");
    }

    fn arb_samples() -> impl Strategy<Value = Vec<RawSample>> {
        // Roughly 1970..2100 in seconds.
        prop::collection::vec((0i64..4_100_000_000, -60.0f64..60.0), 0..80).prop_map(|raw| {
            raw.into_iter()
                .map(|(secs, temp)| {
                    sample(DateTime::from_timestamp(secs, 0).unwrap(), temp, "Rain")
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn reduction_is_bounded_unique_and_first_seen(
            samples in arb_samples(),
            offset_secs in -43_200i32..=50_400,
        ) {
            let offset = FixedOffset::east_opt(offset_secs).unwrap();
            let days = reduce_at(&samples, offset);

            let mut expected: Vec<String> = Vec::new();
            for s in &samples {
                let label = s.timestamp.with_timezone(&offset).format("%a").to_string();
                if !expected.contains(&label) {
                    expected.push(label);
                }
            }
            expected.truncate(MAX_DAYS);

            let labels: Vec<String> = days.iter().map(|d| d.day.clone()).collect();
            prop_assert!(days.len() <= MAX_DAYS);
            prop_assert_eq!(labels, expected);
        }
    }
}
