//! Derives the chart series and the per-day forecast strip from a forecast series.
//!
//! Both functions take the time zone explicitly. Labels and day boundaries are
//! computed in that zone, never in the zone of the machine running the code.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Timelike, Utc};
use std::fmt::Display;

use crate::{
    config::DEFAULT_ICON_URL_TEMPLATE,
    model::{ChartPoint, DailyForecastEntry, ForecastPoint, ForecastSeries},
};

pub const CHART_POINTS: usize = 8;
pub const MAX_FORECAST_DAYS: usize = 7;
const PREFERRED_HOUR: u32 = 12;

/// First [`CHART_POINTS`] points in arrival order, temperatures rounded.
pub fn to_chart_series<Tz>(forecast: &ForecastSeries, tz: &Tz) -> Vec<ChartPoint>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    forecast
        .points
        .iter()
        .take(CHART_POINTS)
        .map(|point| ChartPoint {
            label: local_time(point.epoch_seconds, tz)
                .map(|dt| dt.format("%I:%M %p").to_string())
                .unwrap_or_default(),
            temp: round_temp(point.temperature),
            min: round_temp(point.temp_min),
            max: round_temp(point.temp_max),
        })
        .collect()
}

/// One entry per local calendar date, preferring the noon sample.
///
/// Dates keep the order in which they first appear in the input. Without a
/// noon sample the first sample of the date is used.
pub fn to_daily_forecast<Tz>(
    forecast: &ForecastSeries,
    tz: &Tz,
    icon_template: &str,
) -> Vec<DailyForecastEntry>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut days: Vec<(NaiveDate, DailyForecastEntry)> = Vec::new();

    for point in &forecast.points {
        let Some(local) = local_time(point.epoch_seconds, tz) else {
            continue;
        };
        let date = local.date_naive();
        let is_noon = local.hour() == PREFERRED_HOUR;

        match days.iter_mut().find(|(d, _)| *d == date) {
            Some((_, entry)) if is_noon => *entry = daily_entry(point, &local, icon_template),
            Some(_) => {}
            None => days.push((date, daily_entry(point, &local, icon_template))),
        }
    }

    days.into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(_, entry)| entry)
        .collect()
}

/// The forecast city's own UTC offset, as reported by the API.
pub fn series_offset(forecast: &ForecastSeries) -> FixedOffset {
    FixedOffset::east_opt(forecast.timezone_offset_secs).unwrap_or_else(|| Utc.fix())
}

pub fn icon_url(template: &str, icon_code: &str) -> String {
    template.replace("{icon}", icon_code)
}

pub fn default_icon_url(icon_code: &str) -> String {
    icon_url(DEFAULT_ICON_URL_TEMPLATE, icon_code)
}

pub fn round_temp(value: f64) -> i64 {
    value.round() as i64
}

fn daily_entry<Tz>(point: &ForecastPoint, local: &DateTime<Tz>, icon_template: &str) -> DailyForecastEntry
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DailyForecastEntry {
        day_label: local.format("%a").to_string(),
        date_label: local.format("%a, %b %-d").to_string(),
        icon_url: icon_url(icon_template, &point.condition_icon_code),
        temperature: round_temp(point.temperature),
        description: point.condition_description.clone(),
        precipitation_percent: (point.precipitation_probability * 100.0).round() as i64,
    }
}

fn local_time<Tz: TimeZone>(epoch_seconds: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp(epoch_seconds, 0).map(|utc| utc.with_timezone(tz))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-04-04 00:00:00 UTC
    const APR_4: i64 = 1_712_188_800;
    const HOUR: i64 = 3600;

    fn point(epoch_seconds: i64, temperature: f64, icon: &str, description: &str) -> ForecastPoint {
        ForecastPoint {
            epoch_seconds,
            temperature,
            temp_min: temperature - 1.4,
            temp_max: temperature + 1.6,
            condition_icon_code: icon.to_string(),
            condition_description: description.to_string(),
            precipitation_probability: 0.26,
        }
    }

    fn series(points: Vec<ForecastPoint>) -> ForecastSeries {
        ForecastSeries {
            city_name: "Manila".into(),
            timezone_offset_secs: 0,
            points,
        }
    }

    fn three_hourly(count: i64) -> ForecastSeries {
        series(
            (0..count)
                .map(|i| point(APR_4 + i * 3 * HOUR, 27.0 + i as f64 * 0.5, "01d", "clear sky"))
                .collect(),
        )
    }

    #[test]
    fn chart_of_empty_series_is_empty() {
        assert!(to_chart_series(&series(vec![]), &Utc).is_empty());
    }

    #[test]
    fn chart_takes_first_eight_points() {
        let chart = to_chart_series(&three_hourly(40), &Utc);
        assert_eq!(chart.len(), CHART_POINTS);
        assert_eq!(chart[0].label, "12:00 AM");
        assert_eq!(chart[7].label, "09:00 PM");
    }

    #[test]
    fn chart_shorter_input_gives_shorter_output() {
        assert_eq!(to_chart_series(&three_hourly(3), &Utc).len(), 3);
    }

    #[test]
    fn chart_rounds_temperatures() {
        let chart = to_chart_series(&series(vec![point(APR_4, 31.5, "01d", "clear")]), &Utc);
        assert_eq!(chart[0].temp, 32);
        assert_eq!(chart[0].min, 30);
        assert_eq!(chart[0].max, 33);
    }

    #[test]
    fn chart_labels_follow_given_zone() {
        let manila = FixedOffset::east_opt(8 * 3600).expect("valid offset");
        let chart = to_chart_series(&three_hourly(1), &manila);
        assert_eq!(chart[0].label, "08:00 AM");
    }

    #[test]
    fn daily_has_one_entry_per_date_and_at_most_seven() {
        // 10 days of 3-hourly data
        let daily = to_daily_forecast(&three_hourly(80), &Utc, DEFAULT_ICON_URL_TEMPLATE);
        assert_eq!(daily.len(), MAX_FORECAST_DAYS);

        let mut dates: Vec<_> = daily.iter().map(|d| d.date_label.clone()).collect();
        dates.dedup();
        assert_eq!(dates.len(), daily.len());
        assert_eq!(daily[0].date_label, "Thu, Apr 4");
        assert_eq!(daily[0].day_label, "Thu");
    }

    #[test]
    fn noon_point_wins_over_earlier_point() {
        let forecast = series(vec![
            point(APR_4 + 3 * HOUR, 25.2, "10n", "light rain"),
            point(APR_4 + 12 * HOUR, 33.4, "01d", "clear sky"),
            point(APR_4 + 15 * HOUR, 31.0, "02d", "few clouds"),
        ]);

        let daily = to_daily_forecast(&forecast, &Utc, DEFAULT_ICON_URL_TEMPLATE);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].temperature, 33);
        assert_eq!(daily[0].description, "clear sky");
        assert_eq!(daily[0].icon_url, "https://openweathermap.org/img/wn/01d@2x.png");
    }

    #[test]
    fn first_point_is_kept_without_noon_sample() {
        let forecast = series(vec![
            point(APR_4 + 3 * HOUR, 25.2, "10n", "light rain"),
            point(APR_4 + 9 * HOUR, 29.9, "02d", "few clouds"),
        ]);

        let daily = to_daily_forecast(&forecast, &Utc, DEFAULT_ICON_URL_TEMPLATE);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].description, "light rain");
        assert_eq!(daily[0].temperature, 25);
        assert_eq!(daily[0].precipitation_percent, 26);
    }

    #[test]
    fn dates_keep_first_seen_order() {
        let forecast = series(vec![
            point(APR_4 + 27 * HOUR, 28.0, "01d", "tomorrow"),
            point(APR_4 + 3 * HOUR, 26.0, "01n", "today"),
        ]);

        let daily = to_daily_forecast(&forecast, &Utc, DEFAULT_ICON_URL_TEMPLATE);
        assert_eq!(daily[0].description, "tomorrow");
        assert_eq!(daily[1].description, "today");
    }

    #[test]
    fn bucketing_depends_on_zone() {
        // 20:00 UTC on Apr 4 is 04:00 on Apr 5 in Manila.
        let forecast = series(vec![
            point(APR_4 + 10 * HOUR, 30.0, "01d", "a"),
            point(APR_4 + 20 * HOUR, 27.0, "01n", "b"),
        ]);
        let manila = FixedOffset::east_opt(8 * 3600).expect("valid offset");

        assert_eq!(to_daily_forecast(&forecast, &Utc, DEFAULT_ICON_URL_TEMPLATE).len(), 1);
        assert_eq!(to_daily_forecast(&forecast, &manila, DEFAULT_ICON_URL_TEMPLATE).len(), 2);
    }

    #[test]
    fn custom_icon_template_is_used() {
        let forecast = series(vec![point(APR_4, 30.0, "04d", "clouds")]);
        let daily = to_daily_forecast(&forecast, &Utc, "http://icons.local/{icon}.png");
        assert_eq!(daily[0].icon_url, "http://icons.local/04d.png");
    }

    #[test]
    fn series_offset_uses_city_timezone() {
        let mut forecast = series(vec![]);
        forecast.timezone_offset_secs = 28800;
        assert_eq!(series_offset(&forecast).local_minus_utc(), 28800);

        forecast.timezone_offset_secs = 1_000_000;
        assert_eq!(series_offset(&forecast).local_minus_utc(), 0);
    }
}
