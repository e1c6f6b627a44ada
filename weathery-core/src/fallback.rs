//! Static sample data shown until live data replaces it.

use crate::{
    model::{ChartPoint, DailyForecastEntry},
    normalize::default_icon_url,
};

const CHART: [(&str, i64, i64, i64); 8] = [
    ("9 AM", 28, 26, 30),
    ("12 PM", 32, 28, 34),
    ("3 PM", 33, 30, 35),
    ("6 PM", 30, 28, 32),
    ("9 PM", 28, 26, 30),
    ("12 AM", 27, 25, 29),
    ("3 AM", 26, 24, 28),
    ("6 AM", 27, 25, 29),
];

const DAILY: [(&str, &str, &str, i64, &str, i64); 7] = [
    ("Today", "Apr 4", "01d", 32, "Sunny", 0),
    ("Tomorrow", "Apr 5", "02d", 30, "Partly Cloudy", 10),
    ("Sunday", "Apr 6", "03d", 29, "Cloudy", 20),
    ("Monday", "Apr 7", "10d", 28, "Light Rain", 40),
    ("Tuesday", "Apr 8", "09d", 27, "Heavy Rain", 80),
    ("Wednesday", "Apr 9", "10d", 28, "Light Rain", 30),
    ("Thursday", "Apr 10", "02d", 29, "Partly Cloudy", 10),
];

pub fn fallback_chart_series() -> Vec<ChartPoint> {
    CHART
        .iter()
        .map(|&(label, temp, min, max)| ChartPoint {
            label: label.to_string(),
            temp,
            min,
            max,
        })
        .collect()
}

pub fn fallback_daily_forecast() -> Vec<DailyForecastEntry> {
    DAILY
        .iter()
        .map(|&(day, date, icon, temperature, description, precipitation)| DailyForecastEntry {
            day_label: day.to_string(),
            date_label: date.to_string(),
            icon_url: default_icon_url(icon),
            temperature,
            description: description.to_string(),
            precipitation_percent: precipitation,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{CHART_POINTS, MAX_FORECAST_DAYS};

    #[test]
    fn fallback_sizes_match_live_limits() {
        assert_eq!(fallback_chart_series().len(), CHART_POINTS);
        assert_eq!(fallback_daily_forecast().len(), MAX_FORECAST_DAYS);
    }

    #[test]
    fn fallback_icons_use_icon_host() {
        let daily = fallback_daily_forecast();
        assert_eq!(daily[0].icon_url, "https://openweathermap.org/img/wn/01d@2x.png");
        assert_eq!(daily[4].precipitation_percent, 80);
    }
}
