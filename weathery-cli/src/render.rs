//! Plain-text rendering of a dashboard snapshot.

use chrono::{DateTime, FixedOffset};
use std::fmt::{self, Write};

use weathery_core::{
    CurrentConditions, DashboardStatus, ViewState,
    display::{MapLayer, condition_icon_name, headline, map_url, summary_cards, weather_alert},
    resolve_location,
};

pub fn dashboard(state: &ViewState, map_zoom: u8) -> anyhow::Result<()> {
    print!("{}", format_dashboard(state, map_zoom)?);
    Ok(())
}

pub fn credential_prompt(state: &ViewState) {
    println!("Weathery");
    if let Some(message) = &state.error_message {
        println!("  {message}");
    }
    println!("  Get a free API key at https://openweathermap.org/api");
}

pub fn format_dashboard(state: &ViewState, map_zoom: u8) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_dashboard(&mut out, state, map_zoom)?;
    Ok(out)
}

fn write_dashboard(out: &mut impl Write, state: &ViewState, map_zoom: u8) -> fmt::Result {
    let location = resolve_location(&state.selected_location_id);
    let current = state.current_conditions.as_ref();

    writeln!(out, "Weather Analytics")?;
    writeln!(out, "{}", headline(current, location))?;
    if let Some(observed) = current.and_then(observed_at) {
        writeln!(out, "Updated {}", observed.format("%a, %b %-d %I:%M %p"))?;
    }
    if let Some(c) = current {
        writeln!(
            out,
            "Conditions: {} ({})",
            c.condition_description,
            condition_icon_name(&c.condition_main)
        )?;
    }
    writeln!(out)?;

    if state.status == DashboardStatus::ReadyWithWarning {
        if let Some(message) = &state.error_message {
            writeln!(out, "Warning: {message}")?;
            writeln!(out, "Showing fallback data. Some features may be limited.")?;
            writeln!(out)?;
        }
    }

    for card in summary_cards(current) {
        writeln!(out, "{:<12} {:>10}  {}", card.title, card.value, card.description)?;
    }
    writeln!(out)?;

    writeln!(out, "Temperature Trends")?;
    for point in &state.chart_series {
        writeln!(
            out,
            "  {:>8}  {:>3}°C  (min {:>3}°C, max {:>3}°C)",
            point.label, point.temp, point.min, point.max
        )?;
    }
    writeln!(out)?;

    writeln!(out, "7-Day Forecast")?;
    for day in &state.daily_forecast {
        writeln!(
            out,
            "  {:<10} {:<12} {:>4}°C  {:<20} rain {:>3}%",
            day.day_label, day.date_label, day.temperature, day.description, day.precipitation_percent
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Weather Alerts")?;
    match current.and_then(weather_alert) {
        Some(alert) => writeln!(out, "  {}: {}", alert.title, alert.description)?,
        None => {
            let name = current.map_or(location.display_name, |c| c.location_name.as_str());
            writeln!(out, "  No active weather alerts for {name}")?;
        }
    }
    writeln!(out)?;

    writeln!(out, "Weather Map")?;
    writeln!(out, "  {}", map_url(location, MapLayer::default(), map_zoom))
}

fn observed_at(current: &CurrentConditions) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(current.timezone_offset_secs)?;
    DateTime::from_timestamp(current.observed_at, 0).map(|utc| utc.with_timezone(&offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathery_core::fallback::{fallback_chart_series, fallback_daily_forecast};

    fn state(status: DashboardStatus) -> ViewState {
        ViewState {
            selected_location_id: "manila".into(),
            status,
            current_conditions: None,
            chart_series: fallback_chart_series(),
            daily_forecast: fallback_daily_forecast(),
            loading: false,
            error_message: None,
            failure: None,
            api_key_valid: true,
        }
    }

    #[test]
    fn renders_fallback_sections() {
        let out = format_dashboard(&state(DashboardStatus::Idle), 10).expect("render");

        assert!(out.contains("latest weather in Manila, Philippines"));
        assert!(out.contains("Feels like 35°C"));
        assert!(out.contains("Tomorrow"));
        assert!(out.contains("No active weather alerts for Manila"));
        assert!(out.contains("layer=temp_new&lat=14.5995&lon=120.9842&zoom=10"));
        assert!(!out.contains("Warning:"));
        assert!(!out.contains("Conditions:"));
    }

    #[test]
    fn warning_banner_shows_message() {
        let mut s = state(DashboardStatus::ReadyWithWarning);
        s.error_message = Some("Forecast error: transport error: timed out".into());

        let out = format_dashboard(&s, 10).expect("render");
        assert!(out.contains("Warning: Forecast error: transport error: timed out"));
        assert!(out.contains("Showing fallback data"));
    }

    #[test]
    fn current_conditions_show_icon_name() {
        let mut s = state(DashboardStatus::Ready);
        s.current_conditions = Some(CurrentConditions {
            temperature: 31.7,
            feels_like: 36.2,
            temp_min: 30.1,
            temp_max: 32.4,
            humidity: 74,
            pressure: 1008,
            wind_speed: 3.6,
            wind_direction_deg: 230.0,
            visibility_meters: 10_000,
            condition_main: "Rain".into(),
            condition_description: "light rain".into(),
            condition_icon_code: "10d".into(),
            location_name: "Manila".into(),
            country: "PH".into(),
            observed_at: 1_712_205_600,
            timezone_offset_secs: 28_800,
        });

        let out = format_dashboard(&s, 10).expect("render");
        assert!(out.contains("Conditions: light rain (cloud-rain)"));
        assert!(out.contains("Updated Thu, Apr 4 12:40 PM"));
    }
}
