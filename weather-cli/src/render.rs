use std::io::{self, Stdout, Write};

use chrono::{Local, NaiveDate};
use weather_core::{
    IconKey, Renderer, View, WeatherReport,
    present::{format_long_date, round_half_up, visibility_km},
};

/// Terminal render target. Reports go to `out`, progress and errors to stderr.
#[derive(Debug)]
pub struct TerminalRenderer<W = Stdout> {
    out: W,
}

impl TerminalRenderer {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send + std::fmt::Debug> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &View) {
        match view {
            View::Loading => eprintln!("Loading weather data..."),
            View::Error(message) => eprintln!("Error: {message}"),
            View::Report(report) => {
                let today = Local::now().date_naive();
                let written = write_report(&mut self.out, report, today)
                    .and_then(|()| self.out.flush());
                if let Err(err) = written {
                    tracing::warn!(error = %err, "failed to write report");
                }
            }
        }
    }
}

fn glyph(icon: IconKey) -> &'static str {
    match icon {
        IconKey::Sun => "☀️",
        IconKey::Cloud => "☁️",
        IconKey::CloudRain => "🌧️",
        IconKey::Snowflake => "❄️",
        IconKey::Bolt => "⚡",
        IconKey::CloudDrizzle => "🌦️",
        IconKey::Smog => "🌫️",
        IconKey::Wind => "💨",
        IconKey::Tornado => "🌪️",
    }
}

/// Writes the report block for `today`, stopping at the first I/O failure.
pub fn write_report(
    out: &mut impl Write,
    report: &WeatherReport,
    today: NaiveDate,
) -> io::Result<()> {
    let current = &report.current;

    writeln!(out, "{}", current.location_name)?;
    writeln!(out, "{}", format_long_date(today))?;
    writeln!(out)?;
    writeln!(
        out,
        "  {}  {}°C  {}",
        glyph(current.icon()),
        current.temperature_c,
        current.description
    )?;
    writeln!(out)?;
    writeln!(out, "  Feels Like      {}°C", current.feels_like_c)?;
    writeln!(out, "  Humidity        {}%", current.humidity_pct)?;
    writeln!(out, "  Wind Speed      {} m/s", round_half_up(current.wind_speed_mps))?;
    if let Some(meters) = current.visibility_m {
        writeln!(out, "  Visibility      {} km", visibility_km(meters))?;
    }
    writeln!(out, "  Pressure        {} hPa", current.pressure_hpa)?;
    if let Some(direction) = current.wind_direction() {
        writeln!(out, "  Wind Direction  {direction}")?;
    }

    if let Some(days) = &report.forecast {
        writeln!(out)?;
        writeln!(out, "5-Day Forecast")?;
        for day in days {
            writeln!(
                out,
                "  {:<4}{}  {:>4}°C  {}",
                day.day,
                glyph(day.icon),
                day.temperature_c,
                day.description
            )?;
        }
    }

    Ok(())
}
