//! Plain-text rendering of a dashboard snapshot.

use std::fmt::{self, Display, Formatter};

use forecast_core::{
    AirConditions, DayForecast, HourViewModel, Panel, Snapshot, TodayViewModel, WeekViewModel,
};

/// Text form of a snapshot, written straight into whatever formats it.
pub struct SnapshotText<'a>(&'a Snapshot);

pub fn snapshot(snap: &Snapshot) -> SnapshotText<'_> {
    SnapshotText(snap)
}

impl Display for SnapshotText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let snap = self.0;
        writeln!(f, "{} GMT", snap.utc_clock)?;
        writeln!(f)?;
        today(f, &snap.today)?;
        writeln!(f)?;
        match &snap.panel {
            Panel::Week(week) => week_list(f, week),
            Panel::Hours(hours) => hour_list(f, hours),
        }
    }
}

fn today(f: &mut Formatter<'_>, view: &TodayViewModel) -> fmt::Result {
    writeln!(f, "CURRENT WEATHER")?;
    writeln!(f, "  {}  {}", view.city, view.date_label)?;
    writeln!(
        f,
        "  {}  {}  [{}]",
        temperature(view.conditions.temperature),
        view.conditions.label,
        view.conditions.icon_ref
    )?;

    writeln!(f)?;
    writeln!(f, "AIR CONDITIONS")?;
    air_conditions(f, &view.conditions.air)?;

    if !view.upcoming.is_empty() {
        writeln!(f)?;
        writeln!(f, "NEXT DAYS")?;
        for day in &view.upcoming {
            day_line(f, day)?;
        }
    }
    Ok(())
}

fn air_conditions(f: &mut Formatter<'_>, air: &AirConditions) -> fmt::Result {
    writeln!(
        f,
        "  Feels like {}  Wind {}  Humidity {}  Clouds {}",
        temperature(air.feels_like),
        measure(air.wind_speed_mps, 1, " m/s"),
        measure(air.humidity_pct, 0, "%"),
        measure(air.clouds_pct, 0, "%"),
    )
}

fn week_list(f: &mut Formatter<'_>, view: &WeekViewModel) -> fmt::Result {
    writeln!(f, "WEEKLY FORECAST  {}", view.city)?;
    if view.days.is_empty() {
        writeln!(f, "  No forecast available")?;
    }
    for day in &view.days {
        day_line(f, day)?;
    }
    Ok(())
}

fn hour_list(f: &mut Formatter<'_>, view: &HourViewModel) -> fmt::Result {
    writeln!(f, "HOURLY FORECAST  {}  {}", view.city, view.weekday.to_uppercase())?;
    if view.hours.is_empty() {
        writeln!(f, "  No hourly data for this day")?;
    }
    for hour in &view.hours {
        writeln!(
            f,
            "  {}  {:>6}  {}  [{}]",
            hour.time_label,
            temperature(hour.temperature),
            hour.label,
            hour.icon_ref
        )?;
    }
    Ok(())
}

fn day_line(f: &mut Formatter<'_>, day: &DayForecast) -> fmt::Result {
    writeln!(
        f,
        "  {}  {:>6}  {}  [{}]",
        day.date_label,
        temperature(day.temperature),
        day.label,
        day.icon_ref
    )
}

fn temperature(value: Option<f64>) -> String {
    match value {
        Some(t) => format!("{} °C", t.round() as i64),
        None => "--".to_string(),
    }
}

fn measure(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.precision$}{unit}"),
        None => "--".to_string(),
    }
}
