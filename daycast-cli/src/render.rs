use std::fmt::Write;

use daycast_core::{ForecastDay, ScreenView};

/// Plain-text rendering of the screen: location, active day detail and the daily strip.
pub fn screen(view: &ScreenView<'_>) -> String {
    if view.is_loading {
        return "Loading...".to_string();
    }

    let (Some(location), Some(day)) = (view.committed_location, view.active_day) else {
        return "Forecast unavailable. Search for a location to try again.".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}, {}", location.name, location.country);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}  {}", day.date.format("%A %-d %B"), day.condition);
    let _ = writeln!(out, "  {}°", day.avg_temp_c);
    let _ = writeln!(
        out,
        "  wind {}km/h   humidity {}%   sunrise {}",
        day.max_wind_kph, day.avg_humidity_pct, day.sunrise
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Daily weather");
    out.push_str(&strip(view.days, view.selected_day_index));
    out
}

fn strip(days: &[ForecastDay], selected: usize) -> String {
    days.iter()
        .enumerate()
        .map(|(i, day)| {
            let cell = format!("{} {}°", day.date.format("%A"), day.avg_temp_c);
            if i == selected { format!("[{cell}]") } else { format!(" {cell} ") }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
