use std::fmt::Write;

use weather_core::{WeatherResult, WeatherSnapshot};

/// Text rendering of one controller state.
pub fn render(result: &WeatherResult) -> String {
    match result {
        WeatherResult::Loading => "Loading...".to_string(),
        WeatherResult::Error(message) => message.clone(),
        WeatherResult::Success(snapshot) => render_snapshot(snapshot),
    }
}

fn render_snapshot(data: &WeatherSnapshot) -> String {
    let mut out = String::new();
    let background = data.background();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "[background: {background}]");
    let _ = writeln!(out, "{}  {}", data.location.name, data.location.country);
    let _ = writeln!(out, "  {} °C", data.current.temp_c);
    let _ = writeln!(out, "  {}", data.current.condition.text);
    let _ = writeln!(out, "  icon: {}", data.icon_url());
    let _ = writeln!(out, "  {:<12}{:<12}", "Local Date", "Local Time");
    let _ = writeln!(out, "  {:<12}{:<12}", data.local_date(), data.local_time());
    let _ = writeln!(out, "  {:<12}{:<12}", "Humidity", "Wind Speed");
    let _ = write!(out, "  {:<12}{:<12}", data.current.humidity, data.current.wind_kph);

    out
}
