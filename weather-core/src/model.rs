use chrono::NaiveDateTime;

use crate::background::Background;

/// Message shown for any failed fetch. Failure kinds are not surfaced.
pub const FAILED_TO_LOAD: &str = "Failed to load data";

const LOCALTIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub country: String,
    /// Local time at the location, `YYYY-MM-DD HH:MM`.
    pub localtime: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative icon path, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub condition: Condition,
}

/// Point-in-time weather reading for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
}

impl WeatherSnapshot {
    pub fn local_date(&self) -> &str {
        split_localtime(&self.location.localtime).0
    }

    pub fn local_time(&self) -> &str {
        split_localtime(&self.location.localtime).1
    }

    pub fn local_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.location.localtime, LOCALTIME_FORMAT).ok()
    }

    pub fn icon_url(&self) -> String {
        hi_res_icon_url(&self.current.condition.icon)
    }

    pub fn background(&self) -> Background {
        Background::for_condition(&self.current.condition.text)
    }
}

fn split_localtime(localtime: &str) -> (&str, &str) {
    localtime.split_once(' ').unwrap_or((localtime, ""))
}

/// Absolute URL of the 128px variant of a condition icon.
pub fn hi_res_icon_url(icon: &str) -> String {
    let url = if icon.starts_with("//") { format!("https:{icon}") } else { icon.to_owned() };

    url.replace("64x64", "128x128").replace("64*64", "128*128")
}

/// State of the most recent query as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Loading,
    Success(WeatherSnapshot),
    Error(String),
}

impl WeatherResult {
    pub fn is_loading(&self) -> bool {
        matches!(self, WeatherResult::Loading)
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            WeatherResult::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
