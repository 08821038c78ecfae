use crate::model::WeatherResult;

/// Background image shown behind the weather screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Background {
    Sunny,
    Rain,
    HeavyRain,
    Cloudy,
    Clear,
    Mist,
    Default,
}

impl Background {
    /// Exact, case-sensitive lookup on the API's condition text.
    /// Anything not in the table falls back to [`Background::Default`].
    pub fn for_condition(text: &str) -> Self {
        match text {
            "Sunny" => Background::Sunny,
            "Clear" => Background::Clear,
            "Mist" => Background::Mist,
            "Cloudy" | "Partly cloudy" | "Overcast" => Background::Cloudy,
            "Rain" | "Moderate rain" | "Torrential rain shower" => Background::Rain,
            "Moderate or heavy rain with thunder" | "Patchy light rain with thunder" => {
                Background::HeavyRain
            }
            _ => Background::Default,
        }
    }

    pub fn for_result(result: Option<&WeatherResult>) -> Self {
        match result {
            Some(WeatherResult::Success(snapshot)) => snapshot.background(),
            _ => Background::Default,
        }
    }

    pub fn asset_id(&self) -> &'static str {
        match self {
            Background::Sunny => "sunny",
            Background::Rain => "rain",
            Background::HeavyRain => "heavyrain",
            Background::Cloudy => "cloudy",
            Background::Clear => "clear",
            Background::Mist => "mist",
            Background::Default => "background",
        }
    }
}

impl std::fmt::Display for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.asset_id())
    }
}
