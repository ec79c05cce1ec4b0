//! Weather sentiment: forecast keywords plus precipitation, temperature and
//! wind terms per summary, averaged across checkpoints.

use crate::analyze::normalize::{normalize, parse_number};
use crate::route::{Route, WeatherSummary};
use crate::scorecard::{SentimentLabel, SentimentResult};
use crate::sentiment::Lexicon;

/// Per-summary impact is clamped into [WEATHER_MIN, WEATHER_MAX] and the
/// average normalized over the same range.
pub const WEATHER_MIN: f64 = -8.0;
pub const WEATHER_MAX: f64 = 6.0;

/// Raw impact of one forecast. A missing summary contributes 0.
pub fn summary_impact(summary: Option<&WeatherSummary>) -> f64 {
    let Some(s) = summary else {
        return 0.0;
    };

    let mut impact = s
        .short_forecast
        .as_deref()
        .map_or(0.0, |f| Lexicon::weather().delta(f));

    if let Some(p) = s.precipitation_chance {
        impact += precipitation_term(p);
    }
    if let Some(t) = s.temperature {
        impact += temperature_term(t);
    }
    if let Some(w) = s.wind_speed.as_deref().and_then(parse_number) {
        impact += wind_term(w);
    }

    impact.clamp(WEATHER_MIN, WEATHER_MAX)
}

fn precipitation_term(chance: f64) -> f64 {
    if chance >= 70.0 {
        -3.0
    } else if chance >= 40.0 {
        -2.0
    } else if chance <= 15.0 {
        1.0
    } else {
        0.0
    }
}

/// Degrees Fahrenheit.
fn temperature_term(t: f64) -> f64 {
    if t <= 30.0 {
        -3.0
    } else if t <= 40.0 || t >= 90.0 {
        -2.0
    } else if t <= 50.0 || t >= 85.0 {
        -1.0
    } else {
        1.0
    }
}

/// Miles per hour.
fn wind_term(mph: f64) -> f64 {
    if mph >= 30.0 {
        -3.0
    } else if mph >= 20.0 {
        -2.0
    } else if mph >= 10.0 {
        -1.0
    } else if mph <= 5.0 {
        1.0
    } else {
        0.0
    }
}

/// Weather sentiment for `route`. Checkpoint segments take precedence over the
/// route-level summary; no weather at all yields `{55, Unknown}`.
pub fn analyze_weather(route: &Route) -> SentimentResult {
    let summaries: Vec<Option<&WeatherSummary>> = if !route.weather_segments.is_empty() {
        route
            .weather_segments
            .iter()
            .map(|seg| seg.summary.as_ref())
            .collect()
    } else if let Some(w) = route.weather.as_ref() {
        vec![Some(w)]
    } else {
        Vec::new()
    };

    if summaries.is_empty() {
        return SentimentResult::unknown("Weather forecast unavailable.");
    }

    let total: f64 = summaries.iter().map(|s| summary_impact(*s)).sum();
    let average = total / summaries.len() as f64;
    let score = normalize(average, WEATHER_MIN, WEATHER_MAX);
    let mut result = SentimentResult::new(score, SentimentLabel::for_weather(score as f64));

    if let Some(primary) = summaries[0] {
        if let Some(f) = primary.short_forecast.as_deref().filter(|f| !f.is_empty()) {
            result = result.with_reason(f);
        }
        if let Some(p) = primary.precipitation_chance {
            result = result.with_reason(format!("{p}% precip."));
        }
        if let Some(w) = primary.wind_speed.as_deref().filter(|w| !w.is_empty()) {
            result = result.with_reason(format!("Wind {w}"));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(forecast: &str, precip: f64, temp: f64, wind: &str) -> WeatherSummary {
        WeatherSummary {
            short_forecast: Some(forecast.to_string()),
            precipitation_chance: Some(precip),
            temperature: Some(temp),
            wind_speed: Some(wind.to_string()),
        }
    }

    #[test]
    fn thunderstorm_is_clamped_to_floor() {
        let s = summary("Thunderstorm", 80.0, 28.0, "35 mph");
        assert_eq!(summary_impact(Some(&s)), WEATHER_MIN);

        let r = analyze_weather(&Route::new("a", "A").with_weather(s));
        assert_eq!(r.score, 0);
        assert_eq!(r.label, SentimentLabel::Risky);
        assert_eq!(r.reasons, vec!["Thunderstorm", "80% precip.", "Wind 35 mph"]);
    }

    #[test]
    fn pleasant_day_is_favorable() {
        // sunny +1, precip +1, temp +1, wind +1 = 4 -> (12 / 14) = 85.7 -> 86.
        let s = summary("Sunny", 5.0, 68.0, "3 mph");
        let r = analyze_weather(&Route::new("a", "A").with_weather(s));
        assert_eq!(r.score, 86);
        assert_eq!(r.label, SentimentLabel::Favorable);
    }

    #[test]
    fn no_weather_is_unknown_55() {
        let r = analyze_weather(&Route::new("a", "A"));
        assert_eq!(r.score, 55);
        assert_eq!(r.label, SentimentLabel::Unknown);
    }

    #[test]
    fn segments_are_averaged_and_take_precedence() {
        let good = summary("Sunny", 5.0, 68.0, "3 mph"); // +4
        let bad = summary("Thunderstorm", 80.0, 28.0, "35 mph"); // -8
        let route = Route::new("a", "A")
            .with_weather(good.clone())
            .with_weather_segment("start", good)
            .with_weather_segment("end", bad);
        // average -2 -> (6 / 14) = 42.86 -> 43.
        let r = analyze_weather(&route);
        assert_eq!(r.score, 43);
        assert_eq!(r.label, SentimentLabel::Manageable);
    }

    #[test]
    fn missing_segment_summary_counts_as_zero_impact() {
        let mut route = Route::new("a", "A");
        route.weather_segments.push(Default::default());
        // 0 -> (8 / 14) = 57.1 -> 57.
        let r = analyze_weather(&route);
        assert_eq!(r.score, 57);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn unreadable_segment_still_counts_in_average() {
        let route: Route = serde_json::from_value(serde_json::json!({
            "id": "a",
            "weatherSegments": [
                { "label": "start", "summary": { "shortForecast": "Sunny", "precipitationChance": 5, "temperature": 68, "windSpeed": "3 mph" } },
                5
            ]
        }))
        .unwrap();
        // (4 + 0) / 2 = 2 -> (10 / 14) = 71.4 -> 71.
        let r = analyze_weather(&route);
        assert_eq!(r.score, 71);
        assert_eq!(r.label, SentimentLabel::Favorable);
        assert_eq!(r.reasons, vec!["Sunny", "5% precip.", "Wind 3 mph"]);
    }

    #[test]
    fn band_edges() {
        assert_eq!(precipitation_term(40.0), -2.0);
        assert_eq!(precipitation_term(15.0), 1.0);
        assert_eq!(precipitation_term(30.0), 0.0);
        assert_eq!(temperature_term(40.0), -2.0);
        assert_eq!(temperature_term(90.0), -2.0);
        assert_eq!(temperature_term(85.0), -1.0);
        assert_eq!(temperature_term(50.0), -1.0);
        assert_eq!(temperature_term(70.0), 1.0);
        assert_eq!(wind_term(10.0), -1.0);
        assert_eq!(wind_term(7.0), 0.0);
        assert_eq!(wind_term(5.0), 1.0);
    }
}
