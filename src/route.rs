//! Route records as produced by the directions provider or the demo set.
//!
//! Deserialization is lenient: a field with the wrong JSON type is treated as
//! absent instead of failing the whole payload, so scoring can fall back to
//! its neutral defaults.

use serde::{Deserialize, Serialize};

/// Base metrics supplied with the route, each nominally 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseMetrics {
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub safety: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Free-form category ("Lighting", "Community", "Construction", ...).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Incident {
    /// Incidents whose type mentions "community" carry rider-written text.
    pub fn is_community(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.to_lowercase().contains("community"))
    }
}

/// Aggregate of crowd-sourced reports for a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStats {
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub total_reports: Option<u32>,
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub positive: Option<u32>,
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub negative: Option<u32>,
    #[serde(default, deserialize_with = "lenient::list", skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

/// One forecast snapshot (NOAA / Open-Meteo shaped).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub short_forecast: Option<String>,
    /// Percent, 0..=100.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub precipitation_chance: Option<f64>,
    /// Degrees Fahrenheit.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Free text such as "10 to 15 mph"; a bare number is accepted too.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<String>,
}

/// Forecast at a checkpoint along the route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSegment {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub summary: Option<WeatherSummary>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Candidate path between two points. Scoring never mutates a `Route`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::id")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
    /// Minutes.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<f64>,
    /// Legacy top-level safety figure, used when `metrics.safety` is missing.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub metrics: BaseMetrics,
    #[serde(default, deserialize_with = "lenient::list", skip_serializing_if = "Vec::is_empty")]
    pub incidents: Vec<Incident>,
    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub community_stats: Option<CommunityStats>,
    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSummary>,
    /// Unreadable entries are kept as empty segments so they still count.
    #[serde(default, deserialize_with = "lenient::list_or_default", skip_serializing_if = "Vec::is_empty")]
    pub weather_segments: Vec<WeatherSegment>,
    #[serde(default, deserialize_with = "lenient::list", skip_serializing_if = "Vec::is_empty")]
    pub coordinates: Vec<LatLng>,
}

impl Route {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_metrics(mut self, safety: f64, balance: f64, speed: f64) -> Self {
        self.metrics = BaseMetrics {
            safety: Some(safety),
            balance: Some(balance),
            speed: Some(speed),
        };
        self
    }

    pub fn with_incident(mut self, kind: &str, description: &str) -> Self {
        self.incidents.push(Incident {
            id: None,
            kind: Some(kind.to_string()),
            description: Some(description.to_string()),
        });
        self
    }

    pub fn with_community_stats(mut self, stats: CommunityStats) -> Self {
        self.community_stats = Some(stats);
        self
    }

    pub fn with_weather(mut self, summary: WeatherSummary) -> Self {
        self.weather = Some(summary);
        self
    }

    pub fn with_weather_segment(mut self, label: &str, summary: WeatherSummary) -> Self {
        self.weather_segments.push(WeatherSegment {
            label: Some(label.to_string()),
            summary: Some(summary),
        });
        self
    }

    /// Rider-written text for this route: community highlights followed by the
    /// descriptions of community-tagged incidents. Blank entries are dropped.
    pub fn community_notes(&self) -> Vec<&str> {
        let highlights = self
            .community_stats
            .iter()
            .flat_map(|s| s.highlights.iter().map(String::as_str));
        let incidents = self
            .incidents
            .iter()
            .filter(|i| i.is_community())
            .filter_map(|i| i.description.as_deref());
        highlights
            .chain(incidents)
            .filter(|n| !n.trim().is_empty())
            .collect()
    }
}

/// Deserializers that swallow type mismatches.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.and_then(|v| v.as_f64()).filter(|x| x.is_finite()))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(number(d)?
            .filter(|x| *x >= 0.0)
            .map(|x| x.floor().min(u32::MAX as f64) as u32))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text(d)?.unwrap_or_default())
    }

    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|it| serde_json::from_value(it).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Like [`list`], but an entry of the wrong shape becomes `T::default()`.
    pub fn list_or_default<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|it| serde_json::from_value(it).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(obj @ Value::Object(_)) => serde_json::from_value(obj).ok(),
            _ => None,
        })
    }

    pub fn object_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(object(d)?.unwrap_or_default())
    }
}
