//! Weather collaborator: request building, response classification and
//! condition-code tables. The HTTP transport itself is supplied by the host.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_HOST: &str = "devapi.qweather.com";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// `"<lon>,<lat>"` with two decimals, as the provider expects.
    pub fn location_param(&self) -> String {
        format!("{:.2},{:.2}", self.longitude, self.latitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherCredentials {
    pub api_key: String,
    pub api_host: String,
}

impl WeatherCredentials {
    pub fn new(api_key: impl Into<String>, api_host: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: api_host.into(),
        }
    }

    /// Configured host without scheme or trailing slash; empty means default.
    pub fn host(&self) -> &str {
        let h = self.api_host.trim();
        let h = h
            .strip_prefix("https://")
            .or_else(|| h.strip_prefix("http://"))
            .unwrap_or(h)
            .trim_end_matches('/');
        if h.is_empty() {
            DEFAULT_API_HOST
        } else {
            h
        }
    }

    pub fn city_lookup_url(&self, at: Coordinates) -> String {
        format!(
            "https://{}/geo/v2/city/lookup?location={}&key={}",
            self.host(),
            at.location_param(),
            urlencoding::encode(&self.api_key)
        )
    }

    pub fn current_url(&self, at: Coordinates) -> String {
        format!(
            "https://{}/v7/weather/now?location={}&key={}",
            self.host(),
            at.location_param(),
            urlencoding::encode(&self.api_key)
        )
    }
}

/// Performs a GET and returns the response body. Failures are `Error::Network`.
pub trait WeatherTransport {
    fn get(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub temperature: i32,
    pub icon_code: String,
    pub text: String,
    pub city: String,
}

#[derive(Deserialize)]
struct CityLookup {
    code: String,
    #[serde(default)]
    location: Vec<CityEntry>,
}

#[derive(Deserialize)]
struct CityEntry {
    name: Option<String>,
}

#[derive(Deserialize)]
struct CurrentResponse {
    code: String,
    now: Option<CurrentConditions>,
}

#[derive(Deserialize)]
struct CurrentConditions {
    temp: String,
    icon: String,
    text: String,
}

/// City name from a lookup response.
pub fn parse_city_lookup(body: &str) -> Result<String> {
    let resp: CityLookup = serde_json::from_str(body)
        .map_err(|e| Error::Network(format!("malformed city lookup: {e}")))?;
    match resp.code.as_str() {
        "200" => Ok(resp
            .location
            .into_iter()
            .next()
            .and_then(|c| c.name)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string())),
        "401" | "403" => Err(Error::Credential("invalid key".into())),
        code => Err(Error::Network(format!("geo api error (code {code})"))),
    }
}

/// Temperature (truncated toward zero), icon and label from a
/// current-conditions response; the city is left empty for the caller.
pub fn parse_current(body: &str) -> Result<Weather> {
    let resp: CurrentResponse = serde_json::from_str(body)
        .map_err(|e| Error::Network(format!("malformed weather response: {e}")))?;
    match resp.code.as_str() {
        "200" => {}
        "401" | "403" => return Err(Error::Credential("invalid key".into())),
        code => return Err(Error::Network(format!("weather api error (code {code})"))),
    }
    let now = resp
        .now
        .ok_or_else(|| Error::Network("weather response missing 'now'".into()))?;
    let temperature = now
        .temp
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Network(format!("bad temperature '{}'", now.temp)))?
        .trunc() as i32;
    Ok(Weather {
        temperature,
        icon_code: now.icon,
        text: now.text,
        city: String::new(),
    })
}

/// City lookup followed by current conditions. A missing key fails before
/// any request is made.
pub fn fetch_current(
    transport: &dyn WeatherTransport,
    credentials: &WeatherCredentials,
    at: Coordinates,
) -> Result<Weather> {
    if credentials.api_key.trim().is_empty() {
        return Err(Error::Credential("no api key".into()));
    }
    let city = parse_city_lookup(&transport.get(&credentials.city_lookup_url(at))?)?;
    let mut weather = parse_current(&transport.get(&credentials.current_url(at))?)?;
    weather.city = city;
    tracing::debug!(city = %weather.city, temp = weather.temperature, "weather fetched");
    Ok(weather)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionIcon {
    Sun,
    Moon,
    CloudSun,
    Cloud,
    Fog,
    Rain,
    Snow,
    Lightning,
}

/// Icon category for a WMO weather code.
pub fn condition_icon(code: u16, is_day: bool) -> ConditionIcon {
    match code {
        0 if is_day => ConditionIcon::Sun,
        0 => ConditionIcon::Moon,
        1..=3 if is_day => ConditionIcon::CloudSun,
        1..=3 => ConditionIcon::Cloud,
        45 | 48 => ConditionIcon::Fog,
        51..=67 | 80..=82 => ConditionIcon::Rain,
        71..=77 | 85..=86 => ConditionIcon::Snow,
        95..=99 => ConditionIcon::Lightning,
        _ => ConditionIcon::Sun,
    }
}

/// Short label for a WMO weather code.
pub fn condition_description(code: u16) -> &'static str {
    match code {
        0 => "Clear",
        1 => "Mainly Clear",
        2 => "Partly Cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        61 | 63 => "Rain",
        65 => "Heavy Rain",
        71 | 73 => "Snow",
        75 => "Heavy Snow",
        95 => "Thunderstorm",
        _ => "Unknown",
    }
}
