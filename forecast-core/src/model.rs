use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decoded payload of the 5-day / 3-hour forecast endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Status code as reported inside the document, `"200"` on success.
    pub cod: String,
    pub message: i64,
    /// Number of entries the service says it returned.
    pub cnt: u32,
    /// Forecast entries in the order the service returned them (chronological).
    pub list: Vec<ForecastEntry>,
    pub city: City,
}

impl ForecastResult {
    /// `true` when the document carries the service's success code.
    pub fn is_success(&self) -> bool {
        self.cod == "200"
    }
}

/// One 3-hour slice of the forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp (UTC) of the slice.
    pub dt: i64,
    pub main: MainMeasurements,
    /// A slice may report several simultaneous conditions, primary first.
    pub weather: Vec<WeatherCondition>,
    pub clouds: Clouds,
    pub wind: Wind,
    /// Visibility in metres. Omitted by the service for some slices.
    pub visibility: Option<u32>,
    /// Probability of precipitation, 0.0 ..= 1.0.
    #[serde(default)]
    pub pop: f64,
    pub sys: Sys,
    pub dt_txt: String,
}

impl ForecastEntry {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }

    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainMeasurements {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Pressure at sea level unless the service reports otherwise, hPa.
    pub pressure: u32,
    #[serde(default)]
    pub sea_level: u32,
    #[serde(default)]
    pub grnd_level: u32,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Internal correction parameter of the service.
    #[serde(default)]
    pub temp_kf: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clouds {
    /// Cloudiness, percent.
    pub all: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    /// Direction, meteorological degrees.
    pub deg: u16,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sys {
    /// Raw part-of-day marker, `"d"` or `"n"`.
    pub pod: String,
}

impl Sys {
    pub fn part_of_day(&self) -> Option<PartOfDay> {
        match self.pod.as_str() {
            "d" => Some(PartOfDay::Day),
            "n" => Some(PartOfDay::Night),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfDay {
    Day,
    Night,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: u64,
    pub name: String,
    pub coord: Coord,
    pub country: String,
    #[serde(default)]
    pub population: u64,
    /// Shift from UTC in seconds.
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

impl City {
    pub fn sunrise_time(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunrise)
    }

    pub fn sunset_time(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sunset)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// Any document the forecast endpoint answers with.
///
/// The service may send an error document with a 2xx status, so a body is
/// tried as a forecast first and as an error document second.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ForecastDocument {
    Forecast(ForecastResult),
    Error(ApiErrorBody),
}

/// Error document returned by the service, e.g.
/// `{"cod":"401","message":"Invalid API key. ..."}`.
///
/// The service is inconsistent about `cod`: it is a string on some endpoints
/// and a number on others. The envelope form
/// `{"ok":false,"error_code":401,"description":"..."}` is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub ok: Option<bool>,
    #[serde(alias = "error_code")]
    pub cod: ApiCode,
    #[serde(default, alias = "description")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApiCode {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for ApiCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiCode::Text(s) => f.write_str(s),
            ApiCode::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Missing timestamps decode as 0; treat those as absent.
fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    if ts == 0 {
        return None;
    }
    DateTime::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZOCCA: &str = include_str!("../tests/fixtures/zocca.json");
    const KHABAROVSK: &str = include_str!("../tests/fixtures/khabarovsk.json");

    #[test]
    fn decodes_single_entry_payload() {
        let parsed: ForecastResult = serde_json::from_str(ZOCCA).expect("fixture must decode");

        assert!(parsed.is_success());
        assert_eq!(parsed.cnt, 1);
        assert_eq!(parsed.list.len(), 1);
        assert_eq!(parsed.city.name, "Zocca");
        assert_eq!(parsed.city.country, "IT");
        assert_eq!(parsed.city.population, 4593);

        let entry = &parsed.list[0];
        assert_eq!(entry.main.temp, 296.76);
        assert_eq!(entry.main.grnd_level, 933);
        assert_eq!(entry.visibility, Some(10000));
        assert_eq!(entry.wind.gust, None);
        assert_eq!(entry.sys.part_of_day(), Some(PartOfDay::Day));
        assert_eq!(entry.primary_condition().map(|w| w.description.as_str()), Some("few clouds"));
    }

    #[test]
    fn city_fields_missing_from_payload_default_to_zero() {
        let parsed: ForecastResult = serde_json::from_str(ZOCCA).expect("fixture must decode");

        assert_eq!(parsed.city.timezone, 0);
        assert_eq!(parsed.city.sunrise_time(), None);
        assert_eq!(parsed.city.sunset_time(), None);
    }

    #[test]
    fn city_timing_fields_are_exposed() {
        let parsed: ForecastResult =
            serde_json::from_str(KHABAROVSK).expect("fixture must decode");

        assert_eq!(parsed.city.timezone, 36000);
        let sunrise = parsed.city.sunrise_time().expect("sunrise present");
        let sunset = parsed.city.sunset_time().expect("sunset present");
        assert!(sunrise < sunset);
    }

    #[test]
    fn entries_keep_service_order() {
        let parsed: ForecastResult =
            serde_json::from_str(KHABAROVSK).expect("fixture must decode");

        assert_eq!(parsed.list.len(), parsed.cnt as usize);
        let stamps: Vec<&str> = parsed.list.iter().map(|e| e.dt_txt.as_str()).collect();
        assert_eq!(
            stamps,
            ["2023-11-20 21:00:00", "2023-11-21 00:00:00", "2023-11-21 03:00:00"]
        );
        assert_eq!(parsed.list[1].weather.len(), 2);
        assert_eq!(parsed.list[0].wind.gust, Some(9.7));
    }

    #[test]
    fn entry_time_matches_text_timestamp() {
        let parsed: ForecastResult =
            serde_json::from_str(KHABAROVSK).expect("fixture must decode");

        let time = parsed.list[0].time().expect("valid timestamp");
        assert_eq!(time.format("%Y-%m-%d %H:%M:%S").to_string(), parsed.list[0].dt_txt);
    }

    #[test]
    fn unknown_part_of_day_is_none() {
        let sys = Sys { pod: "x".into() };
        assert_eq!(sys.part_of_day(), None);
    }

    #[test]
    fn api_error_code_accepts_string_or_number() {
        let text: ApiErrorBody =
            serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();
        let number: ApiErrorBody =
            serde_json::from_str(r#"{"cod":401,"message":"Invalid API key"}"#).unwrap();

        assert_eq!(text.cod.to_string(), "404");
        assert_eq!(text.message, "city not found");
        assert_eq!(number.cod, ApiCode::Number(401));
        assert_eq!(number.cod.to_string(), "401");
    }

    #[test]
    fn api_error_envelope_form_is_accepted() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#,
        )
        .unwrap();

        assert_eq!(body.ok, Some(false));
        assert_eq!(body.cod, ApiCode::Number(401));
        assert_eq!(body.message, "Unauthorized");
    }

    #[test]
    fn document_picks_forecast_or_error() {
        let forecast: ForecastDocument = serde_json::from_str(ZOCCA).unwrap();
        let error: ForecastDocument =
            serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();

        assert!(matches!(forecast, ForecastDocument::Forecast(ref r) if r.city.name == "Zocca"));
        assert!(matches!(error, ForecastDocument::Error(ref e) if e.message == "city not found"));
    }
}
