use crate::{
    error::Result,
    model::WeatherModel,
    series::{DailySnowfall, RawForecast},
};
use async_trait::async_trait;

/// Everything needed to request one model's forecast at one elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// m above sea level
    pub elevation: f64,
    pub model: WeatherModel,
    pub forecast_days: u8,
    pub past_days: u8,
    /// IANA zone name or "auto"
    pub timezone: String,
}

/// Upstream data the forecast pipeline consumes.
///
/// The HTTP implementation lives behind the `api` feature; tests substitute
/// an in-memory source.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch one model's hourly and daily series.
    async fn fetch_model(&self, request: &ModelRequest) -> Result<RawForecast>;

    /// Fetch the secondary daily snowfall forecast. An empty vector means no coverage.
    async fn fetch_secondary_snowfall(&self, latitude: f64, longitude: f64)
        -> Result<Vec<DailySnowfall>>;
}

#[cfg(feature = "api")]
pub use http::HttpSource;

#[cfg(feature = "api")]
mod http {
    use super::{ForecastSource, ModelRequest};
    use crate::{
        error::Result,
        nws::NwsClient,
        open_meteo::OpenMeteoClient,
        series::{DailySnowfall, RawForecast},
    };
    use async_trait::async_trait;
    use reqwest::Client;
    use std::time::Duration;

    pub const USER_AGENT: &str = concat!("pow-forecast/", env!("CARGO_PKG_VERSION"));

    /// Open-Meteo for the models, NWS for the secondary source.
    pub struct HttpSource {
        pub open_meteo: OpenMeteoClient,
        pub nws: NwsClient,
    }

    impl HttpSource {
        pub fn new() -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent(USER_AGENT)
                .build()?;
            Ok(HttpSource {
                open_meteo: OpenMeteoClient::new(client.clone()),
                nws: NwsClient::new(client),
            })
        }
    }

    #[async_trait]
    impl ForecastSource for HttpSource {
        async fn fetch_model(&self, request: &ModelRequest) -> Result<RawForecast> {
            self.open_meteo.fetch_forecast(request).await
        }

        async fn fetch_secondary_snowfall(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> Result<Vec<DailySnowfall>> {
            Ok(self.nws.daily_snowfall(latitude, longitude).await)
        }
    }
}
