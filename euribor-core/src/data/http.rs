//! euribor-rates.eu HTTP source.
//!
//! Issues one blocking GET per month against either the chart-data endpoint
//! (JSON) or a page template (HTML). There is no retry and no cache: a
//! failed request surfaces as a `FetchError` for that month and the caller
//! moves on.

use super::provider::{FetchError, RateSource, RawDocument, SourceFormat};
use crate::domain::YearMonth;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CHART_URL: &str =
    "https://www.euribor-rates.eu/umbraco/api/euriborpageapi/highchartsdata";
pub const DEFAULT_REFERER: &str =
    "https://www.euribor-rates.eu/en/current-euribor-rates/4/euribor-rate-12-months/";
pub const DEFAULT_USER_AGENT: &str = concat!("euribor/", env!("CARGO_PKG_VERSION"));

/// Series id of the 12-month tenor on the chart-data endpoint.
pub const DEFAULT_SERIES_ID: u32 = 4;

/// Connection settings for `HttpSource`.
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub format: SourceFormat,
    /// Chart-data endpoint, or a page template with `{year}` and `{month}`
    /// placeholders when `format` is `Html`.
    pub url: String,
    pub series_id: u32,
    pub referer: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            format: SourceFormat::Highcharts,
            url: DEFAULT_CHART_URL.to_string(),
            series_id: DEFAULT_SERIES_ID,
            referer: Some(DEFAULT_REFERER.to_string()),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct HttpSource {
    client: reqwest::blocking::Client,
    config: HttpSourceConfig,
}

impl HttpSource {
    pub fn new(config: HttpSourceConfig) -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    /// Fill the `{year}` / `{month}` placeholders of a page template.
    pub fn page_url(template: &str, period: YearMonth) -> String {
        template
            .replace("{year}", &format!("{:04}", period.year()))
            .replace("{month}", &period.month_key())
    }

    /// Query parameters selecting one month of one series on the chart endpoint.
    pub fn chart_query(series_id: u32, period: YearMonth) -> [(&'static str, String); 3] {
        [
            ("series[0]", series_id.to_string()),
            ("minticks", period.start_millis().to_string()),
            ("maxticks", period.end_millis().to_string()),
        ]
    }

    fn request(&self, period: YearMonth) -> reqwest::blocking::RequestBuilder {
        let builder = match self.config.format {
            SourceFormat::Highcharts => self
                .client
                .get(&self.config.url)
                .query(&Self::chart_query(self.config.series_id, period))
                .header("Sec-Fetch-Mode", "cors"),
            SourceFormat::Html => self.client.get(Self::page_url(&self.config.url, period)),
        };
        match &self.config.referer {
            Some(referer) => builder.header(reqwest::header::REFERER, referer),
            None => builder,
        }
    }

    fn map_error(&self, period: YearMonth, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                period,
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_builder() {
            FetchError::InvalidRequest {
                period,
                reason: e.to_string(),
            }
        } else if e.is_body() || e.is_decode() {
            FetchError::Body {
                period,
                reason: e.to_string(),
            }
        } else {
            FetchError::NetworkUnreachable {
                period,
                reason: e.to_string(),
            }
        }
    }
}

impl RateSource for HttpSource {
    fn name(&self) -> &str {
        "euribor-rates.eu"
    }

    fn fetch(&self, period: YearMonth) -> Result<RawDocument, FetchError> {
        debug!(%period, format = %self.config.format, "requesting upstream document");

        let resp = self
            .request(period)
            .send()
            .map_err(|e| self.map_error(period, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                period,
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(|e| self.map_error(period, e))?;
        debug!(%period, bytes = body.len(), "upstream document received");

        Ok(RawDocument {
            period,
            format: self.config.format,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn page_url_fills_placeholders() {
        let period = YearMonth::new(2024, 3).unwrap();
        assert_eq!(
            HttpSource::page_url("https://example.test/rates/{year}/{month}/", period),
            "https://example.test/rates/2024/03/"
        );
    }

    #[test]
    fn chart_query_covers_one_month() {
        let period = YearMonth::new(2021, 1).unwrap();
        let query = HttpSource::chart_query(4, period);
        assert_eq!(query[0], ("series[0]", "4".to_string()));
        assert_eq!(query[1], ("minticks", "1609459200000".to_string()));
        assert_eq!(query[2], ("maxticks", "1612137600000".to_string()));
    }

    fn local_source(addr: std::net::SocketAddr) -> HttpSource {
        HttpSource::new(HttpSourceConfig {
            url: format!("http://{addr}/highchartsdata"),
            referer: None,
            timeout: Duration::from_secs(1),
            ..Default::default()
        })
        .unwrap()
    }

    fn april() -> YearMonth {
        YearMonth::new(2024, 4).unwrap()
    }

    #[test]
    fn silent_server_is_a_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            // Hold the connection open without answering.
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(3));
            drop(stream);
        });

        let err = local_source(addr).fetch(april()).unwrap_err();
        assert!(
            matches!(err, FetchError::Timeout { timeout_secs: 1, .. }),
            "unexpected error: {err}"
        );
        assert_eq!(err.period(), april());
    }

    #[test]
    fn refused_connection_is_network_unreachable() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let err = local_source(addr).fetch(april()).unwrap_err();
        assert!(
            matches!(err, FetchError::NetworkUnreachable { .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn error_status_is_reported_with_its_code() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(
                b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        });

        let err = local_source(addr).fetch(april()).unwrap_err();
        assert!(
            matches!(err, FetchError::HttpStatus { status: 503, .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn default_config_targets_chart_endpoint() {
        let config = HttpSourceConfig::default();
        assert_eq!(config.format, SourceFormat::Highcharts);
        assert_eq!(config.series_id, 4);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(HttpSource::new(config).is_ok());
    }
}
