use std::fmt;

use reqwest::{
    Method, StatusCode, Url,
    blocking::{Body, Request},
    header::{CONTENT_TYPE, HeaderValue},
};
use url::form_urlencoded;

use crate::{
    config::ClientConfig,
    decode::{decode_buffer, decode_stream, read_body},
    error::ForecastError,
    model::{ApiErrorBody, ForecastDocument, ForecastResult},
    transport::{ReqwestTransport, Transport, TransportResponse},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client for the forecast endpoint.
///
/// Every successful fetch replaces the stored [`last_result`](Self::last_result),
/// so fetching needs `&mut self`.
pub struct ForecastClient<T: Transport = ReqwestTransport> {
    token: String,
    endpoint: String,
    debug: bool,
    transport: T,
    last: ForecastResult,
}

impl ForecastClient<ReqwestTransport> {
    /// Builds a client with the default endpoint and fetches the forecast for
    /// `location_id` right away. Fails if that first fetch fails.
    pub fn new(token: impl Into<String>, location_id: &str) -> Result<Self, ForecastError> {
        Self::from_config(ClientConfig::new(token), location_id)
    }

    pub fn from_config(config: ClientConfig, location_id: &str) -> Result<Self, ForecastError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Self::with_transport(config, location_id, transport)
    }
}

impl<T: Transport> ForecastClient<T> {
    /// Same as [`ForecastClient::new`] but over an arbitrary transport.
    pub fn with_transport(
        config: ClientConfig,
        location_id: &str,
        transport: T,
    ) -> Result<Self, ForecastError> {
        let mut client = Self {
            token: config.token,
            endpoint: config.endpoint,
            debug: config.debug,
            transport,
            last: ForecastResult::default(),
        };

        client.fetch_forecast(location_id)?;

        Ok(client)
    }

    pub fn fetch_forecast(&mut self, location_id: &str) -> Result<&ForecastResult, ForecastError> {
        self.fetch_forecast_with_params(location_id, &[])
    }

    /// Fetches the forecast, sending `params` as the form-encoded body.
    #[tracing::instrument(skip(self, params), level = "debug")]
    pub fn fetch_forecast_with_params(
        &mut self,
        location_id: &str,
        params: &[(&str, &str)],
    ) -> Result<&ForecastResult, ForecastError> {
        let request = self.build_request(location_id, params)?;

        let response = self.transport.execute(request)?;
        let result = self.read_response(location_id, response)?;

        tracing::debug!(entries = result.list.len(), city = %result.city.name, "forecast decoded");

        self.last = result;
        Ok(&self.last)
    }

    pub fn last_result(&self) -> &ForecastResult {
        &self.last
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn build_request(
        &self,
        location_id: &str,
        params: &[(&str, &str)],
    ) -> Result<Request, ForecastError> {
        let url = Url::parse(&self.endpoint_for(location_id)).map_err(|source| {
            ForecastError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                source,
            }
        })?;

        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();

        let mut request = Request::new(Method::POST, url);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        *request.body_mut() = Some(Body::from(body));

        Ok(request)
    }

    fn endpoint_for(&self, location_id: &str) -> String {
        self.endpoint
            .replace("{id}", &encode(location_id))
            .replace("{token}", &encode(&self.token))
    }

    fn read_response(
        &self,
        location_id: &str,
        response: TransportResponse,
    ) -> Result<ForecastResult, ForecastError> {
        let status = response.status();
        let body = response.into_body();

        if !status.is_success() {
            let raw = read_body(body)?;
            let err = api_error(status, &raw);
            tracing::warn!(location_id, %err, "forecast request rejected");
            return Err(err);
        }

        let document: ForecastDocument = if self.debug {
            let raw = read_body(body)?;
            tracing::debug!(
                location_id,
                payload = %String::from_utf8_lossy(&raw),
                "forecast response"
            );
            decode_buffer(&raw)?
        } else {
            decode_stream(body)?
        };

        match document {
            ForecastDocument::Forecast(result) if result.is_success() => Ok(result),
            ForecastDocument::Forecast(result) => Err(ForecastError::Api {
                status: status.as_u16(),
                message: format!("unexpected document status '{}'", result.cod),
                code: result.cod,
            }),
            ForecastDocument::Error(body) => {
                let err = api_error_from_body(status, body);
                tracing::warn!(location_id, %err, "forecast request rejected");
                Err(err)
            }
        }
    }
}

impl<T: Transport> fmt::Debug for ForecastClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForecastClient")
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn api_error(status: StatusCode, raw: &[u8]) -> ForecastError {
    match serde_json::from_slice::<ApiErrorBody>(raw) {
        Ok(body) => api_error_from_body(status, body),
        Err(_) => ForecastError::Api {
            status: status.as_u16(),
            code: status.as_u16().to_string(),
            message: truncate_body(&String::from_utf8_lossy(raw)),
        },
    }
}

fn api_error_from_body(status: StatusCode, body: ApiErrorBody) -> ForecastError {
    ForecastError::Api {
        status: status.as_u16(),
        code: body.cod.to_string(),
        message: body.message,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
