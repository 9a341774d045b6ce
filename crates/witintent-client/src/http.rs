use crate::transport::{OutboundRequest, RawResponse, Transport};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONNECTION};
use witintent_error::{ErrorKind, IntentError, Result};

/// [`Transport`] over `reqwest`'s blocking client.
///
/// A client is built per request, so no connection outlives a call unless
/// `keep_alive` is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

impl HttpTransport {
    #[mutants::skip]
    fn client(request: &OutboundRequest) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(concat!("witintent/", env!("CARGO_PKG_VERSION")))
            .timeout(request.timeout);
        if request.insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if !request.keep_alive {
            builder = builder.pool_max_idle_per_host(0);
        }
        builder.build().map_err(|e| {
            IntentError::with_source(ErrorKind::Transport, format!("build http client: {e}"), e)
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &OutboundRequest) -> Result<RawResponse> {
        let client = Self::client(request)?;

        let mut req = client
            .get(request.url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", request.token));
        if !request.keep_alive {
            req = req.header(CONNECTION, "close");
        }

        let resp = req.send().map_err(|e| {
            let timeout = e.is_timeout();
            IntentError::transport(e, timeout)
        })?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.bytes().map(|b| b.to_vec()).unwrap_or_default();
            return Ok(RawResponse { status, body });
        }

        let body = resp.bytes().map_err(IntentError::read)?;
        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
