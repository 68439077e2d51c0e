//! Blocking HTTP GET over libcurl.
//!
//! Every request in a run goes through [`get`]: the page fetch and each image
//! download. Redirects are followed, a browser-like User-Agent is sent, and
//! any non-2xx status is an error.

mod parse;

use encoding_rs::{Encoding, UTF_8};
use std::str;
use std::time::Duration;

/// Maximum redirect hops followed per request.
const MAX_REDIRECTIONS: u32 = 30;

/// Per-request settings derived from the capture config.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

/// Error from a single GET: transport failure or unsuccessful status.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Curl reported an error (timeout, DNS, connection, unsupported scheme, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
}

/// Body and metadata of a successful GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub body: Vec<u8>,
    /// URL after following redirects.
    pub effective_url: String,
    /// `Content-Type` of the final response, if sent.
    pub content_type: Option<String>,
}

/// The fetched HTML document plus the URL relative references resolve against.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub final_url: String,
    pub content_type: Option<String>,
}

/// Performs a GET and returns the full body. Runs in the current thread.
pub fn get(url: &str, opts: &HttpOptions) -> Result<HttpResponse, HttpError> {
    let mut headers: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.useragent(&opts.user_agent)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTIONS)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(HttpError::Status {
            url: url.to_string(),
            code,
        });
    }

    let effective_url = easy
        .effective_url()?
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string());

    Ok(HttpResponse {
        body,
        effective_url,
        content_type: parse::final_content_type(&headers),
    })
}

/// Fetches the page under analysis. Any failure here is fatal for the run.
pub fn fetch_page(url: &str, opts: &HttpOptions) -> Result<FetchedPage, HttpError> {
    let resp = get(url, opts)?;
    tracing::debug!(
        url,
        final_url = %resp.effective_url,
        bytes = resp.body.len(),
        "page fetched"
    );
    Ok(FetchedPage {
        html: decode_body(&resp.body, resp.content_type.as_deref()),
        final_url: resp.effective_url,
        content_type: resp.content_type,
    })
}

/// Decodes a text body using the `charset` of its `Content-Type`.
///
/// A BOM wins over the declared label. Unknown or missing labels fall back to
/// UTF-8; malformed sequences become U+FFFD.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(parse::charset_param)
        .and_then(|label| {
            let found = Encoding::for_label(label.as_bytes());
            if found.is_none() {
                tracing::debug!(label, "unknown charset, decoding as UTF-8");
            }
            found
        })
        .unwrap_or(UTF_8);
    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!(encoding = encoding.name(), "body had malformed sequences");
    }
    text.into_owned()
}
