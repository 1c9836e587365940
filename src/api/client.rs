use crate::error::Result;
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::time::Duration;

/// A downloaded document.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedDocument {
    /// The `charset` parameter of the content type, if any.
    fn charset(&self) -> Option<&str> {
        self.content_type
            .as_deref()?
            .split(';')
            .filter_map(|param| param.trim().split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.trim().trim_matches('"'))
    }

    /// The body decoded with the declared charset. UTF-8 when there is none
    /// or it is unknown.
    pub fn text(&self) -> String {
        let encoding = self
            .charset()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        let (text, _, _) = encoding.decode(&self.body);

        text.into_owned()
    }
}

/// HTTP access used by the pipeline.
///
/// Timeouts, retries and TLS are up to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body, return the response body as text.
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String>;

    async fn get(&self, url: &str) -> Result<FetchedDocument>;
}

pub fn build_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let reqwest_client = reqwest::ClientBuilder::new()
        .user_agent(concat!("dsb-timetable/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?;

    let retry = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    let client = reqwest_middleware::ClientBuilder::new(reqwest_client)
        .with(RetryTransientMiddleware::new_with_policy(retry))
        .build();

    Ok(client)
}

#[async_trait]
impl Transport for ClientWithMiddleware {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String> {
        Ok(self
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    async fn get(&self, url: &str) -> Result<FetchedDocument> {
        let response = ClientWithMiddleware::get(self, url).send().await?.error_for_status()?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(FetchedDocument { content_type, body })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn page(content_type: Option<&str>, body: &[u8]) -> FetchedDocument {
        FetchedDocument {
            content_type: content_type.map(str::to_string),
            body: body.to_vec(),
        }
    }

    #[test]
    fn latin1_pages_keep_umlauts() {
        let doc = page(Some("text/html; charset=iso-8859-1"), b"<td>Raum\xe4nderung</td>");
        assert_eq!(doc.text(), "<td>Raum\u{e4}nderung</td>");

        let doc = page(Some("text/html; Charset=\"windows-1252\""), b"Gr\xfc\xdfe");
        assert_eq!(doc.text(), "Gr\u{fc}\u{df}e");
    }

    #[test]
    fn utf8_is_the_fallback() {
        let body = "Raum\u{e4}nderung".as_bytes();
        assert_eq!(page(None, body).text(), "Raum\u{e4}nderung");
        assert_eq!(page(Some("text/html"), body).text(), "Raum\u{e4}nderung");
        assert_eq!(page(Some("text/html; charset=bogus"), body).text(), "Raum\u{e4}nderung");
    }
}
