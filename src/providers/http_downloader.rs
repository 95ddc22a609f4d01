use std::{path::Path, time::Duration};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::io::AsyncWriteExt;

use crate::{
    error::{DownloadError, error_chain},
    models::proxy_config::ProxyConfig,
};

use super::{
    config_store::ConfigStore, downloader::Downloader, environment::Environment,
    proxy_resolver::ProxyResolver,
};

pub struct HttpDownloader<C, E> {
    proxy_resolver: ProxyResolver<C, E>,
    timeout: Option<Duration>,
}

impl<C: ConfigStore, E: Environment> HttpDownloader<C, E> {
    pub fn new(proxy_resolver: ProxyResolver<C, E>, timeout: Option<Duration>) -> Self {
        HttpDownloader {
            proxy_resolver,
            timeout,
        }
    }
}

fn build_client(
    url: &str,
    config: &ProxyConfig,
    timeout: Option<Duration>,
) -> Result<reqwest::Client, DownloadError> {
    let request_error = |message: String| DownloadError::Request {
        url: url.to_string(),
        message,
    };

    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| request_error(format!("Invalid header name {}, {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| request_error(format!("Invalid header value {}, {}", value, e)))?;
        headers.insert(name, value);
    }

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .danger_accept_invalid_certs(config.accept_invalid_certs);

    // Proxy settings were resolved already; keep reqwest from reading the
    // environment a second time.
    builder = match &config.proxy {
        Some(proxy) => builder.proxy(
            reqwest::Proxy::all(proxy.as_str()).map_err(|e| {
                request_error(format!("Invalid proxy {}, {}", proxy, error_chain(&e)))
            })?,
        ),
        None => builder.no_proxy(),
    };

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| request_error(error_chain(&e)))
}

/// The server's own status text when it sent a non-standard one.
fn reason_phrase(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .or_else(|| response.status().canonical_reason())
        .unwrap_or_default()
        .to_string()
}

impl<C: ConfigStore, E: Environment> Downloader for HttpDownloader<C, E> {
    async fn download(&self, url: &str, destination: &Path) -> Result<(), DownloadError> {
        let transport_error = |e: reqwest::Error| DownloadError::Transport {
            url: url.to_string(),
            message: error_chain(&e),
        };

        let config = self.proxy_resolver.resolve().await;
        tracing::debug!(
            proxy = config.proxy.as_deref().unwrap_or("none"),
            user_agent = config.user_agent().unwrap_or_default(),
            "Resolved connection settings"
        );

        let client = build_client(url, &config, self.timeout)?;

        let request = client
            .get(url)
            .build()
            .map_err(|e| DownloadError::Request {
                url: url.to_string(),
                message: error_chain(&e),
            })?;

        tracing::info!("Starting download of {}", url);
        let mut response = client.execute(request).await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                reason: reason_phrase(&response),
            });
        }

        tracing::info!("Response received, writing file to {}", destination.display());
        let write_error = |source: std::io::Error| DownloadError::Write {
            path: destination.to_path_buf(),
            source,
        };
        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(write_error)?;

        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            file.write_all(&chunk).await.map_err(write_error)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(write_error)?;

        tracing::info!("Downloaded {} bytes from {}", written, url);
        Ok(())
    }
}
