//! Placeholder resolution against an HTTP request.

use axum::extract::{ConnectInfo, OriginalUri};
use axum::http::{header, Extensions, HeaderMap, Method, Request, Uri, Version};
use std::net::SocketAddr;

use crate::placeholder::Replacer;

/// Resolves request attributes such as `{uri}`, `{>User-Agent}` or `{?page}`.
///
/// Borrows the parts of the request it reads, so it works for any body type.
#[derive(Debug, Clone, Copy)]
pub struct RequestReplacer<'a> {
    method: &'a Method,
    uri: &'a Uri,
    version: Version,
    headers: &'a HeaderMap,
    extensions: &'a Extensions,
}

impl<'a> RequestReplacer<'a> {
    pub fn new<B>(req: &'a Request<B>) -> Self {
        Self {
            method: req.method(),
            uri: req.uri(),
            version: req.version(),
            headers: req.headers(),
            extensions: req.extensions(),
        }
    }

    /// The URI as received, before any nested router stripped a prefix.
    fn original_uri(&self) -> &'a Uri {
        self.extensions
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or(self.uri)
    }

    fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn host(&self) -> String {
        self.header(header::HOST.as_str())
            .map(str::to_string)
            .or_else(|| self.uri.authority().map(|a| a.to_string()))
            .unwrap_or_default()
    }

    fn scheme(&self) -> String {
        self.uri
            .scheme_str()
            .or_else(|| self.header("x-forwarded-proto"))
            .unwrap_or("http")
            .to_string()
    }

    fn request_uri(&self) -> String {
        let uri = self.original_uri();
        uri.path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string())
    }

    fn remote(&self) -> Option<SocketAddr> {
        self.extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0)
    }

    fn query_arg(&self, name: &str) -> String {
        self.uri
            .query()
            .and_then(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.into_owned())
            })
            .unwrap_or_default()
    }

    fn cookie(&self, name: &str) -> String {
        self.headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
            .unwrap_or_default()
    }
}

impl Replacer for RequestReplacer<'_> {
    fn resolve(&self, key: &str) -> Option<String> {
        if let Some(name) = key.strip_prefix('>') {
            return Some(self.header(name).unwrap_or_default().to_string());
        }
        if let Some(name) = key.strip_prefix('?') {
            return Some(self.query_arg(name));
        }
        if let Some(name) = key.strip_prefix('~') {
            return Some(self.cookie(name));
        }

        let value = match key {
            "method" => self.method.as_str().to_string(),
            "scheme" => self.scheme(),
            "host" => self.host(),
            "hostonly" => host_only(&self.host()).to_string(),
            "path" => self.uri.path().to_string(),
            "path_escaped" => escape(self.uri.path()),
            "query" => self.uri.query().unwrap_or_default().to_string(),
            "query_escaped" => escape(self.uri.query().unwrap_or_default()),
            "uri" => self.request_uri(),
            "uri_escaped" => escape(&self.request_uri()),
            "proto" => format!("{:?}", self.version),
            "remote" => self.remote().map(|a| a.ip().to_string()).unwrap_or_default(),
            "port" => self.remote().map(|a| a.port().to_string()).unwrap_or_default(),
            "request_id" => self.header("x-request-id").unwrap_or_default().to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn escape(input: &str) -> String {
    url::form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

/// Strip the port from a host value, unwrapping bracketed IPv6 literals.
fn host_only(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}
