//! Config page server on top of `tiny_http`.
//!
//! Polled from the render loop with [`ConfigServer::poll`], so requests are
//! handled on the same thread that owns the store and the display.

use std::io::Read;
use std::net::SocketAddr;

use gauge_common::web::{self, ConfigEvent, Method, PAGE_TEMPLATE, Response as Routed};
use gauge_common::{ConfigStore, KeyValueStore};
use log::{debug, warn};
use thiserror::Error;
use tiny_http::{Header, Response, Server, StatusCode};

/// Larger bodies are truncated; the form is well under this.
const MAX_BODY_LEN: u64 = 4096;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("binding {addr}: {reason}")]
    Bind { addr: SocketAddr, reason: String },
}

pub struct ConfigServer {
    server: Server,
}

impl ConfigServer {
    pub fn bind(addr: SocketAddr) -> Result<Self, ServerError> {
        let server = Server::http(addr).map_err(|err| ServerError::Bind { addr, reason: err.to_string() })?;
        Ok(Self { server })
    }

    /// Handle every pending request. Returns the last config change made.
    pub fn poll<S: KeyValueStore>(
        &mut self,
        store: &mut ConfigStore<S>,
    ) -> Option<ConfigEvent> {
        let mut last = None;
        loop {
            let mut request = match self.server.try_recv() {
                Ok(Some(request)) => request,
                Ok(None) => break,
                Err(err) => {
                    warn!("Config server receive failed: {err}");
                    break;
                }
            };

            let mut body = String::new();
            if let Err(err) = request.as_reader().take(MAX_BODY_LEN).read_to_string(&mut body) {
                warn!("Dropping unreadable request body: {err}");
                body.clear();
            }

            let method = Method::parse(request.method().as_str());
            let target = request.url().to_owned();
            let routed = web::route(&web::Request { method, target: &target, body: &body }, store);
            debug!("{} {target} -> {:?}", request.method(), routed.response);

            let result = match routed.response {
                Routed::Page => request.respond(page_response(store)),
                Routed::Redirect(location) => request.respond(redirect_response(location)),
                Routed::NotFound => request.respond(Response::from_string("Not Found").with_status_code(StatusCode(404))),
            };
            if let Err(err) = result {
                warn!("Config server response failed: {err}");
            }

            if routed.event.is_some() {
                last = routed.event;
            }
        }
        last
    }
}

fn header(
    name: &str,
    value: &str,
) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn page_response<S: KeyValueStore>(store: &ConfigStore<S>) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut html = String::with_capacity(PAGE_TEMPLATE.len() + 256);
    // Writing into a String cannot fail
    web::write_page(&mut html, PAGE_TEMPLATE, store.config()).ok();
    let response = Response::from_string(html);
    match header("Content-Type", "text/html; charset=utf-8") {
        Some(h) => response.with_header(h),
        None => response,
    }
}

fn redirect_response(location: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let response = Response::from_string("").with_status_code(StatusCode(303));
    match header("Location", location) {
        Some(h) => response.with_header(h),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_has_location() {
        let response = redirect_response(web::REDIRECT_SAVED);
        assert_eq!(response.status_code(), StatusCode(303));
        assert!(response.headers().iter().any(|h| h.field.equiv("Location") && h.value.as_str() == "/?saved=1"));
    }

    #[test]
    fn test_page_is_html() {
        let store = ConfigStore::open(gauge_common::config::MemoryStore::new());
        let response = page_response(&store);
        assert_eq!(response.status_code(), StatusCode(200));
        assert!(response.headers().iter().any(|h| h.field.equiv("Content-Type")));
    }

    #[test]
    fn test_bind_reports_address_in_use() {
        let first = ConfigServer::bind(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();
        let addr = first.server.server_addr().to_ip().unwrap();
        let err = ConfigServer::bind(addr).err().unwrap();
        assert!(err.to_string().contains(&addr.to_string()));
    }
}
