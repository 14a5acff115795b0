//! HTTP configuration interface, transport independent.
//!
//! The host hands each request to [`route`], serves [`Response::Page`] by
//! rendering [`PAGE_TEMPLATE`] with [`write_page`], and reacts to the returned
//! [`ConfigEvent`] (logging, rebuilding telemetry, redrawing the face).

mod form;
mod page;

pub use form::{form_pairs, parse_form, url_decode, MAX_VALUE_LEN};
pub use page::{form_fields, write_page, FormField, PAGE_TEMPLATE};

use crate::config::{ConfigStore, GaugeConfig, KeyValueStore, SaveOutcome, StorageError};

pub const REDIRECT_SAVED: &str = "/?saved=1";
pub const REDIRECT_RESET: &str = "/?reset=1";
pub const REDIRECT_ERROR: &str = "/?error=1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

impl Method {
    pub fn parse(method: &str) -> Self {
        match method {
            "GET" => Method::Get,
            "POST" => Method::Post,
            _ => Method::Other,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Request<'a> {
    pub method: Method,
    /// Request target, query string included.
    pub target: &'a str,
    pub body: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// 200 with the rendered config page.
    Page,
    /// 303 to the given location.
    Redirect(&'static str),
    NotFound,
}

/// A configuration change made while handling a request.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigEvent {
    Saved(SaveOutcome),
    Reset(GaugeConfig),
    Failed(StorageError),
}

impl ConfigEvent {
    /// True when the live configuration changed.
    pub const fn applied(&self) -> bool { !matches!(self, ConfigEvent::Failed(_)) }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Routed {
    pub response: Response,
    pub event: Option<ConfigEvent>,
}

impl Routed {
    const fn plain(response: Response) -> Self { Self { response, event: None } }
}

/// Dispatch one request against the configuration store.
pub fn route<S: KeyValueStore>(
    request: &Request<'_>,
    store: &mut ConfigStore<S>,
) -> Routed {
    let path = request.target.split('?').next().unwrap_or("");

    match (request.method, path) {
        (Method::Get, "/") => Routed::plain(Response::Page),
        (Method::Post, "/save") => {
            let update = parse_form(request.body);
            match store.save(&update) {
                Ok(outcome) => Routed {
                    response: Response::Redirect(REDIRECT_SAVED),
                    event: Some(ConfigEvent::Saved(outcome)),
                },
                Err(err) => failed(err),
            }
        }
        (Method::Post, "/reset") => match store.reset_to_defaults() {
            Ok(config) => Routed {
                response: Response::Redirect(REDIRECT_RESET),
                event: Some(ConfigEvent::Reset(*config)),
            },
            Err(err) => failed(err),
        },
        _ => Routed::plain(Response::NotFound),
    }
}

fn failed(err: StorageError) -> Routed {
    Routed { response: Response::Redirect(REDIRECT_ERROR), event: Some(ConfigEvent::Failed(err)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;

    fn request<'a>(method: Method, target: &'a str, body: &'a str) -> Request<'a> { Request { method, target, body } }

    #[test]
    fn test_get_root_serves_page() {
        let mut store = ConfigStore::open(MemoryStore::new());
        let routed = route(&request(Method::Get, "/?saved=1", ""), &mut store);
        assert_eq!(routed, Routed { response: Response::Page, event: None });
    }

    #[test]
    fn test_unknown_route_is_not_found() {
        let mut store = ConfigStore::open(MemoryStore::new());
        assert_eq!(route(&request(Method::Get, "/favicon.ico", ""), &mut store).response, Response::NotFound);
        assert_eq!(route(&request(Method::Get, "/save", ""), &mut store).response, Response::NotFound);
        assert_eq!(route(&request(Method::Other, "/", ""), &mut store).response, Response::NotFound);
    }

    #[test]
    fn test_save_applies_and_redirects() {
        let mut store = ConfigStore::open(MemoryStore::new());
        let routed = route(&request(Method::Post, "/save", "oilWarn=14&vdR2=-5&simHL=on"), &mut store);

        assert_eq!(routed.response, Response::Redirect(REDIRECT_SAVED));
        let Some(ConfigEvent::Saved(outcome)) = routed.event else {
            panic!("expected a save event, got {:?}", routed.event);
        };
        assert!(outcome.corrections.divider_reset);
        assert_eq!(store.config().oil_pressure_min_warn, 14.0);
        // Absent checkboxes turn off
        assert!(!store.config().use_simulated_data);
        assert!(store.config().use_simulated_headlight);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = ConfigStore::open(MemoryStore::new());
        route(&request(Method::Post, "/save", "blDay=10"), &mut store);
        let routed = route(&request(Method::Post, "/reset", ""), &mut store);

        assert_eq!(routed.response, Response::Redirect(REDIRECT_RESET));
        assert_eq!(routed.event, Some(ConfigEvent::Reset(GaugeConfig::DEFAULT)));
        assert_eq!(*store.config(), GaugeConfig::DEFAULT);
    }

    /// Backend that reads as empty and refuses every write.
    struct ReadOnly;

    impl KeyValueStore for ReadOnly {
        fn get_bool(&mut self, _: &str) -> Option<bool> { None }
        fn get_f32(&mut self, _: &str) -> Option<f32> { None }
        fn get_i32(&mut self, _: &str) -> Option<i32> { None }
        fn put_bool(&mut self, _: &str, _: bool) -> Result<(), StorageError> { Err(StorageError::Medium) }
        fn put_f32(&mut self, _: &str, _: f32) -> Result<(), StorageError> { Err(StorageError::Medium) }
        fn put_i32(&mut self, _: &str, _: i32) -> Result<(), StorageError> { Err(StorageError::Medium) }
        fn clear(&mut self) -> Result<(), StorageError> { Err(StorageError::Medium) }
    }

    #[test]
    fn test_storage_failure_redirects_to_error() {
        let mut store = ConfigStore::open(ReadOnly);
        let routed = route(&request(Method::Post, "/save", "oilWarn=20"), &mut store);
        assert_eq!(routed.response, Response::Redirect(REDIRECT_ERROR));
        assert_eq!(routed.event, Some(ConfigEvent::Failed(StorageError::Medium)));
        assert!(!routed.event.unwrap().applied());
        assert_eq!(store.config().oil_pressure_min_warn, 10.0);

        let routed = route(&request(Method::Post, "/reset", ""), &mut store);
        assert_eq!(routed.response, Response::Redirect(REDIRECT_ERROR));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("GET"), Method::Get);
        assert_eq!(Method::parse("POST"), Method::Post);
        assert_eq!(Method::parse("PUT"), Method::Other);
    }
}
