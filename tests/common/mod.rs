//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::http::Method;
use routes_list::listing::OutputSink;
use routes_list::routing::{AuthMode, AuthSettings, Route};
use routes_list::HttpServer;

/// Everything an [`OutputSink`] was handed, one entry per call.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<String>>>);

impl Captured {
    pub fn sink(&self) -> OutputSink {
        let blocks = self.0.clone();
        Arc::new(move |block: &str| blocks.lock().unwrap().push(block.to_string()))
    }

    pub fn blocks(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// The three sample routes: no auth, one scope, and mixed scope kinds.
pub fn sample_routes() -> Vec<Route> {
    vec![
        Route::new(Method::POST, "/first/path/{id}"),
        Route::new(Method::PATCH, "/second").auth(
            AuthSettings::strategy("session")
                .mode(AuthMode::Required)
                .scope(["admin"]),
        ),
        Route::new(Method::GET, "/third/path").auth(
            AuthSettings::strategy("session")
                .mode(AuthMode::Optional)
                .scope(["admin", "+req", "!not"]),
        ),
    ]
}

/// A server serving [`sample_routes`], each answering with its path.
pub fn sample_server() -> HttpServer {
    let mut server = HttpServer::default();
    for route in sample_routes() {
        let body = route.path.clone();
        server
            .route(route, move || async move { body })
            .unwrap();
    }
    server
}
