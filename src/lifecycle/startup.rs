//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the server from validated configuration
//! - Register the listing plugin when enabled
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Plugins register before the listener is bound, so the started event
//!   sees every subscriber

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::shutdown::Shutdown;
use crate::listing::OutputSink;
use crate::plugin::{ListOptions, RoutesList};

/// Build the server described by `config`.
///
/// `out` replaces the listing plugin's stdout sink when given.
pub fn build_server(config: ServerConfig, out: Option<OutputSink>) -> Result<HttpServer, ServerError> {
    let listing = config.listing.clone();
    let mut server = HttpServer::from_config(config)?;

    if listing.enabled {
        let mut options = ListOptions::from_config(&listing);
        if let Some(out) = out {
            options = options.out(out);
        }
        server.register(RoutesList, options)?;
    } else {
        tracing::debug!("Route listing disabled");
    }

    tracing::info!(
        routes = server.table().len(),
        plugins = server.plugins().len(),
        "Server initialized"
    );
    Ok(server)
}

/// Bind `server` to its configured address and serve until `shutdown`.
pub async fn serve(server: HttpServer, shutdown: &Shutdown) -> Result<(), ServerError> {
    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    server.run(listener, shutdown.subscribe()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::config::parse_config;
    use crate::lifecycle::events::ServerEvent;

    #[test]
    fn test_build_registers_listing() {
        let config = parse_config(
            r#"
            [listing]
            theme = "no-color"
            columns = ["method", "path"]

            [[routes]]
            method = "GET"
            path = "/a"
            "#,
        )
        .unwrap();

        let blocks = Arc::new(Mutex::new(Vec::new()));
        let sink_blocks = blocks.clone();
        let out: OutputSink = Arc::new(move |block: &str| {
            sink_blocks.lock().unwrap().push(block.to_string());
        });

        let server = build_server(config, Some(out)).unwrap();
        assert_eq!(server.plugins().len(), 1);
        server.events().emit(ServerEvent::Start);
        assert_eq!(
            blocks.lock().unwrap().as_slice(),
            ["Method  Path\n------  ----\nGET     /a".to_string()]
        );
    }

    #[test]
    fn test_listing_can_be_disabled() {
        let config = parse_config("[listing]\nenabled = false").unwrap();
        let server = build_server(config, None).unwrap();
        assert!(server.plugins().is_empty());
        assert!(RoutesList::lister(&server).is_none());
    }
}
