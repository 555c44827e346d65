//! HTTP front end for a [`Host`]
//!
//! Accepts requests with tiny_http and hands each one to `Host::handle`.
//! With `safe_async` enabled requests are answered one at a time on the
//! accept thread, otherwise each request gets its own thread.

use anyhow::{anyhow, Result};
use athen_core::Host;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Request, Response, Server};

/// Bind the configured address
pub fn bind(addr: SocketAddr) -> Result<Server> {
    Server::http(addr).map_err(|e| anyhow!("Failed to bind {}: {}", addr, e))
}

/// Bind the host's configured address and serve until the listener closes
pub fn serve(host: Arc<Host>) -> Result<()> {
    let addr = host.config().socket_addr();
    let server = bind(addr)?;
    log::info!("Listening on http://{}", addr);
    serve_on(server, host);
    Ok(())
}

/// Serve requests from an already bound server
pub fn serve_on(server: Server, host: Arc<Host>) {
    let sequential = host.config().safe_async;
    for request in server.incoming_requests() {
        if sequential {
            respond(&host, request);
        } else {
            let host = Arc::clone(&host);
            thread::spawn(move || respond(&host, request));
        }
    }
    log::info!("Listener closed");
}

fn respond(host: &Host, request: Request) {
    let method = request.method().to_string();
    let url = request.url().to_string();
    let reply = host.handle(&method, &url);
    log::debug!("{} {} -> {}", method, url, reply.status);

    let mut response = Response::from_data(reply.body.into_bytes()).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response = response.with_header(header);
    }

    if let Err(e) = request.respond(response) {
        log::warn!("Failed to send response for {}: {}", url, e);
    }
}
