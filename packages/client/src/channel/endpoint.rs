//! Endpoint resolution, done once at startup.
//!
//! A local host (or no origin at all) talks to the development relay on
//! port 4000; a deployed origin talks to the relay on the same origin.

use tokio_tungstenite::tungstenite::http::Uri;

use super::ChannelError;

/// Relay used during local development
pub const LOCAL_ENDPOINT: &str = "ws://localhost:4000/ws";

/// Path of the relay's WebSocket endpoint
const WS_PATH: &str = "/ws";

/// Resolve the WebSocket endpoint.
///
/// # Arguments
///
/// * `explicit` - A `ws://` / `wss://` URL that overrides everything else
/// * `origin` - The deployed origin (`http(s)://host[:port]`), if any
pub fn resolve_endpoint(
    explicit: Option<&str>,
    origin: Option<&str>,
) -> Result<String, ChannelError> {
    if let Some(url) = explicit {
        let uri: Uri = url
            .parse()
            .map_err(|_| ChannelError::InvalidEndpoint(url.to_string()))?;
        return match uri.scheme_str() {
            Some("ws") | Some("wss") if uri.host().is_some() => Ok(url.to_string()),
            _ => Err(ChannelError::InvalidEndpoint(url.to_string())),
        };
    }

    let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) else {
        return Ok(LOCAL_ENDPOINT.to_string());
    };

    let uri: Uri = origin
        .parse()
        .map_err(|_| ChannelError::InvalidEndpoint(origin.to_string()))?;
    let host = uri
        .host()
        .ok_or_else(|| ChannelError::InvalidEndpoint(origin.to_string()))?;
    if is_local_host(host) {
        return Ok(LOCAL_ENDPOINT.to_string());
    }

    let scheme = match uri.scheme_str() {
        Some("https") => "wss",
        Some("http") => "ws",
        _ => return Err(ChannelError::InvalidEndpoint(origin.to_string())),
    };
    let authority = match uri.port_u16() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Ok(format!("{scheme}://{authority}{WS_PATH}"))
}

fn is_local_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1")
}
