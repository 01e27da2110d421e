//! WebSocket transport for single request/reply exchanges

use super::types::{TransportMode, WsError, DEFAULT_REPLY_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header, HeaderValue};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{
    connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream,
};

/// One request, one reply, over a fresh connection
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to `uri`, send `payload` and return the first reply as text
    async fn send_and_receive(&self, uri: &str, payload: &str) -> Result<String, WsError>;
}

/// WebSocket transport backed by tokio-tungstenite
pub struct WsTransport {
    connector: Connector,
    /// Upper bound on connect + send + first reply
    reply_timeout: Duration,
}

impl WsTransport {
    /// Create a transport for the given security mode
    ///
    /// Secure mode verifies certificates against the system trust anchors.
    /// Insecure mode accepts any certificate and also allows plain `ws://`.
    pub fn new(mode: TransportMode) -> Result<Self, WsError> {
        let tls = match mode {
            TransportMode::Secure => native_tls::TlsConnector::new(),
            TransportMode::Insecure => native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build(),
        }
        .map_err(|e| WsError::Tls(e.to_string()))?;

        Ok(Self {
            connector: Connector::NativeTls(tls),
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        })
    }

    /// Set how long an exchange may take before the connection is
    /// treated as dropped
    pub fn reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    async fn read_reply(
        uri: &str,
        ws_stream: &mut WebSocketStream<MaybeTlsStream<TcpStream>>,
    ) -> Result<String, WsError> {
        loop {
            match ws_stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Binary(data))) => {
                    return Ok(String::from_utf8_lossy(&data).into_owned())
                }
                Some(Ok(Message::Close(frame))) => return Err(close_error(uri, frame)),
                Some(Ok(_)) => {
                    // Ping/pong are answered by tungstenite
                }
                Some(Err(e)) => return Err(classify_error(uri, e)),
                None => {
                    return Err(WsError::ConnectionDropped {
                        uri: uri.to_string(),
                        reason: "stream ended before a reply".to_string(),
                    })
                }
            }
        }
    }

    async fn exchange_once(&self, uri: &str, payload: &str) -> Result<String, WsError> {
        let request = build_request(uri)?;

        let (mut ws_stream, _response) =
            connect_async_tls_with_config(request, None, false, Some(self.connector.clone()))
                .await
                .map_err(|e| classify_error(uri, e))?;

        tracing::info!(uri, "Connected to validator WebSocket");

        ws_stream
            .send(Message::Text(payload.to_string()))
            .await
            .map_err(|e| classify_error(uri, e))?;
        tracing::debug!(uri, payload, "Sent request");

        let reply = Self::read_reply(uri, &mut ws_stream).await;

        if let Err(e) = ws_stream.close(None).await {
            tracing::debug!(uri, error = %e, "Close handshake failed");
        }

        reply
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send_and_receive(&self, uri: &str, payload: &str) -> Result<String, WsError> {
        match tokio::time::timeout(self.reply_timeout, self.exchange_once(uri, payload)).await {
            Ok(result) => result,
            Err(_) => Err(WsError::ConnectionDropped {
                uri: uri.to_string(),
                reason: format!("no reply within {}s", self.reply_timeout.as_secs_f64()),
            }),
        }
    }
}

/// Build the handshake request carrying the client identifier
fn build_request(
    uri: &str,
) -> Result<tungstenite::handshake::client::Request, WsError> {
    let mut request = uri
        .into_client_request()
        .map_err(|e| WsError::InvalidEndpoint {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

    request
        .headers_mut()
        .insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

    Ok(request)
}

/// Map a tungstenite error onto the monitor's error taxonomy
fn classify_error(uri: &str, err: tungstenite::Error) -> WsError {
    let uri = uri.to_string();
    match err {
        tungstenite::Error::Url(e) => WsError::InvalidEndpoint {
            uri,
            reason: e.to_string(),
        },
        tungstenite::Error::HttpFormat(e) => WsError::InvalidEndpoint {
            uri,
            reason: e.to_string(),
        },
        tungstenite::Error::ConnectionClosed => WsError::ConnectionClosed {
            uri,
            reason: "connection closed normally".to_string(),
        },
        tungstenite::Error::Http(response) => WsError::ConnectionDropped {
            uri,
            reason: format!("server rejected handshake: {}", response.status()),
        },
        other => WsError::ConnectionDropped {
            uri,
            reason: other.to_string(),
        },
    }
}

fn close_error(uri: &str, frame: Option<CloseFrame<'static>>) -> WsError {
    match frame {
        None => WsError::ConnectionClosed {
            uri: uri.to_string(),
            reason: "closed without a reply".to_string(),
        },
        Some(frame) if matches!(frame.code, CloseCode::Normal | CloseCode::Away) => {
            WsError::ConnectionClosed {
                uri: uri.to_string(),
                reason: format!("{} {}", frame.code, frame.reason),
            }
        }
        Some(frame) => WsError::ConnectionDropped {
            uri: uri.to_string(),
            reason: format!("{} {}", frame.code, frame.reason),
        },
    }
}
