// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transport port and the HTTP adapter that talks to the viewer.
//!
//! Publishing is fire-and-forget: one attempt, synchronous, no retries. Every
//! failure is reported through [`SendOutcome`] and the log, never as an error
//! the caller has to handle.

use std::cell::RefCell;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use cadview_proto::{WireMessage, ACCEPTED_STATUS};
use reqwest::blocking::Client;
use tracing::{debug, error, warn};

/// Result of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Viewer answered 201.
    Delivered,
    /// Nothing is listening on the target port.
    Unreachable {
        /// Port that was tried.
        port: u16,
    },
    /// Viewer answered with a non-201 status.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// Any other failure (timeout, encoding, protocol).
    Failed(String),
}

impl SendOutcome {
    /// Whether the viewer accepted the message.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Abstract port for delivering messages to a viewer.
pub trait Transport {
    /// Deliver `message` to the viewer listening on `port`.
    fn send(&self, message: &WireMessage, port: u16) -> SendOutcome;
}

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    /// Viewer host; loopback unless overridden.
    pub host: IpAddr,
    /// Connect and overall request timeout.
    pub timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            timeout: Duration::from_secs(2),
        }
    }
}

/// Blocking HTTP transport: `POST http://<host>:<port>/` with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    host: IpAddr,
}

impl HttpTransport {
    /// Transport with default options.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_options(TransportOptions::default())
    }

    /// Transport with explicit options.
    pub fn with_options(options: TransportOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(options.timeout)
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            client,
            host: options.host,
        })
    }

    fn url(&self, port: u16) -> String {
        match self.host {
            IpAddr::V4(ip) => format!("http://{ip}:{port}/"),
            IpAddr::V6(ip) => format!("http://[{ip}]:{port}/"),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, message: &WireMessage, port: u16) -> SendOutcome {
        let url = self.url(port);
        let response = match self.client.post(&url).json(message).send() {
            Ok(response) => response,
            Err(err) if err.is_connect() => {
                warn!(port, "cannot connect to viewer, is it running and listening on port {port}?");
                return SendOutcome::Unreachable { port };
            }
            Err(err) => {
                warn!(?err, %url, "failed to publish to viewer");
                return SendOutcome::Failed(err.to_string());
            }
        };

        let status = response.status().as_u16();
        if status == ACCEPTED_STATUS {
            debug!(kind = message.kind(), port, "viewer accepted message");
            return SendOutcome::Delivered;
        }
        let body = response
            .text()
            .unwrap_or_else(|err| format!("<unreadable body: {err}>"));
        error!(status, body = %body, "viewer rejected message");
        SendOutcome::Rejected { status, body }
    }
}

/// Transport that records messages instead of sending them.
///
/// Useful for dry runs and tests; every send counts as delivered.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: RefCell<Vec<(u16, WireMessage)>>,
}

impl RecordingTransport {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far, with their target port.
    pub fn sent(&self) -> Vec<(u16, WireMessage)> {
        self.sent.borrow().clone()
    }

    /// Most recent message, if any.
    pub fn last(&self) -> Option<WireMessage> {
        self.sent.borrow().last().map(|(_, msg)| msg.clone())
    }
}

impl Transport for RecordingTransport {
    fn send(&self, message: &WireMessage, port: u16) -> SendOutcome {
        self.sent.borrow_mut().push((port, message.clone()));
        SendOutcome::Delivered
    }
}

impl<X: Transport + ?Sized> Transport for &X {
    fn send(&self, message: &WireMessage, port: u16) -> SendOutcome {
        (**self).send(message, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn url_targets_loopback_root() {
        let transport = HttpTransport {
            client: Client::new(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        assert_eq!(transport.url(3939), "http://127.0.0.1:3939/");
        let transport = HttpTransport {
            host: IpAddr::V6(Ipv6Addr::LOCALHOST),
            ..transport
        };
        assert_eq!(transport.url(4000), "http://[::1]:4000/");
    }

    #[test]
    fn recording_transport_keeps_order() {
        let rec = RecordingTransport::new();
        let a = cadview_proto::wire::assemble_animation(vec![], 1.0);
        let b = cadview_proto::wire::assemble_animation(vec![], 2.0);
        assert!(rec.send(&a, 1).is_delivered());
        assert!((&rec).send(&b, 2).is_delivered());
        let sent = rec.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1], (2, b.clone()));
        assert_eq!(rec.last(), Some(b));
    }
}
