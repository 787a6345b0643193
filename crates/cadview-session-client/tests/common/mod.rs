// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-process stand-in for the viewer's HTTP endpoint.
#![allow(dead_code, clippy::unwrap_used)]

use std::net::TcpListener as StdListener;
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::sync::oneshot;

#[derive(Clone)]
struct ViewerState {
    received: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
    reply: &'static str,
}

async fn accept(
    State(state): State<ViewerState>,
    Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
    state.received.lock().unwrap().push(body);
    (state.status, state.reply)
}

/// Viewer stub answering every `POST /` with a fixed status and body.
pub struct StubViewer {
    /// Port the stub listens on.
    pub port: u16,
    received: Arc<Mutex<Vec<Value>>>,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl StubViewer {
    /// Stub that accepts like the real viewer (`201 done`).
    pub fn accepting() -> Self {
        Self::start(201, "done")
    }

    /// Stub answering with `status` and `reply`.
    pub fn start(status: u16, reply: &'static str) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = ViewerState {
            received: Arc::clone(&received),
            status: StatusCode::from_u16(status).unwrap(),
            reply,
        };
        let (port_tx, port_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                port_tx.send(listener.local_addr().unwrap().port()).unwrap();
                let app = Router::new().route("/", post(accept)).with_state(state);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .unwrap();
            });
        });
        let port = port_rx.recv().unwrap();
        Self {
            port,
            received,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        }
    }

    /// JSON bodies received so far, in arrival order.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for StubViewer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// A loopback port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = StdListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
