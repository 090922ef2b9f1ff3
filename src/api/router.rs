// Message Relay
// Channel-based request/response between callers and the service instances

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::background::BackgroundService;
use super::content::ContentAnalyzer;
use super::error::ServiceError;
use super::protocol::{parse_request, Request, Response};

struct Envelope {
    request: Request,
    reply: oneshot::Sender<Response>,
}

/// Cloneable sender side of the relay.
#[derive(Clone)]
pub struct ServiceHandle {
    tx: mpsc::Sender<Envelope>,
}

impl ServiceHandle {
    pub async fn request(&self, request: Request) -> Result<Response, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| ServiceError::ChannelClosed)?;
        rx.await.map_err(|_| ServiceError::ChannelClosed)
    }

    /// Entry point for untyped transports; never fails, errors become responses.
    pub async fn request_value(&self, value: Value) -> Response {
        match parse_request(value) {
            Ok(request) => self.request(request).await.unwrap_or_else(Response::from),
            Err(e) => {
                warn!(error = %e, "request.rejected");
                Response::from(e)
            }
        }
    }
}

pub struct ServiceRouter {
    background: BackgroundService,
    content: ContentAnalyzer,
}

impl ServiceRouter {
    pub fn new(background: BackgroundService, content: ContentAnalyzer) -> Self {
        Self { background, content }
    }

    pub async fn dispatch(&self, request: Request) -> Response {
        let action = request.action();
        debug!(action, "request.received");

        let result = match request {
            Request::AnalyzePage { text, path } => self
                .content
                .analyze_page(text, path)
                .await
                .and_then(|summary| Response::with_data(&summary)),
            other => self.background.handle(other).await,
        };

        result.unwrap_or_else(|e| {
            warn!(action, error = %e, "request.failed");
            Response::from(e)
        })
    }

    /// Process envelopes in arrival order until every handle is dropped
    async fn serve(self, mut rx: mpsc::Receiver<Envelope>) {
        while let Some(Envelope { request, reply }) = rx.recv().await {
            let response = self.dispatch(request).await;
            // Caller may have stopped waiting
            let _ = reply.send(response);
        }
        info!("router.stopped");
    }

    pub fn spawn(self, capacity: usize) -> (ServiceHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity);
        let task = tokio::spawn(self.serve(rx));
        (ServiceHandle { tx }, task)
    }
}
