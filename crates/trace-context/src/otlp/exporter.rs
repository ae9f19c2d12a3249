//! Batching OTLP/HTTP span exporter.
//!
//! Spans are queued through a bounded channel so request handlers never wait
//! on the collector. A background task posts protobuf batches when they fill
//! up, on a fixed interval, and once more on shutdown.

use std::sync::Arc;
use std::time::Duration;

use prost::Message;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use super::proto::export_request;
use crate::sink::SpanSink;
use crate::span::FinishedSpan;

const DEFAULT_BATCH_SIZE: usize = 512;
const DEFAULT_QUEUE_CAPACITY: usize = 2048;
const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(10);
const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

/// Settings for [`OtlpHttpExporter`].
#[derive(Debug, Clone)]
pub struct OtlpExporterSettings {
    /// Collector `host:port`, without scheme.
    pub endpoint: String,
    /// Value of the `service.name` resource attribute.
    pub service_name: String,
    /// Spans per export request.
    pub batch_size: usize,
    /// Spans buffered before new ones are dropped.
    pub queue_capacity: usize,
    /// Maximum delay before a partial batch is exported.
    pub flush_interval: Duration,
    /// Timeout for one export request.
    pub export_timeout: Duration,
}

impl OtlpExporterSettings {
    /// Settings with the usual batch processor defaults.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            service_name: service_name.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            export_timeout: DEFAULT_EXPORT_TIMEOUT,
        }
    }

    fn traces_url(&self) -> String {
        format!("http://{}/v1/traces", self.endpoint.trim_end_matches('/'))
    }
}

/// Sink half of the exporter; cheap to share between workers.
#[derive(Debug, Clone)]
pub struct OtlpHttpSink {
    sender: mpsc::Sender<FinishedSpan>,
}

impl SpanSink for OtlpHttpSink {
    fn export(&self, span: FinishedSpan) {
        if let Err(error) = self.sender.try_send(span) {
            match error {
                mpsc::error::TrySendError::Full(_) => {
                    debug!("span queue full; dropping span");
                }
                mpsc::error::TrySendError::Closed(_) => {
                    debug!("span exporter stopped; dropping span");
                }
            }
        }
    }
}

/// Owner of the background export task.
#[derive(Debug)]
pub struct OtlpHttpExporter {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl OtlpHttpExporter {
    /// Spawn the export task on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn spawn(settings: OtlpExporterSettings) -> Result<(Self, Arc<OtlpHttpSink>), reqwest::Error> {
        let client = Client::builder().timeout(settings.export_timeout).build()?;
        let (sender, receiver) = mpsc::channel(settings.queue_capacity.max(1));
        let (shutdown, shutdown_rx) = oneshot::channel();
        let worker = ExportWorker {
            client,
            url: settings.traces_url(),
            service_name: settings.service_name,
            batch_size: settings.batch_size.max(1),
        };
        let task = tokio::spawn(worker.run(receiver, shutdown_rx, settings.flush_interval));
        Ok((Self { shutdown, task }, Arc::new(OtlpHttpSink { sender })))
    }

    /// Flush queued spans and stop the export task, waiting at most `grace`.
    pub async fn shutdown(self, grace: Duration) {
        let Self { shutdown, task } = self;
        // The worker may already be gone; there is nothing left to signal then.
        let _ignored = shutdown.send(());
        match tokio::time::timeout(grace, task).await {
            Ok(Ok(())) => debug!("span exporter drained"),
            Ok(Err(error)) => warn!(%error, "span exporter task failed"),
            Err(_) => warn!("span exporter did not drain before the grace period"),
        }
    }
}

struct ExportWorker {
    client: Client,
    url: String,
    service_name: String,
    batch_size: usize,
}

impl ExportWorker {
    async fn run(
        self,
        mut receiver: mpsc::Receiver<FinishedSpan>,
        mut shutdown: oneshot::Receiver<()>,
        flush_interval: Duration,
    ) {
        let mut batch = Vec::with_capacity(self.batch_size);
        let mut ticker = interval_at(Instant::now() + flush_interval, flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    receiver.close();
                    while let Ok(span) = receiver.try_recv() {
                        batch.push(span);
                    }
                    break;
                }
                received = receiver.recv() => match received {
                    Some(span) => {
                        batch.push(span);
                        if batch.len() >= self.batch_size {
                            self.flush(&mut batch).await;
                        }
                    }
                    None => break,
                },
                _ = ticker.tick() => self.flush(&mut batch).await,
            }
        }

        self.flush(&mut batch).await;
    }

    async fn flush(&self, batch: &mut Vec<FinishedSpan>) {
        while !batch.is_empty() {
            let take = batch.len().min(self.batch_size);
            let chunk = batch.drain(..take).collect::<Vec<_>>();
            self.post(chunk).await;
        }
    }

    async fn post(&self, spans: Vec<FinishedSpan>) {
        let count = spans.len();
        let payload = export_request(&self.service_name, spans).encode_to_vec();
        let sent = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
            .body(payload)
            .send()
            .await;
        match sent {
            Ok(response) if response.status().is_success() => {
                debug!(spans = count, "exported spans");
            }
            Ok(response) => {
                warn!(
                    spans = count,
                    status = response.status().as_u16(),
                    "collector rejected span export"
                );
            }
            Err(error) => {
                warn!(spans = count, %error, "span export failed");
            }
        }
    }
}
