use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use chrono::{DateTime, Local, Utc};
use news_logging::{news_debug, news_error, news_warn};

use crate::export::{
    export_all, CsvSpreadsheetWriter, ExportError, ExportSummary, SpreadsheetWriter,
    XlsxSpreadsheetWriter,
};
use crate::fetch::{ReqwestSearchClient, SearchClient, SearchSettings};
use crate::{FetchError, RequestId, SearchRequest, SearchResponse};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// File format produced by exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn writer(self, output_dir: PathBuf) -> Arc<dyn SpreadsheetWriter> {
        match self {
            ExportFormat::Xlsx => Arc::new(XlsxSpreadsheetWriter::new(output_dir)),
            ExportFormat::Csv => Arc::new(CsvSpreadsheetWriter::new(output_dir)),
        }
    }
}

#[derive(Clone)]
pub struct EngineConfig {
    pub settings: SearchSettings,
    pub output_dir: PathBuf,
    pub export_format: ExportFormat,
    /// Timestamp source for export file names.
    pub generated_at: Clock,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            settings: SearchSettings::default(),
            output_dir,
            export_format: ExportFormat::default(),
            generated_at: Arc::new(Utc::now),
        }
    }
}

/// A command could not be handed to the background worker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("engine worker is not running")]
    Stopped,
}

#[derive(Debug)]
pub enum EngineEvent {
    SearchCompleted {
        request_id: RequestId,
        result: Result<SearchResponse, FetchError>,
    },
    ExportCompleted {
        request_id: RequestId,
        result: Result<ExportSummary, ExportError>,
    },
}

enum EngineCommand {
    Search {
        request_id: RequestId,
        request: SearchRequest,
    },
    Export {
        request_id: RequestId,
        request: SearchRequest,
    },
}

struct Workers {
    client: Arc<dyn SearchClient>,
    writer: Arc<dyn SpreadsheetWriter>,
    clock: Clock,
}

/// Runs searches and exports on a background tokio runtime.
///
/// Every command is executed concurrently; completions arrive in whatever
/// order the backend answers, tagged with the caller's request id.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let client = Arc::new(ReqwestSearchClient::new(config.settings));
        let writer = config.export_format.writer(config.output_dir);
        Self::with_workers(client, writer, config.generated_at)
    }

    pub fn with_workers(
        client: Arc<dyn SearchClient>,
        writer: Arc<dyn SpreadsheetWriter>,
        clock: Clock,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let workers = Arc::new(Workers {
            client,
            writer,
            clock,
        });

        thread::spawn(move || {
            // Returning drops the command receiver, so later sends report `Stopped`.
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    news_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let workers = workers.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(workers.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Queues a search. On `Err` no completion event will ever arrive for
    /// `request_id`.
    pub fn search(
        &self,
        request_id: RequestId,
        request: SearchRequest,
    ) -> Result<(), EngineError> {
        self.send(EngineCommand::Search {
            request_id,
            request,
        })
    }

    /// Queues an export. Same delivery contract as [`EngineHandle::search`].
    pub fn export(
        &self,
        request_id: RequestId,
        request: SearchRequest,
    ) -> Result<(), EngineError> {
        self.send(EngineCommand::Export {
            request_id,
            request,
        })
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.cmd_tx.send(command).map_err(|_| {
            news_warn!("Engine command dropped; worker stopped");
            EngineError::Stopped
        })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    workers: &Workers,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Search {
            request_id,
            request,
        } => {
            let result = workers.client.search(&request).await;
            if let Err(err) = &result {
                news_warn!("Search request_id={} failed: {}", request_id, err);
            }
            EngineEvent::SearchCompleted { request_id, result }
        }
        EngineCommand::Export {
            request_id,
            request,
        } => {
            let generated_at = (workers.clock)();
            let result = export_all(
                workers.client.as_ref(),
                workers.writer.as_ref(),
                &request,
                generated_at,
                &Local,
            )
            .await;
            if let Err(err) = &result {
                news_warn!("Export request_id={} failed: {}", request_id, err);
            }
            EngineEvent::ExportCompleted { request_id, result }
        }
    };
    if event_tx.send(event).is_err() {
        news_debug!("Engine event dropped; receiver gone");
    }
}
