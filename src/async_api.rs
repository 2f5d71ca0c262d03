use crate::client::{BusyFlag, ClientConfig, GeneratedLetter, LetterClient, SharedBusyGuard};
use crate::letter::LetterRequest;
use crate::{Error, Result};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Generate(
        LetterRequest,
        SharedBusyGuard,
        oneshot::Sender<Result<GeneratedLetter>>,
    ),
    Ping(oneshot::Sender<Result<()>>),
    Close(oneshot::Sender<()>),
}

/// Async front for [`LetterClient`] backed by a dedicated worker thread.
///
/// The worker owns the blocking client and executes commands in order, so
/// async callers never block their runtime on network I/O.
#[derive(Clone)]
pub struct AsyncLetterClient {
    cmd_tx: Sender<Command>,
    busy: Arc<BusyFlag>,
}

impl AsyncLetterClient {
    /// Spawn the worker and build the client on it.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            let client = match LetterClient::new(config) {
                Ok(c) => c,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Generate(request, guard, resp) => {
                        let result = client.generate(&request);
                        // Released before replying so the caller sees an idle client.
                        drop(guard);
                        let _ = resp.send(result);
                    }
                    Command::Ping(resp) => {
                        let _ = resp.send(client.ping());
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self {
            cmd_tx,
            busy: Arc::new(BusyFlag::default()),
        })
    }

    /// True while a generation is outstanding on any clone of this client.
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Generate a letter; fails with [`Error::Busy`] while another is running.
    ///
    /// The worker holds the busy flag until the request completes, even if
    /// this future is dropped first.
    pub async fn generate(&self, request: LetterRequest) -> Result<GeneratedLetter> {
        let guard = self.busy.try_acquire_shared()?;
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Generate(request, guard, tx))
            .map_err(|_| Error::Other("letter worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Generate canceled: {}", e)))?
    }

    pub async fn ping(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Ping(tx))
            .map_err(|_| Error::Other("letter worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Ping canceled: {}", e)))?
    }

    /// Stop the worker thread.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))
    }
}
