use anyhow::{Context, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use url::Url;

use crate::config::Color;
use crate::surface::Snapshot;

/// Where the canvas engine hands off state that must outlive the session.
/// Submissions are fire-and-forget, so gesture handling never waits on the
/// network.
pub trait SaveSink {
    fn submit_surface(&mut self, snapshot: &Snapshot);
    fn submit_background(&mut self, color: Color);
}

/// Remote storage for one note's canvas.
pub trait SurfaceStore: Send + Sync {
    /// Fetch the stored canvas PNG. `None` when the note has none yet.
    fn fetch_surface(&self) -> Result<Option<Vec<u8>>>;
    fn store_surface(&self, png: &[u8]) -> Result<()>;
    fn store_background(&self, color: Color) -> Result<()>;
}

/// HTTP client for the note server's canvas endpoints.
pub struct NoteServer {
    client: Client,
    base: Url,
    note_token: String,
    note_id: u64,
}

impl NoteServer {
    pub fn new(mut base: Url, note_token: impl Into<String>, note_id: u64) -> Result<Self> {
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("note-canvas uploader")
            .build()
            .context("build http client")?;
        Ok(NoteServer {
            client,
            base,
            note_token: note_token.into(),
            note_id,
        })
    }

    fn canvas_url(&self) -> Result<Url> {
        self.base
            .join(&format!("notes/{}/canvas", self.note_token))
            .context("build canvas url")
    }

    fn save_url(&self) -> Result<Url> {
        self.base
            .join(&format!("notes/{}/canvas/save", self.note_token))
            .context("build canvas save url")
    }

    fn background_url(&self) -> Result<Url> {
        self.base
            .join(&format!("notes/{}/canvas/background", self.note_id))
            .context("build background url")
    }
}

impl SurfaceStore for NoteServer {
    fn fetch_surface(&self) -> Result<Option<Vec<u8>>> {
        let resp = self
            .client
            .get(self.canvas_url()?)
            .send()
            .context("fetch stored canvas")?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let bytes = resp.bytes().context("read stored canvas body")?;
        Ok(Some(bytes.to_vec()))
    }

    fn store_surface(&self, png: &[u8]) -> Result<()> {
        let part = Part::bytes(png.to_vec())
            .file_name("canvas.png")
            .mime_str("image/png")
            .context("build canvas upload part")?;
        let form = Form::new().part("file", part);
        self.client
            .post(self.save_url()?)
            .multipart(form)
            .send()
            .context("upload canvas")?
            .error_for_status()
            .context("canvas upload rejected")?;
        Ok(())
    }

    fn store_background(&self, color: Color) -> Result<()> {
        let body = serde_json::json!({ "background": color.to_hex() }).to_string();
        self.client
            .post(self.background_url()?)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .context("upload background color")?
            .error_for_status()
            .context("background upload rejected")?;
        Ok(())
    }
}

enum UploadJob {
    Surface(Snapshot),
    Background(Color),
}

struct UploadWorker {
    tx: Sender<UploadJob>,
    join: JoinHandle<()>,
}

/// Background uploader over a [`SurfaceStore`]. Jobs queued while an upload
/// is in flight collapse to the newest surface and newest background, so a
/// burst of commits ends in one upload of the final state.
///
/// Dropping the uploader flushes what is still queued before returning.
pub struct Uploader {
    worker: Option<UploadWorker>,
}

impl Uploader {
    pub fn spawn(store: Arc<dyn SurfaceStore>) -> Self {
        let (tx, rx) = mpsc::channel();
        let join = thread::spawn(move || upload_loop(rx, store));
        Uploader {
            worker: Some(UploadWorker { tx, join }),
        }
    }
}

impl SaveSink for Uploader {
    fn submit_surface(&mut self, snapshot: &Snapshot) {
        if let Some(worker) = &self.worker {
            let _ = worker.tx.send(UploadJob::Surface(snapshot.clone()));
        }
    }

    fn submit_background(&mut self, color: Color) {
        if let Some(worker) = &self.worker {
            let _ = worker.tx.send(UploadJob::Background(color));
        }
    }
}

impl Drop for Uploader {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            drop(worker.tx);
            if worker.join.join().is_err() {
                tracing::error!("canvas upload worker panicked");
            }
        }
    }
}

fn upload_loop(rx: Receiver<UploadJob>, store: Arc<dyn SurfaceStore>) {
    while let Ok(first) = rx.recv() {
        let (surface, background) = coalesce_pending(first, &rx);

        if let Some(color) = background {
            if let Err(err) = store.store_background(color) {
                tracing::warn!(?err, "background upload failed");
            }
        }
        if let Some(snapshot) = surface {
            match snapshot.encode_png() {
                Ok(png) => {
                    if let Err(err) = store.store_surface(&png) {
                        tracing::warn!(?err, "canvas upload failed");
                    }
                }
                Err(err) => tracing::warn!(?err, "canvas png encode failed"),
            }
        }
    }
}

/// Drain everything already queued behind `first` and keep only the newest
/// job of each kind.
fn coalesce_pending(
    first: UploadJob,
    rx: &Receiver<UploadJob>,
) -> (Option<Snapshot>, Option<Color>) {
    let mut surface = None;
    let mut background = None;

    let mut stash = |job: UploadJob| match job {
        UploadJob::Surface(snapshot) => surface = Some(snapshot),
        UploadJob::Background(color) => background = Some(color),
    };

    stash(first);
    while let Ok(job) = rx.try_recv() {
        stash(job);
    }

    (surface, background)
}
