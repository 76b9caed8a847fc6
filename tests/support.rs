#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use note_canvas::config::Color;
use note_canvas::dialogs::Dialogs;
use note_canvas::geometry::Point;
use note_canvas::persistence::{SaveSink, SurfaceStore};
use note_canvas::surface::Snapshot;
use note_canvas::{CanvasEngine, EngineOptions};

/// Dialogs that answer from a script and record every prompt shown.
#[derive(Clone, Default)]
pub struct ScriptedDialogs {
    confirms: Arc<Mutex<VecDeque<bool>>>,
    texts: Arc<Mutex<VecDeque<Option<String>>>>,
    image_picks: Arc<Mutex<VecDeque<Option<PathBuf>>>>,
    save_paths: Arc<Mutex<VecDeque<Option<PathBuf>>>>,
    pub seen_prompts: Arc<Mutex<Vec<String>>>,
    pub suggested_names: Arc<Mutex<Vec<String>>>,
}

impl ScriptedDialogs {
    pub fn answer_confirm(&self, answer: bool) {
        self.confirms.lock().unwrap().push_back(answer);
    }

    pub fn answer_text(&self, answer: Option<&str>) {
        self.texts
            .lock()
            .unwrap()
            .push_back(answer.map(str::to_string));
    }

    pub fn answer_image_pick(&self, path: Option<PathBuf>) {
        self.image_picks.lock().unwrap().push_back(path);
    }

    pub fn answer_save_path(&self, path: Option<PathBuf>) {
        self.save_paths.lock().unwrap().push_back(path);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.seen_prompts.lock().unwrap().clone()
    }

    pub fn suggested(&self) -> Vec<String> {
        self.suggested_names.lock().unwrap().clone()
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&mut self, message: &str) -> bool {
        self.seen_prompts.lock().unwrap().push(message.to_string());
        self.confirms.lock().unwrap().pop_front().unwrap_or(false)
    }

    fn prompt_text(&mut self, title: &str) -> Option<String> {
        self.seen_prompts.lock().unwrap().push(title.to_string());
        self.texts.lock().unwrap().pop_front().flatten()
    }

    fn pick_image(&mut self) -> Option<PathBuf> {
        self.image_picks.lock().unwrap().pop_front().flatten()
    }

    fn save_png(&mut self, file_name: &str) -> Option<PathBuf> {
        self.suggested_names
            .lock()
            .unwrap()
            .push(file_name.to_string());
        self.save_paths.lock().unwrap().pop_front().flatten()
    }
}

/// Sink that records submissions instead of uploading them.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub surfaces: Arc<Mutex<Vec<Snapshot>>>,
    pub backgrounds: Arc<Mutex<Vec<Color>>>,
}

impl RecordingSink {
    pub fn surface_saves(&self) -> usize {
        self.surfaces.lock().unwrap().len()
    }

    pub fn background_saves(&self) -> usize {
        self.backgrounds.lock().unwrap().len()
    }

    pub fn last_surface(&self) -> Option<Snapshot> {
        self.surfaces.lock().unwrap().last().cloned()
    }
}

impl SaveSink for RecordingSink {
    fn submit_surface(&mut self, snapshot: &Snapshot) {
        self.surfaces.lock().unwrap().push(snapshot.clone());
    }

    fn submit_background(&mut self, color: Color) {
        self.backgrounds.lock().unwrap().push(color);
    }
}

/// In-memory store for hydrate tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub stored: Arc<Mutex<Option<Vec<u8>>>>,
    pub fail_fetch: bool,
}

impl SurfaceStore for MemoryStore {
    fn fetch_surface(&self) -> anyhow::Result<Option<Vec<u8>>> {
        if self.fail_fetch {
            anyhow::bail!("fetch refused");
        }
        Ok(self.stored.lock().unwrap().clone())
    }

    fn store_surface(&self, png: &[u8]) -> anyhow::Result<()> {
        *self.stored.lock().unwrap() = Some(png.to_vec());
        Ok(())
    }

    fn store_background(&self, _color: Color) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Engine wired to scripted dialogs and a recording sink. The returned
/// handles share state with the boxed copies the engine owns.
pub fn engine_with_mocks(width: u32, height: u32) -> (CanvasEngine, ScriptedDialogs, RecordingSink) {
    engine_with_options(EngineOptions::new(width, height))
}

pub fn engine_with_options(
    options: EngineOptions,
) -> (CanvasEngine, ScriptedDialogs, RecordingSink) {
    let dialogs = ScriptedDialogs::default();
    let sink = RecordingSink::default();
    let engine = CanvasEngine::new(options, Box::new(dialogs.clone()), Box::new(sink.clone()));
    (engine, dialogs, sink)
}

/// Buffer a move and run the frame that applies it.
pub fn tracked_move(engine: &mut CanvasEngine, position: Point) {
    engine.pointer_moved(position);
    engine.frame();
}
