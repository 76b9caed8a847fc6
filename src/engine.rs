use ab_glyph::FontArc;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::{Color, ShapeKind, ToolConfig};
use crate::dialogs::Dialogs;
use crate::export;
use crate::geometry::{interpolate_points, preview_stroke_width, PixelRect, Point};
use crate::history::SnapshotHistory;
use crate::persistence::{SaveSink, SurfaceStore};
use crate::raster;
use crate::surface::{Rgba, Surface};
use crate::tools::{ActiveTool, ToolKind};

const CLEAR_PROMPT: &str = "Are you sure you want to clear the canvas?";
const EXPORT_FULL_PROMPT: &str = "No selection. Export entire canvas?";
const CANCEL_EXPORT_PROMPT: &str = "Are you sure you want to cancel?";
const TEXT_PROMPT_TITLE: &str = "Enter text";
const TEXT_PREVIEW: &str = "Text";
const MARQUEE_WIDTH: f32 = 2.0;

pub struct EngineOptions {
    pub width: u32,
    pub height: u32,
    pub config: ToolConfig,
    /// Used as the suggested file name when exporting.
    pub note_name: Option<String>,
    /// Font for the text tool. Without one the tool is inert.
    pub font: Option<FontArc>,
}

impl EngineOptions {
    pub fn new(width: u32, height: u32) -> Self {
        EngineOptions {
            width,
            height,
            config: ToolConfig::default(),
            note_name: None,
            font: None,
        }
    }
}

/// The drawing surface for one note.
///
/// The engine owns two pixel layers: the committed surface and a transient
/// overlay for previews and the crop marquee. Pointer presses and releases
/// apply immediately; pointer motion is buffered and the newest position is
/// applied once per [`frame`](CanvasEngine::frame), so a flood of motion
/// events costs at most one repaint per frame and the stroke still lands on
/// the latest position.
pub struct CanvasEngine {
    surface: Surface,
    overlay: Surface,
    history: SnapshotHistory,
    config: ToolConfig,
    tool: ActiveTool,
    zoom: f32,
    shift_held: bool,
    pending_move: Option<Point>,
    note_name: Option<String>,
    font: Option<FontArc>,
    dialogs: Box<dyn Dialogs>,
    sink: Box<dyn SaveSink>,
}

impl CanvasEngine {
    pub fn new(options: EngineOptions, dialogs: Box<dyn Dialogs>, sink: Box<dyn SaveSink>) -> Self {
        let surface = Surface::new(options.width, options.height, Rgba::TRANSPARENT);
        let overlay = Surface::new(options.width, options.height, Rgba::TRANSPARENT);
        let history = SnapshotHistory::new(surface.snapshot());
        CanvasEngine {
            surface,
            overlay,
            history,
            config: options.config,
            tool: ActiveTool::Idle,
            zoom: 1.0,
            shift_held: false,
            pending_move: None,
            note_name: options.note_name,
            font: options.font,
            dialogs,
            sink,
        }
    }

    /// Load the stored canvas for this note, if any. The surface keeps its
    /// blank baseline when there is nothing stored or the fetch fails.
    /// `done` runs exactly once, whatever the outcome, so hosts can dismiss
    /// their loading indicator.
    pub fn hydrate(&mut self, store: &dyn SurfaceStore, done: impl FnOnce()) {
        match store.fetch_surface() {
            Ok(Some(bytes)) => match Surface::from_encoded(&bytes) {
                Ok(decoded) => {
                    raster::blit_image(&mut self.surface, &decoded, Point::new(0.0, 0.0));
                    self.history.reset(self.surface.snapshot());
                    info!(
                        width = decoded.width(),
                        height = decoded.height(),
                        "hydrated canvas from stored png"
                    );
                }
                Err(err) => warn!(?err, "stored canvas is not decodable, starting blank"),
            },
            Ok(None) => debug!("no stored canvas for this note"),
            Err(err) => warn!(?err, "canvas fetch failed, starting blank"),
        }
        done();
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn overlay(&self) -> &Surface {
        &self.overlay
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn tool_kind(&self) -> Option<ToolKind> {
        self.tool.kind()
    }

    pub fn is_exporting(&self) -> bool {
        self.tool.is_export()
    }

    pub fn has_export_candidate(&self) -> bool {
        matches!(
            &self.tool,
            ActiveTool::ExportCrop {
                candidate: Some(_),
                ..
            }
        )
    }

    /// Select a tool button. Picking the active tool again deselects it.
    /// Tool changes are ignored while export mode is open.
    pub fn select_tool(&mut self, kind: ToolKind) {
        if self.tool.is_export() {
            debug!(?kind, "ignoring tool change during export");
            return;
        }
        // Teardown of the previous state: any preview is dropped and the
        // variant swap below drops its gesture state.
        self.overlay.clear();

        if self.tool.kind() == Some(kind) {
            self.tool = ActiveTool::Idle;
            debug!(?kind, "tool deselected");
            return;
        }

        self.tool = match kind {
            ToolKind::Pen => ActiveTool::Pen { stroke: None },
            ToolKind::Eraser => ActiveTool::Eraser { stroke: None },
            ToolKind::Shape => ActiveTool::Shape { anchor: None },
            ToolKind::Text => {
                if self.font.is_none() {
                    warn!("text tool selected without a font loaded");
                }
                ActiveTool::Text
            }
            ToolKind::Image => {
                let image = self.dialogs.pick_image().and_then(|path| {
                    match std::fs::read(&path) {
                        Ok(bytes) => match Surface::from_encoded(&bytes) {
                            Ok(decoded) => Some(decoded),
                            Err(err) => {
                                warn!(?err, path = %path.display(), "picked image is not decodable");
                                None
                            }
                        },
                        Err(err) => {
                            warn!(?err, path = %path.display(), "picked image is unreadable");
                            None
                        }
                    }
                });
                ActiveTool::Image { image }
            }
        };
        debug!(?kind, "tool selected");
    }

    /// Change which shape the shape tool drags out. This also activates the
    /// shape tool; an in-flight drag is abandoned.
    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.config.shape_kind = kind;
        if !self.tool.is_export() {
            self.overlay.clear();
            self.tool = ActiveTool::Shape { anchor: None };
        }
    }

    pub fn set_shift_held(&mut self, held: bool) {
        self.shift_held = held;
    }

    pub fn set_pen_size(&mut self, size: f32) {
        self.config.pen_size = size;
    }

    pub fn set_eraser_size(&mut self, size: f32) {
        self.config.eraser_size = size;
    }

    pub fn set_text_size(&mut self, size: f32) {
        self.config.text_size = size;
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.config.pen_color = color;
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.config.text_color = color;
    }

    pub fn set_shape_color(&mut self, color: Color) {
        self.config.shape_color = color;
    }

    /// The background color is part of the note, so changing it is persisted
    /// right away.
    pub fn set_background_color(&mut self, color: Color) {
        self.config.background_color = color;
        self.sink.submit_background(color);
    }

    pub fn zoom_in(&mut self) {
        self.zoom *= 1.1;
    }

    pub fn zoom_out(&mut self) {
        self.zoom *= 0.9;
    }

    /// Forward a pointer press. Presses apply immediately.
    pub fn pointer_down(&mut self, position: Point) {
        let mut commit = false;

        match &mut self.tool {
            ActiveTool::Idle => {}
            ActiveTool::Pen { stroke } => {
                raster::fill_circle(
                    &mut self.surface,
                    position,
                    self.config.pen_size,
                    self.config.pen_color.to_rgba(),
                );
                *stroke = Some(position);
            }
            ActiveTool::Eraser { stroke } => {
                raster::erase_circle(&mut self.surface, position, self.config.eraser_size);
                *stroke = Some(position);
            }
            ActiveTool::Shape { anchor } => {
                *anchor = Some(position);
            }
            ActiveTool::Text => {
                if let Some(font) = &self.font {
                    if let Some(text) = self.dialogs.prompt_text(TEXT_PROMPT_TITLE) {
                        let text = text.trim();
                        if !text.is_empty() {
                            raster::draw_text(
                                &mut self.surface,
                                font,
                                text,
                                self.config.text_size,
                                position,
                                self.config.text_color.to_rgba(),
                            );
                            commit = true;
                        }
                    }
                }
            }
            ActiveTool::Image { image } => {
                if let Some(stamp) = image {
                    raster::blit_image(&mut self.surface, stamp, position);
                    commit = true;
                }
            }
            ActiveTool::ExportCrop { drag, .. } => {
                *drag = Some(position);
            }
        }

        if commit {
            self.commit_to_history();
        }
    }

    /// Buffer pointer motion. Only the newest position since the last frame
    /// is kept.
    pub fn pointer_moved(&mut self, position: Point) {
        self.pending_move = Some(position);
    }

    /// Advance one frame, applying the buffered pointer position if any.
    pub fn frame(&mut self) {
        if let Some(position) = self.pending_move.take() {
            self.apply_move(position);
        }
    }

    /// Forward a pointer release. Any buffered motion is discarded so a
    /// stale position cannot land after the gesture ended.
    pub fn pointer_up(&mut self, position: Point) {
        self.pending_move = None;
        let mut commit = false;

        match &mut self.tool {
            ActiveTool::Pen { stroke } | ActiveTool::Eraser { stroke } => {
                if stroke.take().is_some() {
                    commit = true;
                }
            }
            ActiveTool::Shape { anchor } => {
                if let Some(anchor) = anchor.take() {
                    raster::fill_shape(
                        &mut self.surface,
                        self.config.shape_kind,
                        anchor,
                        position,
                        self.shift_held,
                        self.config.shape_color.to_rgba(),
                    );
                    self.overlay.clear();
                    commit = true;
                }
            }
            ActiveTool::ExportCrop { drag, candidate } => {
                if let Some(anchor) = drag.take() {
                    let rect = PixelRect::from_drag(anchor, position);
                    if let Some(rect) = rect.clamp(self.surface.width(), self.surface.height()) {
                        match export::bake_selection(
                            &self.surface,
                            rect,
                            self.config.background_color,
                        ) {
                            Ok(png) => {
                                debug!(
                                    x = rect.x,
                                    y = rect.y,
                                    width = rect.width,
                                    height = rect.height,
                                    "baked export selection"
                                );
                                *candidate = Some(png);
                            }
                            Err(err) => warn!(?err, "failed to bake export selection"),
                        }
                    }
                }
            }
            _ => {}
        }

        if commit {
            self.commit_to_history();
        }
    }

    /// The pointer left the canvas, e.g. onto the toolbar. Drops buffered
    /// motion and the hover preview.
    pub fn pointer_left(&mut self) {
        self.pending_move = None;
        self.overlay.clear();
    }

    /// Wipe the canvas after confirmation and restart the history from the
    /// blank state.
    pub fn clear(&mut self) {
        if self.tool.is_export() {
            return;
        }
        if !self.dialogs.confirm(CLEAR_PROMPT) {
            return;
        }
        self.overlay.clear();
        self.surface.clear();
        self.history.reset(self.surface.snapshot());
        self.sink.submit_surface(self.history.current());
        info!("canvas cleared");
    }

    /// Step back one history entry. At the oldest entry this does nothing.
    pub fn undo(&mut self) {
        if self.tool.is_export() {
            return;
        }
        if let Some(snapshot) = self.history.undo() {
            self.surface.restore(&snapshot);
            self.sink.submit_surface(&snapshot);
            debug!(cursor = self.history.cursor(), "undo");
        }
    }

    /// Step forward one history entry. At the newest entry this does nothing.
    pub fn redo(&mut self) {
        if self.tool.is_export() {
            return;
        }
        if let Some(snapshot) = self.history.redo() {
            self.surface.restore(&snapshot);
            self.sink.submit_surface(&snapshot);
            debug!(cursor = self.history.cursor(), "redo");
        }
    }

    /// Enter export mode. The current tool is dropped; pointer drags now
    /// select the region to export.
    pub fn begin_export(&mut self) {
        if self.tool.is_export() {
            return;
        }
        self.overlay.clear();
        self.tool = ActiveTool::ExportCrop {
            drag: None,
            candidate: None,
        };
        info!("entered export mode");
    }

    /// Write the selected region, or the whole canvas after confirmation, to
    /// a PNG picked by the user. Returns the written path, or `None` when the
    /// user declined or cancelled. Export mode stays open either way.
    pub fn export(&mut self) -> Result<Option<PathBuf>> {
        let ActiveTool::ExportCrop { candidate, .. } = &mut self.tool else {
            return Ok(None);
        };

        let png = match candidate {
            Some(png) => png.clone(),
            None => {
                if !self.dialogs.confirm(EXPORT_FULL_PROMPT) {
                    return Ok(None);
                }
                self.surface.encode_png()?
            }
        };

        let file_name = export::download_file_name(self.note_name.as_deref());
        let Some(path) = self.dialogs.save_png(&file_name) else {
            return Ok(None);
        };
        let path = export::ensure_png_extension(path);
        export::write_png(&path, &png)?;
        info!(path = %path.display(), "exported canvas");
        Ok(Some(path))
    }

    /// Leave export mode. With a selection pending this asks first.
    pub fn cancel_export(&mut self) {
        let ActiveTool::ExportCrop { candidate, .. } = &self.tool else {
            return;
        };
        if candidate.is_some() && !self.dialogs.confirm(CANCEL_EXPORT_PROMPT) {
            return;
        }
        self.overlay.clear();
        self.tool = ActiveTool::Idle;
        info!("left export mode");
    }

    fn commit_to_history(&mut self) {
        let snapshot = self.surface.snapshot();
        self.history.push(snapshot.clone());
        self.sink.submit_surface(&snapshot);
    }

    fn apply_move(&mut self, position: Point) {
        match &mut self.tool {
            ActiveTool::Idle => {}
            ActiveTool::Pen { stroke } => {
                self.overlay.clear();
                let color = self.config.pen_color.to_rgba();
                let radius = self.config.pen_size / 2.0;
                raster::stroke_circle(
                    &mut self.overlay,
                    position,
                    radius,
                    preview_stroke_width(radius, self.zoom),
                    color,
                );
                if let Some(last) = stroke {
                    for point in interpolate_points(*last, position, self.config.pen_size) {
                        raster::fill_circle(&mut self.surface, point, self.config.pen_size, color);
                    }
                    *stroke = Some(position);
                }
            }
            ActiveTool::Eraser { stroke } => {
                self.overlay.clear();
                let radius = self.config.eraser_size / 2.0;
                raster::stroke_circle(
                    &mut self.overlay,
                    position,
                    radius,
                    preview_stroke_width(radius, self.zoom),
                    Rgba::BLACK,
                );
                if let Some(last) = stroke {
                    for point in interpolate_points(*last, position, self.config.eraser_size) {
                        raster::erase_circle(&mut self.surface, point, self.config.eraser_size);
                    }
                    *stroke = Some(position);
                }
            }
            ActiveTool::Shape { anchor } => {
                self.overlay.clear();
                if let Some(anchor) = anchor {
                    raster::fill_shape(
                        &mut self.overlay,
                        self.config.shape_kind,
                        *anchor,
                        position,
                        self.shift_held,
                        self.config.shape_color.to_rgba(),
                    );
                }
            }
            ActiveTool::Text => {
                self.overlay.clear();
                if let Some(font) = &self.font {
                    raster::draw_text(
                        &mut self.overlay,
                        font,
                        TEXT_PREVIEW,
                        self.config.text_size,
                        position,
                        self.config.text_color.to_rgba(),
                    );
                }
            }
            ActiveTool::Image { image } => {
                self.overlay.clear();
                if let Some(stamp) = image {
                    raster::blit_image(&mut self.overlay, stamp, position);
                }
            }
            ActiveTool::ExportCrop { drag, .. } => {
                if let Some(anchor) = drag {
                    self.overlay.clear();
                    let rect = PixelRect::from_drag(*anchor, position);
                    raster::stroke_rect(&mut self.overlay, rect, MARQUEE_WIDTH, Rgba::BLACK);
                }
            }
        }
    }
}
