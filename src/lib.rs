pub mod logging;

pub mod geometry;
pub mod raster;
pub mod surface;

pub mod config;
pub mod config_store;
pub mod dialogs;
pub mod export;
pub mod history;
pub mod persistence;
pub mod tools;

pub mod engine;

pub use engine::{CanvasEngine, EngineOptions};
pub use tools::ToolKind;
