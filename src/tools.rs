use crate::geometry::Point;
use crate::surface::Surface;

/// The selectable tool buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Pen,
    Eraser,
    Shape,
    Text,
    Image,
}

/// The selected tool together with any in-flight gesture state. Exactly one
/// variant is active at a time, so a pen stroke can never leak into a shape
/// drag.
#[derive(Debug)]
pub enum ActiveTool {
    Idle,
    /// `stroke` holds the last stamped point while the pointer is down.
    Pen {
        stroke: Option<Point>,
    },
    Eraser {
        stroke: Option<Point>,
    },
    /// `anchor` is the pointer-down corner while a drag is engaged.
    Shape {
        anchor: Option<Point>,
    },
    Text,
    /// `image` is decoded when the tool is picked. Without one the tool is
    /// inert.
    Image {
        image: Option<Surface>,
    },
    /// Crop-selection mode for export. `drag` is the pointer-down corner of
    /// an engaged marquee drag, `candidate` the PNG baked from the last
    /// completed selection.
    ExportCrop {
        drag: Option<Point>,
        candidate: Option<Vec<u8>>,
    },
}

impl Default for ActiveTool {
    fn default() -> Self {
        ActiveTool::Idle
    }
}

impl ActiveTool {
    /// The tool button this state corresponds to. Idle and crop mode have
    /// none.
    pub fn kind(&self) -> Option<ToolKind> {
        match self {
            ActiveTool::Idle | ActiveTool::ExportCrop { .. } => None,
            ActiveTool::Pen { .. } => Some(ToolKind::Pen),
            ActiveTool::Eraser { .. } => Some(ToolKind::Eraser),
            ActiveTool::Shape { .. } => Some(ToolKind::Shape),
            ActiveTool::Text => Some(ToolKind::Text),
            ActiveTool::Image { .. } => Some(ToolKind::Image),
        }
    }

    pub fn is_export(&self) -> bool {
        matches!(self, ActiveTool::ExportCrop { .. })
    }

    /// True while a press-drag gesture is engaged.
    pub fn gesture_engaged(&self) -> bool {
        match self {
            ActiveTool::Pen { stroke } | ActiveTool::Eraser { stroke } => stroke.is_some(),
            ActiveTool::Shape { anchor } => anchor.is_some(),
            ActiveTool::ExportCrop { drag, .. } => drag.is_some(),
            _ => false,
        }
    }
}
