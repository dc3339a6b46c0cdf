//! Editor-wide constants.
//!
//! Pixel values match the coordinate space of the persisted chart
//! documents; downstream hosts scale at the rendering layer.

/// Distance between adjacent chair centers in a row, and between a table
/// edge and its chairs.
pub const CHAIR_SPACING: f64 = 25.0;

/// Chair circle radius.
pub const CHAIR_RADIUS: f64 = 10.0;

/// Default radius for a freshly placed round table.
pub const DEFAULT_ROUND_TABLE_RADIUS: f64 = 60.0;

/// Default dimensions for a freshly placed rectangular table.
pub const DEFAULT_RECT_TABLE_WIDTH: f64 = 120.0;
pub const DEFAULT_RECT_TABLE_HEIGHT: f64 = 80.0;

/// Default dimensions for a freshly placed booth.
pub const DEFAULT_BOOTH_WIDTH: f64 = 80.0;
pub const DEFAULT_BOOTH_HEIGHT: f64 = 80.0;

/// Default chair count for new tables.
pub const DEFAULT_TABLE_CHAIRS: u32 = 8;

/// Pixel threshold for snapping a polygon point onto an existing corner,
/// including the first corner (which closes the polygon).
pub const POLYGON_SNAP_THRESHOLD: f64 = 10.0;

/// Pixel threshold under which a drag gesture is treated as a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Angle step (degrees) for rotation handles.
pub const ROTATION_SNAP_STEP: f64 = 2.0;

/// Angle step (degrees) for shift-constrained drawing.
pub const SHIFT_ANGLE_STEP: f64 = 45.0;

/// Default grid snapping precision.
pub const DEFAULT_GRID_PRECISION: f64 = 10.0;

/// Default font size for text labels.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

/// Default label size for section labels.
pub const DEFAULT_SECTION_LABEL_SIZE: f64 = 24.0;

/// Coordinates are rounded to this many decimals to avoid drift under
/// repeated transforms.
pub const COORD_DECIMALS: u32 = 2;
