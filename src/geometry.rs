//! Screen-edge arithmetic for the panel. All values are physical pixels.

use crate::config::SnapPosition;

/// Distance from the top edge within which a drag release snaps to the top.
pub const SNAP_TOP_THRESHOLD: i32 = 50;
pub const SNAP_LEFT_THRESHOLD: i32 = 50;
/// Measured from the right edge to the window's left x coordinate.
pub const SNAP_RIGHT_THRESHOLD: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Size used when the user has not configured one.
pub fn default_panel_size(monitor: &MonitorRect, snap: SnapPosition) -> (i32, i32) {
    let w = f64::from(monitor.width);
    let h = f64::from(monitor.height);
    match snap {
        SnapPosition::Top => ((w * 0.9) as i32, (h * 0.065) as i32 + 10),
        SnapPosition::Left | SnapPosition::Right => ((w * 0.13) as i32 + 10, monitor.height),
    }
}

/// Places the panel against `snap` on `monitor`, centred horizontally for the
/// top edge.
pub fn snap_rect(
    monitor: &MonitorRect,
    snap: SnapPosition,
    explicit_size: Option<(u32, u32)>,
) -> PanelRect {
    let (width, height) = match explicit_size {
        Some((w, h)) => (saturating_i32(w), saturating_i32(h)),
        None => default_panel_size(monitor, snap),
    };

    let x = match snap {
        SnapPosition::Top => monitor.x + (monitor.width - width) / 2,
        SnapPosition::Left => monitor.x,
        SnapPosition::Right => monitor.x + monitor.width - width,
    };

    PanelRect {
        x,
        y: monitor.y,
        width,
        height,
    }
}

/// Edge to snap to when a drag is released with the window's top-left corner
/// at `origin`. Checks run top, then left, then right; the first match wins.
pub fn snap_for_release(origin: (i32, i32), monitor: &MonitorRect) -> Option<SnapPosition> {
    let (x, y) = origin;
    if y <= monitor.y + SNAP_TOP_THRESHOLD {
        Some(SnapPosition::Top)
    } else if x <= monitor.x + SNAP_LEFT_THRESHOLD {
        Some(SnapPosition::Left)
    } else if x >= monitor.x + monitor.width - SNAP_RIGHT_THRESHOLD {
        Some(SnapPosition::Right)
    } else {
        None
    }
}

/// Picks the configured monitor, falling back to the first one.
pub fn pick_monitor(monitors: &[MonitorRect], index: usize) -> Option<MonitorRect> {
    monitors.get(index).or_else(|| monitors.first()).copied()
}

/// Moves a popup of `size` opened at `origin` so that it stays on `monitor`,
/// flipping it above/left of the anchor when it would overflow.
pub fn fit_popup(origin: (i32, i32), size: (i32, i32), monitor: &MonitorRect) -> (i32, i32) {
    let (mut x, mut y) = origin;
    let (w, h) = size;
    let right = monitor.x + monitor.width;
    let bottom = monitor.y + monitor.height;

    if x + w > right {
        x -= w;
    }
    if y + h > bottom {
        y -= h;
    }
    (
        x.clamp(monitor.x, (right - w).max(monitor.x)),
        y.clamp(monitor.y, (bottom - h).max(monitor.y)),
    )
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
