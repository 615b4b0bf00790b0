use winit::dpi::{PhysicalPosition, PhysicalSize};

/// Initial window placement in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowGeometry {
    pub size: PhysicalSize<u32>,
    /// `None` leaves placement to the platform.
    pub position: Option<PhysicalPosition<i32>>,
}

/// Square window, half the monitor's height on a side, centered on the monitor.
///
/// `monitor` is the monitor's top-left position and size. Without a monitor
/// (or with a degenerate one) the window is `fallback_side` square and placed
/// by the platform.
pub fn initial_geometry(
    monitor: Option<(PhysicalPosition<i32>, PhysicalSize<u32>)>,
    fallback_side: u32,
) -> WindowGeometry {
    let fallback = WindowGeometry {
        size: PhysicalSize::new(fallback_side, fallback_side),
        position: None,
    };

    let Some((origin, size)) = monitor else { return fallback };
    let side = size.height / 2;
    if side == 0 || size.width < side {
        return fallback;
    }

    let x = origin.x + ((size.width - side) / 2) as i32;
    let y = origin.y + ((size.height - side) / 2) as i32;

    WindowGeometry {
        size: PhysicalSize::new(side, side),
        position: Some(PhysicalPosition::new(x, y)),
    }
}

/// Square size to request after a resize, or `None` if `size` is already
/// square (or zero-sized, e.g. minimized).
///
/// The smaller side wins, so the corrected window never grows past what the
/// user dragged.
pub fn constrain_square(size: PhysicalSize<u32>) -> Option<PhysicalSize<u32>> {
    if size.width == 0 || size.height == 0 || size.width == size.height {
        return None;
    }
    let side = size.width.min(size.height);
    Some(PhysicalSize::new(side, side))
}

/// Decides the square request answering a resize to `size`.
///
/// `corrected` is the non-square size the previous request answered. Returns
/// the size to request (if any) and the new `corrected` value:
/// - a square or zero size clears it, so later drags are corrected again;
/// - the same non-square size coming back means the window manager refused
///   the request, which is not repeated;
/// - any other non-square size gets a fresh request.
pub fn next_square_request(
    corrected: Option<PhysicalSize<u32>>,
    size: PhysicalSize<u32>,
) -> (Option<PhysicalSize<u32>>, Option<PhysicalSize<u32>>) {
    match constrain_square(size) {
        None => (None, None),
        Some(_) if corrected == Some(size) => (None, corrected),
        Some(square) => (Some(square), Some(size)),
    }
}
