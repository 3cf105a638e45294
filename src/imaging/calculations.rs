//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Every computed edge is floored at 1 pixel so a tiny source or an extreme
//! aspect ratio never produces a zero-size output.

/// Round a scaled edge (halves go to the even neighbour) and floor it at
/// one pixel.
fn edge(value: f64) -> u32 {
    (value.round_ties_even() as u32).max(1)
}

/// Derive the missing edge from a single given edge, preserving the source
/// aspect ratio.
///
/// `given` is the requested length of the edge that corresponds to
/// `source_given`; the result is the length of the other edge.
///
/// # Examples
/// ```
/// # use imgsh::imaging::calculations::derive_edge;
/// // 4000x3000 source, width 800 requested → height 600
/// assert_eq!(derive_edge(800, 4000, 3000), 600);
/// ```
pub fn derive_edge(given: u32, source_given: u32, source_other: u32) -> u32 {
    edge(source_other as f64 * (given as f64 / source_given as f64))
}

/// Calculate the largest size that fits entirely inside `bounds` while
/// keeping the source aspect ratio.
///
/// One edge matches the box exactly; the other may come out smaller.
pub fn calculate_contain_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = bounds;

    let src_aspect = src_w as f64 / src_h as f64;
    let box_aspect = box_w as f64 / box_h as f64;

    if src_aspect > box_aspect {
        // Source is wider: width is the limiting edge
        (box_w, edge(src_h as f64 / src_w as f64 * box_w as f64))
    } else if src_aspect < box_aspect {
        // Source is taller: height is the limiting edge
        (edge(src_w as f64 / src_h as f64 * box_h as f64), box_h)
    } else {
        (box_w, box_h)
    }
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Fill dimensions (at least one matches target)
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = edge(h as f64 * src_aspect).max(tgt_w);
        (w, h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = edge(w as f64 / src_aspect).max(tgt_h);
        (w, h)
    }
}

/// Offset that centers a `inner`-long span inside an `outer`-long span.
pub fn center_offset(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}
