/// Lines kept between the cursor and the window edge before the list scrolls.
pub const DEFAULT_OVERSCAN: usize = 3;

/// Largest overscan a config may ask for.
pub const MAX_OVERSCAN: usize = 64;

/// Number of lines a window with the given overscan can show.
pub const fn window_len(overscan: usize) -> usize {
    overscan.saturating_mul(2).saturating_add(1)
}

/// First visible line for `cursor` in a list of `item_count` lines.
///
/// The list scrolls once the cursor is more than `overscan` lines from the top and stops scrolling
/// once the last line is visible.
pub fn compute_offset(cursor: usize, item_count: usize, overscan: usize) -> usize {
    let last_anchor = item_count.saturating_sub(overscan.saturating_add(1));
    cursor.min(last_anchor).saturating_sub(overscan)
}
