/// Distributes the space left over after padding and cells evenly between
/// the gaps of one axis. A single-cell axis has no gaps.
pub fn compute_cell_gap(size: i32, start: i32, end: i32, cell: i32, cells: usize) -> i32 {
    if cells <= 1 {
        return 0;
    }
    let cells = i32::try_from(cells).unwrap_or(i32::MAX);
    let leftover = size
        .saturating_sub(start)
        .saturating_sub(end)
        .saturating_sub(cell.saturating_mul(cells));
    (leftover / (cells - 1)).max(0)
}
