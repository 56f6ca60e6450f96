//! Test data generators for creating synthetic radiance-like data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 100 + row`
///
/// This makes it easy to verify that data is being read/written correctly
/// by checking that grid[row][col] == col * 100 + row.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid_i16;
///
/// let grid = create_test_grid_i16(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0);     // col=0, row=0 -> 0*100 + 0
/// assert_eq!(grid[1], 100);   // col=1, row=0 -> 1*100 + 0
/// assert_eq!(grid[10], 1);    // col=0, row=1 -> 0*100 + 1
/// ```
pub fn create_test_grid_i16(width: usize, height: usize) -> Vec<i16> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 100 + row) as i16);
        }
    }
    data
}

/// Creates a test grid with radiance-like values in mW/cm²/µm/sr.
///
/// Values form a gradient from ~5 (top-left) to ~35 (bottom-right), the
/// range OCM-2 visible bands typically report over ocean and cloud.
pub fn create_radiance_grid(width: usize, height: usize) -> Vec<i16> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f32 / width.max(1) as f32;
            let y_factor = row as f32 / height.max(1) as f32;
            let radiance = 5.0 + (x_factor * 15.0) + (y_factor * 15.0);
            data.push(radiance.round() as i16);
        }
    }
    data
}

/// Creates a grid of constant radiance with a no-data hole at (0, 0).
pub fn create_radiance_grid_with_hole(
    width: usize,
    height: usize,
    radiance: i16,
    no_data: i16,
) -> Vec<i16> {
    let mut data = vec![radiance; width * height];
    data[0] = no_data;
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_convention() {
        let grid = create_test_grid_i16(4, 3);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid[0], 0);
        assert_eq!(grid[3], 300);
        assert_eq!(grid[4], 1); // row 1, col 0
    }

    #[test]
    fn test_radiance_range() {
        let grid = create_radiance_grid(16, 16);
        assert!(grid.iter().all(|&v| (0..=40).contains(&v)));
    }

    #[test]
    fn test_hole_placement() {
        let grid = create_radiance_grid_with_hole(3, 3, 20, -32768);
        assert_eq!(grid[0], -32768);
        assert!(grid[1..].iter().all(|&v| v == 20));
    }
}
