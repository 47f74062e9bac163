use serde::{Deserialize, Serialize};

/// Tile size reported when no consistent periodicity was found.
pub const UNDETECTED_TILE: u32 = 0;
/// Offset reported when the grid phase could not be determined.
pub const UNDETERMINED_OFFSET: i32 = -1;

/// Image axis. `X` runs along columns (vertical grid lines), `Y` along rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

/// Detected grid geometry.
///
/// `tile_x`/`tile_y` are 0 when no periodicity was found on that axis;
/// `offset_x`/`offset_y` are -1 when the phase is undetermined and otherwise
/// lie in `[0, tile)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResult {
    pub width: usize,
    pub height: usize,
    pub tile_x: u32,
    pub tile_y: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl GridResult {
    /// `(offset_x, tile_x, offset_y, tile_y)`
    pub fn into_tuple(self) -> (i32, u32, i32, u32) {
        (self.offset_x, self.tile_x, self.offset_y, self.tile_y)
    }

    /// Both axes carry a tile size and a phase.
    pub fn is_complete(&self) -> bool {
        self.tile_x > 0 && self.tile_y > 0 && self.offset_x >= 0 && self.offset_y >= 0
    }

    /// Column positions of the vertical grid lines inside the image.
    pub fn vertical_lines(&self) -> Vec<usize> {
        line_positions(self.offset_x, self.tile_x, self.width)
    }

    /// Row positions of the horizontal grid lines inside the image.
    pub fn horizontal_lines(&self) -> Vec<usize> {
        line_positions(self.offset_y, self.tile_y, self.height)
    }
}

fn line_positions(offset: i32, tile: u32, extent: usize) -> Vec<usize> {
    if tile == UNDETECTED_TILE || offset < 0 {
        return Vec::new();
    }
    (offset as usize..extent).step_by(tile as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_positions_follow_offset_and_tile() {
        let grid = GridResult {
            width: 100,
            height: 50,
            tile_x: 30,
            tile_y: 20,
            offset_x: 5,
            offset_y: 0,
        };
        assert_eq!(grid.vertical_lines(), vec![5, 35, 65, 95]);
        assert_eq!(grid.horizontal_lines(), vec![0, 20, 40]);
    }

    #[test]
    fn undetected_axes_have_no_lines() {
        let grid = GridResult {
            width: 100,
            height: 50,
            tile_x: UNDETECTED_TILE,
            tile_y: 20,
            offset_x: UNDETERMINED_OFFSET,
            offset_y: UNDETERMINED_OFFSET,
        };
        assert!(grid.vertical_lines().is_empty());
        assert!(grid.horizontal_lines().is_empty());
        assert!(!grid.is_complete());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let grid = GridResult {
            width: 512,
            height: 512,
            tile_x: 45,
            tile_y: 45,
            offset_x: 10,
            offset_y: 10,
        };
        let json = serde_json::to_value(grid).unwrap();
        assert_eq!(json["tileX"], 45);
        assert_eq!(json["offsetY"], 10);
        assert_eq!(grid.into_tuple(), (10, 45, 10, 45));
    }
}
