use fontdue::{Font, LineMetrics};

// =============================================================================
// Text geometry
// =============================================================================

/// Bounding box of a line of text at a given size and rotation.
///
/// Rotation happens around the centre of the unrotated box; coordinates
/// returned by [`TextBox::to_box`] are relative to the rotated box's
/// top-left corner.
pub(crate) struct TextBox {
    pub width: u32,
    pub height: u32,
    ascent: f32,
    cx: f32,
    cy: f32,
    sin: f32,
    cos: f32,
    min_x: f32,
    min_y: f32,
}

impl TextBox {
    /// Uses glyph metrics only, so it stays cheap at large sizes.
    pub(crate) fn measure(text: &str, size: f32, angle_deg: f32, font: &Font) -> Self {
        let metrics = line_metrics(font, size);
        let advance: f32 = text
            .chars()
            .map(|ch| font.metrics(ch, size).advance_width)
            .sum();

        let unrotated_w = advance.ceil();
        let unrotated_h = metrics.new_line_size.ceil();
        let (sin, cos) = angle_deg.to_radians().sin_cos();

        let mut tb = Self {
            width: 0,
            height: 0,
            ascent: metrics.ascent,
            cx: unrotated_w / 2.0,
            cy: unrotated_h / 2.0,
            sin,
            cos,
            min_x: 0.0,
            min_y: 0.0,
        };

        let corners = [
            tb.rotate(0.0, 0.0),
            tb.rotate(unrotated_w, 0.0),
            tb.rotate(0.0, unrotated_h),
            tb.rotate(unrotated_w, unrotated_h),
        ];
        let min_x = corners.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);

        tb.min_x = min_x;
        tb.min_y = min_y;
        tb.width = (max_x - min_x).round().max(1.0) as u32;
        tb.height = (max_y - min_y).round().max(1.0) as u32;
        tb
    }

    fn rotate(&self, x: f32, y: f32) -> (f32, f32) {
        let dx = x - self.cx;
        let dy = y - self.cy;
        (
            dx * self.cos - dy * self.sin + self.cx,
            dx * self.sin + dy * self.cos + self.cy,
        )
    }

    fn to_box(&self, x: f32, y: f32) -> (f32, f32) {
        let (rx, ry) = self.rotate(x, y);
        (rx - self.min_x, ry - self.min_y)
    }

    /// Baseline origin of the text inside the rotated box.
    pub(crate) fn anchor(&self) -> (f32, f32) {
        self.to_box(0.0, self.ascent)
    }
}

fn line_metrics(font: &Font, size: f32) -> LineMetrics {
    font.horizontal_line_metrics(size).unwrap_or(LineMetrics {
        ascent: size * 0.8,
        descent: size * -0.2,
        line_gap: 0.0,
        new_line_size: size,
    })
}

// =============================================================================
// Sprite
// =============================================================================

/// Ink bitmap of a word, one bit per pixel, rows padded to whole `u32`s.
pub(crate) struct TextSprite {
    data: Vec<u32>,
    width_u32: usize,
    pub width: u32,
    pub height: u32,
}

impl TextSprite {
    fn is_set(&self, x: u32, y: u32) -> bool {
        let word = self.data[y as usize * self.width_u32 + (x as usize >> 5)];
        word & (1 << (31 - (x & 31))) != 0
    }
}

pub(crate) fn rasterize_text(text: &str, size: f32, tb: &TextBox, font: &Font) -> TextSprite {
    let width_u32 = ((tb.width + 31) >> 5) as usize;
    let mut data = vec![0u32; width_u32 * tb.height as usize];

    let mut pen_x = 0.0f32;
    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, size);
        let left = pen_x + metrics.xmin as f32;
        let top = tb.ascent - metrics.height as f32 - metrics.ymin as f32;

        for y in 0..metrics.height {
            for x in 0..metrics.width {
                if bitmap[y * metrics.width + x] <= 10 {
                    continue;
                }
                let (bx, by) = tb.to_box(left + x as f32, top + y as f32);
                let (fx, fy) = (bx.round() as i32, by.round() as i32);
                if fx >= 0 && fy >= 0 && fx < tb.width as i32 && fy < tb.height as i32 {
                    let idx = fy as usize * width_u32 + (fx as usize >> 5);
                    data[idx] |= 1 << (31 - (fx & 31));
                }
            }
        }
        pen_x += metrics.advance_width;
    }

    TextSprite {
        data,
        width_u32,
        width: tb.width,
        height: tb.height,
    }
}

// =============================================================================
// Occupancy
// =============================================================================

/// Occupied pixels of the canvas plus their summed-area table, so that
/// "is this rectangle free" is answered in constant time.
pub(crate) struct OccupancyMap {
    width: u32,
    height: u32,
    cells: Vec<u8>,
    integral: Vec<u32>,
}

impl OccupancyMap {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width as usize * height as usize],
            integral: vec![0; (width as usize + 1) * (height as usize + 1)],
        }
    }

    fn integral_at(&self, x: u32, y: u32) -> u64 {
        self.integral[y as usize * (self.width as usize + 1) + x as usize] as u64
    }

    /// Whether the `w` x `h` rectangle at (`x`, `y`) is on the canvas and empty.
    pub(crate) fn is_free(&self, x: i32, y: i32, w: u32, h: u32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as u32, y as u32);
        if x + w > self.width || y + h > self.height {
            return false;
        }
        let inside = self.integral_at(x + w, y + h) + self.integral_at(x, y);
        let outside = self.integral_at(x + w, y) + self.integral_at(x, y + h);
        inside == outside
    }

    /// First free top-left corner for a `w` x `h` box along the spiral,
    /// whose offsets are relative to the canvas centre.
    pub(crate) fn find_position(
        &self,
        w: u32,
        h: u32,
        offsets: impl Iterator<Item = (i32, i32)>,
    ) -> Option<(i32, i32)> {
        if w > self.width || h > self.height {
            return None;
        }
        let start_x = self.width as i32 / 2 - w as i32 / 2;
        let start_y = self.height as i32 / 2 - h as i32 / 2;
        offsets
            .map(|(dx, dy)| (start_x + dx, start_y + dy))
            .find(|&(x, y)| self.is_free(x, y, w, h))
    }

    /// Mark the sprite's ink as occupied, top-left at (`x`, `y`).
    pub(crate) fn write_sprite(&mut self, sprite: &TextSprite, x: i32, y: i32) {
        let mut first_row = self.height;
        for sy in 0..sprite.height {
            let gy = y + sy as i32;
            if gy < 0 || gy >= self.height as i32 {
                continue;
            }
            for sx in 0..sprite.width {
                let gx = x + sx as i32;
                if gx < 0 || gx >= self.width as i32 || !sprite.is_set(sx, sy) {
                    continue;
                }
                self.cells[gy as usize * self.width as usize + gx as usize] = 1;
                first_row = first_row.min(gy as u32);
            }
        }
        self.update_integral(first_row);
    }

    /// Recompute the summed-area table from row `from` downwards.
    fn update_integral(&mut self, from: u32) {
        let stride = self.width as usize + 1;
        for y in from as usize..self.height as usize {
            let mut row_sum = 0u32;
            for x in 0..self.width as usize {
                row_sum += self.cells[y * self.width as usize + x] as u32;
                self.integral[(y + 1) * stride + x + 1] = self.integral[y * stride + x + 1] + row_sum;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_sprite(width: u32, height: u32) -> TextSprite {
        let width_u32 = ((width + 31) >> 5) as usize;
        let mut data = vec![0u32; width_u32 * height as usize];
        for y in 0..height as usize {
            for x in 0..width as usize {
                data[y * width_u32 + (x >> 5)] |= 1 << (31 - (x & 31));
            }
        }
        TextSprite {
            data,
            width_u32,
            width,
            height,
        }
    }

    #[test]
    fn empty_map_is_free_everywhere_inside() {
        let map = OccupancyMap::new(50, 40);
        assert!(map.is_free(0, 0, 50, 40));
        assert!(!map.is_free(1, 0, 50, 40));
        assert!(!map.is_free(-1, 0, 10, 10));
    }

    #[test]
    fn written_sprite_blocks_overlapping_boxes() {
        let mut map = OccupancyMap::new(100, 100);
        map.write_sprite(&block_sprite(40, 10), 30, 45);

        assert!(!map.is_free(0, 0, 100, 100));
        assert!(!map.is_free(60, 50, 10, 10));
        assert!(map.is_free(70, 50, 10, 10));
        assert!(map.is_free(0, 0, 100, 45));
        assert!(map.is_free(0, 55, 100, 45));
    }

    #[test]
    fn find_position_prefers_the_centre() {
        let map = OccupancyMap::new(100, 100);
        let pos = map.find_position(20, 10, crate::layout::spiral::offsets(100, 100, 1));
        assert_eq!(pos, Some((40, 45)));
    }

    #[test]
    fn find_position_moves_around_occupied_space() {
        let mut map = OccupancyMap::new(100, 100);
        map.write_sprite(&block_sprite(40, 20), 30, 40);

        let (x, y) = map
            .find_position(20, 10, crate::layout::spiral::offsets(100, 100, 1))
            .unwrap();
        assert!(map.is_free(x, y, 20, 10));
    }

    #[test]
    fn oversized_box_never_fits() {
        let map = OccupancyMap::new(100, 100);
        assert_eq!(
            map.find_position(101, 10, crate::layout::spiral::offsets(100, 100, 1)),
            None
        );
    }
}
