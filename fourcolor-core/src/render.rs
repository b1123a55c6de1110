//! Board rendering to an RGB image.

use crate::{rules, Adjacency, PaletteColor, Region, Rgb, SampleField};

pub const BORDER: Rgb = [0, 0, 0];
pub const UNPAINTED: Rgb = [80, 80, 80];
pub const SEED_MARKER: Rgb = [255, 255, 255];

impl PaletteColor {
    pub fn rgb(self) -> Rgb {
        match self {
            PaletteColor::Red => [255, 0, 0],
            PaletteColor::Green => [0, 255, 0],
            PaletteColor::Blue => [0, 0, 255],
            PaletteColor::Yellow => [255, 255, 0],
        }
    }
}

/// Blend halfway toward white to flag a conflicting region
fn highlight(color: Rgb) -> Rgb {
    color.map(|c| ((c as u16 + 255) / 2) as u8)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Draw 4x4 markers on the seed points
    pub show_seeds: bool,
}

/// Fill color of each region: palette color, lightened when conflicting
fn region_fills(regions: &[Region], adjacency: &Adjacency) -> Vec<Rgb> {
    (0..regions.len())
        .map(|i| match regions[i].paint {
            Some(color) if rules::has_conflict(regions, adjacency, i) => highlight(color.rgb()),
            Some(color) => color.rgb(),
            None => UNPAINTED,
        })
        .collect()
}

/// Render the board: each sample cell is filled with its region's color, or
/// with the border color when it sits on a region boundary.
pub fn render_board(
    field: &SampleField,
    regions: &[Region],
    adjacency: &Adjacency,
    options: RenderOptions,
) -> image::RgbImage {
    let grid = &field.grid;
    let fills = region_fills(regions, adjacency);

    let mut cell_colors: Vec<Rgb> = Vec::with_capacity(grid.len());
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let color = if field.is_boundary(col, row) {
                BORDER
            } else {
                fills
                    .get(field.region_at(col, row))
                    .copied()
                    .unwrap_or(UNPAINTED)
            };
            cell_colors.push(color);
        }
    }

    let s = grid.cell_size;
    let mut image = image::RgbImage::from_fn(grid.bounds.width, grid.bounds.height, |x, y| {
        let idx = (y / s) as usize * grid.cols + (x / s) as usize;
        image::Rgb(cell_colors[idx])
    });

    if options.show_seeds {
        draw_seeds(&mut image, regions);
    }
    image
}

/// Draw 4x4 markers centered on each seed point
fn draw_seeds(image: &mut image::RgbImage, regions: &[Region]) {
    let (w, h) = (image.width() as i32, image.height() as i32);
    for region in regions {
        for dy in -2..2 {
            for dx in -2..2 {
                let px = region.seed.x + dx;
                let py = region.seed.y + dy;
                if px >= 0 && px < w && py >= 0 && py < h {
                    image.put_pixel(px as u32, py as u32, image::Rgb(SEED_MARKER));
                }
            }
        }
    }
}
