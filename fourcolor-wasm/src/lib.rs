//! WASM bindings for fourcolor-core.
//!
//! Exposes a stateful `FourColorGame` that holds one puzzle board,
//! returning flat typed arrays for efficient JS interop.

use fourcolor_core::{
    render_board, CpuBackend, Difficulty, GameConfig, PaletteColor, Point, RenderOptions, Session,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn parse_difficulty(name: &str) -> Result<Difficulty, JsError> {
    name.parse().map_err(|e: String| JsError::new(&e))
}

/// Stateful puzzle game.
/// Elapsed time is left to the host; `poll_win` reports the moment to stop the clock.
#[wasm_bindgen]
pub struct FourColorGame {
    session: Session<CpuBackend>,
    show_seeds: bool,
}

#[wasm_bindgen]
impl FourColorGame {
    /// Create a game on a `width` x `height` play area.
    /// `difficulty` is `easy`, `medium` or `hard` (or `1`-`3`).
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        difficulty: &str,
        seed: u32,
    ) -> Result<FourColorGame, JsError> {
        let config = GameConfig { width, height, ..GameConfig::default() };
        let difficulty = parse_difficulty(difficulty)?;
        let session = Session::new(config, difficulty, seed as u64, CpuBackend::new())?;
        Ok(Self { session, show_seeds: false })
    }

    /// Start a fresh board at the given difficulty.
    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), JsError> {
        self.session.set_difficulty(parse_difficulty(difficulty)?)?;
        Ok(())
    }

    /// Start a fresh board at the current difficulty.
    pub fn restart(&mut self) -> Result<(), JsError> {
        self.session.restart()?;
        Ok(())
    }

    /// Select the paint color by palette index (0 = red .. 3 = yellow).
    /// Returns false for an unknown index.
    pub fn select_color(&mut self, index: u8) -> bool {
        match PaletteColor::from_index(index as usize) {
            Some(color) => {
                self.session.select_color(color);
                true
            }
            None => false,
        }
    }

    pub fn selected_color(&self) -> u8 {
        self.session.selected_color().index() as u8
    }

    /// Paint the region under a click. Returns the region index, or -1 once
    /// the board is frozen.
    pub fn click(&mut self, x: i32, y: i32) -> i32 {
        self.session
            .paint_at(Point::new(x, y))
            .map_or(-1, |index| index as i32)
    }

    /// True once every region is painted without conflicts; freezes the board.
    pub fn poll_win(&mut self) -> bool {
        self.session.poll_win()
    }

    pub fn is_frozen(&self) -> bool {
        self.session.is_frozen()
    }

    pub fn region_count(&self) -> usize {
        self.session.regions().len()
    }

    /// Palette index per region, -1 when unpainted
    pub fn color_indices(&self) -> Vec<i32> {
        self.session.regions().iter().map(|r| r.color_index()).collect()
    }

    /// Flat [x0,y0, x1,y1, ...] seed points
    pub fn seeds(&self) -> Vec<i32> {
        self.session
            .regions()
            .iter()
            .flat_map(|r| [r.seed.x, r.seed.y])
            .collect()
    }

    /// Indices of regions sharing a color with a neighbor
    pub fn conflicts(&self) -> Vec<u32> {
        self.session.conflicts().into_iter().map(|i| i as u32).collect()
    }

    /// Flat [a0,b0, a1,b1, ...] bordering pairs with a < b
    pub fn adjacency_pairs(&self) -> Vec<u32> {
        self.session
            .adjacency()
            .pairs()
            .into_iter()
            .flat_map(|(a, b)| [a as u32, b as u32])
            .collect()
    }

    pub fn set_show_seeds(&mut self, show: bool) {
        self.show_seeds = show;
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.session.config().width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.session.config().height
    }

    /// Render the board as RGBA bytes (length = width*height*4), ready for
    /// `ImageData`.
    pub fn render_rgba(&self) -> Vec<u8> {
        let image = render_board(
            self.session.field(),
            self.session.regions(),
            self.session.adjacency(),
            RenderOptions { show_seeds: self.show_seeds },
        );
        image
            .as_raw()
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect()
    }
}
