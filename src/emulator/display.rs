//! The two framebuffers and the rules for mutating them.
//!
//! Both resolutions are kept alive for the lifetime of the emulator.
//! The mode flag only selects which one drawing, clearing and scrolling act on,
//! and which one is handed to the presentation layer.

use std::fmt;

pub const STANDARD_WIDTH: usize = 64;
pub const STANDARD_HEIGHT: usize = 32;
pub const EXTENDED_WIDTH: usize = 128;
pub const EXTENDED_HEIGHT: usize = 64;

/// Fixed distance of the horizontal scroll instructions.
pub const HORIZONTAL_SCROLL: usize = 4;

/// A monochrome pixel buffer, one byte per pixel holding 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer<const W: usize, const H: usize> {
    pixels: [[u8; W]; H],
}

pub type StandardFramebuffer = Framebuffer<STANDARD_WIDTH, STANDARD_HEIGHT>;
pub type ExtendedFramebuffer = Framebuffer<EXTENDED_WIDTH, EXTENDED_HEIGHT>;

impl<const W: usize, const H: usize> Framebuffer<W, H> {

    pub fn new() -> Self {
        Framebuffer {
            pixels: [[0; W]; H],
        }
    }

    pub fn width(&self) -> usize {
        W
    }

    pub fn height(&self) -> usize {
        H
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y][x]
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y]
    }

    pub fn clear(&mut self) {
        self.pixels = [[0; W]; H];
    }

    /// Move every row `n` rows down. Rows pushed past the bottom are lost.
    pub fn scroll_down(&mut self, n: usize) {
        let n = n.min(H);
        for y in (n..H).rev() {
            self.pixels[y] = self.pixels[y - n];
        }
        for row in self.pixels[..n].iter_mut() {
            *row = [0; W];
        }
    }

    pub fn scroll_right(&mut self, n: usize) {
        let n = n.min(W);
        for row in self.pixels.iter_mut() {
            row.copy_within(..W - n, n);
            row[..n].fill(0);
        }
    }

    pub fn scroll_left(&mut self, n: usize) {
        let n = n.min(W);
        for row in self.pixels.iter_mut() {
            row.copy_within(n.., 0);
            row[W - n..].fill(0);
        }
    }

    /// XOR an 8 pixel wide sprite onto the buffer with its top left corner at `(x, y)`.
    /// Coordinates wrap around both edges; 0-bits leave the destination alone.
    /// Returns whether any lit pixel was turned off.
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, bits) in sprite.iter().enumerate() {
            for col in 0..8 {
                if (bits >> (7 - col)) & 1 == 0 {
                    continue;
                }
                let pixel = &mut self.pixels[(y + row) % H][(x + col) % W];
                *pixel ^= 1;
                if *pixel == 0 {
                    collision = true;
                }
            }
        }
        collision
    }
}

impl<const W: usize, const H: usize> Default for Framebuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Both framebuffers plus the flag selecting the active one.
pub struct Display {
    standard: StandardFramebuffer,
    extended: ExtendedFramebuffer,
    extended_mode: bool,
}

impl Display {

    pub fn new() -> Display {
        Display {
            standard: Framebuffer::new(),
            extended: Framebuffer::new(),
            extended_mode: false,
        }
    }

    pub fn is_extended(&self) -> bool {
        self.extended_mode
    }

    /// Switch resolution. Neither buffer is cleared.
    pub fn set_extended(&mut self, extended: bool) {
        if self.extended_mode != extended {
            log::debug!("Switching to {} display", if extended { "extended" } else { "standard" });
        }
        self.extended_mode = extended;
    }

    /// Clear the active buffer only.
    pub fn clear(&mut self) {
        if self.extended_mode {
            self.extended.clear();
        } else {
            self.standard.clear();
        }
    }

    pub fn scroll_down(&mut self, rows: usize) {
        if self.extended_mode {
            self.extended.scroll_down(rows);
        } else {
            self.standard.scroll_down(rows);
        }
    }

    pub fn scroll_right(&mut self) {
        if self.extended_mode {
            self.extended.scroll_right(HORIZONTAL_SCROLL);
        } else {
            self.standard.scroll_right(HORIZONTAL_SCROLL);
        }
    }

    pub fn scroll_left(&mut self) {
        if self.extended_mode {
            self.extended.scroll_left(HORIZONTAL_SCROLL);
        } else {
            self.standard.scroll_left(HORIZONTAL_SCROLL);
        }
    }

    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        if self.extended_mode {
            self.extended.draw(x, y, sprite)
        } else {
            self.standard.draw(x, y, sprite)
        }
    }

    /// Read-only view of the active buffer.
    pub fn screen(&self) -> Screen<'_> {
        if self.extended_mode {
            Screen::Extended(&self.extended)
        } else {
            Screen::Standard(&self.standard)
        }
    }

    pub fn standard(&self) -> &StandardFramebuffer {
        &self.standard
    }

    pub fn extended(&self) -> &ExtendedFramebuffer {
        &self.extended
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

/// Whichever framebuffer is active, borrowed for presentation.
#[derive(Debug, Clone, Copy)]
pub enum Screen<'a> {
    Standard(&'a StandardFramebuffer),
    Extended(&'a ExtendedFramebuffer),
}

impl<'a> Screen<'a> {

    pub fn width(&self) -> usize {
        match self {
            Screen::Standard(fb) => fb.width(),
            Screen::Extended(fb) => fb.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Screen::Standard(fb) => fb.height(),
            Screen::Extended(fb) => fb.height(),
        }
    }

    pub fn is_extended(&self) -> bool {
        matches!(self, Screen::Extended(_))
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.row(y)[x]
    }

    pub fn row(&self, y: usize) -> &'a [u8] {
        match *self {
            Screen::Standard(fb) => fb.row(y),
            Screen::Extended(fb) => fb.row(y),
        }
    }

    pub fn rows(self) -> impl Iterator<Item = &'a [u8]> {
        (0..self.height()).map(move |y| self.row(y))
    }
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for pixel in row {
                write!(f, "{}", if *pixel == 1 { "#" } else { " " })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn lit(fb: &StandardFramebuffer) -> Vec<(usize, usize)> {
        let mut pixels = Vec::new();
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.get(x, y) == 1 {
                    pixels.push((x, y));
                }
            }
        }
        pixels
    }

    #[test]
    fn draw_lights_pixels_msb_first() {
        let mut fb = StandardFramebuffer::new();
        let collision = fb.draw(2, 1, &[0b1000_0001]);
        assert!(!collision);
        assert_eq!(lit(&fb), vec![(2, 1), (9, 1)]);
    }

    #[test]
    fn drawing_over_lit_pixel_collides() {
        let mut fb = StandardFramebuffer::new();
        fb.draw(0, 0, &[0b1100_0000]);
        assert!(fb.draw(1, 0, &[0b1000_0000]));
        assert_eq!(lit(&fb), vec![(0, 0)]);
    }

    #[test]
    fn zero_bits_are_transparent() {
        let mut fb = StandardFramebuffer::new();
        fb.draw(0, 0, &[0xFF]);
        assert!(!fb.draw(0, 0, &[0x00]));
        assert_eq!(lit(&fb).len(), 8);
    }

    #[test]
    fn draw_wraps_instead_of_clipping() {
        let mut fb = StandardFramebuffer::new();
        fb.draw(STANDARD_WIDTH - 1, STANDARD_HEIGHT - 1, &[0b1100_0000, 0b1000_0000]);
        assert_eq!(lit(&fb), vec![(63, 0), (0, 31), (63, 31)]);
    }

    #[test]
    fn draw_wraps_coordinates_beyond_the_buffer() {
        let mut fb = StandardFramebuffer::new();
        fb.draw(64 + 3, 32 + 2, &[0b1000_0000]);
        assert_eq!(lit(&fb), vec![(3, 2)]);
    }

    #[test]
    fn scroll_down_moves_rows_and_zero_fills() {
        let mut fb = StandardFramebuffer::new();
        fb.draw(5, 0, &[0b1000_0000]);
        fb.draw(5, 30, &[0b1000_0000]);
        fb.scroll_down(3);
        assert_eq!(lit(&fb), vec![(5, 3)]);
    }

    #[test]
    fn scroll_down_past_height_clears() {
        let mut fb = StandardFramebuffer::new();
        fb.draw(0, 0, &[0xFF, 0xFF]);
        fb.scroll_down(40);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn scroll_right_drops_pixels_past_the_edge() {
        let mut fb = StandardFramebuffer::new();
        fb.draw(0, 0, &[0b1000_0000]);
        fb.draw(62, 1, &[0b1000_0000]);
        fb.scroll_right(HORIZONTAL_SCROLL);
        assert_eq!(lit(&fb), vec![(4, 0)]);
    }

    #[test]
    fn scroll_left_drops_pixels_past_the_edge() {
        let mut fb = StandardFramebuffer::new();
        fb.draw(2, 0, &[0b1000_0000]);
        fb.draw(63, 1, &[0b1000_0000]);
        fb.scroll_left(HORIZONTAL_SCROLL);
        assert_eq!(lit(&fb), vec![(59, 1)]);
    }

    #[test]
    fn clear_acts_on_active_buffer_only() {
        let mut display = Display::new();
        display.draw(0, 0, &[0xFF]);
        display.set_extended(true);
        display.draw(0, 0, &[0xFF]);

        display.clear();
        assert!(display.extended().row(0).iter().all(|p| *p == 0));
        assert_eq!(display.standard().get(0, 0), 1);

        display.set_extended(false);
        display.clear();
        assert!(display.standard().row(0).iter().all(|p| *p == 0));
    }

    #[test]
    fn mode_switch_keeps_both_buffers() {
        let mut display = Display::new();
        display.draw(1, 1, &[0b1000_0000]);
        display.set_extended(true);
        assert_eq!(display.screen().width(), EXTENDED_WIDTH);
        assert_eq!(display.screen().get(1, 1), 0);
        display.set_extended(false);
        assert_eq!(display.screen().height(), STANDARD_HEIGHT);
        assert_eq!(display.screen().get(1, 1), 1);
    }

    #[test]
    fn extended_draw_wraps_at_extended_size() {
        let mut display = Display::new();
        display.set_extended(true);
        display.draw(127, 63, &[0b1100_0000]);
        assert_eq!(display.extended().get(127, 63), 1);
        assert_eq!(display.extended().get(0, 63), 1);
        assert!(display.standard().row(31).iter().all(|p| *p == 0));
    }

    #[test]
    fn screen_renders_as_text() {
        let mut display = Display::new();
        display.draw(0, 0, &[0b1010_0000]);
        let text = display.screen().to_string();
        let first_line = text.lines().next().unwrap();
        assert_eq!(&first_line[..4], "# # ");
        assert_eq!(text.lines().count(), STANDARD_HEIGHT);
    }

    proptest! {
        #[test]
        fn drawing_twice_restores_the_buffer(
            x in 0usize..256,
            y in 0usize..256,
            sprite in proptest::collection::vec(any::<u8>(), 0..16),
            background in proptest::collection::vec(any::<u8>(), 0..16),
        ) {
            let mut fb = StandardFramebuffer::new();
            fb.draw(0, 0, &background);
            let before = fb.clone();
            fb.draw(x, y, &sprite);
            let second = fb.draw(x, y, &sprite);
            prop_assert_eq!(&fb, &before);
            // The second draw only collides where the first one lit a dark pixel
            let mut expected = false;
            for (row, bits) in sprite.iter().enumerate() {
                for col in 0..8 {
                    if (bits >> (7 - col)) & 1 == 1
                        && before.get((x + col) % STANDARD_WIDTH, (y + row) % STANDARD_HEIGHT) == 0
                    {
                        expected = true;
                    }
                }
            }
            prop_assert_eq!(second, expected);
        }
    }
}
