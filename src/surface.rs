use std::io::Write;

use crossterm::terminal;
use tracing::info;

use crate::error::{Error, Result};
use crate::fireworks::Color;

/// 2D drawing capability the simulation renders onto.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn set_size(&mut self, width: f32, height: f32);
    /// Size of the physical area backing the surface.
    fn bounds(&self) -> (f32, f32);
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn set_fill_color(&mut self, color: &Color);
    fn set_global_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
}

/// Pixel buffer shown in the terminal with half-block cells.
///
/// Every terminal cell holds two vertically stacked pixels, so the pixel
/// height is twice the row count.
pub struct TerminalCanvas {
    width: usize,
    height: usize,
    bounds: (u16, u16),
    pixels: Vec<[f32; 3]>,
    background: [f32; 3],
    fill: [f32; 3],
    alpha: f32,
    output_buf: Vec<u8>,
}

impl TerminalCanvas {
    /// Claims the current terminal area. Fails when the terminal cannot be
    /// queried or has no area to draw on.
    pub fn acquire(background: Color) -> Result<Self> {
        let (cols, rows) = terminal::size().map_err(Error::SurfaceUnavailable)?;
        if cols == 0 || rows == 0 {
            return Err(Error::EmptySurface { cols, rows });
        }
        info!(cols, rows, "acquired terminal surface");

        let mut canvas = Self {
            width: 0,
            height: 0,
            bounds: (cols, rows),
            pixels: Vec::new(),
            background: rgb(&background),
            fill: rgb(&Color::WHITE),
            alpha: 1.0,
            output_buf: Vec::new(),
        };
        let (width, height) = canvas.bounds();
        canvas.set_size(width, height);
        Ok(canvas)
    }

    /// Records a new terminal size. Takes effect on the next `set_size`.
    pub fn set_bounds(&mut self, cols: u16, rows: u16) {
        self.bounds = (cols, rows);
    }

    fn pixel_span(start: f32, extent: f32, limit: usize) -> std::ops::Range<usize> {
        let from = start.floor().max(0.0);
        let to = (start + extent).ceil().max(0.0);
        let from = (from as usize).min(limit);
        let to = (to as usize).min(limit);
        from..to.max(from)
    }

    /// Writes the buffer to `out`, emitting color escapes only on change.
    pub fn present(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Option<(u8, u8, u8)> = None;
        let mut prev_bot: Option<(u8, u8, u8)> = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = to_rgb8(self.pixels[y * self.width + x]);
                let bot = if y + 1 < self.height {
                    to_rgb8(self.pixels[(y + 1) * self.width + x])
                } else {
                    to_rgb8(self.background)
                };

                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }
}

impl Surface for TerminalCanvas {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0) as usize;
        self.height = height.max(0.0) as usize;
        self.pixels = vec![self.background; self.width * self.height];
        self.output_buf = Vec::with_capacity(self.width * self.height * 25);
    }

    fn bounds(&self) -> (f32, f32) {
        (self.bounds.0 as f32, self.bounds.1 as f32 * 2.0)
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let cols = Self::pixel_span(x, width, self.width);
        for row in Self::pixel_span(y, height, self.height) {
            let start = row * self.width;
            self.pixels[start + cols.start..start + cols.end].fill(self.background);
        }
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.fill = rgb(color);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if self.alpha <= 0.0 {
            return;
        }
        let alpha = self.alpha;
        let cols = Self::pixel_span(x, width, self.width);
        for row in Self::pixel_span(y, height, self.height) {
            let start = row * self.width;
            for pixel in &mut self.pixels[start + cols.start..start + cols.end] {
                for (dst, src) in pixel.iter_mut().zip(self.fill) {
                    *dst = src * alpha + *dst * (1.0 - alpha);
                }
            }
        }
    }
}

fn rgb(color: &Color) -> [f32; 3] {
    let (r, g, b) = color.to_rgb8();
    [r as f32, g as f32, b as f32]
}

fn to_rgb8(pixel: [f32; 3]) -> (u8, u8, u8) {
    Color::new(pixel[0], pixel[1], pixel[2]).to_rgb8()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Surface;
    use crate::fireworks::Color;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum DrawOp {
        Clear,
        Fill {
            color: Color,
            alpha: f32,
            rect: (f32, f32, f32, f32),
        },
    }

    /// Surface that remembers what was drawn.
    pub(crate) struct RecordingSurface {
        pub(crate) width: f32,
        pub(crate) height: f32,
        pub(crate) bounds: (f32, f32),
        pub(crate) ops: Vec<DrawOp>,
        fill: Color,
        alpha: f32,
    }

    impl RecordingSurface {
        pub(crate) fn new(width: f32, height: f32) -> Self {
            Self {
                width,
                height,
                bounds: (width, height),
                ops: Vec::new(),
                fill: Color::BLACK,
                alpha: 1.0,
            }
        }

        pub(crate) fn fills(&self) -> impl Iterator<Item = (Color, f32, (f32, f32, f32, f32))> + '_ {
            self.ops.iter().filter_map(|op| match op {
                DrawOp::Fill { color, alpha, rect } => Some((*color, *alpha, *rect)),
                DrawOp::Clear => None,
            })
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> f32 {
            self.width
        }

        fn height(&self) -> f32 {
            self.height
        }

        fn set_size(&mut self, width: f32, height: f32) {
            self.width = width;
            self.height = height;
        }

        fn bounds(&self) -> (f32, f32) {
            self.bounds
        }

        fn clear_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {
            self.ops.push(DrawOp::Clear);
        }

        fn set_fill_color(&mut self, color: &Color) {
            self.fill = *color;
        }

        fn set_global_alpha(&mut self, alpha: f32) {
            self.alpha = alpha;
        }

        fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
            self.ops.push(DrawOp::Fill {
                color: self.fill,
                alpha: self.alpha,
                rect: (x, y, width, height),
            });
        }
    }
}
