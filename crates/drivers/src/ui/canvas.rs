use font8x8::UnicodeFonts;

pub const GLYPH_SIZE: usize = 8;

/// Software framebuffer in minifb's `0RGB` layout.
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn fill_rect(&mut self, left: usize, top: usize, w: usize, h: usize, color: u32) {
        let right = left.saturating_add(w).min(self.width);
        let bottom = top.saturating_add(h).min(self.height);
        for y in top.min(bottom)..bottom {
            let row = y * self.width;
            self.pixels[row + left.min(right)..row + right].fill(color);
        }
    }

    pub fn draw_rect(&mut self, left: usize, top: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 {
            return;
        }
        self.fill_rect(left, top, w, 1, color);
        self.fill_rect(left, top + h - 1, w, 1, color);
        self.fill_rect(left, top, 1, h, color);
        self.fill_rect(left + w - 1, top, 1, h, color);
    }

    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, color: u32) {
        let mut cursor_x = x;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            self.draw_char(cursor_x, y, ch, color);
            cursor_x = cursor_x.saturating_add(GLYPH_SIZE);
        }
    }

    /// Draws at most `max_width` pixels of text, ending with `..` when cut.
    pub fn draw_text_clipped(&mut self, x: usize, y: usize, text: &str, max_width: usize, color: u32) {
        let max_chars = max_width / GLYPH_SIZE;
        if text.chars().count() <= max_chars {
            self.draw_text(x, y, text, color);
            return;
        }
        let kept: String = text.chars().take(max_chars.saturating_sub(2)).collect();
        self.draw_text(x, y, &format!("{kept}.."), color);
    }

    fn draw_char(&mut self, x: usize, y: usize, ch: char, color: u32) {
        let glyph = font8x8::BASIC_FONTS.get(ch).unwrap_or([0; 8]);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if (bits >> col) & 1 == 1 {
                    self.set_pixel(x + col, y + row, color);
                }
            }
        }
    }

    /// Copies `pixels` (row-major, `src_width` wide) with its top-left corner at `(left, top)`,
    /// clipped to the rectangle `clip` = `(left, top, width, height)`.
    pub fn blit(
        &mut self,
        pixels: &[u32],
        src_width: usize,
        left: isize,
        top: isize,
        clip: (usize, usize, usize, usize),
    ) {
        if src_width == 0 {
            return;
        }
        let src_height = pixels.len() / src_width;
        let (clip_left, clip_top, clip_width, clip_height) = clip;
        let clip_right = (clip_left + clip_width).min(self.width);
        let clip_bottom = (clip_top + clip_height).min(self.height);

        for sy in 0..src_height {
            let dy = top + sy as isize;
            if dy < clip_top as isize || dy >= clip_bottom as isize {
                continue;
            }
            for sx in 0..src_width {
                let dx = left + sx as isize;
                if dx < clip_left as isize || dx >= clip_right as isize {
                    continue;
                }
                self.pixels[dy as usize * self.width + dx as usize] = pixels[sy * src_width + sx];
            }
        }
    }
}

pub fn text_width(text: &str) -> usize {
    text.chars().count() * GLYPH_SIZE
}

pub fn darken_color(color: u32, amount: u8) -> u32 {
    let r = ((color >> 16) & 0xFF) as u8;
    let g = ((color >> 8) & 0xFF) as u8;
    let b = (color & 0xFF) as u8;
    pack_rgb(r.saturating_sub(amount), g.saturating_sub(amount), b.saturating_sub(amount))
}

pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

pub fn unpack_rgb(color: u32) -> [u8; 3] {
    [
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    ]
}
