use std::collections::HashMap;

use crate::config::{FontFamily, PT_TO_MM};

/// Advance widths for one bold standard-14 font.
/// All widths are in 1/1000 of the font size
pub struct FontMetrics {
    widths: HashMap<char, u16>,
    default_width: u16,
}

impl FontMetrics {
    fn new(default_width: u16) -> Self {
        Self {
            widths: HashMap::new(),
            default_width,
        }
    }

    fn with_widths(mut self, widths: &[(char, u16)]) -> Self {
        for &(ch, width) in widths {
            self.widths.insert(ch, width);
        }
        self
    }

    pub fn char_width(&self, ch: char) -> u16 {
        self.widths.get(&ch).copied().unwrap_or(self.default_width)
    }
}

lazy_static::lazy_static! {
    static ref FONT_METRICS: HashMap<FontFamily, FontMetrics> = {
        let mut metrics = HashMap::new();

        // Helvetica-Bold
        metrics.insert(FontFamily::Helvetica, FontMetrics::new(611).with_widths(&[
            (' ', 278), ('!', 333), ('"', 474), ('#', 556), ('$', 556), ('%', 889),
            ('&', 722), ('\'', 238), ('(', 333), (')', 333), ('*', 389), ('+', 584),
            (',', 278), ('-', 333), ('.', 278), ('/', 278), ('0', 556), ('1', 556),
            ('2', 556), ('3', 556), ('4', 556), ('5', 556), ('6', 556), ('7', 556),
            ('8', 556), ('9', 556), (':', 333), (';', 333), ('<', 584), ('=', 584),
            ('>', 584), ('?', 611), ('@', 975), ('A', 722), ('B', 722), ('C', 722),
            ('D', 722), ('E', 667), ('F', 611), ('G', 778), ('H', 722), ('I', 278),
            ('J', 556), ('K', 722), ('L', 611), ('M', 833), ('N', 722), ('O', 778),
            ('P', 667), ('Q', 778), ('R', 722), ('S', 667), ('T', 611), ('U', 722),
            ('V', 667), ('W', 944), ('X', 667), ('Y', 667), ('Z', 611), ('[', 333),
            ('\\', 278), (']', 333), ('^', 584), ('_', 556), ('`', 333), ('a', 556),
            ('b', 611), ('c', 556), ('d', 611), ('e', 556), ('f', 333), ('g', 611),
            ('h', 611), ('i', 278), ('j', 278), ('k', 556), ('l', 278), ('m', 889),
            ('n', 611), ('o', 611), ('p', 611), ('q', 611), ('r', 389), ('s', 556),
            ('t', 333), ('u', 611), ('v', 556), ('w', 778), ('x', 556), ('y', 556),
            ('z', 500), ('{', 389), ('|', 280), ('}', 389), ('~', 584),
        ]));

        // Times-Bold
        metrics.insert(FontFamily::Times, FontMetrics::new(500).with_widths(&[
            (' ', 250), ('!', 333), ('"', 555), ('#', 500), ('$', 500), ('%', 1000),
            ('&', 833), ('\'', 278), ('(', 333), (')', 333), ('*', 500), ('+', 570),
            (',', 250), ('-', 333), ('.', 250), ('/', 278), ('0', 500), ('1', 500),
            ('2', 500), ('3', 500), ('4', 500), ('5', 500), ('6', 500), ('7', 500),
            ('8', 500), ('9', 500), (':', 333), (';', 333), ('<', 570), ('=', 570),
            ('>', 570), ('?', 500), ('@', 930), ('A', 722), ('B', 667), ('C', 722),
            ('D', 722), ('E', 667), ('F', 611), ('G', 778), ('H', 778), ('I', 389),
            ('J', 500), ('K', 778), ('L', 667), ('M', 944), ('N', 722), ('O', 778),
            ('P', 611), ('Q', 778), ('R', 722), ('S', 556), ('T', 667), ('U', 722),
            ('V', 722), ('W', 1000), ('X', 722), ('Y', 722), ('Z', 667), ('[', 333),
            ('\\', 278), (']', 333), ('^', 581), ('_', 500), ('`', 333), ('a', 500),
            ('b', 556), ('c', 444), ('d', 556), ('e', 444), ('f', 333), ('g', 500),
            ('h', 556), ('i', 278), ('j', 333), ('k', 556), ('l', 278), ('m', 833),
            ('n', 556), ('o', 500), ('p', 556), ('q', 556), ('r', 444), ('s', 389),
            ('t', 333), ('u', 556), ('v', 500), ('w', 722), ('x', 500), ('y', 500),
            ('z', 444), ('{', 394), ('|', 220), ('}', 394), ('~', 520),
        ]));

        // Courier-Bold is monospaced
        metrics.insert(FontFamily::Courier, FontMetrics::new(600));

        metrics
    };
}

/// Width of `text` in points at `font_size`.
pub fn measure_text(text: &str, font: FontFamily, font_size: f32) -> f32 {
    let metrics = &FONT_METRICS[&font];
    let units: u32 = text.chars().map(|ch| metrics.char_width(ch) as u32).sum();
    units as f32 * font_size / 1000.0
}

pub fn measure_text_mm(text: &str, font: FontFamily, font_size: f32) -> f32 {
    measure_text(text, font, font_size) * PT_TO_MM
}
