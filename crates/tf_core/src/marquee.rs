//! Horizontally scrolling price strip.
//!
//! The strip holds the items twice so that scrolling past the first copy can
//! jump back to offset zero without a visible seam.

use crate::types::PriceTick;

const SEPARATOR: &str = "   ";

#[derive(Debug, Clone)]
pub struct Marquee {
    strip: Vec<char>,
    offset: usize,
    speed: usize,
}

impl Marquee {
    pub fn new(labels: &[String], speed: usize) -> Self {
        let single: String = labels
            .iter()
            .map(|label| format!("{}{}", label, SEPARATOR))
            .collect();
        let strip = single.chars().chain(single.chars()).collect();
        Self { strip, offset: 0, speed: speed.max(1) }
    }

    pub fn from_ticks(ticks: &[PriceTick], speed: usize) -> Self {
        let labels: Vec<String> = ticks.iter().map(PriceTick::marquee_label).collect();
        Self::new(&labels, speed)
    }

    pub fn is_empty(&self) -> bool {
        self.strip.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Width of the doubled strip in characters.
    pub fn width(&self) -> usize {
        self.strip.len()
    }

    /// Advances one frame and wraps once the first copy has scrolled by.
    pub fn tick(&mut self) {
        if self.strip.is_empty() {
            return;
        }
        self.offset += self.speed;
        if self.offset >= self.strip.len() / 2 {
            self.offset = 0;
        }
    }

    /// The `width` characters currently in view.
    pub fn frame(&self, width: usize) -> String {
        if self.strip.is_empty() {
            return String::new();
        }
        self.strip
            .iter()
            .cycle()
            .skip(self.offset)
            .take(width)
            .collect()
    }
}
