use image::DynamicImage;

// Crop margins in percent of the card's width/height.
const SIDE_PCT: u64 = 12;
const TOP_PCT: u64 = 18;
const BOTTOM_PCT: u64 = 28;

/// Pixel bounds of the artwork, half-open: `left..right`, `top..bottom`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Bounds {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

fn frac(length: u32, pct: u64) -> u32 {
    (length as u64 * pct / 100) as u32
}

/**
 * Artwork bounds for a portrait card of the given size.
 *
 * The margins are coarse on purpose so the same numbers hold across sets: the header with
 * name and cost, the rules text box and the border all fall outside. Fractions are truncated.
 */
pub fn artwork_bounds(width: u32, height: u32) -> Bounds {
    Bounds {
        left: frac(width, SIDE_PCT),
        right: frac(width, 100 - SIDE_PCT),
        top: frac(height, TOP_PCT),
        bottom: frac(height, 100 - BOTTOM_PCT),
    }
}

/// Crops the artwork out of a full card image. May be empty for tiny inputs.
pub fn extract_artwork(card: &DynamicImage) -> DynamicImage {
    let b = artwork_bounds(card.width(), card.height());
    card.crop_imm(b.left, b.top, b.width(), b.height())
}
