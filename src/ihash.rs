use image::{imageops::FilterType, DynamicImage, GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::error::HashError;
use crate::fingerprint::Fingerprint;

/// Which perceptual hash to compute. Fingerprints from different variants are not comparable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashVariant {
    /// Threshold an 8x8 grid against its mean intensity.
    Average,
    /// Compare horizontally adjacent pixels of a 9x8 grid.
    #[default]
    Gradient,
}

impl HashVariant {
    pub fn hash(self, region: &DynamicImage) -> Result<Fingerprint, HashError> {
        match self {
            HashVariant::Average => ahash(region),
            HashVariant::Gradient => dhash(region),
        }
    }
}

/**
 * Resamples to `width`x`height` and converts to 8-bit luma.
 *
 * Uses the ITU-R 601 weights on the resampled RGB rather than `to_luma8`, which weighs
 * channels per Rec. 709, so the grayscale matches what browsers and PIL produce.
 */
fn small_gray(
    region: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<GrayImage, HashError> {
    if region.width() == 0 || region.height() == 0 {
        return Err(HashError::DegenerateRegion {
            width: region.width(),
            height: region.height(),
        });
    }
    let rgb = region.resize_exact(width, height, filter).to_rgb8();
    Ok(GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
        Luma([luma as u8])
    }))
}

pub fn ahash_with(region: &DynamicImage, filter: FilterType) -> Result<Fingerprint, HashError> {
    let gray = small_gray(region, 8, 8, filter)?;
    let total: u32 = gray.pixels().map(|p| p.0[0] as u32).sum();
    let mean = total as f64 / 64.;
    Ok(Fingerprint::from_bit_iter(
        gray.pixels().map(|p| p.0[0] as f64 >= mean),
    ))
}

pub fn ahash(region: &DynamicImage) -> Result<Fingerprint, HashError> {
    ahash_with(region, FilterType::Triangle)
}

pub fn dhash_with(region: &DynamicImage, filter: FilterType) -> Result<Fingerprint, HashError> {
    let gray = small_gray(region, 9, 8, filter)?;
    let mut bits = Vec::with_capacity(64);
    for (_, mut row) in gray.enumerate_rows() {
        if let Some((_, _, mut prev)) = row.next() {
            for (_, _, pixel) in row {
                bits.push(prev.0 < pixel.0);
                prev = pixel;
            }
        }
    }
    Ok(Fingerprint::from_bit_iter(bits))
}

pub fn dhash(region: &DynamicImage) -> Result<Fingerprint, HashError> {
    dhash_with(region, FilterType::Triangle)
}

/// Decodes an encoded card image and converts it to RGB.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, HashError> {
    let image = image::load_from_memory(bytes)?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}
