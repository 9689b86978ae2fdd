#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lib::error::FetchError;
use lib::Fetch;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::io::Cursor;

/// Smooth synthetic card face. `u`,`v` run over the whole card in 0..1.
pub fn card(width: u32, height: u32, art: fn(f64, f64) -> f64) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let v = art(x as f64 / width as f64, y as f64 / height as f64).clamp(0., 255.) as u8;
        Rgb([v, v, v])
    }))
}

pub fn waves(u: f64, v: f64) -> f64 {
    128. + 90. * (2. * PI * (1.7 * u + 0.6 * v)).sin() + 30. * (2. * PI * (2.3 * v - 0.9 * u)).cos()
}

pub fn stripes(u: f64, v: f64) -> f64 {
    128. + 100. * (2. * PI * (0.5 * u - 2.1 * v)).sin() + 20. * (2. * PI * 3.1 * u).cos()
}

pub fn png(image: &DynamicImage) -> Vec<u8> {
    let mut out = Cursor::new(vec![]);
    image.write_to(&mut out, ImageFormat::Png).expect("encode png");
    out.into_inner()
}

/// Canned HTTP bodies keyed by URL; anything else answers 404.
pub struct Responses(HashMap<String, Vec<u8>>);

impl Responses {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn json(mut self, url: &str, body: serde_json::Value) -> Self {
        self.0.insert(url.to_string(), body.to_string().into_bytes());
        self
    }

    pub fn bytes(mut self, url: &str, body: Vec<u8>) -> Self {
        self.0.insert(url.to_string(), body);
        self
    }
}

impl Fetch for Responses {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.0.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

pub fn is_fingerprint(s: &str) -> bool {
    s.len() == 16 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
