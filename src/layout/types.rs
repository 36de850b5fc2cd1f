use serde::Serialize;

use crate::model::{PhotoId, PhotoItem};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn inflate(self, pad: f32) -> Self {
        if pad <= 0.0 {
            return self;
        }
        Self {
            x: self.x - pad,
            y: self.y - pad,
            width: self.width + pad * 2.0,
            height: self.height + pad * 2.0,
        }
    }
}

/// One photo going into a placement run, sized in pixels at the current
/// calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    pub photo: PhotoId,
    pub width: f32,
    pub height: f32,
}

impl LayoutItem {
    pub fn new(photo: PhotoId, width: f32, height: f32) -> Self {
        Self {
            photo,
            width,
            height,
        }
    }

    pub fn from_photo(photo: &PhotoItem, pixels_per_cm: f32) -> Self {
        let (width, height) = photo.pixel_size(pixels_per_cm);
        Self::new(photo.id.clone(), width, height)
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Output of a placement run: where a photo lands on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedItem {
    pub photo: PhotoId,
    pub rect: Rect,
}

impl PlacedItem {
    pub fn new(photo: PhotoId, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            photo,
            rect: Rect::new(x, y, width, height),
        }
    }
}

/// Summary of a finished layout run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub algorithm: super::Algorithm,
    pub requested: usize,
    pub placed: usize,
    pub fill_ratio: f32,
    pub in_bounds: bool,
    pub overlaps: usize,
}
