use crate::foundation::error::{DrawError, DrawResult};

pub(crate) mod backend;
pub(crate) mod cpu;
pub(crate) mod engine;
pub(crate) mod surface;

/// A rendered surface as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert to a straight-alpha `image` buffer, e.g. for PNG output.
    pub fn to_rgba_image(&self) -> DrawResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            crate::assets::decode::unpremultiply_rgba8_in_place(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| DrawError::draw("frame byte length does not match its dimensions"))
    }
}

/// Settings for surfaces created by this crate.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// If set, the surface starts filled with this straight-alpha RGBA8 color.
    pub clear_rgba: Option<[u8; 4]>,
}
