use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::{ImageHandle, ImageStatus},
    foundation::core::{Affine, InterpolationMode, Rect},
    foundation::error::{DrawError, DrawResult},
    render::{FrameRGBA, RenderSettings, surface::Surface},
};

/// CPU raster surface backed by `vello_cpu`.
///
/// Draws are recorded into one render context and rasterized on [`CpuSurface::readback`].
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    transform: Affine,
    interpolation: InterpolationMode,
    draws: usize,
    // Handles are kept alongside their pixmaps so a resource id cannot be reused while cached.
    image_cache: HashMap<usize, (ImageHandle, vello_cpu::ImageSource)>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("transform", &self.transform)
            .field("interpolation", &self.interpolation)
            .field("draws", &self.draws)
            .field("cached_images", &self.image_cache.len())
            .finish()
    }
}

impl CpuSurface {
    pub fn new(width: u32, height: u32, settings: &RenderSettings) -> DrawResult<Self> {
        let width: u16 = width
            .try_into()
            .map_err(|_| DrawError::draw("surface width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| DrawError::draw("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(DrawError::draw("surface must be at least 1x1"));
        }

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        if let Some([r, g, b, a]) = settings.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }

        Ok(Self {
            width,
            height,
            ctx,
            transform: Affine::IDENTITY,
            interpolation: InterpolationMode::Bilinear,
            draws: 0,
            image_cache: HashMap::new(),
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Number of image draws accepted so far.
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    /// Number of distinct images converted to backend pixmaps by this surface.
    pub fn cached_image_count(&self) -> usize {
        self.image_cache.len()
    }

    fn image_source(&mut self, image: &ImageHandle) -> DrawResult<vello_cpu::ImageSource> {
        if let Some((_, source)) = self.image_cache.get(&image.resource_id()) {
            return Ok(source.clone());
        }

        let prepared = image.image();
        let pixmap = image_premul_bytes_to_pixmap(
            prepared.rgba8_premul.as_slice(),
            prepared.width,
            prepared.height,
        )?;
        let source = vello_cpu::ImageSource::Pixmap(Arc::new(pixmap));
        self.image_cache
            .insert(image.resource_id(), (image.clone(), source.clone()));
        Ok(source)
    }

    /// Rasterize everything drawn so far.
    pub fn readback(&mut self) -> DrawResult<FrameRGBA> {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl Surface for CpuSurface {
    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn interpolation_mode(&self) -> InterpolationMode {
        self.interpolation
    }

    fn set_interpolation_mode(&mut self, mode: InterpolationMode) {
        self.interpolation = mode;
    }

    fn draw_image(&mut self, image: &ImageHandle, src: Rect, dest: Rect) -> DrawResult<()> {
        if image.status() != ImageStatus::Ok {
            return Err(DrawError::draw("image pixel buffer is inconsistent"));
        }
        if !(src.width() > 0.0 && src.height() > 0.0) {
            return Err(DrawError::draw("source rect must have positive size"));
        }
        if dest.width() == 0.0 || dest.height() == 0.0 {
            return Ok(());
        }

        let place = Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(dest.width() / src.width(), dest.height() / src.height())
            * Affine::translate((-src.x0, -src.y0));
        let full = self.transform * place;
        if !full.is_finite() {
            return Err(DrawError::draw("draw transform is not finite"));
        }

        let paint = vello_cpu::Image {
            image: self.image_source(image)?,
            sampler: vello_cpu::peniko::ImageSampler {
                quality: sampler_quality(self.interpolation),
                ..vello_cpu::peniko::ImageSampler::default()
            },
        };
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(full));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(src.x0, src.y0, src.x1, src.y1));
        self.draws += 1;
        Ok(())
    }
}

fn sampler_quality(mode: InterpolationMode) -> vello_cpu::peniko::ImageQuality {
    use vello_cpu::peniko::ImageQuality;

    match mode {
        InterpolationMode::NearestNeighbor | InterpolationMode::LowQuality => ImageQuality::Low,
        InterpolationMode::Bilinear | InterpolationMode::HighQualityBilinear => {
            ImageQuality::Medium
        }
        InterpolationMode::Bicubic | InterpolationMode::HighQualityBicubic => ImageQuality::High,
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> DrawResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| DrawError::draw("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| DrawError::draw("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(DrawError::draw("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
