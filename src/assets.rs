use std::sync::Arc;

pub(crate) mod cache;
pub(crate) mod decode;
pub(crate) mod loader;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(4)
    }
}

/// Status reported by a handle after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageStatus {
    Ok,
    /// Pixel buffer length disagrees with the reported dimensions.
    Corrupt,
}

/// Shared reference to a decoded image resource.
///
/// Clones refer to the same resource; [`ImageHandle::same_resource`] compares identity rather
/// than pixel content. The resource is released when the last clone is dropped.
#[derive(Clone, Debug)]
pub struct ImageHandle {
    inner: Arc<HandleInner>,
}

#[derive(Debug)]
struct HandleInner {
    image: PreparedImage,
    status: ImageStatus,
}

impl ImageHandle {
    pub fn new(image: PreparedImage) -> Self {
        let status = match image.expected_len() {
            Some(len) if len == image.rgba8_premul.len() => ImageStatus::Ok,
            _ => ImageStatus::Corrupt,
        };
        Self {
            inner: Arc::new(HandleInner { image, status }),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.image.width
    }

    pub fn height(&self) -> u32 {
        self.inner.image.height
    }

    pub fn status(&self) -> ImageStatus {
        self.inner.status
    }

    pub fn image(&self) -> &PreparedImage {
        &self.inner.image
    }

    pub fn same_resource(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identity of the underlying resource; equal for clones, stable while any clone is alive.
    pub(crate) fn resource_id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Number of live references to the underlying resource, this one included.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}
