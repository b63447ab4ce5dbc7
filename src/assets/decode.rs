use std::{
    io::{BufRead, Cursor, Seek},
    path::Path,
    sync::Arc,
};

use crate::{
    assets::PreparedImage,
    foundation::error::{DrawError, DrawResult},
};

/// Decode an in-memory encoded image (format sniffed from content).
pub fn decode_image(bytes: &[u8]) -> DrawResult<PreparedImage> {
    decode_reader(image::ImageReader::new(Cursor::new(bytes)), "memory")
}

/// Decode straight from a file on disk (format sniffed from content).
pub fn decode_file(path: &Path) -> DrawResult<PreparedImage> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| DrawError::io(format!("open '{}': {e}", path.display())))?;
    decode_reader(reader, &path.display().to_string())
}

fn decode_reader<R: BufRead + Seek>(
    reader: image::ImageReader<R>,
    origin: &str,
) -> DrawResult<PreparedImage> {
    let reader = reader
        .with_guessed_format()
        .map_err(|e| DrawError::io(format!("sniff image format of '{origin}': {e}")))?;
    let dyn_img = reader
        .decode()
        .map_err(|e| DrawError::decode(format!("decode image from '{origin}': {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = (((*c as u16) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
