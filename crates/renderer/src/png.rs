//! PNG encoding for RGBA poster rasters.
//!
//! Writes 8-bit RGBA (color type 6) with an optional `pHYs` chunk so the
//! print resolution travels with the file.

use std::io::Write;
use std::path::Path;

use image::RgbaImage;
use poster_common::{PosterError, PosterResult};
use rayon::prelude::*;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const METERS_PER_INCH: f32 = 0.0254;

/// Create an RGBA PNG, recording `dpi` in a `pHYs` chunk when given.
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png_with_dpi(
    pixels: &[u8],
    width: usize,
    height: usize,
    dpi: Option<f32>,
) -> Result<Vec<u8>, String> {
    if pixels.len() != width * height * 4 {
        return Err(format!(
            "pixel buffer is {} bytes, expected {} for {}x{}",
            pixels.len(),
            width * height * 4,
            width,
            height
        ));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::new();
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // pHYs chunk (pixels per meter, unit = meter)
    if let Some(dpi) = dpi {
        let ppm = (dpi / METERS_PER_INCH).round() as u32;
        let mut phys = Vec::with_capacity(9);
        phys.extend_from_slice(&ppm.to_be_bytes());
        phys.extend_from_slice(&ppm.to_be_bytes());
        phys.push(1);
        write_chunk(&mut png, b"pHYs", &phys);
    }

    // IDAT chunk (image data)
    let idat_data = deflate_idat_rgba(pixels, width, height)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode `img` and write it to `path`.
pub fn write_png(path: &Path, img: &RgbaImage, dpi: f32) -> PosterResult<()> {
    let (width, height) = img.dimensions();
    let bytes = create_png_with_dpi(img.as_raw(), width as usize, height as usize, Some(dpi))
        .map_err(PosterError::Export)?;
    std::fs::write(path, bytes)
        .map_err(|e| PosterError::Export(format!("{}: {}", path.display(), e)))
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    // Write length
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());

    // Write chunk type
    png.extend_from_slice(chunk_type);

    // Write data
    png.extend_from_slice(data);

    // Write CRC
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

fn deflate_idat_rgba(
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let stride = width * 4;
    if height == 0 || stride == 0 {
        return Ok(flate2_finish(&[])?);
    }

    // Prefix each scanline with filter byte 0 (none); rows are independent
    let uncompressed: Vec<u8> = pixels
        .par_chunks_exact(stride)
        .take(height)
        .flat_map_iter(|row| std::iter::once(0u8).chain(row.iter().copied()))
        .collect();

    Ok(flate2_finish(&uncompressed)?)
}

fn flate2_finish(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_types(png: &[u8]) -> Vec<String> {
        let mut types = Vec::new();
        let mut pos = 8;
        while pos + 8 <= png.len() {
            let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
            types.push(String::from_utf8_lossy(&png[pos + 4..pos + 8]).to_string());
            pos += 12 + len;
        }
        types
    }

    #[test]
    fn test_create_png_signature_and_chunks() {
        let pixels = vec![255u8; 4 * 4 * 4];
        let png = create_png_with_dpi(&pixels, 4, 4, None).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        assert_eq!(chunk_types(&png), vec!["IHDR", "IDAT", "IEND"]);
    }

    #[test]
    fn test_phys_chunk_records_dpi() {
        let pixels = vec![0u8; 2 * 2 * 4];
        let png = create_png_with_dpi(&pixels, 2, 2, Some(300.0)).unwrap();
        assert_eq!(chunk_types(&png), vec!["IHDR", "pHYs", "IDAT", "IEND"]);

        // IHDR is 8 + 13 + 4 bytes after the 8-byte signature
        let phys = 8 + 25;
        let ppm = u32::from_be_bytes([png[phys + 8], png[phys + 9], png[phys + 10], png[phys + 11]]);
        assert_eq!(ppm, 11811);
        assert_eq!(png[phys + 16], 1);
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert!(create_png_with_dpi(&[0u8; 10], 2, 2, Some(300.0)).is_err());
    }
}
