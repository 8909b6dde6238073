pub mod image_helper {
    use crate::core_modules::face::{Face, GRID_DIM};
    use image::ImageEncoder;

    /// Decodes a snapshot image into a flat RGBA buffer plus its dimensions.
    pub fn load_rgba(path: &str) -> Result<(u32, u32, Vec<u8>), image::error::ImageError> {
        let decoded = image::open(path)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok((width, height, rgba.into_raw()))
    }

    /// Renders a scanned face as a 3x3 patch image of the canonical reference
    /// colors and writes it out as a PNG.
    pub fn save_face_preview(
        path: &str,
        face: &Face,
        cell_size: u32,
    ) -> Result<(), image::error::ImageError> {
        let side = GRID_DIM as u32 * cell_size;
        let mut buffer = vec![0u8; (side * side * 4) as usize];

        for pixel_y in 0..side {
            let row = (pixel_y / cell_size) as usize;
            for pixel_x in 0..side {
                let col = (pixel_x / cell_size) as usize;
                let reference = face.cell(row, col).reference_rgb();

                let byte_index = ((pixel_y * side + pixel_x) * 4) as usize;
                buffer[byte_index] = reference.red;
                buffer[byte_index + 1] = reference.green;
                buffer[byte_index + 2] = reference.blue;
                buffer[byte_index + 3] = reference.alpha;
            }
        }

        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);
        encoder.write_image(&buffer, side, side, image::ExtendedColorType::Rgba8)?;

        Ok(())
    }
}
