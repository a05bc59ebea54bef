//! PNG encoding and decoding of flat bitmaps.

use std::io::{BufReader, BufWriter, Read, Write};

use rkgk_core::{bitmap::Bitmap, layer::Extent};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Decode(#[from] png::DecodingError),
    #[error(transparent)]
    Encode(#[from] png::EncodingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("only RGBA bitmaps can be written, found {0} channels")]
    Channels(u8),
}

/// Decode a PNG into an 8-bit bitmap. Palettes and low bit depths are expanded, 16-bit channels
/// are stripped, but the channel count is kept as stored.
/// # Errors
/// If the stream isn't a valid PNG.
pub fn decode(r: impl Read) -> Result<Bitmap, IoError> {
    let mut decoder = png::Decoder::new(r);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut data = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut data)?;
    data.truncate(info.buffer_size());

    Ok(Bitmap {
        extent: Extent::new(info.width, info.height),
        // At most four.
        channels: info.color_type.samples() as u8,
        data,
    })
}

/// Encode an RGBA bitmap as PNG.
/// # Errors
/// If the bitmap isn't RGBA, or writing fails.
pub fn encode(w: impl Write, bitmap: &Bitmap) -> Result<(), IoError> {
    if bitmap.channels != 4 {
        return Err(IoError::Channels(bitmap.channels));
    }
    let mut encoder = png::Encoder::new(w, bitmap.extent.width, bitmap.extent.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&bitmap.data)?;
    writer.finish()?;
    Ok(())
}

/// # Errors
/// See [`decode`].
pub fn read_path(path: &std::path::Path) -> Result<Bitmap, IoError> {
    let file = std::fs::File::open(path)?;
    decode(BufReader::new(file))
}

/// # Errors
/// See [`encode`].
pub fn write_path(path: &std::path::Path, bitmap: &Bitmap) -> Result<(), IoError> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    encode(&mut file, bitmap)?;
    file.flush()?;
    Ok(())
}
