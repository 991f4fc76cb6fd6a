use crate::{
    assets::decode::decode_image,
    foundation::error::{DecodeError, StaxResult},
    staxie::{
        model::{Staxie, StaxieAnimation, StaxieFrame, StaxieSlice, StaxieStack},
        slices::acquire_slice_images,
    },
};

/// 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
/// Chunk tag carrying staxie metadata.
pub const STAXIE_CHUNK: [u8; 4] = *b"stAx";
/// Chunk tag terminating a PNG stream.
pub const END_CHUNK: [u8; 4] = *b"IEND";
/// Only metadata version understood here.
pub const STAXIE_VERSION: u8 = 0;

/// Bounds-checked big-endian cursor.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self::with_base(buf, 0)
    }

    /// `base` is added to reported offsets so nested readers point into the whole file.
    fn with_base(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base }
    }

    pub(crate) fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub(crate) fn bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.buf.len().saturating_sub(self.pos);
        if n > available {
            return Err(DecodeError::TruncatedBuffer {
                offset: self.offset(),
                needed: n,
                available,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.bytes(n).map(|_| ())
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.bytes(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn tag(&mut self) -> Result<[u8; 4], DecodeError> {
        let b = self.bytes(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    fn name(&mut self) -> Result<String, DecodeError> {
        let len = usize::from(self.u8()?);
        let offset = self.offset();
        let raw = self.bytes(len)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidName { offset })
    }
}

/// Parse the staxie metadata chunk out of a PNG container without touching pixel data.
///
/// Slices carry their sheet coordinates but no image; see [`decode_staxie`].
pub fn decode_staxie_metadata(bytes: &[u8]) -> Result<Staxie, DecodeError> {
    let mut r = ByteReader::new(bytes);
    if r.bytes(PNG_SIGNATURE.len())? != PNG_SIGNATURE {
        return Err(DecodeError::InvalidSignature);
    }

    while !r.is_empty() {
        let len = r.u32()? as usize;
        let tag = r.tag()?;
        if tag == STAXIE_CHUNK {
            let payload_offset = r.offset();
            let payload = r.bytes(len)?;
            return parse_metadata(&mut ByteReader::with_base(payload, payload_offset));
        }
        if tag == END_CHUNK {
            break;
        }
        // Payload plus trailing CRC.
        r.skip(len)?;
        r.skip(4)?;
    }

    Err(DecodeError::UnknownSection(
        String::from_utf8_lossy(&STAXIE_CHUNK).into_owned(),
    ))
}

fn parse_metadata(r: &mut ByteReader<'_>) -> Result<Staxie, DecodeError> {
    let version = r.u8()?;
    if version != STAXIE_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    let frame_width = r.u16()?;
    let frame_height = r.u16()?;
    let stack_count = r.u16()?;

    let mut staxie = Staxie::new(frame_width, frame_height);
    let mut y_cursor = 0u32;

    for _ in 0..stack_count {
        let name = r.name()?;
        let slice_count = r.u16()?;
        let animation_count = r.u16()?;
        let mut stack = StaxieStack::new(name, slice_count);

        for _ in 0..animation_count {
            let name = r.name()?;
            let frame_time = r.u32()?;
            let frame_count = r.u16()?;
            let mut frames = Vec::with_capacity(usize::from(frame_count));

            for _ in 0..frame_count {
                let mut slices = Vec::with_capacity(usize::from(slice_count));
                for i in 0..slice_count {
                    slices.push(StaxieSlice {
                        shading: r.u8()?,
                        x: u32::from(i) * u32::from(frame_width),
                        y: y_cursor,
                        image: None,
                    });
                }
                if slice_count > 0 {
                    y_cursor = y_cursor.saturating_add(u32::from(frame_height));
                }
                frames.push(StaxieFrame { slices });
            }

            stack.push_animation(StaxieAnimation {
                name,
                frame_time,
                frames,
            });
        }
        staxie.push_stack(stack);
    }

    Ok(staxie)
}

/// Decode metadata and sheet pixels, then cut every slice into its own surface.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_staxie(bytes: &[u8]) -> StaxResult<Staxie> {
    let mut staxie = decode_staxie_metadata(bytes)?;
    let sheet = decode_image(bytes)?;
    acquire_slice_images(&mut staxie, &sheet)?;
    Ok(staxie)
}

#[cfg(test)]
#[path = "../../tests/unit/staxie/decode.rs"]
mod tests;
