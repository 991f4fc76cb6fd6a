use anyhow::Context;

use crate::{
    foundation::error::{DecodeError, StaxError, StaxResult},
    render::surface::Surface,
    staxie::{
        decode::{ByteReader, PNG_SIGNATURE, STAXIE_CHUNK, STAXIE_VERSION},
        model::Staxie,
    },
};

const HEADER_CHUNK: [u8; 4] = *b"IHDR";

/// Serialize the metadata payload of a `stAx` chunk.
pub fn encode_staxie_metadata(staxie: &Staxie) -> StaxResult<Vec<u8>> {
    let mut out = Vec::new();
    out.push(STAXIE_VERSION);
    out.extend_from_slice(&staxie.frame_width.to_be_bytes());
    out.extend_from_slice(&staxie.frame_height.to_be_bytes());
    out.extend_from_slice(&count_u16(staxie.stacks().len(), "stack count")?.to_be_bytes());

    for stack in staxie.stacks() {
        push_name(&mut out, &stack.name)?;
        out.extend_from_slice(&stack.slice_count.to_be_bytes());
        out.extend_from_slice(
            &count_u16(stack.animations().len(), "animation count")?.to_be_bytes(),
        );
        for anim in stack.animations() {
            push_name(&mut out, &anim.name)?;
            out.extend_from_slice(&anim.frame_time.to_be_bytes());
            out.extend_from_slice(&count_u16(anim.frames.len(), "frame count")?.to_be_bytes());
            for frame in &anim.frames {
                if frame.slices.len() != usize::from(stack.slice_count) {
                    return Err(StaxError::validation(format!(
                        "stack '{}' frame depth {} != {}",
                        stack.name,
                        frame.slices.len(),
                        stack.slice_count
                    )));
                }
                out.extend(frame.slices.iter().map(|s| s.shading));
            }
        }
    }
    Ok(out)
}

/// Insert a `stAx` chunk describing `staxie` right after the `IHDR` chunk of `png`.
///
/// An existing `stAx` chunk is replaced.
pub fn embed_staxie(png: &[u8], staxie: &Staxie) -> StaxResult<Vec<u8>> {
    let payload = encode_staxie_metadata(staxie)?;
    let mut r = ByteReader::new(png);
    if r.bytes(PNG_SIGNATURE.len())? != PNG_SIGNATURE {
        return Err(DecodeError::InvalidSignature.into());
    }

    let mut out = Vec::with_capacity(png.len() + payload.len() + 12);
    out.extend_from_slice(&PNG_SIGNATURE);
    let mut inserted = false;
    while !r.is_empty() {
        let start = r.offset();
        let len = r.u32()? as usize;
        let tag = r.tag()?;
        r.skip(len)?;
        r.skip(4)?;
        if tag != STAXIE_CHUNK {
            out.extend_from_slice(&png[start..r.offset()]);
        }
        if tag == HEADER_CHUNK && !inserted {
            write_chunk(&mut out, STAXIE_CHUNK, &payload)?;
            inserted = true;
        }
    }
    if !inserted {
        return Err(DecodeError::UnknownSection("IHDR".to_string()).into());
    }
    Ok(out)
}

/// Encode `sheet` as PNG and embed the metadata of `staxie` into it.
#[tracing::instrument(skip_all, fields(width = sheet.width(), height = sheet.height()))]
pub fn encode_staxie_png(staxie: &Staxie, sheet: &Surface) -> StaxResult<Vec<u8>> {
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(sheet.to_rgba_image()?)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encode staxie sheet as png")?;
    embed_staxie(&png, staxie)
}

fn write_chunk(out: &mut Vec<u8>, tag: [u8; 4], payload: &[u8]) -> StaxResult<()> {
    let len = u32::try_from(payload.len())
        .map_err(|_| StaxError::validation("chunk payload exceeds u32"))?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&tag);
    out.extend_from_slice(payload);
    let mut crc = crc32fast::Hasher::new();
    crc.update(&tag);
    crc.update(payload);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
    Ok(())
}

fn push_name(out: &mut Vec<u8>, name: &str) -> StaxResult<()> {
    let len = u8::try_from(name.len())
        .map_err(|_| StaxError::validation(format!("name '{name}' exceeds 255 bytes")))?;
    out.push(len);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

fn count_u16(n: usize, what: &str) -> StaxResult<u16> {
    u16::try_from(n).map_err(|_| StaxError::validation(format!("{what} {n} exceeds u16")))
}

#[cfg(test)]
#[path = "../../tests/unit/staxie/encode.rs"]
mod tests;
