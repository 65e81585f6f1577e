use image::{DynamicImage, GrayImage, RgbImage};

use super::ExtractionError;

const PREAMBLE_LEN: usize = 128;
const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

const IMPLICIT_VR_LE: &str = "1.2.840.10008.1.2";
const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";

const TRANSFER_SYNTAX: (u16, u16) = (0x0002, 0x0010);
const SAMPLES_PER_PIXEL: (u16, u16) = (0x0028, 0x0002);
const PHOTOMETRIC: (u16, u16) = (0x0028, 0x0004);
const ROWS: (u16, u16) = (0x0028, 0x0010);
const COLUMNS: (u16, u16) = (0x0028, 0x0011);
const BITS_ALLOCATED: (u16, u16) = (0x0028, 0x0100);
const PIXEL_REPRESENTATION: (u16, u16) = (0x0028, 0x0103);
const PIXEL_DATA: (u16, u16) = (0x7FE0, 0x0010);

const ITEM: (u16, u16) = (0xFFFE, 0xE000);
const ITEM_END: (u16, u16) = (0xFFFE, 0xE00D);
const SEQUENCE_END: (u16, u16) = (0xFFFE, 0xE0DD);

/// True for uploads named like a DICOM export (`.dcm`, any case).
pub fn is_dicom_upload(file_name: Option<&str>) -> bool {
    file_name.is_some_and(|name| name.to_ascii_lowercase().ends_with(".dcm"))
}

/// Decode the first frame of an uncompressed little-endian DICOM file.
///
/// Sample values are min-max stretched to 8 bits; MONOCHROME1 is inverted
/// so bone stays bright.
pub fn decode_dicom(bytes: &[u8]) -> Result<DynamicImage, ExtractionError> {
    if bytes.len() < PREAMBLE_LEN + 4 || &bytes[PREAMBLE_LEN..PREAMBLE_LEN + 4] != b"DICM" {
        return Err(dicom_error("missing DICM magic"));
    }

    let mut reader = Reader {
        bytes,
        pos: PREAMBLE_LEN + 4,
        explicit_vr: true,
    };

    // File meta group is always explicit VR little endian
    let mut transfer_syntax = String::new();
    while reader.peek_group() == Some(0x0002) {
        let element = reader.next_element()?;
        if element.tag == TRANSFER_SYNTAX {
            transfer_syntax = text_value(element.value);
        }
    }

    reader.explicit_vr = match transfer_syntax.as_str() {
        EXPLICIT_VR_LE => true,
        IMPLICIT_VR_LE => false,
        "" => return Err(dicom_error("no transfer syntax in file meta")),
        other => return Err(dicom_error(&format!("unsupported transfer syntax {other}"))),
    };

    let mut frame = FrameInfo::default();
    let mut pixel_data = None;
    while !reader.at_end() {
        let element = reader.next_element()?;
        match element.tag {
            SAMPLES_PER_PIXEL => frame.samples = u16_value(element.value)?,
            PHOTOMETRIC => frame.photometric = text_value(element.value),
            ROWS => frame.rows = u16_value(element.value)?,
            COLUMNS => frame.columns = u16_value(element.value)?,
            BITS_ALLOCATED => frame.bits_allocated = u16_value(element.value)?,
            PIXEL_REPRESENTATION => frame.signed = u16_value(element.value)? == 1,
            PIXEL_DATA => {
                if element.undefined_length {
                    return Err(dicom_error("encapsulated (compressed) pixel data"));
                }
                pixel_data = Some(element.value);
                break;
            }
            _ => {}
        }
    }

    let pixel_data = pixel_data.ok_or_else(|| dicom_error("no pixel data"))?;
    frame.render(pixel_data)
}

#[derive(Debug)]
struct FrameInfo {
    rows: u16,
    columns: u16,
    samples: u16,
    bits_allocated: u16,
    signed: bool,
    photometric: String,
}

impl Default for FrameInfo {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            samples: 1,
            bits_allocated: 16,
            signed: false,
            photometric: "MONOCHROME2".into(),
        }
    }
}

impl FrameInfo {
    fn render(&self, data: &[u8]) -> Result<DynamicImage, ExtractionError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(dicom_error("missing image dimensions"));
        }
        if self.samples != 1 && self.samples != 3 {
            return Err(dicom_error(&format!("{} samples per pixel", self.samples)));
        }

        let sample_count = self.rows as usize * self.columns as usize * self.samples as usize;
        let values: Vec<f32> = match self.bits_allocated {
            8 => data
                .get(..sample_count)
                .ok_or_else(|| dicom_error("pixel data truncated"))?
                .iter()
                .map(|&b| if self.signed { b as i8 as f32 } else { b as f32 })
                .collect(),
            16 => data
                .get(..sample_count * 2)
                .ok_or_else(|| dicom_error("pixel data truncated"))?
                .chunks_exact(2)
                .map(|c| {
                    let raw = u16::from_le_bytes([c[0], c[1]]);
                    if self.signed { raw as i16 as f32 } else { raw as f32 }
                })
                .collect(),
            bits => return Err(dicom_error(&format!("{bits} bits allocated"))),
        };

        let mut pixels = stretch_to_u8(&values);
        if self.photometric.trim() == "MONOCHROME1" {
            pixels.iter_mut().for_each(|p| *p = 255 - *p);
        }

        let (w, h) = (self.columns as u32, self.rows as u32);
        let img = if self.samples == 1 {
            GrayImage::from_raw(w, h, pixels).map(DynamicImage::ImageLuma8)
        } else {
            RgbImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgb8)
        };
        img.ok_or_else(|| dicom_error("pixel buffer does not match dimensions"))
    }
}

/// Linear min-max stretch to 0..=255. A flat image is scaled as-is and clipped.
fn stretch_to_u8(values: &[f32]) -> Vec<u8> {
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    values
        .iter()
        .map(|&v| {
            let unit = if max > min { (v - min) / (max - min) } else { v };
            (unit * 255.0).clamp(0.0, 255.0) as u8
        })
        .collect()
}

struct Element<'a> {
    tag: (u16, u16),
    value: &'a [u8],
    undefined_length: bool,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    explicit_vr: bool,
}

impl<'a> Reader<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek_group(&self) -> Option<u16> {
        let b = self.bytes.get(self.pos..self.pos + 2)?;
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ExtractionError> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.bytes.len());
        let end = end.ok_or_else(|| dicom_error("unexpected end of file"))?;
        let bytes = self.bytes;
        let slice = &bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u16(&mut self) -> Result<u16, ExtractionError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, ExtractionError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn next_element(&mut self) -> Result<Element<'a>, ExtractionError> {
        let tag = (self.u16()?, self.u16()?);

        // Item and delimiter tags never carry a VR
        let length = if tag.0 == 0xFFFE || !self.explicit_vr {
            self.u32()?
        } else {
            let vr = self.take(2)?;
            if has_long_length(vr) {
                self.take(2)?;
                self.u32()?
            } else {
                self.u16()? as u32
            }
        };

        if length == UNDEFINED_LENGTH {
            // Encapsulated pixel data is rejected by the caller
            if tag != PIXEL_DATA {
                self.skip_undefined_sequence()?;
            }
            return Ok(Element { tag, value: &[], undefined_length: true });
        }

        let value = self.take(length as usize)?;
        Ok(Element { tag, value, undefined_length: false })
    }

    /// Skip items up to and including the sequence delimiter.
    fn skip_undefined_sequence(&mut self) -> Result<(), ExtractionError> {
        loop {
            let tag = (self.u16()?, self.u16()?);
            let length = self.u32()?;
            match tag {
                SEQUENCE_END => return Ok(()),
                ITEM if length == UNDEFINED_LENGTH => loop {
                    if self.next_element()?.tag == ITEM_END {
                        break;
                    }
                },
                ITEM => {
                    self.take(length as usize)?;
                }
                _ => return Err(dicom_error("malformed sequence")),
            }
        }
    }
}

fn has_long_length(vr: &[u8]) -> bool {
    matches!(
        vr,
        b"OB" | b"OD" | b"OF" | b"OL" | b"OV" | b"OW" | b"SQ" | b"SV" | b"UC" | b"UN" | b"UR" | b"UT" | b"UV"
    )
}

fn text_value(value: &[u8]) -> String {
    String::from_utf8_lossy(value)
        .trim_end_matches(['\0', ' '])
        .to_string()
}

fn u16_value(value: &[u8]) -> Result<u16, ExtractionError> {
    match value {
        [a, b, ..] => Ok(u16::from_le_bytes([*a, *b])),
        _ => Err(dicom_error("short US value")),
    }
}

fn dicom_error(detail: &str) -> ExtractionError {
    ExtractionError::ImageProcessing(format!("DICOM decode failed: {detail}"))
}
