//! Resolution metadata sniffing.
//!
//! The `image` crate reports pixel dimensions but not physical resolution,
//! so the horizontal DPI is read straight from the PNG `pHYs` chunk or the
//! JPEG JFIF header. Other formats report none.

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const INCHES_PER_METER: f64 = 0.0254;
const CM_PER_INCH: f64 = 2.54;

/// Horizontal DPI recorded in `data`, if any.
pub fn sniff_dpi(data: &[u8]) -> Option<f64> {
    let dpi = if data.starts_with(PNG_SIGNATURE) {
        png_dpi(&data[PNG_SIGNATURE.len()..])
    } else if data.starts_with(&[0xFF, 0xD8]) {
        jpeg_dpi(&data[2..])
    } else {
        None
    };
    dpi.filter(|d| *d > 0.0)
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn png_dpi(mut chunks: &[u8]) -> Option<f64> {
    loop {
        let length = read_u32(chunks, 0)? as usize;
        let kind = chunks.get(4..8)?;
        match kind {
            b"pHYs" => {
                let body = chunks.get(8..8 + length)?;
                let per_unit_x = read_u32(body, 0)?;
                // Unit 1 is pixels per meter; 0 only gives an aspect ratio.
                return match body.get(8)? {
                    1 => Some(f64::from(per_unit_x) * INCHES_PER_METER),
                    _ => None,
                };
            }
            // pHYs must come before image data.
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }
        // length + type + data + crc
        chunks = chunks.get(12 + length..)?;
    }
}

fn jpeg_dpi(mut segments: &[u8]) -> Option<f64> {
    loop {
        if *segments.first()? != 0xFF {
            return None;
        }
        let marker = *segments.get(1)?;
        match marker {
            // Fill bytes.
            0xFF => {
                segments = &segments[1..];
                continue;
            }
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD7 => {
                segments = &segments[2..];
                continue;
            }
            // Start of scan: no more headers.
            0xDA | 0xD9 => return None,
            _ => {}
        }

        let length = read_u16(segments, 2)? as usize;
        if marker == 0xE0 {
            let body = segments.get(4..2 + length)?;
            if body.starts_with(b"JFIF\0") {
                let units = *body.get(7)?;
                let density_x = f64::from(read_u16(body, 8)?);
                return match units {
                    1 => Some(density_x),
                    2 => Some(density_x * CM_PER_INCH),
                    _ => None,
                };
            }
        }
        segments = segments.get(2 + length..)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_with_phys(per_meter: u32, unit: u8) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        // IHDR (contents irrelevant here).
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&[0; 13]);
        data.extend_from_slice(&[0; 4]);
        // pHYs
        data.extend_from_slice(&9u32.to_be_bytes());
        data.extend_from_slice(b"pHYs");
        data.extend_from_slice(&per_meter.to_be_bytes());
        data.extend_from_slice(&per_meter.to_be_bytes());
        data.push(unit);
        data.extend_from_slice(&[0; 4]);
        data
    }

    fn jfif(units: u8, density: u16) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[1, 1, units]);
        data.extend_from_slice(&density.to_be_bytes());
        data.extend_from_slice(&density.to_be_bytes());
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&[0xFF, 0xDA]);
        data
    }

    #[test]
    fn test_png_phys_meters() {
        // 11811 pixels per meter is 300 DPI (rounded).
        let dpi = sniff_dpi(&png_with_phys(11811, 1)).unwrap();
        assert!((dpi - 299.9994).abs() < 1e-3);
    }

    #[test]
    fn test_png_phys_unknown_unit() {
        assert_eq!(sniff_dpi(&png_with_phys(11811, 0)), None);
    }

    #[test]
    fn test_png_without_phys() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(b"IEND");
        data.extend_from_slice(&[0; 4]);
        assert_eq!(sniff_dpi(&data), None);
    }

    #[test]
    fn test_jfif_dots_per_inch() {
        assert_eq!(sniff_dpi(&jfif(1, 72)), Some(72.0));
    }

    #[test]
    fn test_jfif_dots_per_cm() {
        let dpi = sniff_dpi(&jfif(2, 100)).unwrap();
        assert!((dpi - 254.0).abs() < 1e-9);
    }

    #[test]
    fn test_jfif_aspect_only() {
        assert_eq!(sniff_dpi(&jfif(0, 1)), None);
    }

    #[test]
    fn test_zero_density_ignored() {
        assert_eq!(sniff_dpi(&jfif(1, 0)), None);
    }

    #[test]
    fn test_truncated_and_unknown() {
        assert_eq!(sniff_dpi(&[]), None);
        assert_eq!(sniff_dpi(&PNG_SIGNATURE[..4]), None);
        assert_eq!(sniff_dpi(&[0xFF, 0xD8, 0xFF]), None);
        assert_eq!(sniff_dpi(b"GIF89a"), None);
    }
}
