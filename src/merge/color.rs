use crate::core::shared::RGBA_CHANNELS;

/// Opaque white, used for every vertex whose primitive has no usable color attribute.
pub const DEFAULT_RGBA: [u8; 4] = [255, 255, 255, 255];

/// How the color attribute of a primitive is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLayout {
    Rgb,
    Rgba,
    /// The value count is neither 3 nor 4 times the vertex count.
    Unexpected,
}

impl ColorLayout {
    /// Infers the layout from the total number of color values and the number of vertices.
    pub fn infer(num_values: usize, num_vertices: usize) -> Self {
        if num_vertices == 0 {
            return ColorLayout::Unexpected;
        }
        match (num_values % num_vertices, num_values / num_vertices) {
            (0, 3) => ColorLayout::Rgb,
            (0, 4) => ColorLayout::Rgba,
            _ => ColorLayout::Unexpected,
        }
    }

    pub fn num_components(self) -> Option<usize> {
        match self {
            ColorLayout::Rgb => Some(3),
            ColorLayout::Rgba => Some(4),
            ColorLayout::Unexpected => None,
        }
    }
}

/// Converts one color channel to a byte. Values not above 1 are taken as normalized.
pub fn channel_to_u8(value: f32) -> u8 {
    let scaled = if value <= 1.0 { value * 255.0 } else { value };
    // `as` saturates at the bounds of u8 and maps NaN to 0.
    scaled.round() as u8
}

/// Writes the RGBA bytes of one primitive into `out` (4 bytes per vertex) and returns
/// the last RGB triplet written.
///
/// Values that do not match `layout` fall back to opaque white.
pub fn fill_rgba(layout: Option<ColorLayout>, values: Option<&[f32]>, out: &mut [u8]) -> [u8; 3] {
    let num_vertices = out.len() / RGBA_CHANNELS;
    let components = layout
        .and_then(ColorLayout::num_components)
        .filter(|&n| values.is_some_and(|v| v.len() == n * num_vertices));

    match (components, values) {
        (Some(n), Some(values)) => {
            for (dst, src) in out.chunks_exact_mut(RGBA_CHANNELS).zip(values.chunks_exact(n)) {
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d = channel_to_u8(s);
                }
                if n == 3 {
                    dst[3] = 255;
                }
            }
        }
        _ => {
            for dst in out.chunks_exact_mut(RGBA_CHANNELS) {
                dst.copy_from_slice(&DEFAULT_RGBA);
            }
        }
    }

    match out.len() {
        0 => [DEFAULT_RGBA[0], DEFAULT_RGBA[1], DEFAULT_RGBA[2]],
        len => [out[len - 4], out[len - 3], out[len - 2]],
    }
}
