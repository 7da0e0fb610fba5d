use image::DynamicImage;

/// Pixel orientation of a captured photo, as stored in EXIF tag 274.
///
/// Cameras usually write sensor rows in a fixed order and record how the
/// device was held instead of rotating the pixel data. Each variant is one
/// of the standard EXIF codes 1 through 8; the doc line gives the transform
/// that makes the stored pixels read upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOrientation {
    /// EXIF 1: pixels already upright.
    Up,
    /// EXIF 2: corrected by a left-right flip.
    UpMirrored,
    /// EXIF 3: corrected by a half turn.
    Down,
    /// EXIF 4: corrected by a top-bottom flip.
    DownMirrored,
    /// EXIF 5: corrected by a transpose.
    LeftMirrored,
    /// EXIF 6: corrected by a quarter turn clockwise.
    Right,
    /// EXIF 7: corrected by a transverse flip.
    RightMirrored,
    /// EXIF 8: corrected by a quarter turn counter-clockwise.
    Left,
}

impl PixelOrientation {
    /// Maps an EXIF orientation code to a variant. Codes outside 1..=8 have
    /// no defined meaning and yield `None`.
    pub fn from_exif(code: u16) -> Option<PixelOrientation> {
        match code {
            1 => Some(PixelOrientation::Up),
            2 => Some(PixelOrientation::UpMirrored),
            3 => Some(PixelOrientation::Down),
            4 => Some(PixelOrientation::DownMirrored),
            5 => Some(PixelOrientation::LeftMirrored),
            6 => Some(PixelOrientation::Right),
            7 => Some(PixelOrientation::RightMirrored),
            8 => Some(PixelOrientation::Left),
            _ => None,
        }
    }

    /// The EXIF code for this variant.
    pub fn exif_code(self) -> u16 {
        match self {
            PixelOrientation::Up => 1,
            PixelOrientation::UpMirrored => 2,
            PixelOrientation::Down => 3,
            PixelOrientation::DownMirrored => 4,
            PixelOrientation::LeftMirrored => 5,
            PixelOrientation::Right => 6,
            PixelOrientation::RightMirrored => 7,
            PixelOrientation::Left => 8,
        }
    }

    /// Rewrites the stored pixels so the scene reads upright, undoing the
    /// rotation or mirroring this orientation describes.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            PixelOrientation::Up => image,
            PixelOrientation::UpMirrored => image.fliph(),
            PixelOrientation::Down => image.rotate180(),
            PixelOrientation::DownMirrored => image.flipv(),
            PixelOrientation::LeftMirrored => image.rotate90().fliph(),
            PixelOrientation::Right => image.rotate90(),
            PixelOrientation::RightMirrored => image.rotate270().fliph(),
            PixelOrientation::Left => image.rotate270(),
        }
    }
}

impl Default for PixelOrientation {
    fn default() -> Self {
        PixelOrientation::Up
    }
}
