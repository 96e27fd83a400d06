//! Pre-rendered command icons in four sizes
//!
//! An [`IconSet`] stores final RGBA bitmaps ready for menus (16px), the
//! default toolbar (24px) and the large toolbars (32px, 48px). Absence is valid;
//! builders fall back to an [`IconProvider`](crate::ui::IconProvider) and
//! finally to [`IconSet::placeholder`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Shared bitmap; commands are cloned freely so pixels are reference counted
pub type Bitmap = Rc<RgbaImage>;

/// The icon sizes the UI renders
///
/// Persisted as the pixel edge length; only the four supported values load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum IconSize {
    /// 16x16, menus
    Small,
    /// 24x24, standard toolbar
    #[default]
    Medium,
    /// 32x32, large toolbar
    Large,
    /// 48x48, extra large toolbar
    ExtraLarge,
}

impl IconSize {
    pub const ALL: [IconSize; 4] = [
        IconSize::Small,
        IconSize::Medium,
        IconSize::Large,
        IconSize::ExtraLarge,
    ];

    /// Edge length in pixels
    pub const fn pixels(self) -> u32 {
        match self {
            IconSize::Small => 16,
            IconSize::Medium => 24,
            IconSize::Large => 32,
            IconSize::ExtraLarge => 48,
        }
    }

    /// The size with exactly this edge length
    pub fn from_pixels(px: u32) -> Option<Self> {
        IconSize::ALL.into_iter().find(|size| size.pixels() == px)
    }
}

impl TryFrom<u32> for IconSize {
    type Error = UnsupportedIconSize;

    fn try_from(px: u32) -> Result<Self, Self::Error> {
        IconSize::from_pixels(px).ok_or(UnsupportedIconSize(px))
    }
}

/// A persisted icon size that is not one of 16, 24, 32 or 48
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported icon size {0}px (expected 16, 24, 32 or 48)")]
pub struct UnsupportedIconSize(pub u32);

impl From<IconSize> for u32 {
    fn from(size: IconSize) -> Self {
        size.pixels()
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.pixels())
    }
}

/// Pre-rendered icon set for a command
#[derive(Clone, Default)]
pub struct IconSet {
    pub small: Option<Bitmap>,
    pub medium: Option<Bitmap>,
    pub large: Option<Bitmap>,
    pub extra_large: Option<Bitmap>,
}

impl IconSet {
    /// Scale one source image to every size
    pub fn from_image(image: &RgbaImage) -> Self {
        let scale = |size: IconSize| {
            let px = size.pixels();
            Some(Rc::new(imageops::resize(image, px, px, FilterType::Lanczos3)))
        };
        Self {
            small: scale(IconSize::Small),
            medium: scale(IconSize::Medium),
            large: scale(IconSize::Large),
            extra_large: scale(IconSize::ExtraLarge),
        }
    }

    /// Load an image file (PNG, JPEG, BMP, ...) and scale it to every size
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IconError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| IconError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_image(&image.to_rgba8()))
    }

    /// Synthesised fallback bitmap: neutral tile with a darker 1px frame
    pub fn placeholder(size: IconSize) -> Bitmap {
        let px = size.pixels();
        let fill = Rgba([0x9e, 0x9e, 0x9e, 0xff]);
        let frame = Rgba([0x61, 0x61, 0x61, 0xff]);
        let image = RgbaImage::from_fn(px, px, |x, y| {
            if x == 0 || y == 0 || x == px - 1 || y == px - 1 {
                frame
            } else {
                fill
            }
        });
        Rc::new(image)
    }

    /// True when no size is present
    pub fn is_empty(&self) -> bool {
        IconSize::ALL.into_iter().all(|size| self.get(size).is_none())
    }

    /// The bitmap stored for exactly this size
    pub fn get(&self, size: IconSize) -> Option<&Bitmap> {
        match size {
            IconSize::Small => self.small.as_ref(),
            IconSize::Medium => self.medium.as_ref(),
            IconSize::Large => self.large.as_ref(),
            IconSize::ExtraLarge => self.extra_large.as_ref(),
        }
    }

    /// Replace the bitmap for one size
    pub fn set(&mut self, size: IconSize, bitmap: Bitmap) {
        match size {
            IconSize::Small => self.small = Some(bitmap),
            IconSize::Medium => self.medium = Some(bitmap),
            IconSize::Large => self.large = Some(bitmap),
            IconSize::ExtraLarge => self.extra_large = Some(bitmap),
        }
    }

    /// Exact size if present, otherwise the nearest available one
    pub fn at(&self, size: IconSize) -> Option<Bitmap> {
        let mut candidates = IconSize::ALL;
        candidates.sort_by_key(|c| (c.pixels().abs_diff(size.pixels()), std::cmp::Reverse(*c)));
        candidates
            .into_iter()
            .find_map(|candidate| self.get(candidate).cloned())
    }
}

impl fmt::Debug for IconSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconSet")
            .field("small", &self.small.is_some())
            .field("medium", &self.medium.is_some())
            .field("large", &self.large.is_some())
            .field("extra_large", &self.extra_large.is_some())
            .finish()
    }
}

/// Errors raised while loading icon images
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("failed to load icon {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(px: u32) -> Bitmap {
        Rc::new(RgbaImage::from_pixel(px, px, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn test_from_image_scales_all_sizes() {
        let source = RgbaImage::from_pixel(64, 64, Rgba([0, 128, 255, 255]));
        let icons = IconSet::from_image(&source);

        for size in IconSize::ALL {
            let bitmap = icons.get(size).expect("size present");
            assert_eq!(bitmap.dimensions(), (size.pixels(), size.pixels()));
        }
    }

    #[test]
    fn test_at_prefers_exact_then_nearest() {
        let mut icons = IconSet::default();
        assert!(icons.at(IconSize::Medium).is_none());

        icons.set(IconSize::Large, solid(32));
        let picked = icons.at(IconSize::Small).expect("falls back");
        assert_eq!(picked.width(), 32);

        icons.set(IconSize::Medium, solid(24));
        assert_eq!(icons.at(IconSize::Small).unwrap().width(), 24);
        assert_eq!(icons.at(IconSize::Large).unwrap().width(), 32);
    }

    #[test]
    fn test_placeholder_dimensions() {
        let bitmap = IconSet::placeholder(IconSize::Large);
        assert_eq!(bitmap.dimensions(), (32, 32));
        assert_ne!(bitmap.get_pixel(0, 0), bitmap.get_pixel(16, 16));
    }

    #[test]
    fn test_icon_size_from_pixels() {
        for size in IconSize::ALL {
            assert_eq!(IconSize::from_pixels(size.pixels()), Some(size));
        }
        assert_eq!(IconSize::from_pixels(48), Some(IconSize::ExtraLarge));
        assert_eq!(IconSize::from_pixels(20), None);
    }

    #[test]
    fn test_icon_size_serde_is_exact() {
        assert_eq!(serde_json::to_string(&IconSize::ExtraLarge).unwrap(), "48");
        assert_eq!(
            serde_json::from_str::<IconSize>("48").unwrap(),
            IconSize::ExtraLarge
        );
        let err = serde_json::from_str::<IconSize>("40").unwrap_err();
        assert!(err.to_string().contains("unsupported icon size 40px"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = IconSet::from_path("/definitely/not/here.png").unwrap_err();
        assert!(err.to_string().contains("here.png"));
    }
}
