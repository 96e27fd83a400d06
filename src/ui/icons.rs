//! Icon lookup for builders
//!
//! Resolution order for a command at a given size:
//! 1. the command's own [`IconSet`](crate::command::IconSet) (exact, else nearest size)
//! 2. an [`IconProvider`] keyed by command id
//! 3. [`IconSet::placeholder`] (toolbars only; menus render without an icon)

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::imageops::{self, FilterType};

use crate::command::{Bitmap, Command, IconSet, IconSize};

/// Supplies bitmaps by command id and size
pub trait IconProvider {
    fn icon(&self, command_id: &str, size: IconSize) -> Option<Bitmap>;
}

/// Loads `<dir>/<command-id>.png` and scales it to the requested size
///
/// Results (including misses) are cached per `(id, size)`.
pub struct DirectoryIconProvider {
    dir: PathBuf,
    cache: RefCell<HashMap<(String, IconSize), Option<Bitmap>>>,
}

impl DirectoryIconProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load(&self, command_id: &str, size: IconSize) -> Option<Bitmap> {
        let path = self.dir.join(format!("{}.png", command_id));
        if !path.exists() {
            return None;
        }

        match image::open(&path) {
            Ok(image) => {
                let px = size.pixels();
                let rgba = image.to_rgba8();
                let bitmap = if rgba.dimensions() == (px, px) {
                    rgba
                } else {
                    imageops::resize(&rgba, px, px, FilterType::Lanczos3)
                };
                Some(Rc::new(bitmap))
            }
            Err(e) => {
                tracing::warn!(command = %command_id, "Failed to load icon {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl IconProvider for DirectoryIconProvider {
    fn icon(&self, command_id: &str, size: IconSize) -> Option<Bitmap> {
        let key = (command_id.to_string(), size);
        if let Some(cached) = self.cache.borrow().get(&key) {
            return cached.clone();
        }
        let loaded = self.load(command_id, size);
        self.cache.borrow_mut().insert(key, loaded.clone());
        loaded
    }
}

/// Command icon or provider icon, without placeholder fallback
pub fn find_icon(
    command: &Command,
    size: IconSize,
    provider: Option<&dyn IconProvider>,
) -> Option<Bitmap> {
    command
        .icons
        .at(size)
        .or_else(|| provider.and_then(|p| p.icon(&command.id, size)))
}

/// Command icon, provider icon, or the placeholder
pub fn resolve_icon(command: &Command, size: IconSize, provider: Option<&dyn IconProvider>) -> Bitmap {
    find_icon(command, size, provider).unwrap_or_else(|| {
        tracing::trace!(command = %command.id, "No icon, using placeholder");
        IconSet::placeholder(size)
    })
}
