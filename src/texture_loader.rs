use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use raylib::prelude::*;
use exif::{Reader, Tag, Value, In};

use crate::media::{MediaKind, MediaRef};

// --- Resolve a MediaRef to a file we can decode ---
// Remote URLs are left to the content pipeline; the viewer only shows local files.
pub fn local_image_path(media: &MediaRef) -> Result<PathBuf, String> {
    match media.kind() {
        MediaKind::Image => {}
        kind => return Err(format!("{:?} backgrounds are not drawn as textures: {}", kind, media.url)),
    }
    let path = media.url.strip_prefix("file://").unwrap_or(&media.url);
    if path.starts_with("http://") || path.starts_with("https://") {
        return Err(format!("remote image not available offline: {}", media.url));
    }
    Ok(PathBuf::from(path))
}

// --- Read EXIF orientation, 1 (normal) when absent ---
fn exif_orientation(image_path: &Path, file_bytes: &[u8]) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| match &field.value {
                Value::Short(values) => values.first().copied(),
                _ => None,
            })
            .unwrap_or(1),
        Err(e) => {
            tracing::debug!(path = %image_path.display(), error = %e, "no EXIF orientation");
            1
        }
    }
}

// --- Load Image, Apply EXIF Rotation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D, String> {
    let file_bytes = fs::read(image_path)
        .map_err(|e| format!("Failed to read file {:?}: {}", image_path, e))?;

    let extension = image_path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();
    // EXIF is only reliable in JPEG containers
    let orientation = if extension == "jpg" || extension == "jpeg" {
        exif_orientation(image_path, &file_bytes)
    } else {
        1
    };

    let mut image = Image::load_image_from_mem(&(".".to_string() + &extension), &file_bytes)
        .map_err(|e| format!("Failed to load image data for {:?}: {}", image_path, e))?;

    // 3 = 180 deg, 6 = 90 deg CW, 8 = 90 deg CCW; flips are ignored
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }

    let texture = rl.load_texture_from_image(thread, &image)
        .map_err(|e| format!("Failed to create texture for {:?}: {}", image_path, e))?;

    Ok(texture)
}
