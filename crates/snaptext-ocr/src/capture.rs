use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, RgbaImage};
use snaptext_types::CaptureRect;
use tracing::{debug, warn};
use xcap::Monitor;

const PLACEHOLDER_WIDTH: u32 = 400;
const PLACEHOLDER_HEIGHT: u32 = 300;

/// A captured frame together with where it was written.
pub struct Screenshot {
    pub path: PathBuf,
    pub image: RgbaImage,
}

/// Grabs pixels for a screen rectangle.
pub trait ScreenGrabber: Send + Sync {
    fn grab(&self, rect: CaptureRect) -> Result<RgbaImage>;
}

/// Blocks until the user has drawn a selection. `None` means the selection
/// was dismissed without a drag.
pub trait RegionSelector: Send + Sync {
    fn select_region(&self) -> Result<Option<CaptureRect>>;
}

/// Screen grabber backed by xcap monitors.
pub struct XcapGrabber;

impl ScreenGrabber for XcapGrabber {
    fn grab(&self, rect: CaptureRect) -> Result<RgbaImage> {
        let monitors = Monitor::all().context("Failed to get monitors")?;
        let monitor = monitors
            .iter()
            .find(|m| {
                rect.x >= m.x()
                    && rect.y >= m.y()
                    && rect.x + rect.width as i32 <= m.x() + m.width() as i32
                    && rect.y + rect.height as i32 <= m.y() + m.height() as i32
            })
            .or(monitors.first())
            .context("No monitor found")?;

        let image = monitor.capture_image().context("Failed to capture screen")?;
        let cropped = xcap::image::imageops::crop_imm(
            &image,
            rect.x.saturating_sub(monitor.x()) as u32,
            rect.y.saturating_sub(monitor.y()) as u32,
            rect.width,
            rect.height,
        )
        .to_image();

        let (width, height) = (cropped.width(), cropped.height());
        RgbaImage::from_raw(width, height, cropped.into_raw())
            .context("Captured frame has inconsistent dimensions")
    }
}

/// Solid white stand-in used when the selection has no area.
pub fn placeholder_image() -> RgbaImage {
    RgbaImage::from_pixel(
        PLACEHOLDER_WIDTH,
        PLACEHOLDER_HEIGHT,
        image::Rgba([255, 255, 255, 255]),
    )
}

pub fn screenshot_file_name() -> String {
    format!("{}.jpg", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// Resolve where the next screenshot goes and make sure the directory exists.
///
/// The user folder is honored only while `save_photos` is on; otherwise the
/// ephemeral fallback directory is used and later discarded.
pub fn screenshot_path(
    folder: Option<&Path>,
    save_photos: bool,
    fallback: &Path,
    file_name: Option<&str>,
) -> Result<PathBuf> {
    let dir = match folder {
        Some(folder) if save_photos => folder.to_path_buf(),
        _ => fallback.to_path_buf(),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create screenshot directory {}", dir.display()))?;
    let name = match file_name {
        Some(name) => name.to_string(),
        None => screenshot_file_name(),
    };
    Ok(dir.join(name))
}

/// Grab `rect` (or the placeholder for an empty selection) and write it to
/// `path` as JPEG.
pub fn capture_to(
    grabber: &dyn ScreenGrabber,
    rect: CaptureRect,
    path: PathBuf,
) -> Result<Screenshot> {
    let image = if rect.is_empty() {
        debug!("empty selection, using placeholder");
        placeholder_image()
    } else {
        grabber.grab(rect)?
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    rgb.save(&path)
        .with_context(|| format!("Failed to save screenshot to {}", path.display()))?;
    debug!(path = %path.display(), "screenshot written");

    Ok(Screenshot { path, image })
}

/// Remove a discarded screenshot and its directory. Never fails: any OS
/// error that survives the enumeration fallback is logged and swallowed.
pub fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!(path = %path.display(), %err, "cannot remove screenshot");
    }
    let Some(dir) = path.parent() else {
        return;
    };
    if fs::remove_dir(dir).is_ok() {
        return;
    }
    // Leftovers from earlier runs keep the directory alive; clear them first.
    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                if let Err(err) = fs::remove_file(entry.path()) {
                    warn!(path = %entry.path().display(), %err, "cannot remove stale screenshot");
                }
            }
        }
        Err(err) => {
            warn!(dir = %dir.display(), %err, "cannot enumerate screenshot directory");
            return;
        }
    }
    if let Err(err) = fs::remove_dir(dir) {
        warn!(dir = %dir.display(), %err, "cannot remove screenshot directory");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SolidGrabber;

    impl ScreenGrabber for SolidGrabber {
        fn grab(&self, rect: CaptureRect) -> Result<RgbaImage> {
            Ok(RgbaImage::from_pixel(
                rect.width,
                rect.height,
                image::Rgba([10, 20, 30, 255]),
            ))
        }
    }

    #[test]
    fn empty_selection_yields_placeholder_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.jpg");
        let rect = CaptureRect::from_corners((50, 50), (50, 50));
        let shot = capture_to(&SolidGrabber, rect, path.clone()).unwrap();
        assert_eq!(shot.image.width(), PLACEHOLDER_WIDTH);
        assert_eq!(shot.image.height(), PLACEHOLDER_HEIGHT);
        assert_eq!(shot.image.get_pixel(0, 0), &image::Rgba([255, 255, 255, 255]));
        assert!(path.exists());
    }

    #[test]
    fn capture_writes_jpeg_to_requested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.jpg");
        let rect = CaptureRect::from_corners((0, 0), (64, 32));
        let shot = capture_to(&SolidGrabber, rect, path.clone()).unwrap();
        assert_eq!(shot.path, path);
        assert_eq!(shot.image.dimensions(), (64, 32));
        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.width(), 64);
    }

    #[test]
    fn path_prefers_user_folder_only_when_saving() {
        let user = tempfile::tempdir().unwrap();
        let fallback = tempfile::tempdir().unwrap();
        let fallback_dir = fallback.path().join("shots");

        let saved = screenshot_path(Some(user.path()), true, &fallback_dir, Some("a.jpg")).unwrap();
        assert_eq!(saved, user.path().join("a.jpg"));

        let ephemeral =
            screenshot_path(Some(user.path()), false, &fallback_dir, Some("a.jpg")).unwrap();
        assert_eq!(ephemeral, fallback_dir.join("a.jpg"));
        assert!(fallback_dir.is_dir());
    }

    #[test]
    fn file_name_is_timestamped_jpg() {
        let name = screenshot_file_name();
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "20240101_120000.jpg".len());
    }

    #[test]
    fn discard_removes_file_and_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("ephemeral");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("shot.jpg");
        fs::write(&path, b"jpeg").unwrap();
        fs::write(dir.join("stale.jpg"), b"old").unwrap();

        discard(&path);
        assert!(!dir.exists());
    }
}
