//! Weather pictograms loaded from PNG files and drawn as half-block pixels.
//!
//! Every terminal cell shows two vertical pixels: `▀` with the upper pixel as
//! foreground and the lower one as background. Transparent pixels take the
//! color of whatever the icon is drawn on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use skycast_core::AppError;
use skycast_weather::IconKind;

use crate::theme::Rgb;

/// Pixel size of the conditions icon (16 columns × 8 rows)
pub const LARGE_ICON_PX: u32 = 16;
/// Pixel size of a forecast card icon (8 columns × 4 rows)
pub const SMALL_ICON_PX: u32 = 8;

const UPPER_HALF_BLOCK: &str = "▀";
const ALPHA_THRESHOLD: u8 = 128;

#[derive(Debug)]
pub struct IconError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for IconError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

impl std::error::Error for IconError {}

/// Decoded icon; `None` marks a transparent pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<Option<Rgb>>,
}

impl Pixmap {
    pub fn from_rgba(image: &image::RgbaImage) -> Self {
        let pixels = image
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                (a >= ALPHA_THRESHOLD).then_some(Rgb::new(r, g, b))
            })
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Terminal rows needed to draw the pixmap
    pub fn rows(&self) -> u32 {
        self.height.div_ceil(2)
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y * self.width + x) as usize)
            .copied()
            .flatten()
    }

    /// One line per two pixel rows, transparent pixels painted `background`.
    pub fn to_lines(&self, background: Rgb) -> Vec<Line<'static>> {
        (0..self.rows())
            .map(|row| {
                let spans: Vec<Span<'static>> = (0..self.width)
                    .map(|x| {
                        let top = self.pixel(x, row * 2).unwrap_or(background);
                        let bottom = self.pixel(x, row * 2 + 1).unwrap_or(background);
                        Span::styled(
                            UPPER_HALF_BLOCK,
                            Style::default().fg(top.into()).bg(bottom.into()),
                        )
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Large and small variant of every pictogram that could be loaded.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    large: HashMap<IconKind, Pixmap>,
    small: HashMap<IconKind, Pixmap>,
}

impl IconSet {
    /// Load `<dir>/<kind>.png` for every kind. Missing or broken files are
    /// logged and left out.
    pub fn load(dir: &Path) -> Self {
        let mut set = Self::default();

        for kind in IconKind::ALL {
            let path = dir.join(format!("{}.png", kind.file_stem()));
            match load_image(&path) {
                Ok(image) => {
                    set.large.insert(kind, scaled(&image, LARGE_ICON_PX));
                    set.small.insert(kind, scaled(&image, SMALL_ICON_PX));
                }
                Err(e) => {
                    let err = AppError::from(e);
                    tracing::warn!("{} ({})", err, err.user_message());
                }
            }
        }

        tracing::info!(
            "Loaded {}/{} weather icons from {}",
            set.large.len(),
            IconKind::ALL.len(),
            dir.display()
        );
        set
    }

    pub fn large(&self, kind: IconKind) -> Option<&Pixmap> {
        self.large.get(&kind)
    }

    pub fn small(&self, kind: IconKind) -> Option<&Pixmap> {
        self.small.get(&kind)
    }
}

fn load_image(path: &Path) -> Result<image::DynamicImage, IconError> {
    image::open(path).map_err(|e| IconError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn scaled(image: &image::DynamicImage, size: u32) -> Pixmap {
    Pixmap::from_rgba(&image.resize_exact(size, size, FilterType::Triangle).to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use ratatui::style::Color;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_load_present_and_missing_icons() {
        let dir = tempfile::tempdir().unwrap();
        solid(32, 32, [0x53, 0x71, 0x88, 255])
            .save(dir.path().join("rain.png"))
            .unwrap();

        let icons = IconSet::load(dir.path());

        let large = icons.large(IconKind::Rain).unwrap();
        assert_eq!(large.width(), LARGE_ICON_PX);
        assert_eq!(large.rows(), LARGE_ICON_PX / 2);
        assert_eq!(icons.small(IconKind::Rain).unwrap().width(), SMALL_ICON_PX);

        assert!(icons.large(IconKind::Snow).is_none());
        assert!(icons.small(IconKind::Unknown).is_none());
    }

    #[test]
    fn test_missing_directory_gives_empty_set() {
        let icons = IconSet::load(Path::new("/definitely/not/icons"));
        assert!(IconKind::ALL.iter().all(|k| icons.large(*k).is_none()));
    }

    #[test]
    fn test_half_block_lines() {
        let mut image = solid(2, 2, [255, 0, 0, 255]);
        image.put_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let pixmap = Pixmap::from_rgba(&image);
        let background = Rgb::new(1, 2, 3);

        let lines = pixmap.to_lines(background);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 2);

        let right = lines[0].spans[1].style;
        assert_eq!(right.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(right.bg, Some(Color::Rgb(1, 2, 3)));
    }

    #[test]
    fn test_odd_height_pads_with_background() {
        let pixmap = Pixmap::from_rgba(&solid(1, 3, [9, 9, 9, 255]));
        let lines = pixmap.to_lines(Rgb::new(0, 0, 0));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans[0].style.bg, Some(Color::Rgb(0, 0, 0)));
    }
}
