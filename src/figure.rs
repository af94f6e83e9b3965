//! Plot-style framing of a word cloud.
//!
//! The cloud is shown like an image in a single set of axes: scaled to
//! fit the default axes rectangle of the figure, surrounded by a thin
//! black frame, no ticks or tick labels. Saving crops tightly to the
//! frame plus a small pad.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use tiny_skia::{Pixmap, Transform};

use crate::layout::WordCloud;
use crate::Error;

/// Fraction of the figure width/height covered by the default axes.
const AXES_WIDTH: f32 = 0.775;
const AXES_HEIGHT: f32 = 0.77;
/// Frame line width in points.
const SPINE_WIDTH_PT: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: f32,
    /// Blank border kept around the frame when cropping, in inches.
    pub pad_in: f32,
}

impl Default for Figure {
    fn default() -> Self {
        Self {
            width_in: 15.0,
            height_in: 15.0,
            dpi: 300.0,
            pad_in: 0.1,
        }
    }
}

/// Where the cloud lands in the cropped output, in output pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureGeometry {
    pub width: u32,
    pub height: u32,
    pub image_x: f32,
    pub image_y: f32,
    pub scale: f32,
    pub spine_width: f32,
}

impl Figure {
    pub fn new(width_in: f32, height_in: f32, dpi: f32) -> Self {
        Self {
            width_in,
            height_in,
            dpi,
            ..Self::default()
        }
    }

    /// Geometry of the tight-cropped figure for a `width` x `height` cloud.
    pub fn geometry(&self, width: u32, height: u32) -> FigureGeometry {
        let axes_w = self.width_in * self.dpi * AXES_WIDTH;
        let axes_h = self.height_in * self.dpi * AXES_HEIGHT;
        let scale = (axes_w / width as f32).min(axes_h / height as f32);
        let pad = self.pad_in * self.dpi;
        let spine_width = SPINE_WIDTH_PT * self.dpi / 72.0;

        FigureGeometry {
            width: (width as f32 * scale + 2.0 * pad).ceil() as u32,
            height: (height as f32 * scale + 2.0 * pad).ceil() as u32,
            image_x: pad,
            image_y: pad,
            scale,
            spine_width,
        }
    }

    pub fn to_svg(&self, cloud: &WordCloud) -> String {
        let g = self.geometry(cloud.width, cloud.height);
        let frame_w = cloud.width as f32 * g.scale;
        let frame_h = cloud.height as f32 * g.scale;

        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r##"<rect width="{w}" height="{h}" fill="#FFFFFF"/>"##,
                r#"<g transform="translate({x:.2} {y:.2}) scale({s:.6})">{body}</g>"#,
                r##"<rect x="{x:.2}" y="{y:.2}" width="{fw:.2}" height="{fh:.2}" fill="none" stroke="#000000" stroke-width="{sw:.3}"/>"##,
                "</svg>"
            ),
            w = g.width,
            h = g.height,
            x = g.image_x,
            y = g.image_y,
            s = g.scale,
            fw = frame_w,
            fh = frame_h,
            sw = g.spine_width,
            body = cloud.svg_body(),
        )
    }

    pub fn to_pixmap(&self, cloud: &WordCloud) -> Result<Pixmap, Error> {
        let g = self.geometry(cloud.width, cloud.height);
        let tree = cloud.parse_svg(&self.to_svg(cloud))?;

        let mut pixmap = Pixmap::new(g.width, g.height)
            .ok_or_else(|| Error::Render("Failed to create figure buffer".into()))?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    /// Encode the figure in the format implied by `path`'s extension.
    ///
    /// The whole file is produced in memory first, so a failure never
    /// leaves a truncated file behind.
    pub fn encode(&self, cloud: &WordCloud, path: &Path) -> Result<Vec<u8>, Error> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if ext.as_deref() == Some("svg") {
            return Ok(self.to_svg(cloud).into_bytes());
        }

        let format =
            ImageFormat::from_path(path).map_err(|_| Error::UnsupportedFormat(path.to_path_buf()))?;
        if !format.writing_enabled() {
            return Err(Error::UnsupportedFormat(path.to_path_buf()));
        }

        let pixmap = self.to_pixmap(cloud)?;
        let rgb = pixmap_to_rgb(&pixmap)?;

        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(rgb).write_to(&mut bytes, format)?;
        Ok(bytes.into_inner())
    }

    pub fn save(&self, cloud: &WordCloud, path: &Path) -> Result<(), Error> {
        let bytes = self.encode(cloud, path)?;
        fs::write(path, &bytes).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

fn pixmap_to_rgb(pixmap: &Pixmap) -> Result<RgbImage, Error> {
    let raw: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue()]
        })
        .collect();
    RgbImage::from_raw(pixmap.width(), pixmap.height(), raw)
        .ok_or_else(|| Error::Render("Pixel buffer size mismatch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{WordCloudBuilder, WordInput};
    use crate::test_support::system_font;

    #[test]
    fn default_geometry_for_a_square_canvas() {
        let g = Figure::default().geometry(1500, 1500);
        // 15in * 300dpi * 0.77 = 3465px image, plus 30px pad on each side
        assert_eq!((g.width, g.height), (3525, 3525));
        assert!((g.scale - 2.31).abs() < 1e-4);
        assert!((g.image_x - 30.0).abs() < 1e-3);
    }

    #[test]
    fn wide_canvas_is_limited_by_axes_width() {
        let g = Figure::new(10.0, 10.0, 100.0).geometry(1000, 100);
        assert!((g.scale - 0.775).abs() < 1e-6);
        assert_eq!(g.width, 775 + 20);
    }

    fn small_cloud() -> Option<WordCloud> {
        let font = system_font()?;
        WordCloudBuilder::new()
            .size(100, 100)
            .background("#FFFFFF")
            .font(font)
            .seed(2)
            .build(&[WordInput::new("frame", 1.0)])
            .ok()
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let Some(cloud) = small_cloud() else { return };
        let err = Figure::new(2.0, 2.0, 50.0)
            .encode(&cloud, Path::new("out.unknown"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn png_output_decodes_with_figure_size() {
        let Some(cloud) = small_cloud() else { return };
        let figure = Figure::new(2.0, 2.0, 50.0);
        let bytes = figure.encode(&cloud, Path::new("out.PNG")).unwrap();

        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        let g = figure.geometry(100, 100);
        assert_eq!((img.width(), img.height()), (g.width, g.height));
        // padding stays white
        assert_eq!(img.to_rgb8().get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn svg_output_contains_frame_and_words() {
        let Some(cloud) = small_cloud() else { return };
        let bytes = Figure::default()
            .encode(&cloud, Path::new("cloud.svg"))
            .unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.contains(">frame</text>"));
        assert!(svg.contains(r##"stroke="#000000""##));
    }
}
