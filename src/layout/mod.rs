//! Word placement and rendering of the placed words.
//!
//! Words are sized by relative frequency, placed along a spiral from the
//! canvas centre wherever their bounding box (plus margin) is still free,
//! and shrunk step by step when no room is left.

mod color;
mod occupancy;
pub(crate) mod spiral;

use std::cmp::Ordering;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tiny_skia::{Pixmap, Transform};

use crate::Error;
use color::{parse_hex_color, random_color};
use occupancy::{rasterize_text, OccupancyMap, TextBox};

/// Rotation applied to words that are not laid out horizontally.
/// Negative angles turn counter-clockwise, so vertical words read upwards.
pub const VERTICAL: f32 = -90.0;

// =============================================================================
// Public Data Types
// =============================================================================

/// A word and its relative frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct WordInput {
    pub text: String,
    pub weight: f32,
}

impl WordInput {
    pub fn new(text: impl Into<String>, weight: f32) -> Self {
        Self {
            text: text.into(),
            weight: weight.max(0.0),
        }
    }
}

/// A word after layout. `x`/`y` is the baseline origin before rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub color: String,
}

struct FontInfo {
    data: Vec<u8>,
    family_name: String,
}

fn extract_font_family_name(font_data: &[u8]) -> Option<String> {
    let mut db = usvg::fontdb::Database::new();
    db.load_font_source(usvg::fontdb::Source::Binary(Arc::new(font_data.to_vec())));
    for face in db.faces() {
        if let Some((name, _)) = face.families.first() {
            return Some(name.clone());
        }
    }
    None
}

// =============================================================================
// Builder
// =============================================================================

pub struct WordCloudBuilder {
    width: u32,
    height: u32,
    background: String,
    font_data: Option<Vec<u8>>,
    margin: u32,
    min_font_size: f32,
    max_font_size: Option<f32>,
    font_step: f32,
    max_words: usize,
    prefer_horizontal: f32,
    relative_scaling: f32,
    seed: Option<u64>,
}

impl Default for WordCloudBuilder {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            background: "#000000".into(),
            font_data: None,
            margin: 2,
            min_font_size: 4.0,
            max_font_size: None,
            font_step: 1.0,
            max_words: 200,
            prefer_horizontal: 0.9,
            relative_scaling: 0.5,
            seed: None,
        }
    }
}

impl WordCloudBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    /// Background as `#rrggbb`.
    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }

    /// TrueType/OpenType font bytes used for both layout and rendering.
    pub fn font(mut self, font_data: Vec<u8>) -> Self {
        self.font_data = Some(font_data);
        self
    }

    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size.max(1.0);
        self
    }

    /// Fix the size of the most frequent word instead of probing for it.
    pub fn max_font_size(mut self, size: f32) -> Self {
        self.max_font_size = Some(size.max(self.min_font_size));
        self
    }

    pub fn font_step(mut self, step: f32) -> Self {
        self.font_step = step.max(1.0);
        self
    }

    pub fn max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    /// Probability in `0.0..=1.0` that a word starts out horizontal.
    pub fn prefer_horizontal(mut self, p: f32) -> Self {
        self.prefer_horizontal = p.clamp(0.0, 1.0);
        self
    }

    /// How much font size follows frequency: 0 keeps rank order only,
    /// 1 makes size proportional to frequency.
    pub fn relative_scaling(mut self, scaling: f32) -> Self {
        self.relative_scaling = scaling.clamp(0.0, 1.0);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self, words: &[WordInput]) -> Result<WordCloud, Error> {
        let mut sorted: Vec<WordInput> = words
            .iter()
            .filter(|w| !w.text.trim().is_empty() && w.weight > 0.0)
            .cloned()
            .collect();

        if sorted.is_empty() || self.max_words == 0 {
            return Err(Error::EmptyInput);
        }

        sorted.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
        sorted.truncate(self.max_words);

        let max_weight = sorted[0].weight;
        for word in &mut sorted {
            word.weight /= max_weight;
        }

        let font_info = self.load_font()?;
        let font = Font::from_bytes(font_info.data.as_slice(), FontSettings::default())
            .map_err(|e| Error::Font(e.to_string()))?;

        let mut rng = match self.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };

        let start_size = match self.max_font_size {
            Some(size) => size,
            None => self.probe_font_size(&sorted, &font, &mut rng)?,
        };
        tracing::debug!("Largest font size: {}", start_size);

        let placed = self.place_words(&sorted, start_size, &font, &mut rng);
        if placed.is_empty() {
            return Err(Error::Render("Could not place any words".into()));
        }
        tracing::info!(
            "Placed {} of {} words on a {}x{} canvas",
            placed.len(),
            sorted.len(),
            self.width,
            self.height
        );

        Ok(WordCloud {
            width: self.width,
            height: self.height,
            background: self.background,
            words: placed,
            font_data: font_info.data,
            font_family: font_info.family_name,
        })
    }

    fn load_font(&self) -> Result<FontInfo, Error> {
        let data = self
            .font_data
            .clone()
            .ok_or_else(|| Error::Font("No font provided".into()))?;

        let family_name =
            extract_font_family_name(&data).ok_or_else(|| Error::Font("Unreadable font".into()))?;

        Ok(FontInfo { data, family_name })
    }

    /// Lay out the two heaviest words starting from the canvas height and
    /// derive the largest font size from what fitted.
    fn probe_font_size(
        &self,
        words: &[WordInput],
        font: &Font,
        rng: &mut ChaCha8Rng,
    ) -> Result<f32, Error> {
        let head = &words[..words.len().min(2)];
        let sizes: Vec<f32> = self
            .place_words(head, self.height as f32, font, rng)
            .iter()
            .map(|w| w.font_size)
            .collect();

        match sizes.as_slice() {
            [] => Err(Error::Render(
                "Couldn't find space to draw; the canvas is too small".into(),
            )),
            [only] => Ok(*only),
            [a, b, ..] => Ok((2.0 * a * b / (a + b)).floor()),
        }
    }

    fn place_words(
        &self,
        words: &[WordInput],
        start_size: f32,
        font: &Font,
        rng: &mut ChaCha8Rng,
    ) -> Vec<PlacedWord> {
        let mut map = OccupancyMap::new(self.width, self.height);
        let mut placed = Vec::with_capacity(words.len());
        let mut font_size = start_size;
        let mut last_weight = 1.0f32;
        let half_margin = (self.margin / 2) as i32;

        for word in words {
            let rs = self.relative_scaling;
            if rs != 0.0 {
                font_size = ((rs * (word.weight / last_weight) + (1.0 - rs)) * font_size).round();
            }

            let mut angle = if rng.random::<f32>() < self.prefer_horizontal {
                0.0
            } else {
                VERTICAL
            };
            let mut tried_other = false;

            let found = loop {
                if font_size < self.min_font_size {
                    break None;
                }
                let tb = TextBox::measure(&word.text, font_size, angle, font);
                let dt = if rng.random_bool(0.5) { 1 } else { -1 };
                let offsets = spiral::offsets(self.width, self.height, dt);
                if let Some(pos) =
                    map.find_position(tb.width + self.margin, tb.height + self.margin, offsets)
                {
                    break Some((pos, tb));
                }
                if !tried_other && self.prefer_horizontal < 1.0 {
                    angle = if angle == 0.0 { VERTICAL } else { 0.0 };
                    tried_other = true;
                } else {
                    font_size -= self.font_step;
                    angle = 0.0;
                }
            };

            let Some(((x, y), tb)) = found else {
                tracing::debug!("No room left for '{}', stopping", word.text);
                break;
            };

            let (left, top) = (x + half_margin, y + half_margin);
            let sprite = rasterize_text(&word.text, font_size, &tb, font);
            map.write_sprite(&sprite, left, top);

            let (anchor_x, anchor_y) = tb.anchor();
            placed.push(PlacedWord {
                text: word.text.clone(),
                font_size,
                x: left as f32 + anchor_x,
                y: top as f32 + anchor_y,
                rotation: angle,
                color: random_color(rng),
            });
            last_weight = word.weight;
        }

        placed
    }
}

// =============================================================================
// Output Generation
// =============================================================================

pub struct WordCloud {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub words: Vec<PlacedWord>,
    font_data: Vec<u8>,
    font_family: String,
}

impl WordCloud {
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// SVG elements for the background and words, without the `<svg>` root.
    pub(crate) fn svg_body(&self) -> String {
        let mut body = String::with_capacity(64 * self.words.len() + 256);

        body.push_str(&format!(
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            self.width, self.height, self.background
        ));

        body.push_str(&format!(
            r#"<style>text{{font-family:'{}',sans-serif}}</style>"#,
            escape_xml(&self.font_family)
        ));

        for word in &self.words {
            body.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" fill="{}" font-size="{:.1}" transform="rotate({:.1} {:.1} {:.1})">{}</text>"#,
                word.x,
                word.y,
                word.color,
                word.font_size,
                word.rotation,
                word.x,
                word.y,
                escape_xml(&word.text)
            ));
        }

        body
    }

    pub fn to_svg(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">{}</svg>"#,
            self.width,
            self.height,
            self.width,
            self.height,
            self.svg_body()
        )
    }

    /// Parse an SVG document that uses this cloud's font.
    pub(crate) fn parse_svg(&self, svg: &str) -> Result<usvg::Tree, Error> {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_font_source(usvg::fontdb::Source::Binary(Arc::new(
            self.font_data.clone(),
        )));
        tracing::debug!(
            "Rendering with '{}', {} face(s) loaded",
            self.font_family,
            fontdb.len()
        );

        let options = usvg::Options {
            font_family: self.font_family.clone(),
            fontdb: Arc::new(fontdb),
            ..Default::default()
        };

        usvg::Tree::from_str(svg, &options).map_err(|e| Error::Svg(e.to_string()))
    }

    /// Raster of the bare canvas, without the figure frame, scaled by `scale`.
    ///
    /// Use [`crate::Figure`] for the framed, tight-cropped output.
    pub fn to_pixmap(&self, scale: f32) -> Result<Pixmap, Error> {
        let tree = self.parse_svg(&self.to_svg())?;
        let size = tree.size().to_int_size();
        let out_width = (size.width() as f32 * scale).max(1.0) as u32;
        let out_height = (size.height() as f32 * scale).max(1.0) as u32;

        let mut pixmap = Pixmap::new(out_width, out_height)
            .ok_or_else(|| Error::Render("Failed to create pixel buffer".into()))?;

        if let Some(color) = parse_hex_color(&self.background) {
            pixmap.fill(color);
        }

        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    /// PNG bytes of [`WordCloud::to_pixmap`].
    pub fn to_png(&self, scale: f32) -> Result<Vec<u8>, Error> {
        self.to_pixmap(scale)?
            .encode_png()
            .map_err(|e| Error::Render(e.to_string()))
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
