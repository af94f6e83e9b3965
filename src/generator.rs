use std::fs;
use std::path::{Path, PathBuf};

use crate::figure::Figure;
use crate::layout::{WordCloud, WordCloudBuilder};
use crate::stopwords::StopwordSet;
use crate::text::{process_text, TextOptions};
use crate::Error;

pub const DEFAULT_STOPWORDS_EN: &str = "stopwords.en.csv";
pub const DEFAULT_STOPWORDS_JA: &str = "stopwords.ja.csv";
pub const DEFAULT_FONT: &str = "HackGenConsoleNF-Bold.ttf";

/// Side files the generator reads besides the input text.
///
/// Relative paths resolve against the current working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Resources {
    pub stopword_lists: Vec<PathBuf>,
    pub font: PathBuf,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            stopword_lists: vec![DEFAULT_STOPWORDS_EN.into(), DEFAULT_STOPWORDS_JA.into()],
            font: DEFAULT_FONT.into(),
        }
    }
}

/// Visual parameters of the cloud and its figure.
#[derive(Debug, Clone)]
pub struct CloudParams {
    pub width: u32,
    pub height: u32,
    pub min_font_size: f32,
    pub max_words: usize,
    pub background: String,
    pub text: TextOptions,
    pub figure: Figure,
    pub seed: Option<u64>,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1500,
            min_font_size: 5.0,
            max_words: 400,
            background: "#FFFFFF".into(),
            text: TextOptions::default(),
            figure: Figure::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordCloudGenerator {
    pub resources: Resources,
    pub params: CloudParams,
}

impl WordCloudGenerator {
    pub fn new(resources: Resources, params: CloudParams) -> Self {
        Self { resources, params }
    }

    /// Render `text_path` as a word cloud figure saved to `output_path`.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn generate(&self, text_path: &Path, output_path: &Path) -> Result<(), Error> {
        let cloud = self.build_cloud(text_path)?;
        self.params.figure.save(&cloud, output_path)
    }

    /// Everything up to, but not including, drawing the figure.
    pub fn build_cloud(&self, text_path: &Path) -> Result<WordCloud, Error> {
        let stopwords = StopwordSet::load(&self.resources.stopword_lists)?;
        tracing::info!("Loaded {} stopwords", stopwords.len());

        let text = fs::read_to_string(text_path).map_err(|source| Error::Input {
            path: text_path.to_path_buf(),
            source,
        })?;

        let font = fs::read(&self.resources.font).map_err(|source| Error::Resource {
            path: self.resources.font.clone(),
            source,
        })?;

        let frequencies = process_text(&text, &stopwords, &self.params.text);
        tracing::info!(
            "{}: {} distinct words",
            text_path.display(),
            frequencies.len()
        );

        let p = &self.params;
        let mut builder = WordCloudBuilder::new()
            .size(p.width, p.height)
            .background(p.background.clone())
            .font(font)
            .min_font_size(p.min_font_size)
            .max_words(p.max_words);
        if let Some(seed) = p.seed {
            builder = builder.seed(seed);
        }
        builder.build(&frequencies)
    }
}

/// Render with the default resources and parameters.
pub fn generate(text_path: &Path, output_path: &Path) -> Result<(), Error> {
    WordCloudGenerator::default().generate(text_path, output_path)
}
