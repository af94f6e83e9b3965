//! gen-wordcloud CLI
//!
//! Usage:
//!   gen-wordcloud [OPTIONS] <TEXT_PATH> <OUTPUT_PATH>
//!
//! Stopword lists and the font are read from the current directory unless
//! given explicitly. Set `RUST_LOG=gen_wordcloud=debug` for placement details.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gen_wordcloud::{
    CloudParams, Resources, WordCloudGenerator, DEFAULT_FONT, DEFAULT_STOPWORDS_EN,
    DEFAULT_STOPWORDS_JA,
};

/// Generate a word cloud from the text file at TEXT_PATH and save it to OUTPUT_PATH.
#[derive(Parser, Debug)]
#[command(name = "gen-wordcloud", version, about)]
struct Cli {
    /// Path to the input text file
    text_path: PathBuf,

    /// Path where the word cloud image will be saved (format from extension)
    output_path: PathBuf,

    /// English stopword list, one word per line
    #[arg(long, default_value = DEFAULT_STOPWORDS_EN)]
    stopwords_en: PathBuf,

    /// Japanese stopword list, one word per line
    #[arg(long, default_value = DEFAULT_STOPWORDS_JA)]
    stopwords_ja: PathBuf,

    /// TrueType font used to draw the words
    #[arg(long, default_value = DEFAULT_FONT)]
    font: PathBuf,
}

impl Cli {
    fn resources(&self) -> Resources {
        Resources {
            stopword_lists: vec![self.stopwords_en.clone(), self.stopwords_ja.clone()],
            font: self.font.clone(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gen_wordcloud=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let generator = WordCloudGenerator::new(cli.resources(), CloudParams::default());

    generator
        .generate(&cli.text_path, &cli.output_path)
        .with_context(|| {
            format!(
                "Failed to generate word cloud from '{}'",
                cli.text_path.display()
            )
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resource_paths_default_to_working_directory_names() {
        let cli = Cli::try_parse_from(["gen-wordcloud", "in.txt", "out.png"]).unwrap();
        assert_eq!(cli.text_path, PathBuf::from("in.txt"));
        assert_eq!(cli.output_path, PathBuf::from("out.png"));
        assert_eq!(cli.resources(), Resources::default());
    }

    #[test]
    fn resource_paths_can_be_overridden() {
        let cli = Cli::try_parse_from([
            "gen-wordcloud",
            "in.txt",
            "out.png",
            "--stopwords-ja",
            "lists/ja.txt",
            "--font",
            "fonts/Noto.ttf",
        ])
        .unwrap();
        let resources = cli.resources();
        assert_eq!(resources.stopword_lists[0], PathBuf::from("stopwords.en.csv"));
        assert_eq!(resources.stopword_lists[1], PathBuf::from("lists/ja.txt"));
        assert_eq!(resources.font, PathBuf::from("fonts/Noto.ttf"));
    }

    #[test]
    fn both_paths_are_required() {
        assert!(Cli::try_parse_from(["gen-wordcloud", "in.txt"]).is_err());
    }
}
