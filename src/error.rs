use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required side file (stopword list, font) could not be read.
    #[error("Resource not found: {}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The input text could not be read or is not valid UTF-8.
    #[error("Cannot read input text {}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot write output {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unsupported output format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Font error: {0}")]
    Font(String),
    #[error("SVG error: {0}")]
    Svg(String),
    #[error("Render error: {0}")]
    Render(String),
    /// Nothing survived filtering, so there is nothing to draw.
    #[error("We need at least 1 word to plot a word cloud, got 0")]
    EmptyInput,
}
