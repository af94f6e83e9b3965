/*!
 * gen-wordcloud
 *
 * Turns a text file into a word cloud image: stopword lists are merged,
 * the text is tokenized and counted, the most frequent words are laid out
 * on a square canvas and the result is framed like a plotted image and
 * saved in the format implied by the output file name.
 *
 * ```no_run
 * use std::path::Path;
 *
 * gen_wordcloud::generate(Path::new("abstracts.txt"), Path::new("cloud.png"))?;
 * # Ok::<(), gen_wordcloud::Error>(())
 * ```
 */

mod error;
pub mod figure;
mod generator;
pub mod layout;
pub mod stopwords;
pub mod text;

pub use error::Error;
pub use figure::Figure;
pub use generator::{
    generate, CloudParams, Resources, WordCloudGenerator, DEFAULT_FONT, DEFAULT_STOPWORDS_EN,
    DEFAULT_STOPWORDS_JA,
};
pub use layout::{PlacedWord, WordCloud, WordCloudBuilder, WordInput};
pub use stopwords::StopwordSet;
pub use text::{process_text, TextOptions};
