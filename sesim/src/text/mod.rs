//! Text preprocessing and vectorization of titles and snippets.

mod bag_of_words;
mod stop_words;
mod tokenizer;

pub use self::bag_of_words::{BagOfWords, BagOfWordsMatrix, Corpus, Document, DEFAULT_TOP_WORDS};
