//! Binary bag of words representation of the documents of several engines over a shared
//! vocabulary.

use std::{collections::BTreeMap, sync::Arc};

use itertools::Itertools;
use ndarray::{Array1, Array2, Axis};

use super::tokenizer::tokenize;

/// The default number of most frequent words each engine contributes to the vocabulary.
pub const DEFAULT_TOP_WORDS: usize = 100;

/// A text retrieved for a query.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// The query the document was retrieved for.
    pub query: String,
    /// The rank of the result the document stems from, if it represents a single result.
    pub index: Option<usize>,
    pub text: String,
}

impl Document {
    pub fn new(query: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            index: None,
            text: text.into(),
        }
    }

    pub fn with_index(self, index: usize) -> Self {
        Self {
            index: Some(index),
            ..self
        }
    }
}

/// The documents of one engine.
#[derive(Clone, Debug)]
pub struct Corpus {
    pub engine: String,
    pub documents: Vec<Document>,
}

impl Corpus {
    pub fn new(engine: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            engine: engine.into(),
            documents,
        }
    }
}

/// The bag of words matrix of one engine.
#[derive(Clone, Debug)]
pub struct BagOfWordsMatrix {
    /// One row per document, one column per vocabulary term, `1` if the term is present.
    pub matrix: Array2<f32>,
    pub engine: String,
    pub vocabulary: Arc<[String]>,
}

impl BagOfWordsMatrix {
    /// The vector of the document in `row`.
    ///
    /// # Panics
    /// Panics if the row is out of bounds.
    pub fn row(&self, row: usize) -> Array1<f32> {
        self.matrix.row(row).to_owned()
    }
}

/// Term counts of one engine over its own vocabulary.
struct Fitted {
    engine: String,
    counts: Array2<f32>,
    vocabulary: Vec<String>,
}

impl Fitted {
    fn fit(corpus: &Corpus, remove_query_term: bool) -> Self {
        let tokenized = corpus
            .documents
            .iter()
            .map(|document| tokenize(&document.query, &document.text, remove_query_term))
            .collect::<Vec<_>>();

        let columns = tokenized
            .iter()
            .flatten()
            .map(String::as_str)
            .sorted()
            .dedup()
            .enumerate()
            .map(|(column, term)| (term, column))
            .collect::<BTreeMap<_, _>>();

        let mut counts = Array2::zeros((tokenized.len(), columns.len()));
        for (row, tokens) in tokenized.iter().enumerate() {
            for token in tokens {
                counts[[row, columns[token.as_str()]]] += 1.;
            }
        }
        let vocabulary = columns.keys().map(ToString::to_string).collect();

        Self {
            engine: corpus.engine.clone(),
            counts,
            vocabulary,
        }
    }

    /// The `n` most frequent terms, ties are resolved in favor of the later term.
    fn top_words(&self, n: usize) -> Vec<&str> {
        let frequencies = self.counts.sum_axis(Axis(0));
        (0..self.vocabulary.len())
            .sorted_by(|&i, &j| {
                frequencies[j]
                    .partial_cmp(&frequencies[i])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(j.cmp(&i))
            })
            .take(n)
            .map(|column| self.vocabulary[column].as_str())
            .collect()
    }

    /// Projects the counts onto `vocabulary` as term presence.
    fn transform(&self, vocabulary: &[String]) -> Array2<f32> {
        let mut matrix = Array2::zeros((self.counts.nrows(), vocabulary.len()));
        for (target, term) in vocabulary.iter().enumerate() {
            if let Ok(source) = self.vocabulary.binary_search(term) {
                let present = self.counts.column(source).mapv(|count| (count > 0.) as u8 as f32);
                matrix.column_mut(target).assign(&present);
            }
        }
        matrix
    }
}

/// Vectorizes the corpora of several engines, each engine is fitted separately.
pub struct BagOfWords {
    fitted: Vec<Fitted>,
    queries: Vec<String>,
    indexes: Vec<Option<usize>>,
}

impl BagOfWords {
    /// Fits a count vectorizer per corpus.
    ///
    /// If `remove_query_term` is set, the words of a document's query are not counted.
    pub fn new(corpora: &[Corpus], remove_query_term: bool) -> Self {
        let first = corpora.first().map(|corpus| corpus.documents.as_slice());
        let queries = first
            .unwrap_or_default()
            .iter()
            .map(|document| document.query.clone())
            .collect();
        let indexes = first
            .unwrap_or_default()
            .iter()
            .map(|document| document.index)
            .collect();
        let fitted = corpora
            .iter()
            .map(|corpus| Fitted::fit(corpus, remove_query_term))
            .collect();

        Self {
            fitted,
            queries,
            indexes,
        }
    }

    /// The queries of the documents of the first engine.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// The result indexes of the documents of the first engine.
    pub fn indexes(&self) -> &[Option<usize>] {
        &self.indexes
    }

    /// Builds the bag of words matrices over a shared vocabulary.
    ///
    /// The vocabulary is the sorted union of the `top_n` most frequent words of every engine,
    /// or of all their words if `top_n` is `None`.
    pub fn build(&self, top_n: Option<usize>) -> Vec<BagOfWordsMatrix> {
        let vocabulary = self
            .fitted
            .iter()
            .flat_map(|fitted| match top_n {
                Some(n) => fitted.top_words(n),
                None => fitted.vocabulary.iter().map(String::as_str).collect(),
            })
            .sorted()
            .dedup()
            .map(ToString::to_string)
            .collect::<Arc<[String]>>();

        self.fitted
            .iter()
            .map(|fitted| BagOfWordsMatrix {
                matrix: fitted.transform(&vocabulary),
                engine: fitted.engine.clone(),
                vocabulary: vocabulary.clone(),
            })
            .collect()
    }
}
