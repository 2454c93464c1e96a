//! Keyword index over the internal document corpus
//!
//! Markdown and plain-text files are split into paragraph passages and
//! scored against queries with tf-idf-weighted term overlap. Built once at
//! startup and shared read-only; good enough to honor the retrieval tool
//! contract without an embedding store.

use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors building the index
#[derive(Error, Debug)]
pub enum KbError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KbError>;

/// Minimum characters for a paragraph to count as a passage
const MIN_PASSAGE_CHARS: usize = 20;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "how", "in", "is", "it", "of",
    "on", "or", "our", "the", "this", "to", "was", "what", "when", "where", "which", "who", "will",
    "with",
];

/// One indexed passage
#[derive(Debug, Clone)]
struct Passage {
    source: String,
    text: String,
    term_counts: HashMap<String, usize>,
}

/// One search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub source: String,
    pub text: String,
    pub score: f64,
}

/// Passage index over a document directory
#[derive(Debug, Default)]
pub struct DocumentIndex {
    passages: Vec<Passage>,
    doc_freq: HashMap<String, usize>,
}

impl DocumentIndex {
    /// Build an index from in-memory documents (name, content)
    pub fn from_documents(documents: Vec<(String, String)>) -> Self {
        let mut index = Self::default();
        for (name, content) in documents {
            index.add_document(&name, &content);
        }
        index
    }

    /// Build an index from every `.md`/`.txt` file directly under `dir`
    pub async fn load_dir(dir: &Path) -> Result<Self> {
        let mut index = Self::default();

        if !dir.exists() {
            debug!("document directory {:?} does not exist", dir);
            return Ok(index);
        }

        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_doc = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e, "md" | "txt"))
                .unwrap_or(false);
            if !is_doc {
                continue;
            }

            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("document")
                .to_string();
            let content = tokio::fs::read_to_string(&path).await?;
            index.add_document(&name, &content);
        }

        info!(
            passages = index.passages.len(),
            terms = index.doc_freq.len(),
            "document index built"
        );
        Ok(index)
    }

    fn add_document(&mut self, name: &str, content: &str) {
        let splitter = Regex::new(r"\n\s*\n").unwrap();
        for chunk in splitter.split(content) {
            let text = chunk.trim();
            if text.len() < MIN_PASSAGE_CHARS {
                continue;
            }

            let mut term_counts: HashMap<String, usize> = HashMap::new();
            for term in tokenize(text) {
                *term_counts.entry(term).or_default() += 1;
            }
            for term in term_counts.keys() {
                *self.doc_freq.entry(term.clone()).or_default() += 1;
            }

            self.passages.push(Passage {
                source: name.to_string(),
                text: text.to_string(),
                term_counts,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Rank passages against `query`, best first, at most `top_k` results.
    ///
    /// Passages sharing no terms with the query are omitted entirely, so the
    /// result may be empty.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let terms: HashSet<String> = tokenize(query).into_iter().collect();
        if terms.is_empty() || self.passages.is_empty() {
            return Vec::new();
        }

        let total = self.passages.len() as f64;
        let mut hits: Vec<SearchHit> = self
            .passages
            .iter()
            .filter_map(|passage| {
                let mut score = 0.0;
                for term in &terms {
                    let tf = *passage.term_counts.get(term).unwrap_or(&0);
                    if tf == 0 {
                        continue;
                    }
                    let df = *self.doc_freq.get(term).unwrap_or(&1) as f64;
                    let idf = (1.0 + total / df).ln();
                    score += (1.0 + (tf as f64).ln()) * idf;
                }
                (score > 0.0).then(|| SearchHit {
                    source: passage.source.clone(),
                    text: passage.text.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);
        hits
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let word = Regex::new(r"[a-z0-9]+").unwrap();
    word.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|t| t.len() > 1 && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> DocumentIndex {
        DocumentIndex::from_documents(vec![
            (
                "returns-policy.md".to_string(),
                "# Returns Policy\n\nCustomers may return any unworn item within \
                 30 days of delivery for a full refund.\n\nFinal-sale items and \
                 gift cards are not eligible for returns or exchanges."
                    .to_string(),
            ),
            (
                "shipping.md".to_string(),
                "# Shipping\n\nStandard shipping takes 3 to 5 business days \
                 within the continental US.\n\nExpedited shipping upgrades are \
                 available at checkout for most items."
                    .to_string(),
            ),
        ])
    }

    #[test]
    fn chunks_documents_into_passages() {
        let index = sample_index();
        // Headings are shorter than the passage minimum and are dropped.
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn short_paragraphs_skipped() {
        let index = DocumentIndex::from_documents(vec![(
            "tiny.md".to_string(),
            "# Title\n\nok\n\nA paragraph that is comfortably long enough to index.".to_string(),
        )]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn search_ranks_relevant_passage_first() {
        let index = sample_index();

        let hits = index.search("refund policy for unworn items", 3);

        assert!(!hits.is_empty());
        assert_eq!(hits[0].source, "returns-policy.md");
        assert!(hits[0].text.contains("30 days"));
    }

    #[test]
    fn search_returns_at_most_top_k() {
        let index = sample_index();
        let hits = index.search("items", 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn search_no_overlap_is_empty() {
        let index = sample_index();
        assert!(index.search("quantum chromodynamics", 3).is_empty());
    }

    #[test]
    fn search_empty_index_is_empty() {
        let index = DocumentIndex::default();
        assert!(index.is_empty());
        assert!(index.search("anything", 3).is_empty());
    }

    #[test]
    fn stopword_only_query_is_empty() {
        let index = sample_index();
        assert!(index.search("what is the", 3).is_empty());
    }
}
