//! Row aggregation: discovery, extraction of a batch, pairing and summary.

mod discovery;
mod pairing;

pub use discovery::{classify, discover, Batch};
pub use pairing::{pair_attachments_only, pair_positional};

use tracing::info;

use crate::extraction::{DocumentExtractor, ExtractionResult};
use crate::models::config::PairingStrategy;
use crate::models::document::{BatchSummary, Document, PairedRow, Row};
use crate::pdf::PageSource;

/// A document together with what was extracted from it.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub document: Document,
    pub result: ExtractionResult,
}

/// Outcome of one batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub invoices: Vec<ExtractedDocument>,
    pub attachments: Vec<ExtractedDocument>,
    pub rows: Vec<PairedRow>,
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Rows without the document bookkeeping, in output order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().map(|r| &r.row)
    }

    /// Documents that could not be read.
    pub fn faults(&self) -> impl Iterator<Item = &ExtractedDocument> {
        self.invoices
            .iter()
            .chain(self.attachments.iter())
            .filter(|d| d.result.is_fault())
    }
}

/// Turns a batch of documents into paired rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowAggregator {
    strategy: PairingStrategy,
}

impl RowAggregator {
    pub fn new(strategy: PairingStrategy) -> Self {
        Self { strategy }
    }

    /// Pair already extracted documents.
    pub fn pair(
        &self,
        invoices: &[ExtractedDocument],
        attachments: &[ExtractedDocument],
    ) -> Vec<PairedRow> {
        match self.strategy {
            PairingStrategy::Positional => pair_positional(invoices, attachments),
            PairingStrategy::AttachmentsOnly => pair_attachments_only(attachments),
        }
    }

    /// Extract every document the strategy needs, then pair them.
    ///
    /// Documents are read one at a time in sorted order. `observer` is called
    /// after each document, e.g. to drive a progress bar. Invoices are not
    /// read under [`PairingStrategy::AttachmentsOnly`].
    pub fn process<F>(
        &self,
        batch: &Batch,
        extractor: &DocumentExtractor,
        source: &dyn PageSource,
        mut observer: F,
    ) -> BatchReport
    where
        F: FnMut(&ExtractedDocument),
    {
        let mut extract_all = |documents: &[Document]| -> Vec<ExtractedDocument> {
            documents
                .iter()
                .map(|document| {
                    let extracted = ExtractedDocument {
                        document: document.clone(),
                        result: extractor.extract_document(source, document),
                    };
                    observer(&extracted);
                    extracted
                })
                .collect()
        };

        let invoices = match self.strategy {
            PairingStrategy::Positional => extract_all(&batch.invoices),
            PairingStrategy::AttachmentsOnly => Vec::new(),
        };
        let attachments = extract_all(&batch.attachments);

        let rows = self.pair(&invoices, &attachments);
        let summary = BatchSummary::from_rows(rows.iter().map(|r| &r.row));

        info!(
            "Paired {} rows ({:?}): {} VAT numbers, {} weights, {} packages",
            summary.total_rows, self.strategy, summary.vat_numbers, summary.weights, summary.packages
        );

        BatchReport {
            invoices,
            attachments,
            rows,
            summary,
        }
    }
}
