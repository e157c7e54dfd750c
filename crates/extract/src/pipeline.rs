use std::path::Path;
use thiserror::Error;

use ledgerlens_core::{ExtractError, ExtractedStatement};

use crate::decode::DocumentDecoder;
use crate::engine::StatementEngine;
use crate::hash;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// The result of a single document processing run.
#[derive(Debug)]
pub struct PipelineResult {
    /// SHA-256 hex digest of the raw document bytes.
    pub hash_hex: String,
    /// Length in bytes of the decoded text.
    pub text_len: usize,
    pub statement: ExtractedStatement,
}

/// Orchestrates: hash → decode → extract.
pub struct DocumentPipeline<D: DocumentDecoder> {
    decoder: D,
    engine: StatementEngine,
}

impl<D: DocumentDecoder> DocumentPipeline<D> {
    pub fn new(decoder: D, engine: StatementEngine) -> Self {
        Self { decoder, engine }
    }

    pub fn engine(&self) -> &StatementEngine {
        &self.engine
    }

    /// Process a document on disk.
    pub async fn process_file(&self, path: &Path) -> Result<PipelineResult, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(self.process_bytes(&bytes)?)
    }

    /// Process raw document bytes. Decoding is CPU-bound; async callers
    /// should run this on a blocking thread.
    pub fn process_bytes(&self, data: &[u8]) -> Result<PipelineResult, ExtractError> {
        let hash_hex = hash::fingerprint(data);

        let text = self.decoder.decode(data).map_err(|e| {
            tracing::warn!(hash = hash::short_fingerprint(&hash_hex), "document decode failed: {e}");
            ExtractError::DecodeFailure(e.to_string())
        })?;

        let statement = self.engine.extract(&text)?;

        tracing::info!(
            hash = hash::short_fingerprint(&hash_hex),
            bank = %statement.bank_name,
            transactions = statement.transactions.len(),
            "document processed"
        );

        Ok(PipelineResult {
            hash_hex,
            text_len: text.len(),
            statement,
        })
    }
}
