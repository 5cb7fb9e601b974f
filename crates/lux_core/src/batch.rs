//! Batch parsing of many IES documents.
//!
//! Every document is parsed independently; a failure is recorded for that
//! input and the rest of the batch continues. Output order always matches
//! input order.

use rayon::prelude::*;

use crate::ies::{IesRecord, ParseOptions, ParseResult};

/// A named document to parse.
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Name/identifier for this document (e.g., filename)
    pub name: String,
    /// Full document text
    pub content: String,
}

impl BatchInput {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Result for one input.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Name of the input this came from
    pub name: String,
    pub result: ParseResult<IesRecord>,
}

/// Batch configuration.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Options applied to every document
    pub parse: ParseOptions,
    /// Parse documents on the rayon thread pool
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            parallel: true,
        }
    }
}

/// Summary counts for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Parse every input, returning one output per input in the same order.
pub fn parse_batch(inputs: &[BatchInput], options: &BatchOptions) -> Vec<BatchOutput> {
    let parse_one = |input: &BatchInput| BatchOutput {
        name: input.name.clone(),
        result: IesRecord::parse_with_options(&input.content, &options.parse),
    };

    let outputs: Vec<BatchOutput> = if options.parallel {
        inputs.par_iter().map(parse_one).collect()
    } else {
        inputs.iter().map(parse_one).collect()
    };

    for output in &outputs {
        if let Err(e) = &output.result {
            log::warn!("Failed to parse {}: {}", output.name, e);
        }
    }

    let stats = summarize(&outputs);
    log::info!(
        "Parsed {} document(s): {} ok, {} failed",
        stats.total,
        stats.successful,
        stats.failed
    );

    outputs
}

/// Count successes and failures.
pub fn summarize(outputs: &[BatchOutput]) -> BatchStats {
    let successful = outputs.iter().filter(|o| o.result.is_ok()).count();
    BatchStats {
        total: outputs.len(),
        successful,
        failed: outputs.len() - successful,
    }
}
