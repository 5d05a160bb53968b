// this_file: crates/capgen-render/src/batch.rs

//! Parallel generation of many labelled samples.

use crate::captcha::{Captcha, ImageCaptcha};
use crate::charset::Charset;
use capgen_core::{CaptchaError, Result};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::iter::IndexedParallelIterator;
use rayon::prelude::*;
use std::sync::Arc;

/// Text to be rendered in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub text: String,
}

impl BatchItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Outcome for one batch item.
#[derive(Debug)]
pub struct BatchResult {
    /// Index of the item in the batch
    pub index: usize,
    pub text: String,
    /// Generated sample or error
    pub result: Result<Captcha>,
}

/// Batch generator sharing one read-only [`ImageCaptcha`].
///
/// Item `i` draws from `StdRng::seed_from_u64(seed + i)`, so output does not
/// depend on thread count or scheduling.
pub struct BatchGenerator {
    captcha: Arc<ImageCaptcha>,
}

impl BatchGenerator {
    pub fn new(captcha: Arc<ImageCaptcha>) -> Self {
        Self { captcha }
    }

    pub fn captcha(&self) -> &ImageCaptcha {
        &self.captcha
    }

    /// Generate every item in parallel on the global rayon pool.
    pub fn generate_batch(&self, items: Vec<BatchItem>, seed: u64) -> Vec<BatchResult> {
        let total = items.len();
        let results: Vec<BatchResult> = self
            .generate_streaming(items.into_par_iter(), seed)
            .collect();

        let failed = results.iter().filter(|r| r.result.is_err()).count();
        if failed > 0 {
            warn!(target: "capgen::batch", "{failed} of {total} samples failed");
        } else {
            info!(target: "capgen::batch", "generated {total} samples");
        }
        results
    }

    /// Generate a batch with a specific number of threads.
    pub fn render_batch_with_threads(
        &self,
        items: Vec<BatchItem>,
        seed: u64,
        num_threads: usize,
    ) -> Result<Vec<BatchResult>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|err| {
                CaptchaError::configuration(format!("cannot build thread pool: {err}"))
            })?;

        Ok(pool.install(|| self.generate_batch(items, seed)))
    }

    /// `count` samples with labels of `len` symbols drawn from `charset`.
    ///
    /// Labels come from the same per-item random source as the image.
    pub fn random_batch(
        &self,
        charset: &Charset,
        count: usize,
        len: usize,
        seed: u64,
    ) -> Vec<BatchResult> {
        (0..count)
            .into_par_iter()
            .map(|index| {
                let mut rng = item_rng(seed, index);
                let text = charset.random_text(&mut rng, len);
                let result = self.captcha.generate_image_with_bboxes(&mut rng, &text);
                BatchResult {
                    index,
                    text,
                    result,
                }
            })
            .collect()
    }

    /// Process items from an indexed iterator in parallel.
    pub fn generate_streaming<'a, I>(
        &'a self,
        items: I,
        seed: u64,
    ) -> impl ParallelIterator<Item = BatchResult> + 'a
    where
        I: IndexedParallelIterator<Item = BatchItem> + 'a,
    {
        items.enumerate().map(move |(index, item)| {
            let mut rng = item_rng(seed, index);
            let result = self
                .captcha
                .generate_image_with_bboxes(&mut rng, &item.text);
            BatchResult {
                index,
                text: item.text,
                result,
            }
        })
    }
}

fn item_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(index as u64))
}
