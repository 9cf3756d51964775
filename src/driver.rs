//! Inference driver: samples in, JSON Schema document out.
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, InferConfig, Settings};
use crate::inference::Node;
use crate::ir::Schema;
use crate::lower::lower_to_ir;
use crate::render::render_document;
use crate::source::{SourceError, ValueSource};
use crate::value::Value;

/// Samples per rayon task in `infer_for_samples_par`.
const PAR_CHUNK: usize = 256;

#[derive(Debug, Error)]
pub enum InferError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Configured inference engine. Cheap to share; every run starts a fresh tree.
#[derive(Clone, Debug, Default)]
pub struct Inferrer {
    settings: Settings,
}

impl Inferrer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Validate `config` up front; no sample is touched on error.
    pub fn from_config(config: &InferConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.build()?))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> Inference<'_> {
        Inference { settings: &self.settings, root: None, samples: 0 }
    }

    /// One sample, regardless of `sample_collection`.
    pub fn infer_for_sample(&self, sample: &Value) -> serde_json::Value {
        let mut inf = self.session();
        inf.observe_value(sample);
        inf.render()
    }

    /// Each item is one sample.
    pub fn infer_for_samples<'a, I>(&self, samples: I) -> serde_json::Value
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut inf = self.session();
        for s in samples {
            inf.observe_value(s);
        }
        inf.render()
    }

    /// A whole input document: N samples if it is an array and
    /// `sample_collection` is on, otherwise one.
    pub fn infer_document(&self, doc: &Value) -> serde_json::Value {
        let mut inf = self.session();
        inf.observe_document(doc);
        inf.render()
    }

    /// Same result as `infer_for_samples`, folded in parallel chunks that are
    /// joined back in input order.
    pub fn infer_for_samples_par(&self, samples: &[Value]) -> serde_json::Value {
        let settings = &self.settings;
        let root = samples
            .par_chunks(PAR_CHUNK)
            .map(|chunk| crate::inference::infer_from_values(chunk, settings))
            .reduce(
                || None,
                |a, b| match (a, b) {
                    (None, x) | (x, None) => x,
                    (Some(x), Some(y)) => Some(Node::join(&x, &y, settings)),
                },
            );
        let inf = Inference { settings, root, samples: samples.len() as u64 };
        inf.render()
    }

    /// Drain `source`; a decode failure aborts the whole run with no schema.
    pub fn infer_from_source<S: ValueSource>(&self, source: S) -> Result<serde_json::Value, InferError> {
        let mut inf = self.session();
        inf.observe_source(source)?;
        Ok(inf.render())
    }

    /// Drain `source` into a flat sample list (collection arrays expanded).
    pub fn collect_samples<S: ValueSource>(&self, mut source: S) -> Result<Vec<Value>, InferError> {
        let mut out = Vec::new();
        while let Some(doc) = source.next_value()? {
            match doc {
                Value::Array(xs) if self.settings.sample_collection => out.extend(xs),
                other => out.push(other),
            }
        }
        Ok(out)
    }
}

/// An in-progress fold. Observe samples in order, then `solve` or `render`.
pub struct Inference<'s> {
    settings: &'s Settings,
    root: Option<Node>,
    samples: u64,
}

impl<'s> Inference<'s> {
    pub fn observe_value(&mut self, v: &Value) {
        debug!(sample = self.samples, "observing sample");
        self.root.get_or_insert_with(Node::empty).observe(v, self.settings);
        self.samples += 1;
    }

    pub fn observe_document(&mut self, doc: &Value) {
        match doc {
            Value::Array(xs) if self.settings.sample_collection => {
                debug!(samples = xs.len(), "expanding sample collection");
                for x in xs {
                    self.observe_value(x);
                }
            }
            other => self.observe_value(other),
        }
    }

    /// Fold everything `source` yields. On error the session is left as it
    /// was mid-stream; callers must discard it (the `Inferrer` helpers do).
    pub fn observe_source<S: ValueSource>(&mut self, mut source: S) -> Result<(), SourceError> {
        while let Some(doc) = source.next_value()? {
            self.observe_document(&doc);
        }
        Ok(())
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn solve(&self) -> Schema {
        lower_to_ir(self.root.as_ref(), self.settings)
    }

    pub fn render(&self) -> serde_json::Value {
        let schema = self.solve();
        info!(
            samples = self.samples,
            nodes = self.root.as_ref().map_or(0, Node::node_count),
            version = %self.settings.spec_version,
            "schema inferred"
        );
        render_document(&schema, self.settings.spec_version)
    }
}
