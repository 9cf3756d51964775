//! Minimal CLI: JSON / NDJSON / BSON samples → JSON Schema
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser};

use crate::classify::IntegerCriterion;
use crate::config::{InferConfig, NumberRange};
use crate::driver::Inferrer;
use crate::format::FormatInferrer;
use crate::policy::{
    AdditionalPropertiesPolicy, DefaultValuePolicy, ExamplesPolicy, MultipleOfPolicy, RequiredPolicy,
};
use crate::render::SpecVersion;
use crate::source::{BsonStream, ExtJsonMode, JsonDocument, NdjsonStream, ValueSource};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer a JSON Schema from example JSON documents
#[derive(Parser, Debug)]
#[command(name = "json-schema-infer", version)]
pub struct CommandLineInterface {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    policy_settings: PolicySettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// fold samples on all cores (same output, holds every sample in memory)
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON), one sample per document
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// treat input as a stream of BSON documents (e.g. a mongodump file)
    #[arg(short = 'b', long, default_value_t = false, conflicts_with = "ndjson")]
    bson: bool,

    /// how BSON-only types (ObjectId, DateTime, ...) are spelled as JSON
    #[arg(long, value_parser = choices(ExtJsonMode::VALUES), default_value = "relaxed")]
    ext_json_mode: String,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items)
    #[arg(long)]
    json_pointer: Option<String>,

    /// when a document is an array, treat its elements as separate samples
    #[arg(short = 'c', long = "is-sample-collection", default_value_t = false)]
    sample_collection: bool,

    /// One or more inputs. May be literal paths, quoted glob patterns or '-'
    /// for stdin (the default when no input is given)
    #[arg(long, short, num_args = 1..)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct PolicySettings {
    /// JSON file with inference options (kebab-case keys); flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON Schema draft to emit
    #[arg(long, value_parser = choices(SpecVersion::VALUES))]
    spec_version: Option<String>,

    /// how many examples to keep per node
    #[arg(long, allow_negative_numbers = true)]
    examples: Option<i64>,

    /// which samples become `examples`
    #[arg(long, value_parser = choices(ExamplesPolicy::VALUES))]
    examples_policy: Option<String>,

    /// which properties are listed in `required`
    #[arg(long = "required-props-policy", value_parser = choices(RequiredPolicy::VALUES))]
    required_policy: Option<String>,

    /// what `additionalProperties` says about unlisted fields
    #[arg(long = "additional-props-policy", value_parser = choices(AdditionalPropertiesPolicy::VALUES))]
    additional_properties_policy: Option<String>,

    /// how `multipleOf` is derived
    #[arg(
        long,
        alias = "integer-multiple-of-policy",
        value_parser = choices(MultipleOfPolicy::VALUES)
    )]
    multiple_of_policy: Option<String>,

    /// which sample becomes `default`
    #[arg(long, value_parser = choices(DefaultValuePolicy::VALUES))]
    default_value_policy: Option<String>,

    /// string format to recognize (repeatable)
    #[arg(short = 'f', long = "format-inferrer", value_parser = choices(FormatInferrer::VALUES))]
    format_inferrers: Vec<String>,

    /// whether `3.0` counts as an integer
    #[arg(long, value_parser = choices(IntegerCriterion::VALUES))]
    integer_criterion: Option<String>,

    /// how `minimum` / `maximum` are emitted
    #[arg(long, value_parser = choices(NumberRange::VALUES))]
    number_range: Option<String>,

    /// omit minLength / maxLength
    #[arg(long)]
    no_string_length: bool,

    /// omit minItems / maxItems
    #[arg(long)]
    no_array_length: bool,

    /// omit minProperties / maxProperties
    #[arg(long)]
    no_object_size: bool,

    /// never emit enum / const
    #[arg(long)]
    no_enum: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl PolicySettings {
    fn to_config(&self) -> Result<InferConfig> {
        let mut cfg = match &self.config {
            Some(path) => InferConfig::from_file(path)?,
            None => InferConfig::default(),
        };
        let overrides = [
            (&self.spec_version, &mut cfg.spec_version),
            (&self.examples_policy, &mut cfg.examples_policy),
            (&self.required_policy, &mut cfg.required_policy),
            (&self.additional_properties_policy, &mut cfg.additional_properties_policy),
            (&self.multiple_of_policy, &mut cfg.multiple_of_policy),
            (&self.default_value_policy, &mut cfg.default_value_policy),
            (&self.integer_criterion, &mut cfg.integer_criterion),
            (&self.number_range, &mut cfg.features.number_range),
        ];
        for (flag, slot) in overrides {
            if let Some(value) = flag {
                *slot = value.clone();
            }
        }
        if let Some(n) = self.examples {
            cfg.examples = n;
            // `--examples N` alone means "keep the first N"
            if self.examples_policy.is_none() && cfg.examples_policy == "none" {
                cfg.examples_policy = "first".into();
            }
        }
        cfg.format_inferrers.extend(self.format_inferrers.iter().cloned());
        cfg.features.string_length &= !self.no_string_length;
        cfg.features.array_length &= !self.no_array_length;
        cfg.features.object_size &= !self.no_object_size;
        cfg.features.enums &= !self.no_enum;
        Ok(cfg)
    }
}

impl InputSettings {
    /// Hand every input, in order, to `apply` as a value source.
    fn load_process(&self, mut apply: impl FnMut(&mut dyn ValueSource) -> Result<()>) -> Result<()> {
        let mode: ExtJsonMode = self.ext_json_mode.parse()?;
        let inputs = if self.input.is_empty() {
            vec![PathBuf::from("-")]
        } else {
            expand_inputs(&self.input)?
        };
        for source_path in inputs {
            let source_path_str = source_path.to_string_lossy().to_string();
            let reader: Box<dyn std::io::Read> = if source_path_str == "-" {
                Box::new(std::io::stdin().lock())
            } else {
                let file = std::fs::File::open(&source_path)
                    .with_context(|| format!("failed to open input file {source_path_str}"))?;
                Box::new(std::io::BufReader::new(file))
            };
            let pointer = self.json_pointer.clone();
            let result = if self.bson {
                apply(&mut BsonStream::new(reader).with_mode(mode).with_pointer(pointer))
            } else if self.ndjson {
                apply(&mut NdjsonStream::new(reader).with_pointer(pointer))
            } else {
                apply(&mut JsonDocument::new(reader).with_pointer(pointer))
            };
            result.with_context(|| format!("failed to infer from {source_path_str}"))?;
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        // 1) settings, validated before any input is opened
        let mut config = self.policy_settings.to_config()?;
        config.sample_collection |= self.input_settings.sample_collection;
        let inferrer = Inferrer::from_config(&config)?;

        // 2) fold samples & render
        let schema = if self.parallel {
            let mut samples = Vec::new();
            self.input_settings.load_process(|source| {
                samples.extend(inferrer.collect_samples(source)?);
                Ok(())
            })?;
            inferrer.infer_for_samples_par(&samples)
        } else {
            let mut inf = inferrer.session();
            self.input_settings.load_process(|source| {
                inf.observe_source(source)?;
                Ok(())
            })?;
            inf.render()
        };

        // 3) write
        let schema_src = serde_json::to_string_pretty(&schema)?;
        match self.out.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(out, format!("{schema_src}\n"))
                    .with_context(|| format!("failed to write {}", out.display()))?;
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{schema_src}")?;
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Closed value list for a name-valued flag, shown by `--help`.
fn choices(values: &'static [&'static str]) -> PossibleValuesParser {
    PossibleValuesParser::new(values.iter().copied())
}

/// Expand `-i` arguments in order. Globs must match something; literal paths
/// and `-` pass through untouched. A path named twice is read once.
fn expand_inputs(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(args.len());
    let mut push = |path: PathBuf| {
        if !out.contains(&path) {
            out.push(path);
        }
    };
    for arg in args {
        let is_glob = arg != "-" && arg.contains(['*', '?', '[']);
        if !is_glob {
            push(PathBuf::from(arg));
            continue;
        }
        let matched = glob::glob(arg)
            .with_context(|| format!("invalid glob pattern: {arg}"))?
            .collect::<Result<Vec<_>, _>>()?;
        if matched.is_empty() {
            anyhow::bail!("glob pattern matched no files: {arg}");
        }
        matched.into_iter().for_each(&mut push);
    }
    Ok(out)
}
