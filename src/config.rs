//! Configuration: the raw, user-facing option set and the validated settings
//! the engine runs on.
//!
//! `InferConfig` holds names and counts exactly as written (a JSON file, CLI
//! flags, or both). `InferConfig::build` turns it into `Settings`, and that is
//! the only place a bad policy name or count can surface, so nothing is
//! rejected halfway through a fold.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::classify::IntegerCriterion;
use crate::format::FormatInferrer;
use crate::policy::{
    AdditionalPropertiesPolicy, DefaultValuePolicy, ExamplesPolicy, MultipleOfPolicy, RequiredPolicy,
};
use crate::render::SpecVersion;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown {kind} `{name}` (expected one of: {})", .expected.join(", "))]
    Unknown {
        kind: &'static str,
        name: String,
        expected: &'static [&'static str],
    },
    #[error("examples count must be between 1 and {max}, got {got}")]
    ExamplesCount { got: i64, max: i64 },
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl ConfigError {
    pub(crate) fn unknown(kind: &'static str, name: &str, expected: &'static [&'static str]) -> Self {
        ConfigError::Unknown { kind, name: name.to_string(), expected }
    }
}

// ------------------------------ Raw options ------------------------------ //

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct InferConfig {
    pub spec_version: String,
    /// A top-level array is N samples rather than one.
    pub sample_collection: bool,
    pub examples_policy: String,
    pub examples: i64,
    pub required_policy: String,
    pub additional_properties_policy: String,
    pub multiple_of_policy: String,
    pub default_value_policy: String,
    pub format_inferrers: Vec<String>,
    pub integer_criterion: String,
    pub features: FeatureConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FeatureConfig {
    pub string_length: bool,
    pub array_length: bool,
    pub object_size: bool,
    pub enums: bool,
    pub number_range: String,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            spec_version: "draft-07".into(),
            sample_collection: false,
            examples_policy: "none".into(),
            examples: ExamplesPolicy::DEFAULT_COUNT,
            required_policy: "none".into(),
            additional_properties_policy: "none".into(),
            multiple_of_policy: "gcd".into(),
            default_value_policy: "none".into(),
            format_inferrers: Vec::new(),
            integer_criterion: "mathematical-integer".into(),
            features: FeatureConfig::default(),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            string_length: true,
            array_length: true,
            object_size: true,
            enums: true,
            number_range: "inclusive".into(),
        }
    }
}

impl InferConfig {
    /// Read a JSON config file. Errors carry the key path that failed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        from_str_with_path(&src).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Validate every name and count.
    pub fn build(&self) -> Result<Settings, ConfigError> {
        let formats = self
            .format_inferrers
            .iter()
            .map(|s| s.parse::<FormatInferrer>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Settings {
            spec_version: self.spec_version.parse()?,
            sample_collection: self.sample_collection,
            examples: ExamplesPolicy::from_parts(&self.examples_policy, self.examples)?,
            required: self.required_policy.parse()?,
            additional_properties: self.additional_properties_policy.parse()?,
            multiple_of: self.multiple_of_policy.parse()?,
            default_value: self.default_value_policy.parse()?,
            formats: formats.into_iter().collect(),
            integer: self.integer_criterion.parse()?,
            features: Features {
                string_length: self.features.string_length,
                array_length: self.features.array_length,
                object_size: self.features.object_size,
                enums: self.features.enums,
                number_range: self.features.number_range.parse()?,
            },
        })
    }
}

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at {path} → {}", err.into_inner()))
        }
    }
}

// ---------------------------- Validated settings -------------------------- //

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub spec_version: SpecVersion,
    pub sample_collection: bool,
    pub examples: ExamplesPolicy,
    pub required: RequiredPolicy,
    pub additional_properties: AdditionalPropertiesPolicy,
    pub multiple_of: MultipleOfPolicy,
    pub default_value: DefaultValuePolicy,
    /// Enabled format inferrers, deduplicated.
    pub formats: Vec<FormatInferrer>,
    pub integer: IntegerCriterion,
    pub features: Features,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spec_version: SpecVersion::default(),
            sample_collection: false,
            examples: ExamplesPolicy::None,
            required: RequiredPolicy::None,
            additional_properties: AdditionalPropertiesPolicy::None,
            multiple_of: MultipleOfPolicy::Gcd,
            default_value: DefaultValuePolicy::None,
            formats: Vec::new(),
            integer: IntegerCriterion::default(),
            features: Features::default(),
        }
    }
}

/// Optional keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Features {
    pub string_length: bool,
    pub array_length: bool,
    pub object_size: bool,
    pub enums: bool,
    pub number_range: NumberRange,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            string_length: true,
            array_length: true,
            object_size: true,
            enums: true,
            number_range: NumberRange::Inclusive,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberRange {
    None,
    #[default]
    Inclusive,
    /// Integer-only paths get `min - 1` / `max + 1` as exclusive bounds.
    Exclusive,
}

impl NumberRange {
    pub const VALUES: &'static [&'static str] = &["none", "inclusive", "exclusive"];
}

impl FromStr for NumberRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(NumberRange::None),
            "inclusive" => Ok(NumberRange::Inclusive),
            "exclusive" => Ok(NumberRange::Exclusive),
            other => Err(ConfigError::unknown("number range", other, Self::VALUES)),
        }
    }
}
