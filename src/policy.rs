//! Strategies that settle what the merged evidence leaves open.
//!
//! Each policy is picked once, from configuration, and handed to the lowering
//! pass by value. None of them look at samples directly; they only read the
//! aggregates the fold left on a node.
use std::str::FromStr;

use crate::classify::TypeSet;
use crate::config::ConfigError;
use crate::inference::{DefaultC, ExamplesC, FieldC, Gcd};
use crate::ir::{Additional, Decimal, Property};

/// Upper bound for `examples` counts; anything larger is a configuration mistake.
pub const MAX_EXAMPLES: i64 = 1000;

// ------------------------------- Required -------------------------------- //

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequiredPolicy {
    #[default]
    None,
    /// Present in every object that reached the parent.
    Common,
    /// Present and non-null in every object that reached the parent.
    NonNullCommon,
}

impl RequiredPolicy {
    pub const VALUES: &'static [&'static str] = &["none", "common", "non-null-common"];

    pub fn is_required(self, field: &FieldC, seen_objects: u64) -> bool {
        match self {
            RequiredPolicy::None => false,
            RequiredPolicy::Common => field.present_in == seen_objects,
            RequiredPolicy::NonNullCommon => field.non_null_in == seen_objects,
        }
    }
}

impl FromStr for RequiredPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(RequiredPolicy::None),
            "common" => Ok(RequiredPolicy::Common),
            "non-null-common" => Ok(RequiredPolicy::NonNullCommon),
            other => Err(ConfigError::unknown("required policy", other, Self::VALUES)),
        }
    }
}

// ------------------------- Additional properties ------------------------- //

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdditionalPropertiesPolicy {
    #[default]
    None,
    Allowed,
    NotAllowed,
    /// Unlisted fields must have one of the types the listed ones have.
    ExistingTypes,
}

impl AdditionalPropertiesPolicy {
    pub const VALUES: &'static [&'static str] = &["none", "allowed", "not-allowed", "existing-types"];

    pub fn resolve(self, properties: &[Property]) -> Option<Additional> {
        match self {
            AdditionalPropertiesPolicy::None => None,
            AdditionalPropertiesPolicy::Allowed => Some(Additional::Allowed(true)),
            AdditionalPropertiesPolicy::NotAllowed => Some(Additional::Allowed(false)),
            AdditionalPropertiesPolicy::ExistingTypes => {
                let types = properties
                    .iter()
                    .fold(TypeSet::default(), |acc, p| acc.union(p.schema.types));
                if types.is_empty() {
                    Some(Additional::Allowed(false))
                } else {
                    Some(Additional::Types(types))
                }
            }
        }
    }
}

impl FromStr for AdditionalPropertiesPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(AdditionalPropertiesPolicy::None),
            "allowed" => Ok(AdditionalPropertiesPolicy::Allowed),
            "not-allowed" => Ok(AdditionalPropertiesPolicy::NotAllowed),
            "existing-types" => Ok(AdditionalPropertiesPolicy::ExistingTypes),
            other => Err(ConfigError::unknown("additional properties policy", other, Self::VALUES)),
        }
    }
}

// -------------------------------- Examples ------------------------------- //

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExamplesPolicy {
    #[default]
    None,
    FirstSamples(usize),
    LastSamples(usize),
}

impl ExamplesPolicy {
    pub const VALUES: &'static [&'static str] = &["none", "first", "first-samples", "last", "last-samples"];
    pub const DEFAULT_COUNT: i64 = 3;

    /// Build from a policy name and a user-supplied count, rejecting counts
    /// outside `1..=MAX_EXAMPLES`.
    pub fn from_parts(name: &str, count: i64) -> Result<Self, ConfigError> {
        let make: fn(usize) -> Self = match name {
            "none" => return Ok(ExamplesPolicy::None),
            "first" | "first-samples" => ExamplesPolicy::FirstSamples,
            "last" | "last-samples" => ExamplesPolicy::LastSamples,
            other => return Err(ConfigError::unknown("examples policy", other, Self::VALUES)),
        };
        if !(1..=MAX_EXAMPLES).contains(&count) {
            return Err(ConfigError::ExamplesCount { got: count, max: MAX_EXAMPLES });
        }
        Ok(make(count as usize))
    }

    pub fn examples(self, c: &ExamplesC) -> Vec<serde_json::Value> {
        match self {
            ExamplesPolicy::None => Vec::new(),
            ExamplesPolicy::FirstSamples(_) | ExamplesPolicy::LastSamples(_) => {
                c.values.iter().map(|v| v.to_json()).collect()
            }
        }
    }
}

// ------------------------------ Default value ---------------------------- //

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefaultValuePolicy {
    #[default]
    None,
    FirstSample,
    LastSample,
}

impl DefaultValuePolicy {
    pub const VALUES: &'static [&'static str] = &["none", "first-sample", "last-sample"];

    pub fn default_of(self, c: &DefaultC) -> Option<serde_json::Value> {
        match self {
            DefaultValuePolicy::None => None,
            DefaultValuePolicy::FirstSample => c.first.as_ref().map(|v| v.to_json()),
            DefaultValuePolicy::LastSample => c.last.as_ref().map(|v| v.to_json()),
        }
    }
}

impl FromStr for DefaultValuePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(DefaultValuePolicy::None),
            "first-sample" => Ok(DefaultValuePolicy::FirstSample),
            "last-sample" => Ok(DefaultValuePolicy::LastSample),
            other => Err(ConfigError::unknown("default value policy", other, Self::VALUES)),
        }
    }
}

// ------------------------------- Multiple-of ----------------------------- //

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MultipleOfPolicy {
    None,
    /// GCD of every magnitude, omitted when it is 0 or 1.
    #[default]
    Gcd,
}

impl MultipleOfPolicy {
    pub const VALUES: &'static [&'static str] = &["none", "gcd"];

    pub fn multiple_of(self, gcd: &Gcd) -> Option<Decimal> {
        match self {
            MultipleOfPolicy::None => None,
            MultipleOfPolicy::Gcd => gcd
                .meaningful()
                .map(|(mantissa, scale)| Decimal { mantissa, scale }),
        }
    }
}

impl FromStr for MultipleOfPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(MultipleOfPolicy::None),
            "gcd" => Ok(MultipleOfPolicy::Gcd),
            other => Err(ConfigError::unknown("multiple-of policy", other, Self::VALUES)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::TypeTag;
    use crate::ir::Schema;

    fn field(present_in: u64, non_null_in: u64) -> FieldC {
        FieldC { present_in, non_null_in, ..FieldC::default() }
    }

    #[test]
    fn required_policies() {
        let always_there = field(3, 3);
        let sometimes_null = field(3, 2);
        let sometimes_missing = field(2, 2);
        for (policy, expect) in [
            (RequiredPolicy::None, [false, false, false]),
            (RequiredPolicy::Common, [true, true, false]),
            (RequiredPolicy::NonNullCommon, [true, false, false]),
        ] {
            let got = [&always_there, &sometimes_null, &sometimes_missing]
                .map(|f| policy.is_required(f, 3));
            assert_eq!(got, expect, "{policy:?}");
        }
    }

    #[test]
    fn existing_types_unions_sibling_types() {
        let prop = |tags: &[TypeTag]| Property {
            name: "x".into(),
            schema: Schema { types: tags.iter().copied().collect(), ..Schema::default() },
        };
        let props = [prop(&[TypeTag::String]), prop(&[TypeTag::Integer, TypeTag::Null])];
        let got = AdditionalPropertiesPolicy::ExistingTypes.resolve(&props);
        let want: TypeSet = [TypeTag::Null, TypeTag::Integer, TypeTag::String].into_iter().collect();
        assert_eq!(got, Some(Additional::Types(want)));
        assert_eq!(
            AdditionalPropertiesPolicy::ExistingTypes.resolve(&[]),
            Some(Additional::Allowed(false))
        );
    }

    #[test]
    fn examples_count_is_range_checked() {
        assert_eq!(ExamplesPolicy::from_parts("first", 3).unwrap(), ExamplesPolicy::FirstSamples(3));
        assert_eq!(ExamplesPolicy::from_parts("last-samples", 1).unwrap(), ExamplesPolicy::LastSamples(1));
        assert!(matches!(
            ExamplesPolicy::from_parts("first", -1),
            Err(ConfigError::ExamplesCount { got: -1, .. })
        ));
        assert!(ExamplesPolicy::from_parts("first", 0).is_err());
        assert!(matches!(ExamplesPolicy::from_parts("random", 3), Err(ConfigError::Unknown { .. })));
        // the count is irrelevant when examples are off
        assert_eq!(ExamplesPolicy::from_parts("none", -5).unwrap(), ExamplesPolicy::None);
    }

    #[test]
    fn policy_names_round_trip() {
        assert_eq!("non-null-common".parse::<RequiredPolicy>().unwrap(), RequiredPolicy::NonNullCommon);
        assert_eq!("existing-types".parse::<AdditionalPropertiesPolicy>().unwrap(), AdditionalPropertiesPolicy::ExistingTypes);
        assert_eq!("last-sample".parse::<DefaultValuePolicy>().unwrap(), DefaultValuePolicy::LastSample);
        assert_eq!("gcd".parse::<MultipleOfPolicy>().unwrap(), MultipleOfPolicy::Gcd);
        assert!("lcm".parse::<MultipleOfPolicy>().is_err());
    }
}
