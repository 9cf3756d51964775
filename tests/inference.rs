use json_schema_infer::policy::{AdditionalPropertiesPolicy, ExamplesPolicy, MultipleOfPolicy, RequiredPolicy};
use json_schema_infer::{FormatInferrer, Inferrer, JsonDocument, Settings, SpecVersion, Value};
use serde_json::json;

fn samples(src: serde_json::Value) -> Vec<Value> {
    src.as_array().unwrap().iter().map(Value::from).collect()
}

fn infer(src: serde_json::Value, settings: Settings) -> serde_json::Value {
    Inferrer::new(settings).infer_for_samples(&samples(src))
}

/// Sorts `enum` and `required` lists so two schemas compare by structure.
fn stable_sort(schema: &mut serde_json::Value) {
    match schema {
        serde_json::Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if key == "enum" || key == "required" {
                    if let serde_json::Value::Array(xs) = value {
                        xs.sort_by_key(|x| x.to_string());
                    }
                }
                stable_sort(value);
            }
        }
        serde_json::Value::Array(xs) => xs.iter_mut().for_each(stable_sort),
        _ => {}
    }
}

/// A boundary instance of `schema`: every bound at its low end (required
/// properties only) or its high end (every property). Single-typed schemas only.
fn instance(schema: &serde_json::Value, high: bool) -> serde_json::Value {
    let bound = |lo: &str, hi: &str| schema[if high { hi } else { lo }].as_u64().unwrap_or(0) as usize;
    match schema["type"].as_str().expect("single type") {
        "null" => serde_json::Value::Null,
        "boolean" => json!(high),
        "integer" | "number" => schema[if high { "maximum" } else { "minimum" }].clone(),
        "string" => json!("a".repeat(bound("minLength", "maxLength"))),
        "array" => {
            let n = bound("minItems", "maxItems");
            json!((0..n).map(|_| instance(&schema["items"], high)).collect::<Vec<_>>())
        }
        "object" => {
            let required = schema["required"].as_array().cloned().unwrap_or_default();
            let mut out = serde_json::Map::new();
            for (name, sub) in schema["properties"].as_object().unwrap() {
                if high || required.contains(&json!(name)) {
                    out.insert(name.clone(), instance(sub, high));
                }
            }
            serde_json::Value::Object(out)
        }
        other => panic!("unexpected type {other}"),
    }
}

#[test]
fn end_to_end_collection_mode() {
    let inferrer = Inferrer::new(Settings {
        sample_collection: true,
        required: RequiredPolicy::Common,
        ..Settings::default()
    });
    let doc = JsonDocument::from_text(r#"[{"a":1},{"a":2,"b":"x"}]"#);
    let schema = inferrer.infer_from_source(doc).unwrap();

    assert_eq!(schema["$schema"], "http://json-schema.org/draft-07/schema#");
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["a"]["type"], "integer");
    assert_eq!(schema["properties"]["b"]["type"], "string");
    let required = schema["required"].as_array().unwrap();
    assert!(!required.contains(&json!("b")));
}

#[test]
fn root_type_is_exactly_the_observed_tags() {
    let schema = infer(json!([1, "a", null, 2.5, true]), Settings::default());
    assert_eq!(schema["type"], json!(["null", "boolean", "integer", "number", "string"]));

    let schema = infer(json!([[1], {"k": 1}]), Settings::default());
    assert_eq!(schema["type"], json!(["array", "object"]));

    let schema = infer(json!([3.0, 4]), Settings::default());
    assert_eq!(schema["type"], "integer");
}

#[test]
fn required_shrinks_when_a_field_goes_missing() {
    for policy in [RequiredPolicy::Common, RequiredPolicy::NonNullCommon] {
        let settings = Settings { required: policy, ..Settings::default() };
        let before = infer(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}]), settings.clone());
        assert_eq!(before["required"], json!(["a", "b"]));

        let after = infer(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}, {"a": 5}]), settings);
        assert_eq!(after["required"], json!(["a"]));
    }
}

#[test]
fn enum_cap_is_forty_distinct_values() {
    let forty: Vec<_> = (0..40).map(|i| json!(format!("v{i}"))).collect();
    let schema = infer(json!(forty), Settings::default());
    assert_eq!(schema["enum"].as_array().unwrap().len(), 40);
    assert_eq!(schema["enum"][0], "v0");

    let forty_one: Vec<_> = (0..41).map(|i| json!(format!("v{i}"))).collect();
    let schema = infer(json!(forty_one), Settings::default());
    assert!(schema.get("enum").is_none());
}

#[test]
fn enum_overflow_is_sticky() {
    // 41 distinct then repeats: still no enum
    let mut values: Vec<_> = (0..41).map(|i| json!(i)).collect();
    values.extend((0..10).map(|_| json!(0)));
    let schema = infer(json!(values), Settings::default());
    assert!(schema.get("enum").is_none());
}

#[test]
fn multiple_of_uses_the_gcd() {
    let schema = infer(json!([4, 8, 12]), Settings::default());
    assert_eq!(schema["multipleOf"], json!(4));

    let schema = infer(json!([3, 5]), Settings::default());
    assert!(schema.get("multipleOf").is_none());

    let schema = infer(json!([0.5, 1.5, 2.0]), Settings::default());
    assert_eq!(schema["multipleOf"], json!(0.5));
}

#[test]
fn formats_need_every_string_to_agree() {
    let settings = Settings { formats: vec![FormatInferrer::Email], ..Settings::default() };
    let mixed = infer(json!(["a@b.com", "not-an-email"]), settings.clone());
    assert!(mixed.get("format").is_none());

    let all = infer(json!(["a@b.com", "c@d.com"]), settings);
    assert_eq!(all["format"], "email");
}

#[test]
fn reinference_from_conforming_samples_is_stable() {
    let base = json!([
        {"id": 1, "name": "ada", "tags": ["x", "y"], "ok": true},
        {"id": 7, "name": "bo", "tags": [], "ok": false, "note": "later"},
        {"id": 3, "name": "cyd", "tags": ["z"], "ok": true}
    ]);
    let mut settings = Settings {
        required: RequiredPolicy::Common,
        multiple_of: MultipleOfPolicy::None,
        ..Settings::default()
    };
    settings.features.enums = false;
    let first = infer(base, settings.clone());

    // samples generated from the schema alone, not from the original data
    let generated = json!([instance(&first, false), instance(&first, true)]);
    let second = infer(generated.clone(), settings.clone());
    assert_eq!(first, second);

    // and the structure does not depend on their order
    let mut reversed = generated.as_array().unwrap().clone();
    reversed.reverse();
    let mut third = infer(json!(reversed), settings);
    let mut first = first;
    stable_sort(&mut first);
    stable_sort(&mut third);
    assert_eq!(first, third);
}

#[test]
fn additional_properties_allowed_and_not_allowed() {
    let samples = json!([{"a": 1}, {"a": 2, "b": {"c": "x"}}]);
    let with = |policy| Settings { additional_properties: policy, ..Settings::default() };

    let allowed = infer(samples.clone(), with(AdditionalPropertiesPolicy::Allowed));
    assert_eq!(allowed["additionalProperties"], json!(true));
    assert_eq!(allowed["properties"]["b"]["additionalProperties"], json!(true));

    let closed = infer(samples.clone(), with(AdditionalPropertiesPolicy::NotAllowed));
    assert_eq!(closed["additionalProperties"], json!(false));
    assert_eq!(closed["properties"]["b"]["additionalProperties"], json!(false));

    let unset = infer(samples, with(AdditionalPropertiesPolicy::None));
    assert!(unset.get("additionalProperties").is_none());
}

#[test]
fn draft_vocabulary_differences() {
    let settings = |spec_version| Settings {
        spec_version,
        examples: ExamplesPolicy::FirstSamples(3),
        ..Settings::default()
    };

    let d7 = infer(json!(["only", "only"]), settings(SpecVersion::Draft07));
    assert_eq!(d7["const"], "only");
    assert_eq!(d7["examples"], json!(["only"]));

    let d4 = infer(json!(["only", "only"]), settings(SpecVersion::Draft04));
    assert_eq!(d4["$schema"], "http://json-schema.org/draft-04/schema#");
    assert_eq!(d4["enum"], json!(["only"]));
    assert!(d4.get("const").is_none());
    assert!(d4.get("examples").is_none());
}

#[test]
fn parallel_and_sequential_agree_on_nested_input() {
    let xs: Vec<Value> = (0..2000)
        .map(|i| {
            Value::from(json!({
                "n": i % 13,
                "when": if i % 2 == 0 { json!("2024-01-02T03:04:05Z") } else { json!(null) },
                "rows": [{"k": format!("k{}", i % 45)}]
            }))
        })
        .collect();
    let inferrer = Inferrer::new(Settings {
        examples: ExamplesPolicy::FirstSamples(2),
        formats: vec![FormatInferrer::DateTime],
        ..Settings::default()
    });
    assert_eq!(inferrer.infer_for_samples_par(&xs), inferrer.infer_for_samples(&xs));
}
