use crate::config::{NumberRange, Settings};
use crate::inference::{Node, Num, NumC};
use crate::ir::{Bound, Property, Schema};

/// Apply the configured policies to a merged tree. `None` (no samples at all)
/// lowers to the unconstrained schema.
pub fn lower_to_ir(root: Option<&Node>, settings: &Settings) -> Schema {
    match root {
        None => Schema::default(),
        Some(node) => lower_node(node, settings),
    }
}

fn lower_node(n: &Node, s: &Settings) -> Schema {
    let features = &s.features;
    let mut out = Schema { types: n.types, ..Schema::default() };

    // 1) Numbers
    if let Some(num) = &n.num {
        let (minimum, maximum) = number_bounds(num, features.number_range);
        out.minimum = minimum;
        out.maximum = maximum;
        out.multiple_of = s.multiple_of.multiple_of(&num.gcd);
    }

    // 2) Strings
    if let Some(str_c) = &n.str_ {
        if features.string_length {
            out.min_length = Some(str_c.len_min);
            out.max_length = Some(str_c.len_max);
        }
        out.format = str_c.format();
    }

    // 3) Arrays
    if let Some(arr) = &n.arr {
        out.items = arr.item.as_deref().map(|item| Box::new(lower_node(item, s)));
        if features.array_length {
            out.min_items = Some(arr.len_min);
            out.max_items = Some(arr.len_max);
        }
    }

    // 4) Objects
    if let Some(obj) = &n.obj {
        for (name, field) in &obj.fields {
            out.properties.push(Property {
                name: name.clone(),
                schema: lower_node(&field.node, s),
            });
            if s.required.is_required(field, obj.seen_objects) {
                out.required.push(name.clone());
            }
        }
        out.additional = s.additional_properties.resolve(&out.properties);
        if features.object_size {
            out.min_properties = Some(obj.size_min);
            out.max_properties = Some(obj.size_max);
        }
    }

    // 5) Annotations
    if features.enums && n.types.all_primitive() {
        if let Some(values) = n.enum_.candidates() {
            out.enum_ = values.iter().map(|lit| lit.to_json()).collect();
        }
    }
    out.default = s.default_value.default_of(&n.defaults);
    out.examples = s.examples.examples(&n.examples);

    out
}

fn number_bounds(num: &NumC, range: NumberRange) -> (Option<Bound>, Option<Bound>) {
    let inclusive = |value: Num| Some(Bound { value, exclusive: false });
    match range {
        NumberRange::None => (None, None),
        NumberRange::Inclusive => (inclusive(num.min), inclusive(num.max)),
        NumberRange::Exclusive => match (num.all_int, num.min, num.max) {
            (true, Num::Int(lo), Num::Int(hi)) => {
                let below = lo.checked_sub(1).map(|v| Bound { value: Num::Int(v), exclusive: true });
                let above = hi.checked_add(1).map(|v| Bound { value: Num::Int(v), exclusive: true });
                (below.or(inclusive(num.min)), above.or(inclusive(num.max)))
            }
            _ => (inclusive(num.min), inclusive(num.max)),
        },
    }
}
