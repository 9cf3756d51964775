use std::collections::VecDeque;

use crate::policy::{DefaultValuePolicy, ExamplesPolicy};
use crate::value::Value;

/// Distinct sample values kept for `examples`, windowed per the policy.
#[derive(Clone, Debug, Default)]
pub struct ExamplesC {
    pub values: VecDeque<Value>,
}

impl ExamplesC {
    pub fn observe(&mut self, v: &Value, policy: ExamplesPolicy) {
        match policy {
            ExamplesPolicy::None => {}
            ExamplesPolicy::FirstSamples(n) => {
                if self.values.len() < n && !self.values.contains(v) {
                    self.values.push_back(v.clone());
                }
            }
            ExamplesPolicy::LastSamples(n) => {
                if let Some(at) = self.values.iter().position(|x| x == v) {
                    self.values.remove(at);
                }
                self.values.push_back(v.clone());
                while self.values.len() > n {
                    self.values.pop_front();
                }
            }
        }
    }

    pub(super) fn join(a: &Self, b: &Self, policy: ExamplesPolicy) -> Self {
        let mut out = a.clone();
        for v in &b.values {
            out.observe(v, policy);
        }
        out
    }
}

/// First and last value seen, for `default`.
#[derive(Clone, Debug, Default)]
pub struct DefaultC {
    pub first: Option<Value>,
    pub last: Option<Value>,
}

impl DefaultC {
    pub fn observe(&mut self, v: &Value, policy: DefaultValuePolicy) {
        match policy {
            DefaultValuePolicy::None => {}
            DefaultValuePolicy::FirstSample => {
                if self.first.is_none() {
                    self.first = Some(v.clone());
                }
            }
            DefaultValuePolicy::LastSample => self.last = Some(v.clone()),
        }
    }

    pub(super) fn join(a: &Self, b: &Self) -> Self {
        Self {
            first: a.first.clone().or_else(|| b.first.clone()),
            last: b.last.clone().or_else(|| a.last.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(policy: ExamplesPolicy, xs: &[i128]) -> Vec<Value> {
        let mut c = ExamplesC::default();
        for x in xs {
            c.observe(&Value::Integer(*x), policy);
        }
        c.values.into_iter().collect()
    }

    fn ints(xs: &[i128]) -> Vec<Value> {
        xs.iter().map(|x| Value::Integer(*x)).collect()
    }

    #[test]
    fn first_samples_keep_arrival_order() {
        assert_eq!(run(ExamplesPolicy::FirstSamples(3), &[5, 1, 5, 7, 9]), ints(&[5, 1, 7]));
    }

    #[test]
    fn last_samples_keep_the_most_recent() {
        assert_eq!(run(ExamplesPolicy::LastSamples(2), &[5, 1, 7, 1]), ints(&[7, 1]));
    }

    #[test]
    fn join_agrees_with_one_long_fold() {
        let xs = [4, 4, 2, 9, 2, 6, 1, 9];
        for policy in [ExamplesPolicy::FirstSamples(3), ExamplesPolicy::LastSamples(3)] {
            let mut a = ExamplesC::default();
            let mut b = ExamplesC::default();
            for x in &xs[..3] {
                a.observe(&Value::Integer(*x), policy);
            }
            for x in &xs[3..] {
                b.observe(&Value::Integer(*x), policy);
            }
            let joined: Vec<Value> = ExamplesC::join(&a, &b, policy).values.into_iter().collect();
            assert_eq!(joined, run(policy, &xs), "{policy:?}");
        }
    }

    #[test]
    fn defaults_remember_the_ends() {
        let mut first = DefaultC::default();
        let mut last = DefaultC::default();
        for x in [1, 2, 3] {
            first.observe(&Value::Integer(x), DefaultValuePolicy::FirstSample);
            last.observe(&Value::Integer(x), DefaultValuePolicy::LastSample);
        }
        assert_eq!(first.first, Some(Value::Integer(1)));
        assert_eq!(last.last, Some(Value::Integer(3)));
    }
}
