//! Animatable value types
//!
//! Provides the [`Interpolate`] trait and [`ValueSet`], the keyed set of
//! scalars an animation run interpolates between.

use indexmap::IndexMap;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Interpolate between self and other by factor t
    ///
    /// `t` is usually in 0.0 to 1.0 but may overshoot either end.
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// ValueSet
// ============================================================================

/// A named set of scalar values
///
/// Keys keep their insertion order, so progress callbacks observe the same
/// ordering as the `from` set they were declared in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueSet {
    values: IndexMap<String, f32>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: f32) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: f32) -> Option<f32> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// First key of `self` that `other` lacks
    pub(crate) fn first_key_missing_from(&self, other: &ValueSet) -> Option<&str> {
        self.keys().find(|k| !other.contains_key(k))
    }
}

impl Interpolate for ValueSet {
    /// Interpolates every key of `self`
    ///
    /// Callers must check that both sets hold the same keys first, as
    /// [`Tween::new`](crate::Tween::new) does. A key absent from `other`
    /// holds its value.
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let values = self
            .values
            .iter()
            .map(|(key, from)| {
                let to = other.values.get(key).copied().unwrap_or(*from);
                (key.clone(), from.lerp(&to, t))
            })
            .collect();
        Self { values }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.len() == other.len()
            && self.values.iter().all(|(key, a)| {
                other
                    .values
                    .get(key)
                    .is_some_and(|b| a.approx_eq(b, epsilon))
            })
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for ValueSet {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f32); N]> for ValueSet {
    fn from(entries: [(K, f32); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_interpolation() {
        assert!((0.0_f32.lerp(&1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(&20.0, 0.25) - 12.5).abs() < 1e-6);
        // Overshooting factors extrapolate
        assert!((0.0_f32.lerp(&10.0, 1.1) - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_value_set_linear_lerp() {
        let from = ValueSet::from([("a", 0.0), ("b", 100.0)]);
        let to = ValueSet::from([("a", 40.0), ("b", -100.0)]);

        for (t, a, b) in [
            (0.0, 0.0, 100.0),
            (0.25, 10.0, 50.0),
            (0.5, 20.0, 0.0),
            (1.0, 40.0, -100.0),
        ] {
            let v = from.lerp(&to, t);
            assert_eq!(v.get("a"), Some(a), "a at {t}");
            assert_eq!(v.get("b"), Some(b), "b at {t}");
        }
    }

    #[test]
    fn test_value_set_keeps_order() {
        let set = ValueSet::new().with("z", 1.0).with("a", 2.0).with("m", 3.0);
        let keys: Vec<_> = set.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_value_set_missing_key_holds() {
        let from = ValueSet::from([("a", 5.0), ("b", 1.0)]);
        let to = ValueSet::from([("a", 10.0)]);
        let v = from.lerp(&to, 0.5);
        assert_eq!(v.get("b"), Some(1.0));
        assert_eq!(from.first_key_missing_from(&to), Some("b"));
        assert_eq!(to.first_key_missing_from(&from), None);
    }

    #[test]
    fn test_value_set_approx_eq() {
        let a = ValueSet::from([("x", 1.0)]);
        let b = ValueSet::from([("x", 1.000_01)]);
        let c = ValueSet::from([("y", 1.0)]);
        assert!(a.approx_eq(&b, 1e-3));
        assert!(!a.approx_eq(&c, 1e-3));
        assert!(!a.approx_eq(&ValueSet::new(), 1e-3));
    }
}
