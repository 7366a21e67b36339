use super::RandomSource;

/// Random source that replays a fixed list of unit values in a loop.
///
/// Used to pin down variance and critical rolls when checking exact numbers,
/// and by replay tooling that wants to force a particular branch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptedRng {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRng {
    /// Values outside `[0, 1)` are clamped into it.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|value| value.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Source that returns `value` forever.
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_values_in_a_loop() {
        let mut rng = ScriptedRng::new([0.1, 0.7]);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.next_unit(), 0.7);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn constant_half_maps_variance_to_zero() {
        let mut rng = ScriptedRng::constant(0.5);
        // floor(0.5 * 11) - 5 == 0
        assert_eq!(rng.range(-5, 5), 0);
    }
}
