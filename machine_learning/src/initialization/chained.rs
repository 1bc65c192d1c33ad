use super::ParamGen;

/// A parameter generator that delegates the generation to a chain of generators, moving on
/// to the next one whenever the current is exhausted.
///
/// Layers use it to initialize their weights and their biases from different sources.
pub struct ChainedParamGen {
    param_gens: Vec<Box<dyn ParamGen>>,
    curr: usize,
}

impl ChainedParamGen {
    /// Creates a new `ChainedParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `param_gens` - The generators to sample from, in order.
    pub fn new(param_gens: Vec<Box<dyn ParamGen>>) -> Self {
        Self {
            param_gens,
            curr: 0,
        }
    }
}

impl ParamGen for ChainedParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        let mut sample = Vec::with_capacity(n);

        while sample.len() < n {
            let param_gen = self.param_gens.get_mut(self.curr)?;

            match param_gen.sample(n - sample.len()) {
                Some(values) if !values.is_empty() => sample.extend(values),
                _ => self.curr += 1,
            }

            if self.curr == self.param_gens.len() {
                break;
            }
        }

        (!sample.is_empty()).then_some(sample)
    }
}
