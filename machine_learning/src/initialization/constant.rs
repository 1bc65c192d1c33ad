use super::{ParamGen, param_gen::take_budget};

/// Repeats `value` until `budget` parameters have been handed out.
pub struct ConstParamGen {
    value: f32,
    budget: usize,
}

impl ConstParamGen {
    pub fn new(value: f32, budget: usize) -> Self {
        Self { value, budget }
    }
}

impl ParamGen for ConstParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        take_budget(&mut self.budget, n).map(|n| vec![self.value; n])
    }
}
