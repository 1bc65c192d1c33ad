/// A `ParamGen` generates values for the initial state of a layer's parameters.
pub trait ParamGen {
    /// Should sample at most `n` parameters.
    ///
    /// # Arguments
    /// * `n` - The upper limit of samples to generate.
    ///
    /// # Returns
    /// `None` once the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<f32>>;
}

/// Takes up to `n` values out of a generator's budget.
///
/// # Returns
/// How many values to produce, `None` if the budget is spent.
pub(super) fn take_budget(budget: &mut usize, n: usize) -> Option<usize> {
    let n = n.min(*budget);
    *budget -= n;
    (n > 0).then_some(n)
}
