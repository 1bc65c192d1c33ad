use super::{
    ActFnSpec, DenseSpec, LossFnSpec, OptimizerSpec, ParamGenSpec,
    activations::ActFn,
    layers::Dense,
    loss::{LossFn, Mse},
};
use crate::{
    LayerConfiguration, LayerFactory, MlErr, Result,
    initialization::{
        ChainedParamGen, ConstParamGen, ParamGen, RandParamGen, WeightDist, generate_rng,
    },
    optimization::{GradientDescent, Optimizer},
};

/// Builds `Dense` layers given their configuration.
pub struct LayerBuilder<'a> {
    conf: &'a LayerConfiguration<DenseSpec>,
}

impl<'a> LayerBuilder<'a> {
    /// Creates a new `LayerBuilder`.
    ///
    /// # Arguments
    /// * `conf` - The configuration of the layers to build.
    pub fn new(conf: &'a LayerConfiguration<DenseSpec>) -> Self {
        Self { conf }
    }

    /// Builds a new `Dense` layer with freshly initialized parameters.
    pub fn build(&self) -> Result<Dense> {
        let spec = &self.conf.factory;
        let dim = (self.conf.n_in, self.conf.n_out);

        Dense::new(
            dim,
            self.resolve_params()?,
            self.resolve_act_fn(spec.act_fn),
            self.resolve_loss(spec.loss),
            self.resolve_optimizer(spec.optimizer),
            self.conf.iterations.get(),
        )
    }

    fn resolve_params(&self) -> Result<Vec<f32>> {
        let (n_in, n_out) = (self.conf.n_in, self.conf.n_out);
        let size = self.conf.num_params();

        let weight_gen = self.resolve_param_gen(n_in * n_out)?;
        let bias_gen: Box<dyn ParamGen> = Box::new(ConstParamGen::new(0., n_out));

        let mut param_gen = ChainedParamGen::new(vec![weight_gen, bias_gen]);
        let params = param_gen.sample(size).unwrap_or_default();

        if params.len() != size {
            return Err(MlErr::ParameterSizeMismatch {
                got: params.len(),
                expected: size,
            });
        }

        Ok(params)
    }

    fn resolve_param_gen(&self, budget: usize) -> Result<Box<dyn ParamGen>> {
        let dist = match self.conf.factory.init {
            ParamGenSpec::Const { value } => {
                return Ok(Box::new(ConstParamGen::new(value, budget)));
            }
            ParamGenSpec::Uniform { low, high } => WeightDist::uniform(low, high)?,
            ParamGenSpec::XavierUniform => {
                WeightDist::xavier_uniform(self.conf.n_in, self.conf.n_out)?
            }
            ParamGenSpec::Normal { mean, std_dev } => WeightDist::normal(mean, std_dev)?,
        };

        let rng = generate_rng(self.conf.seed);
        Ok(Box::new(RandParamGen::new(rng, dist, budget)))
    }

    fn resolve_act_fn(&self, spec: Option<ActFnSpec>) -> Option<ActFn> {
        spec.map(|act_fn| match act_fn {
            ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(amp),
            ActFnSpec::Relu => ActFn::relu(),
        })
    }

    fn resolve_optimizer(&self, spec: OptimizerSpec) -> Box<dyn Optimizer> {
        match spec {
            OptimizerSpec::GradientDescent { learning_rate } => {
                Box::new(GradientDescent::new(learning_rate))
            }
        }
    }

    fn resolve_loss(&self, spec: LossFnSpec) -> Box<dyn LossFn> {
        match spec {
            LossFnSpec::Mse => Box::new(Mse::new()),
        }
    }
}

impl LayerFactory for DenseSpec {
    type Layer = Dense;

    fn create(&self, conf: &LayerConfiguration<Self>) -> Result<Dense> {
        LayerBuilder::new(conf).build()
    }

    fn num_params(&self, conf: &LayerConfiguration<Self>) -> usize {
        (conf.n_in + 1) * conf.n_out
    }

    fn validate(&self, _conf: &LayerConfiguration<Self>) -> Result<()> {
        let lr = self.optimizer.learning_rate();
        if !(lr.is_finite() && lr > 0.) {
            return Err(MlErr::InvalidConfiguration(format!(
                "learning_rate must be a positive number, got {lr}"
            )));
        }

        match self.act_fn {
            Some(ActFnSpec::Sigmoid { amp }) if !(amp.is_finite() && amp > 0.) => {
                Err(MlErr::InvalidConfiguration(format!(
                    "sigmoid amp must be a positive number, got {amp}"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::arch::layers::Layer;

    fn conf(init: ParamGenSpec) -> LayerConfiguration<DenseSpec> {
        let spec = DenseSpec::new(init, OptimizerSpec::GradientDescent { learning_rate: 0.1 });
        LayerConfiguration::new(3, 2, 4, NonZeroUsize::MIN, spec).with_seed(42)
    }

    #[test]
    fn weights_first_then_zero_biases() {
        let layer = conf(ParamGenSpec::Const { value: 0.5 }).create_layer().unwrap();

        assert_eq!(layer.num_params(), 8);
        assert_eq!(layer.params(), [0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0., 0.]);
    }

    #[test]
    fn seeded_initialization_is_reproducible() {
        for init in [
            ParamGenSpec::XavierUniform,
            ParamGenSpec::Normal {
                mean: 0.,
                std_dev: 0.1,
            },
        ] {
            let conf = conf(init);

            let a = conf.create_layer().unwrap();
            let b = conf.create_layer().unwrap();

            assert_eq!(a.params(), b.params());
            assert_ne!(&a.params()[..6], [0.; 6]);
            assert_eq!(&a.params()[6..], [0., 0.]);
        }
    }

    #[test]
    fn invalid_distribution_is_a_configuration_error() {
        for init in [
            ParamGenSpec::Uniform { low: 1., high: 0. },
            ParamGenSpec::Normal {
                mean: f32::NAN,
                std_dev: 1.,
            },
        ] {
            let err = conf(init).create_layer().err().unwrap();
            assert!(matches!(err, MlErr::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn validate_rejects_bad_learning_rates() {
        for learning_rate in [0., -1., f32::NAN, f32::INFINITY] {
            let mut conf = conf(ParamGenSpec::XavierUniform);
            conf.factory.optimizer = OptimizerSpec::GradientDescent { learning_rate };

            assert!(conf.validate().is_err(), "learning_rate = {learning_rate}");
        }
    }

    #[test]
    fn validate_rejects_bad_sigmoid_amplitudes() {
        for amp in [0., -2., f32::NAN, f32::INFINITY] {
            let mut conf = conf(ParamGenSpec::XavierUniform);
            conf.factory.act_fn = Some(ActFnSpec::Sigmoid { amp });

            assert!(conf.validate().is_err(), "amp = {amp}");
        }

        let mut conf = conf(ParamGenSpec::XavierUniform);
        conf.factory.act_fn = Some(ActFnSpec::Sigmoid { amp: 2. });
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn spec_json_uses_snake_case() {
        let spec = DenseSpec::new(
            ParamGenSpec::XavierUniform,
            OptimizerSpec::GradientDescent { learning_rate: 0.5 },
        )
        .with_act_fn(ActFnSpec::Sigmoid { amp: 1. });

        let json = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["init"], "xavier_uniform");
        assert_eq!(json["act_fn"]["sigmoid"]["amp"], 1.);
        assert_eq!(json["optimizer"]["gradient_descent"]["learning_rate"], 0.5);
        assert_eq!(json["loss"], "mse");
    }
}
