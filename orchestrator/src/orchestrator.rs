use std::path::Path;

use cluster::{ClusterContext, Partitioned};
use log::{info, warn};
use machine_learning::{Example, Layer, LayerConfiguration, LayerFactory};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use worker::LocalTrainer;

use crate::{
    MiniBatchPartitioner, OrchestratorError, ParameterAverager, Reduction, Result,
    sources::{LabeledPoint, RecordConverter, RecordReader},
};

/// Where a `LayerOrchestrator` is on its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No fit has succeeded yet.
    Configured,
    /// The canonical layer holds the parameters of the last successful fit.
    Fitted,
}

/// Trains a single layer over a cluster by averaging the parameters locally trained on every
/// mini-batch of the dataset.
pub struct LayerOrchestrator<F: LayerFactory> {
    ctx: ClusterContext,
    conf: LayerConfiguration<F>,
    partitioner: MiniBatchPartitioner,
    averager: ParameterAverager,
    layer: Option<F::Layer>,
}

impl<F: LayerFactory> LayerOrchestrator<F> {
    /// Creates a new `LayerOrchestrator` holding its own copy of the configuration.
    ///
    /// # Arguments
    /// * `ctx` - The cluster the training runs on.
    /// * `conf` - The configuration of the layer.
    ///
    /// # Returns
    /// `OrchestratorError::InvalidConfiguration` if the configuration doesn't validate.
    pub fn new(ctx: ClusterContext, conf: &LayerConfiguration<F>) -> Result<Self> {
        let conf = conf.clone();
        conf.validate()?;

        Ok(Self {
            ctx,
            partitioner: MiniBatchPartitioner::new(conf.batch_size)?,
            conf,
            averager: ParameterAverager::default(),
            layer: None,
        })
    }

    /// Sets the strategy used for summing up the trained parameters.
    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.averager = ParameterAverager::new(reduction);
        self
    }

    pub fn configuration(&self) -> &LayerConfiguration<F> {
        &self.conf
    }

    pub fn context(&self) -> &ClusterContext {
        &self.ctx
    }

    pub fn state(&self) -> State {
        match self.layer {
            Some(_) => State::Fitted,
            None => State::Configured,
        }
    }

    /// Returns the trained layer, if any fit has succeeded.
    pub fn layer(&self) -> Option<&F::Layer> {
        self.layer.as_ref()
    }

    pub fn into_layer(self) -> Option<F::Layer> {
        self.layer
    }

    /// Fits the layer on a text file with one record per line, blank lines are skipped.
    ///
    /// # Arguments
    /// * `path` - The path of the file.
    /// * `label_index` - The position of the class label among the fields of a record.
    /// * `reader` - The parser of each record.
    pub fn fit_path<R: RecordReader>(
        &mut self,
        path: impl AsRef<Path>,
        label_index: usize,
        reader: &R,
    ) -> Result<&F::Layer> {
        let lines = self.ctx.text_file(path)?;
        let total = lines.count();

        let records = lines.map_partitions(|lines| {
            lines
                .into_iter()
                .filter(|line| !line.trim().is_empty())
                .collect()
        });

        let skipped = total - records.count();
        if skipped > 0 {
            warn!(skipped = skipped; "skipped blank records");
        }

        let converter = RecordConverter::new(label_index, self.conf.n_out);
        let examples = records.try_map(|record| {
            let fields = reader.read(&record)?;
            converter.convert(&record, fields)
        })?;

        self.fit_dataset(examples)
    }

    /// Fits the layer on labeled points, each label becomes a one-hot vector of width `n_out`.
    pub fn fit_labeled_points(&mut self, points: Partitioned<LabeledPoint>) -> Result<&F::Layer> {
        let num_labels = self.conf.n_out;
        let examples = points.try_map(|point| point.into_example(num_labels))?;
        self.fit_dataset(examples)
    }

    /// Runs one training round: every mini-batch is trained by its own task starting from the
    /// same parameters, and the canonical layer takes the average of the results.
    ///
    /// A failed round leaves the previously trained layer in place.
    ///
    /// # Arguments
    /// * `examples` - The dataset of the round.
    ///
    /// # Returns
    /// The newly trained layer.
    pub fn fit_dataset(&mut self, examples: Partitioned<Example>) -> Result<&F::Layer> {
        let batches = self.partitioner.partition(examples)?;

        let mut layer = self.conf.create_layer()?;
        let expected = self.conf.num_params();
        let got = layer.params().len();

        if got != expected {
            return Err(OrchestratorError::ParameterSizeMismatch { got, expected });
        }

        let count = batches.count();
        if count == 0 {
            return Err(OrchestratorError::EmptyDataset);
        }

        info!(
            mini_batches = count,
            partitions = batches.num_partitions(),
            params = expected;
            "dispatching local training"
        );

        let trainer = LocalTrainer::<F>::new(self.conf.to_json()?, layer.params().to_vec());
        let trained = batches.try_map(|batch| trainer.train(&batch))?;

        info!(reduction:? = self.averager.reduction(); "averaging trained parameters");
        let params = self.averager.average(trained, count)?;
        layer.set_params(params)?;

        info!("installed averaged parameters");
        Ok(&*self.layer.insert(layer))
    }

    /// Computes the output of the trained layer for every row of `x`.
    ///
    /// # Returns
    /// `OrchestratorError::NotFitted` before the first successful fit.
    pub fn predict(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let layer = self.layer.as_ref().ok_or(OrchestratorError::NotFitted)?;
        Ok(layer.activate(x)?)
    }

    /// Same as `predict` for a single input vector.
    pub fn predict_vector(&self, x: ArrayView1<f32>) -> Result<Array1<f32>> {
        let y = self.predict(x.insert_axis(Axis(0)))?;
        Ok(y.index_axis_move(Axis(0), 0))
    }

    /// Builds an orchestrator and fits it on `points` in one go.
    ///
    /// # Returns
    /// The trained layer.
    pub fn train(
        ctx: ClusterContext,
        points: Partitioned<LabeledPoint>,
        conf: &LayerConfiguration<F>,
    ) -> Result<F::Layer> {
        let mut orchestrator = Self::new(ctx, conf)?;
        orchestrator.fit_labeled_points(points)?;
        orchestrator.into_layer().ok_or(OrchestratorError::NotFitted)
    }
}
