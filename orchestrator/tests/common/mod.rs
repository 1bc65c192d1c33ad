#![allow(dead_code)]

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
};

use machine_learning::{Layer, LayerConfiguration, LayerFactory, MiniBatch, Result};
use ndarray::{Array2, ArrayView2};
use orchestrator::ClusterContext;
use serde::{Deserialize, Serialize};

/// One counter of local fits per test, selected by `IdentityFactory::counter`.
pub static FITS: [AtomicUsize; 8] = [const { AtomicUsize::new(0) }; 8];

pub fn fits(counter: usize) -> usize {
    FITS[counter].load(Ordering::SeqCst)
}

/// Builds layers that keep their parameters untouched on `fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityFactory {
    /// Index into `FITS`.
    pub counter: usize,
    /// Added to the declared amount of parameters.
    pub extra: usize,
    /// Makes every local fit overwrite the first parameter with NaN.
    pub diverge: bool,
}

impl IdentityFactory {
    pub fn new(counter: usize) -> Self {
        Self {
            counter,
            extra: 0,
            diverge: false,
        }
    }
}

pub struct IdentityLayer {
    n_out: usize,
    counter: usize,
    diverge: bool,
    params: Vec<f32>,
}

impl Layer for IdentityLayer {
    fn num_params(&self) -> usize {
        self.params.len()
    }

    fn params(&self) -> &[f32] {
        &self.params
    }

    fn set_params(&mut self, params: Vec<f32>) -> Result<()> {
        self.params = params;
        Ok(())
    }

    fn activate(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        Ok(Array2::zeros((x.nrows(), self.n_out)))
    }

    fn fit(&mut self, _batch: &MiniBatch) -> Result<()> {
        FITS[self.counter].fetch_add(1, Ordering::SeqCst);
        if self.diverge {
            self.params[0] = f32::NAN;
        }
        Ok(())
    }
}

impl LayerFactory for IdentityFactory {
    type Layer = IdentityLayer;

    fn create(&self, conf: &LayerConfiguration<Self>) -> Result<IdentityLayer> {
        let size = conf.n_in * conf.n_out;

        Ok(IdentityLayer {
            n_out: conf.n_out,
            counter: self.counter,
            diverge: self.diverge,
            params: (1..=size).map(|i| i as f32).collect(),
        })
    }

    fn num_params(&self, conf: &LayerConfiguration<Self>) -> usize {
        conf.n_in * conf.n_out + self.extra
    }
}

pub fn ctx(workers: usize) -> ClusterContext {
    ClusterContext::new(NonZeroUsize::new(workers).unwrap()).unwrap()
}
