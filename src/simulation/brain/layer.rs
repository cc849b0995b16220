//! A single layer of the feed-forward network.

use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;

/// One layer of neurons together with their outgoing connections.
///
/// Neuron `i` of this layer owns row `i` of `weights`, whose column `j` is the
/// weight of the connection to neuron `j` of the next layer. The last layer of
/// a network therefore has a `len × 0` weight matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Scratch activation of every neuron, recomputed on each forward pass.
    pub values: Array1<f32>,
    /// Bias of every neuron, subtracted before activation.
    pub biases: Array1<f32>,
    /// Outgoing weights (`len × next_len`).
    pub weights: Array2<f32>,
}

/// Borrowed view of a single neuron.
#[derive(Debug, Clone, Copy)]
pub struct Neuron<'a> {
    /// Current activation.
    pub value: f32,
    /// Bias subtracted before activation.
    pub bias: f32,
    /// Weights of the connections to the next layer.
    pub weights: ArrayView1<'a, f32>,
}

impl Layer {
    /// Creates a layer whose biases and weights are drawn uniformly from `[-1, 1]`.
    pub fn new_random(len: usize, next_len: usize, rng: &mut impl Rng) -> Self {
        Self {
            values: Array1::zeros(len),
            biases: Array1::from_shape_fn(len, |_| rng.random_range(-1.0..=1.0)),
            weights: Array2::from_shape_fn((len, next_len), |_| rng.random_range(-1.0..=1.0)),
        }
    }

    /// Creates a layer with every bias and weight set to zero.
    pub fn zeroed(len: usize, next_len: usize) -> Self {
        Self {
            values: Array1::zeros(len),
            biases: Array1::zeros(len),
            weights: Array2::zeros((len, next_len)),
        }
    }

    /// Number of neurons.
    pub fn len(&self) -> usize {
        self.biases.len()
    }

    /// Returns `true` if the layer has no neurons.
    pub fn is_empty(&self) -> bool {
        self.biases.is_empty()
    }

    /// Number of outgoing weights per neuron.
    pub fn fan_out(&self) -> usize {
        self.weights.ncols()
    }

    /// Returns a view of neuron `index`, or `None` if out of range.
    pub fn neuron(&self, index: usize) -> Option<Neuron<'_>> {
        (index < self.len()).then(|| Neuron {
            value: self.values[index],
            bias: self.biases[index],
            weights: self.weights.row(index),
        })
    }

    /// Evaluates this layer from the previous layer's activations:
    /// `value[j] = σ(Σ_i prev.weights[i][j] · prev.value[i] − bias[j])`.
    #[inline]
    pub(super) fn activate_from(&mut self, prev: &Layer) {
        let mut sums = prev.weights.t().dot(&prev.values);
        sums -= &self.biases;
        sums.mapv_inplace(sigmoid);
        self.values = sums;
    }

    /// Adds uniform noise in `[-amount, amount]` to every bias and weight.
    pub fn mutate(&mut self, amount: f32, rng: &mut impl Rng) {
        self.biases
            .mapv_inplace(|b| b + rng.random_range(-amount..=amount));
        self.weights
            .mapv_inplace(|w| w + rng.random_range(-amount..=amount));
    }

    /// Number of serialized values: one bias plus the outgoing weights per neuron.
    pub(super) fn token_count(&self) -> usize {
        self.len() * (1 + self.fan_out())
    }
}

/// Logistic activation `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
