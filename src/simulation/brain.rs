//! Feed-forward neural network controlling an agent.
//!
//! The network is an ordered list of [`Layer`]s whose widths are fixed by a
//! topology (input first). Each neuron stores the weights of its *outgoing*
//! connections and its bias is *subtracted* before the logistic activation.
//! A layer's predecessor is simply the layer at the previous index.
//!
//! Networks round-trip through a flat comma-separated text format: layer-major,
//! then neuron-major, each neuron written as `bias, weight_0, …, weight_{k-1}`.
//! The input layer's bias is a placeholder that is written and read back for
//! symmetry but never used.

use std::fmt::Write as _;
use std::path::Path;

use ndarray::Array1;
use rand::Rng;

use super::error::NetworkError;

pub mod layer;

pub use layer::{Layer, Neuron, sigmoid};

/// Layered feed-forward network with outgoing weights and subtracted biases.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Creates a network with every bias and weight drawn uniformly from `[-1, 1]`.
    pub fn new_random(topology: &[usize], rng: &mut impl Rng) -> Result<Self, NetworkError> {
        check_topology(topology)?;
        let layers = fan_outs(topology)
            .map(|(len, next_len)| Layer::new_random(len, next_len, rng))
            .collect();
        Ok(Self { layers })
    }

    /// Creates a network with every bias and weight set to zero.
    pub fn zeroed(topology: &[usize]) -> Result<Self, NetworkError> {
        check_topology(topology)?;
        let layers = fan_outs(topology)
            .map(|(len, next_len)| Layer::zeroed(len, next_len))
            .collect();
        Ok(Self { layers })
    }

    /// Widths of all layers, input first.
    pub fn topology(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::len).collect()
    }

    /// All layers, input first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access to the layers for hand-built networks.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// The layer feeding layer `index`, if any.
    pub fn previous_layer(&self, index: usize) -> Option<&Layer> {
        index.checked_sub(1).and_then(|i| self.layers.get(i))
    }

    /// Width of the input layer.
    pub fn input_size(&self) -> usize {
        self.layers[0].len()
    }

    /// Width of the output layer.
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].len()
    }

    /// Runs a forward pass and returns the output layer's activations.
    ///
    /// The input layer takes `inputs` verbatim; every later layer is cleared
    /// and then recomputed in order from its predecessor.
    pub fn forward(&mut self, inputs: &[f32]) -> Result<Array1<f32>, NetworkError> {
        let expected = self.input_size();
        if inputs.len() != expected {
            return Err(NetworkError::InputLength {
                expected,
                found: inputs.len(),
            });
        }

        self.layers[0].values = Array1::from(inputs.to_vec());
        for layer in &mut self.layers[1..] {
            layer.values.fill(0.0);
        }

        for i in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            rest[0].activate_from(&done[i - 1]);
        }

        Ok(self.layers[self.layers.len() - 1].values.clone())
    }

    /// Adds uniform noise in `[-amount, amount]` to every bias and weight.
    pub fn mutate(&mut self, amount: f32, rng: &mut impl Rng) {
        let amount = amount.abs();
        if amount == 0.0 {
            return;
        }
        for layer in &mut self.layers {
            layer.mutate(amount, rng);
        }
    }

    /// Number of values the text format holds for `topology`.
    pub fn token_count(topology: &[usize]) -> usize {
        fan_outs(topology)
            .map(|(len, next_len)| len * (1 + next_len))
            .sum()
    }

    /// Encodes every layer as a flat comma-separated list of decimals.
    pub fn serialize(&self) -> String {
        let capacity: usize = self.layers.iter().map(Layer::token_count).sum();
        let mut out = String::with_capacity(capacity * 12);
        let mut push = |value: f32| {
            if !out.is_empty() {
                out.push(',');
            }
            // writing into a String cannot fail
            let _ = write!(out, "{value}");
        };
        for layer in &self.layers {
            for i in 0..layer.len() {
                push(layer.biases[i]);
                for j in 0..layer.fan_out() {
                    push(layer.weights[[i, j]]);
                }
            }
        }
        out
    }

    /// Decodes a network written by [`serialize`](Self::serialize).
    ///
    /// The stream must contain exactly [`token_count`](Self::token_count)
    /// finite values for `topology`.
    pub fn deserialize(text: &str, topology: &[usize]) -> Result<Self, NetworkError> {
        let mut network = Self::zeroed(topology)?;

        let tokens: Vec<&str> = text.trim().split(',').map(str::trim).collect();
        let expected = Self::token_count(topology);
        if tokens.len() != expected {
            return Err(NetworkError::TokenCount {
                expected,
                found: tokens.len(),
            });
        }

        let mut values = tokens.iter().enumerate().map(|(index, token)| {
            token
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| NetworkError::InvalidToken {
                    index,
                    token: (*token).to_string(),
                })
        });

        for layer in &mut network.layers {
            for i in 0..layer.len() {
                // token count was checked above, so the iterator cannot run dry
                if let Some(bias) = values.next() {
                    layer.biases[i] = bias?;
                }
                for j in 0..layer.fan_out() {
                    if let Some(weight) = values.next() {
                        layer.weights[[i, j]] = weight?;
                    }
                }
            }
        }

        Ok(network)
    }

    /// Writes the serialized network to `path`, replacing any previous content.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), NetworkError> {
        std::fs::write(path, self.serialize())?;
        Ok(())
    }

    /// Reads a serialized network from `path`.
    pub fn load_from_file(path: impl AsRef<Path>, topology: &[usize]) -> Result<Self, NetworkError> {
        let text = std::fs::read_to_string(path)?;
        Self::deserialize(&text, topology)
    }
}

fn check_topology(topology: &[usize]) -> Result<(), NetworkError> {
    if topology.len() < 2 {
        return Err(NetworkError::EmptyTopology);
    }
    match topology.iter().position(|&w| w == 0) {
        Some(i) => Err(NetworkError::ZeroWidthLayer(i)),
        None => Ok(()),
    }
}

/// Pairs every layer width with the width of the layer after it (0 for the last).
fn fan_outs(topology: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    topology
        .iter()
        .enumerate()
        .map(|(i, &len)| (len, topology.get(i + 1).copied().unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn token_count_includes_input_biases() {
        // 3*(1+2) + 2*(1+1) + 1*(1+0)
        assert_eq!(Network::token_count(&[3, 2, 1]), 14);
    }

    #[test]
    fn serialize_has_no_trailing_comma() {
        let mut rng = StdRng::seed_from_u64(1);
        let network = Network::new_random(&[2, 2], &mut rng).unwrap();
        let text = network.serialize();
        assert!(!text.ends_with(','));
        assert_eq!(text.split(',').count(), Network::token_count(&[2, 2]));
    }

    #[test]
    fn forward_clears_hidden_layers() {
        let mut network = Network::zeroed(&[2, 3, 1]).unwrap();
        network.layers_mut()[1].values.fill(42.0);
        network.forward(&[0.0, 0.0]).unwrap();
        assert!(network.layers()[1].values.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn previous_layer_is_index_based() {
        let network = Network::zeroed(&[4, 3, 2]).unwrap();
        assert!(network.previous_layer(0).is_none());
        assert_eq!(network.previous_layer(2).map(Layer::len), Some(3));
    }

    #[test]
    fn rejects_degenerate_topologies() {
        assert!(matches!(
            Network::zeroed(&[3]),
            Err(NetworkError::EmptyTopology)
        ));
        assert!(matches!(
            Network::zeroed(&[3, 0, 1]),
            Err(NetworkError::ZeroWidthLayer(1))
        ));
    }
}
