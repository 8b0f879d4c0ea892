//! Feed-forward decision network
//!
//! Fixed topology: `INPUTS -> [hidden] -> 1`, tanh everywhere, one bias per
//! neuron. A genome is just the flat weight vector for this shape.

use serde::{Deserialize, Serialize};

/// Observation fed to the network: bird height and distances to the gap edges
pub const INPUTS: usize = 3;

/// Network layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkShape {
    /// Hidden layer size (0 = no hidden layer)
    pub hidden: usize,
}

impl NetworkShape {
    pub fn new(hidden: usize) -> Self {
        Self { hidden }
    }

    /// Weights (including biases) a genome must carry
    pub fn weight_count(&self) -> usize {
        if self.hidden == 0 {
            INPUTS + 1
        } else {
            self.hidden * (INPUTS + 1) + self.hidden + 1
        }
    }
}

/// Evaluator built from a genome's weights
#[derive(Debug, Clone)]
pub struct Network {
    shape: NetworkShape,
    weights: Vec<f32>,
}

impl Network {
    /// Build from a weight vector; missing weights read as zero, extras are ignored
    pub fn new(shape: NetworkShape, weights: &[f32]) -> Self {
        let mut weights = weights.to_vec();
        weights.resize(shape.weight_count(), 0.0);
        Self { shape, weights }
    }

    pub fn shape(&self) -> NetworkShape {
        self.shape
    }

    /// Run one forward pass
    pub fn activate(&self, inputs: &[f32; INPUTS]) -> f32 {
        if self.shape.hidden == 0 {
            return neuron(&self.weights, inputs);
        }

        let stride = INPUTS + 1;
        let (hidden_w, output_w) = self.weights.split_at(self.shape.hidden * stride);
        let hidden: Vec<f32> = hidden_w
            .chunks_exact(stride)
            .map(|w| neuron(w, inputs))
            .collect();
        neuron(output_w, &hidden)
    }
}

/// `tanh(w . x + bias)`; the bias is the last weight
fn neuron(weights: &[f32], inputs: &[f32]) -> f32 {
    let (bias, w) = match weights.split_last() {
        Some((bias, w)) => (*bias, w),
        None => return 0.0,
    };
    let sum: f32 = w.iter().zip(inputs).map(|(w, x)| w * x).sum();
    (sum + bias).tanh()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_counts() {
        assert_eq!(NetworkShape::new(0).weight_count(), 4);
        assert_eq!(NetworkShape::new(4).weight_count(), 4 * 4 + 5);
    }

    #[test]
    fn test_direct_network() {
        // Only the height input matters: flap when y > 400
        let net = Network::new(NetworkShape::new(0), &[1.0, 0.0, 0.0, -400.0]);
        assert!(net.activate(&[410.0, 0.0, 0.0]) > 0.5);
        assert!(net.activate(&[390.0, 0.0, 0.0]) < 0.5);
    }

    #[test]
    fn test_bias_only_network_is_constant() {
        let net = Network::new(NetworkShape::new(0), &[0.0, 0.0, 0.0, 2.0]);
        let expected = 2.0f32.tanh();
        assert!((net.activate(&[0.0, 5.0, 9.0]) - expected).abs() < 1e-6);
        assert!((net.activate(&[700.0, 1.0, 1.0]) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_hidden_layer() {
        // Two hidden neurons copying the first input, output sums them
        let weights = [
            1.0, 0.0, 0.0, 0.0, // h0
            1.0, 0.0, 0.0, 0.0, // h1
            1.0, 1.0, 0.0, // out
        ];
        let net = Network::new(NetworkShape::new(2), &weights);
        let h = 0.5f32.tanh();
        let expected = (2.0 * h).tanh();
        assert!((net.activate(&[0.5, 3.0, 3.0]) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_short_weights_are_padded() {
        let net = Network::new(NetworkShape::new(0), &[]);
        assert_eq!(net.activate(&[1.0, 2.0, 3.0]), 0.0);
    }
}
