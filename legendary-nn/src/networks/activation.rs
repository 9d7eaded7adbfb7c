/// Constant input fed to every neuron's bias weight.
pub const BIAS: f32 = -1.0;

/// Response curvature used by network neurons.
pub const ACTIVATION_RESPONSE: f32 = 1.0;

/// Logistic function with response `p`: `1 / (1 + e^(-a/p))`.
///
/// # Examples
/// ```
/// use legendary_nn::networks::sigmoid;
///
/// assert_eq!(sigmoid(0.0, 1.0), 0.5);
/// assert!(sigmoid(10.0, 1.0) > 0.99);
/// assert!(sigmoid(-10.0, 1.0) < 0.01);
/// ```
pub fn sigmoid(activation: f32, response: f32) -> f32 {
    1.0 / (1.0 + (-activation / response).exp())
}
