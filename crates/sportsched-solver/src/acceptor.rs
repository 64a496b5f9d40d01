//! Simulated annealing acceptor.

use rand::Rng;

/// Metropolis acceptance at a falling temperature.
///
/// A move with cost delta `d` is accepted when `d <= 0`, otherwise with
/// probability `exp(-d / T)`.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use sportsched_solver::acceptor::SimulatedAnnealingAcceptor;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(0);
/// let mut acceptor = SimulatedAnnealingAcceptor::new(600.0);
///
/// assert!(acceptor.is_accepted(-5, &mut rng));
/// acceptor.cool(0.5);
/// assert_eq!(acceptor.temperature(), 300.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    temperature: f64,
}

impl SimulatedAnnealingAcceptor {
    pub fn new(starting_temperature: f64) -> Self {
        Self {
            starting_temperature,
            temperature: starting_temperature,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn starting_temperature(&self) -> f64 {
        self.starting_temperature
    }

    /// Multiplies the temperature by `cooling_rate`.
    pub fn cool(&mut self, cooling_rate: f64) {
        self.temperature *= cooling_rate;
    }

    pub fn reset(&mut self) {
        self.temperature = self.starting_temperature;
    }

    pub fn is_accepted<R: Rng + ?Sized>(&self, delta: i64, rng: &mut R) -> bool {
        if delta <= 0 {
            return true;
        }
        if self.temperature <= 0.0 {
            return false;
        }
        let probability = (-(delta as f64) / self.temperature).exp();
        rng.random::<f64>() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_improving_and_sideways_moves_always_accepted() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let acceptor = SimulatedAnnealingAcceptor::new(0.0);
        assert!(acceptor.is_accepted(0, &mut rng));
        assert!(acceptor.is_accepted(-100, &mut rng));
        assert!(!acceptor.is_accepted(1, &mut rng));
    }

    #[test]
    fn test_acceptance_rate_follows_metropolis() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        // exp(-10 / 10) = 0.368
        let acceptor = SimulatedAnnealingAcceptor::new(10.0);
        let accepted = (0..20_000)
            .filter(|_| acceptor.is_accepted(10, &mut rng))
            .count();
        let rate = accepted as f64 / 20_000.0;
        assert!((rate - 0.368).abs() < 0.02, "{}", rate);
    }

    #[test]
    fn test_cooling_and_reset() {
        let mut acceptor = SimulatedAnnealingAcceptor::new(100.0);
        acceptor.cool(0.9);
        acceptor.cool(0.9);
        assert!((acceptor.temperature() - 81.0).abs() < 1e-9);
        acceptor.reset();
        assert_eq!(acceptor.temperature(), 100.0);
    }
}
