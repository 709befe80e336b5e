use rand::Rng;

/// Upper bound of the uniform perturbation added to every scored move.
pub const TIE_BREAK_NOISE: f32 = 0.5;

/// Perturbs a heuristic score by U[0, amplitude) so equal candidates are chosen at random.
#[inline]
pub fn perturb<R: Rng + ?Sized>(score: f32, amplitude: f32, rng: &mut R) -> f32 {
    if amplitude <= 0.0 { return score; }
    score + rng.gen_range(0.0..amplitude)
}
