//! Elo difference and confidence margin from win/draw/loss counts.
//!
//! The margin treats each game as a draw from {1, 0.5, 0} with the sample's
//! empirical variance, takes the normal quantile for the requested confidence
//! and maps both score bounds through the logistic Elo curve.

use std::f64::consts::PI;

/// Score bounds are clamped here so the Elo curve stays finite.
const SCORE_CLAMP: (f64, f64) = (0.0001, 0.9999);

/// Winitzki's closed-form inverse error function. Absolute error stays below
/// about 2e-3 over (-1, 1), which is far inside the noise of match results.
pub fn inverse_erf(x: f64) -> f64 {
    let a = 8.0 * (PI - 3.0) / (3.0 * PI * (4.0 - PI));
    let y = (1.0 - x * x).ln();
    let z = 2.0 / (PI * a) + y / 2.0;

    let result = ((z * z - y / a).sqrt() - z).sqrt();
    if x < 0.0 {
        -result
    } else {
        result
    }
}

/// Standard normal quantile.
pub fn phi_inv(p: f64) -> f64 {
    std::f64::consts::SQRT_2 * inverse_erf(2.0 * p - 1.0)
}

/// `(wins + draws / 2) / total`, or `None` when no games were played.
pub fn score(wins: u32, losses: u32, draws: u32) -> Option<f64> {
    let total = f64::from(wins + losses + draws);
    (total > 0.0).then(|| (f64::from(wins) + 0.5 * f64::from(draws)) / total)
}

#[inline]
pub fn score_to_elo(score: f64) -> f64 {
    -400.0 * (1.0 / score - 1.0).log10()
}

/// Elo difference implied by the score; 0 with no games.
pub fn elo_diff(wins: u32, losses: u32, draws: u32) -> f64 {
    match score(wins, losses, draws) {
        Some(s) => score_to_elo(s.clamp(SCORE_CLAMP.0, SCORE_CLAMP.1)),
        None => 0.0,
    }
}

/// Half-width of the Elo confidence interval at `confidence` (e.g. 0.95).
pub fn elo_margin(wins: u32, losses: u32, draws: u32, confidence: f64) -> f64 {
    let Some(score) = score(wins, losses, draws) else {
        return 0.0;
    };
    let total = f64::from(wins + losses + draws);

    let win_p = f64::from(wins) / total;
    let draw_p = f64::from(draws) / total;
    let loss_p = (1.0 - win_p - draw_p).max(0.0);

    let variance = win_p * (1.0 - score).powi(2)
        + draw_p * (0.5 - score).powi(2)
        + loss_p * score.powi(2);
    let stddev = variance.sqrt() / total.sqrt();

    let z = phi_inv(1.0 - (1.0 - confidence) / 2.0);
    let lower = (score - z * stddev).clamp(SCORE_CLAMP.0, SCORE_CLAMP.1);
    let upper = (score + z * stddev).clamp(SCORE_CLAMP.0, SCORE_CLAMP.1);

    (score_to_elo(upper) - score_to_elo(lower)) / 2.0
}
