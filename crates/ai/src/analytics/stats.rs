//! Small deterministic statistics helpers.

pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Population standard deviation (n), matching the baseline definition used for z-scores.
pub(crate) fn stddev_population(xs: &[f64], mean: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let var = xs
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / (xs.len() as f64);
    var.sqrt()
}

/// Least-squares fit of `ys` against their index `0..n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearFit {
    pub slope: f64,
    /// Pearson correlation coefficient; 0 when `ys` has no variance.
    pub r: f64,
}

pub(crate) fn linear_regression(ys: &[f64]) -> LinearFit {
    let n = ys.len();
    if n < 2 {
        return LinearFit { slope: 0.0, r: 0.0 };
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(ys);

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - x_mean;
        let dy = y - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let r = if sxx > 0.0 && syy > f64::EPSILON {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    LinearFit { slope, r }
}
