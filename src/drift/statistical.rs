//! Statistical helper functions for the two-sample Kolmogorov-Smirnov test.

/// Sort a column ascending, discarding NaN.
pub fn sorted_column(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Two-sample KS statistic `D = sup |F_a(x) - F_b(x)|` over two sorted samples.
///
/// Tied values advance both empirical CDFs together, so identical samples give
/// exactly zero.
pub fn ks_statistic(sorted_a: &[f64], sorted_b: &[f64]) -> f64 {
    if sorted_a.is_empty() || sorted_b.is_empty() {
        return 0.0;
    }
    let n1 = sorted_a.len() as f64;
    let n2 = sorted_b.len() as f64;

    let mut i = 0usize;
    let mut j = 0usize;
    let mut d_max = 0.0f64;

    while i < sorted_a.len() && j < sorted_b.len() {
        let x = sorted_a[i].min(sorted_b[j]);
        while i < sorted_a.len() && sorted_a[i] <= x {
            i += 1;
        }
        while j < sorted_b.len() && sorted_b[j] <= x {
            j += 1;
        }
        d_max = d_max.max((i as f64 / n1 - j as f64 / n2).abs());
    }

    d_max
}

/// Kolmogorov distribution survival function `Q(λ) = P(K > λ)`.
///
/// `Q(λ) = 2 Σ_{k≥1} (-1)^{k+1} exp(-2 k² λ²)`. The series is numerically useless
/// near zero, where `Q` is 1 to double precision anyway.
pub fn ks_p_value(lambda: f64) -> f64 {
    if lambda < 0.2 {
        return 1.0;
    }
    let mut p = 0.0;
    for k in 1..=100 {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
        p += term;
        if term.abs() < 1e-10 {
            break;
        }
    }
    (2.0 * p).clamp(0.0, 1.0)
}

/// Asymptotic p-value of statistic `d` for samples of size `n1` and `n2`.
///
/// Uses Stephens' small-sample correction of the effective size.
pub fn two_sample_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 || d <= 0.0 {
        return 1.0;
    }
    let (n1, n2) = (n1 as f64, n2 as f64);
    let n_eff = ((n1 * n2) / (n1 + n2)).sqrt();
    ks_p_value((n_eff + 0.12 + 0.11 / n_eff) * d)
}

/// Largest `n1 * n2` for which [`exact_p_value`] is used.
pub const EXACT_LIMIT: usize = 2_000_000;

/// Exact two-sided p-value `P(D >= d)` under the null, by lattice path counting.
///
/// Every interleaving of the two samples is equally likely under the null. The
/// walk keeps, per grid point, the fraction of paths that reached it without
/// touching the `|i/n1 - j/n2| >= d` band, so no binomial ever overflows.
/// Costs `O(n1 * n2)`.
pub fn exact_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 || d <= 0.0 {
        return 1.0;
    }
    // D * n1 * n2 is an integer up to rounding
    let band = (d * n1 as f64 * n2 as f64).round() as i128;
    let inside = |i: usize, j: usize| (i as i128 * n2 as i128 - j as i128 * n1 as i128).abs() < band;

    let mut row = vec![0.0f64; n2 + 1];
    row[0] = 1.0;
    for j in 1..=n2 {
        row[j] = if inside(0, j) { row[j - 1] } else { 0.0 };
    }
    for i in 1..=n1 {
        row[0] = if inside(i, 0) { row[0] } else { 0.0 };
        for j in 1..=n2 {
            row[j] = if inside(i, j) {
                let total = (i + j) as f64;
                row[j] * (i as f64 / total) + row[j - 1] * (j as f64 / total)
            } else {
                0.0
            };
        }
    }
    (1.0 - row[n2]).clamp(0.0, 1.0)
}

/// Two-sample p-value: exact for small products of sizes, asymptotic otherwise.
pub fn ks_two_sample_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if n1.saturating_mul(n2) <= EXACT_LIMIT {
        exact_p_value(d, n1, n2)
    } else {
        two_sample_p_value(d, n1, n2)
    }
}
