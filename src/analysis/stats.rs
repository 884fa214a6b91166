//! Small numeric helpers for the season comparison.

use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEF: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

const CF_MAX_ITER: usize = 300;
const CF_EPS: f64 = 1e-15;
const CF_FPMIN: f64 = 1e-300;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator). NaN for fewer than two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Natural log of the gamma function, Lanczos approximation.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS_COEF
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEF[0], |acc, (i, c)| acc + c / (x + i as f64));
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_cf(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < CF_FPMIN {
        d = CF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=CF_MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < CF_FPMIN {
            d = CF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < CF_FPMIN {
            c = CF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < CF_FPMIN {
            d = CF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < CF_FPMIN {
            c = CF_FPMIN;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < CF_EPS {
            break;
        }
    }
    h
}

/// Regularized incomplete beta function I_x(a, b).
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_cf(a, b, x) / a
    } else {
        1.0 - front * beta_cf(b, a, 1.0 - x) / b
    }
}

/// Two-sided p-value of Student's t distribution.
pub fn student_t_two_sided_p(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t * t))
}

/// Result of Welch's unequal-variance t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTest {
    pub t_stat: f64,
    pub df: f64,
    pub p_value: f64,
}

/// Welch's t-test of `sample_1` against `sample_2`.
///
/// Degenerate inputs (single values, zero variance) yield NaN statistics
/// rather than an error.
pub fn welch_t_test(sample_1: &[f64], sample_2: &[f64]) -> WelchTest {
    let (n1, n2) = (sample_1.len() as f64, sample_2.len() as f64);
    let se1 = sample_variance(sample_1) / n1;
    let se2 = sample_variance(sample_2) / n2;
    let se = se1 + se2;

    let t_stat = (mean(sample_1) - mean(sample_2)) / se.sqrt();
    let df = se * se / (se1 * se1 / (n1 - 1.0) + se2 * se2 / (n2 - 1.0));

    WelchTest {
        t_stat,
        df,
        p_value: student_t_two_sided_p(t_stat, df),
    }
}

/// Rounds to four decimal places. NaN passes through.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_ln_gamma_known_values() {
        assert!(close(ln_gamma(1.0), 0.0, 1e-12));
        assert!(close(ln_gamma(5.0), 24f64.ln(), 1e-12));
        assert!(close(ln_gamma(0.5), PI.sqrt().ln(), 1e-12));
    }

    #[test]
    fn test_two_sided_p_closed_forms() {
        // df = 1 is the Cauchy distribution.
        assert!(close(student_t_two_sided_p(1.0, 1.0), 0.5, 1e-10));
        // df = 2 has p = 1 - |t| / sqrt(2 + t^2).
        let expected = 1.0 - 2.0 / 6f64.sqrt();
        assert!(close(student_t_two_sided_p(2.0, 2.0), expected, 1e-10));
        assert!(close(student_t_two_sided_p(-2.0, 2.0), expected, 1e-10));
        assert!(close(student_t_two_sided_p(0.0, 7.0), 1.0, 1e-12));
    }

    #[test]
    fn test_two_sided_p_degenerate() {
        assert!(student_t_two_sided_p(f64::NAN, 3.0).is_nan());
        assert!(student_t_two_sided_p(1.0, f64::NAN).is_nan());
        assert_eq!(student_t_two_sided_p(f64::INFINITY, 3.0), 0.0);
    }

    #[test]
    fn test_sample_variance() {
        assert!(close(sample_variance(&[1.0, 2.0, 3.0, 4.0]), 5.0 / 3.0, 1e-12));
        assert!(sample_variance(&[1.0]).is_nan());
    }

    #[test]
    fn test_welch_equal_variance_groups() {
        let result = welch_t_test(&[2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0]);
        assert!(close(result.t_stat, 1.095_445_115_010_332, 1e-9));
        assert!(close(result.df, 6.0, 1e-9));
        assert!(close(result.p_value, 0.315_333_596, 1e-6));
    }

    #[test]
    fn test_welch_unequal_groups() {
        let result = welch_t_test(
            &[20.0, 22.0, 19.0, 21.0, 23.0, 24.0],
            &[10.0, 12.0, 11.0, 13.0, 9.0],
        );
        assert!(close(result.t_stat, 10.088_073_689_720_49, 1e-9));
        assert!(close(result.df, 8.989_361_702_127_66, 1e-9));
        assert!(close(result.p_value, 3.356_218_56e-6, 1e-9));

        let result = welch_t_test(&[5.5, 6.5, 8.0, 7.0], &[5.0, 7.0, 6.0]);
        assert!(close(result.p_value, 0.382_907_545, 1e-6));
    }

    #[test]
    fn test_welch_single_value_is_nan() {
        let result = welch_t_test(&[1.0], &[2.0, 3.0]);
        assert!(result.p_value.is_nan());
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123_456), 0.1235);
        assert!(round4(f64::NAN).is_nan());
    }
}
