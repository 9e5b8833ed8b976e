//! Gaunt coefficients for products of associated Legendre functions:
//!
//! `P_n^m(x) P_nu^mu(x) = sum_{q=0}^{qmax} a_q P_{n+nu-2q}^{m+mu}(x)`.
//!
//! The seed `a_0` is evaluated in log space and the normalized sequence
//! `a_q / a_0` by forward recurrence in `q`, following Y.-L. Xu,
//! J. Comput. Appl. Math. 85, 53 (1997), eqs. (20) and (26)-(35).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GauntInput {
    pub n: i32,
    pub nu: i32,
    pub m: i32,
    pub mu: i32,
}

impl GauntInput {
    pub fn new(n: i32, nu: i32, m: i32, mu: i32) -> Self {
        Self { n, nu, m, mu }
    }

    /// The `mu = m` case used by the three-index surface.
    pub fn diagonal(n: i32, nu: i32, m: i32) -> Self {
        Self::new(n, nu, m, m)
    }

    pub fn is_valid(&self) -> bool {
        self.n >= 0
            && self.nu >= 0
            && self.m.unsigned_abs() <= self.n.unsigned_abs()
            && self.mu.unsigned_abs() <= self.nu.unsigned_abs()
    }

    /// Largest `q` with a coefficient, `None` when the indices do not couple.
    ///
    /// The degrees `p = n + nu - 2q` run down in steps of two and must stay
    /// at or above both `|n - nu|` and `|m + mu|`.
    pub fn qmax(&self) -> Option<usize> {
        if !self.is_valid() {
            return None;
        }

        let n = i64::from(self.n);
        let nu = i64::from(self.nu);
        let total_order = (i64::from(self.m) + i64::from(self.mu)).abs();
        let qmax = n.min(nu).min((n + nu - total_order) / 2);
        usize::try_from(qmax).ok()
    }

    fn invalid(&self) -> GauntError {
        GauntError::InvalidIndices {
            n: self.n,
            nu: self.nu,
            m: self.m,
            mu: self.mu,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GauntError {
    #[error(
        "Gaunt indices do not couple: n={n}, nu={nu}, m={m}, mu={mu} (need n, nu >= 0, |m| <= n, |mu| <= nu)"
    )]
    InvalidIndices { n: i32, nu: i32, m: i32, mu: i32 },
    #[error("Gaunt coefficient buffer holds {actual} entries but qmax={qmax} needs {required}")]
    BufferTooShort {
        qmax: usize,
        required: usize,
        actual: usize,
    },
}

/// Owned expansion for one index set: `a_q = a0 * normalized[q]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GauntExpansion {
    pub input: GauntInput,
    pub qmax: usize,
    pub log_a0: f64,
    pub a0: f64,
    pub normalized: Vec<f64>,
}

impl GauntExpansion {
    pub fn coefficient(&self, q: usize) -> Option<f64> {
        self.normalized.get(q).map(|value| self.a0 * value)
    }

    pub fn coefficients(&self) -> Vec<f64> {
        self.normalized.iter().map(|value| self.a0 * value).collect()
    }

    /// Legendre degree `n + nu - 2q` multiplying the `q`-th coefficient.
    pub fn degree(&self, q: usize) -> Option<i64> {
        (q <= self.qmax).then(|| {
            i64::from(self.input.n) + i64::from(self.input.nu) - 2 * q as i64
        })
    }
}

pub trait GauntCoefficientsApi {
    fn qmax(&self, input: GauntInput) -> Option<usize>;
    fn log_seed(&self, input: GauntInput) -> Result<f64, GauntError>;
    fn fill_coefficients(
        &self,
        input: GauntInput,
        a_tilde: &mut [f64],
    ) -> Result<usize, GauntError>;
    fn expansion(&self, input: GauntInput) -> Result<GauntExpansion, GauntError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GauntKernel;

impl GauntCoefficientsApi for GauntKernel {
    fn qmax(&self, input: GauntInput) -> Option<usize> {
        input.qmax()
    }

    fn log_seed(&self, input: GauntInput) -> Result<f64, GauntError> {
        gaunt_log_seed(input)
    }

    fn fill_coefficients(
        &self,
        input: GauntInput,
        a_tilde: &mut [f64],
    ) -> Result<usize, GauntError> {
        fill_gaunt_coefficients(input, a_tilde)
    }

    fn expansion(&self, input: GauntInput) -> Result<GauntExpansion, GauntError> {
        gaunt_expansion(input)
    }
}

/// `ln a_0` for `P_n^m P_nu^m`; NaN when the indices do not couple.
pub fn gaunt_log_a0(n: i32, nu: i32, m: i32) -> f64 {
    gaunt_log_seed(GauntInput::diagonal(n, nu, m)).unwrap_or(f64::NAN)
}

/// `a_0` for `P_n^m P_nu^m`; NaN when the indices do not couple.
pub fn gaunt_a0(n: i32, nu: i32, m: i32) -> f64 {
    gaunt_seed(GauntInput::diagonal(n, nu, m)).unwrap_or(f64::NAN)
}

/// `qmax` for `P_n^m P_nu^m`, or `-1` when the indices do not couple.
pub fn gaunt_qmax(n: i32, nu: i32, m: i32) -> i32 {
    GauntInput::diagonal(n, nu, m)
        .qmax()
        .and_then(|qmax| i32::try_from(qmax).ok())
        .unwrap_or(-1)
}

/// Writes `a_0 .. a_qmax` for `P_n^m P_nu^m` into `a_tilde` and returns the
/// number of entries written. Nothing is written on error.
pub fn gaunt(n: i32, nu: i32, m: i32, a_tilde: &mut [f64]) -> Result<usize, GauntError> {
    fill_gaunt_coefficients(GauntInput::diagonal(n, nu, m), a_tilde)
}

pub fn gaunt_log_seed(input: GauntInput) -> Result<f64, GauntError> {
    Ok(log_seed(input)?.log_magnitude)
}

pub fn gaunt_seed(input: GauntInput) -> Result<f64, GauntError> {
    let seed = log_seed(input)?;
    Ok(seed.sign * seed.log_magnitude.exp())
}

/// Writes `a_q = a_0 * a_q / a_0` for `q = 0..=qmax`; `a_tilde[0]` is the
/// seed returned by [`gaunt_seed`] bit for bit.
pub fn fill_gaunt_coefficients(
    input: GauntInput,
    a_tilde: &mut [f64],
) -> Result<usize, GauntError> {
    let seed = gaunt_seed(input)?;
    let written = fill_normalized_gaunt_coefficients(input, a_tilde)?;
    for value in &mut a_tilde[..written] {
        *value *= seed;
    }

    Ok(written)
}

/// Writes the normalized sequence `a_q / a_0` (first entry exactly 1). Use
/// this form when `a_0` itself leaves the `f64` range.
pub fn fill_normalized_gaunt_coefficients(
    input: GauntInput,
    a_tilde: &mut [f64],
) -> Result<usize, GauntError> {
    let qmax = input.qmax().ok_or_else(|| input.invalid())?;
    let required = qmax + 1;
    if a_tilde.len() < required {
        return Err(GauntError::BufferTooShort {
            qmax,
            required,
            actual: a_tilde.len(),
        });
    }

    XuRecurrence::new(input).fill(&mut a_tilde[..required]);
    Ok(required)
}

pub fn gaunt_expansion(input: GauntInput) -> Result<GauntExpansion, GauntError> {
    let seed = log_seed(input)?;
    let qmax = input.qmax().ok_or_else(|| input.invalid())?;
    let mut normalized = vec![0.0; qmax + 1];
    XuRecurrence::new(input).fill(&mut normalized);

    Ok(GauntExpansion {
        input,
        qmax,
        log_a0: seed.log_magnitude,
        a0: seed.sign * seed.log_magnitude.exp(),
        normalized,
    })
}

struct LogSeed {
    log_magnitude: f64,
    sign: f64,
}

/// Xu eq. (20):
/// `a_0 = (2n)!/n! (2nu)!/nu! (n+nu)!/(2n+2nu)! (n+nu-m-mu)!/((n-m)! (nu-mu)!)`
/// as a signed sum of `ln|Gamma|`.
fn log_seed(input: GauntInput) -> Result<LogSeed, GauntError> {
    if !input.is_valid() {
        return Err(input.invalid());
    }

    let n = f64::from(input.n);
    let nu = f64::from(input.nu);
    let m = f64::from(input.m);
    let mu = f64::from(input.mu);

    let factors = [
        (2.0 * n + 1.0, 1.0),
        (n + 1.0, -1.0),
        (2.0 * nu + 1.0, 1.0),
        (nu + 1.0, -1.0),
        (n + nu + 1.0, 1.0),
        (2.0 * n + 2.0 * nu + 1.0, -1.0),
        (n + nu - m - mu + 1.0, 1.0),
        (n - m + 1.0, -1.0),
        (nu - mu + 1.0, -1.0),
    ];

    let mut log_magnitude = 0.0;
    let mut sign = 1.0;
    for (argument, power) in factors {
        let (log_gamma, gamma_sign) = libm::lgamma_r(argument);
        log_magnitude += power * log_gamma;
        if gamma_sign < 0 {
            sign = -sign;
        }
    }

    Ok(LogSeed {
        log_magnitude,
        sign,
    })
}

/// Forward recurrence for `a_q / a_0` in the coupling index.
struct XuRecurrence {
    n: i128,
    nu: i128,
    m: i128,
    mu: i128,
}

impl XuRecurrence {
    fn new(input: GauntInput) -> Self {
        Self {
            n: i128::from(input.n),
            nu: i128::from(input.nu),
            m: i128::from(input.m),
            mu: i128::from(input.mu),
        }
    }

    /// Xu eq. (28). Kept exact so the zero tests choosing the recurrence
    /// branch are reliable.
    fn a(&self, p: i128) -> i128 {
        p * (p - 1) * (self.m - self.mu)
            - (self.m + self.mu) * (self.n - self.nu) * (self.n + self.nu + 1)
    }

    fn a_f64(&self, p: i128) -> f64 {
        self.a(p) as f64
    }

    /// Xu eq. (3).
    fn alpha(&self, p: i128) -> f64 {
        let p_sq = (p * p) as f64;
        let sum = (self.n + self.nu + 1) as f64;
        let difference = (self.n - self.nu) as f64;
        (p_sq - sum * sum) * (p_sq - difference * difference) / (4.0 * p_sq - 1.0)
    }

    fn fill(&self, a_tilde: &mut [f64]) {
        let Some(qmax) = a_tilde.len().checked_sub(1) else {
            return;
        };

        a_tilde[0] = 1.0;
        if qmax >= 1 {
            a_tilde[1] = self.first();
        }
        if qmax >= 2 {
            a_tilde[2] = self.second();
        }
        for q in 3..=qmax {
            a_tilde[q] = self.step(q, a_tilde);
        }
    }

    /// Xu eq. (29).
    fn first(&self) -> f64 {
        let n = self.n as f64;
        let nu = self.nu as f64;
        let m = self.m as f64;
        let mu = self.mu as f64;
        let n4 = n + nu - m - mu;

        let legs = (m - n) * (m - n + 1.0) / (2.0 * n - 1.0)
            + (mu - nu) * (mu - nu + 1.0) / (2.0 * nu - 1.0);
        (n + nu - 1.5) * (1.0 - (2.0 * n + 2.0 * nu - 1.0) / (n4 * (n4 - 1.0)) * legs)
    }

    /// Xu eq. (35).
    fn second(&self) -> f64 {
        let n = self.n as f64;
        let nu = self.nu as f64;
        let m = self.m as f64;
        let mu = self.mu as f64;
        let n4 = n + nu - m - mu;

        let mn = m - n;
        let mun = mu - nu;
        let quartic = mn * (mn + 1.0) * (mn + 2.0) * (mn + 3.0) / ((2.0 * n - 1.0) * (2.0 * n - 3.0))
            + 2.0 * mn * (mn + 1.0) * mun * (mun + 1.0) / ((2.0 * n - 1.0) * (2.0 * nu - 1.0))
            + mun * (mun + 1.0) * (mun + 2.0) * (mun + 3.0)
                / ((2.0 * nu - 1.0) * (2.0 * nu - 3.0));
        let quadratic =
            mn * (mn + 1.0) / (2.0 * n - 1.0) + mun * (mun + 1.0) / (2.0 * nu - 1.0);
        let inner = (2.0 * n + 2.0 * nu - 5.0) / (2.0 * (n4 - 2.0) * (n4 - 3.0)) * quartic
            - quadratic;

        (2.0 * n + 2.0 * nu - 1.0) * (2.0 * n + 2.0 * nu - 7.0) / 4.0
            * ((2.0 * n + 2.0 * nu - 3.0) / (n4 * (n4 - 1.0)) * inner + 0.5)
    }

    /// Xu eqs. (26)-(27), falling back to eq. (30) or eqs. (32)-(33) when
    /// `A_{p+4}` vanishes.
    fn step(&self, q: usize, a_tilde: &[f64]) -> f64 {
        let p = self.n + self.nu - 2 * q as i128;
        let p1 = p - self.m - self.mu;
        let p2 = p + self.m + self.mu;
        let f = |value: i128| value as f64;

        if self.a(p + 4) != 0 {
            let c0 = f(p + 2) * f(p + 3) * f(p1 + 1) * f(p1 + 2) * self.a_f64(p + 4)
                * self.alpha(p + 1);
            let c1 = self.a_f64(p + 2) * self.a_f64(p + 3) * self.a_f64(p + 4)
                + f(p + 1) * f(p + 3) * f(p1 + 2) * f(p2 + 2) * self.a_f64(p + 4)
                    * self.alpha(p + 2)
                + f(p + 2) * f(p + 4) * f(p1 + 3) * f(p2 + 3) * self.a_f64(p + 2)
                    * self.alpha(p + 3);
            let c2 = -f(p + 2) * f(p + 3) * f(p2 + 3) * f(p2 + 4) * self.a_f64(p + 2)
                * self.alpha(p + 4);
            return (c1 * a_tilde[q - 1] + c2 * a_tilde[q - 2]) / c0;
        }

        if self.a(p + 6) == 0 {
            return f(p + 1) * f(p2 + 2) * self.alpha(p + 2) * a_tilde[q - 1]
                / (f(p + 2) * f(p1 + 1) * self.alpha(p + 1));
        }

        let c0 = f(p + 2) * f(p + 3) * f(p + 5) * f(p1 + 1) * f(p1 + 2) * f(p1 + 4)
            * self.a_f64(p + 6)
            * self.alpha(p + 1);
        let c1 = f(p + 5)
            * f(p1 + 4)
            * self.a_f64(p + 6)
            * (self.a_f64(p + 2) * self.a_f64(p + 3)
                + f(p + 1) * f(p + 3) * f(p1 + 2) * f(p2 + 2) * self.alpha(p + 2));
        let c2 = f(p + 2)
            * f(p2 + 3)
            * self.a_f64(p + 2)
            * (self.a_f64(p + 5) * self.a_f64(p + 6)
                + f(p + 4) * f(p + 6) * f(p1 + 5) * f(p2 + 5) * self.alpha(p + 5));
        let c3 = -f(p + 2) * f(p + 4) * f(p + 5) * f(p2 + 3) * f(p2 + 5) * f(p2 + 6)
            * self.a_f64(p + 2)
            * self.alpha(p + 6);

        (c1 * a_tilde[q - 1] + c2 * a_tilde[q - 2] + c3 * a_tilde[q - 3]) / c0
    }
}
