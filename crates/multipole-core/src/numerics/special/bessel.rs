//! Modified Bessel functions of the first kind for integer order.
//!
//! Orders 0 and 1 switch from the power series to the large-argument
//! asymptotic expansion of `e^{-x} I_n(x)`. Higher orders use the power series
//! near the origin and Miller's downward recurrence elsewhere, normalized
//! against `I_0`. Upward recurrence from `I_0`, `I_1` loses all significant
//! digits once `n` exceeds `x` and is never used.

use std::f64::consts::PI;

const SERIES_CUTOFF: f64 = 20.0;
const GENERAL_SERIES_CUTOFF: f64 = 1.0;
const GENERAL_ASYMPTOTIC_CUTOFF: f64 = 1_000.0;
const UNSCALE_SPLIT_CUTOFF: f64 = 700.0;
const SERIES_REL_TOL: f64 = 1.0e-16;
const MAX_TERMS: usize = 500;
const MILLER_EXTRA_ORDERS: usize = 16;
const MILLER_ARGUMENT_WEIGHT: f64 = 64.0;
const MILLER_RESCALE: f64 = 1.0e100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifiedBesselInput {
    pub order: i32,
    pub argument: f64,
}

impl ModifiedBesselInput {
    pub fn new(order: i32, argument: f64) -> Self {
        Self { order, argument }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum BesselError {
    #[error("modified Bessel function requires a non-negative order, got {order}")]
    NegativeOrder { order: i32 },
    #[error("modified Bessel function of order {order} received a NaN argument")]
    NanArgument { order: i32 },
}

pub trait ModifiedBesselApi {
    fn bessel_i(&self, input: ModifiedBesselInput) -> Result<f64, BesselError>;
    fn bessel_ie(&self, input: ModifiedBesselInput) -> Result<f64, BesselError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifiedBesselKernel;

impl ModifiedBesselApi for ModifiedBesselKernel {
    fn bessel_i(&self, input: ModifiedBesselInput) -> Result<f64, BesselError> {
        try_bessel_i(input)
    }

    fn bessel_ie(&self, input: ModifiedBesselInput) -> Result<f64, BesselError> {
        try_bessel_ie(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scaling {
    Unscaled,
    Exponential,
}

/// `I_0(x)`; `I_0(0) = 1`.
pub fn bessel_i0(x: f64) -> f64 {
    evaluate(0, x, Scaling::Unscaled)
}

/// `e^{-|x|} I_0(x)`.
pub fn bessel_i0e(x: f64) -> f64 {
    evaluate(0, x, Scaling::Exponential)
}

/// `I_1(x)`; odd in `x`, `I_1(0) = 0`.
pub fn bessel_i1(x: f64) -> f64 {
    evaluate(1, x, Scaling::Unscaled)
}

/// `e^{-|x|} I_1(x)`.
pub fn bessel_i1e(x: f64) -> f64 {
    evaluate(1, x, Scaling::Exponential)
}

/// `I_n(x)` for integer `n >= 0`. A negative order is a domain error and
/// yields NaN; use [`try_bessel_i`] to get it reported instead.
pub fn bessel_i(order: i32, x: f64) -> f64 {
    match usize::try_from(order) {
        Ok(order) => evaluate(order, x, Scaling::Unscaled),
        Err(_) => f64::NAN,
    }
}

/// `e^{-|x|} I_n(x)` for integer `n >= 0`, NaN for a negative order.
pub fn bessel_ie(order: i32, x: f64) -> f64 {
    match usize::try_from(order) {
        Ok(order) => evaluate(order, x, Scaling::Exponential),
        Err(_) => f64::NAN,
    }
}

pub fn try_bessel_i(input: ModifiedBesselInput) -> Result<f64, BesselError> {
    let order = validate_input(input)?;
    Ok(evaluate(order, input.argument, Scaling::Unscaled))
}

pub fn try_bessel_ie(input: ModifiedBesselInput) -> Result<f64, BesselError> {
    let order = validate_input(input)?;
    Ok(evaluate(order, input.argument, Scaling::Exponential))
}

/// Fills `values[k]` with `I_k(x)` for `k = 0..values.len()` from a single
/// downward sweep. Entries 0 and 1 are exactly [`bessel_i0`] and [`bessel_i1`].
pub fn bessel_i_sequence(x: f64, values: &mut [f64]) {
    fill_sequence(x, values, Scaling::Unscaled);
}

/// Scaled counterpart of [`bessel_i_sequence`]: `values[k] = e^{-|x|} I_k(x)`.
pub fn bessel_ie_sequence(x: f64, values: &mut [f64]) {
    fill_sequence(x, values, Scaling::Exponential);
}

fn validate_input(input: ModifiedBesselInput) -> Result<usize, BesselError> {
    let order = usize::try_from(input.order).map_err(|_| BesselError::NegativeOrder {
        order: input.order,
    })?;
    if input.argument.is_nan() {
        return Err(BesselError::NanArgument { order: input.order });
    }

    Ok(order)
}

fn evaluate(order: usize, x: f64, scaling: Scaling) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }

    let magnitude = evaluate_nonnegative(order, x.abs(), scaling);
    apply_parity(order, x, magnitude)
}

fn apply_parity(order: usize, x: f64, magnitude: f64) -> f64 {
    if x < 0.0 && order % 2 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

fn evaluate_nonnegative(order: usize, ax: f64, scaling: Scaling) -> f64 {
    if ax == 0.0 {
        return if order == 0 { 1.0 } else { 0.0 };
    }

    if ax.is_infinite() {
        return match scaling {
            Scaling::Unscaled => f64::INFINITY,
            Scaling::Exponential => 0.0,
        };
    }

    if order <= 1 {
        return if ax <= SERIES_CUTOFF {
            from_unscaled(power_series(order, ax), ax, scaling)
        } else {
            from_scaled(asymptotic_scaled(order, ax), ax, scaling)
        };
    }

    if ax <= GENERAL_SERIES_CUTOFF {
        return from_unscaled(power_series(order, ax), ax, scaling);
    }

    if asymptotic_applies(order, ax) {
        return from_scaled(asymptotic_scaled(order, ax), ax, scaling);
    }

    let scaled = miller_ratio(order, ax) * evaluate_nonnegative(0, ax, Scaling::Exponential);
    from_scaled(scaled, ax, scaling)
}

fn asymptotic_applies(order: usize, ax: f64) -> bool {
    let order = order as f64;
    ax > GENERAL_ASYMPTOTIC_CUTOFF && order * order <= ax
}

fn from_unscaled(value: f64, ax: f64, scaling: Scaling) -> f64 {
    match scaling {
        Scaling::Unscaled => value,
        Scaling::Exponential => value * (-ax).exp(),
    }
}

fn from_scaled(value: f64, ax: f64, scaling: Scaling) -> f64 {
    match scaling {
        Scaling::Unscaled => unscale(value, ax),
        Scaling::Exponential => value,
    }
}

fn unscale(scaled: f64, ax: f64) -> f64 {
    if ax > UNSCALE_SPLIT_CUTOFF {
        // e^ax alone overflows before the product does.
        let half = (0.5 * ax).exp();
        scaled * half * half
    } else {
        scaled * ax.exp()
    }
}

/// `sum_k (x/2)^{2k+n} / (k! (k+n)!)`. Every term is positive, so the sum
/// carries no cancellation.
fn power_series(order: usize, ax: f64) -> f64 {
    let half = 0.5 * ax;
    let mut term = 1.0;
    for k in 1..=order {
        term *= half / k as f64;
    }

    let quarter_square = half * half;
    let mut sum = term;
    for k in 1..=MAX_TERMS {
        term *= quarter_square / (k as f64 * (k + order) as f64);
        sum += term;
        if term <= sum * SERIES_REL_TOL {
            break;
        }
    }

    sum
}

/// `e^{-x} I_n(x) ~ (2 pi x)^{-1/2} sum_k (-1)^k prod_{j<=k} (4n^2 - (2j-1)^2) / (k! (8x)^k)`,
/// truncated once terms fall below tolerance or stop decreasing.
fn asymptotic_scaled(order: usize, ax: f64) -> f64 {
    let mu = 4.0 * (order as f64) * (order as f64);
    let mut term = 1.0_f64;
    let mut sum = 1.0;
    for k in 1..=MAX_TERMS {
        let odd = (2 * k - 1) as f64;
        let next = -term * (mu - odd * odd) / (8.0 * k as f64 * ax);
        if next.abs() >= term.abs() {
            break;
        }
        term = next;
        sum += term;
        if term.abs() <= sum.abs() * SERIES_REL_TOL {
            break;
        }
    }

    sum / (2.0 * PI * ax).sqrt()
}

fn miller_start_order(order: usize, ax: f64) -> usize {
    order + MILLER_EXTRA_ORDERS + (MILLER_ARGUMENT_WEIGHT * ax).sqrt() as usize
}

/// Unnormalized `I_k` values produced by `I_{k-1} = I_{k+1} + (2k/x) I_k`,
/// seeded with `(0, 1)` far above the wanted orders.
struct DownwardRecurrence {
    two_over_x: f64,
    upper: f64,
    current: f64,
}

impl DownwardRecurrence {
    fn new(ax: f64) -> Self {
        Self {
            two_over_x: 2.0 / ax,
            upper: 0.0,
            current: 1.0,
        }
    }

    /// Steps from order `order` to `order - 1`. Returns `true` when the sweep
    /// was rescaled by `1 / MILLER_RESCALE`, in which case every value the
    /// caller retained from earlier steps must be rescaled too.
    fn step(&mut self, order: usize) -> bool {
        let lower = self.upper + order as f64 * self.two_over_x * self.current;
        self.upper = self.current;
        self.current = lower;

        if lower.abs() > MILLER_RESCALE {
            self.upper /= MILLER_RESCALE;
            self.current /= MILLER_RESCALE;
            return true;
        }

        false
    }
}

/// `I_n(x) / I_0(x)` by Miller's algorithm.
fn miller_ratio(order: usize, ax: f64) -> f64 {
    let mut sweep = DownwardRecurrence::new(ax);
    let mut target = 0.0;

    for k in (1..=miller_start_order(order, ax)).rev() {
        if sweep.step(k) {
            target /= MILLER_RESCALE;
        }
        if k - 1 == order {
            target = sweep.current;
        }
    }

    target / sweep.current
}

/// `ratios[k] = I_k(x) / I_0(x)` for every slot, by one Miller sweep.
fn miller_ratios(ax: f64, ratios: &mut [f64]) {
    let Some(max_order) = ratios.len().checked_sub(1) else {
        return;
    };

    ratios.fill(0.0);
    let mut sweep = DownwardRecurrence::new(ax);
    for k in (1..=miller_start_order(max_order, ax)).rev() {
        if sweep.step(k) && k <= max_order {
            for ratio in &mut ratios[k..] {
                *ratio /= MILLER_RESCALE;
            }
        }
        if k - 1 <= max_order {
            ratios[k - 1] = sweep.current;
        }
    }

    let normalization = sweep.current;
    for ratio in ratios.iter_mut() {
        *ratio /= normalization;
    }
}

fn fill_sequence(x: f64, values: &mut [f64], scaling: Scaling) {
    let Some(max_order) = values.len().checked_sub(1) else {
        return;
    };

    let ax = x.abs();
    let direct = x.is_nan()
        || ax == 0.0
        || ax.is_infinite()
        || max_order < 2
        || ax <= GENERAL_SERIES_CUTOFF
        || asymptotic_applies(max_order, ax);
    if direct {
        for (order, value) in values.iter_mut().enumerate() {
            *value = evaluate(order, x, scaling);
        }
        return;
    }

    miller_ratios(ax, values);
    let reference = evaluate_nonnegative(0, ax, Scaling::Exponential);
    for (order, value) in values.iter_mut().enumerate().skip(2) {
        let magnitude = from_scaled(*value * reference, ax, scaling);
        *value = apply_parity(order, x, magnitude);
    }
    values[0] = evaluate(0, x, scaling);
    values[1] = evaluate(1, x, scaling);
}
