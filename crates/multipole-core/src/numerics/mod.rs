pub mod special;

pub use special::{
    BesselError, GauntCoefficientsApi, GauntError, GauntExpansion, GauntInput, GauntKernel,
    ModifiedBesselApi, ModifiedBesselInput, ModifiedBesselKernel, bessel_i, bessel_i_sequence,
    bessel_i0, bessel_i0e, bessel_i1, bessel_i1e, bessel_ie, bessel_ie_sequence,
    fill_gaunt_coefficients, fill_normalized_gaunt_coefficients, gaunt, gaunt_a0,
    gaunt_expansion, gaunt_log_a0, gaunt_log_seed, gaunt_qmax, gaunt_seed, try_bessel_i,
    try_bessel_ie,
};

/// Default significant digits for printed results, matching C's `%.15g`.
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 15;

/// Formats `value` the way C's `printf("%.{digits}g", value)` does.
///
/// Fixed notation is used when the decimal exponent lies in `-4..digits`,
/// scientific otherwise; trailing zeros are removed in both cases.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }

    if value == f64::INFINITY {
        return "inf".to_string();
    }

    if value == f64::NEG_INFINITY {
        return "-inf".to_string();
    }

    let digits = digits.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round once in scientific form so the exponent reflects carries like 9.99 -> 1.00e1.
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{sign}{:02}",
            strip_trailing_zeros(mantissa),
            exponent.unsigned_abs()
        );
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    strip_trailing_zeros(&format!("{value:.decimals$}")).to_string()
}

fn strip_trailing_zeros(text: &str) -> &str {
    if !text.contains('.') {
        return text;
    }

    text.trim_end_matches('0').trim_end_matches('.')
}

pub fn relative_difference(lhs: f64, rhs: f64, relative_floor: f64) -> f64 {
    let scale = lhs.abs().max(rhs.abs()).max(relative_floor);
    (lhs - rhs).abs() / scale
}

pub fn within_tolerance(
    lhs: f64,
    rhs: f64,
    abs_tol: f64,
    rel_tol: f64,
    relative_floor: f64,
) -> bool {
    let abs_diff = (lhs - rhs).abs();
    abs_diff <= abs_tol || relative_difference(lhs, rhs, relative_floor) <= rel_tol
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_SIGNIFICANT_DIGITS, format_significant, relative_difference, within_tolerance,
    };

    #[test]
    fn format_significant_matches_printf_fixed_notation() {
        assert_eq!(
            format_significant(17.505614966624236, DEFAULT_SIGNIFICANT_DIGITS),
            "17.5056149666242"
        );
        assert_eq!(format_significant(2.5, 15), "2.5");
        assert_eq!(format_significant(-0.5, 15), "-0.5");
        assert_eq!(format_significant(1.0, 15), "1");
        assert_eq!(format_significant(0.0001, 6), "0.0001");
        assert_eq!(format_significant(100000.0, 6), "100000");
        assert_eq!(format_significant(0.6666666666666666, 15), "0.666666666666667");
    }

    #[test]
    fn format_significant_matches_printf_scientific_notation() {
        assert_eq!(format_significant(1.0e-5, 15), "1e-05");
        assert_eq!(format_significant(1.0e6, 6), "1e+06");
        assert_eq!(format_significant(123456789.0, 3), "1.23e+08");
        assert_eq!(format_significant(1.0e100, 15), "1e+100");
        assert_eq!(
            format_significant(2.6430419258812794e-13, 15),
            "2.64304192588128e-13"
        );
        assert_eq!(format_significant(9.9999, 2), "10");
        assert_eq!(format_significant(99999.0, 2), "1e+05");
    }

    #[test]
    fn format_significant_handles_special_values() {
        assert_eq!(format_significant(f64::NAN, 15), "nan");
        assert_eq!(format_significant(f64::INFINITY, 15), "inf");
        assert_eq!(format_significant(f64::NEG_INFINITY, 15), "-inf");
        assert_eq!(format_significant(0.0, 15), "0");
        assert_eq!(format_significant(-0.0, 15), "-0");
        assert_eq!(format_significant(3.7, 0), "4");
    }

    #[test]
    fn relative_difference_uses_relative_floor() {
        assert!((relative_difference(1.0, 1.1, 1.0e-12) - 0.0909090909).abs() < 1.0e-9);
        assert!((relative_difference(0.0, 1.0e-14, 1.0) - 1.0e-14).abs() < 1.0e-20);
    }

    #[test]
    fn within_tolerance_accepts_abs_or_relative_match() {
        assert!(within_tolerance(1.0, 1.0 + 1.0e-10, 1.0e-9, 0.0, 1.0e-12));
        assert!(within_tolerance(1000.0, 1000.1, 0.0, 1.0e-3, 1.0e-12));
        assert!(!within_tolerance(1.0, 1.1, 1.0e-3, 1.0e-3, 1.0e-12));
    }
}
