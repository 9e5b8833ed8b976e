use super::CliError;
use anyhow::Context;
use multipole_core::domain::MultipoleError;
use multipole_core::numerics::special::{
    GauntExpansion, GauntInput, ModifiedBesselInput, gaunt_expansion, try_bessel_i, try_bessel_ie,
};
use multipole_core::numerics::{DEFAULT_SIGNIFICANT_DIGITS, format_significant};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, warn};

#[derive(clap::Args)]
pub(super) struct BesselArgs {
    /// Integer order n >= 0
    #[arg(value_name = "ORDER", allow_negative_numbers = true)]
    order: i32,

    /// Real argument x
    #[arg(value_name = "ARGUMENT", allow_negative_numbers = true)]
    argument: f64,

    /// Print e^{-|x|} I_n(x) instead of I_n(x)
    #[arg(long)]
    scaled: bool,

    #[command(flatten)]
    output: OutputFlags,
}

#[derive(clap::Args)]
pub(super) struct GauntArgs {
    /// Degree n of the first factor
    #[arg(value_name = "N", allow_negative_numbers = true)]
    n: i32,

    /// Degree nu of the second factor
    #[arg(value_name = "NU", allow_negative_numbers = true)]
    nu: i32,

    /// Order m of the first factor
    #[arg(value_name = "M", allow_negative_numbers = true)]
    m: i32,

    /// Order mu of the second factor (defaults to M)
    #[arg(long, value_name = "MU", allow_negative_numbers = true)]
    mu: Option<i32>,

    /// Print a_q / a_0 instead of a_q
    #[arg(long)]
    normalized: bool,

    #[command(flatten)]
    output: OutputFlags,
}

#[derive(clap::Args)]
struct OutputFlags {
    /// Significant digits of printed values
    #[arg(
        long,
        default_value_t = DEFAULT_SIGNIFICANT_DIGITS as u8,
        value_parser = clap::value_parser!(u8).range(1..=17)
    )]
    digits: u8,

    /// Print a JSON document instead of plain values
    #[arg(long)]
    json: bool,
}

impl OutputFlags {
    fn format(&self, value: f64) -> String {
        format_significant(value, usize::from(self.digits))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BesselReport {
    order: i32,
    argument: f64,
    scaled: bool,
    value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GauntReport<'a> {
    #[serde(flatten)]
    expansion: &'a GauntExpansion,
    normalized_output: bool,
    coefficients: Vec<f64>,
}

pub(super) fn run_besseli_command(args: BesselArgs) -> Result<i32, CliError> {
    let input = ModifiedBesselInput::new(args.order, args.argument);
    let value = if args.scaled {
        try_bessel_ie(input)
    } else {
        try_bessel_i(input)
    }
    .map_err(MultipoleError::from)?;

    debug!(
        order = args.order,
        argument = args.argument,
        scaled = args.scaled,
        value,
        "evaluated modified Bessel function"
    );
    if !value.is_finite() {
        warn!(
            order = args.order,
            argument = args.argument,
            "I_n(x) exceeds the f64 range; --scaled keeps it finite"
        );
    }

    if args.output.json {
        let report = BesselReport {
            order: args.order,
            argument: args.argument,
            scaled: args.scaled,
            value,
        };
        return write_json(&report);
    }

    write_lines(&[args.output.format(value)])
}

pub(super) fn run_gaunt_command(args: GauntArgs) -> Result<i32, CliError> {
    let input = GauntInput::new(args.n, args.nu, args.m, args.mu.unwrap_or(args.m));
    let expansion = gaunt_expansion(input).map_err(MultipoleError::from)?;

    debug!(
        n = input.n,
        nu = input.nu,
        m = input.m,
        mu = input.mu,
        qmax = expansion.qmax,
        log_a0 = expansion.log_a0,
        "evaluated Gaunt expansion"
    );

    let coefficients = if args.normalized {
        expansion.normalized.clone()
    } else {
        expansion.coefficients()
    };
    if !args.normalized && expansion.a0 == 0.0 && expansion.log_a0.is_finite() {
        warn!(
            log_a0 = expansion.log_a0,
            "a0 underflows f64; --normalized keeps the sequence representable"
        );
    }
    if coefficients.iter().any(|value| !value.is_finite()) {
        warn!(
            n = input.n,
            nu = input.nu,
            m = input.m,
            mu = input.mu,
            "Gaunt coefficients contain non-finite values"
        );
    }

    if args.output.json {
        let report = GauntReport {
            expansion: &expansion,
            normalized_output: args.normalized,
            coefficients,
        };
        return write_json(&report);
    }

    let mut lines = Vec::with_capacity(coefficients.len() + 2);
    lines.push(expansion.qmax.to_string());
    lines.push(args.output.format(expansion.a0));
    lines.extend(coefficients.iter().map(|value| args.output.format(*value)));
    write_lines(&lines)
}

fn write_lines(lines: &[String]) -> Result<i32, CliError> {
    let mut stdout = std::io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}").context("failed to write result to stdout")?;
    }
    stdout.flush().context("failed to flush stdout")?;
    Ok(0)
}

fn write_json<T: Serialize>(report: &T) -> Result<i32, CliError> {
    let rendered =
        serde_json::to_string_pretty(report).context("failed to serialize JSON report")?;
    write_lines(&[rendered])
}
