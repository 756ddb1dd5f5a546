//! Number formatting for dashboard figures.
//!
//! Fixed-decimal rendering with optional thousands separators, plus the
//! prefix/suffix forms used by the header metrics (`145%`, `4.5x`,
//! `RD$5,200,000`).

/// Placeholder shown when a figure is absent.
pub const PLACEHOLDER: &str = "—";

/// How a number is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimals: usize,
    pub use_separator: bool,
}

impl NumberFormat {
    /// Fixed decimals, no grouping.
    #[must_use]
    pub const fn fixed(decimals: usize) -> Self {
        Self {
            decimals,
            use_separator: false,
        }
    }

    /// Fixed decimals with `,` thousands grouping.
    #[must_use]
    pub const fn grouped(decimals: usize) -> Self {
        Self {
            decimals,
            use_separator: true,
        }
    }

    /// Format a value.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        format_number(value, self.decimals, self.use_separator)
    }

    /// Format a value between a prefix and a suffix, e.g. `RD$` + `1,000`.
    #[must_use]
    pub fn format_affixed(&self, prefix: &str, value: f64, suffix: &str) -> String {
        format!("{prefix}{}{suffix}", self.format(value))
    }

    /// Format an optional value, falling back to [`PLACEHOLDER`].
    #[must_use]
    pub fn format_or_placeholder(&self, prefix: &str, value: Option<f64>, suffix: &str) -> String {
        value.map_or_else(
            || PLACEHOLDER.to_string(),
            |v| self.format_affixed(prefix, v, suffix),
        )
    }
}

/// Format a number with a fixed number of decimals.
#[must_use]
pub fn format_number(value: f64, decimals: usize, use_separator: bool) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value);
    if !use_separator {
        return formatted;
    }

    match formatted.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{frac_part}", format_with_thousands(int_part)),
        None => format_with_thousands(&formatted),
    }
}

/// Insert `,` between groups of three digits in an integer string.
#[must_use]
pub fn format_with_thousands(input: &str) -> String {
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let mut out = String::new();
    for (idx, ch) in digits.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut out: String = out.chars().rev().collect();
    if negative {
        out.insert(0, '-');
    }
    out
}

/// Round to a number of decimal places (half away from zero).
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(format_with_thousands("5200000"), "5,200,000");
        assert_eq!(format_with_thousands("-1500"), "-1,500");
        assert_eq!(format_with_thousands("999"), "999");
        assert_eq!(format_with_thousands("0"), "0");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(145.0, 0, false), "145");
        assert_eq!(format_number(4.5, 1, false), "4.5");
        assert_eq!(format_number(1_234_567.891, 2, true), "1,234,567.89");
        assert_eq!(format_number(-2_360_000.0, 0, true), "-2,360,000");
    }

    #[test]
    fn test_affixed_and_placeholder() {
        let currency = NumberFormat::grouped(0);
        assert_eq!(currency.format_affixed("RD$", 4_800_000.0, ""), "RD$4,800,000");
        assert_eq!(currency.format_or_placeholder("RD$", None, ""), "—");
        assert_eq!(NumberFormat::fixed(0).format_or_placeholder("", Some(145.0), "%"), "145%");
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(0.55 * 100.0, 1) - 55.0).abs() < f64::EPSILON);
        assert!((round_to(12.345, 1) - 12.3).abs() < 1e-9);
    }
}
