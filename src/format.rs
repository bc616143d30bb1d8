//! Short-form number formatting for very large energy values.
//!
//! Values below 1000 are shown with comma grouping; everything above is
//! scaled to the largest matching suffix (K, M, B, ... Qd). The suffix
//! table covers up to 10^123, which is past the top catalog tier's costs.

/// Magnitude suffixes, ordered by ascending exponent.
const SUFFIXES: &[(i32, &str)] = &[
    (3, "K"),
    (6, "M"),
    (9, "B"),
    (12, "T"),
    (15, "Qa"),
    (18, "Qi"),
    (21, "Sx"),
    (24, "Sp"),
    (27, "Oc"),
    (30, "No"),
    (33, "Dc"),
    (36, "Udc"),
    (39, "Ddc"),
    (42, "Tdc"),
    (45, "Qadc"),
    (48, "Qidc"),
    (51, "Sxdc"),
    (54, "Spdc"),
    (57, "Ocdc"),
    (60, "Nodc"),
    (63, "Vg"),
    (66, "Uvg"),
    (69, "Dvg"),
    (72, "Tvg"),
    (75, "Qavg"),
    (78, "Qivg"),
    (81, "Sxvg"),
    (84, "Spvg"),
    (87, "Ocvg"),
    (90, "Novg"),
    (93, "Tg"),
    (96, "Utg"),
    (99, "Dtg"),
    // Irregular googol entry carried over from the original suffix table.
    (100, "G"),
    (102, "Ttg"),
    (105, "Qatg"),
    (108, "Qitg"),
    (111, "Sxtg"),
    (114, "Sptg"),
    (117, "Octg"),
    (120, "Notg"),
    (123, "Qd"),
];

/// Group an integer's digits with commas (e.g. 1234567 → "1,234,567").
fn group_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.chars().rev().collect()
}

/// Format an energy amount in short form.
///
/// Non-finite inputs are rendered via `{}` rather than panicking, since a
/// display helper must never take down the caller.
pub fn format_magnitude(n: f64) -> String {
    if !n.is_finite() {
        return format!("{n}");
    }
    if n < 0.0 {
        return format!("-{}", format_magnitude(-n));
    }
    if n < 1e3 {
        return group_thousands(n.floor() as u64);
    }
    for &(exp, label) in SUFFIXES.iter().rev() {
        let unit = 10f64.powi(exp);
        if n >= unit {
            let v = n / unit;
            return if v >= 100.0 {
                format!("{}{}", group_thousands(v.floor() as u64), label)
            } else {
                format!("{v:.2}{label}")
            };
        }
    }
    group_thousands(n.floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_grouped() {
        assert_eq!(format_magnitude(0.0), "0");
        assert_eq!(format_magnitude(999.0), "999");
        assert_eq!(format_magnitude(999.9), "999");
    }

    #[test]
    fn thousands_use_k() {
        assert_eq!(format_magnitude(1_000.0), "1.00K");
        assert_eq!(format_magnitude(1_500.0), "1.50K");
        assert_eq!(format_magnitude(12_340.0), "12.34K");
    }

    #[test]
    fn hundreds_of_a_unit_drop_decimals() {
        assert_eq!(format_magnitude(250_000.0), "250K");
        assert_eq!(format_magnitude(999_999.0), "999K");
    }

    #[test]
    fn each_scale_has_its_suffix() {
        assert_eq!(format_magnitude(2.5e6), "2.50M");
        assert_eq!(format_magnitude(3e9), "3.00B");
        assert_eq!(format_magnitude(1e12), "1.00T");
        assert_eq!(format_magnitude(1e93), "1.00Tg");
        assert_eq!(format_magnitude(1e123), "1.00Qd");
    }

    #[test]
    fn googol_entry_used() {
        // 10^100 sits between the regular 10^99 and 10^102 steps.
        assert_eq!(format_magnitude(1e100), "1.00G");
        assert_eq!(format_magnitude(5e101), "50.00G");
    }

    #[test]
    fn negative_mirrors_positive() {
        assert_eq!(format_magnitude(-1_500.0), "-1.50K");
    }

    #[test]
    fn non_finite_does_not_panic() {
        assert_eq!(format_magnitude(f64::INFINITY), "inf");
        assert_eq!(format_magnitude(f64::NAN), "NaN");
    }
}
