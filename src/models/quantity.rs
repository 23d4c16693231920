use std::fmt;

/// A raw ingredient quantity split into magnitude and unit.
///
/// Parsing never fails. Anything that does not start with a plain number
/// (or that continues with fraction/range syntax after it) stays `Unparsed`
/// with its original text, so nothing is lost for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    Measured {
        amount: f64,
        unit: String,
        /// Whitespace separated the number from the unit ("2 tbsp" vs "200g").
        spaced: bool,
    },
    Unparsed(String),
}

impl Quantity {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();

        let int_end = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        if int_end == 0 {
            return Quantity::Unparsed(raw.to_string());
        }

        let mut end = int_end;
        if let Some(frac) = text[int_end..].strip_prefix('.') {
            let frac_len = frac
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(frac.len());
            if frac_len > 0 {
                end = int_end + 1 + frac_len;
            }
        }

        let amount = match text[..end].parse::<f64>() {
            Ok(amount) if amount.is_finite() => amount,
            _ => return Quantity::Unparsed(raw.to_string()),
        };

        let remainder = &text[end..];
        let unit = remainder.trim_start();
        if unit.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '/' | '-' | '.' | ',')) {
            return Quantity::Unparsed(raw.to_string());
        }

        Quantity::Measured {
            amount,
            unit: unit.to_string(),
            spaced: unit.len() != remainder.len(),
        }
    }

    /// Key under which two quantities may be summed; `None` for unparsed text.
    pub fn unit_key(&self) -> Option<String> {
        match self {
            Quantity::Measured { unit, .. } => Some(unit.to_lowercase()),
            Quantity::Unparsed(_) => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Measured {
                amount,
                unit,
                spaced,
            } => write!(f, "{}", format_measure(*amount, unit, *spaced)),
            Quantity::Unparsed(text) => write!(f, "{}", text),
        }
    }
}

/// Format an amount, rounding to three decimals and dropping trailing zeros.
pub fn format_amount(amount: f64) -> String {
    let scaled = amount * 1000.0;
    let rounded = if scaled.is_finite() {
        scaled.round() / 1000.0
    } else {
        amount
    };
    // Integers beyond 2^53 are not exact in f64 and overflow i64 past 9.2e18.
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

pub fn format_measure(amount: f64, unit: &str, spaced: bool) -> String {
    if unit.is_empty() {
        format_amount(amount)
    } else if spaced {
        format!("{} {}", format_amount(amount), unit)
    } else {
        format!("{}{}", format_amount(amount), unit)
    }
}
