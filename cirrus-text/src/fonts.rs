//! CSS-style font description.
//!
//! The layout options carry the font as two free-form strings, exactly as
//! a browser host hands them over (`"Georgia, 'Times New Roman', serif"`,
//! `"bold"`).  [`FontSpec::from_css`] turns them into a fallback chain and
//! a numeric weight once per run.

/// Normal weight (CSS `normal`).
pub const WEIGHT_NORMAL: u16 = 400;
/// Bold weight (CSS `bold`).
pub const WEIGHT_BOLD: u16 = 700;

/// Resolved font request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontSpec {
    /// Ordered family names, lowercase, quotes stripped.  Never empty.
    pub families: Vec<String>,
    /// 1–1000, 400 = normal, 700 = bold.
    pub weight: u16,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            families: vec!["sans-serif".into()],
            weight: WEIGHT_NORMAL,
        }
    }
}

impl FontSpec {
    /// Parse a CSS `font-family` chain and `font-weight` keyword.
    pub fn from_css(family_str: &str, weight_str: &str) -> Self {
        let families: Vec<String> = family_str
            .split(',')
            .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            families: if families.is_empty() {
                vec!["sans-serif".into()]
            } else {
                families
            },
            weight: parse_weight(weight_str),
        }
    }

    /// First family in the chain.
    pub fn primary_family(&self) -> &str {
        self.families
            .first()
            .map(String::as_str)
            .unwrap_or("sans-serif")
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

/// Map a CSS `font-weight` value to its numeric form.
///
/// Unknown keywords fall back to `normal` with a warning rather than
/// failing the run: the weight only influences measurement.
pub fn parse_weight(s: &str) -> u16 {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "" | "normal" | "regular" => WEIGHT_NORMAL,
        "bold" | "bolder" => WEIGHT_BOLD,
        "lighter" => 300,
        other => match other.parse::<f64>() {
            Ok(n) if n.is_finite() => n.round().clamp(1.0, 1000.0) as u16,
            _ => {
                log::warn!("Unknown font weight '{other}', using normal");
                WEIGHT_NORMAL
            }
        },
    }
}
