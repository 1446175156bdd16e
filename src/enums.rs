use std::fmt;
use std::str::FromStr;

use image::Rgb;
use qrcode::EcLevel;

use crate::error::AppError;

// ─── SizeClass ──────────────────────────────────────────────────────

/// Output size of the rendered QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    Xlarge,
}

impl SizeClass {
    /// Canonical token used in callback data (`size_<token>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
            SizeClass::Xlarge => "xlarge",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            SizeClass::Small => "Small",
            SizeClass::Medium => "Medium",
            SizeClass::Large => "Large",
            SizeClass::Xlarge => "Extra Large",
        }
    }

    /// Button label shown while the value is not selected.
    pub fn button_label(&self) -> &'static str {
        match self {
            SizeClass::Small => "🕷 Small",
            SizeClass::Medium => "💫 Medium",
            SizeClass::Large => "🙈 Large",
            SizeClass::Xlarge => "🙊 Extra Large",
        }
    }

    /// Pixels per QR module at this size.
    pub fn module_px(&self) -> u32 {
        match self {
            SizeClass::Small => 10,
            SizeClass::Medium => 15,
            SizeClass::Large => 20,
            SizeClass::Xlarge => 25,
        }
    }

    pub fn all() -> &'static [SizeClass] {
        &[SizeClass::Small, SizeClass::Medium, SizeClass::Large, SizeClass::Xlarge]
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeClass {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(SizeClass::Small),
            "medium" => Ok(SizeClass::Medium),
            "large" => Ok(SizeClass::Large),
            "xlarge" => Ok(SizeClass::Xlarge),
            _ => Err(AppError::Validation(format!(
                "Unsupported size: {}. Supported: small, medium, large, xlarge",
                s
            ))),
        }
    }
}

// ─── EcClass ────────────────────────────────────────────────────────

/// QR error-correction robustness, in standard strength order.
///
/// Display strings follow the standard QR classes (L 7%, M 15%, Q 25%,
/// H 30%); the tier named "Max" is the strongest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcClass {
    Low,
    Medium,
    High,
    Max,
}

impl EcClass {
    /// Canonical token used in callback data (`error_<token>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EcClass::Low => "low",
            EcClass::Medium => "medium",
            EcClass::High => "high",
            EcClass::Max => "max",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EcClass::Low => "Low",
            EcClass::Medium => "Medium",
            EcClass::High => "High",
            EcClass::Max => "Max",
        }
    }

    /// Button label shown while the value is not selected.
    pub fn button_label(&self) -> &'static str {
        match self {
            EcClass::Low => "😔 Low",
            EcClass::Medium => "👁 Medium",
            EcClass::High => "👀 High",
            EcClass::Max => "🫀 Max",
        }
    }

    /// Standard class letter with its nominal correction capacity.
    pub fn class_label(&self) -> &'static str {
        match self {
            EcClass::Low => "L (7%)",
            EcClass::Medium => "M (15%)",
            EcClass::High => "Q (25%)",
            EcClass::Max => "H (30%)",
        }
    }

    /// Nominal correction capacity in percent.
    pub fn percent(&self) -> u8 {
        match self {
            EcClass::Low => 7,
            EcClass::Medium => 15,
            EcClass::High => 25,
            EcClass::Max => 30,
        }
    }

    /// The encoder-level error-correction class.
    pub fn ec_level(&self) -> EcLevel {
        match self {
            EcClass::Low => EcLevel::L,
            EcClass::Medium => EcLevel::M,
            EcClass::High => EcLevel::Q,
            EcClass::Max => EcLevel::H,
        }
    }

    pub fn all() -> &'static [EcClass] {
        &[EcClass::Low, EcClass::Medium, EcClass::High, EcClass::Max]
    }
}

impl fmt::Display for EcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EcClass {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(EcClass::Low),
            "medium" => Ok(EcClass::Medium),
            "high" => Ok(EcClass::High),
            "max" => Ok(EcClass::Max),
            _ => Err(AppError::Validation(format!(
                "Unsupported error correction: {}. Supported: low, medium, high, max",
                s
            ))),
        }
    }
}

// ─── StyleClass ─────────────────────────────────────────────────────

/// How each module is drawn when rasterizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleShape {
    Square,
    Rounded,
    Circle,
}

/// Visual style of the rendered QR code: a module shape plus fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    Classic,
    Blue,
    Gradient,
    Dark,
    Green,
}

impl StyleClass {
    /// Canonical token used in callback data (`style_<token>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleClass::Classic => "classic",
            StyleClass::Blue => "blue",
            StyleClass::Gradient => "gradient",
            StyleClass::Dark => "dark",
            StyleClass::Green => "green",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StyleClass::Classic => "⬛ Classic",
            StyleClass::Blue => "🔵 Blue",
            StyleClass::Gradient => "🌈 Gradient",
            StyleClass::Dark => "⚫ Dark",
            StyleClass::Green => "🟢 Green",
        }
    }

    /// Button label shown while the value is not selected.
    pub fn button_label(&self) -> &'static str {
        match self {
            StyleClass::Classic => "🕷 Classic",
            StyleClass::Blue => "🕸 Blue",
            StyleClass::Gradient => "🤖 Gradient",
            StyleClass::Dark => "🔍 Dark",
            StyleClass::Green => "🙈 Green",
        }
    }

    pub fn module_shape(&self) -> ModuleShape {
        match self {
            StyleClass::Classic | StyleClass::Blue | StyleClass::Dark => ModuleShape::Square,
            StyleClass::Gradient => ModuleShape::Rounded,
            StyleClass::Green => ModuleShape::Circle,
        }
    }

    pub fn fill_color(&self) -> Rgb<u8> {
        match self {
            StyleClass::Classic => Rgb([0, 0, 0]),
            StyleClass::Blue => Rgb([0, 0, 255]),
            StyleClass::Gradient => Rgb([100, 0, 200]),
            StyleClass::Dark => Rgb([30, 30, 30]),
            StyleClass::Green => Rgb([0, 128, 0]),
        }
    }

    pub fn all() -> &'static [StyleClass] {
        &[
            StyleClass::Classic,
            StyleClass::Blue,
            StyleClass::Gradient,
            StyleClass::Dark,
            StyleClass::Green,
        ]
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleClass {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(StyleClass::Classic),
            "blue" => Ok(StyleClass::Blue),
            "gradient" => Ok(StyleClass::Gradient),
            "dark" => Ok(StyleClass::Dark),
            "green" => Ok(StyleClass::Green),
            _ => Err(AppError::Validation(format!(
                "Unsupported style: {}. Supported: classic, blue, gradient, dark, green",
                s
            ))),
        }
    }
}

// ─── LogoShape ──────────────────────────────────────────────────────

/// Declared shape of the uploaded logo. Display metadata only; the logo is
/// composited as uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoShape {
    Square,
    Circle,
    Rounded,
}

impl LogoShape {
    /// Canonical token used in callback data (`logo_<token>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoShape::Square => "square",
            LogoShape::Circle => "circle",
            LogoShape::Rounded => "rounded",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LogoShape::Square => "⬜ Square",
            LogoShape::Circle => "⭕ Circle",
            LogoShape::Rounded => "⏹ Rounded",
        }
    }
}

impl fmt::Display for LogoShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogoShape {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "square" => Ok(LogoShape::Square),
            "circle" => Ok(LogoShape::Circle),
            "rounded" => Ok(LogoShape::Rounded),
            _ => Err(AppError::Validation(format!(
                "Unsupported logo shape: {}. Supported: square, circle, rounded",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ec_levels_in_standard_strength_order() {
        let percents: Vec<u8> = EcClass::all().iter().map(|c| c.percent()).collect();
        let mut sorted = percents.clone();
        sorted.sort_unstable();
        assert_eq!(percents, sorted);

        assert_eq!(EcClass::Low.ec_level(), EcLevel::L);
        assert_eq!(EcClass::Medium.ec_level(), EcLevel::M);
        assert_eq!(EcClass::High.ec_level(), EcLevel::Q);
        assert_eq!(EcClass::Max.ec_level(), EcLevel::H);
    }

    #[test]
    fn test_size_scale_monotonic() {
        let scales: Vec<u32> = SizeClass::all().iter().map(|s| s.module_px()).collect();
        assert!(scales.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_token_round_trip() {
        for size in SizeClass::all() {
            assert_eq!(size.as_str().parse::<SizeClass>().unwrap(), *size);
        }
        for ec in EcClass::all() {
            assert_eq!(ec.as_str().parse::<EcClass>().unwrap(), *ec);
        }
        for style in StyleClass::all() {
            assert_eq!(style.as_str().parse::<StyleClass>().unwrap(), *style);
        }
    }

    #[test]
    fn test_green_style_uses_circular_modules() {
        assert_eq!(StyleClass::Green.module_shape(), ModuleShape::Circle);
        assert_eq!(StyleClass::Green.fill_color(), Rgb([0, 128, 0]));
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        assert!("huge".parse::<SizeClass>().is_err());
        assert!("ultra".parse::<EcClass>().is_err());
        assert!("neon".parse::<StyleClass>().is_err());
        assert!("star".parse::<LogoShape>().is_err());
    }
}
