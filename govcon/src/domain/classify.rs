use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{AlertSeverity, FundingWarningLevel, PortfolioHealth};

/// Palette shared by every status badge and bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayColor {
    Gray,
    Green,
    Yellow,
    Blue,
    Orange,
    Red,
}

impl DisplayColor {
    pub fn hex(&self) -> &'static str {
        match self {
            DisplayColor::Gray => "#9ca3af",
            DisplayColor::Green => "#10b981",
            DisplayColor::Yellow => "#f59e0b",
            DisplayColor::Blue => "#3b82f6",
            DisplayColor::Orange => "#f97316",
            DisplayColor::Red => "#ef4444",
        }
    }
}

pub fn allocation_color(allocation_percentage: Decimal) -> DisplayColor {
    if allocation_percentage.is_zero() {
        DisplayColor::Gray
    } else if allocation_percentage < dec!(50) {
        DisplayColor::Green
    } else if allocation_percentage < dec!(80) {
        DisplayColor::Yellow
    } else if allocation_percentage < dec!(100) {
        DisplayColor::Blue
    } else {
        DisplayColor::Red
    }
}

pub fn margin_color(margin: Decimal) -> DisplayColor {
    if margin < Decimal::ZERO {
        DisplayColor::Red
    } else if margin < dec!(10) {
        DisplayColor::Yellow
    } else if margin < dec!(20) {
        DisplayColor::Blue
    } else {
        DisplayColor::Green
    }
}

pub fn warning_color(level: FundingWarningLevel) -> DisplayColor {
    match level {
        FundingWarningLevel::Critical => DisplayColor::Red,
        FundingWarningLevel::High => DisplayColor::Orange,
        FundingWarningLevel::Medium => DisplayColor::Yellow,
        FundingWarningLevel::Low => DisplayColor::Blue,
        FundingWarningLevel::None => DisplayColor::Green,
    }
}

pub fn health_color(health: PortfolioHealth) -> DisplayColor {
    match health {
        PortfolioHealth::Excellent => DisplayColor::Green,
        PortfolioHealth::Good => DisplayColor::Blue,
        PortfolioHealth::Fair => DisplayColor::Yellow,
        PortfolioHealth::Poor => DisplayColor::Orange,
        PortfolioHealth::Critical => DisplayColor::Red,
    }
}

pub fn severity_color(severity: AlertSeverity) -> DisplayColor {
    match severity {
        AlertSeverity::Critical => DisplayColor::Red,
        AlertSeverity::High => DisplayColor::Orange,
        AlertSeverity::Warning => DisplayColor::Yellow,
        AlertSeverity::Info => DisplayColor::Blue,
    }
}

impl FundingWarningLevel {
    pub fn marker(&self) -> &'static str {
        match self {
            FundingWarningLevel::Critical => "✖",
            FundingWarningLevel::High => "▲",
            FundingWarningLevel::Medium => "●",
            FundingWarningLevel::Low => "○",
            FundingWarningLevel::None => "✔",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_bands() {
        assert_eq!(allocation_color(Decimal::ZERO), DisplayColor::Gray);
        assert_eq!(allocation_color(dec!(25)), DisplayColor::Green);
        assert_eq!(allocation_color(dec!(50)), DisplayColor::Yellow);
        assert_eq!(allocation_color(dec!(79.9)), DisplayColor::Yellow);
        assert_eq!(allocation_color(dec!(80)), DisplayColor::Blue);
        assert_eq!(allocation_color(dec!(100)), DisplayColor::Red);
        assert_eq!(allocation_color(dec!(120)), DisplayColor::Red);
    }

    #[test]
    fn margin_bands() {
        assert_eq!(margin_color(dec!(-0.01)), DisplayColor::Red);
        assert_eq!(margin_color(Decimal::ZERO), DisplayColor::Yellow);
        assert_eq!(margin_color(dec!(10)), DisplayColor::Blue);
        assert_eq!(margin_color(dec!(20)), DisplayColor::Green);
    }

    #[test]
    fn warning_and_severity_share_palette() {
        assert_eq!(warning_color(FundingWarningLevel::Critical), DisplayColor::Red);
        assert_eq!(severity_color(AlertSeverity::Critical), DisplayColor::Red);
        assert_eq!(warning_color(FundingWarningLevel::High), DisplayColor::Orange);
        assert_eq!(severity_color(AlertSeverity::High), DisplayColor::Orange);
        assert_eq!(warning_color(FundingWarningLevel::None), DisplayColor::Green);
        assert_eq!(health_color(PortfolioHealth::Fair), DisplayColor::Yellow);
    }
}
