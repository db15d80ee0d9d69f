//! Utility functions and helpers

use rust_decimal::Decimal;

/// Exchange symbol for a coin quoted in `quote`, e.g. `BTC` + `USDT` -> `BTCUSDT`
pub fn trading_pair(coin: &str, quote: &str) -> String {
    format!("{}{}", coin.trim().to_uppercase(), quote.trim().to_uppercase())
}

/// Treat empty or whitespace-only settings as unset
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Calculate percentage change, rounded to two places
pub fn calculate_percentage_change(old_value: Decimal, new_value: Decimal) -> Decimal {
    if old_value > Decimal::ZERO {
        ((new_value - old_value) / old_value * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trading_pair() {
        assert_eq!(trading_pair("btc", "USDT"), "BTCUSDT");
        assert_eq!(trading_pair(" eth ", "usdc"), "ETHUSDC");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some(" 100 ".to_string())), Some("100".to_string()));
    }

    #[test]
    fn test_calculate_percentage_change() {
        assert_eq!(calculate_percentage_change(dec!(100), dec!(101)), dec!(1.00));
        assert_eq!(calculate_percentage_change(dec!(200), dec!(150)), dec!(-25.00));
        assert_eq!(calculate_percentage_change(Decimal::ZERO, dec!(5)), Decimal::ZERO);
    }
}
