//! Wei ↔ ether conversions for balances and transfer amounts.

use primitive_types::U256;

/// Decimals of the native unit (1 ether = 10^18 wei).
pub const ETHER_DECIMALS: usize = 18;

/// Decimal places shown for balances.
pub const DISPLAY_DECIMALS: usize = 4;

/// Parses a JSON-RPC quantity (`0x`-prefixed hex) into a U256.
///
/// An empty quantity (`0x`) is treated as zero.
pub fn parse_quantity(quantity: &str) -> anyhow::Result<U256> {
    let digits = quantity
        .trim()
        .strip_prefix("0x")
        .or_else(|| quantity.trim().strip_prefix("0X"))
        .ok_or_else(|| anyhow::anyhow!("quantity '{}' is missing the 0x prefix", quantity))?;
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| anyhow::anyhow!("invalid hex quantity '{}': {:?}", quantity, e))
}

/// Formats a wei amount as ether with `decimals` fractional digits, rounding half up.
pub fn format_ether(wei: U256, decimals: usize) -> String {
    let decimals = decimals.min(ETHER_DECIMALS);
    let scale = U256::exp10(ETHER_DECIMALS - decimals);
    let half = scale / 2;
    let units = wei.saturating_add(half) / scale;

    if decimals == 0 {
        return units.to_string();
    }

    let unit = U256::exp10(decimals);
    let whole = units / unit;
    let frac = (units % unit).low_u64();
    format!("{}.{:0width$}", whole, frac, width = decimals)
}

/// Formats a wei balance the way the dashboard displays it (4 decimals).
pub fn format_balance(wei: U256) -> String {
    format_ether(wei, DISPLAY_DECIMALS)
}

/// Parses a decimal ether amount (e.g. `"0.25"`) into wei.
pub fn parse_ether(amount: &str) -> Result<U256, String> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err("amount is empty".to_string());
    }

    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(format!("'{}' is not a number", amount));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("'{}' is not a number", amount));
    }
    if frac.len() > ETHER_DECIMALS {
        return Err(format!(
            "'{}' has more than {} decimal places",
            amount, ETHER_DECIMALS
        ));
    }

    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).map_err(|e| format!("'{}' is out of range: {:?}", amount, e))?
    };
    let frac_wei = if frac.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{:0<width$}", frac, width = ETHER_DECIMALS);
        U256::from_dec_str(&padded).map_err(|e| format!("'{}' is out of range: {:?}", amount, e))?
    };

    whole
        .checked_mul(U256::exp10(ETHER_DECIMALS))
        .and_then(|w| w.checked_add(frac_wei))
        .ok_or_else(|| format!("'{}' is out of range", amount))
}
