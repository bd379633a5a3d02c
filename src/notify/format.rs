//! Amount formatting and caption rendering.

use alloy::primitives::U256;

use crate::blockchain::types::MintEvent;
use crate::config::{TelegramConfig, TokenConfig};

/// Render base units as a decimal string.
///
/// Trailing fractional zeros are trimmed but one fractional digit is always
/// kept, so one whole token prints as `1.0`.
pub fn format_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return format!("{}.0", amount);
    }

    // Past 77 decimals the scale no longer fits in a U256, and every amount
    // is a pure fraction.
    let (whole, fraction) = match U256::from(10u64).checked_pow(U256::from(decimals)) {
        Some(scale) => (amount / scale, amount % scale),
        None => (U256::ZERO, amount),
    };

    let padded = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');
    let fraction = if trimmed.is_empty() { "0" } else { trimmed };

    format!("{}.{}", whole, fraction)
}

/// Caption layout for Mint notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub symbol: String,
    pub token_name: String,
    pub decimals: u8,
    pub explorer_tx_base: String,
}

impl MessageTemplate {
    pub fn new(token: &TokenConfig, telegram: &TelegramConfig) -> Self {
        Self {
            symbol: token.symbol.clone(),
            token_name: token.name.clone(),
            decimals: token.decimals,
            explorer_tx_base: telegram.explorer_tx_base.clone(),
        }
    }

    /// Explorer deep link for a transaction.
    pub fn tx_link(&self, tx_hash: &str) -> String {
        format!("{}{}", self.explorer_tx_base, tx_hash)
    }

    /// Markdown caption for one event.
    pub fn caption(&self, event: &MintEvent) -> String {
        let amount = format_units(event.amount, self.decimals);

        let mut caption = format!(
            "💀 *{} was just berthed!*\n\n*{}* of {} was minted to `{}`.",
            self.symbol, amount, self.token_name, event.minter
        );

        if let Some(deposit) = event.deposit {
            caption.push_str(&format!(
                "\nDeposit: *{}*",
                format_units(deposit, self.decimals)
            ));
        }

        if let Some(tx_hash) = &event.tx_hash {
            caption.push_str(&format!("\n\n[Link to Transaction]({})", self.tx_link(tx_hash)));
        }

        caption
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::new(&TokenConfig::default(), &TelegramConfig::default())
    }
}
