//! Mint event ABI, log filter and decoding.

use alloy::primitives::{Address, B256};
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;

use crate::blockchain::types::MintEvent;

/// Event layouts emitted by the watched contract family.
pub mod abi {
    /// `Mint(address,uint256)`
    pub mod plain {
        alloy::sol! {
            /// Emitted when tokens are minted.
            #[derive(Debug)]
            event Mint(address indexed to, uint256 amount);
        }
    }

    /// `Mint(address,uint256,uint256)`
    pub mod with_deposit {
        alloy::sol! {
            /// Emitted when tokens are minted against a deposit.
            #[derive(Debug)]
            event Mint(address indexed to, uint256 amount, uint256 deposit);
        }
    }
}

/// Topic0 values of every supported Mint layout.
pub fn mint_topics() -> Vec<B256> {
    vec![
        abi::plain::Mint::SIGNATURE_HASH,
        abi::with_deposit::Mint::SIGNATURE_HASH,
    ]
}

/// Filter matching Mint logs of one contract.
pub fn mint_filter(contract: Address) -> Filter {
    Filter::new().address(contract).event_signature(mint_topics())
}

/// Decode a log into a `MintEvent`.
///
/// Returns `None` for logs of other events and for logs removed by a reorg.
pub fn decode_mint(log: &Log) -> Option<MintEvent> {
    if log.removed {
        return None;
    }

    let tx_hash = log.transaction_hash.map(|h| h.to_string());
    let block_number = log.block_number;

    if let Ok(decoded) = log.log_decode::<abi::plain::Mint>() {
        let event = decoded.inner.data;
        return Some(MintEvent {
            minter: event.to,
            amount: event.amount,
            deposit: None,
            tx_hash,
            block_number,
        });
    }

    if let Ok(decoded) = log.log_decode::<abi::with_deposit::Mint>() {
        let event = decoded.inner.data;
        return Some(MintEvent {
            minter: event.to,
            amount: event.amount,
            deposit: Some(event.deposit),
            tx_hash,
            block_number,
        });
    }

    None
}
