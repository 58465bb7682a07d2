//! Services behind the actions
//!
//! A service checks that the fields it needs are present, converts display
//! amounts to base units, and calls exactly one ledger operation. Results
//! come back unmodified apart from the receipt-status check.

pub mod airdrop;
pub mod balance;
pub mod token;
pub mod topic;
pub mod transfer;

pub use airdrop::{AirdropService, PendingAirdropView};
pub use balance::{BalanceService, HbarBalance, HoldersReport, HtsBalance};
pub use token::TokenService;
pub use topic::{format_topic_info, TopicMessages, TopicService};
pub use transfer::TransferService;

use std::str::FromStr;

use crate::error::{require, Result};

/// Parse a required identifier, failing with `missing` when it is blank
pub(crate) fn required_id<T>(raw: &str, missing: &str) -> Result<T>
where
    T: FromStr<Err = hedera_agent_core::Error>,
{
    Ok(require(raw, missing)?.parse()?)
}
