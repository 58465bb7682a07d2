//! Typed parameters of every action
//!
//! Field names follow the JSON the extraction prompts ask for. Each struct is
//! built through [`ObjectReader`], so a malformed model reply never reaches
//! a service.

use serde::Serialize;
use serde_json::Value;

use crate::schema::{ActionParams, ObjectReader, ValidationError};

macro_rules! params {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident: $ty:ty = $read:ident($key:literal)),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[doc = concat!("`", $key, "`")]
                pub $field: $ty,
            )*
        }

        impl ActionParams for $name {
            fn parse(value: &Value) -> Result<Self, ValidationError> {
                let mut reader = ObjectReader::new(value);
                $(let $field = reader.$read($key);)*
                reader.finish()?;
                Ok(Self { $($field),* })
            }
        }
    };
}

params! {
    /// HBAR balance query
    HbarBalanceParams {
        symbol: String = string("symbol"),
        address: String = string("address"),
    }
}

params! {
    /// Token balance query
    HtsBalanceParams {
        token_id: String = string("tokenId"),
        address: String = string("address"),
    }
}

params! {
    /// All token balances of an account
    AllBalancesParams {
        address: Option<String> = nullable_string("address"),
    }
}

params! {
    /// Holders of a token above an optional display-unit threshold
    TokenHoldersParams {
        token_id: String = string("tokenId"),
        threshold: Option<f64> = optional_number("threshold"),
    }
}

params! {
    /// HBAR transfer; the amount stays a string until conversion
    TransferHbarParams {
        amount: String = string("amount"),
        account_id: String = string("accountId"),
    }
}

params! {
    /// Fungible token transfer in display units
    TransferTokenParams {
        token_id: String = string("tokenId"),
        to_account_id: String = string("toAccountId"),
        amount: f64 = number("amount"),
    }
}

params! {
    /// Fungible token creation
    CreateTokenParams {
        name: String = string("name"),
        symbol: String = string("symbol"),
        decimals: f64 = number("decimals"),
        initial_supply: f64 = number("initialSupply"),
        is_supply_key: bool = boolean("isSupplyKey"),
        is_metadata_key: bool = boolean("isMetadataKey"),
        is_admin_key: bool = boolean("isAdminKey"),
        token_metadata: String = string_or_empty("tokenMetadata"),
        memo: String = string_or_empty("memo"),
    }
}

params! {
    /// Non-fungible token creation
    CreateNftParams {
        name: String = string("name"),
        symbol: String = string("symbol"),
        max_supply: Option<f64> = optional_number("maxSupply"),
        is_metadata_key: bool = boolean("isMetadataKey"),
        is_admin_key: bool = boolean("isAdminKey"),
        token_metadata: String = string_or_empty("tokenMetadata"),
        memo: String = string_or_empty("memo"),
    }
}

params! {
    /// Fungible mint in display units
    MintTokenParams {
        token_id: String = string("tokenId"),
        amount: f64 = number("amount"),
    }
}

params! {
    /// NFT mint
    MintNftParams {
        token_id: String = string("tokenId"),
        token_metadata: String = string("tokenMetadata"),
    }
}

params! {
    /// Association or dissociation of the operator account
    TokenAssociationParams {
        token_id: Option<String> = nullable_string("tokenId"),
    }
}

params! {
    /// Token rejection
    RejectTokenParams {
        token_id: String = string("tokenId"),
    }
}

params! {
    /// Airdrop of the same display amount to every recipient
    AirdropTokenParams {
        token_id: String = string("tokenId"),
        recipients: Vec<String> = string_array("recipients"),
        amount: f64 = number("amount"),
    }
}

params! {
    /// Pending airdrops of an account
    PendingAirdropsParams {
        account_id: Option<String> = nullable_string("accountId"),
    }
}

params! {
    /// Claim of a pending airdrop
    ClaimAirdropParams {
        sender_id: String = string("senderId"),
        token_id: String = string("tokenId"),
    }
}

params! {
    /// Topic creation
    CreateTopicParams {
        memo: String = string("memo"),
        is_submit_key: bool = boolean("isSubmitKey"),
    }
}

params! {
    /// Topic deletion or lookup
    TopicIdParams {
        topic_id: String = string("topicId"),
    }
}

params! {
    /// Message submission
    SubmitTopicMessageParams {
        topic_id: String = string("topicId"),
        message: String = string("message"),
    }
}

params! {
    /// Message listing with optional date bounds
    GetTopicMessagesParams {
        topic_id: String = string("topicId"),
        lower_threshold: Option<String> = nullable_string("lowerThreshold"),
        upper_threshold: Option<String> = nullable_string("upperThreshold"),
    }
}

params! {
    /// HBAR or token allowance in display units
    SpendingApprovalParams {
        spender_account_id: String = string("spenderAccountId"),
        amount: f64 = number("amount"),
        token_id: Option<String> = nullable_string("tokenId"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_token_id_is_absent() {
        let params = TokenAssociationParams::parse(&json!({ "tokenId": "null" })).unwrap();
        assert_eq!(params.token_id, None);
    }

    #[test]
    fn test_create_token_normalization() {
        let params = CreateTokenParams::parse(&json!({
            "name": "HederaDollar",
            "symbol": "H$",
            "decimals": "4",
            "initialSupply": 1000000,
            "isSupplyKey": "true",
            "isMetadataKey": false,
            "tokenMetadata": "null",
            "memo": null
        }))
        .unwrap();

        assert_eq!(params.decimals, 4.0);
        assert_eq!(params.initial_supply, 1_000_000.0);
        assert!(params.is_supply_key);
        assert!(!params.is_metadata_key);
        assert!(!params.is_admin_key);
        assert_eq!(params.token_metadata, "");
        assert_eq!(params.memo, "");
    }

    #[test]
    fn test_transfer_hbar_amount_must_be_string() {
        let err = TransferHbarParams::parse(&json!({ "amount": 1.5, "accountId": "0.0.2" }))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Field \"amount\" failed validation: expected string, received number"
        );
    }

    #[test]
    fn test_airdrop_recipients() {
        let params = AirdropTokenParams::parse(&json!({
            "tokenId": "0.0.5425085",
            "recipients": ["0.0.5398121"],
            "amount": "50"
        }))
        .unwrap();
        assert_eq!(params.recipients, vec!["0.0.5398121"]);
        assert_eq!(params.amount, 50.0);

        assert!(AirdropTokenParams::parse(&json!({
            "tokenId": "0.0.5425085",
            "recipients": "0.0.5398121",
            "amount": 50
        }))
        .is_err());
    }

    #[test]
    fn test_topic_messages_optional_bounds() {
        let params = GetTopicMessagesParams::parse(&json!({
            "topicId": "0.0.5464449",
            "lowerThreshold": "2025-01-02",
            "upperThreshold": null
        }))
        .unwrap();
        assert_eq!(params.lower_threshold.as_deref(), Some("2025-01-02"));
        assert_eq!(params.upper_threshold, None);
    }

    #[test]
    fn test_spending_approval_requires_amount() {
        let err = SpendingApprovalParams::parse(&json!({ "spenderAccountId": "0.0.1" }))
            .unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "amount");
    }
}
