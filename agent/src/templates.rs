//! Extraction prompts, one per action
//!
//! Every prompt opens with the last user message and closes by asking for a
//! fenced JSON object. Values the user did not mention are requested as
//! `null`, which the parameter readers map back to absent fields.

macro_rules! prompt {
    ($body:expr) => {
        concat!(
            "Given the last message:\n{{lastMessage}}\n\n",
            $body,
            "\n\nOnly use the last message. Never reuse values from requests that were already completed.\n",
            "Now respond with a JSON markdown block containing only the extracted values.\n"
        )
    };
}

/// `HEDERA_HBAR_BALANCE`
pub const HBAR_BALANCE: &str = prompt!(
    r#"Extract the account whose HBAR balance is requested:
1. **symbol**: always the string "HBAR".
2. **address**: Hedera account id in the form "0.0.NUMBER". If the user asks for their own balance, use the wallet address mentioned in the conversation.

```json
{
    "symbol": "HBAR",
    "address": string
}
```

Example for "What's the HBAR balance of 0.0.4515512?":
```json
{ "symbol": "HBAR", "address": "0.0.4515512" }
```"#
);

/// `HEDERA_HTS_BALANCE`
pub const HTS_BALANCE: &str = prompt!(
    r#"Extract the token and account of the requested token balance:
1. **tokenId**: id of the token, e.g. "0.0.5424086".
2. **address**: Hedera account id of the holder, e.g. "0.0.4515512".

```json
{
    "tokenId": string,
    "address": string
}
```

Example for "Show balance of token 0.0.5424086 for 0.0.4515512":
```json
{ "tokenId": "0.0.5424086", "address": "0.0.4515512" }
```"#
);

/// `HEDERA_ALL_BALANCES`
pub const ALL_BALANCES: &str = prompt!(
    r#"Extract the account whose token balances are requested.
1. **address**: Hedera account id such as "0.0.4515512". Use null when the user asks about their own wallet without giving an id.

```json
{
    "address": string | null
}
```

Example for "Show me all my token balances":
```json
{ "address": null }
```

Example for "What tokens does 0.0.5393076 hold?":
```json
{ "address": "0.0.5393076" }
```"#
);

/// `HEDERA_TOKEN_HOLDERS`
pub const TOKEN_HOLDERS: &str = prompt!(
    r#"Extract the token whose holders are requested and the optional minimum balance:
1. **tokenId**: id of the token, e.g. "0.0.5424086".
2. **threshold**: minimum balance in display units as a number, or null when no threshold is given.

```json
{
    "tokenId": string,
    "threshold": number | null
}
```

Example for "Who holds more than 1000 of token 0.0.5424086?":
```json
{ "tokenId": "0.0.5424086", "threshold": 1000 }
```"#
);

/// `TRANSFER_HBAR`
pub const TRANSFER_HBAR: &str = prompt!(
    r#"Extract the requested HBAR transfer:
1. **amount**: the numeric amount of HBAR as a string, without the symbol, e.g. "0.0001".
2. **accountId**: recipient account id in the form "0.0.NUMBER", as a string.

```json
{
    "amount": string,
    "accountId": string
}
```

Example for "Send 0.10 HBAR to 0.0.4515512":
```json
{ "amount": "0.10", "accountId": "0.0.4515512" }
```"#
);

/// `TRANSFER_TOKEN`
pub const TRANSFER_TOKEN: &str = prompt!(
    r#"Extract the requested token transfer:
1. **tokenId**: id of the token to send, e.g. "0.0.5425085".
2. **toAccountId**: recipient account id, e.g. "0.0.4515512".
3. **amount**: amount in display units as a decimal number.

```json
{
    "tokenId": string,
    "toAccountId": string,
    "amount": number
}
```

Example for "Transfer 3.10 of token 0.0.5425085 to 0.0.4515512":
```json
{ "tokenId": "0.0.5425085", "toAccountId": "0.0.4515512", "amount": 3.10 }
```"#
);

/// `HEDERA_CREATE_TOKEN`
pub const CREATE_TOKEN: &str = prompt!(
    r#"Extract the fungible token to create:
1. **name**: token name.
2. **symbol**: token symbol in capital letters.
3. **decimals**: number of decimals.
4. **initialSupply**: initial supply in display units.
5. **isSupplyKey**: true only when the user explicitly asks to set the supply key, false otherwise.
6. **isMetadataKey**: true only when the user explicitly asks to set the metadata key, false otherwise.
7. **isAdminKey**: true only when the user explicitly asks to set the admin key, false otherwise.
8. **tokenMetadata**: metadata string, or null when not given.
9. **memo**: memo string, or null when not given.

```json
{
    "name": string,
    "symbol": string,
    "decimals": number,
    "initialSupply": number,
    "isSupplyKey": boolean,
    "isMetadataKey": boolean,
    "isAdminKey": boolean,
    "tokenMetadata": string | null,
    "memo": string | null
}
```

Example for "Create token GameGold with symbol GG, 2 decimals and 750000 supply, set the supply key":
```json
{
    "name": "GameGold",
    "symbol": "GG",
    "decimals": 2,
    "initialSupply": 750000,
    "isSupplyKey": true,
    "isMetadataKey": false,
    "isAdminKey": false,
    "tokenMetadata": null,
    "memo": null
}
```"#
);

/// `HEDERA_CREATE_NFT_TOKEN`
pub const CREATE_NFT_TOKEN: &str = prompt!(
    r#"Extract the non-fungible token to create:
1. **name**: token name.
2. **symbol**: token symbol in capital letters.
3. **maxSupply**: maximum number of NFTs as a number, or null for an infinite supply.
4. **isMetadataKey**: true only when the user explicitly asks to set the metadata key, false otherwise.
5. **isAdminKey**: true only when the user explicitly asks to set the admin key, false otherwise.
6. **tokenMetadata**: metadata string, or null when not given.
7. **memo**: memo string, or null when not given.

```json
{
    "name": string,
    "symbol": string,
    "maxSupply": number | null,
    "isMetadataKey": boolean,
    "isAdminKey": boolean,
    "tokenMetadata": string | null,
    "memo": string | null
}
```

Example for "Create NFT collection Pixels with symbol PXL and max supply 500":
```json
{
    "name": "Pixels",
    "symbol": "PXL",
    "maxSupply": 500,
    "isMetadataKey": false,
    "isAdminKey": false,
    "tokenMetadata": null,
    "memo": null
}
```"#
);

/// `HEDERA_MINT_TOKEN`
pub const MINT_TOKEN: &str = prompt!(
    r#"Extract the fungible token mint:
1. **tokenId**: id of the token, e.g. "0.0.5478715".
2. **amount**: amount to mint in display units as a number.

```json
{
    "tokenId": string,
    "amount": number
}
```

Example for "Mint 2500 of token 0.0.5478715":
```json
{ "tokenId": "0.0.5478715", "amount": 2500 }
```"#
);

/// `HEDERA_MINT_NFT_TOKEN`
pub const MINT_NFT_TOKEN: &str = prompt!(
    r#"Extract the NFT mint:
1. **tokenId**: id of the NFT token, e.g. "0.0.5478715".
2. **tokenMetadata**: metadata of the new NFT as a string, usually a URL.

```json
{
    "tokenId": string,
    "tokenMetadata": string
}
```

Example for "Mint NFT 0.0.5478715 with metadata ipfs://bafy/1.json":
```json
{ "tokenId": "0.0.5478715", "tokenMetadata": "ipfs://bafy/1.json" }
```"#
);

/// `HEDERA_ASSOCIATE_TOKEN`
pub const ASSOCIATE_TOKEN: &str = prompt!(
    r#"Extract the token the wallet should be associated with:
1. **tokenId**: id of the token, e.g. "0.0.5450181", or null when none is given.

```json
{
    "tokenId": string | null
}
```

Example for "Associate my wallet with token 0.0.5450181":
```json
{ "tokenId": "0.0.5450181" }
```"#
);

/// `HEDERA_DISSOCIATE_TOKEN`
pub const DISSOCIATE_TOKEN: &str = prompt!(
    r#"Extract the token the wallet should be dissociated from:
1. **tokenId**: id of the token, e.g. "0.0.5450181", or null when none is given.

```json
{
    "tokenId": string | null
}
```

Example for "Dissociate token 0.0.5450181 from my account":
```json
{ "tokenId": "0.0.5450181" }
```"#
);

/// `HEDERA_REJECT_TOKEN`
pub const REJECT_TOKEN: &str = prompt!(
    r#"Extract the token to reject:
1. **tokenId**: id of the token, e.g. "0.0.5424086".

```json
{
    "tokenId": string
}
```

Example for "Reject the airdropped token 0.0.5424086":
```json
{ "tokenId": "0.0.5424086" }
```"#
);

/// `HEDERA_AIRDROP_TOKEN`
pub const AIRDROP_TOKEN: &str = prompt!(
    r#"Extract the token airdrop from the newest message in:
{{recentMessages}}

1. **tokenId**: id of the token to airdrop.
2. **recipients**: array of recipient account ids, at most 10. A single recipient is still a one-element array.
3. **amount**: amount each recipient receives, in display units, as a number.

```json
{
    "tokenId": string,
    "recipients": string[],
    "amount": number
}
```

Example for "Airdrop 50 tokens 0.0.5425085 to 0.0.5398121 and 0.0.5393967":
```json
{ "tokenId": "0.0.5425085", "recipients": ["0.0.5398121", "0.0.5393967"], "amount": 50 }
```"#
);

/// `HEDERA_PENDING_AIRDROPS`
pub const PENDING_AIRDROPS: &str = prompt!(
    r#"Extract the account whose pending airdrops are requested:
1. **accountId**: account id made of digits and dots, e.g. "0.0.5422268", or null when the message does not name one.

```json
{
    "accountId": string | null
}
```

Example for "Show me my pending airdrops":
```json
{ "accountId": null }
```

Example for "Show pending airdrops for 0.0.4515756":
```json
{ "accountId": "0.0.4515756" }
```"#
);

/// `HEDERA_CLAIM_AIRDROP`
pub const CLAIM_AIRDROP: &str = prompt!(
    r#"Extract the pending airdrop to claim. Messages usually look like "Claim airdrop (1) 5 Tokens (TOKEN_ID) from SENDER_ID".
1. **senderId**: account id of the sender, e.g. "0.0.5393076".
2. **tokenId**: id of the airdropped token, e.g. "0.0.5445766".

```json
{
    "senderId": string,
    "tokenId": string
}
```

Example for "Claim airdrop (1) 5 Tokens (0.0.5445766) from 0.0.5393076":
```json
{ "senderId": "0.0.5393076", "tokenId": "0.0.5445766" }
```"#
);

/// `HEDERA_CREATE_TOPIC`
pub const CREATE_TOPIC: &str = prompt!(
    r#"Extract the topic to create:
1. **memo**: memo or description of the topic.
2. **isSubmitKey**: true only when the user wants submissions restricted to their key, false otherwise.

```json
{
    "memo": string,
    "isSubmitKey": boolean
}
```

Example for "Create a private topic with memo weather reports":
```json
{ "memo": "weather reports", "isSubmitKey": true }
```"#
);

/// `HEDERA_DELETE_TOPIC`
pub const DELETE_TOPIC: &str = prompt!(
    r#"Extract the topic to delete:
1. **topicId**: id of the topic, e.g. "0.0.5464449".

```json
{
    "topicId": string
}
```

Example for "Delete topic 0.0.5464449":
```json
{ "topicId": "0.0.5464449" }
```"#
);

/// `HEDERA_TOPIC_INFO`
pub const TOPIC_INFO: &str = prompt!(
    r#"Extract the topic whose details are requested:
1. **topicId**: id of the topic, e.g. "0.0.5464449".

```json
{
    "topicId": string
}
```

Example for "Give me info about topic 0.0.5464449":
```json
{ "topicId": "0.0.5464449" }
```"#
);

/// `HEDERA_SUBMIT_TOPIC_MESSAGE`
pub const SUBMIT_TOPIC_MESSAGE: &str = prompt!(
    r#"Extract the message to post:
1. **topicId**: id of the topic, e.g. "0.0.5464449".
2. **message**: the exact text to post, without surrounding quotes.

```json
{
    "topicId": string,
    "message": string
}
```

Example for "Submit message 'hello world' to topic 0.0.5464449":
```json
{ "topicId": "0.0.5464449", "message": "hello world" }
```"#
);

/// `HEDERA_GET_TOPIC_MESSAGES`
pub const GET_TOPIC_MESSAGES: &str = prompt!(
    r#"Extract the topic and the optional time range of the requested messages:
1. **topicId**: id of the topic, e.g. "0.0.5464449".
2. **lowerThreshold**: start of the range as an ISO-8601 date or datetime, or null.
3. **upperThreshold**: end of the range as an ISO-8601 date or datetime, or null.

```json
{
    "topicId": string,
    "lowerThreshold": string | null,
    "upperThreshold": string | null
}
```

Example for "Show messages from topic 0.0.5464449 posted after 2025-01-02":
```json
{ "topicId": "0.0.5464449", "lowerThreshold": "2025-01-02", "upperThreshold": null }
```"#
);

/// `HEDERA_SET_SPENDING_APPROVAL`
pub const SET_SPENDING_APPROVAL: &str = prompt!(
    r#"Extract the spending approval from the newest message in:
{{recentMessages}}

1. **spenderAccountId**: account id allowed to spend, e.g. "0.0.4515512".
2. **amount**: approved amount in display units, as a number.
3. **tokenId**: id of the token, or null when the approval is for HBAR.

```json
{
    "spenderAccountId": string,
    "amount": number,
    "tokenId": string | null
}
```

Example for "Approve 0.0.4515512 to spend 12.5 HBAR":
```json
{ "spenderAccountId": "0.0.4515512", "amount": 12.5, "tokenId": null }
```"#
);

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 22] = [
        HBAR_BALANCE,
        HTS_BALANCE,
        ALL_BALANCES,
        TOKEN_HOLDERS,
        TRANSFER_HBAR,
        TRANSFER_TOKEN,
        CREATE_TOKEN,
        CREATE_NFT_TOKEN,
        MINT_TOKEN,
        MINT_NFT_TOKEN,
        ASSOCIATE_TOKEN,
        DISSOCIATE_TOKEN,
        REJECT_TOKEN,
        AIRDROP_TOKEN,
        PENDING_AIRDROPS,
        CLAIM_AIRDROP,
        CREATE_TOPIC,
        DELETE_TOPIC,
        TOPIC_INFO,
        SUBMIT_TOPIC_MESSAGE,
        GET_TOPIC_MESSAGES,
        SET_SPENDING_APPROVAL,
    ];

    #[test]
    fn test_templates_share_frame() {
        for template in ALL {
            assert!(template.starts_with("Given the last message:\n{{lastMessage}}"));
            assert!(template.contains("```json"));
            assert!(template.ends_with("containing only the extracted values.\n"));
        }
    }

    #[test]
    fn test_history_templates() {
        assert!(AIRDROP_TOKEN.contains("{{recentMessages}}"));
        assert!(SET_SPENDING_APPROVAL.contains("{{recentMessages}}"));
        assert!(!TRANSFER_HBAR.contains("{{recentMessages}}"));
    }
}
