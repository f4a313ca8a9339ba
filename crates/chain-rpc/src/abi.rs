//! Fixed ABI encoding for the enumerated contract calls.
//!
//! Only the call shapes the client actually issues are supported: static
//! `address`/`uint256` words plus the one trailing dynamic `bytes` argument
//! of `investInSymbiotic`. Selectors are derived from the canonical
//! signature strings (first four bytes of Keccak-256).

use sha3::{Digest, Keccak256};

use basevault_core::chain::{Address, UserPosition, WriteCall};

use crate::errors::RpcClientError;

pub const SIG_USER: &str = "user(address)";
pub const SIG_BALANCE_OF: &str = "balanceOf(address)";
pub const SIG_ALLOWANCE: &str = "allowance(address,address)";
pub const SIG_MIN_STAKING_TIME: &str = "minStakingTime()";
pub const SIG_APPROVE: &str = "approve(address,uint256)";
pub const SIG_DEPOSIT: &str = "deposit(uint256,address,uint256)";
pub const SIG_REDEEM: &str = "redeem(address,address)";
pub const SIG_INVEST_IN_SYMBIOTIC: &str = "investInSymbiotic(uint256,address,bytes)";

const WORD: usize = 32;

/// First four bytes of the Keccak-256 of a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

fn address_word(address: &Address) -> Result<[u8; WORD], RpcClientError> {
    let raw = hex::decode(address.as_str().trim_start_matches("0x"))?;
    if raw.len() != 20 {
        return Err(RpcClientError::Abi(format!(
            "address {address} is not 20 bytes"
        )));
    }
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(&raw);
    Ok(word)
}

fn u128_word(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn u64_word(value: u64) -> [u8; WORD] {
    u128_word(u128::from(value))
}

// === Read-call data ===

pub fn encode_user(address: &Address) -> Result<Vec<u8>, RpcClientError> {
    let mut data = selector(SIG_USER).to_vec();
    data.extend_from_slice(&address_word(address)?);
    Ok(data)
}

pub fn encode_balance_of(address: &Address) -> Result<Vec<u8>, RpcClientError> {
    let mut data = selector(SIG_BALANCE_OF).to_vec();
    data.extend_from_slice(&address_word(address)?);
    Ok(data)
}

pub fn encode_allowance(owner: &Address, spender: &Address) -> Result<Vec<u8>, RpcClientError> {
    let mut data = selector(SIG_ALLOWANCE).to_vec();
    data.extend_from_slice(&address_word(owner)?);
    data.extend_from_slice(&address_word(spender)?);
    Ok(data)
}

pub fn encode_min_staking_time() -> Vec<u8> {
    selector(SIG_MIN_STAKING_TIME).to_vec()
}

// === Write-call data ===

/// Encodes a typed write call into transaction input data.
pub fn encode_write(call: &WriteCall) -> Result<Vec<u8>, RpcClientError> {
    match call {
        WriteCall::Approve { spender, amount } => {
            let mut data = selector(SIG_APPROVE).to_vec();
            data.extend_from_slice(&address_word(spender)?);
            data.extend_from_slice(&u128_word(*amount));
            Ok(data)
        }
        WriteCall::Deposit {
            assets,
            receiver,
            target_timestamp,
        } => {
            let mut data = selector(SIG_DEPOSIT).to_vec();
            data.extend_from_slice(&u128_word(*assets));
            data.extend_from_slice(&address_word(receiver)?);
            data.extend_from_slice(&u64_word(*target_timestamp));
            Ok(data)
        }
        WriteCall::Redeem { receiver, owner } => {
            let mut data = selector(SIG_REDEEM).to_vec();
            data.extend_from_slice(&address_word(receiver)?);
            data.extend_from_slice(&address_word(owner)?);
            Ok(data)
        }
        WriteCall::InvestInSymbiotic {
            amount,
            target,
            payload,
        } => {
            let mut data = selector(SIG_INVEST_IN_SYMBIOTIC).to_vec();
            data.extend_from_slice(&u128_word(*amount));
            data.extend_from_slice(&address_word(target)?);
            // Offset of the dynamic bytes argument: three head words.
            data.extend_from_slice(&u64_word(3 * WORD as u64));
            data.extend_from_slice(&u64_word(payload.len() as u64));
            data.extend_from_slice(payload);
            let padding = (WORD - payload.len() % WORD) % WORD;
            data.extend_from_slice(&vec![0u8; padding]);
            Ok(data)
        }
    }
}

/// Renders call data as a `0x`-prefixed hex string for the wire.
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

// === Response decoding ===

fn strip_prefix(data: &str) -> &str {
    data.strip_prefix("0x").unwrap_or(data)
}

fn decode_word(word: &[u8]) -> Result<u128, RpcClientError> {
    if word.len() != WORD {
        return Err(RpcClientError::MalformedResponse(format!(
            "expected a 32-byte word, got {} bytes",
            word.len()
        )));
    }
    if word[..16].iter().any(|b| *b != 0) {
        return Err(RpcClientError::MalformedResponse(
            "uint256 value exceeds u128 range".to_string(),
        ));
    }
    let mut raw = [0u8; 16];
    raw.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(raw))
}

/// Decodes a single `uint256` return value.
pub fn decode_u256(data: &str) -> Result<u128, RpcClientError> {
    let raw = hex::decode(strip_prefix(data))?;
    decode_word(&raw)
}

/// Decodes a `uint256` return value that must fit in 64 bits.
pub fn decode_u64(data: &str) -> Result<u64, RpcClientError> {
    u64::try_from(decode_u256(data)?).map_err(|_| {
        RpcClientError::MalformedResponse("uint256 value exceeds u64 range".to_string())
    })
}

/// Decodes the four-word `user(address)` return tuple.
pub fn decode_user_position(data: &str) -> Result<UserPosition, RpcClientError> {
    let raw = hex::decode(strip_prefix(data))?;
    if raw.len() != 4 * WORD {
        return Err(RpcClientError::MalformedResponse(format!(
            "expected 4 words for a position, got {} bytes",
            raw.len()
        )));
    }
    Ok(UserPosition {
        vesting: decode_word(&raw[..WORD])?,
        amount: decode_word(&raw[WORD..2 * WORD])?,
        invested: decode_word(&raw[2 * WORD..3 * WORD])?,
        extracted: decode_word(&raw[3 * WORD..])?,
    })
}

/// Parses a JSON-RPC quantity (`0x`-prefixed, no leading zeros) into a u64.
pub fn decode_quantity(data: &str) -> Result<u64, RpcClientError> {
    u64::from_str_radix(strip_prefix(data), 16).map_err(|e| {
        RpcClientError::MalformedResponse(format!("invalid quantity '{data}': {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(fill: char) -> Address {
        Address::parse(&format!("0x{}", fill.to_string().repeat(40))).unwrap()
    }

    #[test]
    fn test_selectors_match_known_values() {
        assert_eq!(hex::encode(selector(SIG_APPROVE)), "095ea7b3");
        assert_eq!(hex::encode(selector(SIG_BALANCE_OF)), "70a08231");
        assert_eq!(hex::encode(selector(SIG_ALLOWANCE)), "dd62ed3e");
        assert_eq!(hex::encode(selector(SIG_USER)), "81e7e20e");
        assert_eq!(hex::encode(selector(SIG_MIN_STAKING_TIME)), "c057eca7");
        assert_eq!(hex::encode(selector(SIG_DEPOSIT)), "bc157ac1");
        assert_eq!(hex::encode(selector(SIG_REDEEM)), "bba06f27");
        assert_eq!(hex::encode(selector(SIG_INVEST_IN_SYMBIOTIC)), "eee7d949");
    }

    #[test]
    fn test_encode_approve() {
        let call = WriteCall::Approve {
            spender: addr('b'),
            amount: 50_000_000,
        };
        let data = encode_write(&call).unwrap();
        assert_eq!(
            hex::encode(&data),
            format!(
                "095ea7b3\
                 000000000000000000000000{}\
                 0000000000000000000000000000000000000000000000000000000002faf080",
                "b".repeat(40)
            )
        );
    }

    #[test]
    fn test_encode_deposit_word_layout() {
        let call = WriteCall::Deposit {
            assets: 50_000_000,
            receiver: addr('a'),
            target_timestamp: 1_702_592_000,
        };
        let data = encode_write(&call).unwrap();
        assert_eq!(data.len(), 4 + 3 * 32);
        assert_eq!(&data[..4], &selector(SIG_DEPOSIT));
        // assets in word 0, receiver in word 1, timestamp in word 2
        assert_eq!(decode_word(&data[4..36]).unwrap(), 50_000_000);
        assert_eq!(&data[48..56], hex::decode("aaaaaaaaaaaaaaaa").unwrap().as_slice());
        assert_eq!(decode_word(&data[68..100]).unwrap(), 1_702_592_000);
    }

    #[test]
    fn test_encode_invest_pads_dynamic_payload() {
        let call = WriteCall::InvestInSymbiotic {
            amount: 1_000_000,
            target: addr('c'),
            payload: vec![0xde, 0xad, 0xbe, 0xef],
        };
        let data = encode_write(&call).unwrap();
        // selector + 3 head words + length word + one padded payload word
        assert_eq!(data.len(), 4 + 5 * 32);
        // offset points past the head
        assert_eq!(decode_word(&data[68..100]).unwrap(), 96);
        // length of the payload
        assert_eq!(decode_word(&data[100..132]).unwrap(), 4);
        assert_eq!(&data[132..136], &[0xde, 0xad, 0xbe, 0xef]);
        assert!(data[136..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_decode_u256() {
        let data = format!("0x{:064x}", 100_000_000u128);
        assert_eq!(decode_u256(&data).unwrap(), 100_000_000);
    }

    #[test]
    fn test_decode_u256_rejects_oversized_value() {
        let data = format!("0x01{}", "0".repeat(62));
        assert!(decode_u256(&data).is_err());
    }

    #[test]
    fn test_decode_user_position() {
        let data = format!(
            "0x{:064x}{:064x}{:064x}{:064x}",
            1_700_000_000u128, 50_000_000u128, 40_000_000u128, 0u128
        );
        let position = decode_user_position(&data).unwrap();
        assert_eq!(position.vesting, 1_700_000_000);
        assert_eq!(position.amount, 50_000_000);
        assert_eq!(position.invested, 40_000_000);
        assert_eq!(position.extracted, 0);
    }

    #[test]
    fn test_decode_user_position_rejects_short_data() {
        assert!(decode_user_position("0x00").is_err());
    }

    #[test]
    fn test_decode_quantity() {
        assert_eq!(decode_quantity("0xaa36a7").unwrap(), 11_155_111);
        assert_eq!(decode_quantity("0x1").unwrap(), 1);
        assert!(decode_quantity("0xzz").is_err());
    }

    #[test]
    fn test_to_hex_round_trip() {
        let data = encode_user(&addr('a')).unwrap();
        let rendered = to_hex(&data);
        assert!(rendered.starts_with("0x81e7e20e"));
        assert_eq!(hex::decode(rendered.trim_start_matches("0x")).unwrap(), data);
    }
}
