//! Typed handles to the check-in, referral and token factory contracts.
//!
//! Only the handful of calls the client makes are encoded here; arguments are
//! limited to static ABI types (address, uint256, bool).

use serde::Serialize;
use sha3::{Digest, Keccak256};

use crate::{
    address::Address,
    chains::{self, ChainConfig},
    error::QueryError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Uint(u128),
    Bool(bool),
}

impl AbiValue {
    fn word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        match self {
            AbiValue::Address(a) => word[12..].copy_from_slice(a.as_bytes()),
            AbiValue::Uint(v) => word[16..].copy_from_slice(&v.to_be_bytes()),
            AbiValue::Bool(b) => word[31] = u8::from(*b),
        }
        word
    }
}

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn encode_call(signature: &str, args: &[AbiValue]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32 * args.len());
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(&arg.word());
    }
    data
}

fn word_at(data: &[u8], index: usize) -> Result<&[u8], QueryError> {
    data.get(index * 32..(index + 1) * 32)
        .ok_or_else(|| QueryError::Decode(format!("return data too short: {} bytes", data.len())))
}

pub fn decode_address(data: &[u8]) -> Result<Address, QueryError> {
    let word = word_at(data, 0)?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(QueryError::Decode("address word has dirty high bytes".to_string()));
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Ok(Address::new(bytes))
}

pub fn decode_bool(data: &[u8]) -> Result<bool, QueryError> {
    let word = word_at(data, 0)?;
    match word {
        w if w.iter().all(|b| *b == 0) => Ok(false),
        w if w[..31].iter().all(|b| *b == 0) && w[31] == 1 => Ok(true),
        _ => Err(QueryError::Decode("invalid bool word".to_string())),
    }
}

pub fn decode_uint(data: &[u8]) -> Result<u128, QueryError> {
    let word = word_at(data, 0)?;
    if word[..16].iter().any(|b| *b != 0) {
        return Err(QueryError::Decode("uint256 does not fit in u128".to_string()));
    }
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(bytes))
}

/// Decodes a dynamic `address[]` return value.
pub fn decode_address_array(data: &[u8]) -> Result<Vec<Address>, QueryError> {
    let offset = decode_uint(word_at(data, 0)?)? as usize;
    if offset % 32 != 0 {
        return Err(QueryError::Decode("unaligned array offset".to_string()));
    }
    let base = offset / 32;
    let len = decode_uint(word_at(data, base)?)? as usize;
    (0..len)
        .map(|i| decode_address(word_at(data, base + 1 + i)?))
        .collect()
}

/// `0x`-prefixed hex, the JSON-RPC encoding of calldata.
pub fn to_hex_data(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn from_hex_data(data: &str) -> Result<Vec<u8>, QueryError> {
    let body = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(body).map_err(|e| QueryError::Decode(e.to_string()))
}

/// Read-only `eth_call` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallRequest {
    pub to: Address,
    pub data: String,
}

/// Transaction handed to the wallet for signing (`eth_sendTransaction`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "chainId")]
    pub chain_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contract {
    pub chain_id: u64,
    pub address: Address,
}

impl Contract {
    fn from_config(chain_id: u64, address: &str) -> Option<Self> {
        match address.parse() {
            Ok(address) => Some(Self { chain_id, address }),
            Err(e) => {
                tracing::error!(chain_id, address, "invalid contract address in registry: {}", e);
                None
            }
        }
    }

    pub fn call(&self, signature: &str, args: &[AbiValue]) -> CallRequest {
        CallRequest {
            to: self.address,
            data: to_hex_data(&encode_call(signature, args)),
        }
    }

    pub fn transaction(
        &self,
        from: Address,
        signature: &str,
        args: &[AbiValue],
        value: Option<u128>,
    ) -> TransactionRequest {
        TransactionRequest {
            from,
            to: self.address,
            data: to_hex_data(&encode_call(signature, args)),
            value: value.filter(|v| *v > 0).map(|v| format!("{:#x}", v)),
            chain_id: format!("{:#x}", self.chain_id),
        }
    }
}

/// The daily check-in ("GM") contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckinContract(pub Contract);

impl CheckinContract {
    pub const CHECKIN: &'static str = "checkIn()";
    pub const STREAK: &'static str = "getStreak(address)";
    pub const LAST_CHECKIN: &'static str = "lastCheckin(address)";
    pub const CHECKIN_FEE: &'static str = "checkinFee()";

    pub fn new(chain: &ChainConfig) -> Option<Self> {
        Contract::from_config(chain.chain_id(), chain.checkin_contract).map(Self)
    }

    /// `value` is the check-in fee ("tax") in wei, as read from `checkinFee()`.
    pub fn checkin_tx(&self, from: Address, value: u128) -> TransactionRequest {
        self.0.transaction(from, Self::CHECKIN, &[], Some(value))
    }

    pub fn streak_call(&self, user: Address) -> CallRequest {
        self.0.call(Self::STREAK, &[AbiValue::Address(user)])
    }

    pub fn last_checkin_call(&self, user: Address) -> CallRequest {
        self.0.call(Self::LAST_CHECKIN, &[AbiValue::Address(user)])
    }

    pub fn checkin_fee_call(&self) -> CallRequest {
        self.0.call(Self::CHECKIN_FEE, &[])
    }
}

/// Referral registry, deployed on the referral chain only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralContract(pub Contract);

impl ReferralContract {
    pub const REGISTER: &'static str = "registerReferral(address)";
    pub const HAS_REFERRER: &'static str = "hasReferrer(address)";
    pub const REFERRER_OF: &'static str = "getReferrer(address)";

    pub fn new(chain: &ChainConfig) -> Option<Self> {
        if !chain.hosts_referrals() {
            return None;
        }
        Contract::from_config(chain.chain_id(), chains::REFERRAL_CONTRACT).map(Self)
    }

    pub fn register_tx(&self, from: Address, referrer: Address) -> TransactionRequest {
        self.0
            .transaction(from, Self::REGISTER, &[AbiValue::Address(referrer)], None)
    }

    pub fn has_referrer_call(&self, user: Address) -> CallRequest {
        self.0.call(Self::HAS_REFERRER, &[AbiValue::Address(user)])
    }

    pub fn referrer_of_call(&self, user: Address) -> CallRequest {
        self.0.call(Self::REFERRER_OF, &[AbiValue::Address(user)])
    }
}

/// ERC-20 token factory. Handles only; deployment parameters are built by the
/// factory UI itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenFactoryContract(pub Contract);

impl TokenFactoryContract {
    pub const USER_TOKENS: &'static str = "getUserTokens(address)";
    pub const CREATION_FEE: &'static str = "creationFee()";

    pub fn new(chain: &ChainConfig) -> Option<Self> {
        chain
            .token_factory
            .and_then(|address| Contract::from_config(chain.chain_id(), address))
            .map(Self)
    }

    pub fn user_tokens_call(&self, user: Address) -> CallRequest {
        self.0.call(Self::USER_TOKENS, &[AbiValue::Address(user)])
    }

    pub fn creation_fee_call(&self) -> CallRequest {
        self.0.call(Self::CREATION_FEE, &[])
    }
}

/// Every contract handle bound to one chain. Rebuilt whenever the wallet
/// connects or changes chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundContracts {
    pub chain_id: Option<u64>,
    pub checkin: Option<CheckinContract>,
    pub referral: Option<ReferralContract>,
    pub token_factory: Option<TokenFactoryContract>,
}

impl BoundContracts {
    pub fn for_chain(chain_id: u64) -> Self {
        match chains::find(chain_id) {
            Some(chain) => Self {
                chain_id: Some(chain_id),
                checkin: CheckinContract::new(chain),
                referral: ReferralContract::new(chain),
                token_factory: TokenFactoryContract::new(chain),
            },
            None => Self {
                chain_id: Some(chain_id),
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn user() -> Address {
        "0x00000000000000000000000000000000000000aa".parse().unwrap()
    }

    #[test]
    fn well_known_selectors() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn encodes_address_argument() {
        let data = encode_call("balanceOf(address)", &[AbiValue::Address(user())]);
        assert_eq!(data.len(), 36);
        assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert!(data[4..35].iter().all(|b| *b == 0));
        assert_eq!(data[35], 0xaa);
    }

    #[test]
    fn decodes_return_words() {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(user().as_bytes());
        assert_eq!(decode_address(&word).unwrap(), user());

        let mut one = [0u8; 32];
        one[31] = 1;
        assert!(decode_bool(&one).unwrap());
        assert!(!decode_bool(&[0u8; 32]).unwrap());
        assert_eq!(decode_uint(&one).unwrap(), 1);

        assert_matches!(decode_bool(&[0u8; 8]), Err(QueryError::Decode(_)));
        let mut two = [0u8; 32];
        two[31] = 2;
        assert_matches!(decode_bool(&two), Err(QueryError::Decode(_)));
    }

    #[test]
    fn decodes_address_array() {
        let mut data = vec![0u8; 32 * 4];
        data[31] = 0x20;
        data[63] = 2;
        data[64 + 31] = 0x01;
        data[96 + 31] = 0xaa;
        let addresses = decode_address_array(&data).unwrap();
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[1], user());
    }

    #[test]
    fn referral_handle_only_on_referral_chain() {
        let base = chains::find(8453).unwrap();
        let op = chains::find(10).unwrap();
        assert!(ReferralContract::new(base).is_some());
        assert!(ReferralContract::new(op).is_none());

        let bound = BoundContracts::for_chain(10);
        assert!(bound.checkin.is_some());
        assert!(bound.referral.is_none());
        assert_eq!(bound.chain_id, Some(10));
    }

    #[test]
    fn unknown_chain_binds_nothing() {
        let bound = BoundContracts::for_chain(1);
        assert_eq!(bound.chain_id, Some(1));
        assert!(bound.checkin.is_none() && bound.referral.is_none() && bound.token_factory.is_none());
    }

    #[test]
    fn checkin_transaction_carries_fee() {
        let contract = CheckinContract::new(chains::find(8453).unwrap()).unwrap();
        let tx = contract.checkin_tx(user(), 10_000_000_000_000);
        assert_eq!(tx.value.as_deref(), Some("0x9184e72a000"));
        assert_eq!(tx.chain_id, "0x2105");
        assert_eq!(tx.data, to_hex_data(&selector(CheckinContract::CHECKIN)));

        let free = contract.checkin_tx(user(), 0);
        assert_eq!(free.value, None);
    }

    #[test]
    fn read_calls_target_bound_contract() {
        let base = chains::find(8453).unwrap();
        let checkin = CheckinContract::new(base).unwrap();
        let call = checkin.last_checkin_call(user());
        assert_eq!(call.to.to_hex(), base.checkin_contract);
        assert!(call.data.starts_with(&to_hex_data(&selector(CheckinContract::LAST_CHECKIN))));

        let factory = TokenFactoryContract::new(base).unwrap();
        assert_eq!(factory.creation_fee_call().data, to_hex_data(&selector(TokenFactoryContract::CREATION_FEE)));
        assert_eq!(factory.user_tokens_call(user()).data.len(), 2 + 2 * 36);
        assert!(TokenFactoryContract::new(chains::find(42220).unwrap()).is_none());
    }

    #[test]
    fn register_transaction_pads_referrer() {
        let contract = ReferralContract::new(chains::referral_chain()).unwrap();
        let from: Address = "0x0000000000000000000000000000000000000b0b".parse().unwrap();
        let tx = contract.register_tx(from, user());

        assert_eq!(tx.from, from);
        assert_eq!(tx.to.to_hex(), chains::REFERRAL_CONTRACT);
        assert_eq!(tx.value, None);
        assert_eq!(tx.chain_id, "0x2105");
        let mut word = [0u8; 32];
        word[31] = 0xaa;
        let mut expected = selector(ReferralContract::REGISTER).to_vec();
        expected.extend_from_slice(&word);
        assert_eq!(tx.data, to_hex_data(&expected));
    }
}
