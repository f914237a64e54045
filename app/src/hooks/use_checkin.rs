use gm_api::prelude::*;

use crate::{AppWallet, Services};

/// Reads the live check-in fee for the connected chain and submits today's
/// check-in through the wallet. Returns the transaction hash.
pub async fn checkin_transaction(wallet: &AppWallet, services: &Services) -> Result<String, String> {
    let state = wallet.snapshot();
    let chain = state
        .chain()
        .ok_or_else(|| "Switch to a supported network to check in".to_string())?;

    let fee = services
        .rpc
        .checkin_fee(chain)
        .await
        .map_err(|e| format!("Could not read check-in fee: {}", e))?;
    tracing::debug!(chain_id = chain.chain_id(), fee = %fee, "submitting check-in");

    wallet.checkin(fee).await.map_err(|e| e.to_string())
}

/// Registers `referrer` for the connected address on the referral chain.
pub async fn register_referral_transaction(
    wallet: &AppWallet,
    referrer: &str,
) -> Result<String, String> {
    let referrer: Address = referrer
        .parse()
        .map_err(|e: AddressError| format!("Invalid referrer address: {}", e))?;
    let state = wallet.snapshot();
    if state.address == Some(referrer) {
        return Err("You cannot refer yourself".to_string());
    }
    if state.referral.has_referrer {
        return Err("A referrer is already registered for this wallet".to_string());
    }
    wallet
        .register_referral(referrer)
        .await
        .map_err(|e| e.to_string())
}
