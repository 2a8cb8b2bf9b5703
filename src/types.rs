use ethers::signers::LocalWallet;
use ethers::types::{Address, TxHash, U256};
use ethers::utils::to_checksum;
use serde::Serialize;

/// 1回の実行で行う送金のパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingPlan {
    pub count: usize,
    pub amount: U256, // wei
    pub confirmations: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedWallet {
    pub address: Address,
    pub private_key: String, // 設定ファイルと同じく 0x なし
    pub nonce: U256,
    pub tx_hash: TxHash,
}

impl GeneratedWallet {
    pub fn checksum_address(&self) -> String {
        to_checksum(&self.address, None)
    }
}

#[derive(Debug, Serialize)]
pub struct FundingReport<'a> {
    pub network: &'a str,
    pub funder: Address,
    pub amount_wei: U256,
    pub confirmations: usize,
    pub wallets: &'a [GeneratedWallet],
}

/// 0x なしの16進文字列として秘密鍵を取り出す
pub fn private_key_hex(wallet: &LocalWallet) -> String {
    hex::encode(wallet.signer().to_bytes())
}

/// 保存形式の秘密鍵に 0x を付ける (既に付いていればそのまま)
pub fn with_hex_prefix(key: &str) -> String {
    let key = key.trim();
    if key.starts_with("0x") || key.starts_with("0X") {
        key.to_string()
    } else {
        format!("0x{}", key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use ethers::signers::Signer;

    const KEY: &str = "c4ad657963930fbff2e9de3404b30a4e21432c89952ed430b56bf802945ed37a";

    #[test]
    fn prefix_is_added_once() {
        assert_eq!(with_hex_prefix(KEY), format!("0x{}", KEY));
        assert_eq!(with_hex_prefix(&format!("0x{}", KEY)), format!("0x{}", KEY));
        assert_eq!(with_hex_prefix(&format!(" {} ", KEY)), format!("0x{}", KEY));
    }

    #[test]
    fn private_key_hex_round_trips_to_same_address() {
        let wallet = LocalWallet::from_str(&with_hex_prefix(KEY)).unwrap();
        let hex_key = private_key_hex(&wallet);
        assert_eq!(hex_key, KEY);
        assert!(!hex_key.starts_with("0x"));
        let again = LocalWallet::from_str(&hex_key).unwrap();
        assert_eq!(again.address(), wallet.address());
    }
}
