use std::path::PathBuf;
use ethers::middleware::signer::SignerMiddlewareError;
use ethers::providers::{Http, Provider, ProviderError};
use ethers::signers::{LocalWallet, WalletError};
use ethers::types::{Address, TxHash, U256};
use thiserror::Error;

/// 資金供給アカウント用のクライアントが返すエラー型
pub type ClientError = SignerMiddlewareError<Provider<Http>, LocalWallet>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOMLパースエラー ファイル: {file_path:?}, 詳細: {source}")]
    TomlParse {
        file_path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOMLシリアライズエラー: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSONシリアライズエラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("設定ファイルが不正です: {0}")]
    InvalidConfig(String),

    #[error("秘密鍵の読み込みに失敗しました (インデックス {index}): {source}")]
    PrivateKey {
        index: usize,
        #[source]
        source: WalletError,
    },

    #[error("無効なRPC URL ({url}): {reason}")]
    RpcUrl { url: String, reason: String },

    #[error("RPCプロバイダエラー: {0}")]
    Provider(#[from] ProviderError),

    #[error("署名クライアントエラー: {0}")]
    Client(#[from] ClientError),

    #[error("トランザクションがドロップされました: {tx_hash:?}")]
    TransactionDropped { tx_hash: TxHash },

    #[error("トランザクションがリバートされました: {tx_hash:?}")]
    TransactionReverted { tx_hash: TxHash },

    #[error("残高が送金額に達していません: アドレス {address:?}, 残高 {balance} wei, 期待値 {expected} wei")]
    BalanceBelowTarget {
        address: Address,
        balance: U256,
        expected: U256,
    },

    #[error("入力検証エラー: {0}")]
    InputValidation(String),
}
