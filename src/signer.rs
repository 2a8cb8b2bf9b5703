use std::str::FromStr;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TransactionRequest, TxHash, U256, U64};
use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::error::AppError;
use crate::types::with_hex_prefix;

/// 送信済みで承認待ちの送金
pub struct PendingTransfer<'a> {
    pub tx_hash: TxHash,
    /// 指定した承認数に達するとトランザクションハッシュを返す
    pub confirmation: LocalBoxFuture<'a, Result<TxHash, AppError>>,
}

/// 資金供給アカウント
#[allow(async_fn_in_trait)]
pub trait FundingSigner {
    fn address(&self) -> Address;

    async fn transaction_count(&self) -> Result<U256, AppError>;

    /// 送金を送信する。承認は待たない。
    async fn send_transfer(
        &self,
        to: Address,
        value: U256,
        nonce: U256,
        confirmations: usize,
    ) -> Result<PendingTransfer<'_>, AppError>;

    async fn balance_of(&self, address: Address) -> Result<U256, AppError>;
}

pub struct EthFundingSigner {
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
}

impl EthFundingSigner {
    /// RPCエンドポイントに接続し、チェーンIDを取得して署名者を構築する
    pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Self, AppError> {
        let wallet = LocalWallet::from_str(&with_hex_prefix(private_key))
            .map_err(|e| AppError::PrivateKey { index: 0, source: e })?;
        let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| AppError::RpcUrl {
            url: rpc_url.to_string(),
            reason: e.to_string(),
        })?;
        let client = SignerMiddleware::new_with_provider_chain(provider, wallet).await?;
        log::debug!(
            "RPCに接続しました: url={}, chain_id={}",
            rpc_url,
            client.signer().chain_id()
        );
        Ok(Self { client })
    }
}

impl FundingSigner for EthFundingSigner {
    fn address(&self) -> Address {
        self.client.address()
    }

    async fn transaction_count(&self) -> Result<U256, AppError> {
        Ok(self.client.get_transaction_count(self.address(), None).await?)
    }

    async fn send_transfer(
        &self,
        to: Address,
        value: U256,
        nonce: U256,
        confirmations: usize,
    ) -> Result<PendingTransfer<'_>, AppError> {
        let tx = TransactionRequest::pay(to, value)
            .from(self.address())
            .nonce(nonce);
        let pending = self.client.send_transaction(tx, None).await?;
        let tx_hash = pending.tx_hash();

        let confirmation = async move {
            match pending.confirmations(confirmations).await? {
                Some(receipt) if receipt.status == Some(U64::zero()) => {
                    Err(AppError::TransactionReverted { tx_hash })
                }
                Some(receipt) => Ok(receipt.transaction_hash),
                None => Err(AppError::TransactionDropped { tx_hash }),
            }
        }
        .boxed_local();

        Ok(PendingTransfer { tx_hash, confirmation })
    }

    async fn balance_of(&self, address: Address) -> Result<U256, AppError> {
        Ok(self.client.get_balance(address, None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_rejects_bad_key_before_touching_network() {
        let err = EthFundingSigner::connect("http://127.0.0.1:8545", "not-a-key")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::PrivateKey { index: 0, .. }));
    }

    #[tokio::test]
    async fn connect_rejects_bad_url() {
        let key = "c4ad657963930fbff2e9de3404b30a4e21432c89952ed430b56bf802945ed37a";
        let err = EthFundingSigner::connect("not a url", key).await.err().unwrap();
        assert!(matches!(err, AppError::RpcUrl { .. }));
    }
}
