use ethers::signers::{LocalWallet, Signer};
use ethers::types::{TxHash, U256};
use futures::future::{LocalBoxFuture, try_join_all};
use rand::{CryptoRng, Rng};

use crate::{
    error::AppError,
    signer::FundingSigner,
    types::{FundingPlan, GeneratedWallet, private_key_hex},
};

/// 送信は完了したが承認をまだ待っていないバッチ
pub struct FundingBatch<'a> {
    pub wallets: Vec<GeneratedWallet>,
    pending: Vec<LocalBoxFuture<'a, Result<TxHash, AppError>>>,
}

impl FundingBatch<'_> {
    pub fn addresses(&self) -> Vec<String> {
        self.wallets.iter().map(GeneratedWallet::checksum_address).collect()
    }

    pub fn private_keys(&self) -> Vec<String> {
        self.wallets.iter().map(|w| w.private_key.clone()).collect()
    }

    /// 全トランザクションの承認を並行して待つ。1件でも失敗すればバッチ全体が失敗する。
    pub async fn wait_all(self) -> Result<(Vec<GeneratedWallet>, Vec<TxHash>), AppError> {
        log::info!("{} 件のトランザクションの承認を待機します。", self.pending.len());
        let confirmed = try_join_all(self.pending).await?;
        log::info!("全てのトランザクションが承認されました。");
        Ok((self.wallets, confirmed))
    }
}

/// 新しいウォレットを `plan.count` 個生成し、それぞれへ `plan.amount` を送金する
///
/// ノンスはチェーンから一度だけ取得し、その後は送信ごとにローカルで1ずつ増やす。
/// 各送信は受理されるまで待つが、承認は待たない。
pub async fn fund_new_wallets<'a, S, R>(
    signer: &'a S,
    plan: &FundingPlan,
    rng: &mut R,
) -> Result<FundingBatch<'a>, AppError>
where
    S: FundingSigner,
    R: Rng + CryptoRng,
{
    log::info!("ウォレット生成と送金を開始します。件数: {}, 送金額: {} wei", plan.count, plan.amount);

    let mut nonce = signer.transaction_count().await?;
    log::debug!("資金供給アカウント {:?} の開始ノンス: {}", signer.address(), nonce);

    let mut wallets = Vec::with_capacity(plan.count);
    let mut pending = Vec::with_capacity(plan.count);

    for index in 0..plan.count {
        let wallet = LocalWallet::new(rng);
        let address = wallet.address();

        let transfer = signer
            .send_transfer(address, plan.amount, nonce, plan.confirmations)
            .await
            .map_err(|e| {
                log::error!("送金の送信に失敗しました (#{}, nonce {})", index, nonce);
                e
            })?;
        log::debug!("送金 #{} nonce={} to={:?} hash={:?}", index, nonce, address, transfer.tx_hash);

        pending.push(transfer.confirmation);
        wallets.push(GeneratedWallet {
            address,
            private_key: private_key_hex(&wallet),
            nonce,
            tx_hash: transfer.tx_hash,
        });
        nonce += U256::one();
    }

    log::info!("{} 件の送金を送信しました。", wallets.len());
    Ok(FundingBatch { wallets, pending })
}

/// 生成したウォレットの残高が送金額以上あることを確認する
pub async fn verify_balances<S: FundingSigner>(
    signer: &S,
    wallets: &[GeneratedWallet],
    expected: U256,
) -> Result<(), AppError> {
    for wallet in wallets {
        let balance = signer.balance_of(wallet.address).await?;
        log::info!("{} 残高: {} wei", wallet.checksum_address(), balance);
        if balance < expected {
            return Err(AppError::BalanceBelowTarget {
                address: wallet.address,
                balance,
                expected,
            });
        }
    }
    Ok(())
}
