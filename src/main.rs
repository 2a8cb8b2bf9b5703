use std::fs::File;
use std::io::Write;
use clap::Parser;

mod cli;
mod config;
mod error;
mod signer;
mod transaction;
mod types;

use cli::{CliArgs, parse_amount};
use config::ForceConfig;
use error::AppError;
use signer::{EthFundingSigner, FundingSigner};
use types::{FundingPlan, FundingReport};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::init();

    let args = CliArgs::parse();
    log::info!("アプリケーションを開始します。引数: {:?}", args);

    let plan = FundingPlan {
        count: args.count,
        amount: parse_amount(&args.amount)?,
        confirmations: args.confirmations,
    };

    let config_path = args.config_path();
    let mut force_config = ForceConfig::load(&config_path)?;
    let network = force_config.network_config(args.network.as_deref())?;
    log::info!("使用するネットワーク: {} ({})", network.name, network.ethereum_rpc_url);
    log::debug!("設定ファイルのパース成功: {:?}", config_path);

    let funder_key = network.ethereum_private_keys.first().ok_or_else(|| {
        AppError::InvalidConfig(format!(
            "networks_config.{}.ethereum_private_keys が空です",
            network.name
        ))
    })?;
    let funder = EthFundingSigner::connect(&network.ethereum_rpc_url, funder_key).await?;
    log::info!("資金供給アカウント: {}", ethers::utils::to_checksum(&funder.address(), None));

    let batch = transaction::fund_new_wallets(&funder, &plan, &mut rand::thread_rng()).await?;

    let mut accounts = network.ethereum_private_keys.clone();
    let new_keys = batch.private_keys();
    accounts.extend(new_keys.iter().cloned());
    println!("{}", serde_json::to_string_pretty(&accounts)?);
    println!("{}", serde_json::to_string_pretty(&batch.addresses())?);

    let (wallets, _) = batch.wait_all().await?;

    if args.verify_balances {
        transaction::verify_balances(&funder, &wallets, plan.amount).await?;
        log::info!("全てのウォレットの残高を確認しました。");
    }

    if args.write_back {
        force_config.append_private_keys(&network.name, &new_keys)?;
        force_config.save(&config_path)?;
        log::info!("生成した秘密鍵を {:?} に書き戻しました。", config_path);
    }

    if let Some(report_path) = &args.report {
        let report = FundingReport {
            network: &network.name,
            funder: funder.address(),
            amount_wei: plan.amount,
            confirmations: plan.confirmations,
            wallets: &wallets,
        };
        let mut report_file = File::create(report_path).map_err(|e| {
            log::error!("レポートファイルの作成に失敗しました: {:?}", report_path);
            AppError::Io(e)
        })?;
        report_file.write_all(serde_json::to_string_pretty(&report)?.as_bytes()).map_err(|e| {
            log::error!("レポートファイルへの書き込みに失敗しました。");
            AppError::Io(e)
        })?;
        log::info!("実行結果を {:?} に保存しました。", report_path);
    }

    log::info!("処理が正常に完了しました。");
    Ok(())
}
