use clap::Parser;
use std::path::PathBuf;
use ethers::types::U256;
use ethers::utils::parse_ether;
use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "~/.force-bridge/config.toml";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// ネットワーク設定と秘密鍵を記述したTOMLファイルへのパス
    #[clap(short, long, value_parser, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// 使用するネットワーク名 (省略時は設定ファイルの default_network)
    #[clap(short, long, value_parser)]
    pub network: Option<String>,

    /// 生成するウォレットの数
    #[clap(long, value_parser, default_value_t = 50)]
    pub count: usize,

    /// 各ウォレットへ送金する額 (ether単位の10進数)
    #[clap(long, value_parser, default_value = "1")]
    pub amount: String,

    /// 完了とみなすまでに待つブロック承認数
    #[clap(long, value_parser, default_value_t = 1)]
    pub confirmations: usize,

    /// 承認後に各ウォレットの残高を確認する
    #[clap(long)]
    pub verify_balances: bool,

    /// 生成した秘密鍵を設定ファイルへ書き戻す
    #[clap(long)]
    pub write_back: bool,

    /// 実行結果をJSONで保存するファイルへのパス
    #[clap(short, long, value_parser)]
    pub report: Option<PathBuf>,
}

impl CliArgs {
    /// `~` を展開した設定ファイルのパス
    pub fn config_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.config).into_owned())
    }
}

pub fn parse_amount(amount_str: &str) -> Result<U256, AppError> {
    let amount = parse_ether(amount_str.trim())
        .map_err(|e| AppError::InputValidation(format!("無効な送金額が指定されました ({}): {}", amount_str, e)))?;
    if amount.is_zero() {
        log::warn!("送金額が0です。トランザクションは送信されますが残高は増えません。");
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_batch_constants() {
        let args = CliArgs::parse_from(["wallet-funder-cli"]);
        assert_eq!(args.count, 50);
        assert_eq!(args.amount, "1");
        assert_eq!(args.confirmations, 1);
        assert!(!args.write_back);
        assert!(!args.verify_balances);
        assert!(args.network.is_none());
        assert!(args.report.is_none());
        assert_eq!(args.config, DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn config_path_expands_tilde() {
        let args = CliArgs::parse_from(["wallet-funder-cli", "--config", "~/cfg.toml"]);
        let path = args.config_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("cfg.toml"));

        let args = CliArgs::parse_from(["wallet-funder-cli", "-c", "/tmp/cfg.toml"]);
        assert_eq!(args.config_path(), PathBuf::from("/tmp/cfg.toml"));
    }

    #[test]
    fn parse_amount_in_ether() {
        assert_eq!(parse_amount("1").unwrap(), U256::exp10(18));
        assert_eq!(parse_amount("0.5").unwrap(), U256::exp10(17) * U256::from(5u64));
        assert!(parse_amount("one").is_err());
    }
}
