use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use toml::value::{Table, Value};

use crate::error::AppError;

const NETWORKS_KEY: &str = "networks_config";
const PRIVATE_KEYS_KEY: &str = "ethereum_private_keys";

/// force-bridge の設定ファイル全体
///
/// 書き戻し時に他のフィールドを失わないよう、型付けするのは必要な部分だけにする。
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ForceConfig {
    pub default_network: String,
    #[serde(default)]
    pub networks_config: Table,
    #[serde(flatten)]
    pub rest: Table,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub ethereum_rpc_url: String,
    pub ethereum_private_keys: Vec<String>, // 先頭に 0x を付けずに保存されている
}

impl ForceConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            log::error!("設定ファイルの読み込みに失敗しました: {:?}", path);
            AppError::Io(e)
        })?;
        toml::from_str(&content).map_err(|e| {
            log::error!("設定ファイルのパースに失敗しました。");
            AppError::TomlParse {
                file_path: path.to_path_buf(),
                source: e,
            }
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| {
            log::error!("設定ファイルへの書き込みに失敗しました: {:?}", path);
            AppError::Io(e)
        })
    }

    /// 指定されたネットワーク (省略時は default_network) の設定を取り出す
    pub fn network_config(&self, network: Option<&str>) -> Result<NetworkConfig, AppError> {
        let name = network.unwrap_or(&self.default_network);
        let table = self.network_table(name)?;

        let ethereum_rpc_url = match table.get("ethereum_rpc_url") {
            Some(Value::String(url)) => url.clone(),
            Some(_) => {
                return Err(AppError::InvalidConfig(format!(
                    "{}.{}.ethereum_rpc_url は文字列である必要があります",
                    NETWORKS_KEY, name
                )));
            }
            None => {
                return Err(AppError::InvalidConfig(format!(
                    "{}.{}.ethereum_rpc_url が存在しません",
                    NETWORKS_KEY, name
                )));
            }
        };

        let keys = match table.get(PRIVATE_KEYS_KEY) {
            Some(Value::Array(keys)) => keys,
            Some(_) => {
                return Err(AppError::InvalidConfig(format!(
                    "{}.{}.{} は配列である必要があります",
                    NETWORKS_KEY, name, PRIVATE_KEYS_KEY
                )));
            }
            None => {
                return Err(AppError::InvalidConfig(format!(
                    "{}.{}.{} が存在しません",
                    NETWORKS_KEY, name, PRIVATE_KEYS_KEY
                )));
            }
        };
        let ethereum_private_keys = keys
            .iter()
            .enumerate()
            .map(|(i, key)| match key {
                Value::String(key) => Ok(key.clone()),
                _ => Err(AppError::InvalidConfig(format!(
                    "{}.{}.{}[{}] は文字列である必要があります",
                    NETWORKS_KEY, name, PRIVATE_KEYS_KEY, i
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NetworkConfig {
            name: name.to_string(),
            ethereum_rpc_url,
            ethereum_private_keys,
        })
    }

    /// 生成した秘密鍵をネットワークの鍵リスト末尾に追加する
    pub fn append_private_keys(&mut self, network: &str, keys: &[String]) -> Result<(), AppError> {
        let table = match self.networks_config.get_mut(network) {
            Some(Value::Table(table)) => table,
            _ => {
                return Err(AppError::InvalidConfig(format!(
                    "{}.{} が存在しません",
                    NETWORKS_KEY, network
                )));
            }
        };
        let entry = table
            .entry(PRIVATE_KEYS_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        match entry {
            Value::Array(existing) => {
                existing.extend(keys.iter().cloned().map(Value::String));
                Ok(())
            }
            _ => Err(AppError::InvalidConfig(format!(
                "{}.{}.{} は配列である必要があります",
                NETWORKS_KEY, network, PRIVATE_KEYS_KEY
            ))),
        }
    }

    fn network_table(&self, name: &str) -> Result<&Table, AppError> {
        match self.networks_config.get(name) {
            Some(Value::Table(table)) => Ok(table),
            Some(_) => Err(AppError::InvalidConfig(format!(
                "{}.{} はテーブルである必要があります",
                NETWORKS_KEY, name
            ))),
            None => Err(AppError::InvalidConfig(format!(
                "{}.{} が存在しません",
                NETWORKS_KEY, name
            ))),
        }
    }
}
