//! レジストリサービス設定ドキュメント
//!
//! Docker Distribution の `config.yml` を Swift ストレージバックエンド付きで生成する。
//! 認証情報を含むため、ディスクには一時ファイルとしてのみ書き出す。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tutor_openstack_cloud::CloudCredentials;

/// Blobを格納するSwiftコンテナ名（Tutorのバージョンに依存しない）
pub const SWIFT_CONTAINER: &str = "tutor-registry";

/// レジストリのリッスンアドレス
pub const LISTEN_ADDR: &str = ":5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub version: String,
    pub log: LogConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub addr: String,
    pub headers: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub swift: SwiftConfig,
    pub delete: DeleteConfig,
}

/// Swift ストレージドライバのパラメータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwiftConfig {
    pub authurl: String,
    pub username: String,
    pub domain: String,
    pub password: String,
    pub tenant: String,
    pub tenantdomain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub container: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConfig {
    pub enabled: bool,
}

impl RegistryConfig {
    /// クラウドセッションの認証情報からレジストリ設定を生成
    pub fn from_credentials(credentials: &CloudCredentials) -> Self {
        Self {
            version: "0.1".to_string(),
            log: LogConfig {
                level: "info".to_string(),
            },
            http: HttpConfig {
                addr: LISTEN_ADDR.to_string(),
                headers: cors_headers(),
            },
            storage: StorageConfig {
                swift: SwiftConfig {
                    authurl: credentials.auth_url.clone(),
                    username: credentials.username.clone(),
                    domain: credentials.user_domain.clone(),
                    password: credentials.password.clone(),
                    tenant: credentials.project_name.clone(),
                    tenantdomain: credentials.project_domain.clone(),
                    region: credentials.region.clone(),
                    container: SWIFT_CONTAINER.to_string(),
                },
                delete: DeleteConfig { enabled: true },
            },
        }
    }

    pub fn to_yaml(&self) -> serde_yaml::Result<String> {
        serde_yaml::to_string(self)
    }
}

/// ブラウザUIから直接APIを叩くためのCORSヘッダー
fn cors_headers() -> BTreeMap<String, Vec<String>> {
    let header = |name: &str, values: &[&str]| {
        (
            name.to_string(),
            values.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
        )
    };

    BTreeMap::from([
        header("X-Content-Type-Options", &["nosniff"]),
        header("Access-Control-Allow-Origin", &["*"]),
        header("Access-Control-Allow-Methods", &["HEAD", "GET", "OPTIONS", "DELETE"]),
        header(
            "Access-Control-Allow-Headers",
            &["Authorization", "Accept", "Cache-Control"],
        ),
        header("Access-Control-Expose-Headers", &["Docker-Content-Digest"]),
    ])
}
