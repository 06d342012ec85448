use std::collections::BTreeMap;

use anyhow::Context;

use crate::model::{Category, Record};

/// Column holding the raw amount for each section.
pub const BALANCE_FIELDS: [(Category, &str); 8] = [
    (Category::Summary, "残高"),
    (Category::Assets, "残高"),
    (Category::Deposits, "残高"),
    (Category::Equities, "評価額"),
    (Category::Funds, "評価額"),
    (Category::Forex, "残高"),
    (Category::Pension, "評価額"),
    (Category::Points, "現在の価値"),
];

pub fn balance_field(category: Category) -> &'static str {
    BALANCE_FIELDS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, field)| *field)
        .unwrap_or("残高")
}

/// Exact-match filter over record columns. Every pair must match.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Predicate(pub BTreeMap<String, String>);

impl Predicate {
    pub fn new<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Predicate(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.0
            .iter()
            .all(|(key, value)| record.fields.get(key) == Some(value))
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}=={v:?}")).collect();
        write!(f, "[{}]", parts.join(" && "))
    }
}

/// One charted account. Its series is the sum of every part's series.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AccountSpec {
    pub label: String,
    pub color: String,
    pub category: Category,
    pub parts: Vec<Predicate>,
}

impl AccountSpec {
    fn deposit(label: &str, color: &str, institution: &str, names: &[&str]) -> Self {
        AccountSpec {
            label: label.to_string(),
            color: color.to_string(),
            category: Category::Deposits,
            parts: names
                .iter()
                .map(|name| Predicate::new([("種類・名称", *name), ("保有金融機関", institution)]))
                .collect(),
        }
    }

    fn single(label: &str, color: &str, category: Category, key: &str, value: &str) -> Self {
        AccountSpec {
            label: label.to_string(),
            color: color.to_string(),
            category,
            parts: vec![Predicate::new([(key, value)])],
        }
    }
}

/// Account table used when no `--accounts` file is given.
pub fn default_accounts() -> Vec<AccountSpec> {
    vec![
        AccountSpec::deposit(
            "住信SBIネット銀行",
            "1E90FF",
            "住信SBIネット銀行",
            &["代表口座 - 円普通", "SBIハイブリッド預金"],
        ),
        AccountSpec::deposit("三井住友銀行", "32CD32", "三井住友銀行", &["残高別普通預金残高"]),
        AccountSpec::deposit("三菱UFJ銀行", "DC143C", "三菱UFJ銀行", &["普通預金"]),
        AccountSpec::deposit("ゆうちょ銀行", "228B22", "ゆうちょ銀行", &["二二八店 普通"]),
        AccountSpec::deposit(
            "coincheck",
            "00FFFF",
            "coincheck",
            &[
                "ビットコイン残高",
                "Ripple残高",
                "Litecoin残高",
                "ビットコイン キャッシュ残高",
                "円残高",
            ],
        ),
        AccountSpec::deposit("bitbank", "A9A9A9", "bitbank", &["ビットコイン残高", "円残高"]),
        AccountSpec::deposit("BTCBOX", "FFA500", "BTCBOX", &["BTC残高", "JPY残高"]),
        AccountSpec::deposit(
            "bitFlyer",
            "8B008B",
            "bitFlyer",
            &["ビットコイン残高", "Mona残高", "円残高"],
        ),
        AccountSpec::deposit("Liquid by Quoine", "00008B", "Liquid by Quoine", &["円残高"]),
        AccountSpec::single("ゲオHD", "FFFF00", Category::Equities, "銘柄コード", "2681"),
        AccountSpec::single("イオン", "DDA0DD", Category::Equities, "銘柄コード", "8267"),
        AccountSpec::single(
            "One-MHAM新興成長株オープン",
            "2F4F4F",
            Category::Funds,
            "銘柄名",
            "One-MHAM新興成長株オープン",
        ),
        AccountSpec::single(
            "三井住友TAM-世界経済インデックスファンド",
            "000000",
            Category::Funds,
            "銘柄名",
            "三井住友TAM-世界経済インデックスファンド",
        ),
        AccountSpec {
            label: "Amazonポイント".to_string(),
            color: "FF69B4".to_string(),
            category: Category::Points,
            parts: vec![Predicate::new([("名称", "Amazonポイント"), ("保有金融機関", "Amazon.co.jp")])],
        },
    ]
}

/// Loads the account table from a JSON file, or falls back to the built-in one.
///
/// # Errors
/// * If the file cannot be read or parsed.
/// * If an account has no parts, or a part has no conditions (it would match every record).
pub fn load_accounts(path: Option<&std::path::Path>) -> anyhow::Result<Vec<AccountSpec>> {
    let Some(path) = path else {
        log::debug!("Using built-in account table");
        return Ok(default_accounts());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read account table {}", path.display()))?;
    let accounts: Vec<AccountSpec> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse account table {}", path.display()))?;

    for account in &accounts {
        if account.parts.is_empty() {
            anyhow::bail!("Account {:?} has no parts", account.label);
        }
        if account.parts.iter().any(|p| p.0.is_empty()) {
            anyhow::bail!("Account {:?} has an empty predicate", account.label);
        }
    }
    log::debug!("Loaded {} accounts from {}", accounts.len(), path.display());
    Ok(accounts)
}
