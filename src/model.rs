/// One scraped table on the portfolio page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Summary,
    Assets,
    Deposits,
    Equities,
    Funds,
    Forex,
    Pension,
    Points,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Summary,
        Category::Assets,
        Category::Deposits,
        Category::Equities,
        Category::Funds,
        Category::Forex,
        Category::Pension,
        Category::Points,
    ];

    /// File stem the scraper uses when dumping this section.
    pub fn file_stem(self) -> &'static str {
        match self {
            Category::Summary => "summary",
            Category::Assets => "assets",
            Category::Deposits => "deposits",
            Category::Equities => "equities",
            Category::Funds => "funds",
            Category::Forex => "forex",
            Category::Pension => "pension",
            Category::Points => "points",
        }
    }
}

/// Derived balance of a record, in yen.
///
/// `Raw` holds input the normalizer could not read as an amount. It is kept
/// verbatim instead of being rejected, and older history files store every
/// balance as a digit string, which also lands here.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Balance {
    Amount(i64),
    Raw(String),
}

impl Default for Balance {
    fn default() -> Self {
        Balance::Amount(0)
    }
}

impl Balance {
    /// Numeric value of the balance, if it has one. Empty strings count as zero.
    pub fn amount(&self) -> Option<i64> {
        match self {
            Balance::Amount(n) => Some(*n),
            Balance::Raw(s) => {
                let s = s.trim();
                if s.is_empty() {
                    Some(0)
                } else {
                    s.parse().ok()
                }
            }
        }
    }
}

/// A scraped table row: column header -> cell text in page order, plus the derived balance.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub fields: indexmap::IndexMap<String, String>,
    #[serde(default)]
    pub balance: Balance,
}

/// One point-in-time capture of every section.
///
/// Field names on disk follow the history file written by earlier runs, so
/// old files keep loading; sections missing from them come back empty.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub time: String,
    #[serde(default)]
    pub summary: Vec<Record>,
    #[serde(default)]
    pub assets: Vec<Record>,
    #[serde(default, rename = "detDepo")]
    pub deposits: Vec<Record>,
    #[serde(default, rename = "detEq")]
    pub equities: Vec<Record>,
    #[serde(default, rename = "detMf")]
    pub funds: Vec<Record>,
    #[serde(default, rename = "detFx")]
    pub forex: Vec<Record>,
    #[serde(default, rename = "detPns")]
    pub pension: Vec<Record>,
    #[serde(default, rename = "detPo")]
    pub points: Vec<Record>,
}

impl Snapshot {
    pub fn new(time: impl Into<String>) -> Self {
        Snapshot {
            time: time.into(),
            ..Default::default()
        }
    }

    pub fn section(&self, category: Category) -> &[Record] {
        match category {
            Category::Summary => &self.summary,
            Category::Assets => &self.assets,
            Category::Deposits => &self.deposits,
            Category::Equities => &self.equities,
            Category::Funds => &self.funds,
            Category::Forex => &self.forex,
            Category::Pension => &self.pension,
            Category::Points => &self.points,
        }
    }

    pub fn section_mut(&mut self, category: Category) -> &mut Vec<Record> {
        match category {
            Category::Summary => &mut self.summary,
            Category::Assets => &mut self.assets,
            Category::Deposits => &mut self.deposits,
            Category::Equities => &mut self.equities,
            Category::Funds => &mut self.funds,
            Category::Forex => &mut self.forex,
            Category::Pension => &mut self.pension,
            Category::Points => &mut self.points,
        }
    }
}

/// A snapshot picked to represent a calendar day or month.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bucket {
    pub label: String,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_columns_next_to_balance() {
        let json = r#"{"保有金融機関":"bitbank","種類・名称":"円残高","残高":"1,200円","balance":1200}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.balance, Balance::Amount(1200));
        assert_eq!(record.fields.len(), 3);
        assert_eq!(record.fields["保有金融機関"], "bitbank");
    }

    #[test]
    fn rewrite_keeps_column_order() {
        let json = r#"{"種類・名称":"円残高","残高":"1,200円","保有金融機関":"bitbank","balance":1200}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = record.fields.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["種類・名称", "残高", "保有金融機関"]);
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn legacy_string_balance_still_has_an_amount() {
        let record: Record = serde_json::from_str(r#"{"残高":"12円","balance":"12"}"#).unwrap();
        assert_eq!(record.balance, Balance::Raw("12".into()));
        assert_eq!(record.balance.amount(), Some(12));
        assert_eq!(Balance::Raw("-".into()).amount(), None);
        assert_eq!(Balance::Raw(String::new()).amount(), Some(0));
    }

    #[test]
    fn snapshot_without_newer_sections_loads() {
        let json = r#"{"time":"2024/01/10 09:00:00.000","detDepo":[{"残高":"1円","balance":1}]}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.deposits.len(), 1);
        assert!(snapshot.pension.is_empty());
        assert!(snapshot.section(Category::Points).is_empty());
    }

    #[test]
    fn bucket_flattens_snapshot() {
        let bucket = Bucket {
            label: "15日".into(),
            snapshot: Snapshot::new("2024/01/15 10:00:00.000"),
        };
        let value = serde_json::to_value(&bucket).unwrap();
        assert_eq!(value["label"], "15日");
        assert_eq!(value["time"], "2024/01/15 10:00:00.000");
        let back: Bucket = serde_json::from_value(value).unwrap();
        assert_eq!(back, bucket);
    }
}
