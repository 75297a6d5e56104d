use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tokyo's 23 special wards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ward {
    Chiyoda,
    Chuo,
    Minato,
    Shinjuku,
    Bunkyo,
    Taito,
    Sumida,
    Koto,
    Shinagawa,
    Meguro,
    Ota,
    Setagaya,
    Shibuya,
    Nakano,
    Suginami,
    Toshima,
    Kita,
    Arakawa,
    Itabashi,
    Nerima,
    Adachi,
    Katsushika,
    Edogawa,
}

impl Ward {
    pub const ALL: [Ward; 23] = [
        Ward::Chiyoda,
        Ward::Chuo,
        Ward::Minato,
        Ward::Shinjuku,
        Ward::Bunkyo,
        Ward::Taito,
        Ward::Sumida,
        Ward::Koto,
        Ward::Shinagawa,
        Ward::Meguro,
        Ward::Ota,
        Ward::Setagaya,
        Ward::Shibuya,
        Ward::Nakano,
        Ward::Suginami,
        Ward::Toshima,
        Ward::Kita,
        Ward::Arakawa,
        Ward::Itabashi,
        Ward::Nerima,
        Ward::Adachi,
        Ward::Katsushika,
        Ward::Edogawa,
    ];

    /// Official ward name as it appears in transaction data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ward::Chiyoda => "千代田区",
            Ward::Chuo => "中央区",
            Ward::Minato => "港区",
            Ward::Shinjuku => "新宿区",
            Ward::Bunkyo => "文京区",
            Ward::Taito => "台東区",
            Ward::Sumida => "墨田区",
            Ward::Koto => "江東区",
            Ward::Shinagawa => "品川区",
            Ward::Meguro => "目黒区",
            Ward::Ota => "大田区",
            Ward::Setagaya => "世田谷区",
            Ward::Shibuya => "渋谷区",
            Ward::Nakano => "中野区",
            Ward::Suginami => "杉並区",
            Ward::Toshima => "豊島区",
            Ward::Kita => "北区",
            Ward::Arakawa => "荒川区",
            Ward::Itabashi => "板橋区",
            Ward::Nerima => "練馬区",
            Ward::Adachi => "足立区",
            Ward::Katsushika => "葛飾区",
            Ward::Edogawa => "江戸川区",
        }
    }

    /// Name of the one-hot column this ward maps to.
    pub fn feature_column(&self) -> String {
        format!("ward_{}", self.as_str())
    }

    /// District used when a request does not name one.
    pub fn default_district(&self) -> String {
        format!("{}_1丁目", self.as_str())
    }
}

impl fmt::Display for Ward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ward {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ward::ALL
            .iter()
            .copied()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| {
                let mut names: Vec<&str> = Ward::ALL.iter().map(|w| w.as_str()).collect();
                names.sort_unstable();
                format!("Invalid ward name. Must be one of: {}", names.join(", "))
            })
    }
}

impl TryFrom<String> for Ward {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ward> for String {
    fn from(ward: Ward) -> Self {
        ward.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_round_trip() {
        let names: HashSet<&str> = Ward::ALL.iter().map(|w| w.as_str()).collect();
        assert_eq!(names.len(), 23);
        for ward in Ward::ALL {
            assert_eq!(ward.as_str().parse::<Ward>(), Ok(ward));
        }
    }

    #[test]
    fn unknown_ward_lists_valid_names() {
        let err = "横浜市".parse::<Ward>().unwrap_err();
        assert!(err.starts_with("Invalid ward name"));
        assert!(err.contains("世田谷区"));
    }

    #[test]
    fn derived_column_and_district() {
        assert_eq!(Ward::Setagaya.feature_column(), "ward_世田谷区");
        assert_eq!(Ward::Kita.default_district(), "北区_1丁目");
    }

    #[test]
    fn serde_uses_japanese_name() {
        let json = serde_json::to_string(&Ward::Minato).unwrap();
        assert_eq!(json, "\"港区\"");
        assert!(serde_json::from_str::<Ward>("\"Minato\"").is_err());
    }
}
