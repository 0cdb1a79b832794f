//! REST Countries v3.1 record shape.
//!
//! Only the fields the views display are modelled. Everything is defaulted
//! so that trimmed responses (e.g. from a `fields=` query) still decode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Country {
    pub name: CountryName,
    pub cca3: String,
    pub cioc: Option<String>,
    pub flags: Flags,
    pub languages: BTreeMap<String, String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub timezones: Option<Vec<String>>,
    pub capital: Option<Vec<String>>,
    pub population: u64,
    pub area: f64,
    pub gini: BTreeMap<String, f64>,
    pub currencies: BTreeMap<String, Currency>,
    pub car: Car,
    pub idd: Idd,
    pub start_of_week: Option<String>,
    pub independent: Option<bool>,
    pub un_member: bool,
    pub translations: BTreeMap<String, Translation>,
    pub coat_of_arms: CoatOfArms,
}

impl Country {
    /// The display identifier; also the key stored in the starred set.
    pub fn id(&self) -> &str {
        &self.name.common
    }

    /// IOC code when present, otherwise the ISO alpha-3 code.
    pub fn code(&self) -> &str {
        match self.cioc.as_deref() {
            Some(cioc) if !cioc.is_empty() => cioc,
            _ => &self.cca3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountryName {
    pub common: String,
    pub official: String,
    pub native_name: BTreeMap<String, Translation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translation {
    pub official: String,
    pub common: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    pub png: Option<String>,
    pub svg: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub name: String,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Car {
    pub side: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Idd {
    pub root: Option<String>,
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoatOfArms {
    pub png: Option<String>,
    pub svg: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_record() {
        let json = r#"{
            "name": {"common": "Norway", "official": "Kingdom of Norway",
                     "nativeName": {"nno": {"official": "Kongeriket Noreg", "common": "Noreg"}}},
            "cca3": "NOR",
            "cioc": "NOR",
            "languages": {"nno": "Norwegian Nynorsk", "nob": "Norwegian Bokmål"},
            "capital": ["Oslo"],
            "startOfWeek": "monday",
            "unMember": true,
            "coatOfArms": {"svg": "https://example.invalid/nor.svg"}
        }"#;
        let country: Country = serde_json::from_str(json).unwrap();
        assert_eq!(country.id(), "Norway");
        assert_eq!(country.code(), "NOR");
        assert_eq!(country.name.native_name["nno"].common, "Noreg");
        assert_eq!(country.capital.as_deref(), Some(&["Oslo".to_string()][..]));
        assert_eq!(country.start_of_week.as_deref(), Some("monday"));
        assert!(country.un_member);
        assert!(country.timezones.is_none());
        assert_eq!(country.population, 0);
    }

    #[test]
    fn test_code_falls_back_to_cca3() {
        let country = Country {
            cca3: "ATA".into(),
            cioc: Some(String::new()),
            ..Country::default()
        };
        assert_eq!(country.code(), "ATA");
    }
}
