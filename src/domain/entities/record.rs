//! Table-generic records used by administrative corrections.
//!
//! Instead of one bespoke endpoint per utility or city, every correction is a
//! [`Record`] upsert or a [`RecordKey`] delete against one of the [`Table`]s.

use std::fmt;

use super::{
    ChlorineData, NewChlorineData, NewWaterUtility, NewZipCodeMapping, WaterUtility,
    ZipCodeMapping,
};

/// Tables reachable through the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    WaterUtilities,
    ChlorineData,
    ZipCodeMapping,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WaterUtilities => "water_utilities",
            Self::ChlorineData => "chlorine_data",
            Self::ZipCodeMapping => "zip_code_mapping",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row to insert, or to overwrite when its key already exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Utility(NewWaterUtility),
    Chlorine(NewChlorineData),
    ZipMapping(NewZipCodeMapping),
}

impl Record {
    pub fn table(&self) -> Table {
        match self {
            Self::Utility(_) => Table::WaterUtilities,
            Self::Chlorine(_) => Table::ChlorineData,
            Self::ZipMapping(_) => Table::ZipCodeMapping,
        }
    }

    pub fn key(&self) -> RecordKey {
        match self {
            Self::Utility(u) => RecordKey::Utility {
                pwsid: u.pwsid.clone(),
            },
            Self::Chlorine(c) => RecordKey::Chlorine {
                pwsid: c.pwsid.clone(),
            },
            Self::ZipMapping(m) => RecordKey::ZipMapping {
                zip_code: m.zip_code.clone(),
                pwsid: m.pwsid.clone(),
            },
        }
    }
}

/// A row as stored after an upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRecord {
    Utility(WaterUtility),
    Chlorine(ChlorineData),
    ZipMapping(ZipCodeMapping),
}

impl StoredRecord {
    pub fn table(&self) -> Table {
        match self {
            Self::Utility(_) => Table::WaterUtilities,
            Self::Chlorine(_) => Table::ChlorineData,
            Self::ZipMapping(_) => Table::ZipCodeMapping,
        }
    }
}

/// Primary key of a row in one of the [`Table`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Utility { pwsid: String },
    Chlorine { pwsid: String },
    ZipMapping { zip_code: String, pwsid: String },
}

impl RecordKey {
    pub fn table(&self) -> Table {
        match self {
            Self::Utility { .. } => Table::WaterUtilities,
            Self::Chlorine { .. } => Table::ChlorineData,
            Self::ZipMapping { .. } => Table::ZipCodeMapping,
        }
    }

    /// PWSID the key refers to, whichever table it targets.
    pub fn pwsid(&self) -> &str {
        match self {
            Self::Utility { pwsid } | Self::Chlorine { pwsid } | Self::ZipMapping { pwsid, .. } => {
                pwsid
            }
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utility { pwsid } | Self::Chlorine { pwsid } => {
                write!(f, "{}[{}]", self.table(), pwsid)
            }
            Self::ZipMapping { zip_code, pwsid } => {
                write!(f, "{}[{} -> {}]", self.table(), zip_code, pwsid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key_matches_table() {
        let record = Record::ZipMapping(NewZipCodeMapping {
            zip_code: "37135".to_string(),
            pwsid: "TN0000511".to_string(),
            is_primary: true,
        });

        let key = record.key();

        assert_eq!(record.table(), Table::ZipCodeMapping);
        assert_eq!(key.table(), Table::ZipCodeMapping);
        assert_eq!(key.pwsid(), "TN0000511");
    }

    #[test]
    fn test_record_key_display() {
        let key = RecordKey::Chlorine {
            pwsid: "TN0000511".to_string(),
        };
        assert_eq!(key.to_string(), "chlorine_data[TN0000511]");

        let key = RecordKey::ZipMapping {
            zip_code: "37135".to_string(),
            pwsid: "TN0000511".to_string(),
        };
        assert_eq!(key.to_string(), "zip_code_mapping[37135 -> TN0000511]");
    }
}
