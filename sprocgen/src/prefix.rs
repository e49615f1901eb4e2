//! Column prefix taxonomy

use serde::{Deserialize, Serialize};

/// Behavior tag encoded in a column name prefix.
///
/// The set is closed: every generator matches on it exhaustively, so adding a
/// variant forces every name-derivation and shape-generation site to decide what
/// the new tag means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnPrefix {
    /// No prefix
    #[default]
    None,
    /// `eno_` - hashed by the application, never read back
    OneWayEncryption,
    /// `ent_` - encrypted at rest, decrypted on read
    TwoWayEncryption,
    /// `lkp_` - value from a lookup table
    Lookup,
    /// `enm_` - value backed by an enumeration
    Enumeration,
    /// `loc_` - localizable text
    Localization,
    /// `clc_` - computed by the database
    Calculated,
    /// `blg_` - maintained by business logic
    BusinessLogic,
    /// `agg_` - precomputed summary (count/sum)
    Aggregate,
    /// `spt_` - updated through a separate operation
    SeparateUpdate,
    /// `upl_` - file upload path
    Upload,
    /// `spl_` - list stored newline delimited
    SeparateList,
    /// `fui_` - fake unique index marker
    FakeUniqueIndex,
}

/// Prefix strings in detection order
const KNOWN_PREFIXES: [(&str, ColumnPrefix); 12] = [
    ("eno_", ColumnPrefix::OneWayEncryption),
    ("ent_", ColumnPrefix::TwoWayEncryption),
    ("lkp_", ColumnPrefix::Lookup),
    ("enm_", ColumnPrefix::Enumeration),
    ("loc_", ColumnPrefix::Localization),
    ("clc_", ColumnPrefix::Calculated),
    ("blg_", ColumnPrefix::BusinessLogic),
    ("agg_", ColumnPrefix::Aggregate),
    ("spt_", ColumnPrefix::SeparateUpdate),
    ("upl_", ColumnPrefix::Upload),
    ("spl_", ColumnPrefix::SeparateList),
    ("fui_", ColumnPrefix::FakeUniqueIndex),
];

impl ColumnPrefix {
    /// Every tag, `None` first
    pub const ALL: [ColumnPrefix; 13] = [
        ColumnPrefix::None,
        ColumnPrefix::OneWayEncryption,
        ColumnPrefix::TwoWayEncryption,
        ColumnPrefix::Lookup,
        ColumnPrefix::Enumeration,
        ColumnPrefix::Localization,
        ColumnPrefix::Calculated,
        ColumnPrefix::BusinessLogic,
        ColumnPrefix::Aggregate,
        ColumnPrefix::SeparateUpdate,
        ColumnPrefix::Upload,
        ColumnPrefix::SeparateList,
        ColumnPrefix::FakeUniqueIndex,
    ];

    /// Derive the tag from a column name (ordinal, case-insensitive match)
    pub fn detect(column_name: &str) -> Self {
        KNOWN_PREFIXES
            .iter()
            .find(|(prefix, _)| starts_with_ignore_case(column_name, prefix))
            .map(|(_, tag)| *tag)
            .unwrap_or(ColumnPrefix::None)
    }

    /// The literal prefix carried by column names with this tag
    pub fn literal(self) -> Option<&'static str> {
        match self {
            ColumnPrefix::None => None,
            ColumnPrefix::OneWayEncryption => Some("eno_"),
            ColumnPrefix::TwoWayEncryption => Some("ent_"),
            ColumnPrefix::Lookup => Some("lkp_"),
            ColumnPrefix::Enumeration => Some("enm_"),
            ColumnPrefix::Localization => Some("loc_"),
            ColumnPrefix::Calculated => Some("clc_"),
            ColumnPrefix::BusinessLogic => Some("blg_"),
            ColumnPrefix::Aggregate => Some("agg_"),
            ColumnPrefix::SeparateUpdate => Some("spt_"),
            ColumnPrefix::Upload => Some("upl_"),
            ColumnPrefix::SeparateList => Some("spl_"),
            ColumnPrefix::FakeUniqueIndex => Some("fui_"),
        }
    }

    /// Whether the value is produced outside the normal insert/update flow
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            ColumnPrefix::Calculated | ColumnPrefix::BusinessLogic | ColumnPrefix::Aggregate
        )
    }

    /// Whether the column holds encrypted or hashed data
    pub fn is_encrypted(self) -> bool {
        matches!(
            self,
            ColumnPrefix::OneWayEncryption | ColumnPrefix::TwoWayEncryption
        )
    }
}

/// ASCII case-insensitive `starts_with`
pub fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
