//! Column prefix rules: property naming and property shapes

use sprocgen::prefix::starts_with_ignore_case;
use sprocgen::{Column, ColumnPrefix};

use super::block::Block;
use super::naming::to_camel_case;
use super::type_mapper::ClrType;

/// How the accessors of a prefixed property are exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    /// `{ get; set; }`
    ReadWrite,
    /// `{ get; private set; }`
    PrivateSet,
    /// `{ get; internal set; }`
    InternalSet,
    /// get/set routed through `DecryptValue`/`EncryptValue` over a backing field
    Encrypted,
}

/// Non-persisted companion property emitted after the column property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sibling {
    /// `string <Name>Text`
    Text,
    /// `int <Name>Enum`
    Enum,
    /// `<type> <Name>Localized`
    Localized,
}

/// Declaration shape of a prefixed property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyShape {
    pub accessor: Accessor,
    /// Emit `[JsonIgnore]`
    pub json_ignore: bool,
    /// Emit `[Required]` when the column is not nullable
    pub required_unless_nullable: bool,
    pub sibling: Option<Sibling>,
}

impl PropertyShape {
    const fn plain(accessor: Accessor) -> Self {
        Self {
            accessor,
            json_ignore: false,
            required_unless_nullable: false,
            sibling: None,
        }
    }

    const fn with_sibling(sibling: Sibling) -> Self {
        Self {
            accessor: Accessor::ReadWrite,
            json_ignore: false,
            required_unless_nullable: false,
            sibling: Some(sibling),
        }
    }

    /// Shape for a tag; `None` for untagged columns, which take the regular property path
    pub fn for_prefix(prefix: ColumnPrefix) -> Option<Self> {
        match prefix {
            ColumnPrefix::None | ColumnPrefix::FakeUniqueIndex => None,
            ColumnPrefix::OneWayEncryption => Some(Self {
                accessor: Accessor::PrivateSet,
                json_ignore: true,
                required_unless_nullable: true,
                sibling: None,
            }),
            ColumnPrefix::TwoWayEncryption => Some(Self {
                accessor: Accessor::Encrypted,
                json_ignore: true,
                required_unless_nullable: false,
                sibling: None,
            }),
            ColumnPrefix::Lookup => Some(Self::with_sibling(Sibling::Text)),
            ColumnPrefix::Enumeration => Some(Self::with_sibling(Sibling::Enum)),
            ColumnPrefix::Localization => Some(Self::with_sibling(Sibling::Localized)),
            ColumnPrefix::Calculated | ColumnPrefix::BusinessLogic | ColumnPrefix::Aggregate => {
                Some(Self::plain(Accessor::InternalSet))
            }
            ColumnPrefix::SeparateUpdate | ColumnPrefix::Upload | ColumnPrefix::SeparateList => {
                Some(Self::plain(Accessor::ReadWrite))
            }
        }
    }
}

/// Suffix appended to the stripped column name
fn name_suffix(prefix: ColumnPrefix) -> &'static str {
    match prefix {
        ColumnPrefix::OneWayEncryption => "Hashed",
        ColumnPrefix::Calculated => "Calculated",
        ColumnPrefix::BusinessLogic => "BL",
        ColumnPrefix::Aggregate => "Aggregate",
        ColumnPrefix::SeparateUpdate => "Separate",
        ColumnPrefix::Upload => "Upload",
        ColumnPrefix::None
        | ColumnPrefix::TwoWayEncryption
        | ColumnPrefix::Lookup
        | ColumnPrefix::Enumeration
        | ColumnPrefix::Localization
        | ColumnPrefix::SeparateList
        | ColumnPrefix::FakeUniqueIndex => "",
    }
}

/// Doc summary lines of the column property
fn summary(prefix: ColumnPrefix, property_name: &str) -> Vec<String> {
    match prefix {
        ColumnPrefix::None | ColumnPrefix::FakeUniqueIndex => {
            vec![format!("Gets or sets the {}.", property_name)]
        }
        ColumnPrefix::OneWayEncryption => vec![
            "Hashed value (one-way encryption).".to_string(),
            "This field is hashed by the application before saving.".to_string(),
        ],
        ColumnPrefix::TwoWayEncryption => vec![
            "Encrypted value (two-way encryption).".to_string(),
            "Automatically encrypted/decrypted by the application.".to_string(),
        ],
        ColumnPrefix::Lookup => vec![format!("Lookup value for {}.", property_name)],
        ColumnPrefix::Enumeration => vec![format!("Enum value for {}.", property_name)],
        ColumnPrefix::Localization => vec![format!("Localized value for {}.", property_name)],
        ColumnPrefix::Calculated => vec!["Calculated field (read-only).".to_string()],
        ColumnPrefix::BusinessLogic => {
            vec!["Business logic field (read-only on client).".to_string()]
        }
        ColumnPrefix::Aggregate => vec!["Aggregate field (read-only on client).".to_string()],
        ColumnPrefix::SeparateUpdate => vec!["Separate update field.".to_string()],
        ColumnPrefix::Upload => vec!["File upload path.".to_string()],
        ColumnPrefix::SeparateList => vec!["Separate list field (NewLine delimited).".to_string()],
    }
}

/// Derive the property name for a column from its prefix tag
///
/// The literal prefix is removed when present (ASCII case-insensitive) and the
/// tag's suffix appended, e.g. `eno_Password` -> `PasswordHashed`.
pub fn property_name(column: &Column) -> String {
    let stripped = match column.prefix.literal() {
        Some(literal) if starts_with_ignore_case(&column.name, literal) => {
            &column.name[literal.len()..]
        }
        _ => column.name.as_str(),
    };
    format!("{}{}", stripped, name_suffix(column.prefix))
}

/// Only two-way encrypted columns keep their ciphertext in a backing field
pub fn requires_backing_field(prefix: ColumnPrefix) -> bool {
    prefix == ColumnPrefix::TwoWayEncryption
}

/// Backing field name, e.g. `_creditCardEncrypted`
pub fn backing_field_name(column: &Column) -> Option<String> {
    if !requires_backing_field(column.prefix) {
        return None;
    }
    Some(format!("_{}Encrypted", to_camel_case(&property_name(column))))
}

/// Backing field declaration for a column, if it needs one
pub fn generate_backing_field(column: &Column) -> Option<String> {
    backing_field_name(column).map(|field| format!("private string {};", field))
}

/// Generate the full declaration of a prefixed property, or `None` for untagged columns
pub fn generate_prefixed_property(column: &Column, clr_type: &ClrType) -> Option<Block> {
    let shape = PropertyShape::for_prefix(column.prefix)?;
    let name = property_name(column);
    let type_name = clr_type.to_type_string();

    let mut block = Block::new();
    block.summary(&summary(column.prefix, &name));
    block.push(format!("[Column(\"{}\")]", column.name));
    if shape.json_ignore {
        block.push("[JsonIgnore]");
    }
    if shape.required_unless_nullable && !column.is_nullable {
        block.push("[Required]");
    }

    match shape.accessor {
        Accessor::ReadWrite => block.push(format!("public {} {} {{ get; set; }}", type_name, name)),
        Accessor::PrivateSet => {
            block.push(format!("public {} {} {{ get; private set; }}", type_name, name))
        }
        Accessor::InternalSet => {
            block.push(format!("public {} {} {{ get; internal set; }}", type_name, name))
        }
        Accessor::Encrypted => {
            let field = format!("_{}Encrypted", to_camel_case(&name));
            block.push(format!("public {} {}", type_name, name));
            block.push("{");
            block.push(format!("    get => DecryptValue({});", field));
            block.push(format!("    set => {} = EncryptValue(value);", field));
            block.push("}");
        }
    }

    if let Some(sibling) = shape.sibling {
        block.blank();
        match sibling {
            Sibling::Text => {
                block.summary(&[format!("Display text for {} (from lookup table).", name)]);
                block.push("[NotMapped]");
                block.push(format!("public string {}Text {{ get; set; }}", name));
            }
            Sibling::Enum => {
                block.summary(&[format!("Enum representation of {}.", name)]);
                block.push("[NotMapped]");
                block.push(format!("public int {}Enum {{ get; set; }}", name));
            }
            Sibling::Localized => {
                block.summary(&["Localized display value (runtime)."]);
                block.push("[NotMapped]");
                block.push(format!("public {} {}Localized {{ get; set; }}", type_name, name));
            }
        }
    }

    Some(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_column(name: &str) -> Column {
        Column::new(name, "nvarchar").max_length(100)
    }

    #[test]
    fn test_property_names_for_every_tag() {
        let cases = [
            ("Name", "Name"),
            ("eno_Password", "PasswordHashed"),
            ("ent_CreditCard", "CreditCard"),
            ("lkp_Status", "Status"),
            ("enm_Kind", "Kind"),
            ("loc_Title", "Title"),
            ("clc_TotalAmount", "TotalAmountCalculated"),
            ("blg_Score", "ScoreBL"),
            ("agg_OrderCount", "OrderCountAggregate"),
            ("spt_Notes", "NotesSeparate"),
            ("upl_Avatar", "AvatarUpload"),
            ("spl_Tags", "Tags"),
            ("FUI_Code", "Code"),
        ];
        for (column_name, expected) in cases {
            assert_eq!(property_name(&make_column(column_name)), expected);
        }
    }

    #[test]
    fn test_property_name_with_tag_but_no_literal_prefix() {
        let column = make_column("Secret").with_prefix(ColumnPrefix::OneWayEncryption);
        assert_eq!(property_name(&column), "SecretHashed");
    }

    #[test]
    fn test_every_tag_has_a_decision() {
        for prefix in ColumnPrefix::ALL {
            let column = make_column("Value").with_prefix(prefix);
            let block = generate_prefixed_property(&column, &ClrType::String);
            match prefix {
                ColumnPrefix::None | ColumnPrefix::FakeUniqueIndex => assert!(block.is_none()),
                _ => assert!(block.is_some(), "{:?} produced no property", prefix),
            }
        }
    }

    #[test]
    fn test_one_way_encryption_shape() {
        let column = make_column("eno_Password");
        let block = generate_prefixed_property(&column, &ClrType::String).unwrap();
        assert!(block.contains_line("[JsonIgnore]"));
        assert!(block.contains_line("[Required]"));
        assert!(block.contains_line("public string PasswordHashed { get; private set; }"));

        let nullable = make_column("eno_Pin").nullable();
        let block = generate_prefixed_property(&nullable, &ClrType::String).unwrap();
        assert!(!block.contains_line("[Required]"));
    }

    #[test]
    fn test_two_way_encryption_shape() {
        let column = make_column("ent_CreditCard");
        let block = generate_prefixed_property(&column, &ClrType::String).unwrap();
        assert!(block.contains_line("get => DecryptValue(_creditCardEncrypted);"));
        assert!(block.contains_line("set => _creditCardEncrypted = EncryptValue(value);"));
        assert_eq!(
            generate_backing_field(&column).as_deref(),
            Some("private string _creditCardEncrypted;")
        );
        assert!(generate_backing_field(&make_column("Name")).is_none());
    }

    #[test]
    fn test_sibling_properties() {
        let lookup = generate_prefixed_property(&make_column("lkp_Status"), &ClrType::String)
            .unwrap();
        assert!(lookup.contains_line("public string Status { get; set; }"));
        assert!(lookup.contains_line("public string StatusText { get; set; }"));
        assert!(lookup.contains_line("[NotMapped]"));

        let enumeration =
            generate_prefixed_property(&make_column("enm_Kind"), &ClrType::Int).unwrap();
        assert!(enumeration.contains_line("public int KindEnum { get; set; }"));

        let localized =
            generate_prefixed_property(&make_column("loc_Title"), &ClrType::String).unwrap();
        assert!(localized.contains_line("public string TitleLocalized { get; set; }"));
    }

    #[test]
    fn test_restricted_setters() {
        let calculated = Column::new("clc_Total", "decimal");
        let block = generate_prefixed_property(&calculated, &ClrType::Decimal).unwrap();
        assert!(block.contains_line("public decimal TotalCalculated { get; internal set; }"));

        let upload = make_column("upl_Avatar");
        let block = generate_prefixed_property(&upload, &ClrType::String).unwrap();
        assert!(block.contains_line("public string AvatarUpload { get; set; }"));
    }
}
