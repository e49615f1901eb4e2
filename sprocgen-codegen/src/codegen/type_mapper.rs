//! SQL Server to C# type mapping

use sprocgen::Column;

/// Represents a C# type for code generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClrType {
    Int,
    Long,
    Short,
    Byte,
    Decimal,
    Double,
    Float,
    Bool,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    Guid,
    String,
    Bytes,
    /// Nullable value type (`T?`)
    Nullable(Box<ClrType>),
}

impl ClrType {
    /// Get the type string for code generation
    pub fn to_type_string(&self) -> String {
        match self {
            ClrType::Int => "int".to_string(),
            ClrType::Long => "long".to_string(),
            ClrType::Short => "short".to_string(),
            ClrType::Byte => "byte".to_string(),
            ClrType::Decimal => "decimal".to_string(),
            ClrType::Double => "double".to_string(),
            ClrType::Float => "float".to_string(),
            ClrType::Bool => "bool".to_string(),
            ClrType::DateTime => "DateTime".to_string(),
            ClrType::DateTimeOffset => "DateTimeOffset".to_string(),
            ClrType::TimeSpan => "TimeSpan".to_string(),
            ClrType::Guid => "Guid".to_string(),
            ClrType::String => "string".to_string(),
            ClrType::Bytes => "byte[]".to_string(),
            ClrType::Nullable(inner) => format!("{}?", inner.to_type_string()),
        }
    }

    /// Literal for the type's zero value
    pub fn default_value(&self) -> &'static str {
        match self {
            ClrType::Int | ClrType::Short | ClrType::Byte => "0",
            ClrType::Long => "0L",
            ClrType::Decimal => "0m",
            ClrType::Double => "0.0",
            ClrType::Float => "0f",
            ClrType::Bool => "false",
            ClrType::DateTime => "DateTime.Now",
            ClrType::DateTimeOffset => "DateTimeOffset.Now",
            ClrType::TimeSpan => "TimeSpan.Zero",
            ClrType::Guid => "Guid.Empty",
            ClrType::String | ClrType::Bytes | ClrType::Nullable(_) => "null",
        }
    }

    /// Reference types are never given the nullable suffix
    pub fn is_reference_type(&self) -> bool {
        matches!(self, ClrType::String | ClrType::Bytes)
    }

    /// Get the inner type if this is nullable
    pub fn inner_type(&self) -> &ClrType {
        match self {
            ClrType::Nullable(inner) => inner,
            _ => self,
        }
    }

    /// Check if the nullable suffix was applied
    pub fn is_nullable(&self) -> bool {
        matches!(self, ClrType::Nullable(_))
    }

    /// Any integral type (`byte`, `short`, `int`, `long`), possibly nullable
    ///
    /// Integer keys count as assigned once positive.
    pub fn is_integer_key(&self) -> bool {
        matches!(
            self.inner_type(),
            ClrType::Byte | ClrType::Short | ClrType::Int | ClrType::Long
        )
    }

    /// `DateTime` or `DateTimeOffset`, possibly nullable
    pub fn is_date_time(&self) -> bool {
        matches!(
            self.inner_type(),
            ClrType::DateTime | ClrType::DateTimeOffset
        )
    }
}

/// Resolve SQL Server data types to C# types
pub struct TypeMapper;

impl TypeMapper {
    /// Get the C# type for a column
    pub fn map(column: &Column) -> ClrType {
        let base_type = Self::map_base_type(&column.base_type());

        if column.is_nullable && !base_type.is_reference_type() {
            ClrType::Nullable(Box::new(base_type))
        } else {
            base_type
        }
    }

    /// Resolve the base type (without nullable wrapper) from an upper-case SQL type
    pub fn map_base_type(sql_type: &str) -> ClrType {
        match sql_type {
            "INT" | "INTEGER" => ClrType::Int,
            "BIGINT" => ClrType::Long,
            "SMALLINT" => ClrType::Short,
            "TINYINT" => ClrType::Byte,
            "DECIMAL" | "NUMERIC" | "MONEY" | "SMALLMONEY" => ClrType::Decimal,
            "FLOAT" => ClrType::Double,
            "REAL" => ClrType::Float,
            "DATETIME" | "DATETIME2" | "DATE" | "SMALLDATETIME" => ClrType::DateTime,
            "TIME" => ClrType::TimeSpan,
            "DATETIMEOFFSET" => ClrType::DateTimeOffset,
            "VARBINARY" | "BINARY" | "IMAGE" | "ROWVERSION" | "TIMESTAMP" => ClrType::Bytes,
            "BIT" => ClrType::Bool,
            "UNIQUEIDENTIFIER" => ClrType::Guid,
            // char family, xml, spatial and anything unrecognised stay statically typed as string
            _ => ClrType::String,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_column(data_type: &str, nullable: bool) -> Column {
        let column = Column::new("Value", data_type);
        if nullable {
            column.nullable()
        } else {
            column
        }
    }

    #[test]
    fn test_basic_types() {
        assert_eq!(TypeMapper::map(&make_column("int", false)), ClrType::Int);
        assert_eq!(TypeMapper::map(&make_column("BIGINT", false)), ClrType::Long);
        assert_eq!(TypeMapper::map(&make_column("money", false)), ClrType::Decimal);
        assert_eq!(TypeMapper::map(&make_column("float", false)), ClrType::Double);
        assert_eq!(TypeMapper::map(&make_column("real", false)), ClrType::Float);
        assert_eq!(TypeMapper::map(&make_column("bit", false)), ClrType::Bool);
        assert_eq!(
            TypeMapper::map(&make_column("datetime2", false)),
            ClrType::DateTime
        );
        assert_eq!(TypeMapper::map(&make_column("time", false)), ClrType::TimeSpan);
        assert_eq!(
            TypeMapper::map(&make_column("uniqueidentifier", false)),
            ClrType::Guid
        );
        assert_eq!(
            TypeMapper::map(&make_column("nvarchar(100)", false)),
            ClrType::String
        );
    }

    #[test]
    fn test_integer_keys() {
        for data_type in ["tinyint", "smallint", "int", "bigint"] {
            assert!(TypeMapper::map(&make_column(data_type, false)).is_integer_key(), "{}", data_type);
        }
        assert!(TypeMapper::map(&make_column("smallint", true)).is_integer_key());
        assert!(!TypeMapper::map(&make_column("decimal", false)).is_integer_key());
        assert!(!TypeMapper::map(&make_column("uniqueidentifier", false)).is_integer_key());
    }

    #[test]
    fn test_unknown_falls_back_to_string() {
        assert_eq!(TypeMapper::map(&make_column("geography", false)), ClrType::String);
        assert_eq!(TypeMapper::map(&make_column("sql_variant", false)), ClrType::String);
        assert_eq!(TypeMapper::map(&make_column("whatever", false)), ClrType::String);
    }

    #[test]
    fn test_nullable_suffix() {
        let ty = TypeMapper::map(&make_column("int", true));
        assert_eq!(ty.to_type_string(), "int?");
        assert!(ty.is_nullable());
        assert!(ty.is_integer_key());

        // reference types are never suffixed
        assert_eq!(
            TypeMapper::map(&make_column("nvarchar", true)).to_type_string(),
            "string"
        );
        assert_eq!(
            TypeMapper::map(&make_column("varbinary", true)).to_type_string(),
            "byte[]"
        );
    }

    #[test]
    fn test_default_values() {
        assert_eq!(ClrType::Int.default_value(), "0");
        assert_eq!(ClrType::Long.default_value(), "0L");
        assert_eq!(ClrType::Decimal.default_value(), "0m");
        assert_eq!(ClrType::Bool.default_value(), "false");
        assert_eq!(ClrType::Guid.default_value(), "Guid.Empty");
        assert_eq!(ClrType::String.default_value(), "null");
        assert_eq!(
            ClrType::Nullable(Box::new(ClrType::Int)).default_value(),
            "null"
        );
    }
}
