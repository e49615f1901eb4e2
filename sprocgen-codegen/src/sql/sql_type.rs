//! Column type -> T-SQL parameter type

use sprocgen::Column;

/// Render the T-SQL type used to declare a parameter for a column
///
/// Decimal types default to `(18,0)`; string and binary types carry their length,
/// `(MAX)` for `-1`, and nothing when no length is known.
pub fn sql_type(column: &Column) -> String {
    let base = column.base_type();
    match base.as_str() {
        "INT" => "int".into(),
        "BIGINT" => "bigint".into(),
        "SMALLINT" => "smallint".into(),
        "TINYINT" => "tinyint".into(),
        "BIT" => "bit".into(),
        "DECIMAL" | "NUMERIC" => format!(
            "decimal({},{})",
            column.precision.unwrap_or(18),
            column.scale.unwrap_or(0)
        ),
        "MONEY" => "money".into(),
        "SMALLMONEY" => "smallmoney".into(),
        "FLOAT" => "float".into(),
        "REAL" => "real".into(),
        "DATE" => "date".into(),
        "DATETIME" => "datetime".into(),
        "DATETIME2" => "datetime2".into(),
        "SMALLDATETIME" => "smalldatetime".into(),
        "TIME" => "time".into(),
        "DATETIMEOFFSET" => "datetimeoffset".into(),
        "CHAR" => with_length("char", column.max_length),
        "VARCHAR" => with_length("varchar", column.max_length),
        "TEXT" => "text".into(),
        "NCHAR" => with_length("nchar", column.max_length),
        "NVARCHAR" => with_length("nvarchar", column.max_length),
        "NTEXT" => "ntext".into(),
        "BINARY" => with_length("binary", column.max_length),
        "VARBINARY" => with_length("varbinary", column.max_length),
        "IMAGE" => "image".into(),
        "UNIQUEIDENTIFIER" => "uniqueidentifier".into(),
        "XML" => "xml".into(),
        _ => base,
    }
}

fn with_length(base: &str, max_length: Option<i32>) -> String {
    match max_length {
        Some(-1) => format!("{}(MAX)", base),
        Some(length) => format!("{}({})", base, length),
        None => base.to_string(),
    }
}

/// Character and text types, filtered with `LIKE`
pub fn is_text_type(column: &Column) -> bool {
    let base = column.base_type();
    base.contains("CHAR") || base.contains("TEXT")
}
