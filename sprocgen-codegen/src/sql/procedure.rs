//! Structured stored procedure text

use crate::codegen::Block;

/// One `@Name type [= default]` parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Name without the leading `@`
    pub name: String,
    pub sql_type: String,
    pub default: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            default: None,
        }
    }

    /// `= NULL` default
    pub fn optional(self) -> Self {
        self.with_default("NULL")
    }

    /// Use `= NULL` when `nullable` is set
    pub fn optional_if(self, nullable: bool) -> Self {
        if nullable {
            self.optional()
        } else {
            self
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    fn declaration(&self) -> String {
        match &self.default {
            Some(default) => format!("@{} {} = {}", self.name, self.sql_type, default),
            None => format!("@{} {}", self.name, self.sql_type),
        }
    }
}

/// A `CREATE OR ALTER PROCEDURE` definition
///
/// The body holds the statements between `SET NOCOUNT ON;` and `END`, without
/// the four-space indentation they get when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub name: String,
    /// Comment lines emitted before `CREATE OR ALTER`
    pub header: Block,
    pub parameters: Vec<Parameter>,
    pub body: Block,
}

impl Procedure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: Block::new(),
            parameters: Vec::new(),
            body: Block::new(),
        }
    }

    /// Parameter names in declaration order, without `@`
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    pub fn to_block(&self) -> Block {
        let mut block = self.header.clone();
        block.push(format!("CREATE OR ALTER PROCEDURE [dbo].[{}]", self.name));
        block.append_indented(&comma_separated(self.parameters.iter().map(Parameter::declaration)), 4);
        block.push("AS");
        block.push("BEGIN");
        block.push("    SET NOCOUNT ON;");
        block.blank();
        block.append_indented(&self.body, 4);
        block.push("END");
        block
    }

    pub fn to_sql(&self) -> String {
        self.to_block().render(0)
    }
}

/// Lines with a trailing comma on all but the last
pub(crate) fn comma_separated(items: impl IntoIterator<Item = String>) -> Block {
    let items: Vec<String> = items.into_iter().collect();
    let last = items.len().saturating_sub(1);
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| if i < last { format!("{},", item) } else { item })
        .collect()
}
