//! `trc_{Table}_Audit` - CLR audit trigger for fully audited tables
//!
//! The trigger binds to the `AuditCommon` CLR assembly, which is deployed
//! separately; [`setup_check`] reports whether it is registered.

use sprocgen::{AuditLevel, Table};

use crate::codegen::Block;
use crate::error::Result;

use super::require_named;

/// CLR entry point the triggers bind to
const EXTERNAL_NAME: &str = "[AuditCommon].[AuditCommon.Triggers].[AuditCommon]";

pub fn trigger_name(table: &Table) -> String {
    format!("trc_{}_Audit", table.name)
}

/// Generate the audit trigger, or `None` unless the table is a fully audited base table
pub fn generate(table: &Table) -> Result<Option<Block>> {
    require_named(table)?;
    if table.audit_level != AuditLevel::Full || table.is_view {
        return Ok(None);
    }

    let mut block = Block::new();
    block.push(format!("-- Audit Trigger for {}", table.name));
    block.push("-- Requires the AuditCommon CLR assembly to be registered");
    block.push(format!(
        "CREATE OR ALTER TRIGGER [{}].[{}]",
        table.schema_name,
        trigger_name(table)
    ));
    block.push(format!("ON [{}].[{}]", table.schema_name, table.name));
    block.push("FOR INSERT, UPDATE, DELETE");
    block.push(format!("AS EXTERNAL NAME {}", EXTERNAL_NAME));
    Ok(Some(block))
}

/// Batch that reports whether the CLR assembly and the `c_SystemAudit` table exist
pub fn setup_check() -> Block {
    let mut block = Block::new();
    block.push("-- Check that the AuditCommon CLR assembly is registered");
    block.push("IF NOT EXISTS (SELECT * FROM sys.assemblies WHERE name = 'AuditCommon')");
    block.push("    PRINT 'ERROR: AuditCommon CLR assembly is not registered. Enable CLR and CREATE ASSEMBLY [AuditCommon] before running the audit triggers.'");
    block.push("ELSE");
    block.push("    PRINT 'AuditCommon CLR assembly is registered.'");
    block.blank();
    block.push("IF NOT EXISTS (SELECT * FROM sys.tables WHERE name = 'c_SystemAudit')");
    block.push("    PRINT 'WARNING: c_SystemAudit table does not exist.'");
    block
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::make_customer;
    use super::*;

    fn audited() -> Table {
        let mut table = make_customer();
        table.audit_level = AuditLevel::Full;
        table
    }

    #[test]
    fn test_full_audit_trigger() {
        let block = generate(&audited().in_schema("sales")).unwrap().unwrap();
        assert_eq!(
            block.render(0),
            "-- Audit Trigger for Customer\n\
             -- Requires the AuditCommon CLR assembly to be registered\n\
             CREATE OR ALTER TRIGGER [sales].[trc_Customer_Audit]\n\
             ON [sales].[Customer]\n\
             FOR INSERT, UPDATE, DELETE\n\
             AS EXTERNAL NAME [AuditCommon].[AuditCommon.Triggers].[AuditCommon]\n"
        );
    }

    #[test]
    fn test_lower_levels_and_views_are_skipped() {
        assert!(generate(&make_customer()).unwrap().is_none());

        let mut app_only = make_customer();
        app_only.audit_level = AuditLevel::AppOnly;
        assert!(generate(&app_only).unwrap().is_none());

        let mut view = audited();
        view.is_view = true;
        assert!(generate(&view).unwrap().is_none());
    }

    #[test]
    fn test_setup_check() {
        let block = setup_check();
        assert!(block.contains_line(
            "IF NOT EXISTS (SELECT * FROM sys.assemblies WHERE name = 'AuditCommon')"
        ));
        assert!(block.contains_line("PRINT 'WARNING: c_SystemAudit table does not exist.'"));
    }
}
