fn main() {
    // Output lands in OUT_DIR/entities and OUT_DIR/sql; tests read it via include_str!
    let summary = sprocgen_codegen::generate_from_cargo_metadata().expect("codegen failed");

    // AuditTrail has no key, so its GetByID/Update/Delete are expected to be skipped
    for failure in &summary.failures {
        println!("cargo:warning=skipped {}", failure);
    }
}
