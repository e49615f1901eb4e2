//! Configuration for sprocgen-codegen

pub mod defaults;
mod settings;

pub use settings::CodegenConfig;
