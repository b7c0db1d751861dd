/// Header placed at the top of every file that is regenerated on each run.
pub const GENERATED_HEADER: &str = "// Code generated by pgdata. DO NOT EDIT.";

mod attribute_rs;
mod mod_rs;
mod pgdata_toml;
mod table_rs;

pub use attribute_rs::{ATTRIBUTE_MODULE, AttributeRs};
pub use mod_rs::ModRs;
pub use pgdata_toml::PgdataToml;
pub use table_rs::TableRs;
