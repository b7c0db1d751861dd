//! Rendering tests for generated accessor modules.
//!
//! Tables are resolved through the in-memory catalog so the renderer sees
//! exactly what the builder would hand it.

use pgdata_codegen::{Generator, PreviewFile};
use pgdata_core::TypeMap;
use pgdata_introspect::{
    Table, TableMetadataBuilder,
    testing::{MemoryCatalog, MemoryTable},
};
use pgdata_manifest::TableConfig;

async fn resolve(catalog: &MemoryCatalog, configs: &[TableConfig]) -> Vec<Table> {
    TableMetadataBuilder::new(catalog)
        .build_all(configs)
        .await
        .expect("tables should resolve")
        .tables
}

fn preview(tables: &[Table]) -> Vec<PreviewFile> {
    let types = TypeMap::postgres();
    let mut files = Generator::new(tables, &types)
        .preview()
        .expect("preview should succeed");
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn get_file<'a>(files: &'a [PreviewFile], path: &str) -> &'a str {
    files
        .iter()
        .find(|f| f.path == path)
        .map(|f| f.content.as_str())
        .unwrap_or_else(|| panic!("{} not generated", path))
}

fn customer_catalog() -> MemoryCatalog {
    MemoryCatalog::new().with_table(
        "customer",
        MemoryTable::new()
            .column("id", "integer")
            .column("first_name", "character varying")
            .column("last_name", "character varying")
            .column("email", "text")
            .column("birth_date", "date")
            .column("creation_time", "timestamp with time zone")
            .primary_key("customer_pkey", &["id"])
            .unique("customer_email_key", &["email"])
            .unique("customer_name_key", &["first_name", "last_name"]),
    )
}

#[tokio::test]
async fn test_small_table_module() {
    let catalog = MemoryCatalog::new().with_table(
        "tag",
        MemoryTable::new()
            .column("id", "integer")
            .column("label", "text")
            .primary_key("tag_pkey", &["id"]),
    );
    let tables = resolve(&catalog, &[TableConfig::new("tag")]).await;
    let files = preview(&tables);

    insta::assert_snapshot!(get_file(&files, "tag.rs"), @r##"
// Code generated by pgdata. DO NOT EDIT.

use sqlx::{PgExecutor, Postgres, QueryBuilder, Row, postgres::PgRow};

use super::attribute::*;

/// Columns of `public.tag` in ordinal order.
pub const TAG_COLUMNS: &[&str] = &["id", "label"];

/// Row of `public.tag`.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub ID: Int4,
    pub Label: Text,
}

impl Tag {
    /// Decode a row selected with [`TAG_COLUMNS`].
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            ID: row.try_get::<Option<i32>, _>("id")?.into(),
            Label: row.try_get::<Option<String>, _>("label")?.into(),
        })
    }
}

/// Number of rows in `public.tag`.
pub async fn count_tag<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"select count(*) from "public"."tag""#)
        .fetch_one(executor)
        .await
}

/// Every row of `public.tag`.
pub async fn select_all_tag<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Tag>, sqlx::Error> {
    let rows = sqlx::query(r#"select "id", "label" from "public"."tag""#).fetch_all(executor).await?;
    rows.iter().map(Tag::from_row).collect()
}

/// The row of `public.tag` with the given primary key.
pub async fn select_tag_by_pk<'e>(executor: impl PgExecutor<'e>, id: i32) -> Result<Option<Tag>, sqlx::Error> {
    let row = sqlx::query(r#"select "id", "label" from "public"."tag" where "id" = $1"#)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    row.as_ref().map(Tag::from_row).transpose()
}

/// Insert the present attributes of `row` into `public.tag` and return the stored row.
pub async fn insert_tag<'e>(executor: impl PgExecutor<'e>, row: &Tag) -> Result<Tag, sqlx::Error> {
    if !(row.ID.is_present() || row.Label.is_present()) {
        let row = sqlx::query(r#"insert into "public"."tag" default values returning "id", "label""#)
            .fetch_one(executor)
            .await?;
        return Tag::from_row(&row);
    }

    let mut query = QueryBuilder::<Postgres>::new(r#"insert into "public"."tag" ("#);
    let mut names = query.separated(", ");
    if row.ID.is_present() {
        names.push(r#""id""#);
    }
    if row.Label.is_present() {
        names.push(r#""label""#);
    }
    query.push(") values (");
    let mut values = query.separated(", ");
    if row.ID.is_present() {
        values.push_bind(row.ID.get().cloned());
    }
    if row.Label.is_present() {
        values.push_bind(row.Label.get().cloned());
    }
    query.push(r#") returning "id", "label""#);
    let stored = query.build().fetch_one(executor).await?;
    Tag::from_row(&stored)
}

/// Update the present attributes of `row` in `public.tag`, matching on the primary key.
/// Returns the number of rows affected.
pub async fn update_tag<'e>(executor: impl PgExecutor<'e>, row: &Tag) -> Result<u64, sqlx::Error> {
    if !row.Label.is_present() {
        return Ok(0);
    }

    let mut query = QueryBuilder::<Postgres>::new(r#"update "public"."tag" set "#);
    let mut assignments = query.separated(", ");
    if row.Label.is_present() {
        assignments.push(r#""label" = "#);
        assignments.push_bind_unseparated(row.Label.get().cloned());
    }
    query.push(r#" where "id" = "#);
    query.push_bind(row.ID.get().cloned());
    let result = query.build().execute(executor).await?;
    Ok(result.rows_affected())
}

/// Delete the row of `public.tag` with the given primary key.
pub async fn delete_tag<'e>(executor: impl PgExecutor<'e>, id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"delete from "public"."tag" where "id" = $1"#)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
"##);
}

#[tokio::test]
async fn test_mod_rs_lists_tables_in_order() {
    let catalog = customer_catalog().with_table(
        "tag",
        MemoryTable::new().column("id", "integer").column("label", "text"),
    );
    let tables = resolve(
        &catalog,
        &[TableConfig::new("tag"), TableConfig::new("customer")],
    )
    .await;
    let files = preview(&tables);

    insta::assert_snapshot!(get_file(&files, "mod.rs"), @r#"
// Code generated by pgdata. DO NOT EDIT.

pub mod attribute;
pub mod tag;
pub mod customer;

pub use attribute::*;
pub use tag::*;
pub use customer::*;
"#);
}

#[tokio::test]
async fn test_unique_key_accessors() {
    let catalog = customer_catalog();
    let tables = resolve(&catalog, &[TableConfig::new("customer")]).await;
    let files = preview(&tables);
    let customer = get_file(&files, "customer.rs");

    assert!(customer.contains(
        "pub async fn select_customer_by_email<'e>(executor: impl PgExecutor<'e>, email: &str) -> Result<Option<Customer>, sqlx::Error> {"
    ));
    assert!(customer.contains("pub async fn select_customer_by_first_name_and_last_name<'e>("));
    assert!(customer.contains(
        r##"r#"select "id", "first_name", "last_name", "email", "birth_date", "creation_time" from "public"."customer" where "first_name" = $1 and "last_name" = $2"#"##
    ));
    assert!(customer.contains("/// The row of `public.customer` matching unique key `customer_name_key`."));
    assert!(customer.contains("#[allow(non_snake_case)]\npub async fn select_customer_by_first_name_and_last_name"));
    assert!(customer.contains(".bind(firstName)\n        .bind(lastName)\n"));
}

#[tokio::test]
async fn test_wrapper_types_follow_type_map() {
    let catalog = customer_catalog();
    let tables = resolve(&catalog, &[TableConfig::new("customer")]).await;
    let files = preview(&tables);
    let customer = get_file(&files, "customer.rs");

    assert!(customer.contains("    pub FirstName: Varchar,\n"));
    assert!(customer.contains("    pub BirthDate: Date,\n"));
    assert!(customer.contains("    pub CreationTime: Timestamptz,\n"));
    assert!(customer.contains(
        "CreationTime: row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(\"creation_time\")?.into(),"
    ));
}

#[tokio::test]
async fn test_composite_key_in_configured_order() {
    let catalog = MemoryCatalog::new().with_table(
        "semester",
        MemoryTable::new()
            .column("season", "text")
            .column("year", "smallint")
            .column("description", "text"),
    );
    let config = TableConfig::new("semester").with_primary_key(["year", "season"]);
    let tables = resolve(&catalog, &[config]).await;
    let files = preview(&tables);
    let semester = get_file(&files, "semester.rs");

    assert!(semester.contains(
        "pub async fn delete_semester<'e>(executor: impl PgExecutor<'e>, year: i16, season: &str) -> Result<u64, sqlx::Error> {"
    ));
    assert!(semester.contains(
        r##"r#"delete from "public"."semester" where "year" = $1 and "season" = $2"#"##
    ));
    assert!(semester.contains(
        "    query.push(r#\" where \"year\" = \"#);\n    query.push_bind(row.Year.get().cloned());\n    query.push(r#\" and \"season\" = \"#);\n"
    ));
}

#[tokio::test]
async fn test_keyword_columns_are_escaped() {
    let catalog = MemoryCatalog::new().with_table(
        "event",
        MemoryTable::new()
            .column("type", "text")
            .column("payload", "jsonb"),
    );
    let tables = resolve(&catalog, &[TableConfig::new("event").with_primary_key(["type"])]).await;
    let files = preview(&tables);
    let event = get_file(&files, "event.rs");

    assert!(event.contains("executor: impl PgExecutor<'e>, r#type: &str)"));
    assert!(event.contains(".bind(r#type)"));
    assert!(event.contains("    pub Type: Text,\n"));
}

#[tokio::test]
async fn test_identifiers_are_quoted_in_sql() {
    let catalog = MemoryCatalog::new().with_table(
        "public.Order",
        MemoryTable::new()
            .column("id", "integer")
            .column("user", "text")
            .column("createdAt", "timestamp with time zone"),
    );
    let tables = resolve(&catalog, &[TableConfig::new("public.Order")]).await;
    let files = preview(&tables);
    let order = get_file(&files, "order.rs");

    assert!(order.contains(
        r##"sqlx::query(r#"select "id", "user", "createdAt" from "public"."Order" where "id" = $1"#)"##
    ));
    assert!(order.contains(r##"names.push(r#""createdAt""#);"##));
    assert!(order.contains(r##"assignments.push(r#""user" = "#);"##));
    assert!(order.contains(r##"sqlx::query(r#"delete from "public"."Order" where "id" = $1"#)"##));
    assert!(!order.contains("from public.Order"));
    assert!(order.contains("User: row.try_get::<Option<String>, _>(\"user\")?.into(),"));
}

#[tokio::test]
async fn test_key_named_executor_does_not_shadow_executor() {
    let catalog = MemoryCatalog::new().with_table(
        "job",
        MemoryTable::new()
            .column("executor", "text")
            .column("status", "text"),
    );
    let config = TableConfig::new("job").with_primary_key(["executor"]);
    let tables = resolve(&catalog, &[config]).await;
    let files = preview(&tables);
    let job = get_file(&files, "job.rs");

    assert!(job.contains(
        "pub async fn delete_job<'e>(executor: impl PgExecutor<'e>, executor_: &str) -> Result<u64, sqlx::Error> {"
    ));
    assert!(job.contains(".bind(executor_)\n"));
    assert!(job.contains("        .execute(executor)\n"));
}

#[tokio::test]
async fn test_key_only_table_has_no_update() {
    let catalog = MemoryCatalog::new().with_table(
        "membership",
        MemoryTable::new()
            .column("user_id", "bigint")
            .column("group_id", "bigint"),
    );
    let config = TableConfig::new("membership").with_primary_key(["user_id", "group_id"]);
    let tables = resolve(&catalog, &[config]).await;
    let files = preview(&tables);
    let membership = get_file(&files, "membership.rs");

    assert!(!membership.contains("update_membership"));
    assert!(membership.contains("pub async fn delete_membership<'e>(executor: impl PgExecutor<'e>, userID: i64, groupID: i64)"));
}

#[tokio::test]
async fn test_attribute_scaffold_is_if_missing() {
    let catalog = customer_catalog();
    let tables = resolve(&catalog, &[TableConfig::new("customer")]).await;
    let files = preview(&tables);

    let attribute = files.iter().find(|f| f.path == "attribute.rs").unwrap();
    assert!(attribute.if_missing);
    assert!(attribute.content.contains("pub type Timestamptz = Attribute<chrono::DateTime<chrono::Utc>>;"));
    assert!(!attribute.content.starts_with("// Code generated"));

    let module = files.iter().find(|f| f.path == "customer.rs").unwrap();
    assert!(!module.if_missing);
}

#[tokio::test]
async fn test_module_collision_is_rejected() {
    let catalog = customer_catalog().with_table(
        "client",
        MemoryTable::new().column("id", "integer"),
    );
    let configs = [
        TableConfig::new("customer"),
        TableConfig::new("client").with_struct_name("Customer"),
    ];
    let tables = resolve(&catalog, &configs).await;
    let types = TypeMap::postgres();

    let err = Generator::new(&tables, &types).preview().unwrap_err();
    assert!(err.to_string().contains("same module 'customer'"));
}
