use std::path::{Path, PathBuf};

use pgdata_core::{FileRules, GeneratedFile};
use pgdata_introspect::{Column, Table};

use super::GENERATED_HEADER;
use crate::{
    builder::CodeBuilder,
    naming::{
        columns_const, key_suffix, module_name, param_type, quote_ident, quote_qualified,
        rust_ident, sql_literal,
    },
};

/// Name of the executor parameter every accessor takes first.
const EXECUTOR: &str = "executor";

/// The accessor module generated for one table.
pub struct TableRs<'a> {
    table: &'a Table,
}

impl<'a> TableRs<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    fn qualified(&self) -> String {
        self.table.name.to_string()
    }

    /// The table name as it appears in SQL.
    fn sql_table(&self) -> String {
        quote_qualified(&self.table.name)
    }

    fn struct_name(&self) -> &str {
        &self.table.struct_name
    }

    fn accessor(&self) -> String {
        module_name(self.table)
    }

    fn column_list(&self) -> String {
        self.table
            .columns
            .iter()
            .map(|c| quote_ident(&c.column_name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn select_sql(&self) -> String {
        format!("select {} from {}", self.column_list(), self.sql_table())
    }

    fn header(&self, b: &mut CodeBuilder) {
        b.push_line("use sqlx::{PgExecutor, Postgres, QueryBuilder, Row, postgres::PgRow};")
            .push_blank()
            .push_line("use super::attribute::*;")
            .push_blank();

        let names = self
            .table
            .columns
            .iter()
            .map(|c| format!("{:?}", c.column_name))
            .collect::<Vec<_>>()
            .join(", ");
        b.push_rust_doc(&format!("Columns of `{}` in ordinal order.", self.qualified()))
            .push_line(&format!(
                "pub const {}: &[&str] = &[{}];",
                columns_const(self.table),
                names
            ))
            .push_blank();
    }

    fn row_struct(&self, b: &mut CodeBuilder) {
        b.push_rust_doc(&format!("Row of `{}`.", self.qualified()))
            .push_line("#[allow(non_snake_case)]")
            .push_line("#[derive(Debug, Clone, Default, PartialEq)]")
            .push_block(&format!("pub struct {} {{", self.struct_name()), "}", |b| {
                for column in &self.table.columns {
                    b.push_line(&format!(
                        "pub {}: {},",
                        rust_ident(&column.field_name),
                        column.wrapper_type
                    ));
                }
            })
            .push_blank();

        b.push_block(&format!("impl {} {{", self.struct_name()), "}", |b| {
            b.push_rust_doc(&format!(
                "Decode a row selected with [`{}`].",
                columns_const(self.table)
            ));
            b.push_block(
                "pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {",
                "}",
                |b| {
                    b.push_block("Ok(Self {", "})", |b| {
                        for column in &self.table.columns {
                            b.push_line(&format!(
                                "{}: row.try_get::<Option<{}>, _>({:?})?.into(),",
                                rust_ident(&column.field_name),
                                column.value_type,
                                column.column_name
                            ));
                        }
                    });
                },
            );
        })
        .push_blank();
    }

    fn count(&self, b: &mut CodeBuilder) {
        b.push_rust_doc(&format!("Number of rows in `{}`.", self.qualified()))
            .push_block(
                &format!(
                    "pub async fn count_{}<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {{",
                    self.accessor()
                ),
                "}",
                |b| {
                    b.push_line(&format!(
                        "sqlx::query_scalar({})",
                        sql_literal(&format!("select count(*) from {}", self.sql_table()))
                    ))
                    .push_indent()
                    .push_line(".fetch_one(executor)")
                    .push_line(".await")
                    .push_dedent();
                },
            )
            .push_blank();
    }

    fn select_all(&self, b: &mut CodeBuilder) {
        b.push_rust_doc(&format!("Every row of `{}`.", self.qualified()))
            .push_block(
                &format!(
                    "pub async fn select_all_{}<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<{}>, sqlx::Error> {{",
                    self.accessor(),
                    self.struct_name()
                ),
                "}",
                |b| {
                    b.push_line(&format!(
                        "let rows = sqlx::query({}).fetch_all(executor).await?;",
                        sql_literal(&self.select_sql())
                    ))
                    .push_line(&format!(
                        "rows.iter().map({}::from_row).collect()",
                        self.struct_name()
                    ));
                },
            )
            .push_blank();
    }

    /// `select_<t>_by_<suffix>` returning at most one row.
    fn select_one(&self, b: &mut CodeBuilder, suffix: &str, doc: &str, columns: &[&Column]) {
        b.push_rust_doc(doc);
        allow_non_snake(b, columns);
        b.push_block(
            &format!(
                "pub async fn select_{}_by_{}<'e>(executor: impl PgExecutor<'e>, {}) -> Result<Option<{}>, sqlx::Error> {{",
                self.accessor(),
                suffix,
                params(columns),
                self.struct_name()
            ),
            "}",
            |b| {
                b.push_line(&format!(
                    "let row = sqlx::query({})",
                    sql_literal(&format!("{} where {}", self.select_sql(), predicate(columns, 1)))
                ))
                .push_indent();
                for column in columns {
                    b.push_line(&format!(".bind({})", param_name(column)));
                }
                b.push_line(".fetch_optional(executor)")
                    .push_line(".await?;")
                    .push_dedent()
                    .push_line(&format!(
                        "row.as_ref().map({}::from_row).transpose()",
                        self.struct_name()
                    ));
            },
        )
        .push_blank();
    }

    fn insert(&self, b: &mut CodeBuilder) {
        let columns = &self.table.columns;
        b.push_rust_doc(&format!(
            "Insert the present attributes of `row` into `{}` and return the stored row.",
            self.qualified()
        ))
        .push_block(
            &format!(
                "pub async fn insert_{}<'e>(executor: impl PgExecutor<'e>, row: &{}) -> Result<{}, sqlx::Error> {{",
                self.accessor(),
                self.struct_name(),
                self.struct_name()
            ),
            "}",
            |b| {
                b.push_block(&format!("if {} {{", none_present(columns.iter())), "}", |b| {
                    b.push_line(&format!(
                        "let row = sqlx::query({})",
                        sql_literal(&format!(
                            "insert into {} default values returning {}",
                            self.sql_table(),
                            self.column_list()
                        ))
                    ))
                    .push_indent()
                    .push_line(".fetch_one(executor)")
                    .push_line(".await?;")
                    .push_dedent()
                    .push_line(&format!("return {}::from_row(&row);", self.struct_name()));
                })
                .push_blank();

                b.push_line(&format!(
                    "let mut query = QueryBuilder::<Postgres>::new({});",
                    sql_literal(&format!("insert into {} (", self.sql_table()))
                ))
                .push_line("let mut names = query.separated(\", \");");
                for column in columns {
                    b.push_block(&format!("if {} {{", is_present(column)), "}", |b| {
                        b.push_line(&format!(
                            "names.push({});",
                            sql_literal(&quote_ident(&column.column_name))
                        ));
                    });
                }
                b.push_line("query.push(\") values (\");")
                    .push_line("let mut values = query.separated(\", \");");
                for column in columns {
                    b.push_block(&format!("if {} {{", is_present(column)), "}", |b| {
                        b.push_line(&format!("values.push_bind({});", value_of(column)));
                    });
                }
                b.push_line(&format!(
                    "query.push({});",
                    sql_literal(&format!(") returning {}", self.column_list()))
                ))
                .push_line("let stored = query.build().fetch_one(executor).await?;")
                .push_line(&format!("{}::from_row(&stored)", self.struct_name()));
            },
        )
        .push_blank();
    }

    fn update(&self, b: &mut CodeBuilder) {
        let settable: Vec<&Column> = self.table.non_key_columns().collect();
        if settable.is_empty() {
            return;
        }
        let keys: Vec<&Column> = self.table.primary_key_columns().collect();

        b.push_rust_doc(&format!(
            "Update the present attributes of `row` in `{}`, matching on the primary key.",
            self.qualified()
        ))
        .push_rust_doc("Returns the number of rows affected.")
        .push_block(
            &format!(
                "pub async fn update_{}<'e>(executor: impl PgExecutor<'e>, row: &{}) -> Result<u64, sqlx::Error> {{",
                self.accessor(),
                self.struct_name()
            ),
            "}",
            |b| {
                b.push_block(
                    &format!("if {} {{", none_present(settable.iter().copied())),
                    "}",
                    |b| {
                        b.push_line("return Ok(0);");
                    },
                )
                .push_blank();

                b.push_line(&format!(
                    "let mut query = QueryBuilder::<Postgres>::new({});",
                    sql_literal(&format!("update {} set ", self.sql_table()))
                ))
                .push_line("let mut assignments = query.separated(\", \");");
                for column in &settable {
                    b.push_block(&format!("if {} {{", is_present(column)), "}", |b| {
                        b.push_line(&format!(
                            "assignments.push({});",
                            sql_literal(&format!("{} = ", quote_ident(&column.column_name)))
                        ))
                        .push_line(&format!(
                            "assignments.push_bind_unseparated({});",
                            value_of(column)
                        ));
                    });
                }
                for (i, column) in keys.iter().enumerate() {
                    let keyword = if i == 0 { " where " } else { " and " };
                    b.push_line(&format!(
                        "query.push({});",
                        sql_literal(&format!("{}{} = ", keyword, quote_ident(&column.column_name)))
                    ))
                    .push_line(&format!("query.push_bind({});", value_of(column)));
                }
                b.push_line("let result = query.build().execute(executor).await?;")
                    .push_line("Ok(result.rows_affected())");
            },
        )
        .push_blank();
    }

    fn delete(&self, b: &mut CodeBuilder) {
        let keys: Vec<&Column> = self.table.primary_key_columns().collect();

        b.push_rust_doc(&format!(
            "Delete the row of `{}` with the given primary key.",
            self.qualified()
        ));
        allow_non_snake(b, &keys);
        b.push_block(
            &format!(
                "pub async fn delete_{}<'e>(executor: impl PgExecutor<'e>, {}) -> Result<u64, sqlx::Error> {{",
                self.accessor(),
                params(&keys)
            ),
            "}",
            |b| {
                b.push_line(&format!(
                    "let result = sqlx::query({})",
                    sql_literal(&format!(
                        "delete from {} where {}",
                        self.sql_table(),
                        predicate(&keys, 1)
                    ))
                ))
                .push_indent();
                for column in &keys {
                    b.push_line(&format!(".bind({})", param_name(column)));
                }
                b.push_line(".execute(executor)")
                    .push_line(".await?;")
                    .push_dedent()
                    .push_line("Ok(result.rows_affected())");
            },
        );
    }
}

fn field(column: &Column) -> String {
    format!("row.{}", rust_ident(&column.field_name))
}

fn is_present(column: &Column) -> String {
    format!("{}.is_present()", field(column))
}

fn value_of(column: &Column) -> String {
    format!("{}.get().cloned()", field(column))
}

/// Condition that holds when no attribute in `columns` is present.
fn none_present<'c>(columns: impl Iterator<Item = &'c Column>) -> String {
    let checks: Vec<String> = columns.map(is_present).collect();
    match checks.as_slice() {
        [single] => format!("!{}", single),
        _ => format!("!({})", checks.join(" || ")),
    }
}

/// Key parameter name, kept clear of the executor parameter.
fn param_name(column: &Column) -> String {
    let name = rust_ident(&column.var_name);
    if name == EXECUTOR {
        format!("{}_", name)
    } else {
        name
    }
}

fn params(columns: &[&Column]) -> String {
    columns
        .iter()
        .map(|c| format!("{}: {}", param_name(c), param_type(&c.value_type)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `a = $1 and b = $2`, numbering from `first`.
fn predicate(columns: &[&Column], first: usize) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", quote_ident(&c.column_name), first + i))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn allow_non_snake(b: &mut CodeBuilder, columns: &[&Column]) {
    if columns
        .iter()
        .any(|c| c.var_name.chars().any(|ch| ch.is_uppercase()))
    {
        b.push_line("#[allow(non_snake_case)]");
    }
}

impl GeneratedFile for TableRs<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}.rs", module_name(self.table)))
    }

    fn rules(&self) -> FileRules {
        FileRules::always_overwrite().with_header(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let mut b = CodeBuilder::rust();
        self.header(&mut b);
        self.row_struct(&mut b);
        self.count(&mut b);
        self.select_all(&mut b);

        let keys: Vec<&Column> = self.table.primary_key_columns().collect();
        self.select_one(
            &mut b,
            "pk",
            &format!("The row of `{}` with the given primary key.", self.qualified()),
            &keys,
        );

        let mut seen = Vec::new();
        for (key, columns) in self.table.unique_keys() {
            let suffix = key_suffix(&columns);
            if seen.contains(&suffix) {
                continue;
            }
            self.select_one(
                &mut b,
                &suffix,
                &format!("The row of `{}` matching unique key `{}`.", self.qualified(), key.name),
                &columns,
            );
            seen.push(suffix);
        }

        self.insert(&mut b);
        self.update(&mut b);
        self.delete(&mut b);
        b.build()
    }
}
