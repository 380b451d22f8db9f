use sqlx::SqliteConnection;

use crate::error::Result;

/// A table declaration: its name and the DDL that creates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub create: &'static str,
}

impl Table {
    pub const fn new(name: &'static str, create: &'static str) -> Self {
        Self { name, create }
    }
}

/// Ordered set of declared tables.
///
/// Tables are created in declaration order and dropped in reverse, so a table
/// must be declared after every table it references.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    tables: Vec<Table>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table_names(&self) -> Vec<&'static str> {
        self.tables.iter().map(|t| t.name).collect()
    }

    pub async fn create_all(&self, conn: &mut SqliteConnection) -> Result<()> {
        for table in &self.tables {
            sqlx::query(table.create).execute(&mut *conn).await?;
            tracing::debug!(table = table.name, "Created table");
        }
        Ok(())
    }

    pub async fn drop_all(&self, conn: &mut SqliteConnection) -> Result<()> {
        for table in self.tables.iter().rev() {
            let statement = format!("DROP TABLE IF EXISTS \"{}\"", table.name);
            sqlx::query(&statement).execute(&mut *conn).await?;
            tracing::debug!(table = table.name, "Dropped table");
        }
        Ok(())
    }

    /// Names of the declared tables that currently exist, in declaration order.
    pub async fn existing_tables(&self, conn: &mut SqliteConnection) -> Result<Vec<&'static str>> {
        let present: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
                .fetch_all(&mut *conn)
                .await?;

        Ok(self
            .tables
            .iter()
            .map(|t| t.name)
            .filter(|name| present.iter().any(|p| p.as_str() == *name))
            .collect())
    }
}
