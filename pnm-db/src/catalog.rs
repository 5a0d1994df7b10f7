//! Schema introspection over `sqlite_master` and the table-info pragmas.

use rusqlite::params;
use serde::Serialize;

use crate::{Database, DbResult};

/// One column as reported by `pragma_table_info`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    /// 1-based position in the primary key, 0 when not part of it.
    pub pk_position: i64,
}

/// A foreign key constraint; composite keys keep their column order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForeignKey {
    pub target_table: String,
    pub from_columns: Vec<String>,
    pub to_columns: Vec<String>,
}

impl Database {
    /// User tables, alphabetically.
    pub fn table_names(&self) -> DbResult<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    pub fn table_exists(&self, table: &str) -> DbResult<bool> {
        let conn = self.conn.borrow();
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }

    /// Columns in declaration order. Empty for an unknown table.
    pub fn table_columns(&self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
        )?;
        let cols = stmt
            .query_map(params![table], |row| {
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    decl_type: row.get(1)?,
                    not_null: row.get::<_, i64>(2)? != 0,
                    pk_position: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cols)
    }

    /// Primary key columns in key order.
    pub fn primary_key_columns(&self, table: &str) -> DbResult<Vec<String>> {
        let mut pk: Vec<ColumnInfo> = self
            .table_columns(table)?
            .into_iter()
            .filter(|c| c.pk_position > 0)
            .collect();
        pk.sort_by_key(|c| c.pk_position);
        Ok(pk.into_iter().map(|c| c.name).collect())
    }

    pub fn foreign_keys(&self, table: &str) -> DbResult<Vec<ForeignKey>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT id, \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1)
             ORDER BY id, seq",
        )?;
        let rows = stmt
            .query_map(params![table], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut keys: Vec<(i64, ForeignKey)> = Vec::new();
        for (id, target, from, to) in rows {
            match keys.last_mut() {
                Some((last_id, fk)) if *last_id == id => {
                    fk.from_columns.push(from);
                    fk.to_columns.push(to);
                }
                _ => keys.push((
                    id,
                    ForeignKey {
                        target_table: target,
                        from_columns: vec![from],
                        to_columns: vec![to],
                    },
                )),
            }
        }
        Ok(keys.into_iter().map(|(_, fk)| fk).collect())
    }
}
