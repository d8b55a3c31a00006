//! SQLite implementation of [`GraphStore`].
//!
//! [`SqliteStore`] persists records in a SQLite database with WAL mode,
//! atomic transactions on every write, and automatic schema migrations.
//! Ids are stored as hyphenated UUID TEXT; the visible-option subset is a JSON
//! TEXT column via serde_json. Lists are returned in rowid (insertion) order.

use std::collections::HashMap;
use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};

use paramgraph_core::{
    Dependency, DependencyId, DependencyKey, NodeId, NodePosition, OptionId, ParamOption,
    Parameter, ParameterId, ParameterWithOptions,
};

use crate::error::StorageError;
use crate::traits::GraphStore;

/// SQLite-backed implementation of [`GraphStore`].
pub struct SqliteStore {
    conn: Connection,
}

/// Raw node-position row as read from SQLite.
type PositionRow = (String, String, f64, f64, Option<String>);

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn parse_id<T: FromStr>(raw: &str) -> Result<T, StorageError> {
        raw.parse().map_err(|_| StorageError::IntegrityError {
            reason: format!("malformed id in database: '{raw}'"),
        })
    }

    fn parameter_exists(&self, id: ParameterId) -> Result<bool, StorageError> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM parameters WHERE id = ?1)",
            params![id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn assert_parameter_exists(&self, id: ParameterId) -> Result<(), StorageError> {
        if !self.parameter_exists(id)? {
            return Err(StorageError::ParameterNotFound(id));
        }
        Ok(())
    }

    fn position_from_row(row: PositionRow) -> Result<NodePosition, StorageError> {
        let (id, parameter_id, x, y, visible_json) = row;
        let visible_options = match visible_json {
            Some(json) => Some(serde_json::from_str::<Vec<OptionId>>(&json)?),
            None => None,
        };
        Ok(NodePosition {
            id: Self::parse_id(&id)?,
            parameter_id: Self::parse_id(&parameter_id)?,
            x,
            y,
            visible_options,
        })
    }
}

impl GraphStore for SqliteStore {
    // -------------------------------------------------------------------
    // Parameters and options
    // -------------------------------------------------------------------

    fn insert_parameter(&mut self, parameter: &Parameter) -> Result<(), StorageError> {
        if self.parameter_exists(parameter.id)? {
            return Err(StorageError::IntegrityError {
                reason: format!("parameter {} already exists", parameter.id),
            });
        }
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO parameters (id, slug, label) VALUES (?1, ?2, ?3)",
            params![parameter.id.to_string(), parameter.slug, parameter.label],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn insert_option(&mut self, option: &ParamOption) -> Result<(), StorageError> {
        self.assert_parameter_exists(option.parameter_id)?;
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM options WHERE id = ?1)",
            params![option.id.to_string()],
            |row| row.get(0),
        )?;
        if exists {
            return Err(StorageError::IntegrityError {
                reason: format!("option {} already exists", option.id),
            });
        }
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO options (id, parameter_id, label, position) VALUES (?1, ?2, ?3, ?4)",
            params![
                option.id.to_string(),
                option.parameter_id.to_string(),
                option.label,
                option.position,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn list_parameters(&self) -> Result<Vec<ParameterWithOptions>, StorageError> {
        let mut options_by_parameter: HashMap<ParameterId, Vec<ParamOption>> = HashMap::new();
        {
            let mut stmt = self.conn.prepare_cached(
                "SELECT id, parameter_id, label, position FROM options ORDER BY position, rowid",
            )?;
            let rows = stmt.query_map([], |row| {
                let id: String = row.get(0)?;
                let parameter_id: String = row.get(1)?;
                let label: String = row.get(2)?;
                let position: u32 = row.get(3)?;
                Ok((id, parameter_id, label, position))
            })?;
            for row in rows {
                let (id, parameter_id, label, position) = row?;
                let parameter_id: ParameterId = Self::parse_id(&parameter_id)?;
                options_by_parameter
                    .entry(parameter_id)
                    .or_default()
                    .push(ParamOption {
                        id: Self::parse_id(&id)?,
                        parameter_id,
                        label,
                        position,
                    });
            }
        }

        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, slug, label FROM parameters ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let slug: String = row.get(1)?;
            let label: String = row.get(2)?;
            Ok((id, slug, label))
        })?;
        let mut result = Vec::new();
        for row in rows {
            let (id, slug, label) = row?;
            let id: ParameterId = Self::parse_id(&id)?;
            result.push(ParameterWithOptions {
                parameter: Parameter { id, slug, label },
                options: options_by_parameter.remove(&id).unwrap_or_default(),
            });
        }
        Ok(result)
    }

    // -------------------------------------------------------------------
    // Dependencies
    // -------------------------------------------------------------------

    fn list_dependencies(&self) -> Result<Vec<Dependency>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, parent_parameter_id, parent_option_id, child_parameter_id FROM dependencies ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let parent: String = row.get(1)?;
            let option: String = row.get(2)?;
            let child: String = row.get(3)?;
            Ok((id, parent, option, child))
        })?;
        let mut result = Vec::new();
        for row in rows {
            let (id, parent, option, child) = row?;
            result.push(Dependency {
                id: Self::parse_id(&id)?,
                parent_parameter_id: Self::parse_id(&parent)?,
                parent_option_id: Self::parse_id(&option)?,
                child_parameter_id: Self::parse_id(&child)?,
            });
        }
        Ok(result)
    }

    fn create_dependency(&mut self, key: DependencyKey) -> Result<Dependency, StorageError> {
        if key.parent_parameter_id == key.child_parameter_id {
            return Err(StorageError::IntegrityError {
                reason: format!("parameter {} cannot depend on itself", key.child_parameter_id),
            });
        }
        self.assert_parameter_exists(key.parent_parameter_id)?;
        self.assert_parameter_exists(key.child_parameter_id)?;

        let owner: Option<String> = self
            .conn
            .query_row(
                "SELECT parameter_id FROM options WHERE id = ?1",
                params![key.parent_option_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        match owner {
            None => return Err(StorageError::OptionNotFound(key.parent_option_id)),
            Some(owner) if owner != key.parent_parameter_id.to_string() => {
                return Err(StorageError::IntegrityError {
                    reason: format!(
                        "option {} does not belong to parameter {}",
                        key.parent_option_id, key.parent_parameter_id
                    ),
                });
            }
            Some(_) => {}
        }

        let duplicate: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM dependencies WHERE parent_parameter_id = ?1 AND parent_option_id = ?2 AND child_parameter_id = ?3)",
            params![
                key.parent_parameter_id.to_string(),
                key.parent_option_id.to_string(),
                key.child_parameter_id.to_string(),
            ],
            |row| row.get(0),
        )?;
        if duplicate {
            return Err(StorageError::DuplicateDependency(key));
        }

        let dependency = Dependency::from_key(DependencyId::generate(), key);
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO dependencies (id, parent_parameter_id, parent_option_id, child_parameter_id) VALUES (?1, ?2, ?3, ?4)",
            params![
                dependency.id.to_string(),
                key.parent_parameter_id.to_string(),
                key.parent_option_id.to_string(),
                key.child_parameter_id.to_string(),
            ],
        )?;
        tx.commit()?;
        Ok(dependency)
    }

    fn delete_dependency(&mut self, key: &DependencyKey) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "DELETE FROM dependencies WHERE parent_parameter_id = ?1 AND parent_option_id = ?2 AND child_parameter_id = ?3",
            params![
                key.parent_parameter_id.to_string(),
                key.parent_option_id.to_string(),
                key.child_parameter_id.to_string(),
            ],
        )?;
        tx.commit()?;
        if rows == 0 {
            return Err(StorageError::DependencyNotFound(*key));
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Node positions
    // -------------------------------------------------------------------

    fn list_node_positions(&self) -> Result<Vec<NodePosition>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, parameter_id, x, y, visible_options_json FROM node_positions ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(Self::position_from_row(row?)?);
        }
        Ok(result)
    }

    fn get_node_position(&self, id: NodeId) -> Result<NodePosition, StorageError> {
        let row: Option<PositionRow> = self
            .conn
            .query_row(
                "SELECT id, parameter_id, x, y, visible_options_json FROM node_positions WHERE id = ?1",
                params![id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .optional()?;
        match row {
            Some(row) => Self::position_from_row(row),
            None => Err(StorageError::NodePositionNotFound(id)),
        }
    }

    fn upsert_node_position(&mut self, record: &NodePosition) -> Result<(), StorageError> {
        self.assert_parameter_exists(record.parameter_id)?;
        let visible_json = match &record.visible_options {
            Some(options) => Some(serde_json::to_string(options)?),
            None => None,
        };
        let tx = self.conn.transaction()?;
        // ON CONFLICT keeps the existing rowid, so list order is stable.
        tx.execute(
            "INSERT INTO node_positions (id, parameter_id, x, y, visible_options_json) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET parameter_id = excluded.parameter_id, x = excluded.x, y = excluded.y, visible_options_json = excluded.visible_options_json",
            params![
                record.id.to_string(),
                record.parameter_id.to_string(),
                record.x,
                record.y,
                visible_json,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn update_visible_options(
        &mut self,
        id: NodeId,
        options: &[OptionId],
    ) -> Result<(), StorageError> {
        let visible_json = serde_json::to_string(options)?;
        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "UPDATE node_positions SET visible_options_json = ?2 WHERE id = ?1",
            params![id.to_string(), visible_json],
        )?;
        tx.commit()?;
        if rows == 0 {
            return Err(StorageError::NodePositionNotFound(id));
        }
        Ok(())
    }

    fn delete_node_position(&mut self, id: NodeId) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "DELETE FROM node_positions WHERE id = ?1",
            params![id.to_string()],
        )?;
        tx.commit()?;
        if rows == 0 {
            return Err(StorageError::NodePositionNotFound(id));
        }
        Ok(())
    }
}
