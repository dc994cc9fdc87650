//! Folder and tag catalogs.
//!
//! Both are single-table `(id, name UNIQUE)` stores with identical CRUD, so
//! they share the statements below and differ only in table and wording.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use super::{NoteService, required};
use crate::error::{Error, Result, is_unique_violation};
use crate::models::{Folder, FolderId, Tag, TagId};

#[derive(Clone, Copy)]
struct Catalog {
    table: &'static str,
    kind: &'static str,
}

const FOLDERS: Catalog = Catalog {
    table: "folders",
    kind: "Folder",
};

const TAGS: Catalog = Catalog {
    table: "tags",
    kind: "Tag",
};

impl Catalog {
    fn list(self, conn: &Connection) -> Result<Vec<(i64, String)>> {
        let sql = format!("SELECT id, name FROM {} ORDER BY id", self.table);
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    fn get(self, conn: &Connection, id: i64) -> Result<Option<String>> {
        let sql = format!("SELECT name FROM {} WHERE id = ?1", self.table);
        Ok(conn.query_row(&sql, [id], |row| row.get(0)).optional()?)
    }

    fn create(self, conn: &Connection, name: &str) -> Result<(i64, String)> {
        let name = required("name", name)?;
        let sql = format!("INSERT INTO {} (name) VALUES (?1)", self.table);
        conn.execute(&sql, [name])
            .map_err(|e| self.conflict_or_store(e, name))?;

        let id = conn.last_insert_rowid();
        info!(table = self.table, id, "created catalog entry");
        Ok((id, name.to_string()))
    }

    fn rename(self, conn: &Connection, id: i64, name: &str) -> Result<Option<(i64, String)>> {
        let name = required("name", name)?;
        let sql = format!("UPDATE {} SET name = ?1 WHERE id = ?2", self.table);
        let changed = conn
            .execute(&sql, (name, id))
            .map_err(|e| self.conflict_or_store(e, name))?;

        Ok((changed > 0).then(|| (id, name.to_string())))
    }

    fn delete(self, conn: &Connection, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.table);
        let removed = conn.execute(&sql, [id])?;
        if removed > 0 {
            info!(table = self.table, id, "deleted catalog entry");
        }
        Ok(removed > 0)
    }

    fn conflict_or_store(self, err: rusqlite::Error, name: &str) -> Error {
        if is_unique_violation(&err) {
            Error::Conflict(format!("{} `{}`", self.kind, name))
        } else {
            Error::Store(err)
        }
    }
}

fn folder((id, name): (i64, String)) -> Folder {
    Folder::new(FolderId::new(id), name)
}

fn tag((id, name): (i64, String)) -> Tag {
    Tag::new(TagId::new(id), name)
}

impl NoteService {
    /// Lists all folders ordered by id.
    pub fn list_folders(&self) -> Result<Vec<Folder>> {
        let entries = FOLDERS.list(self.db.connection())?;
        Ok(entries.into_iter().map(folder).collect())
    }

    /// Returns the folder with the given id, or `None`.
    pub fn get_folder(&self, id: FolderId) -> Result<Option<Folder>> {
        let name = FOLDERS.get(self.db.connection(), id.get())?;
        Ok(name.map(|name| Folder::new(id, name)))
    }

    /// Creates a folder. The name must be non-blank and unused.
    pub fn create_folder(&self, name: &str) -> Result<Folder> {
        FOLDERS.create(self.db.connection(), name).map(folder)
    }

    /// Renames a folder; `None` when it does not exist.
    pub fn rename_folder(&self, id: FolderId, name: &str) -> Result<Option<Folder>> {
        let renamed = FOLDERS.rename(self.db.connection(), id.get(), name)?;
        Ok(renamed.map(folder))
    }

    /// Deletes a folder. Notes filed under it become unfiled.
    pub fn delete_folder(&self, id: FolderId) -> Result<bool> {
        FOLDERS.delete(self.db.connection(), id.get())
    }

    /// Lists all tags ordered by id.
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let entries = TAGS.list(self.db.connection())?;
        Ok(entries.into_iter().map(tag).collect())
    }

    /// Returns the tag with the given id, or `None`.
    pub fn get_tag(&self, id: TagId) -> Result<Option<Tag>> {
        let name = TAGS.get(self.db.connection(), id.get())?;
        Ok(name.map(|name| Tag::new(id, name)))
    }

    /// Creates a tag. The name must be non-blank and unused.
    pub fn create_tag(&self, name: &str) -> Result<Tag> {
        TAGS.create(self.db.connection(), name).map(tag)
    }

    /// Renames a tag; `None` when it does not exist.
    pub fn rename_tag(&self, id: TagId, name: &str) -> Result<Option<Tag>> {
        let renamed = TAGS.rename(self.db.connection(), id.get(), name)?;
        Ok(renamed.map(tag))
    }

    /// Deletes a tag and, by cascade, its associations with every note.
    pub fn delete_tag(&self, id: TagId) -> Result<bool> {
        TAGS.delete(self.db.connection(), id.get())
    }
}
