mod schema;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;
use crate::taxonomy::TaxonomySnapshot;
use crate::validate;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "loadbook")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("loadbook.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Cartridge type operations
    // ============================================================

    pub fn get_all_cartridge_types(&self) -> Result<Vec<CartridgeType>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, name FROM cartridge_types ORDER BY id")?;

        let types = stmt
            .query_map([], |row| {
                Ok(CartridgeType {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(types)
    }

    pub fn create_cartridge_type(&self, input: CreateCartridgeTypeInput) -> Result<CartridgeType> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO cartridge_types (name) VALUES (?)",
            [&input.name],
        )?;

        Ok(CartridgeType {
            id: conn.last_insert_rowid(),
            name: input.name,
        })
    }

    // ============================================================
    // Cartridge operations
    // ============================================================

    pub fn get_all_cartridges(&self) -> Result<Vec<Cartridge>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let links = load_link_map(&conn, "cartridge_type_cartridges", "cartridge_id")?;

        let mut stmt = conn.prepare("SELECT id, name FROM cartridges ORDER BY id")?;
        let cartridges = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                Ok(Cartridge {
                    id,
                    name: row.get(1)?,
                    cartridge_type_ids: links.get(&id).cloned().unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cartridges)
    }

    pub fn create_cartridge(&self, input: CreateCartridgeInput) -> Result<Cartridge> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute("INSERT INTO cartridges (name) VALUES (?)", [&input.name])?;
        let id = conn.last_insert_rowid();

        for ct_id in &input.cartridge_type_ids {
            conn.execute(
                "INSERT OR IGNORE INTO cartridge_type_cartridges (cartridge_type_id, cartridge_id)
                 VALUES (?, ?)",
                (ct_id, id),
            )?;
        }

        Ok(Cartridge {
            id,
            name: input.name,
            cartridge_type_ids: input.cartridge_type_ids,
        })
    }

    // ============================================================
    // Primer type operations
    // ============================================================

    pub fn get_all_primer_types(&self) -> Result<Vec<PrimerType>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, name, cartridge_type_id FROM primer_types ORDER BY id")?;

        let primer_types = stmt
            .query_map([], |row| {
                Ok(PrimerType {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    cartridge_type_id: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(primer_types)
    }

    pub fn create_primer_type(&self, input: CreatePrimerTypeInput) -> Result<PrimerType> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO primer_types (name, cartridge_type_id) VALUES (?, ?)",
            (&input.name, input.cartridge_type_id),
        )?;

        Ok(PrimerType {
            id: conn.last_insert_rowid(),
            name: input.name,
            cartridge_type_id: input.cartridge_type_id,
        })
    }

    // ============================================================
    // Powder operations
    // ============================================================

    pub fn get_all_powders(&self) -> Result<Vec<Powder>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let links = load_link_map(&conn, "cartridge_type_powders", "powder_id")?;

        let mut stmt =
            conn.prepare("SELECT id, name, manufacturer_name FROM powders ORDER BY id")?;
        let powders = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                Ok(Powder {
                    id,
                    name: row.get(1)?,
                    manufacturer_name: row.get(2)?,
                    cartridge_type_ids: links.get(&id).cloned().unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(powders)
    }

    pub fn create_powder(&self, input: CreatePowderInput) -> Result<Powder> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO powders (name, manufacturer_name) VALUES (?, ?)",
            (&input.name, &input.manufacturer_name),
        )?;
        let id = conn.last_insert_rowid();

        for ct_id in &input.cartridge_type_ids {
            conn.execute(
                "INSERT OR IGNORE INTO cartridge_type_powders (cartridge_type_id, powder_id)
                 VALUES (?, ?)",
                (ct_id, id),
            )?;
        }

        Ok(Powder {
            id,
            name: input.name,
            manufacturer_name: input.manufacturer_name,
            cartridge_type_ids: input.cartridge_type_ids,
        })
    }

    // ============================================================
    // Bullet weight operations
    // ============================================================

    pub fn get_all_bullet_weights(&self) -> Result<Vec<BulletWeight>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let links = load_link_map(&conn, "cartridge_type_bullet_weights", "bullet_weight_id")?;

        let mut stmt = conn.prepare("SELECT id, weight FROM bullet_weights ORDER BY id")?;
        let weights = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                Ok(BulletWeight {
                    id,
                    weight: row.get(1)?,
                    cartridge_type_ids: links.get(&id).cloned().unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(weights)
    }

    pub fn create_bullet_weight(&self, input: CreateBulletWeightInput) -> Result<BulletWeight> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO bullet_weights (weight) VALUES (?)",
            [input.weight],
        )?;
        let id = conn.last_insert_rowid();

        for ct_id in &input.cartridge_type_ids {
            conn.execute(
                "INSERT OR IGNORE INTO cartridge_type_bullet_weights (cartridge_type_id, bullet_weight_id)
                 VALUES (?, ?)",
                (ct_id, id),
            )?;
        }

        Ok(BulletWeight {
            id,
            weight: input.weight,
            cartridge_type_ids: input.cartridge_type_ids,
        })
    }

    // ============================================================
    // Bullet operations
    // ============================================================

    pub fn get_all_bullets(&self) -> Result<Vec<Bullet>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, name, manufacturer_name, weight FROM bullets ORDER BY id")?;

        let bullets = stmt
            .query_map([], |row| {
                Ok(Bullet {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    manufacturer_name: row.get(2)?,
                    weight: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(bullets)
    }

    pub fn create_bullet(&self, input: CreateBulletInput) -> Result<Bullet> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO bullets (name, manufacturer_name, weight) VALUES (?, ?, ?)",
            (&input.name, &input.manufacturer_name, input.weight),
        )?;

        Ok(Bullet {
            id: conn.last_insert_rowid(),
            name: input.name,
            manufacturer_name: input.manufacturer_name,
            weight: input.weight,
        })
    }

    // ============================================================
    // Taxonomy snapshot
    // ============================================================

    /// One-shot read of all filterable reference data.
    ///
    /// Called once before the cascade controller becomes interactive; the
    /// result is immutable for the rest of the session.
    pub fn load_taxonomy_snapshot(&self) -> Result<TaxonomySnapshot> {
        Ok(TaxonomySnapshot::new(
            self.get_all_cartridge_types()?,
            self.get_all_cartridges()?,
            self.get_all_primer_types()?,
            self.get_all_powders()?,
            self.get_all_bullet_weights()?,
            self.get_all_bullets()?,
        ))
    }

    // ============================================================
    // Data source / account operations
    // ============================================================

    pub fn get_all_data_sources(&self) -> Result<Vec<DataSource>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM data_sources ORDER BY name")?;

        let sources = stmt
            .query_map([], |row| {
                Ok(DataSource {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    created_at: parse_datetime(row.get::<_, String>(2)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sources)
    }

    pub fn create_data_source(&self, input: CreateDataSourceInput) -> Result<DataSource> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO data_sources (id, name, created_at) VALUES (?, ?, ?)",
            (id.to_string(), &input.name, now.to_rfc3339()),
        )?;

        Ok(DataSource {
            id,
            name: input.name,
            created_at: now,
        })
    }

    pub fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM accounts WHERE id = ?")?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Account {
                id: parse_uuid(row.get::<_, String>(0)?),
                name: row.get(1)?,
                created_at: parse_datetime(row.get::<_, String>(2)?),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn create_account(&self, input: CreateAccountInput) -> Result<Account> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO accounts (id, name, created_at) VALUES (?, ?, ?)",
            (id.to_string(), &input.name, now.to_rfc3339()),
        )?;

        Ok(Account {
            id,
            name: input.name,
            created_at: now,
        })
    }

    // ============================================================
    // Reloading session operations
    // ============================================================

    /// Persist a draft that passes cross-field validation.
    ///
    /// Callers that want the structured violation list should run
    /// [`validate::validate_draft`] themselves first; this re-check only
    /// guards against an invalid draft reaching storage.
    pub fn create_reloading_session(&self, draft: SessionDraft) -> Result<ReloadingSession> {
        let violations = validate::validate_draft(&draft);
        if !violations.is_empty() {
            let detail = violations
                .iter()
                .map(|v| format!("{}: {}", v.field.as_str(), v.rule))
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("Session draft is invalid: {}", detail);
        }

        let account_id = draft.account_id.context("account missing")?;
        let data_source_id = draft.data_source_id.context("data source missing")?;
        let cartridge_type_id = draft.cartridge_type_id.context("cartridge type missing")?;
        let cartridge_id = draft.cartridge_id.context("cartridge missing")?;
        let primer_type_id = draft.primer_type_id.context("primer type missing")?;
        let powder_id = draft.powder_id.context("powder missing")?;
        let bullet_id = draft.bullet_id.context("bullet missing")?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();
        let loaded_at = draft.loaded_at.unwrap_or(now);
        // Integrality was just validated; the stored column is INTEGER.
        let quantity = draft.quantity.map(|q| q as i64);

        conn.execute(
            "INSERT INTO reloading_sessions (
                id, account_id, data_source_id, custom_data_source_name,
                cartridge_type_id, cartridge_id, primer_type_id, powder_id,
                bullet_id, bullet_weight_id, bullet_weight_other, loaded_at,
                quantity, cartridge_overall_length, powder_weight, notes,
                created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                id.to_string(),
                account_id.to_string(),
                data_source_id.to_string(),
                &draft.custom_data_source_name,
                cartridge_type_id,
                cartridge_id,
                primer_type_id,
                powder_id,
                bullet_id,
                draft.bullet_weight_id,
                draft.bullet_weight_other,
                loaded_at.to_rfc3339(),
                quantity,
                draft.cartridge_overall_length,
                draft.powder_weight,
                &draft.notes,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(ReloadingSession {
            id,
            account_id,
            data_source_id,
            custom_data_source_name: draft.custom_data_source_name,
            cartridge_type_id,
            cartridge_id,
            primer_type_id,
            powder_id,
            bullet_id,
            bullet_weight_id: draft.bullet_weight_id,
            bullet_weight_other: draft.bullet_weight_other,
            loaded_at,
            quantity,
            cartridge_overall_length: draft.cartridge_overall_length,
            powder_weight: draft.powder_weight,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_reloading_session(&self, id: Uuid) -> Result<Option<ReloadingSession>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM reloading_sessions WHERE id = ?"
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(map_session_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn get_all_reloading_sessions(&self) -> Result<Vec<ReloadingSession>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM reloading_sessions ORDER BY loaded_at DESC"
        ))?;

        let sessions = stmt
            .query_map([], map_session_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    pub fn get_sessions_by_account(&self, account_id: Uuid) -> Result<Vec<ReloadingSession>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM reloading_sessions
             WHERE account_id = ? ORDER BY loaded_at DESC"
        ))?;

        let sessions = stmt
            .query_map([account_id.to_string()], map_session_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    pub fn delete_reloading_session(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "DELETE FROM reloading_sessions WHERE id = ?",
            [id.to_string()],
        )?;
        Ok(rows > 0)
    }

    // ============================================================
    // Reference data seeding
    // ============================================================

    /// Idempotently ensure the stock reference data exists.
    ///
    /// Safe to run on every startup; existing rows are left alone.
    pub fn seed_reference_data(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");

        for name in [
            "Hodgdon Reloading",
            "Other",
            "Berger",
            "Speer",
            "Lyman",
            "Hornady",
        ] {
            conn.execute(
                "INSERT OR IGNORE INTO data_sources (id, name, created_at) VALUES (?, ?, ?)",
                (
                    Uuid::new_v4().to_string(),
                    name,
                    Utc::now().to_rfc3339(),
                ),
            )?;
        }

        let rifle = ensure_cartridge_type(&conn, "Rifle")?;
        let pistol = ensure_cartridge_type(&conn, "Pistol")?;
        let shotgun = ensure_cartridge_type(&conn, "Shotgun")?;

        let primer_types = [
            ("Large Rifle", rifle),
            ("Large Rifle Magnum", rifle),
            ("Small Rifle", rifle),
            ("Small Rifle Magnum", rifle),
            ("Small Pistol", pistol),
            ("Large Pistol", pistol),
            ("Small Pistol Magnum", pistol),
            ("Large Pistol Magnum", pistol),
            ("209", shotgun),
        ];
        for (name, ct_id) in primer_types {
            conn.execute(
                "INSERT OR IGNORE INTO primer_types (name, cartridge_type_id) VALUES (?, ?)",
                (name, ct_id),
            )?;
        }

        let powders = [
            ("HP-38", "Winchester"),
            ("231", "Winchester"),
            ("WST", "Winchester"),
            ("WSF", "Winchester"),
            ("WAP", "Winchester"),
            ("Unique", "Alliant"),
            ("Universal", "Alliant"),
            ("Red Dot", "Alliant"),
            ("Green Dot", "Alliant"),
            ("Blue Dot", "Alliant"),
            ("Bullseye", "Alliant"),
            ("Power Pistol", "Alliant"),
            ("Titegroup", "Hodgdon"),
            ("CFE Pistol", "Hodgdon"),
        ];
        for (name, manufacturer) in powders {
            conn.execute(
                "INSERT OR IGNORE INTO powders (name, manufacturer_name) VALUES (?, ?)",
                (name, manufacturer),
            )?;
        }

        // Pistol-only powders stay off the rifle list; everything else is
        // usable in rifle cartridges.
        let pistol_only = ["HP-38", "231"];
        for (name, _) in powders {
            if !pistol_only.contains(&name) {
                ensure_powder_link(&conn, rifle, name)?;
            }
            ensure_powder_link(&conn, pistol, name)?;
        }
        for name in ["Blue Dot", "Green Dot", "Red Dot", "Universal", "Unique"] {
            ensure_powder_link(&conn, shotgun, name)?;
        }

        let source_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM data_sources", [], |row| row.get(0))?;
        let powder_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM powders", [], |row| row.get(0))?;
        tracing::info!(
            "Reference data seeded: {} data sources, {} powders",
            source_count,
            powder_count
        );

        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

const SESSION_COLUMNS: &str = "id, account_id, data_source_id, custom_data_source_name, \
     cartridge_type_id, cartridge_id, primer_type_id, powder_id, bullet_id, \
     bullet_weight_id, bullet_weight_other, loaded_at, quantity, \
     cartridge_overall_length, powder_weight, notes, created_at, updated_at";

fn map_session_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReloadingSession> {
    Ok(ReloadingSession {
        id: parse_uuid(row.get::<_, String>(0)?),
        account_id: parse_uuid(row.get::<_, String>(1)?),
        data_source_id: parse_uuid(row.get::<_, String>(2)?),
        custom_data_source_name: row.get(3)?,
        cartridge_type_id: row.get(4)?,
        cartridge_id: row.get(5)?,
        primer_type_id: row.get(6)?,
        powder_id: row.get(7)?,
        bullet_id: row.get(8)?,
        bullet_weight_id: row.get(9)?,
        bullet_weight_other: row.get(10)?,
        loaded_at: parse_datetime(row.get::<_, String>(11)?),
        quantity: row.get(12)?,
        cartridge_overall_length: row.get(13)?,
        powder_weight: row.get(14)?,
        notes: row.get(15)?,
        created_at: parse_datetime(row.get::<_, String>(16)?),
        updated_at: parse_datetime(row.get::<_, String>(17)?),
    })
}

fn load_link_map(
    conn: &Connection,
    table: &str,
    entity_column: &str,
) -> Result<HashMap<i64, Vec<i64>>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {entity_column}, cartridge_type_id FROM {table} ORDER BY cartridge_type_id"
    ))?;

    let mut links: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let entity_id: i64 = row.get(0)?;
        let cartridge_type_id: i64 = row.get(1)?;
        links.entry(entity_id).or_default().push(cartridge_type_id);
    }

    Ok(links)
}

fn ensure_cartridge_type(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO cartridge_types (name) VALUES (?)",
        [name],
    )?;
    let id = conn.query_row(
        "SELECT id FROM cartridge_types WHERE name = ?",
        [name],
        |row| row.get(0),
    )?;
    Ok(id)
}

fn ensure_powder_link(conn: &Connection, cartridge_type_id: i64, powder_name: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO cartridge_type_powders (cartridge_type_id, powder_id)
         SELECT ?, id FROM powders WHERE name = ?",
        (cartridge_type_id, powder_name),
    )?;
    Ok(())
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
