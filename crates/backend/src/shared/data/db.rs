use std::path::Path;

use anyhow::Context;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};

use crate::shared::config::{get_database_path, Config};

/// Open the configured database and make sure every table exists
pub async fn connect(config: &Config) -> anyhow::Result<DatabaseConnection> {
    let url = if config.is_in_memory() {
        "sqlite::memory:".to_string()
    } else {
        let path = get_database_path(config)?;
        file_url(&path)?
    };

    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);
    if config.is_in_memory() {
        // Every pooled connection would get its own empty database
        options.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(options)
        .await
        .context("Failed to open database")?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

fn file_url(db_file: &Path) -> anyhow::Result<String> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

const SCHEMA: &[(&str, &str)] = &[
    (
        "sys_users",
        r#"
        CREATE TABLE IF NOT EXISTS sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            email TEXT,
            password_hash TEXT NOT NULL,
            full_name TEXT,
            role TEXT NOT NULL,
            phone TEXT NOT NULL DEFAULT '',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_login_at TEXT,
            created_by TEXT
        );
        "#,
    ),
    (
        "sys_refresh_tokens",
        r#"
        CREATE TABLE IF NOT EXISTS sys_refresh_tokens (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            token_hash TEXT NOT NULL UNIQUE,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            revoked_at TEXT
        );
        "#,
    ),
    (
        "sys_settings",
        r#"
        CREATE TABLE IF NOT EXISTS sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "a001_ambulance",
        r#"
        CREATE TABLE IF NOT EXISTS a001_ambulance (
            id TEXT PRIMARY KEY NOT NULL,
            vehicle_number TEXT NOT NULL UNIQUE,
            license_number TEXT NOT NULL UNIQUE,
            model TEXT NOT NULL,
            year INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'available',
            latitude REAL,
            longitude REAL,
            assigned_driver_id TEXT,
            assigned_paramedic_id TEXT,
            last_maintenance TEXT NOT NULL,
            next_maintenance TEXT NOT NULL,
            insurance_expiry TEXT NOT NULL,
            equipment TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a002_patient",
        r#"
        CREATE TABLE IF NOT EXISTS a002_patient (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL,
            phone TEXT,
            medical_condition TEXT NOT NULL,
            allergies TEXT NOT NULL DEFAULT '[]',
            medications TEXT NOT NULL DEFAULT '[]',
            emergency_contact_name TEXT NOT NULL,
            emergency_contact_phone TEXT NOT NULL,
            emergency_contact_relation TEXT NOT NULL,
            pickup_latitude REAL NOT NULL,
            pickup_longitude REAL NOT NULL,
            pickup_address TEXT NOT NULL,
            destination_latitude REAL NOT NULL,
            destination_longitude REAL NOT NULL,
            destination_address TEXT NOT NULL,
            hospital_name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a003_emergency_call",
        r#"
        CREATE TABLE IF NOT EXISTS a003_emergency_call (
            id TEXT PRIMARY KEY NOT NULL,
            caller_name TEXT NOT NULL,
            caller_phone TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            address TEXT NOT NULL,
            priority TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            description TEXT NOT NULL,
            assigned_ambulance_id TEXT,
            dispatcher_id TEXT,
            patient_id TEXT,
            request_source TEXT NOT NULL,
            requester_type TEXT NOT NULL,
            organization_name TEXT,
            department_name TEXT,
            contact_person TEXT,
            reference_number TEXT,
            response_time INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a004_trip",
        r#"
        CREATE TABLE IF NOT EXISTS a004_trip (
            id TEXT PRIMARY KEY NOT NULL,
            call_id TEXT NOT NULL UNIQUE,
            ambulance_id TEXT NOT NULL,
            patient_id TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT,
            distance REAL NOT NULL DEFAULT 0,
            cost REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a005_driver_inspection",
        r#"
        CREATE TABLE IF NOT EXISTS a005_driver_inspection (
            id TEXT PRIMARY KEY NOT NULL,
            driver_id TEXT NOT NULL,
            ambulance_id TEXT NOT NULL,
            date TEXT NOT NULL,
            shift TEXT NOT NULL,
            vehicle_inspection TEXT NOT NULL DEFAULT '[]',
            mileage INTEGER NOT NULL,
            fuel_level INTEGER NOT NULL,
            overall_status TEXT NOT NULL,
            additional_notes TEXT,
            submitted_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0,
            UNIQUE (driver_id, ambulance_id, date, shift)
        );
        "#,
    ),
    (
        "a006_paramedic_inspection",
        r#"
        CREATE TABLE IF NOT EXISTS a006_paramedic_inspection (
            id TEXT PRIMARY KEY NOT NULL,
            paramedic_id TEXT NOT NULL,
            ambulance_id TEXT NOT NULL,
            date TEXT NOT NULL,
            shift TEXT NOT NULL,
            medical_equipment TEXT NOT NULL DEFAULT '[]',
            overall_status TEXT NOT NULL,
            additional_notes TEXT,
            submitted_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0,
            UNIQUE (paramedic_id, ambulance_id, date, shift)
        );
        "#,
    ),
    (
        "a007_maintenance_record",
        r#"
        CREATE TABLE IF NOT EXISTS a007_maintenance_record (
            id TEXT PRIMARY KEY NOT NULL,
            ambulance_id TEXT NOT NULL,
            maintenance_type TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'scheduled',
            scheduled_date TEXT NOT NULL,
            completed_date TEXT,
            description TEXT NOT NULL,
            cost REAL,
            vendor TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
];

/// Minimal schema bootstrap, safe to run on every start
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for (table, sql) in SCHEMA {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await
        .with_context(|| format!("Failed to create table {}", table))?;
    }
    tracing::info!("Database schema ready ({} tables)", SCHEMA.len());
    Ok(())
}
