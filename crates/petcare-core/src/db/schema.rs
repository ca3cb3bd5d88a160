//! SQLite schema definition.

/// Complete database schema for the petcare portal.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    branch_id TEXT NOT NULL,
    specialization TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_doctors_branch ON doctors(branch_id);

-- ============================================================================
-- Pets
-- ============================================================================

CREATE TABLE IF NOT EXISTS pets (
    id TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL,
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_pets_customer ON pets(customer_id);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL REFERENCES pets(id),
    customer_id TEXT NOT NULL,
    branch_id TEXT NOT NULL,
    doctor_id TEXT NOT NULL REFERENCES doctors(id),
    service_type TEXT NOT NULL,                  -- medical-exam, single-vaccine, vaccine-package
    scheduled_at TEXT NOT NULL,                  -- RFC 3339 UTC instant
    reason TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'pending',      -- pending, checked-in, completed, cancelled
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointments(doctor_id, scheduled_at);
CREATE INDEX IF NOT EXISTS idx_appointments_customer ON appointments(customer_id);

-- At most one live booking per doctor and slot instant. Cancelled
-- appointments drop out of the index so their slot can be re-booked.
CREATE UNIQUE INDEX IF NOT EXISTS uq_appointments_doctor_slot
    ON appointments(doctor_id, scheduled_at)
    WHERE status != 'cancelled';

-- ============================================================================
-- Products (branch-local stock)
-- ============================================================================

CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    product_code TEXT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'other',      -- food, toy, accessory, medication, other
    price REAL NOT NULL CHECK (price >= 0),
    stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
    reorder_level INTEGER NOT NULL DEFAULT 0,
    branch_id TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (branch_id, product_code)
);

CREATE INDEX IF NOT EXISTS idx_products_branch ON products(branch_id);

-- ============================================================================
-- Orders
-- ============================================================================

CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL,
    items TEXT NOT NULL DEFAULT '[]',            -- JSON array of OrderItem
    subtotal REAL NOT NULL,
    tax REAL NOT NULL,
    loyalty_discount REAL NOT NULL DEFAULT 0,
    loyalty_points_applied INTEGER NOT NULL DEFAULT 0,
    total REAL NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',      -- pending, confirmed, shipped, delivered, cancelled
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_orders_customer ON orders(customer_id);

-- ============================================================================
-- Loyalty accounts (one per customer)
-- ============================================================================

CREATE TABLE IF NOT EXISTS loyalty_accounts (
    id TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL UNIQUE,
    points INTEGER NOT NULL DEFAULT 0 CHECK (points >= 0),
    tier TEXT NOT NULL DEFAULT 'bronze',         -- bronze, silver, gold
    total_spent REAL NOT NULL DEFAULT 0 CHECK (total_spent >= 0),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
