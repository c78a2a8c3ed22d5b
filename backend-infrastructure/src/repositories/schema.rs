// SQLite schema. Timestamps are UTC epoch millis.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS checkpoints (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    radius_meters REAL NOT NULL,
    qr_token TEXT NOT NULL,
    token_rotated_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS members (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    photo_url TEXT
);

CREATE TABLE IF NOT EXISTS shifts (
    id TEXT PRIMARY KEY,
    member_id TEXT NOT NULL,
    checkpoint_id TEXT NOT NULL,
    starts_at INTEGER NOT NULL,
    ends_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_shifts_member ON shifts(member_id, starts_at);
CREATE INDEX IF NOT EXISTS idx_shifts_ends_at ON shifts(ends_at);
CREATE INDEX IF NOT EXISTS idx_shifts_checkpoint ON shifts(checkpoint_id, ends_at);

CREATE TABLE IF NOT EXISTS check_in_events (
    id TEXT PRIMARY KEY,
    shift_id TEXT NOT NULL,
    event_type TEXT NOT NULL,
    occurred_at INTEGER NOT NULL,
    received_at INTEGER NOT NULL,
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    token_rotated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_check_in_events_shift ON check_in_events(shift_id, occurred_at);

CREATE TABLE IF NOT EXISTS rejected_check_ins (
    id TEXT PRIMARY KEY,
    shift_id TEXT NOT NULL,
    event_type TEXT NOT NULL,
    occurred_at INTEGER NOT NULL,
    received_at INTEGER NOT NULL,
    lat REAL,
    lng REAL,
    reason TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_rejected_check_ins_shift ON rejected_check_ins(shift_id, received_at);

CREATE TABLE IF NOT EXISTS attendance_records (
    shift_id TEXT PRIMARY KEY,
    verdict TEXT NOT NULL,
    evaluated_at INTEGER NOT NULL,
    finalized INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS fine_settings (
    violation_type TEXT PRIMARY KEY,
    amount INTEGER NOT NULL,
    tolerance_minutes INTEGER NOT NULL,
    is_active INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS fines (
    id TEXT PRIMARY KEY,
    member_id TEXT NOT NULL,
    shift_id TEXT NOT NULL UNIQUE,
    violation_type TEXT NOT NULL,
    amount INTEGER NOT NULL,
    status TEXT NOT NULL,
    generated_at INTEGER NOT NULL,
    paid_at INTEGER,
    paid_by TEXT
);
CREATE INDEX IF NOT EXISTS idx_fines_status ON fines(status, generated_at);

CREATE TABLE IF NOT EXISTS ledger_credits (
    fine_id TEXT PRIMARY KEY,
    member_id TEXT NOT NULL,
    violation_type TEXT NOT NULL,
    amount INTEGER NOT NULL,
    credited_at INTEGER NOT NULL,
    acting_admin TEXT NOT NULL
);
"#;
