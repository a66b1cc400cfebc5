pub const SCHEMA: &str = r#"
-- Named groupings referenced by apps
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

-- Publishers referenced by apps
CREATE TABLE IF NOT EXISTS developers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE
);

-- App-store listings, bulk-populated by the external scraper
CREATE TABLE IF NOT EXISTS apps (
    id INTEGER PRIMARY KEY,
    app_id TEXT NOT NULL UNIQUE,      -- store-assigned external id
    app_name TEXT NOT NULL,

    -- Optional relationships; rows ingested before their category or
    -- developer is known carry NULL here
    category_id INTEGER REFERENCES categories(id),
    developer_id INTEGER REFERENCES developers(id),

    rating REAL,                      -- 0.0-5.0 when present
    rating_count INTEGER,
    installs INTEGER,
    min_installs INTEGER,
    max_installs INTEGER,
    free INTEGER,
    price REAL,
    currency TEXT,
    size REAL,
    min_android TEXT,
    released TEXT,                    -- YYYY-MM-DD
    last_updated TEXT,                -- YYYY-MM-DD
    content_rating TEXT,
    ad_supported INTEGER,
    in_app_purchases INTEGER,
    editors_choice INTEGER,
    scraped_time TEXT                 -- YYYY-MM-DD HH:MM:SS
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_apps_category_free ON apps(category_id, free);
CREATE INDEX IF NOT EXISTS idx_apps_content_rating ON apps(content_rating);
"#;
