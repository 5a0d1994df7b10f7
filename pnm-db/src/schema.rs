//! SQL schema definitions for the park management database.
//!
//! Contains CREATE TABLE statements, indexes and business-rule triggers.
//! The schema is applied as a single batch when the database is opened.
//! Foreign keys are only enforced when `PRAGMA foreign_keys = ON` is set on
//! the connection; see [`crate::Database::open`].

/// Every table created by [`create_schema`], in dependency order
/// (parents before children).
pub const TABLES: &[&str] = &[
    "provinces",
    "parks",
    "park_provinces",
    "park_areas",
    "natural_elements",
    "vegetal_elements",
    "animal_elements",
    "mineral_elements",
    "area_elements",
    "element_food",
    "research_projects",
    "personnel",
    "management_personnel",
    "surveillance_personnel",
    "research_personnel",
    "conservation_personnel",
    "accommodations",
    "visitors",
    "excursions",
    "accommodation_excursions",
    "visitor_excursions",
    "email_log",
    "species_groups",
    "visitor_stats",
];

/// Names of the trigger-enforced business rules, as surfaced in
/// [`crate::DbError::BusinessRule`].
pub mod rules {
    pub const MINERAL_NOT_FOOD: &str = "check_mineral_not_food";
    pub const VEGETAL_NOT_FEEDING: &str = "check_vegetal_not_feeding";
    pub const ELEMENT_SUBTYPE_DISJOINT: &str = "check_element_subtype_disjoint";
}

/// Returns the full SQL schema as a single batch string.
///
/// **Geography:** `provinces`, `parks`, `park_provinces`, `park_areas`
///
/// **Natural elements:** `natural_elements` with the disjoint subtypes
/// `vegetal_elements`, `animal_elements`, `mineral_elements`; populations in
/// `area_elements`; the feeding graph in `element_food`
///
/// **Staff:** `personnel` with role tables `management_personnel`,
/// `surveillance_personnel`, `research_personnel`, `conservation_personnel`;
/// `research_projects`
///
/// **Visits:** `accommodations`, `visitors`, `excursions` and the join tables
/// `accommodation_excursions`, `visitor_excursions`
///
/// **Side tables:** `email_log` (population decrease notifications),
/// `species_groups` and `visitor_stats` (reference data from the importer)
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS provinces (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        responsible_organization TEXT NOT NULL
            CONSTRAINT check_responsible_organization
            CHECK (length(trim(responsible_organization)) > 0)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS parks (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        declaration_date TEXT NOT NULL
            CONSTRAINT check_declaration_date
            CHECK (date(declaration_date) IS declaration_date),
        contact_email TEXT,
        code TEXT UNIQUE,
        total_area REAL CONSTRAINT check_total_area CHECK (total_area >= 0)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS park_provinces (
        park_id INTEGER NOT NULL REFERENCES parks(id),
        province_id INTEGER NOT NULL REFERENCES provinces(id),
        extension_in_province REAL
            CONSTRAINT check_extension_in_province CHECK (extension_in_province >= 0),
        PRIMARY KEY (park_id, province_id)
    ) STRICT;
    CREATE INDEX IF NOT EXISTS idx_park_provinces_province ON park_provinces(province_id);

    CREATE TABLE IF NOT EXISTS park_areas (
        park_id INTEGER NOT NULL REFERENCES parks(id),
        area_number INTEGER NOT NULL,
        name TEXT,
        extension REAL CONSTRAINT check_area_extension CHECK (extension >= 0),
        PRIMARY KEY (park_id, area_number)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS natural_elements (
        id INTEGER PRIMARY KEY,
        scientific_name TEXT NOT NULL,
        common_name TEXT,
        number_of_individuals INTEGER NOT NULL DEFAULT 0
            CONSTRAINT check_element_individuals CHECK (number_of_individuals >= 0)
    ) STRICT;
    CREATE INDEX IF NOT EXISTS idx_natural_elements_scientific_name
        ON natural_elements(scientific_name);

    CREATE TABLE IF NOT EXISTS vegetal_elements (
        element_id INTEGER PRIMARY KEY REFERENCES natural_elements(id),
        flowering_period TEXT
    ) STRICT;

    CREATE TABLE IF NOT EXISTS animal_elements (
        element_id INTEGER PRIMARY KEY REFERENCES natural_elements(id),
        diet TEXT,
        mating_season TEXT
    ) STRICT;

    CREATE TABLE IF NOT EXISTS mineral_elements (
        element_id INTEGER PRIMARY KEY REFERENCES natural_elements(id),
        crystal_or_rock TEXT
    ) STRICT;

    CREATE TABLE IF NOT EXISTS area_elements (
        park_id INTEGER NOT NULL,
        area_number INTEGER NOT NULL,
        element_id INTEGER NOT NULL REFERENCES natural_elements(id),
        number_of_individuals INTEGER NOT NULL DEFAULT 0
            CONSTRAINT check_area_individuals CHECK (number_of_individuals >= 0),
        PRIMARY KEY (park_id, area_number, element_id),
        FOREIGN KEY (park_id, area_number) REFERENCES park_areas(park_id, area_number)
    ) STRICT;
    CREATE INDEX IF NOT EXISTS idx_area_elements_element ON area_elements(element_id);

    CREATE TABLE IF NOT EXISTS element_food (
        element_id INTEGER NOT NULL REFERENCES natural_elements(id),
        food_element_id INTEGER NOT NULL REFERENCES natural_elements(id),
        PRIMARY KEY (element_id, food_element_id)
    ) STRICT;
    CREATE INDEX IF NOT EXISTS idx_element_food_food ON element_food(food_element_id);

    CREATE TABLE IF NOT EXISTS research_projects (
        id INTEGER PRIMARY KEY,
        budget REAL NOT NULL CONSTRAINT check_budget CHECK (budget >= 0),
        duration TEXT NOT NULL,
        element_id INTEGER NOT NULL REFERENCES natural_elements(id)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS personnel (
        id INTEGER PRIMARY KEY,
        DNI TEXT NOT NULL UNIQUE,
        CUIL TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        address TEXT,
        phone_numbers TEXT,
        salary REAL CONSTRAINT check_salary CHECK (salary >= 0)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS management_personnel (
        personnel_id INTEGER PRIMARY KEY REFERENCES personnel(id),
        entrance_number INTEGER NOT NULL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS surveillance_personnel (
        personnel_id INTEGER PRIMARY KEY REFERENCES personnel(id),
        vehicle_type TEXT,
        vehicle_registration TEXT
    ) STRICT;

    CREATE TABLE IF NOT EXISTS research_personnel (
        personnel_id INTEGER PRIMARY KEY REFERENCES personnel(id),
        title TEXT,
        project_id INTEGER REFERENCES research_projects(id)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS conservation_personnel (
        personnel_id INTEGER PRIMARY KEY REFERENCES personnel(id),
        specialty TEXT,
        park_id INTEGER,
        area_number INTEGER,
        FOREIGN KEY (park_id, area_number) REFERENCES park_areas(park_id, area_number)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS accommodations (
        id INTEGER PRIMARY KEY,
        capacity INTEGER NOT NULL CONSTRAINT check_capacity CHECK (capacity > 0),
        category TEXT
    ) STRICT;

    CREATE TABLE IF NOT EXISTS visitors (
        id INTEGER PRIMARY KEY,
        DNI TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        address TEXT,
        profession TEXT,
        accommodation_id INTEGER REFERENCES accommodations(id),
        park_id INTEGER NOT NULL REFERENCES parks(id)
    ) STRICT;
    CREATE INDEX IF NOT EXISTS idx_visitors_park ON visitors(park_id);

    CREATE TABLE IF NOT EXISTS excursions (
        id INTEGER PRIMARY KEY,
        day_of_week TEXT NOT NULL,
        time TEXT NOT NULL CONSTRAINT check_excursion_time CHECK (time(time) IS time),
        type TEXT NOT NULL
            CONSTRAINT check_excursion_type CHECK (type IN ('foot', 'vehicle'))
    ) STRICT;

    CREATE TABLE IF NOT EXISTS accommodation_excursions (
        accommodation_id INTEGER NOT NULL REFERENCES accommodations(id),
        excursion_id INTEGER NOT NULL REFERENCES excursions(id),
        PRIMARY KEY (accommodation_id, excursion_id)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS visitor_excursions (
        visitor_id INTEGER NOT NULL REFERENCES visitors(id),
        excursion_id INTEGER NOT NULL REFERENCES excursions(id),
        PRIMARY KEY (visitor_id, excursion_id)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS email_log (
        id INTEGER PRIMARY KEY,
        park_id INTEGER NOT NULL,
        area_number INTEGER NOT NULL,
        element_id INTEGER NOT NULL,
        recipient_email TEXT,
        scientific_name TEXT NOT NULL,
        old_count INTEGER NOT NULL,
        new_count INTEGER NOT NULL,
        logged_at TEXT NOT NULL
    ) STRICT;
    CREATE INDEX IF NOT EXISTS idx_email_log_area
        ON email_log(park_id, area_number, element_id);

    CREATE TABLE IF NOT EXISTS species_groups (
        name TEXT PRIMARY KEY,
        count_argentina INTEGER,
        count_protected INTEGER,
        percentage REAL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS visitor_stats (
        year INTEGER PRIMARY KEY,
        residents_pct REAL,
        non_residents_pct REAL
    ) STRICT;

    -- Feeding graph: minerals are never food, vegetal elements never eat.
    CREATE TRIGGER IF NOT EXISTS element_food_mineral_not_food_insert
    BEFORE INSERT ON element_food
    WHEN EXISTS (SELECT 1 FROM mineral_elements WHERE element_id = NEW.food_element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_mineral_not_food');
    END;

    CREATE TRIGGER IF NOT EXISTS element_food_mineral_not_food_update
    BEFORE UPDATE ON element_food
    WHEN EXISTS (SELECT 1 FROM mineral_elements WHERE element_id = NEW.food_element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_mineral_not_food');
    END;

    CREATE TRIGGER IF NOT EXISTS element_food_vegetal_not_feeding_insert
    BEFORE INSERT ON element_food
    WHEN EXISTS (SELECT 1 FROM vegetal_elements WHERE element_id = NEW.element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_vegetal_not_feeding');
    END;

    CREATE TRIGGER IF NOT EXISTS element_food_vegetal_not_feeding_update
    BEFORE UPDATE ON element_food
    WHEN EXISTS (SELECT 1 FROM vegetal_elements WHERE element_id = NEW.element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_vegetal_not_feeding');
    END;

    -- An element belongs to at most one subtype table.
    CREATE TRIGGER IF NOT EXISTS vegetal_elements_disjoint_insert
    BEFORE INSERT ON vegetal_elements
    WHEN EXISTS (SELECT 1 FROM animal_elements WHERE element_id = NEW.element_id)
      OR EXISTS (SELECT 1 FROM mineral_elements WHERE element_id = NEW.element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_element_subtype_disjoint');
    END;

    CREATE TRIGGER IF NOT EXISTS vegetal_elements_disjoint_update
    BEFORE UPDATE OF element_id ON vegetal_elements
    WHEN EXISTS (SELECT 1 FROM animal_elements WHERE element_id = NEW.element_id)
      OR EXISTS (SELECT 1 FROM mineral_elements WHERE element_id = NEW.element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_element_subtype_disjoint');
    END;

    CREATE TRIGGER IF NOT EXISTS animal_elements_disjoint_insert
    BEFORE INSERT ON animal_elements
    WHEN EXISTS (SELECT 1 FROM vegetal_elements WHERE element_id = NEW.element_id)
      OR EXISTS (SELECT 1 FROM mineral_elements WHERE element_id = NEW.element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_element_subtype_disjoint');
    END;

    CREATE TRIGGER IF NOT EXISTS animal_elements_disjoint_update
    BEFORE UPDATE OF element_id ON animal_elements
    WHEN EXISTS (SELECT 1 FROM vegetal_elements WHERE element_id = NEW.element_id)
      OR EXISTS (SELECT 1 FROM mineral_elements WHERE element_id = NEW.element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_element_subtype_disjoint');
    END;

    CREATE TRIGGER IF NOT EXISTS mineral_elements_disjoint_insert
    BEFORE INSERT ON mineral_elements
    WHEN EXISTS (SELECT 1 FROM vegetal_elements WHERE element_id = NEW.element_id)
      OR EXISTS (SELECT 1 FROM animal_elements WHERE element_id = NEW.element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_element_subtype_disjoint');
    END;

    CREATE TRIGGER IF NOT EXISTS mineral_elements_disjoint_update
    BEFORE UPDATE OF element_id ON mineral_elements
    WHEN EXISTS (SELECT 1 FROM vegetal_elements WHERE element_id = NEW.element_id)
      OR EXISTS (SELECT 1 FROM animal_elements WHERE element_id = NEW.element_id)
    BEGIN
        SELECT RAISE(ABORT, 'check_element_subtype_disjoint');
    END;

    -- One notification row per population decrease.
    CREATE TRIGGER IF NOT EXISTS notify_population_decrease
    AFTER UPDATE OF number_of_individuals ON area_elements
    WHEN NEW.number_of_individuals < OLD.number_of_individuals
    BEGIN
        INSERT INTO email_log (
            park_id, area_number, element_id, recipient_email,
            scientific_name, old_count, new_count, logged_at
        )
        SELECT p.id, NEW.area_number, ne.id, p.contact_email,
               ne.scientific_name, OLD.number_of_individuals,
               NEW.number_of_individuals, datetime('now')
        FROM parks p, natural_elements ne
        WHERE p.id = NEW.park_id AND ne.id = NEW.element_id;
    END;
    "#
}
