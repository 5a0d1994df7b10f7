//! Shared builders for in-memory test databases.

use chrono::NaiveDate;

use crate::models::{AreaKey, ElementSubtype, NewNaturalElement, NewPark, NewVisitor};
use crate::Database;

pub fn count_rows(db: &Database, table: &str) -> i64 {
    db.conn
        .borrow()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

/// A park declared on 2020-01-01 whose contact is `<code>@example.com`.
pub fn new_park(name: &str, code: &str, total_area: f64) -> NewPark {
    NewPark {
        name: name.into(),
        declaration_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        contact_email: Some(format!("{}@example.com", code.to_lowercase())),
        code: Some(code.into()),
        total_area: Some(total_area),
    }
}

pub fn new_visitor(dni: &str, park_id: i64) -> NewVisitor {
    NewVisitor {
        dni: dni.into(),
        name: format!("Visitante {}", dni),
        address: None,
        profession: None,
        accommodation_id: None,
        park_id,
    }
}

pub fn vegetal(name: &str, individuals: i64) -> NewNaturalElement {
    NewNaturalElement {
        scientific_name: name.into(),
        common_name: None,
        number_of_individuals: individuals,
        subtype: ElementSubtype::Vegetal {
            flowering_period: Some("spring".into()),
        },
    }
}

pub fn animal(name: &str, individuals: i64) -> NewNaturalElement {
    NewNaturalElement {
        scientific_name: name.into(),
        common_name: None,
        number_of_individuals: individuals,
        subtype: ElementSubtype::Animal {
            diet: Some("omnivore".into()),
            mating_season: None,
        },
    }
}

pub fn mineral(name: &str) -> NewNaturalElement {
    NewNaturalElement {
        scientific_name: name.into(),
        common_name: None,
        number_of_individuals: 0,
        subtype: ElementSubtype::Mineral {
            crystal_or_rock: Some("rock".into()),
        },
    }
}

/// Ids created by [`scenario`].
pub struct Scenario {
    pub park_a: i64,
    pub park_b: i64,
    pub park_c: i64,
    pub area_a: AreaKey,
    pub area_b: AreaKey,
    pub area_c: AreaKey,
    pub plantus_communis: i64,
    pub plantus_rarus: i64,
    pub animalia_familiaris: i64,
}

/// Three parks across three provinces:
///
/// - A in Buenos Aires, B in Córdoba, C in Córdoba and Santa Fe
/// - `Plantus communis` in A, B and C; `Plantus rarus` and
///   `Animalia familiaris` in A only
/// - one visitor in A, two in B, one in C
/// - C's provincial extensions (1000 + 1500) fall short of its 3000 ha
pub fn scenario() -> (Database, Scenario) {
    let db = Database::new().unwrap();

    let ba = db.insert_province("Buenos Aires", "OPDS").unwrap();
    let co = db.insert_province("Córdoba", "Secretaría de Ambiente").unwrap();
    let sf = db.insert_province("Santa Fe", "Ministerio de Ambiente").unwrap();

    let park_a = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
    let park_b = db.insert_park(&new_park("Parque B", "B", 2000.0)).unwrap();
    let park_c = db.insert_park(&new_park("Parque C", "C", 3000.0)).unwrap();

    db.link_park_province(park_a, ba, Some(1000.0)).unwrap();
    db.link_park_province(park_b, co, Some(2000.0)).unwrap();
    db.link_park_province(park_c, co, Some(1000.0)).unwrap();
    db.link_park_province(park_c, sf, Some(1500.0)).unwrap();

    let area_a = AreaKey::new(park_a, 1);
    let area_b = AreaKey::new(park_b, 1);
    let area_c = AreaKey::new(park_c, 1);
    for area in [area_a, area_b, area_c] {
        db.insert_park_area(area, Some("Sector 1"), None).unwrap();
    }

    let plantus_communis = db.insert_natural_element(&vegetal("Plantus communis", 300)).unwrap();
    let plantus_rarus = db.insert_natural_element(&vegetal("Plantus rarus", 10)).unwrap();
    let animalia_familiaris = db.insert_natural_element(&animal("Animalia familiaris", 25)).unwrap();

    for area in [area_a, area_b, area_c] {
        db.add_area_element(area, plantus_communis, 100).unwrap();
    }
    db.add_area_element(area_a, plantus_rarus, 10).unwrap();
    db.add_area_element(area_a, animalia_familiaris, 25).unwrap();

    for (dni, park) in [("1", park_a), ("2", park_b), ("3", park_b), ("4", park_c)] {
        db.insert_visitor(&new_visitor(dni, park)).unwrap();
    }

    let s = Scenario {
        park_a,
        park_b,
        park_c,
        area_a,
        area_b,
        area_c,
        plantus_communis,
        plantus_rarus,
        animalia_familiaris,
    };
    (db, s)
}
