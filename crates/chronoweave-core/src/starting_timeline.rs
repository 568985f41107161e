//! Default starting timeline for Chronoweave.
//!
//! Five events around the British industrial era (1800-1830) linked by
//! effect and cause edges, plus the category and impact-type catalogs the
//! presentation layer offers as filters.

use chronoweave_types::{Category, Event, ImpactType};

/// Helper to build an [`Event`] with title, description and impact.
fn event(
    id: u32,
    year: i32,
    category: &str,
    title: &str,
    description: &str,
    impact: &[(&str, f64)],
) -> Event {
    impact.iter().fold(
        Event::new(id, year, category).with_title(title, description),
        |event, &(metric, delta)| event.with_impact(metric, delta),
    )
}

/// The seed event set.
pub fn starting_events() -> Vec<Event> {
    vec![
        event(
            1,
            1800,
            "technological",
            "Industrial Revolution Peak",
            "Steam power and mechanized manufacturing transform society",
            &[("economy", 30.0), ("technology", 40.0), ("society", -20.0)],
        )
        .with_effects([2, 4]),
        event(
            2,
            1807,
            "social",
            "Abolition of Slave Trade",
            "British Parliament passes the Slave Trade Act",
            &[("society", 50.0), ("economy", -10.0)],
        )
        .with_effects([5])
        .with_caused_by([1]),
        event(
            3,
            1815,
            "political",
            "Battle of Waterloo",
            "Napoleon's final defeat reshapes European politics",
            &[("society", 20.0), ("economy", -15.0)],
        ),
        event(
            4,
            1820,
            "economic",
            "Textile Industry Boom",
            "Mass production of textiles accelerates urbanization",
            &[("economy", 25.0), ("society", 10.0), ("technology", 15.0)],
        )
        .with_caused_by([1]),
        event(
            5,
            1830,
            "social",
            "Public Education Reform",
            "Education becomes more accessible due to societal shifts",
            &[("education", 30.0), ("society", 15.0)],
        )
        .with_caused_by([2]),
    ]
}

/// Event categories offered as filters.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("technological", "Technological"),
        Category::new("social", "Social"),
        Category::new("political", "Political"),
        Category::new("economic", "Economic"),
    ]
}

/// Metrics offered as impact filters.
pub fn default_impact_types() -> Vec<ImpactType> {
    vec![
        ImpactType::new("economy", "Economic Impact"),
        ImpactType::new("society", "Social Impact"),
        ImpactType::new("technology", "Technological Impact"),
        ImpactType::new("education", "Educational Impact"),
        ImpactType::new("health", "Health Impact"),
    ]
}
