use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::directory::{Activity, Catalog};

fn activity(
    name: &str,
    description: &str,
    schedule: &str,
    max_participants: u32,
    participants: &[&str],
) -> Activity {
    Activity {
        name: name.to_string(),
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

/// The built-in Mergington High School activity list.
pub fn default_catalog() -> Catalog {
    Catalog::new(vec![
        activity(
            "Chess Club",
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
            &["michael@mergington.edu", "daniel@mergington.edu"],
        ),
        activity(
            "Programming Class",
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
            &["emma@mergington.edu", "sophia@mergington.edu"],
        ),
        activity(
            "Gym Class",
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
            &["john@mergington.edu", "olivia@mergington.edu"],
        ),
        activity(
            "Basketball Team",
            "Competitive basketball training and games",
            "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
            15,
            &["alex@mergington.edu"],
        ),
        activity(
            "Tennis Club",
            "Tennis skills development and friendly matches",
            "Tuesdays and Thursdays, 4:00 PM - 5:00 PM",
            16,
            &["maya@mergington.edu", "lucas@mergington.edu"],
        ),
        activity(
            "Art Studio",
            "Painting, drawing, and visual arts exploration",
            "Wednesdays, 3:30 PM - 5:00 PM",
            18,
            &["isabella@mergington.edu"],
        ),
        activity(
            "Music Band",
            "Learn instruments and perform in concerts",
            "Mondays and Fridays, 3:30 PM - 4:30 PM",
            25,
            &["noah@mergington.edu", "ava@mergington.edu"],
        ),
        activity(
            "Debate Team",
            "Develop public speaking and critical thinking skills",
            "Thursdays, 3:30 PM - 5:00 PM",
            14,
            &["liam@mergington.edu"],
        ),
        activity(
            "Science Club",
            "Conduct experiments and explore STEM topics",
            "Tuesdays, 4:00 PM - 5:30 PM",
            20,
            &["amelia@mergington.edu", "ethan@mergington.edu"],
        ),
    ])
}

/// Load an alternate activity list from a JSON file shaped like the
/// `GET /activities` response.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file: {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse seed file: {}", path.display()))?;
    validate(&catalog)?;
    Ok(catalog)
}

fn validate(catalog: &Catalog) -> Result<()> {
    for activity in catalog.iter() {
        for (i, email) in activity.participants.iter().enumerate() {
            if activity.participants[..i].contains(email) {
                bail!(
                    "activity '{}' lists participant '{}' more than once",
                    activity.name,
                    email
                );
            }
        }
    }
    Ok(())
}
