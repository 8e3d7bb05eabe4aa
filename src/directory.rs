use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::sync::RwLock;

use crate::error::{DirectoryError, Result};

/// A single extracurricular activity.
///
/// `name` is the directory key and is carried outside the record when
/// serialized, so the JSON form is `{description, schedule, max_participants, participants}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(skip)]
    pub name: String,
    pub description: String,
    pub schedule: String,
    /// Informational only, never checked on signup.
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Activity {
    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }
}

/// Ordered set of activities keyed by name.
///
/// Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog(Vec<Activity>);

impl Catalog {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self(activities)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.0.iter().find(|a| a.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|a| a.name.as_str()).collect()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for activity in &self.0 {
            map.serialize_entry(&activity.name, activity)?;
        }
        map.end()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of activity name to activity record")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Catalog, A::Error> {
        let mut activities: Vec<Activity> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, mut activity)) = access.next_entry::<String, Activity>()? {
            if activities.iter().any(|a| a.name == name) {
                return Err(de::Error::custom(format!("duplicate activity '{}'", name)));
            }
            activity.name = name;
            activities.push(activity);
        }
        Ok(Catalog(activities))
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// In-memory activity directory shared by all request handlers.
///
/// The set of activities is fixed at construction; only participant lists
/// change. Membership edits hold the write lock across the check and the
/// mutation, so concurrent signups for the same email cannot both succeed.
pub struct ActivityDirectory {
    activities: RwLock<Vec<Activity>>,
}

impl ActivityDirectory {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            activities: RwLock::new(catalog.0),
        }
    }

    /// Snapshot of every activity with its current participants.
    pub async fn list(&self) -> Catalog {
        Catalog(self.activities.read().await.clone())
    }

    pub async fn len(&self) -> usize {
        self.activities.read().await.len()
    }

    /// Snapshot of a single activity.
    pub async fn get(&self, activity_name: &str) -> Result<Activity> {
        self.activities
            .read()
            .await
            .iter()
            .find(|a| a.name == activity_name)
            .cloned()
            .ok_or_else(|| DirectoryError::ActivityNotFound(activity_name.to_string()))
    }

    /// Append `email` to the activity's participants.
    pub async fn signup(&self, activity_name: &str, email: &str) -> Result<String> {
        let mut activities = self.activities.write().await;
        let activity = find_mut(&mut activities, activity_name)?;

        if activity.has_participant(email) {
            return Err(DirectoryError::AlreadySignedUp {
                activity: activity_name.to_string(),
                email: email.to_string(),
            });
        }

        activity.participants.push(email.to_string());
        Ok(format!("Signed up {} for {}", email, activity_name))
    }

    /// Remove `email` from the activity's participants.
    pub async fn unregister(&self, activity_name: &str, email: &str) -> Result<String> {
        let mut activities = self.activities.write().await;
        let activity = find_mut(&mut activities, activity_name)?;

        let position = activity
            .participants
            .iter()
            .position(|p| p == email)
            .ok_or_else(|| DirectoryError::NotRegistered {
                activity: activity_name.to_string(),
                email: email.to_string(),
            })?;

        activity.participants.remove(position);
        Ok(format!("Unregistered {} from {}", email, activity_name))
    }
}

fn find_mut<'a>(activities: &'a mut [Activity], activity_name: &str) -> Result<&'a mut Activity> {
    activities
        .iter_mut()
        .find(|a| a.name == activity_name)
        .ok_or_else(|| DirectoryError::ActivityNotFound(activity_name.to_string()))
}
