//! Globe desktop surface: topics, geotagged pins, and the camera.
//!
//! Field names serialize in camelCase so snapshots stay readable by the web build's existing
//! `globe-storage` entries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub lat: f64,
    pub lng: f64,
    /// Distance from the globe surface in globe radii.
    pub altitude: f64,
}

impl Default for CameraPosition {
    fn default() -> Self {
        Self {
            lat: 20.0,
            lng: 0.0,
            altitude: 2.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinContentKind {
    Article,
    Gallery,
    Link,
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLink {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinContent {
    #[serde(rename = "type")]
    pub kind: PinContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<PinImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<PinLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl PinContent {
    pub fn article(text: impl Into<String>) -> Self {
        Self {
            kind: PinContentKind::Article,
            text: Some(text.into()),
            images: Vec::new(),
            links: Vec::new(),
            embed_url: None,
            cover_image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    /// Emoji or icon path.
    pub icon: String,
    /// Accent color for the topic's pins.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobePin {
    pub id: String,
    pub topic_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: GeoPoint,
    pub content: PinContent,
    pub created_at: String,
    pub updated_at: String,
}

/// Persisted subset of [`GlobeState`]; selection and rotation reset on every boot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobeSnapshot {
    pub topics: Vec<Topic>,
    pub pins: Vec<GlobePin>,
    pub camera_position: CameraPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobeState {
    pub topics: Vec<Topic>,
    pub pins: Vec<GlobePin>,
    pub active_topic: Option<String>,
    pub selected_pin: Option<String>,
    pub camera_position: CameraPosition,
    pub is_rotating: bool,
}

impl Default for GlobeState {
    fn default() -> Self {
        Self {
            topics: default_topics(),
            pins: sample_pins(),
            active_topic: None,
            selected_pin: None,
            camera_position: CameraPosition::default(),
            is_rotating: true,
        }
    }
}

impl GlobeState {
    /// Switching topics always drops the pin selection.
    pub fn set_active_topic(&mut self, topic_id: Option<String>) {
        self.active_topic = topic_id;
        self.selected_pin = None;
    }

    pub fn select_pin(&mut self, pin_id: Option<String>) {
        self.selected_pin = pin_id;
    }

    pub fn set_camera_position(&mut self, position: CameraPosition) {
        self.camera_position = position;
    }

    pub fn set_rotating(&mut self, rotating: bool) {
        self.is_rotating = rotating;
    }

    pub fn add_topic(&mut self, topic: Topic) {
        self.topics.push(topic);
    }

    /// Applies `edit` to the topic with `id`. Returns `false` when there is none.
    pub fn update_topic(&mut self, id: &str, edit: impl FnOnce(&mut Topic)) -> bool {
        match self.topics.iter_mut().find(|topic| topic.id == id) {
            Some(topic) => {
                edit(topic);
                true
            }
            None => false,
        }
    }

    /// Removes a topic together with its pins.
    pub fn delete_topic(&mut self, id: &str) {
        self.topics.retain(|topic| topic.id != id);
        self.pins.retain(|pin| pin.topic_id != id);
        if self.active_topic.as_deref() == Some(id) {
            self.active_topic = None;
        }
    }

    pub fn add_pin(&mut self, pin: GlobePin) {
        self.pins.push(pin);
    }

    /// Applies `edit` to the pin with `id` and stamps `updated_at`.
    pub fn update_pin(
        &mut self,
        id: &str,
        updated_at: impl Into<String>,
        edit: impl FnOnce(&mut GlobePin),
    ) -> bool {
        match self.pins.iter_mut().find(|pin| pin.id == id) {
            Some(pin) => {
                edit(pin);
                pin.updated_at = updated_at.into();
                true
            }
            None => false,
        }
    }

    pub fn delete_pin(&mut self, id: &str) {
        self.pins.retain(|pin| pin.id != id);
        if self.selected_pin.as_deref() == Some(id) {
            self.selected_pin = None;
        }
    }

    pub fn pins_by_topic<'a>(&'a self, topic_id: &'a str) -> impl Iterator<Item = &'a GlobePin> + 'a {
        self.pins.iter().filter(move |pin| pin.topic_id == topic_id)
    }

    pub fn selected_pin(&self) -> Option<&GlobePin> {
        let id = self.selected_pin.as_deref()?;
        self.pins.iter().find(|pin| pin.id == id)
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> GlobeSnapshot {
        GlobeSnapshot {
            topics: self.topics.clone(),
            pins: self.pins.clone(),
            camera_position: self.camera_position,
        }
    }

    /// Restores persisted data; transient selection and rotation keep their current values.
    pub fn hydrate(&mut self, snapshot: GlobeSnapshot) {
        self.topics = snapshot.topics;
        self.pins = snapshot.pins;
        self.camera_position = snapshot.camera_position;
    }
}

fn topic(id: &str, name: &str, icon: &str, color: &str, description: &str) -> Topic {
    Topic {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        description: Some(description.to_string()),
    }
}

pub fn default_topics() -> Vec<Topic> {
    vec![
        topic(
            "architecture",
            "Architecture",
            "🏛️",
            "#8B9A7B",
            "Buildings, structures, and spatial design around the world",
        ),
        topic(
            "linguistics",
            "Linguistics",
            "🗣️",
            "#E8B4A0",
            "Languages, dialects, and linguistic phenomena",
        ),
        topic(
            "nature",
            "Nature",
            "🌿",
            "#7A8A6A",
            "Natural wonders and ecological discoveries",
        ),
        topic(
            "culture",
            "Culture",
            "🎭",
            "#D4C4E8",
            "Art, traditions, and cultural expressions",
        ),
    ]
}

pub fn sample_pins() -> Vec<GlobePin> {
    vec![
        GlobePin {
            id: "pin-1".to_string(),
            topic_id: "architecture".to_string(),
            title: "Sagrada Família".to_string(),
            description: Some("Antoni Gaudí's unfinished masterpiece".to_string()),
            location: GeoPoint::new(41.4036, 2.1744),
            content: PinContent {
                cover_image: Some("/images/sagrada-familia.jpg".to_string()),
                ..PinContent::article(
                    "The Basílica de la Sagrada Família is a large unfinished Roman Catholic minor \
                     basilica in Barcelona, designed by Catalan architect Antoni Gaudí.",
                )
            },
            created_at: "2024-01-01".to_string(),
            updated_at: "2024-01-01".to_string(),
        },
        GlobePin {
            id: "pin-2".to_string(),
            topic_id: "linguistics".to_string(),
            title: "Basque Language".to_string(),
            description: Some("A language isolate in Europe".to_string()),
            location: GeoPoint::new(43.2630, -2.9350),
            content: PinContent {
                links: vec![PinLink {
                    url: "https://en.wikipedia.org/wiki/Basque_language".to_string(),
                    title: "Wikipedia".to_string(),
                    description: None,
                    favicon: None,
                }],
                ..PinContent::article(
                    "Basque is a language isolate ancestral to the Basque people. It is spoken \
                     by about 750,000 people in the Basque Country.",
                )
            },
            created_at: "2024-01-02".to_string(),
            updated_at: "2024-01-02".to_string(),
        },
    ]
}
