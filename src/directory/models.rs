//! Account records held by the directories

use serde::{Deserialize, Serialize};

/// A record that can live in a [`Directory`](super::Directory)
pub trait UserRecord: Clone + Send + Sync + 'static {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
    fn email(&self) -> &str;
    fn password_hash(&self) -> &str;
}

/// Student account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Tutor account and marketplace listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tutor {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(default)]
    pub expertise_subjects: Vec<String>,
    pub hourly_rate: Option<f64>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub schedule: Option<String>,
    pub availability: Option<String>,
    /// Years of teaching experience
    pub experience: Option<u32>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserRecord for Student {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl UserRecord for Tutor {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// Student registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterStudent {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Tutor registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterTutor {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub expertise_subjects: Vec<String>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub experience: Option<u32>,
}
