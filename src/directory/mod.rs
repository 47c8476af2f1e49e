//! Student and tutor directories keyed by email

pub mod models;
pub mod password;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::Role;
use crate::error::{Error, Result};

pub use models::{RegisterStudent, RegisterTutor, Student, Tutor, UserRecord};
pub use password::{hash_password, verify_password};

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// In-memory store of one kind of account
pub struct Directory<R> {
    records: Arc<RwLock<HashMap<String, R>>>,
    next_id: Arc<AtomicU64>,
}

impl<R: UserRecord> Directory<R> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Look up a record by its email
    pub async fn find_by_subject(&self, subject: &str) -> Option<R> {
        self.records.read().await.get(subject).cloned()
    }

    pub async fn find_by_id(&self, id: u64) -> Option<R> {
        self.records
            .read()
            .await
            .values()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// All records, ordered by id
    pub async fn list(&self) -> Vec<R> {
        let mut records: Vec<R> = self.records.read().await.values().cloned().collect();
        records.sort_by_key(|record| record.id());
        records
    }

    /// Store a new record, assigning its id
    pub async fn insert(&self, mut record: R) -> Result<R> {
        let mut records = self.records.write().await;
        if records.contains_key(record.email()) {
            return Err(Error::DuplicateAccount(record.email().to_string()));
        }
        record.set_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        records.insert(record.email().to_string(), record.clone());
        Ok(record)
    }

    pub async fn contains(&self, subject: &str) -> bool {
        self.records.read().await.contains_key(subject)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<R: UserRecord> Default for Directory<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Directory<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

/// Both account directories, plus registration and credential checks
#[derive(Clone, Default)]
pub struct UserDirectory {
    pub students: Directory<Student>,
    pub tutors: Directory<Tutor>,
    // Serialises registrations so an email cannot land in both directories.
    registration: Arc<tokio::sync::Mutex<()>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Role of the account registered under `subject`, if any
    pub async fn role_of(&self, subject: &str) -> Option<Role> {
        if self.students.contains(subject).await {
            Some(Role::Student)
        } else if self.tutors.contains(subject).await {
            Some(Role::Tutor)
        } else {
            None
        }
    }

    /// Check an email/password pair, students first, then tutors.
    ///
    /// Returns the role of the matching account, or `None` when no account
    /// matches.
    pub async fn check_credentials(&self, email: &str, password: &str) -> Result<Option<Role>> {
        if let Some(student) = self.students.find_by_subject(email).await {
            if password_matches(password, student.password_hash()).await? {
                return Ok(Some(Role::Student));
            }
        }

        if let Some(tutor) = self.tutors.find_by_subject(email).await {
            if password_matches(password, tutor.password_hash()).await? {
                return Ok(Some(Role::Tutor));
            }
        }

        Ok(None)
    }

    pub async fn register_student(&self, req: RegisterStudent, cost: u32) -> Result<Student> {
        let email = validate_registration(&req.name, &req.email, &req.password)?;
        let _guard = self.registration.lock().await;
        self.ensure_unregistered(&email).await?;

        let student = Student {
            id: 0,
            name: req.name.trim().to_string(),
            email,
            password_hash: hash_password(req.password, cost).await?,
            created_at: chrono::Utc::now(),
        };
        let student = self.students.insert(student).await?;
        tracing::info!("Registered student {} ({})", student.id, student.email);
        Ok(student)
    }

    pub async fn register_tutor(&self, req: RegisterTutor, cost: u32) -> Result<Tutor> {
        let email = validate_registration(&req.name, &req.email, &req.password)?;
        if req.hourly_rate.is_some_and(|rate| !rate.is_finite() || rate < 0.0) {
            return Err(Error::Validation("hourly rate must be a non-negative number".to_string()));
        }
        let _guard = self.registration.lock().await;
        self.ensure_unregistered(&email).await?;

        let tutor = Tutor {
            id: 0,
            name: req.name.trim().to_string(),
            email,
            password_hash: hash_password(req.password, cost).await?,
            expertise_subjects: req
                .expertise_subjects
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            hourly_rate: req.hourly_rate,
            institution: req.institution,
            location: req.location,
            schedule: req.schedule,
            availability: req.availability,
            experience: req.experience,
            rating: None,
            reviews: 0,
            created_at: chrono::Utc::now(),
        };
        let tutor = self.tutors.insert(tutor).await?;
        tracing::info!("Registered tutor {} ({})", tutor.id, tutor.email);
        Ok(tutor)
    }

    async fn ensure_unregistered(&self, email: &str) -> Result<()> {
        if self.role_of(email).await.is_some() {
            return Err(Error::DuplicateAccount(email.to_string()));
        }
        Ok(())
    }
}

async fn password_matches(password: &str, hash: &str) -> Result<bool> {
    match verify_password(password.to_string(), hash.to_string()).await {
        Ok(matches) => Ok(matches),
        // A corrupt stored hash just fails the login
        Err(Error::Password(e)) => {
            tracing::warn!("Stored password hash could not be checked: {}", e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Check registration fields, returning the trimmed email
fn validate_registration(name: &str, email: &str, password: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(Error::Validation("name is required".to_string()));
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::Validation("a valid email is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(email.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST: u32 = 4;

    fn student(email: &str) -> RegisterStudent {
        RegisterStudent {
            name: "Sam".to_string(),
            email: email.to_string(),
            password: "password1".to_string(),
        }
    }

    fn tutor(email: &str) -> RegisterTutor {
        RegisterTutor {
            name: "Tess".to_string(),
            email: email.to_string(),
            password: "password2".to_string(),
            expertise_subjects: vec!["Math".to_string(), " ".to_string()],
            hourly_rate: Some(25.0),
            institution: None,
            location: None,
            schedule: None,
            availability: None,
            experience: Some(3),
        }
    }

    #[tokio::test]
    async fn test_register_assigns_ids() {
        let dir = UserDirectory::new();
        let a = dir.register_student(student("a@example.com"), COST).await.unwrap();
        let b = dir.register_student(student("b@example.com"), COST).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(dir.students.len().await, 2);
    }

    #[tokio::test]
    async fn test_email_unique_across_directories() {
        let dir = UserDirectory::new();
        dir.register_student(student("same@example.com"), COST).await.unwrap();
        let err = dir.register_tutor(tutor("same@example.com"), COST).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateAccount(_)));
    }

    #[tokio::test]
    async fn test_check_credentials_roles() {
        let dir = UserDirectory::new();
        dir.register_student(student("s@example.com"), COST).await.unwrap();
        dir.register_tutor(tutor("t@example.com"), COST).await.unwrap();

        assert_eq!(
            dir.check_credentials("s@example.com", "password1").await.unwrap(),
            Some(Role::Student)
        );
        assert_eq!(
            dir.check_credentials("t@example.com", "password2").await.unwrap(),
            Some(Role::Tutor)
        );
        assert_eq!(dir.check_credentials("t@example.com", "nope").await.unwrap(), None);
        assert_eq!(dir.check_credentials("x@example.com", "password1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_registration_validation() {
        let dir = UserDirectory::new();
        let mut bad = student("no-at-sign");
        assert!(matches!(
            dir.register_student(bad.clone(), COST).await,
            Err(Error::Validation(_))
        ));
        bad.email = "ok@example.com".to_string();
        bad.password = "short".to_string();
        assert!(matches!(
            dir.register_student(bad, COST).await,
            Err(Error::Validation(_))
        ));
        assert!(dir.students.is_empty().await);
    }

    #[tokio::test]
    async fn test_tutor_subjects_trimmed_and_hash_hidden() {
        let dir = UserDirectory::new();
        let t = dir.register_tutor(tutor("t@example.com"), COST).await.unwrap();
        assert_eq!(t.expertise_subjects, vec!["Math".to_string()]);

        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "t@example.com");
    }
}
