use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;
use tokio::sync::RwLock;

use crate::enums::{EcClass, LogoShape, SizeClass, StyleClass};
use crate::error::{AppError, Result};

/// QR byte-mode capacity ceiling (version 40, lowest error correction).
pub const MAX_TEXT_LEN: usize = 2953;
pub const MAX_LABEL_LEN: usize = 100;

pub type UserId = i64;

// ─── QrSettings ─────────────────────────────────────────────────────

/// Configuration accumulated for one in-flight QR request.
#[derive(Debug, Clone)]
pub struct QrSettings {
    pub text: String,
    pub size: SizeClass,
    pub error_correction: EcClass,
    pub style: StyleClass,
    pub has_logo: bool,
    pub logo_shape: Option<LogoShape>,
    pub logo_image: Option<DynamicImage>,
    pub label: Option<String>,
}

/// Outcome of a size/error selection, used for the "already chosen" reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Updated,
    AlreadySet,
}

impl QrSettings {
    /// Create a record with defaults. The payload text is validated here so
    /// a record can never exist with an empty or oversized payload.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(AppError::Validation("Please send valid data".to_string()));
        }
        if text.chars().count() > MAX_TEXT_LEN {
            return Err(AppError::Validation(format!(
                "Text too long! Max {} characters",
                MAX_TEXT_LEN
            )));
        }

        Ok(QrSettings {
            text,
            size: SizeClass::Medium,
            error_correction: EcClass::Medium,
            style: StyleClass::Classic,
            has_logo: false,
            logo_shape: None,
            logo_image: None,
            label: None,
        })
    }

    pub fn select_size(&mut self, size: SizeClass) -> Selection {
        if self.size == size {
            return Selection::AlreadySet;
        }
        self.size = size;
        Selection::Updated
    }

    pub fn select_error_correction(&mut self, ec: EcClass) -> Selection {
        if self.error_correction == ec {
            return Selection::AlreadySet;
        }
        self.error_correction = ec;
        Selection::Updated
    }

    pub fn set_style(&mut self, style: StyleClass) {
        self.style = style;
    }

    pub fn set_logo_shape(&mut self, shape: LogoShape) {
        self.logo_shape = Some(shape);
    }

    /// Attach the decoded logo. The state machine only accepts a photo after
    /// a shape has been chosen.
    pub fn attach_logo(&mut self, image: DynamicImage) {
        self.has_logo = true;
        self.logo_image = Some(image);
    }

    pub fn clear_logo(&mut self) {
        self.has_logo = false;
        self.logo_shape = None;
        self.logo_image = None;
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        if label.chars().count() > MAX_LABEL_LEN {
            return Err(AppError::Validation(format!(
                "Label too long! Max {} characters",
                MAX_LABEL_LEN
            )));
        }
        self.label = Some(label);
        Ok(())
    }

    pub fn clear_label(&mut self) {
        self.label = None;
    }
}

// ─── Session ────────────────────────────────────────────────────────

/// Sub-state of an active (record-bearing) conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    Settings,
    ChoosingStyle,
    LogoMenu,
    ChoosingLogoShape,
    AwaitingLogoPhoto,
    AwaitingLabel,
}

/// One user's conversation. A settings record only exists once payload text
/// has been accepted, so `Active` is the only variant carrying one.
#[derive(Debug, Clone)]
pub enum Session {
    AwaitingText,
    Active {
        state: ConfigState,
        settings: QrSettings,
    },
}

impl Session {
    pub fn active(settings: QrSettings) -> Self {
        Session::Active {
            state: ConfigState::Settings,
            settings,
        }
    }
}

// ─── SessionStore ───────────────────────────────────────────────────

/// Volatile per-user conversation store.
///
/// All read-modify-write cycles run inside a single write-lock hold, so
/// concurrent updates for the same user serialize instead of racing.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<UserId, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh flow for the user, overwriting any existing one.
    pub async fn begin(&self, user: UserId) {
        let mut sessions = self.inner.write().await;
        sessions.insert(user, Session::AwaitingText);
    }

    /// Remove the user's entry. Returns whether one existed.
    pub async fn clear(&self, user: UserId) -> bool {
        let mut sessions = self.inner.write().await;
        sessions.remove(&user).is_some()
    }

    /// Read-only view of the user's session.
    pub async fn peek<F, R>(&self, user: UserId, f: F) -> Option<R>
    where
        F: FnOnce(&Session) -> R,
    {
        let sessions = self.inner.read().await;
        sessions.get(&user).map(f)
    }

    /// Mutate the user's session under the write guard. Returns `None` when
    /// the user has no session (expired or never started).
    pub async fn update<F, R>(&self, user: UserId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.inner.write().await;
        sessions.get_mut(&user).map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_gets_defaults() {
        let settings = QrSettings::new("https://example.com").unwrap();
        assert_eq!(settings.text, "https://example.com");
        assert_eq!(settings.size, SizeClass::Medium);
        assert_eq!(settings.error_correction, EcClass::Medium);
        assert_eq!(settings.style, StyleClass::Classic);
        assert!(!settings.has_logo);
        assert!(settings.logo_shape.is_none());
        assert!(settings.logo_image.is_none());
        assert!(settings.label.is_none());
    }

    #[test]
    fn test_text_length_bounds() {
        assert!(QrSettings::new("").is_err());
        assert!(QrSettings::new("x").is_ok());
        assert!(QrSettings::new("x".repeat(MAX_TEXT_LEN)).is_ok());
        assert!(matches!(
            QrSettings::new("x".repeat(MAX_TEXT_LEN + 1)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_selection_idempotency() {
        let mut settings = QrSettings::new("data").unwrap();

        assert_eq!(settings.select_size(SizeClass::Large), Selection::Updated);
        assert_eq!(settings.size, SizeClass::Large);
        assert_eq!(settings.select_size(SizeClass::Large), Selection::AlreadySet);
        assert_eq!(settings.size, SizeClass::Large);

        assert_eq!(settings.select_error_correction(EcClass::Medium), Selection::AlreadySet);
        assert_eq!(settings.select_error_correction(EcClass::Max), Selection::Updated);
        assert_eq!(settings.error_correction, EcClass::Max);
    }

    #[test]
    fn test_label_length_bound() {
        let mut settings = QrSettings::new("data").unwrap();
        assert!(settings.set_label("Scan Me").is_ok());
        assert_eq!(settings.label.as_deref(), Some("Scan Me"));

        let long = "y".repeat(MAX_LABEL_LEN + 50);
        assert!(settings.set_label(long).is_err());
        // Failed set leaves the previous label in place
        assert_eq!(settings.label.as_deref(), Some("Scan Me"));
    }

    #[test]
    fn test_clear_logo_resets_all_fields() {
        let mut settings = QrSettings::new("data").unwrap();
        settings.set_logo_shape(LogoShape::Circle);
        settings.attach_logo(DynamicImage::new_rgb8(4, 4));
        assert!(settings.has_logo);

        settings.clear_logo();
        assert!(!settings.has_logo);
        assert!(settings.logo_shape.is_none());
        assert!(settings.logo_image.is_none());
    }

    #[tokio::test]
    async fn test_store_begin_overwrites_existing_flow() {
        let store = SessionStore::new();
        store.begin(7).await;
        store
            .update(7, |s| {
                *s = Session::active(QrSettings::new("old").unwrap());
            })
            .await
            .unwrap();

        store.begin(7).await;
        let is_awaiting = store
            .peek(7, |s| matches!(s, Session::AwaitingText))
            .await
            .unwrap();
        assert!(is_awaiting);
    }

    #[tokio::test]
    async fn test_store_update_without_session_is_none() {
        let store = SessionStore::new();
        assert!(store.update(42, |_| ()).await.is_none());
        assert!(!store.clear(42).await);
    }

    #[tokio::test]
    async fn test_guard_mismatch_does_not_mutate() {
        let store = SessionStore::new();
        store.begin(1).await;
        store
            .update(1, |s| {
                *s = Session::active(QrSettings::new("data").unwrap());
            })
            .await;

        // A style token is only valid while choosing a style; from Settings
        // the guarded handler must refuse and leave the record untouched.
        let refused = store
            .update(1, |session| match session {
                Session::Active { state, settings } if *state == ConfigState::ChoosingStyle => {
                    settings.set_style(StyleClass::Green);
                    false
                }
                _ => true,
            })
            .await
            .unwrap();
        assert!(refused);

        let style = store
            .peek(1, |s| match s {
                Session::Active { settings, .. } => settings.style,
                _ => panic!("session lost"),
            })
            .await
            .unwrap();
        assert_eq!(style, StyleClass::Classic);
    }

    #[tokio::test]
    async fn test_full_configuration_flow() {
        let store = SessionStore::new();
        let user = 5;

        // /qr then payload text
        store.begin(user).await;
        store
            .update(user, |s| {
                *s = Session::active(QrSettings::new("https://example.com").unwrap());
            })
            .await
            .unwrap();

        // size_large, applied once, idempotent the second time
        for expected in [Selection::Updated, Selection::AlreadySet] {
            let got = store
                .update(user, |s| match s {
                    Session::Active { state, settings } if *state == ConfigState::Settings => {
                        settings.select_size(SizeClass::Large)
                    }
                    _ => panic!("flow out of step"),
                })
                .await
                .unwrap();
            assert_eq!(got, expected);
        }

        // change_style then style_green
        store
            .update(user, |s| match s {
                Session::Active { state, .. } => *state = ConfigState::ChoosingStyle,
                _ => panic!("flow out of step"),
            })
            .await
            .unwrap();
        store
            .update(user, |s| match s {
                Session::Active { state, settings } if *state == ConfigState::ChoosingStyle => {
                    settings.set_style(StyleClass::Green);
                    *state = ConfigState::Settings;
                }
                _ => panic!("flow out of step"),
            })
            .await
            .unwrap();

        // generate snapshots the record and then removes the entry
        let snapshot = store
            .update(user, |s| match s {
                Session::Active { state, settings } if *state == ConfigState::Settings => {
                    settings.clone()
                }
                _ => panic!("flow out of step"),
            })
            .await
            .unwrap();
        assert_eq!(snapshot.text, "https://example.com");
        assert_eq!(snapshot.size, SizeClass::Large);
        assert_eq!(snapshot.error_correction, EcClass::Medium);
        assert_eq!(snapshot.style, StyleClass::Green);

        assert!(store.clear(user).await);
        assert!(store.peek(user, |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_entry() {
        let store = SessionStore::new();
        store.begin(9).await;
        assert!(store.clear(9).await);
        assert!(store.peek(9, |_| ()).await.is_none());
    }
}
