//! Input validation helpers
//!
//! Centralized text length constants and a field-error collector.
//! Mutating handlers validate the whole payload before any write and
//! reply 400 with the full list of offending fields.
//! SQLite TEXT has no built-in length enforcement, hence the caps here.

use shared::FieldError;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: item, chandler, user display name, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, remarks
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: unit, category, location, phone, availability tags
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Collects field-level validation failures across a payload.
///
/// ```ignore
/// let mut v = Validator::new();
/// v.require_text("name", &payload.name, MAX_NAME_LEN);
/// v.positive("quantity", payload.quantity);
/// v.finish()?;
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Required string: non-empty after trimming, within the length cap.
    pub fn require_text(&mut self, field: &str, value: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        } else if value.len() > max_len {
            self.push(
                field,
                format!("is too long ({} chars, max {max_len})", value.len()),
            );
        }
    }

    /// Optional string: if present, within the length cap.
    pub fn optional_text(&mut self, field: &str, value: &Option<String>, max_len: usize) {
        if let Some(v) = value
            && v.len() > max_len
        {
            self.push(
                field,
                format!("is too long ({} chars, max {max_len})", v.len()),
            );
        }
    }

    /// Integer quantity: must be at least 1.
    pub fn positive(&mut self, field: &str, value: i64) {
        if value < 1 {
            self.push(field, "must be at least 1");
        }
    }

    /// Integer amount: must not be negative.
    pub fn non_negative(&mut self, field: &str, value: i64) {
        if value < 0 {
            self.push(field, "must not be negative");
        }
    }

    /// Monetary amount: finite and not negative.
    pub fn non_negative_amount(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.push(field, "must be a non-negative amount");
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the collector; `Err(AppError::Validation)` if anything failed.
    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}
