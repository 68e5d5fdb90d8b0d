use crate::api::ApiError;

use super::Notification;

/// Create a new record, or edit the one with this id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Number,
    /// Masked input
    Secret,
    /// On/off, stored as "true" / "false"
    Toggle,
    /// Local file path
    File,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
}

impl FormField {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            required: false,
            value: String::new(),
        }
    }

    pub fn multiline(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Multiline,
            ..Self::text(key, label)
        }
    }

    pub fn number(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(key, label)
        }
    }

    pub fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(key, label)
        }
    }

    pub fn toggle(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Toggle,
            value: "false".to_string(),
            ..Self::text(key, label)
        }
    }

    pub fn file(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::File,
            ..Self::text(key, label)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn checked(&self) -> bool {
        self.value == "true"
    }

    pub fn set_checked(&mut self, on: bool) {
        self.value = on.to_string();
    }

    pub fn accepts_text(&self) -> bool {
        self.kind != FieldKind::Toggle
    }
}

/// Editable form: ordered fields, the focused one, and its banners.
#[derive(Debug, Clone)]
pub struct FormState {
    pub mode: FormMode,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub submitting: bool,
    pub notice: Notification,
}

impl FormState {
    pub fn new(mode: FormMode, fields: Vec<FormField>) -> Self {
        Self {
            mode,
            fields,
            focus: 0,
            submitting: false,
            notice: Notification::default(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    /// Trimmed value of a field; empty when the field does not exist
    pub fn value(&self, key: &str) -> &str {
        self.field(key).map(|f| f.value.trim()).unwrap_or("")
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.field_mut(key) {
            field.value = value.into();
        }
    }

    pub fn checked(&self, key: &str) -> bool {
        self.field(key).map(FormField::checked).unwrap_or(false)
    }

    // ===== Editing =====

    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.accepts_text() {
                field.value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.accepts_text() {
                field.value.pop();
            }
        }
    }

    pub fn toggle_focused(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.kind == FieldKind::Toggle {
                let on = field.checked();
                field.set_checked(!on);
            }
        }
    }

    // ===== Validation =====

    /// Check required fields and number formats, first failure wins
    pub fn validate(&self) -> Result<(), ApiError> {
        for field in &self.fields {
            let value = field.value.trim();
            if field.required && value.is_empty() {
                return Err(ApiError::Validation(format!("{} is required", field.label)));
            }
            if field.kind == FieldKind::Number && !value.is_empty() && value.parse::<f64>().is_err() {
                return Err(ApiError::Validation(format!("{} must be a number", field.label)));
            }
        }
        Ok(())
    }

    /// Parse a number field, empty meaning zero
    pub fn number(&self, key: &str) -> Result<f64, ApiError> {
        let value = self.value(key);
        if value.is_empty() {
            return Ok(0.0);
        }
        value.parse::<f64>().map_err(|_| {
            let label = self.field(key).map(|f| f.label).unwrap_or(key);
            ApiError::Validation(format!("{} must be a number", label))
        })
    }

    pub fn integer(&self, key: &str) -> Result<i64, ApiError> {
        let n = self.number(key)?;
        if n.fract() != 0.0 {
            let label = self.field(key).map(|f| f.label).unwrap_or(key);
            return Err(ApiError::Validation(format!("{} must be a whole number", label)));
        }
        Ok(n as i64)
    }

    /// Validate and mark the form busy; false if a submit is already running
    pub fn begin_submit(&mut self) -> Result<bool, ApiError> {
        if self.submitting {
            return Ok(false);
        }
        self.validate()?;
        self.notice.dismiss_error();
        self.submitting = true;
        Ok(true)
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormState {
        FormState::new(
            FormMode::Create,
            vec![
                FormField::text("title", "Title").required(),
                FormField::number("price", "Price").required(),
                FormField::number("order", "Display Order"),
                FormField::toggle("featured", "Featured"),
            ],
        )
    }

    #[test]
    fn test_required_field_blocks() {
        let f = form();
        let err = f.validate().unwrap_err();
        assert_eq!(err.user_message(""), "Title is required");
    }

    #[test]
    fn test_number_fields() {
        let mut f = form();
        f.set_value("title", "Barista Basics");
        f.set_value("price", "12k");
        assert_eq!(f.validate().unwrap_err().user_message(""), "Price must be a number");

        f.set_value("price", " 12000 ");
        f.validate().unwrap();
        assert_eq!(f.number("price").unwrap(), 12000.0);
        assert_eq!(f.integer("order").unwrap(), 0);

        f.set_value("order", "1.5");
        assert!(f.integer("order").is_err());
    }

    #[test]
    fn test_typing_and_toggles() {
        let mut f = form();
        f.input_char('H');
        f.input_char('i');
        f.backspace();
        assert_eq!(f.value("title"), "H");

        f.focus_prev();
        assert_eq!(f.focused().unwrap().key, "featured");
        f.input_char('x');
        f.toggle_focused();
        assert!(f.checked("featured"));
        f.focus_next();
        assert_eq!(f.focus, 0);
    }

    #[test]
    fn test_begin_submit_once() {
        let mut f = form();
        f.set_value("title", "Latte Art");
        f.set_value("price", "5000");
        assert!(f.begin_submit().unwrap());
        assert!(!f.begin_submit().unwrap());
        f.finish_submit();
        assert!(f.begin_submit().unwrap());
    }
}
