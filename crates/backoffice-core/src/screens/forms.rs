use std::path::{Path, PathBuf};

use crate::api::{ApiError, ImageUpload};
use crate::models::{AdminUser, MenuItem, MenuItemInput, Service, ServiceInput, Training, TrainingInput, UserInput};

use super::form::{FormField, FormMode, FormState};

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

/// A create/edit form for one resource type.
pub trait ResourceForm {
    type Record;
    type Input;

    /// Empty form in create mode
    fn blank() -> FormState;

    /// Form prefilled from an existing record, in edit mode
    fn from_record(record: &Self::Record) -> FormState;

    /// Validate and build the request payload
    fn to_input(form: &FormState) -> Result<Self::Input, ApiError>;
}

/// The image named by the form's `image` field, if any. Only the file type
/// is checked here; the file is read with `ImageUpload::load` on submit.
pub fn image_path(form: &FormState) -> Result<Option<PathBuf>, ApiError> {
    let path = form.value("image").trim();
    if path.is_empty() {
        return Ok(None);
    }
    ImageUpload::check_path(Path::new(path))?;
    Ok(Some(PathBuf::from(path)))
}

fn number_text(n: f64) -> String {
    format!("{}", n)
}

// ===== Services =====

pub struct ServiceForm;

impl ServiceForm {
    fn fields() -> Vec<FormField> {
        vec![
            FormField::text("title", "Title").required(),
            FormField::multiline("description", "Description").required(),
            FormField::toggle("featured", "Featured"),
            FormField::number("order", "Display Order"),
        ]
    }
}

impl ResourceForm for ServiceForm {
    type Record = Service;
    type Input = ServiceInput;

    fn blank() -> FormState {
        FormState::new(FormMode::Create, Self::fields())
    }

    fn from_record(record: &Service) -> FormState {
        let mut form = FormState::new(FormMode::Edit(record.id.clone()), Self::fields());
        form.set_value("title", record.title.clone());
        form.set_value("description", record.description.clone());
        form.set_value("featured", record.featured.to_string());
        form.set_value("order", record.order.to_string());
        form
    }

    fn to_input(form: &FormState) -> Result<ServiceInput, ApiError> {
        form.validate()?;
        Ok(ServiceInput {
            title: form.value("title").to_string(),
            description: form.value("description").to_string(),
            featured: form.checked("featured"),
            order: form.integer("order")?,
        })
    }
}

// ===== Trainings =====

pub struct TrainingForm;

impl TrainingForm {
    fn fields() -> Vec<FormField> {
        vec![
            FormField::text("title", "Title").required(),
            FormField::multiline("description", "Description").required(),
            FormField::text("duration", "Duration").required(),
            FormField::number("price", "Price").required(),
            FormField::number("discount", "Discount"),
            FormField::toggle("featured", "Featured"),
            FormField::number("order", "Display Order"),
            FormField::file("image", "Image"),
        ]
    }
}

impl ResourceForm for TrainingForm {
    type Record = Training;
    type Input = TrainingInput;

    fn blank() -> FormState {
        FormState::new(FormMode::Create, Self::fields())
    }

    fn from_record(record: &Training) -> FormState {
        let mut form = FormState::new(FormMode::Edit(record.id.clone()), Self::fields());
        form.set_value("title", record.title.clone());
        form.set_value("description", record.description.clone());
        form.set_value("duration", record.duration.clone());
        form.set_value("price", number_text(record.price));
        form.set_value("discount", number_text(record.discount));
        form.set_value("featured", record.featured.to_string());
        form.set_value("order", record.order.to_string());
        form
    }

    fn to_input(form: &FormState) -> Result<TrainingInput, ApiError> {
        form.validate()?;
        let price = form.number("price")?;
        let discount = form.number("discount")?;
        if price < 0.0 || discount < 0.0 {
            return Err(ApiError::Validation("Price and discount cannot be negative".to_string()));
        }
        Ok(TrainingInput {
            title: form.value("title").to_string(),
            description: form.value("description").to_string(),
            duration: form.value("duration").to_string(),
            price,
            discount,
            featured: form.checked("featured"),
            order: form.integer("order")?,
        })
    }
}

// ===== Menu items =====

pub struct MenuItemForm;

impl MenuItemForm {
    fn fields() -> Vec<FormField> {
        vec![
            FormField::text("name", "Name").required(),
            FormField::number("price", "Price").required(),
            FormField::text("category", "Category").required(),
            FormField::multiline("description", "Description"),
            FormField::toggle("available", "Available").with_value("true"),
            FormField::number("displayOrder", "Display Order"),
            FormField::file("image", "Image"),
        ]
    }
}

impl ResourceForm for MenuItemForm {
    type Record = MenuItem;
    type Input = MenuItemInput;

    fn blank() -> FormState {
        FormState::new(FormMode::Create, Self::fields())
    }

    fn from_record(record: &MenuItem) -> FormState {
        let mut form = FormState::new(FormMode::Edit(record.id.clone()), Self::fields());
        form.set_value("name", record.name.clone());
        form.set_value("price", number_text(record.price));
        form.set_value("category", record.category.clone());
        form.set_value("description", record.description.clone());
        form.set_value("available", record.available.to_string());
        form.set_value("displayOrder", record.display_order.to_string());
        form
    }

    fn to_input(form: &FormState) -> Result<MenuItemInput, ApiError> {
        form.validate()?;
        let price = form.number("price")?;
        if price < 0.0 {
            return Err(ApiError::Validation("Price cannot be negative".to_string()));
        }
        Ok(MenuItemInput {
            name: form.value("name").to_string(),
            price,
            category: form.value("category").to_string(),
            description: form.value("description").to_string(),
            available: form.checked("available"),
            display_order: form.integer("displayOrder")?,
        })
    }
}

// ===== Users =====

pub struct UserForm;

impl UserForm {
    fn fields(password_required: bool) -> Vec<FormField> {
        let password = FormField::secret("password", "Password");
        vec![
            FormField::text("name", "Name").required(),
            FormField::text("email", "Email").required(),
            if password_required { password.required() } else { password },
            FormField::secret("confirmPassword", "Confirm Password"),
            FormField::toggle("isAdmin", "Admin"),
        ]
    }
}

impl ResourceForm for UserForm {
    type Record = AdminUser;
    type Input = UserInput;

    fn blank() -> FormState {
        FormState::new(FormMode::Create, Self::fields(true))
    }

    fn from_record(record: &AdminUser) -> FormState {
        let mut form = FormState::new(FormMode::Edit(record.id.clone()), Self::fields(false));
        form.set_value("name", record.name.clone());
        form.set_value("email", record.email.clone());
        form.set_value("isAdmin", record.is_admin.to_string());
        form
    }

    /// On edit, an empty password keeps the current one
    fn to_input(form: &FormState) -> Result<UserInput, ApiError> {
        form.validate()?;
        if !form.value("email").contains('@') {
            return Err(ApiError::Validation("Please enter a valid email".to_string()));
        }

        // Passwords are compared untrimmed
        let password = form.field("password").map(|f| f.value.as_str()).unwrap_or("");
        let confirm = form.field("confirmPassword").map(|f| f.value.as_str()).unwrap_or("");
        let password = if password.is_empty() && form.mode.is_edit() {
            None
        } else if password != confirm {
            return Err(ApiError::Validation(PASSWORD_MISMATCH_MESSAGE.to_string()));
        } else {
            Some(password.to_string())
        };

        Ok(UserInput {
            name: form.value("name").to_string(),
            email: form.value("email").to_string(),
            password,
            is_admin: form.checked("isAdmin"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_form_round_trip_from_record() {
        let service = Service {
            id: "s1".to_string(),
            title: "Catering".to_string(),
            description: "Office events".to_string(),
            featured: true,
            order: 3,
        };
        let form = ServiceForm::from_record(&service);
        assert_eq!(form.mode, FormMode::Edit("s1".to_string()));
        let input = ServiceForm::to_input(&form).unwrap();
        assert_eq!(input.title, "Catering");
        assert!(input.featured);
        assert_eq!(input.order, 3);
    }

    #[test]
    fn test_training_form_requires_price() {
        let mut form = TrainingForm::blank();
        form.set_value("title", "Latte Art");
        form.set_value("description", "Pour patterns");
        form.set_value("duration", "1 month");
        let err = TrainingForm::to_input(&form).unwrap_err();
        assert_eq!(err.user_message(""), "Price is required");

        form.set_value("price", "8000");
        let input = TrainingForm::to_input(&form).unwrap();
        assert_eq!(input.price, 8000.0);
        assert_eq!(input.discount, 0.0);
        assert_eq!(image_path(&form).unwrap(), None);
    }

    #[test]
    fn test_training_form_image_path() {
        let mut form = TrainingForm::blank();
        form.set_value("image", "/photos/latte.jpg");
        assert_eq!(image_path(&form).unwrap(), Some(PathBuf::from("/photos/latte.jpg")));

        form.set_value("image", "/photos/latte.bmp");
        assert!(matches!(image_path(&form), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_menu_item_form_defaults_available() {
        let mut form = MenuItemForm::blank();
        form.set_value("name", "Momo");
        form.set_value("price", "180");
        form.set_value("category", "Snacks");
        let input = MenuItemForm::to_input(&form).unwrap();
        assert!(input.available);
        assert_eq!(input.display_order, 0);
    }

    #[test]
    fn test_user_create_needs_matching_passwords() {
        let mut form = UserForm::blank();
        form.set_value("name", "Staff");
        form.set_value("email", "staff@example.com");
        let err = UserForm::to_input(&form).unwrap_err();
        assert_eq!(err.user_message(""), "Password is required");

        form.set_value("password", "secret1");
        form.set_value("confirmPassword", "secret2");
        let err = UserForm::to_input(&form).unwrap_err();
        assert_eq!(err.user_message(""), PASSWORD_MISMATCH_MESSAGE);

        form.set_value("confirmPassword", "secret1");
        let input = UserForm::to_input(&form).unwrap();
        assert_eq!(input.password.as_deref(), Some("secret1"));
    }

    #[test]
    fn test_user_edit_omits_blank_password() {
        let user = AdminUser {
            id: "u1".to_string(),
            name: "Staff".to_string(),
            email: "staff@example.com".to_string(),
            is_admin: true,
            created_at: None,
        };
        let mut form = UserForm::from_record(&user);
        let input = UserForm::to_input(&form).unwrap();
        assert_eq!(input.password, None);
        assert!(input.is_admin);

        form.set_value("password", "newpass");
        assert!(UserForm::to_input(&form).is_err());
        form.set_value("confirmPassword", "newpass");
        assert_eq!(UserForm::to_input(&form).unwrap().password.as_deref(), Some("newpass"));
    }

    #[test]
    fn test_user_form_checks_email() {
        let mut form = UserForm::blank();
        form.set_value("name", "Staff");
        form.set_value("email", "staff");
        form.set_value("password", "pw");
        form.set_value("confirmPassword", "pw");
        assert_eq!(
            UserForm::to_input(&form).unwrap_err().user_message(""),
            "Please enter a valid email"
        );
    }
}
