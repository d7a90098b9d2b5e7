//! Form validation.
//!
//! Validators decide whether a form is worth submitting to the marketplace
//! API; the API still has the final say. Field validators return a single
//! [`ValidationError`]; form validators collect every failing field into
//! [`FieldErrors`] (in form order) and, on success, hand back a normalized
//! payload ready to be serialized as a request body.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Address, Email, EmailError, ProductCategory, UserRole};

/// Minimum password length accepted by the registration and password forms.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Username length bounds, measured after trimming.
pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 2..=50;

/// Sri Lankan mobile/landline number, with or without `+94`/`0` prefix.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+94|0)?[1-9][0-9]{8}$").expect("Invalid regex"));

/// Five-digit postal code.
static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("Invalid regex"));

/// A single field failed validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Username must be at least 2 characters long")]
    UsernameTooShort,

    #[error("Username must not exceed 50 characters")]
    UsernameTooLong,

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Password confirmation is required")]
    ConfirmationRequired,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter a valid Sri Lankan phone number (e.g., +94771234567 or 0771234567)")]
    InvalidPhone,

    #[error("Please enter a valid 5-digit Sri Lankan postal code")]
    InvalidPostalCode,

    #[error("{0} must be a valid number")]
    NotANumber(&'static str),

    #[error("{0} cannot be negative")]
    Negative(&'static str),

    #[error("Please select at least one category")]
    NoCategory,

    #[error("Quantity must be at least 1")]
    QuantityTooLow,

    #[error("Only {available} available in stock")]
    QuantityExceedsStock { available: u32 },
}

/// Validation failures keyed by form field name, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, ValidationError)>);

impl FieldErrors {
    /// No errors yet.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record the outcome of a field validator.
    pub fn check(&mut self, field: &'static str, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.0.push((field, error));
        }
    }

    /// Record an error for a field.
    pub fn add(&mut self, field: &'static str, error: ValidationError) {
        self.0.push((field, error));
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Error recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, error)| error)
    }

    /// Message for `field`, or an empty string. Convenient in templates.
    #[must_use]
    pub fn message(&self, field: &str) -> String {
        self.get(field).map(ToString::to_string).unwrap_or_default()
    }

    /// The first failing field's error, which is what the banner shows.
    #[must_use]
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.0.first().map(|(_, error)| error)
    }

    /// Iterate over `(field, error)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, ValidationError)> {
        self.0.iter()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.first_error() {
            Some(error) => write!(f, "{error}"),
            None => f.write_str("no validation errors"),
        }
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Field validators
// =============================================================================

/// Non-blank after trimming.
pub fn validate_required(value: &str, label: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(label));
    }
    Ok(())
}

/// Username of 2 to 50 characters after trimming.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required("Username"));
    }
    let len = trimmed.chars().count();
    if len < *USERNAME_LEN.start() {
        return Err(ValidationError::UsernameTooShort);
    }
    if len > *USERNAME_LEN.end() {
        return Err(ValidationError::UsernameTooLong);
    }
    Ok(())
}

/// Parse and normalize an email address.
pub fn validate_email(email: &str) -> Result<Email, ValidationError> {
    Ok(Email::parse(email)?)
}

/// Password of at least [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Required("Password"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Confirmation present and identical to the password.
pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if confirmation.is_empty() {
        return Err(ValidationError::ConfirmationRequired);
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Sri Lankan phone number; interior whitespace is ignored.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Err(ValidationError::Required("Phone number"));
    }
    if !PHONE_RE.is_match(&strip_whitespace(phone)) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Five-digit postal code.
pub fn validate_postal_code(postal_code: &str) -> Result<(), ValidationError> {
    let trimmed = postal_code.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required("Postal code"));
    }
    if !POSTAL_CODE_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidPostalCode);
    }
    Ok(())
}

/// Check every address field, recording failures under their form names.
pub fn validate_address(address: &Address, errors: &mut FieldErrors) {
    errors.check("street", validate_required(&address.street, "Street address"));
    errors.check("city", validate_required(&address.city, "City"));
    errors.check("state", validate_required(&address.state, "State/Province"));
    errors.check("postal_code", validate_postal_code(&address.postal_code));
    errors.check("country", validate_required(&address.country, "Country"));
}

/// A requested line quantity must lie within `[1, available]`.
///
/// This bounds every quantity control before anything is sent to the cart
/// API; it does not reserve stock.
pub fn validate_quantity(requested: i64, available: u32) -> Result<u32, ValidationError> {
    if requested < 1 {
        return Err(ValidationError::QuantityTooLow);
    }
    match u32::try_from(requested) {
        Ok(quantity) if quantity <= available => Ok(quantity),
        _ => Err(ValidationError::QuantityExceedsStock { available }),
    }
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn trimmed_address(address: &Address) -> Address {
    Address {
        street: address.street.trim().to_owned(),
        city: address.city.trim().to_owned(),
        state: address.state.trim().to_owned(),
        postal_code: address.postal_code.trim().to_owned(),
        country: address.country.trim().to_owned(),
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Registration form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
    #[serde(flatten)]
    pub address: Address,
}

/// Validated registration, in the shape `POST /api/users/register` expects.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub password: String,
    pub phone_number: String,
    pub address: Address,
}

impl RegistrationForm {
    /// Validate every field and normalize the payload.
    ///
    /// # Errors
    ///
    /// Returns all failing fields, in form order.
    pub fn validate(&self) -> Result<NewUser, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("username", validate_username(&self.username));
        let email = validate_email(&self.email)
            .map_err(|e| errors.add("email", e))
            .ok();
        errors.check("password", validate_password(&self.password));
        errors.check(
            "confirm_password",
            validate_password_confirmation(&self.password, &self.confirm_password),
        );
        errors.check("phone_number", validate_phone_number(&self.phone_number));
        validate_address(&self.address, &mut errors);

        match email {
            Some(email) if errors.is_empty() => Ok(NewUser {
                username: self.username.trim().to_owned(),
                email,
                password: self.password.clone(),
                phone_number: self.phone_number.trim().to_owned(),
                address: trimmed_address(&self.address),
            }),
            _ => Err(errors),
        }
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Local path to return to after login.
    pub redirect: Option<String>,
}

/// Validated credentials for `POST /api/users/login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginForm {
    /// Email must be well-formed; password only has to be present.
    ///
    /// # Errors
    ///
    /// Returns all failing fields.
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = validate_email(&self.email)
            .map_err(|e| errors.add("email", e))
            .ok();
        errors.check("password", validate_required(&self.password, "Password"));

        match email {
            Some(email) if errors.is_empty() => Ok(Credentials {
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Own-profile edit form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub username: String,
    pub phone_number: String,
    #[serde(flatten)]
    pub address: Address,
}

/// Validated body for `PUT /api/users/profile`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub phone_number: String,
    pub address: Address,
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns all failing fields.
    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("username", validate_username(&self.username));
        errors.check("phone_number", validate_phone_number(&self.phone_number));
        validate_address(&self.address, &mut errors);

        errors.into_result(ProfileUpdate {
            username: self.username.trim().to_owned(),
            phone_number: self.phone_number.trim().to_owned(),
            address: trimmed_address(&self.address),
        })
    }
}

/// Password change form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Validated body for `PUT /api/users/change-password`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordChange([REDACTED])")
    }
}

impl PasswordChangeForm {
    /// # Errors
    ///
    /// Returns all failing fields.
    pub fn validate(&self) -> Result<PasswordChange, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(
            "current_password",
            validate_required(&self.current_password, "Current password"),
        );
        errors.check("new_password", validate_password(&self.new_password));
        errors.check(
            "confirm_password",
            validate_password_confirmation(&self.new_password, &self.confirm_password),
        );

        errors.into_result(PasswordChange {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

/// Admin edit of another user's account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserEditForm {
    pub username: String,
    pub email: String,
    pub role: String,
}

/// Validated body for `PUT /api/users/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: Email,
    pub role: UserRole,
}

impl UserEditForm {
    /// # Errors
    ///
    /// Returns all failing fields.
    pub fn validate(&self) -> Result<UserUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("username", validate_username(&self.username));
        let email = validate_email(&self.email)
            .map_err(|e| errors.add("email", e))
            .ok();
        let role = UserRole::from_str(self.role.trim())
            .map_err(|_| errors.add("role", ValidationError::Required("Role")))
            .ok();

        match (email, role) {
            (Some(email), Some(role)) if errors.is_empty() => Ok(UserUpdate {
                username: self.username.trim().to_owned(),
                email,
                role,
            }),
            _ => Err(errors),
        }
    }
}

/// Admin product create/edit form.
///
/// Categories are individual checkboxes; images are one URL per line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub category_games: Option<String>,
    pub category_softwares: Option<String>,
    pub images: String,
}

/// Validated body for `POST /api/products` and `PUT /api/products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    pub categories: Vec<ProductCategory>,
    #[serde(rename = "productImgs")]
    pub images: Vec<String>,
}

impl ProductForm {
    /// Selected categories, in menu order.
    #[must_use]
    pub fn categories(&self) -> Vec<ProductCategory> {
        let mut categories = Vec::new();
        if self.category_games.is_some() {
            categories.push(ProductCategory::Games);
        }
        if self.category_softwares.is_some() {
            categories.push(ProductCategory::Softwares);
        }
        categories
    }

    /// Image URLs with blank lines dropped.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        self.images
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }

    /// # Errors
    ///
    /// Returns all failing fields.
    pub fn validate(&self) -> Result<ProductDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validate_required(&self.name, "Product name"));
        errors.check("description", validate_required(&self.description, "Description"));

        let price = parse_price(&self.price)
            .map_err(|e| errors.add("price", e))
            .ok();
        let quantity = parse_stock(&self.quantity)
            .map_err(|e| errors.add("quantity", e))
            .ok();

        let categories = self.categories();
        if categories.is_empty() {
            errors.add("categories", ValidationError::NoCategory);
        }

        match (price, quantity) {
            (Some(price), Some(quantity)) if errors.is_empty() => Ok(ProductDraft {
                name: self.name.trim().to_owned(),
                description: self.description.trim().to_owned(),
                price,
                quantity,
                categories,
                images: self.image_urls(),
            }),
            _ => Err(errors),
        }
    }
}

fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required("Price"));
    }
    let price = Decimal::from_str(raw).map_err(|_| ValidationError::NotANumber("Price"))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::Negative("Price"));
    }
    Ok(price)
}

fn parse_stock(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required("Quantity"));
    }
    let quantity: i64 = raw
        .parse()
        .map_err(|_| ValidationError::NotANumber("Quantity"))?;
    if quantity < 0 {
        return Err(ValidationError::Negative("Quantity"));
    }
    u32::try_from(quantity).map_err(|_| ValidationError::NotANumber("Quantity"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_registration() -> RegistrationForm {
        RegistrationForm {
            username: "  Nimal  ".to_owned(),
            email: " Nimal@Example.LK ".to_owned(),
            password: "secret1".to_owned(),
            confirm_password: "secret1".to_owned(),
            phone_number: "077 123 4567".to_owned(),
            address: Address {
                street: "12 Galle Rd".to_owned(),
                city: "Colombo".to_owned(),
                state: "Western".to_owned(),
                postal_code: "00300".to_owned(),
                country: "Sri Lanka".to_owned(),
            },
        }
    }

    #[test]
    fn test_username_bounds() {
        assert_eq!(validate_username(" "), Err(ValidationError::Required("Username")));
        assert_eq!(validate_username(" a "), Err(ValidationError::UsernameTooShort));
        assert!(validate_username("ab").is_ok());
        assert!(validate_username(&"x".repeat(50)).is_ok());
        assert_eq!(
            validate_username(&"x".repeat(51)),
            Err(ValidationError::UsernameTooLong)
        );
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(validate_password(""), Err(ValidationError::Required("Password")));
        assert_eq!(
            validate_password("12345"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert!(validate_password("123456").is_ok());
        assert_eq!(
            validate_password_confirmation("abcdef", ""),
            Err(ValidationError::ConfirmationRequired)
        );
        assert_eq!(
            validate_password_confirmation("abcdef", "abcdeg"),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_phone_numbers() {
        for ok in ["0771234567", "+94771234567", "771234567", "077 123 4567"] {
            assert!(validate_phone_number(ok).is_ok(), "{ok} should be valid");
        }
        for bad in ["0071234567", "12345", "+9477123456", "07712345678", "phone"] {
            assert_eq!(validate_phone_number(bad), Err(ValidationError::InvalidPhone), "{bad}");
        }
        assert_eq!(
            validate_phone_number("  "),
            Err(ValidationError::Required("Phone number"))
        );
    }

    #[test]
    fn test_postal_code() {
        assert!(validate_postal_code(" 10100 ").is_ok());
        assert_eq!(validate_postal_code("1010"), Err(ValidationError::InvalidPostalCode));
        assert_eq!(validate_postal_code("1010a"), Err(ValidationError::InvalidPostalCode));
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(validate_quantity(0, 5), Err(ValidationError::QuantityTooLow));
        assert_eq!(validate_quantity(-3, 5), Err(ValidationError::QuantityTooLow));
        assert_eq!(validate_quantity(1, 5), Ok(1));
        assert_eq!(validate_quantity(5, 5), Ok(5));
        assert_eq!(
            validate_quantity(6, 5),
            Err(ValidationError::QuantityExceedsStock { available: 5 })
        );
        assert_eq!(validate_quantity(1, 0), Err(ValidationError::QuantityExceedsStock { available: 0 }));
    }

    #[test]
    fn test_registration_normalizes() {
        let user = valid_registration().validate().unwrap();
        assert_eq!(user.username, "Nimal");
        assert_eq!(user.email.as_str(), "nimal@example.lk");
        assert_eq!(user.phone_number, "077 123 4567");
        assert_eq!(user.address.postal_code, "00300");
    }

    #[test]
    fn test_registration_collects_errors_in_form_order() {
        let form = RegistrationForm {
            username: String::new(),
            email: "not-an-email".to_owned(),
            confirm_password: "other".to_owned(),
            ..valid_registration()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.first_error(), Some(&ValidationError::Required("Username")));
        assert_eq!(
            errors.get("email"),
            Some(&ValidationError::Email(EmailError::Malformed))
        );
        assert_eq!(errors.get("confirm_password"), Some(&ValidationError::PasswordMismatch));
        assert!(errors.get("password").is_none());
        assert_eq!(errors.to_string(), "Username is required");
    }

    #[test]
    fn test_registration_missing_address_fields() {
        let mut form = valid_registration();
        form.address.city = " ".to_owned();
        form.address.country = String::new();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.message("city"), "City is required");
        assert_eq!(errors.message("country"), "Country is required");
        assert_eq!(errors.message("street"), "");
    }

    #[test]
    fn test_login_requires_email_and_password() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.message("email"), "Email is required");
        assert_eq!(errors.message("password"), "Password is required");

        let credentials = LoginForm {
            email: "A@B.co".to_owned(),
            password: "x".to_owned(),
            redirect: None,
        }
        .validate()
        .unwrap();
        assert_eq!(credentials.email.as_str(), "a@b.co");
        assert!(!format!("{credentials:?}").contains("\"x\""));
    }

    #[test]
    fn test_password_change() {
        let form = PasswordChangeForm {
            current_password: "old-secret".to_owned(),
            new_password: "new-secret".to_owned(),
            confirm_password: "new-secret".to_owned(),
        };
        let body = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(body["currentPassword"], "old-secret");
        assert_eq!(body["newPassword"], "new-secret");

        let errors = PasswordChangeForm::default().validate().unwrap_err();
        assert_eq!(errors.message("current_password"), "Current password is required");
    }

    #[test]
    fn test_user_edit_rejects_unknown_role() {
        let form = UserEditForm {
            username: "Kamal".to_owned(),
            email: "kamal@example.lk".to_owned(),
            role: "root".to_owned(),
        };
        assert_eq!(form.validate().unwrap_err().message("role"), "Role is required");
    }

    #[test]
    fn test_product_form_valid() {
        let form = ProductForm {
            name: " Elden Ring ".to_owned(),
            description: "Steam key".to_owned(),
            price: "12500.00".to_owned(),
            quantity: "0".to_owned(),
            category_games: Some("on".to_owned()),
            category_softwares: None,
            images: "https://img.example/a.jpg\n\n  \nhttps://img.example/b.jpg ".to_owned(),
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Elden Ring");
        assert_eq!(draft.quantity, 0);
        assert_eq!(draft.categories, vec![ProductCategory::Games]);
        assert_eq!(draft.images.len(), 2);

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["price"], 12500.0);
        assert_eq!(body["productImgs"][1], "https://img.example/b.jpg");
        assert_eq!(body["categories"][0], "Games");
    }

    #[test]
    fn test_product_form_rejects_bad_numbers_and_no_category() {
        let form = ProductForm {
            name: "Office".to_owned(),
            description: "License".to_owned(),
            price: "-1".to_owned(),
            quantity: "ten".to_owned(),
            ..ProductForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("price"), Some(&ValidationError::Negative("Price")));
        assert_eq!(errors.get("quantity"), Some(&ValidationError::NotANumber("Quantity")));
        assert_eq!(errors.get("categories"), Some(&ValidationError::NoCategory));
    }

    #[test]
    fn test_product_form_missing_fields() {
        let errors = ProductForm::default().validate().unwrap_err();
        assert_eq!(errors.first_error(), Some(&ValidationError::Required("Product name")));
        assert_eq!(errors.message("price"), "Price is required");
    }
}
