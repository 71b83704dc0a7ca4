//! Request forms: per-page field schemas and client-side validation.
//!
//! A [`RequestForm`] is a plain value: a fixed set of named string fields
//! determined by its [`FormKind`]. Validation only checks presence (and, for
//! signup, that the password was typed twice the same way).

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Which page a form belongs to. Selects the field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    Login,
    Signup,
    Contact,
    Checkout,
    ServiceRequest,
}

/// One field of a form schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub sensitive: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: true,
            sensitive: false,
        }
    }

    const fn optional(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
            sensitive: false,
        }
    }

    const fn secret(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }
}

pub const PASSWORD: &str = "password";
pub const CONFIRM_PASSWORD: &str = "confirmPassword";
pub const SERVICE_TYPE: &str = "serviceType";

const LOGIN_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("email", "Email Address"),
    FieldSpec::required(PASSWORD, "Password").secret(),
];

const SIGNUP_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Full Name"),
    FieldSpec::required("email", "Email Address"),
    FieldSpec::required("mobile", "Mobile Number"),
    FieldSpec::required(PASSWORD, "Password").secret(),
    FieldSpec::optional(CONFIRM_PASSWORD, "Confirm Password").secret(),
];

const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Full Name"),
    FieldSpec::required("mobile", "Mobile Number"),
    FieldSpec::optional("email", "Email Address"),
    FieldSpec::required("message", "Message"),
];

const CHECKOUT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Full Name"),
    FieldSpec::required("mobile", "Mobile Number"),
    FieldSpec::optional("email", "Email"),
    FieldSpec::required("address", "Address"),
    FieldSpec::required("pincode", "Pincode"),
    FieldSpec::optional("notes", "Additional Notes"),
];

const SERVICE_REQUEST_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Full Name"),
    FieldSpec::required("mobile", "Mobile Number"),
    FieldSpec::optional("email", "Email Address"),
    FieldSpec::required("address", "Address"),
    FieldSpec::optional("pincode", "Pincode"),
    FieldSpec::required(SERVICE_TYPE, "Service Type"),
    FieldSpec::optional("urgency", "Urgency Level"),
    FieldSpec::optional("description", "Description"),
    FieldSpec::optional("preferredDate", "Preferred Date"),
];

impl FormKind {
    pub const ALL: [Self; 5] = [
        Self::Login,
        Self::Signup,
        Self::Contact,
        Self::Checkout,
        Self::ServiceRequest,
    ];

    /// Field schema in display order.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Login => LOGIN_FIELDS,
            Self::Signup => SIGNUP_FIELDS,
            Self::Contact => CONTACT_FIELDS,
            Self::Checkout => CHECKOUT_FIELDS,
            Self::ServiceRequest => SERVICE_REQUEST_FIELDS,
        }
    }

    /// Names of the fields that must be non-empty, in display order.
    pub fn required_fields(self) -> impl Iterator<Item = &'static str> {
        self.fields()
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
    }

    #[must_use]
    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// Tag placed in front of generated request IDs.
    #[must_use]
    pub const fn request_prefix(self) -> &'static str {
        match self {
            Self::Login => "LG",
            Self::Signup => "AC",
            Self::Contact => "CM",
            Self::Checkout => "TR",
            Self::ServiceRequest => "SR",
        }
    }

    /// Whether a successful submission schedules an automatic return to idle.
    #[must_use]
    pub const fn auto_resets(self) -> bool {
        matches!(self, Self::Contact)
    }

    /// Whether the password/confirmation pair must match.
    #[must_use]
    pub const fn confirms_password(self) -> bool {
        matches!(self, Self::Signup)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Contact => "contact",
            Self::Checkout => "checkout",
            Self::ServiceRequest => "service-request",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("invalid form kind: {s}"))
    }
}

/// Reasons a submission is refused. None of them change any state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// One or more required fields were empty. Names are in schema order.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequiredField(Vec<String>),

    /// Signup password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Checkout attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Field name not part of the form's schema.
    #[error("unknown field for {kind} form: {name}")]
    UnknownField { kind: FormKind, name: String },

    /// The flow is already showing a submitted result.
    #[error("form has already been submitted")]
    AlreadySubmitted,
}

impl FormError {
    /// Missing field names, if this is a missing-field failure.
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::MissingRequiredField(fields) => fields,
            _ => &[],
        }
    }
}

/// Free-text field values for one page's form.
///
/// Always holds exactly the fields of its kind's schema; unset fields are
/// empty strings.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestForm {
    kind: FormKind,
    fields: BTreeMap<&'static str, String>,
}

impl RequestForm {
    /// An empty form for `kind`.
    #[must_use]
    pub fn new(kind: FormKind) -> Self {
        let fields = kind
            .fields()
            .iter()
            .map(|field| (field.name, String::new()))
            .collect();
        Self { kind, fields }
    }

    /// Service request form pre-filled from the route's service slug.
    #[must_use]
    pub fn service_request(service_slug: &str) -> Self {
        let mut form = Self::new(FormKind::ServiceRequest);
        if let Some(value) = form.fields.get_mut(SERVICE_TYPE) {
            service_slug.clone_into(value);
        }
        form
    }

    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    /// Value of a field; `None` if the schema has no such field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Replace one field's value, returning the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if `name` is not in the schema.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Result<Self, FormError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// In-place flavour of [`with_field`](Self::with_field).
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if `name` is not in the schema; the
    /// form is left untouched.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let kind = self.kind;
        let slot = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField {
                kind,
                name: name.to_string(),
            })?;
        *slot = value.into();
        Ok(())
    }

    /// Empty every field.
    pub fn clear(&mut self) {
        self.fields.values_mut().for_each(String::clear);
    }

    /// True when every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(String::is_empty)
    }

    /// Fields in schema order, as `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.kind.fields().iter().map(|field| {
            let value = self.fields.get(field.name).map_or("", String::as_str);
            (field.name, value)
        })
    }

    /// Required fields that are currently empty, in schema order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<String> {
        self.kind
            .required_fields()
            .filter(|name| self.get(name).is_none_or(str::is_empty))
            .map(str::to_string)
            .collect()
    }

    /// Check the form against its schema.
    ///
    /// # Errors
    ///
    /// Missing required fields are reported before a password mismatch.
    pub fn validate(&self) -> Result<(), FormError> {
        validate(self, self.kind.required_fields())
    }
}

/// Check `form` against an explicit required-field set.
///
/// Presence means "not the empty string"; whitespace counts as content.
///
/// # Errors
///
/// [`FormError::MissingRequiredField`] naming every empty required field, or
/// [`FormError::PasswordMismatch`] for signup forms whose password and
/// confirmation differ.
pub fn validate<'a>(
    form: &RequestForm,
    required: impl IntoIterator<Item = &'a str>,
) -> Result<(), FormError> {
    let missing: Vec<String> = required
        .into_iter()
        .filter(|name| form.get(name).is_none_or(str::is_empty))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(FormError::MissingRequiredField(missing));
    }

    if form.kind.confirms_password() && form.get(PASSWORD) != form.get(CONFIRM_PASSWORD) {
        return Err(FormError::PasswordMismatch);
    }

    Ok(())
}

const REDACTED: &str = "[REDACTED]";

impl RequestForm {
    /// Fields in schema order with sensitive non-empty values masked.
    fn redacted(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.kind.fields().iter().map(|spec| {
            let value = self.fields.get(spec.name).map_or("", String::as_str);
            if spec.sensitive && !value.is_empty() {
                (spec.name, REDACTED)
            } else {
                (spec.name, value)
            }
        })
    }
}

/// Redacts sensitive fields.
impl fmt::Debug for RequestForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.redacted()).finish()?;
        write!(f, " ({})", self.kind)
    }
}

/// Redacts sensitive fields, like `Debug`.
impl Serialize for RequestForm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields: BTreeMap<&str, &str> = self.redacted().collect();
        let mut state = serializer.serialize_struct("RequestForm", 2)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("fields", &fields)?;
        state.end()
    }
}
