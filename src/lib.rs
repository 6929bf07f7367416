//! # forma
//!
//! Server-side HTML form building. Forms are trees of fieldsets and elements
//! that bind submitted values, validate them and render to markup.
//!
//! ```rust
//! use forma::{Element, Form, Validator};
//!
//! let mut form = Form::new("/signup", "post");
//! form.add_field(Element::text("username").required(true).with_validator(Validator::min_length(3)))
//!     .add_field(Element::email("email"))
//!     .add_field(Element::submit("submit", "Sign up"));
//!
//! form.set_field_values([("username", "al"), ("email", "al@example.com")]);
//! assert!(!form.is_valid());
//! assert!(form.get_all_errors().contains_key("username"));
//! assert!(form.render(0, None).starts_with("<form action=\"/signup\" method=\"post\""));
//! ```

pub use crate::diagnostics::{FormError, Result};
pub use crate::element::{Element, ElementKind, InputType};
pub use crate::factory::FieldFactory;
pub use crate::field_group::FieldGroup;
pub use crate::fieldset::Fieldset;
pub use crate::form::Form;
pub use crate::tokens::{MemoryTokenStore, TokenStore};
pub use crate::validation::Validator;
pub use crate::value::Value;

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod dom;
pub mod element;
pub mod factory;
pub mod field_group;
pub mod fieldset;
pub mod form;
pub mod tokens;
pub mod validation;
pub mod value;
