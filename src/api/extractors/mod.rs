//! Custom request extractors.

mod request_params;
mod upload_form;
mod validated_form;

pub use request_params::{PathParam, ValidatedQuery};
pub use upload_form::{PhotoUpload, RegistrationUpload};
pub use validated_form::ValidatedForm;
