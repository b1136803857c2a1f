//! # signup_core
//!
//! State, validation, and submission sequencing for the sign-up form.
//!
//! # Architecture
//!
//! - **Fields**: the five named inputs and their values
//! - **Validation**: a pure ruleset mapping values to per-field errors
//! - **Controller**: owns values, touched flags, UI flags, and the
//!   submission state machine
//! - **Session**: shares a controller between event sources and guarantees
//!   at most one in-flight submission
//! - **Handler**: the external destination of submitted values
//!
//! # Example
//!
//! ```rust,no_run
//! use signup_core::{FieldName, FormController, SimulatedSubmitHandler};
//!
//! # async fn run() -> signup_core::FormResult<()> {
//! let mut form = FormController::new()?;
//! form.set_field_value(FieldName::FirstName, "Jeanine");
//! form.set_field_value(FieldName::LastName, "Lee");
//! form.set_field_value(FieldName::Email, "jeanine@bootcampr.io");
//! form.toggle_agree();
//!
//! let submitted = form.submit(&SimulatedSubmitHandler::default()).await?;
//! assert_eq!(submitted.email, "jeanine@bootcampr.io");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod fields;
pub mod handler;
pub mod session;
pub mod state;
pub mod validation;
pub mod view;

pub use config::{FormConfig, SubmitConfig};
pub use controller::{FormController, MASK_CHAR};
pub use error::{FormError, FormResult, SubmissionError};
pub use events::{Applied, FormEvent};
pub use fields::{FieldName, FieldStatus, FieldValues, UiFlags};
pub use handler::{SimulatedSubmitHandler, SubmitHandler, DEFAULT_SUBMIT_DELAY};
pub use session::FormSession;
pub use state::{SubmissionOutcome, SubmissionState};
pub use validation::{ValidationEngine, ValidationErrors, ValidationRules};
pub use view::{FieldView, FormSnapshot, InputType, AGREEMENT_TEXT, SUBMIT_LABEL};
