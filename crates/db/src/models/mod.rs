//! Domain model structs and their schemas.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A static [`EntitySchema`](academy_core::validation::EntitySchema) declaring
//!   its create/update DTO fields, searchable columns and relations
//! - The [`Entity`] impl tying the two together

pub mod contact;
pub mod entity;
pub mod job_offer;
pub mod key_competency;
pub mod module;
pub mod testimonial;
pub mod training;
pub mod training_key_competency;
pub mod training_module;
pub mod user;

pub use contact::Contact;
pub use entity::{Entity, Page, Record};
pub use job_offer::JobOffer;
pub use key_competency::KeyCompetency;
pub use module::Module;
pub use testimonial::Testimonial;
pub use training::Training;
pub use training_key_competency::TrainingKeyCompetency;
pub use training_module::TrainingModule;
pub use user::User;
