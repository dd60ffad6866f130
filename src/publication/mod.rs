pub mod model;
pub mod service;

pub use model::{
    Category, CategoryType, ImportedPublication, NewPublication, PublicationDto,
    PublicationUpdate,
};
pub use service::PublicationService;
