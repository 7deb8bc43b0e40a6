pub mod collection;
pub mod photocard;

pub use collection::{CollectionRow, Condition, NewUserPhotocard, UserPhotocard, UserPhotocardUpdate};
pub use photocard::{NewPhotocard, Photocard, PhotocardFilter};
