pub mod discriminator;
pub mod name_normalizer;

pub use discriminator::preprocess_components;
