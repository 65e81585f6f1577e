pub mod extraction;
pub mod inference;
pub mod normalize;
pub mod analysis; // extraction -> gateway -> normalizer -> validator
