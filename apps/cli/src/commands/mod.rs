pub mod copy;
pub mod inspect;
pub mod normalize;
