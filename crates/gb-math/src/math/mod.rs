//! Core math modules.

pub mod stable;
pub mod beta;
pub mod binomial;
pub mod normalize;
