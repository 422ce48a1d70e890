//! Response pipeline: template selection and personalization
//! ([`generator`]), synonym/structure/flair variation ([`variety`]),
//! style and sentiment toning ([`tone`]).

pub mod generator;
pub mod tone;
pub mod variety;
pub mod words;
