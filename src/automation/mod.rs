//! Proactive behaviors: rule triggers ([`triggers`]), intent routing
//! ([`router`]), needs anticipation ([`anticipation`]) and parameter
//! self-tuning ([`optimizer`]).

pub mod anticipation;
pub mod optimizer;
pub mod router;
pub mod triggers;
