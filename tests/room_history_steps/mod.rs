//! Step definitions for room history BDD scenarios.

mod given;
mod then;
mod when;
