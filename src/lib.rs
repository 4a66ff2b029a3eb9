#[macro_use]
extern crate log;

pub mod driver;
pub mod formula;
pub mod normalize;
pub mod parser;
pub mod prelude;
pub mod report;
pub mod verifier;
