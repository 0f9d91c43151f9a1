pub mod ask;
pub mod run;
pub mod setup;
