pub mod profile;
pub mod tournament;
