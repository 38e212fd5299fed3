pub mod activities;
pub mod career;
pub mod scores;
pub mod university;
