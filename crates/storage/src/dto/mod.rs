pub mod academy;
pub mod coach;
pub mod player;
pub mod player_profile;
pub mod user;

mod rules;
