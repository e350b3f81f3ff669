//! Pure mapping from operator intents to `POST showfile` bodies.

use shared::{
    domain::PlaybackAction,
    protocol::{Intent, ShowCommand},
};

pub fn build(intent: &Intent) -> ShowCommand {
    match intent {
        Intent::Start => ShowCommand::action(PlaybackAction::Start),
        Intent::Stop => ShowCommand::action(PlaybackAction::Stop),
        Intent::Resume => ShowCommand::action(PlaybackAction::Resume),
        Intent::SelectShow(show) => ShowCommand::select(show),
        Intent::ToggleLoop(next) => ShowCommand::set_loop(*next),
    }
}
