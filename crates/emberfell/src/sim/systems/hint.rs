//! Nearest proximity hint around the player.

use crate::events::GameEvent;
use crate::sim::components::{Hint, Location};
use crate::sim::Simulation;

pub(super) fn run(sim: &mut Simulation) {
    let Some(player_at) = sim.player().and_then(|p| sim.position(p)) else {
        return;
    };

    let mut nearest: Option<(i64, &str)> = None;
    for e in sim.world.query::<(Hint, Location)>() {
        let (Some(hint), Some(at)) = (sim.world.get::<Hint>(e), sim.position(e)) else {
            continue;
        };
        let distance = player_at.distance_squared(at);
        let radius = i64::from(hint.radius);
        if distance < radius * radius && !nearest.is_some_and(|(d, _)| distance >= d) {
            nearest = Some((distance, hint.text.as_str()));
        }
    }

    let text = nearest.map(|(_, text)| text.to_owned());
    if text != sim.hint_text {
        sim.hint_text.clone_from(&text);
        sim.emit(GameEvent::HintChanged { text });
    }
}
