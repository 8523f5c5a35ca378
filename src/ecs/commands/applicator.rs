use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use crate::ecs::clock::SessionClock;
use crate::ecs::events::FactionEvent;
use crate::ecs::resources::{SessionEventKind, SessionFactions, SessionLog};
use crate::id::PlayerId;
use crate::model::{FactionError, FactionRegistry, LeaveOutcome};

use super::{FactionCommand, FactionCommandKind};

/// Exclusive system that drains pending `FactionCommand` messages, applies
/// them to the registry in arrival order, records outcomes in the
/// `SessionLog`, and emits `FactionEvent` messages.
///
/// Runs in `SessionPhase::PostUpdate`.
pub fn apply_faction_commands(world: &mut World) {
    // Drain all pending commands
    let commands: Vec<FactionCommand> = {
        let Some(mut messages) = world.get_resource_mut::<Messages<FactionCommand>>() else {
            return;
        };
        messages.drain().collect()
    };

    if commands.is_empty() {
        return;
    }

    let tick = world.resource::<SessionClock>().tick;
    let mut factions = world.remove_resource::<SessionFactions>().unwrap();
    let mut log = world.remove_resource::<SessionLog>().unwrap();
    let mut events = Vec::new();

    for cmd in commands {
        apply_one(&mut factions.0, &mut log, &mut events, tick, cmd);
    }

    // Write notification events
    if let Some(mut messages) = world.get_resource_mut::<Messages<FactionEvent>>() {
        messages.write_batch(events);
    }

    // Put resources back
    world.insert_resource(factions);
    world.insert_resource(log);
}

fn apply_one(
    registry: &mut FactionRegistry,
    log: &mut SessionLog,
    events: &mut Vec<FactionEvent>,
    tick: u64,
    cmd: FactionCommand,
) {
    let player = cmd.player;
    match cmd.kind {
        FactionCommandKind::Create {
            name,
            password,
            color,
        } => {
            let prior = membership_snapshot(registry, player);
            match registry.create_faction(player, &name, &password, &color) {
                Ok(_) => {
                    let who = display_name(registry, player);
                    announce_supersede(registry, log, events, tick, player, &who, prior);
                    log.record(
                        tick,
                        SessionEventKind::FactionCreated,
                        format!("{who} founded faction {name:?}"),
                    );
                    events.push(FactionEvent::Created { player, name });
                }
                Err(err) => reject(registry, log, events, tick, player, err),
            }
        }

        FactionCommandKind::Join { name, password } => {
            // a rejoin of the player's own faction is a no-op; no departure
            // to announce
            let prior = membership_snapshot(registry, player).filter(|(old, _)| old != &name);
            match registry.join_faction(player, &name, &password) {
                Ok(()) => {
                    let who = display_name(registry, player);
                    announce_supersede(registry, log, events, tick, player, &who, prior);
                    log.record(
                        tick,
                        SessionEventKind::FactionJoined,
                        format!("{who} joined faction {name:?}"),
                    );
                    events.push(FactionEvent::Joined { player, name });
                }
                Err(err) => reject(registry, log, events, tick, player, err),
            }
        }

        FactionCommandKind::Leave { disband_if_leader } => {
            let prior = membership_snapshot(registry, player);
            let was_leader = registry.is_player_leader(player, None);
            match registry.leave_faction(player, disband_if_leader) {
                Ok(outcome) => {
                    let (name, members) = prior.unwrap_or_else(|| {
                        panic!(
                            "apply_faction_commands: leave succeeded for {player} without a faction"
                        )
                    });
                    let who = display_name(registry, player);
                    log.record(
                        tick,
                        SessionEventKind::FactionLeft,
                        format!("{who} left faction {name:?}"),
                    );
                    events.push(FactionEvent::Left {
                        player,
                        name: name.clone(),
                    });
                    if outcome == LeaveOutcome::Disbanded {
                        let message = if was_leader {
                            format!("{who} disbanded faction {name:?}")
                        } else {
                            format!("faction {name:?} folded after {who} left")
                        };
                        log.record(tick, SessionEventKind::FactionDisbanded, message);
                        events.push(FactionEvent::Disbanded { name, members });
                    }
                }
                Err(err) => reject(registry, log, events, tick, player, err),
            }
        }

        FactionCommandKind::Disband { name } => {
            let members = registry.faction_members(&name);
            match registry.disband_faction(&name) {
                Ok(()) => {
                    log.record(
                        tick,
                        SessionEventKind::FactionDisbanded,
                        format!("faction {name:?} has been disbanded"),
                    );
                    events.push(FactionEvent::Disbanded { name, members });
                }
                Err(err) => reject(registry, log, events, tick, player, err),
            }
        }

        FactionCommandKind::ChangePassword { new_password } => {
            match registry.change_password(player, &new_password) {
                Ok(()) => {
                    let who = display_name(registry, player);
                    let name = registry
                        .player_faction(player)
                        .map(|f| f.name.clone())
                        .unwrap_or_else(|| {
                            panic!(
                                "apply_faction_commands: password changed for {player} without a faction"
                            )
                        });
                    log.record(
                        tick,
                        SessionEventKind::PasswordChanged,
                        format!("{who} changed the password of faction {name:?}"),
                    );
                    events.push(FactionEvent::PasswordChanged { player, name });
                }
                Err(err) => reject(registry, log, events, tick, player, err),
            }
        }
    }
}

/// The faction the player is in right now, with its roster, captured before
/// a mutation that may pull them out of it.
fn membership_snapshot(
    registry: &FactionRegistry,
    player: PlayerId,
) -> Option<(String, Vec<PlayerId>)> {
    let faction = registry.player_faction(player)?;
    Some((faction.name.clone(), faction.members.iter().copied().collect()))
}

/// A successful create or join pulls the player out of their old faction
/// first. Announce that departure, and the fold if it emptied the faction.
fn announce_supersede(
    registry: &FactionRegistry,
    log: &mut SessionLog,
    events: &mut Vec<FactionEvent>,
    tick: u64,
    player: PlayerId,
    who: &str,
    prior: Option<(String, Vec<PlayerId>)>,
) {
    let Some((old_name, old_members)) = prior else {
        return;
    };
    log.record(
        tick,
        SessionEventKind::FactionLeft,
        format!("{who} left faction {old_name:?}"),
    );
    events.push(FactionEvent::Left {
        player,
        name: old_name.clone(),
    });
    if !registry.faction_exists(&old_name) {
        log.record(
            tick,
            SessionEventKind::FactionDisbanded,
            format!("faction {old_name:?} folded after {who} left"),
        );
        events.push(FactionEvent::Disbanded {
            name: old_name,
            members: old_members,
        });
    }
}

fn reject(
    registry: &FactionRegistry,
    log: &mut SessionLog,
    events: &mut Vec<FactionEvent>,
    tick: u64,
    player: PlayerId,
    error: FactionError,
) {
    let who = display_name(registry, player);
    tracing::warn!("faction command from {} refused: {}", who, error);
    log.record(
        tick,
        SessionEventKind::CommandRejected,
        format!("command from {who} refused: {error}"),
    );
    events.push(FactionEvent::Rejected { player, error });
}

fn display_name(registry: &FactionRegistry, player: PlayerId) -> String {
    match registry.agent(player) {
        Some(agent) => agent.display_name().to_string(),
        None => format!("player {player}"),
    }
}

#[cfg(test)]
mod tests {
    use bevy_app::App;

    use crate::ecs::app::build_session_app;
    use crate::ecs::components::SessionPlayer;
    use crate::ecs::resources::SessionConfig;
    use crate::ecs::schedule::SessionTick;
    use crate::ecs::spawn::spawn_player;

    use super::*;

    fn session() -> App {
        build_session_app(SessionConfig::default())
    }

    fn spawn(app: &mut App, name: &str) -> PlayerId {
        let entity = spawn_player(app.world_mut(), name);
        app.world().get::<SessionPlayer>(entity).unwrap().id
    }

    fn write_command(world: &mut World, cmd: FactionCommand) {
        world.resource_mut::<Messages<FactionCommand>>().write(cmd);
    }

    fn tick(app: &mut App) {
        app.world_mut().run_schedule(SessionTick);
    }

    fn drain_events(app: &mut App) -> Vec<FactionEvent> {
        app.world_mut()
            .resource_mut::<Messages<FactionEvent>>()
            .drain()
            .collect()
    }

    fn registry(app: &App) -> &FactionRegistry {
        &app.world().resource::<SessionFactions>().0
    }

    #[test]
    fn create_and_join_through_commands() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");
        let brin = spawn(&mut app, "Brin");

        write_command(
            app.world_mut(),
            FactionCommand::create(ada, "Red", "", "#ff0000"),
        );
        tick(&mut app);

        assert!(registry(&app).faction_exists("Red"));
        assert!(registry(&app).is_player_leader(ada, Some("Red")));
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            FactionEvent::Created { player, name } if *player == ada && name == "Red"
        ));

        write_command(app.world_mut(), FactionCommand::join(brin, "Red", ""));
        tick(&mut app);

        assert_eq!(registry(&app).faction_members("Red"), vec![ada, brin]);
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            FactionEvent::Joined { player, name } if *player == brin && name == "Red"
        ));

        let log = app.world().resource::<SessionLog>();
        let kinds: Vec<_> = log.events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SessionEventKind::PlayerConnected,
                SessionEventKind::PlayerConnected,
                SessionEventKind::FactionCreated,
                SessionEventKind::FactionJoined,
            ]
        );
    }

    #[test]
    fn commands_apply_in_arrival_order() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");
        let brin = spawn(&mut app, "Brin");

        // both in one tick: the create lands before the join
        write_command(
            app.world_mut(),
            FactionCommand::create(ada, "Red", "", "#ff0000"),
        );
        write_command(app.world_mut(), FactionCommand::join(brin, "Red", ""));
        tick(&mut app);

        assert_eq!(registry(&app).faction_members("Red"), vec![ada, brin]);
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], FactionEvent::Created { .. }));
        assert!(matches!(events[1], FactionEvent::Joined { .. }));
    }

    #[test]
    fn rejected_command_reports_why() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");

        write_command(app.world_mut(), FactionCommand::join(ada, "Ghost", ""));
        tick(&mut app);

        assert!(!registry(&app).is_player_in_faction(ada, None));
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            FactionEvent::Rejected {
                player,
                error: FactionError::NotFound(name),
            } if *player == ada && name == "Ghost"
        ));

        let log = app.world().resource::<SessionLog>();
        let rejected = log.of_kind(SessionEventKind::CommandRejected);
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].message.contains("Ada"));
    }

    #[test]
    fn leader_leave_needs_the_disband_flag() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");
        let brin = spawn(&mut app, "Brin");
        write_command(
            app.world_mut(),
            FactionCommand::create(ada, "Red", "", "#ff0000"),
        );
        write_command(app.world_mut(), FactionCommand::join(brin, "Red", ""));
        tick(&mut app);
        drain_events(&mut app);

        write_command(app.world_mut(), FactionCommand::leave(ada, false));
        tick(&mut app);

        assert!(registry(&app).faction_exists("Red"));
        let events = drain_events(&mut app);
        assert!(matches!(
            &events[0],
            FactionEvent::Rejected {
                error: FactionError::LeaderMustDisband,
                ..
            }
        ));

        write_command(app.world_mut(), FactionCommand::leave(ada, true));
        tick(&mut app);

        assert!(!registry(&app).faction_exists("Red"));
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            FactionEvent::Left { player, name } if *player == ada && name == "Red"
        ));
        assert!(matches!(
            &events[1],
            FactionEvent::Disbanded { name, members } if name == "Red" && *members == vec![ada, brin]
        ));
    }

    #[test]
    fn superseding_join_announces_the_departure() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");
        let brin = spawn(&mut app, "Brin");
        let cole = spawn(&mut app, "Cole");
        write_command(
            app.world_mut(),
            FactionCommand::create(ada, "Red", "", "#ff0000"),
        );
        write_command(app.world_mut(), FactionCommand::join(brin, "Red", ""));
        write_command(
            app.world_mut(),
            FactionCommand::create(cole, "Blue", "", "#0000ff"),
        );
        tick(&mut app);
        drain_events(&mut app);

        // the leader defects; Red stays up without a leader
        write_command(app.world_mut(), FactionCommand::join(ada, "Blue", ""));
        tick(&mut app);

        let red = registry(&app).faction("Red").unwrap();
        assert_eq!(red.leader, None);
        assert!(red.is_member(brin));

        let events = drain_events(&mut app);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            FactionEvent::Left { player, name } if *player == ada && name == "Red"
        ));
        assert!(matches!(
            &events[1],
            FactionEvent::Joined { player, name } if *player == ada && name == "Blue"
        ));
    }

    #[test]
    fn sole_leader_join_folds_the_remnant() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");
        let brin = spawn(&mut app, "Brin");
        write_command(
            app.world_mut(),
            FactionCommand::create(ada, "Red", "", "#ff0000"),
        );
        write_command(
            app.world_mut(),
            FactionCommand::create(brin, "Blue", "", "#0000ff"),
        );
        tick(&mut app);
        drain_events(&mut app);

        write_command(app.world_mut(), FactionCommand::join(ada, "Blue", ""));
        tick(&mut app);

        assert!(!registry(&app).faction_exists("Red"));
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], FactionEvent::Left { name, .. } if name == "Red"));
        assert!(matches!(
            &events[1],
            FactionEvent::Disbanded { name, members } if name == "Red" && *members == vec![ada]
        ));
        assert!(matches!(&events[2], FactionEvent::Joined { name, .. } if name == "Blue"));
    }

    #[test]
    fn rejoining_own_faction_acks_without_departure() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");
        write_command(
            app.world_mut(),
            FactionCommand::create(ada, "Red", "", "#ff0000"),
        );
        tick(&mut app);
        drain_events(&mut app);

        write_command(app.world_mut(), FactionCommand::join(ada, "Red", ""));
        tick(&mut app);

        assert!(registry(&app).is_player_leader(ada, Some("Red")));
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], FactionEvent::Joined { .. }));
    }

    #[test]
    fn admin_disband_tears_down_any_faction() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");
        let brin = spawn(&mut app, "Brin");
        write_command(
            app.world_mut(),
            FactionCommand::create(ada, "Red", "", "#ff0000"),
        );
        write_command(app.world_mut(), FactionCommand::join(brin, "Red", ""));
        tick(&mut app);
        drain_events(&mut app);

        // brin is no leader; the command stream is trusted
        write_command(app.world_mut(), FactionCommand::disband(brin, "Red"));
        tick(&mut app);

        assert!(!registry(&app).faction_exists("Red"));
        assert!(!registry(&app).is_player_in_faction(ada, None));
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            FactionEvent::Disbanded { name, members } if name == "Red" && *members == vec![ada, brin]
        ));
    }

    #[test]
    fn password_change_gates_later_joins() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");
        let brin = spawn(&mut app, "Brin");
        write_command(
            app.world_mut(),
            FactionCommand::create(ada, "Red", "old", "#ff0000"),
        );
        tick(&mut app);
        drain_events(&mut app);

        // the change applies before the join arrives
        write_command(app.world_mut(), FactionCommand::change_password(ada, "new"));
        write_command(app.world_mut(), FactionCommand::join(brin, "Red", "old"));
        tick(&mut app);

        let events = drain_events(&mut app);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            FactionEvent::PasswordChanged { player, name } if *player == ada && name == "Red"
        ));
        assert!(matches!(
            &events[1],
            FactionEvent::Rejected {
                error: FactionError::WrongPassword,
                ..
            }
        ));

        write_command(app.world_mut(), FactionCommand::join(brin, "Red", "new"));
        tick(&mut app);
        assert!(registry(&app).is_player_in_faction(brin, Some("Red")));
    }

    #[test]
    fn command_for_unknown_player_is_refused() {
        let mut app = session();
        write_command(
            app.world_mut(),
            FactionCommand::create(PlayerId(99), "Red", "", "#ff0000"),
        );
        tick(&mut app);

        assert_eq!(registry(&app).faction_count(), 0);
        let events = drain_events(&mut app);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            FactionEvent::Rejected {
                error: FactionError::UnknownPlayer(id),
                ..
            } if *id == PlayerId(99)
        ));
    }

    #[test]
    fn messages_cleared_between_ticks() {
        let mut app = session();
        let ada = spawn(&mut app, "Ada");
        write_command(
            app.world_mut(),
            FactionCommand::create(ada, "Red", "", "#ff0000"),
        );
        tick(&mut app);

        assert!(!app.world().resource::<Messages<FactionEvent>>().is_empty());

        // two more rotations flush the double buffer
        tick(&mut app);
        tick(&mut app);

        let events = app.world().resource::<Messages<FactionEvent>>();
        assert!(events.is_empty(), "stale faction events should be cleared");
    }
}
