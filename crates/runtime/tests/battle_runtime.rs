//! End-to-end checks of the async battle runtime.

use std::time::Duration;

use battle_core::{
    Ability, Action, Battle, CombatantId, EffectKind, RawCharacter, TeamTag, TurnError, TurnStart,
    Winner,
};
use battle_runtime::{
    BattleEvent, BattleRegistry, BattleRuntime, Event, EventBus, FileActionLog,
    InMemoryActionLog, PlayerTargetProvider, RuntimeConfig, RuntimeError, TargetEvent, Topic,
    TurnEvent,
};
use tempfile::TempDir;

fn fighter(id: &str, damage: u32) -> RawCharacter {
    let strike = Ability {
        id: "strike".into(),
        name: "Strike".into(),
        chance: 0.7,
        effect: EffectKind::Damage,
        damage: Some(damage),
        ..Ability::default()
    };
    let chain = Ability {
        id: "chain".into(),
        name: "Chain".into(),
        chance: 0.3,
        effect: EffectKind::DamageChain,
        damage: Some(damage + 6),
        ..Ability::default()
    };
    RawCharacter {
        id: id.into(),
        name: id.into(),
        max_health: Some(80),
        abilities: vec![strike, chain],
        ..RawCharacter::default()
    }
}

/// Damage-only rosters, so every battle terminates.
fn teams() -> (Vec<RawCharacter>, Vec<RawCharacter>) {
    (
        vec![fighter("bear", 14), fighter("duck", 11)],
        vec![fighter("robot", 13), fighter("frog", 12)],
    )
}

fn without_timestamps(actions: &[Action]) -> Vec<Action> {
    actions
        .iter()
        .cloned()
        .map(|mut action| {
            action.timestamp_ms = 0;
            action
        })
        .collect()
}

fn direct_log(battle_id: &str) -> Battle {
    let (team1, team2) = teams();
    let mut battle = Battle::start(battle_id, &team1, &team2);
    while !battle.is_complete() {
        battle.resolve_turn(None).unwrap();
    }
    battle
}

fn large_buffers() -> RuntimeConfig {
    RuntimeConfig {
        event_buffer_size: 4096,
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn automatic_targeting_matches_the_bare_engine() {
    let (team1, team2) = teams();
    let mut runtime = BattleRuntime::builder()
        .battle(Battle::start("rt-auto", &team1, &team2))
        .build()
        .await
        .unwrap();

    let summary = runtime.run().await.unwrap();
    let handle = runtime.handle();
    let log = handle.action_log().await.unwrap();
    let digest = handle.log_digest().await.unwrap();

    let expected = direct_log("rt-auto");
    assert_eq!(summary.winner, expected.winner().unwrap());
    assert_eq!(summary.turns as usize, expected.log().len());
    assert_eq!(without_timestamps(&log), without_timestamps(expected.log()));
    assert_eq!(digest, expected.log_digest());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn every_action_is_recorded_and_published_in_order() {
    let (team1, team2) = teams();
    let bus = EventBus::with_capacity(4096);
    let mut turns = bus.subscribe(Topic::Turn);
    let mut lifecycle = bus.subscribe(Topic::Battle);
    let log = InMemoryActionLog::new();

    let mut runtime = BattleRuntime::builder()
        .config(large_buffers())
        .battle(Battle::start("rt-events", &team1, &team2))
        .repository(log.clone())
        .event_bus(bus)
        .build()
        .await
        .unwrap();

    let summary = runtime.run().await.unwrap();
    runtime.shutdown().await.unwrap();

    let recorded: Vec<u32> = log.entries().unwrap().iter().map(|e| e.turn).collect();
    let expected: Vec<u32> = (1..=summary.turns).collect();
    assert_eq!(recorded, expected);

    let mut published = Vec::new();
    while let Ok(Event::Turn(TurnEvent::Resolved { action, snapshot })) = turns.try_recv() {
        assert_eq!(snapshot.turns_resolved, action.turn);
        published.push(action.turn);
    }
    assert_eq!(published, expected);

    match lifecycle.try_recv().unwrap() {
        Event::Battle(BattleEvent::Started { snapshot }) => {
            assert_eq!(snapshot.battle_id, "rt-events");
            assert_eq!(snapshot.turns_resolved, 0);
        }
        other => panic!("expected start event, got {other:?}"),
    }
    match lifecycle.try_recv().unwrap() {
        Event::Battle(BattleEvent::Ended { summary: ended }) => assert_eq!(*ended, summary),
        other => panic!("expected end event, got {other:?}"),
    }
    assert!(lifecycle.try_recv().is_err());
}

#[tokio::test]
async fn player_choice_steers_the_first_hit() {
    let team1 = vec![RawCharacter {
        id: "duck".into(),
        name: "Duck".into(),
        ..RawCharacter::default()
    }];
    let team2 = vec![fighter("robot", 5), fighter("frog", 5)];

    let bus = EventBus::with_capacity(64);
    let mut target_events = bus.subscribe(Topic::Target);
    let (provider, selections) = PlayerTargetProvider::channel(Duration::from_secs(5));

    let mut runtime = BattleRuntime::builder()
        .battle(Battle::start("rt-player", &team1, &team2))
        .team_provider(TeamTag::Team1, provider)
        .event_bus(bus)
        .build()
        .await
        .unwrap();

    let wanted = CombatantId::new("team2-frog-1");
    selections
        .provide_target_selection(wanted.clone())
        .await
        .unwrap();

    let action = runtime.step().await.unwrap();
    assert_eq!(action.turn, 1);
    assert_eq!(action.targets.len(), 1);
    assert_eq!(action.targets[0].instance_id, wanted);

    match target_events.recv().await.unwrap() {
        Event::Target(TargetEvent::Requested { pending, .. }) => {
            assert_eq!(pending.caster_id().as_str(), "team1-duck-0");
            assert!(pending.is_candidate("team2-frog-1"));
        }
        other => panic!("expected a target request, got {other:?}"),
    }
    match target_events.recv().await.unwrap() {
        Event::Target(TargetEvent::Selected {
            target, timed_out, ..
        }) => {
            assert_eq!(target, Some(wanted));
            assert!(!timed_out);
        }
        other => panic!("expected a target selection, got {other:?}"),
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unanswered_player_times_out_and_battle_continues() {
    let team1 = vec![RawCharacter {
        id: "duck".into(),
        name: "Duck".into(),
        ..RawCharacter::default()
    }];
    let team2 = vec![fighter("robot", 5)];
    let (provider, _selections) = PlayerTargetProvider::channel(Duration::from_millis(20));

    let mut runtime = BattleRuntime::builder()
        .battle(Battle::start("rt-timeout", &team1, &team2))
        .team_provider(TeamTag::Team1, provider)
        .build()
        .await
        .unwrap();

    let first = runtime.step().await.unwrap();
    assert_eq!(first.targets[0].instance_id.as_str(), "team2-robot-0");
    let second = runtime.step().await.unwrap();
    assert_eq!(second.turn, 2);
    assert_eq!(second.caster.team, TeamTag::Team2);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn begin_turn_is_idempotent_while_a_cast_is_pending() {
    let (team1, team2) = teams();
    let runtime = BattleRuntime::builder()
        .battle(Battle::start("rt-pending", &team1, &team2))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let first = handle.begin_turn().await.unwrap();
    let again = handle.begin_turn().await.unwrap();
    assert!(matches!(first, TurnStart::AwaitingTarget(_)));
    assert_eq!(first, again);

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turns_resolved, 0);
    assert!(state.pending_cast.is_some());

    let action = handle.complete_turn(None).await.unwrap();
    assert_eq!(action.turn, 1);
    assert!(matches!(
        handle.complete_turn(None).await,
        Err(RuntimeError::Turn(TurnError::NoPendingCast))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn finished_battles_reject_further_turns() {
    let (team1, team2) = teams();
    let mut runtime = BattleRuntime::builder()
        .battle(Battle::start("rt-done", &team1, &team2))
        .build()
        .await
        .unwrap();

    let summary = runtime.run().await.unwrap();
    let handle = runtime.handle();

    match handle.resolve_turn(None).await {
        Err(RuntimeError::Turn(TurnError::BattleComplete { winner })) => {
            assert_eq!(winner, summary.winner)
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(runtime.run().await.unwrap(), summary);

    runtime.shutdown().await.unwrap();
    assert!(matches!(
        handle.query_state().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
}

#[tokio::test]
async fn empty_side_ends_before_the_first_turn() {
    let (team1, _) = teams();
    let bus = EventBus::new();
    let mut lifecycle = bus.subscribe(Topic::Battle);

    let mut runtime = BattleRuntime::builder()
        .battle(Battle::start("rt-empty", &team1, &[]))
        .event_bus(bus)
        .build()
        .await
        .unwrap();

    let summary = runtime.run().await.unwrap();
    assert_eq!(summary.winner, Winner::Team1);
    assert_eq!(summary.turns, 0);

    assert!(matches!(
        lifecycle.recv().await.unwrap(),
        Event::Battle(BattleEvent::Started { .. })
    ));
    assert!(matches!(
        lifecycle.recv().await.unwrap(),
        Event::Battle(BattleEvent::Ended { .. })
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn log_dir_persists_the_action_log() {
    let dir = TempDir::new().unwrap();
    let (team1, team2) = teams();
    let mut runtime = BattleRuntime::builder()
        .config(RuntimeConfig::default().with_log_dir(dir.path()))
        .battle(Battle::start("rt-file", &team1, &team2))
        .build()
        .await
        .unwrap();

    runtime.run().await.unwrap();
    let expected = runtime.handle().action_log().await.unwrap();
    runtime.shutdown().await.unwrap();

    let mut stored = FileActionLog::open(dir.path(), "rt-file.actions.log").unwrap();
    let entries = stored.read_all().unwrap();
    assert!(entries.iter().all(|entry| entry.battle_id == "rt-file"));

    let actions: Vec<Action> = entries.into_iter().map(|entry| entry.action).collect();
    assert_eq!(actions, expected);
}

#[tokio::test]
async fn registry_tracks_and_prunes_battles() {
    let (team1, team2) = teams();
    let registry = BattleRegistry::new();

    let mut finished = BattleRuntime::builder()
        .battle(Battle::start("rt-reg-a", &team1, &team2))
        .build()
        .await
        .unwrap();
    let running = BattleRuntime::builder()
        .battle(Battle::start("rt-reg-b", &team1, &team2))
        .build()
        .await
        .unwrap();

    registry.register(finished.handle()).await.unwrap();
    registry.register(running.handle()).await.unwrap();
    assert!(matches!(
        registry.register(running.handle()).await,
        Err(RuntimeError::DuplicateBattle { .. })
    ));
    assert_eq!(registry.battle_ids().await, vec!["rt-reg-a", "rt-reg-b"]);

    finished.run().await.unwrap();
    assert_eq!(registry.prune_completed().await, vec!["rt-reg-a".to_string()]);
    assert!(registry.get("rt-reg-a").await.is_none());
    assert!(registry.get("rt-reg-b").await.is_some());

    finished.shutdown().await.unwrap();
    running.shutdown().await.unwrap();
}
