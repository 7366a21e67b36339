//! JSON report printed once a battle ends.

use serde_json::{Value, json};

use battle_core::{Action, BattleSummary};

use crate::config::OutputMode;

pub fn render(
    summary: &BattleSummary,
    log: &[Action],
    digest: &[u8; 32],
    mode: OutputMode,
) -> Value {
    let mut report = json!({
        "battle_id": summary.battle_id,
        "winner": summary.winner,
        "turns": summary.turns,
        "digest": hex::encode(digest),
        "final_state": summary.final_state,
    });

    if mode == OutputMode::Full
        && let Some(object) = report.as_object_mut()
    {
        object.insert("log".into(), json!(log));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Battle, RawCharacter};

    fn finished() -> Battle {
        let duck = RawCharacter {
            id: "duck".into(),
            name: "Duck".into(),
            max_health: Some(30),
            ..RawCharacter::default()
        };
        let mut battle = Battle::start("report", &[duck.clone()], &[duck]);
        while !battle.is_complete() {
            battle.resolve_turn(None).unwrap();
        }
        battle
    }

    #[test]
    fn summary_mode_omits_the_log() {
        let battle = finished();
        let summary = battle.summary().unwrap();
        let report = render(&summary, battle.log(), &battle.log_digest(), OutputMode::Summary);

        assert_eq!(report["battle_id"], "report");
        assert_eq!(report["turns"], summary.turns);
        assert_eq!(report["digest"].as_str().unwrap().len(), 64);
        assert!(report.get("log").is_none());
    }

    #[test]
    fn full_mode_lists_every_turn() {
        let battle = finished();
        let summary = battle.summary().unwrap();
        let report = render(&summary, battle.log(), &battle.log_digest(), OutputMode::Full);

        let log = report["log"].as_array().unwrap();
        assert_eq!(log.len(), battle.log().len());
        assert_eq!(log[0]["turn"], 1);
    }
}
