use crate::state::{Combatant, Rosters, TeamTag, TurnPointer, Winner};

/// Picks the acting combatant of the pointer's team.
///
/// Returns `None` when that team has nobody alive.
pub(crate) fn acting_combatant<'a>(
    rosters: &'a Rosters,
    pointer: &TurnPointer,
) -> Option<&'a Combatant> {
    let alive: Vec<&Combatant> = rosters
        .team(pointer.team)
        .iter()
        .filter(|c| c.is_alive)
        .collect();
    if alive.is_empty() {
        return None;
    }
    let index = pointer.index_of(pointer.team) as usize % alive.len();
    Some(alive[index])
}

/// Decides the winner once either side has been wiped out.
pub(crate) fn decide_winner(rosters: &Rosters) -> Option<Winner> {
    let team1 = rosters.alive_count(TeamTag::Team1);
    let team2 = rosters.alive_count(TeamTag::Team2);
    match (team1, team2) {
        (0, 0) => Some(Winner::Draw),
        (0, _) => Some(Winner::Team2),
        (_, 0) => Some(Winner::Team1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RawCharacter, initialize_team};

    fn rosters(team1: usize, team2: usize) -> Rosters {
        let raw = |n: usize| -> Vec<RawCharacter> {
            (0..n)
                .map(|i| RawCharacter {
                    id: format!("m{i}"),
                    ..RawCharacter::default()
                })
                .collect()
        };
        Rosters::new(
            initialize_team(&raw(team1), TeamTag::Team1),
            initialize_team(&raw(team2), TeamTag::Team2),
        )
    }

    #[test]
    fn rotation_skips_dead_members_without_reshuffling() {
        let mut rosters = rosters(3, 1);
        rosters.team1[1].set_health(0);
        let mut pointer = TurnPointer::default();
        let mut picked = Vec::new();

        for _ in 0..6 {
            let actor = acting_combatant(&rosters, &pointer).map(|c| c.instance_id.to_string());
            picked.extend(actor);
            pointer.advance();
            pointer.advance();
        }

        assert_eq!(
            picked,
            ["team1-m0-0", "team1-m2-2", "team1-m0-0", "team1-m2-2", "team1-m0-0", "team1-m2-2"]
        );
    }

    #[test]
    fn empty_acting_team_has_no_actor() {
        let rosters = rosters(0, 2);
        assert!(acting_combatant(&rosters, &TurnPointer::default()).is_none());
    }

    #[test]
    fn winner_is_the_side_with_survivors() {
        let mut rosters = rosters(1, 2);
        assert_eq!(decide_winner(&rosters), None);

        rosters.team2.iter_mut().for_each(|c| c.set_health(0));
        assert_eq!(decide_winner(&rosters), Some(Winner::Team1));

        rosters.team1[0].set_health(0);
        assert_eq!(decide_winner(&rosters), Some(Winner::Draw));
    }
}
