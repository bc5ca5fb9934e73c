use crate::domain::loadout::Loadout;
use crate::domain::scavenge::{self, ClaimOutcome};
use crate::domain::store::{self, PurchaseOutcome};
use crate::state::commands::{SessionCommand, WeaponSlot};
use crate::state::session::{Mode, SessionState};
use crate::utils::catalog::Catalog;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Updated,
    /// Left battle mode while `match_id` was still revealing
    LeftBattle { match_id: u64 },
    Claim(ClaimOutcome),
    BattleStarted { match_id: u64, loadout: Loadout },
    Purchase(PurchaseOutcome),
}

/// Apply one command to a session
pub fn apply(
    session: &mut SessionState,
    catalog: &Catalog,
    command: SessionCommand,
) -> Result<CommandOutcome, &'static str> {
    match command {
        SessionCommand::Navigate { mode } => navigate(session, mode),
        SessionCommand::ReturnToLobby => navigate(session, Mode::Lobby),

        SessionCommand::SelectCharacter { character_id } => {
            if catalog.character(&character_id).is_none() {
                return Err("Unknown character");
            }
            session.character_id = character_id;
            Ok(CommandOutcome::Updated)
        }

        SessionCommand::SelectWeapon { slot, weapon_id } => {
            if catalog.weapon(&weapon_id).is_none() {
                return Err("Unknown weapon");
            }
            match slot {
                WeaponSlot::Primary => session.primary_weapon_id = weapon_id,
                WeaponSlot::Secondary => session.secondary_weapon_id = weapon_id,
            }
            Ok(CommandOutcome::Updated)
        }

        SessionCommand::EnterScavenge => {
            if session.mode == Mode::Battle {
                return Err("Leave battle first");
            }
            scavenge::enter(session);
            Ok(CommandOutcome::Updated)
        }

        SessionCommand::ClaimSlot { slot } => {
            scavenge::claim_slot(session, catalog, slot).map(CommandOutcome::Claim)
        }

        SessionCommand::EnterBattle => enter_battle(session, catalog),

        SessionCommand::Purchase { price } => {
            Ok(CommandOutcome::Purchase(store::purchase(session, price)))
        }
    }
}

fn navigate(session: &mut SessionState, mode: Mode) -> Result<CommandOutcome, &'static str> {
    if !mode.is_free_tab() {
        return Err("Mode has a gated entry");
    }

    let left_battle = session.mode == Mode::Battle && mode != Mode::Battle;
    session.mode = mode;

    if left_battle && session.playback.is_simulating() {
        return Ok(CommandOutcome::LeftBattle { match_id: session.playback.match_id });
    }
    Ok(CommandOutcome::Updated)
}

fn enter_battle(session: &mut SessionState, catalog: &Catalog) -> Result<CommandOutcome, &'static str> {
    if session.playback.is_simulating() {
        return Err("Match already in progress");
    }
    if !scavenge::battle_ready(session) {
        return Err("Not enough loot");
    }

    let loadout = Loadout::resolve(session, catalog)?;
    session.mode = Mode::Battle;
    let match_id = session.playback.begin();

    Ok(CommandOutcome::BattleStarted { match_id, loadout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::PlaybackStatus;
    use uuid::Uuid;

    fn setup() -> (SessionState, Catalog) {
        (SessionState::new(Uuid::new_v4(), 2500), Catalog::load())
    }

    fn ready_for_battle(session: &mut SessionState, catalog: &Catalog) {
        apply(session, catalog, SessionCommand::EnterScavenge).unwrap();
        for slot in 0..3 {
            apply(session, catalog, SessionCommand::ClaimSlot { slot }).unwrap();
        }
    }

    #[test]
    fn test_navigate_free_tabs() {
        let (mut session, catalog) = setup();
        for mode in [Mode::Vault, Mode::Armory, Mode::Store, Mode::Lobby] {
            let outcome = apply(&mut session, &catalog, SessionCommand::Navigate { mode }).unwrap();
            assert_eq!(outcome, CommandOutcome::Updated);
            assert_eq!(session.mode, mode);
        }
    }

    #[test]
    fn test_navigate_rejects_gated_modes() {
        let (mut session, catalog) = setup();
        let result = apply(&mut session, &catalog, SessionCommand::Navigate { mode: Mode::Battle });
        assert_eq!(result, Err("Mode has a gated entry"));
        assert_eq!(session.mode, Mode::Lobby);
    }

    #[test]
    fn test_select_character_and_weapons() {
        let (mut session, catalog) = setup();
        apply(&mut session, &catalog, SessionCommand::SelectCharacter { character_id: "c4".into() }).unwrap();
        apply(&mut session, &catalog, SessionCommand::SelectWeapon {
            slot: WeaponSlot::Primary,
            weapon_id: "w3".into(),
        }).unwrap();
        apply(&mut session, &catalog, SessionCommand::SelectWeapon {
            slot: WeaponSlot::Secondary,
            weapon_id: "w3".into(),
        }).unwrap();
        assert_eq!(session.character_id, "c4");
        assert_eq!(session.primary_weapon_id, "w3");
        assert_eq!(session.secondary_weapon_id, "w3");
    }

    #[test]
    fn test_select_unknown_ids() {
        let (mut session, catalog) = setup();
        let result = apply(&mut session, &catalog, SessionCommand::SelectWeapon {
            slot: WeaponSlot::Primary,
            weapon_id: "w42".into(),
        });
        assert_eq!(result, Err("Unknown weapon"));
        assert_eq!(session.primary_weapon_id, "w1");
    }

    #[test]
    fn test_battle_requires_three_claims() {
        let (mut session, catalog) = setup();
        apply(&mut session, &catalog, SessionCommand::EnterScavenge).unwrap();
        apply(&mut session, &catalog, SessionCommand::ClaimSlot { slot: 0 }).unwrap();
        assert_eq!(apply(&mut session, &catalog, SessionCommand::EnterBattle), Err("Not enough loot"));
        assert_eq!(session.mode, Mode::Scavenge);
    }

    #[test]
    fn test_enter_battle_snapshots_loadout() {
        let (mut session, catalog) = setup();
        ready_for_battle(&mut session, &catalog);

        let outcome = apply(&mut session, &catalog, SessionCommand::EnterBattle).unwrap();
        let CommandOutcome::BattleStarted { match_id, loadout } = outcome else {
            panic!("Expected BattleStarted");
        };
        assert_eq!(match_id, 1);
        assert_eq!(loadout.inventory.len(), 3);
        assert_eq!(session.mode, Mode::Battle);
        assert_eq!(session.playback.status, PlaybackStatus::Simulating);
    }

    #[test]
    fn test_no_second_match_while_simulating() {
        let (mut session, catalog) = setup();
        ready_for_battle(&mut session, &catalog);
        apply(&mut session, &catalog, SessionCommand::EnterBattle).unwrap();

        let left = apply(&mut session, &catalog, SessionCommand::ReturnToLobby).unwrap();
        assert_eq!(left, CommandOutcome::LeftBattle { match_id: 1 });

        ready_for_battle(&mut session, &catalog);
        assert_eq!(
            apply(&mut session, &catalog, SessionCommand::EnterBattle),
            Err("Match already in progress")
        );
    }

    #[test]
    fn test_leaving_finished_battle() {
        let (mut session, catalog) = setup();
        ready_for_battle(&mut session, &catalog);
        apply(&mut session, &catalog, SessionCommand::EnterBattle).unwrap();
        session.playback.finish(1);

        let outcome = apply(&mut session, &catalog, SessionCommand::ReturnToLobby).unwrap();
        assert_eq!(outcome, CommandOutcome::Updated);
        assert_eq!(session.mode, Mode::Lobby);
    }

    #[test]
    fn test_scavenge_blocked_from_battle() {
        let (mut session, catalog) = setup();
        ready_for_battle(&mut session, &catalog);
        apply(&mut session, &catalog, SessionCommand::EnterBattle).unwrap();
        assert_eq!(
            apply(&mut session, &catalog, SessionCommand::EnterScavenge),
            Err("Leave battle first")
        );
        assert_eq!(session.inventory.len(), 3);
    }

    #[test]
    fn test_purchase_command() {
        let (mut session, catalog) = setup();
        let outcome = apply(&mut session, &catalog, SessionCommand::Purchase { price: 1200 }).unwrap();
        assert_eq!(outcome, CommandOutcome::Purchase(PurchaseOutcome::Purchased { balance: 1300 }));
    }
}
