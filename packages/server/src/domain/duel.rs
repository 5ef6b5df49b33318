//! Duel outcome resolution.

use super::{GameMode, GameResult, PlayerName, PlayerState, Session};

/// Final standing of one duel participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerResult {
    pub id: PlayerName,
    pub last_result: Option<GameResult>,
    pub guesses_used: Option<usize>,
}

impl From<&PlayerState> for PlayerResult {
    fn from(player: &PlayerState) -> Self {
        Self {
            id: player.name.clone(),
            last_result: player.last_result,
            guesses_used: player.guesses_used,
        }
    }
}

/// Resolved duel; `winner` is `None` for a draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelOutcome {
    pub winner: Option<PlayerName>,
    /// Creator first, then joiner
    pub results: Vec<PlayerResult>,
}

/// Resolve the duel once both participants have finished.
///
/// Returns `None` unless the session is in duel mode and exactly two players
/// have finished. Reads only; calling it repeatedly yields the same outcome.
pub fn determine_outcome(session: &Session) -> Option<DuelOutcome> {
    if session.mode() != GameMode::Duel || session.finished().len() != 2 {
        return None;
    }
    let (creator, joiner) = session.duel()?.pair()?;
    let a = PlayerResult::from(session.player(creator)?);
    let b = PlayerResult::from(session.player(joiner)?);

    let winner = decide_winner(&a, &b);
    Some(DuelOutcome {
        winner,
        results: vec![a, b],
    })
}

/// Both won: fewer guesses wins, equal is a draw. One won: that player.
/// Neither won: draw.
pub fn decide_winner(a: &PlayerResult, b: &PlayerResult) -> Option<PlayerName> {
    let a_won = a.last_result == Some(GameResult::Win);
    let b_won = b.last_result == Some(GameResult::Win);
    match (a_won, b_won) {
        (true, true) => match (a.guesses_used, b.guesses_used) {
            (Some(x), Some(y)) if x < y => Some(a.id.clone()),
            (Some(x), Some(y)) if y < x => Some(b.id.clone()),
            _ => None,
        },
        (true, false) => Some(a.id.clone()),
        (false, true) => Some(b.id.clone()),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        GameConfig, SessionIdFactory, Timestamp, dictionary::MockDictionary,
    };

    fn name(s: &str) -> PlayerName {
        PlayerName::new(s.to_string()).unwrap()
    }

    /// alice must guess "slate", bob must guess "crane"
    fn started_duel() -> (Session, MockDictionary) {
        let mut session = Session::new_duel(
            SessionIdFactory::generate(),
            name("alice"),
            GameConfig::default(),
            "apple".to_string(),
            Timestamp::new(0),
        );
        session.add_player(name("bob")).unwrap();
        session.set_secret(&name("alice"), "crane").unwrap();
        session.set_secret(&name("bob"), "slate").unwrap();
        let mut dict = MockDictionary::new();
        dict.expect_is_valid_word().return_const(true);
        (session, dict)
    }

    fn play(session: &mut Session, dict: &MockDictionary, player: &str, guesses: &[&str]) {
        for guess in guesses {
            session.submit_guess(&name(player), guess, dict).unwrap();
        }
    }

    #[test]
    fn test_no_outcome_until_both_finished() {
        // テスト項目: 片方しか終わっていない間は結果が出ない
        // given (前提条件):
        let (mut session, dict) = started_duel();

        // when (操作):
        play(&mut session, &dict, "alice", &["slate"]);

        // then (期待する結果):
        assert_eq!(determine_outcome(&session), None);
    }

    #[test]
    fn test_no_outcome_for_solo_session() {
        // テスト項目: ソロセッションでは結果が出ない
        // given (前提条件):
        let mut session = Session::new(
            SessionIdFactory::generate(),
            name("alice"),
            GameConfig::default(),
            "crane".to_string(),
            Timestamp::new(0),
        );
        session.add_player(name("bob")).unwrap();
        let mut dict = MockDictionary::new();
        dict.expect_is_valid_word().return_const(true);

        // when (操作):
        play(&mut session, &dict, "alice", &["crane"]);
        play(&mut session, &dict, "bob", &["crane"]);

        // then (期待する結果):
        assert_eq!(session.finished().len(), 2);
        assert_eq!(determine_outcome(&session), None);
    }

    #[test]
    fn test_fewer_guesses_wins() {
        // テスト項目: 両者勝利なら少ない手数のプレイヤーが勝者
        // given (前提条件):
        let (mut session, dict) = started_duel();

        // when (操作):
        play(&mut session, &dict, "alice", &["pious", "slate"]);
        play(&mut session, &dict, "bob", &["pious", "pious", "crane"]);
        let outcome = determine_outcome(&session).unwrap();

        // then (期待する結果):
        assert_eq!(outcome.winner, Some(name("alice")));
        assert_eq!(outcome.results[0].guesses_used, Some(2));
        assert_eq!(outcome.results[1].guesses_used, Some(3));
    }

    #[test]
    fn test_equal_guesses_is_a_draw() {
        // テスト項目: 両者が同じ手数 (3) で勝利した場合は引き分け
        // given (前提条件):
        let (mut session, dict) = started_duel();

        // when (操作):
        play(&mut session, &dict, "alice", &["pious", "pious", "slate"]);
        play(&mut session, &dict, "bob", &["pious", "pious", "crane"]);
        let outcome = determine_outcome(&session).unwrap();

        // then (期待する結果):
        assert_eq!(outcome.winner, None);
        assert!(
            outcome
                .results
                .iter()
                .all(|r| r.last_result == Some(GameResult::Win) && r.guesses_used == Some(3))
        );
    }

    #[test]
    fn test_only_winner_wins_against_loser() {
        // テスト項目: 4 手で勝った A と手数を使い切った B では A が勝者
        // given (前提条件):
        let (mut session, dict) = started_duel();

        // when (操作):
        play(&mut session, &dict, "alice", &["pious", "pious", "pious", "slate"]);
        play(&mut session, &dict, "bob", &["pious"; 6]);
        let outcome = determine_outcome(&session).unwrap();

        // then (期待する結果):
        assert_eq!(outcome.winner, Some(name("alice")));
        assert_eq!(
            outcome.results[1],
            PlayerResult {
                id: name("bob"),
                last_result: Some(GameResult::Lose),
                guesses_used: None,
            }
        );
    }

    #[test]
    fn test_both_lose_is_a_draw() {
        // テスト項目: 両者が負けた場合は引き分け
        // given (前提条件):
        let (mut session, dict) = started_duel();

        // when (操作):
        play(&mut session, &dict, "alice", &["pious"; 6]);
        play(&mut session, &dict, "bob", &["pious"; 6]);

        // then (期待する結果):
        assert_eq!(determine_outcome(&session).unwrap().winner, None);
    }

    #[test]
    fn test_outcome_is_idempotent() {
        // テスト項目: 両者終了後に何度呼んでも同じ結果になり、状態を変えない
        // given (前提条件):
        let (mut session, dict) = started_duel();
        play(&mut session, &dict, "alice", &["slate"]);
        play(&mut session, &dict, "bob", &["pious", "crane"]);

        // when (操作):
        let first = determine_outcome(&session);
        let second = determine_outcome(&session);

        // then (期待する結果):
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(session.finished().len(), 2);
    }
}
