//! UseCase: 推測の提出
//!
//! 結果の配送はセッションのロックを保持したまま行う。同じセッションの
//! `updated` / `outcome` は、処理した順に全ての参加者へ届く。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitGuessUseCase::execute() の戻り値と、各参加者に届いたメッセージ
//!
//! ### なぜこのテストが必要か
//! - 受理された推測はセッション全体に、入力の却下は本人だけに届くことを保証
//! - 推測中のプレイヤーに共有の正解が漏れないことを確認
//! - 対戦結果は 2 人目が終了したその 1 回だけ返ることを確認（同時に終了した場合も含む）
//!
//! ### どのような状況を想定しているか
//! - 正常系：ソロでの正解、対戦での両者終了
//! - 異常系：存在しないセッション、開始前の推測、終了後の推測
//! - エッジケース：辞書にない単語、両者の最後の推測が同時に届く場合

use std::sync::Arc;

use kotoba_shared::time::Clock;

use crate::domain::{
    ConnectionId, Dictionary, DuelOutcome, GuessOutcome, PlayerName, SessionId,
    SessionRepository, Timestamp, determine_outcome,
};

use super::{delivery::Delivery, error::SubmitGuessError};

/// 推測結果を配送するメッセージへの変換（UI 層が実装する）
pub trait GuessPresenter: Send + Sync {
    fn updated(&self, outcome: &GuessOutcome) -> Option<String>;
    fn outcome(&self, outcome: &DuelOutcome) -> Option<String>;
}

/// 推測 1 回分の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessSubmission {
    pub outcome: GuessOutcome,
    /// セッションの参加者（参加順）
    pub participants: Vec<PlayerName>,
    /// 正解を伏せた結果を受け取る参加者（同じ答えをまだ推測中）
    pub answer_withheld_from: Vec<PlayerName>,
    /// この推測で対戦が決着した場合のみ
    pub duel_outcome: Option<DuelOutcome>,
}

impl GuessSubmission {
    /// 受理された推測だけをセッション全体に送る
    pub fn is_broadcast(&self) -> bool {
        matches!(self.outcome, GuessOutcome::Accepted(_))
    }
}

/// 推測提出のユースケース
pub struct SubmitGuessUseCase {
    repository: Arc<dyn SessionRepository>,
    delivery: Delivery,
    dictionary: Arc<dyn Dictionary>,
    clock: Arc<dyn Clock>,
}

impl SubmitGuessUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        delivery: Delivery,
        dictionary: Arc<dyn Dictionary>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            delivery,
            dictionary,
            clock,
        }
    }

    /// 推測を適用し、結果を配送する
    ///
    /// # Returns
    ///
    /// * `Ok(GuessSubmission)` - 適用または却下した結果（配送済み）
    /// * `Err(SubmitGuessError)` - 何も変更しておらず、何も配送していない
    pub async fn execute(
        &self,
        session_id: SessionId,
        player: PlayerName,
        guess: &str,
        connection_id: ConnectionId,
        presenter: &dyn GuessPresenter,
    ) -> Result<GuessSubmission, SubmitGuessError> {
        let handle = self
            .repository
            .get(&session_id)
            .await
            .ok_or(SubmitGuessError::SessionNotFound)?;
        let mut session = handle.lock().await;
        if session.player(&player).is_some() {
            self.delivery
                .map(&session_id, &player, connection_id.clone())
                .await;
        }

        let outcome = session.submit_guess(&player, guess, self.dictionary.as_ref())?;
        session.touch(Timestamp::new(self.clock.now_millis()));

        let finished_now = matches!(&outcome, GuessOutcome::Accepted(report) if report.game_over);
        let duel_outcome = if finished_now {
            tracing::info!("Player '{}' finished in session '{}'", player, session_id);
            determine_outcome(&session)
        } else {
            None
        };
        if let Some(result) = &duel_outcome {
            match &result.winner {
                Some(winner) => tracing::info!("Duel '{}' won by '{}'", session_id, winner),
                None => tracing::info!("Duel '{}' ended in a draw", session_id),
            }
        }

        let submission = GuessSubmission {
            answer_withheld_from: outcome
                .answer()
                .map(|answer| session.still_guessing(answer))
                .unwrap_or_default(),
            outcome,
            participants: session.player_names(),
            duel_outcome,
        };
        self.deliver(&session_id, &connection_id, &submission, presenter)
            .await;
        Ok(submission)
    }

    /// 要求元の接続にだけ返信
    pub async fn reply(&self, connection_id: &ConnectionId, message: &str) {
        self.delivery.push_to_connection(connection_id, message).await;
    }

    async fn deliver(
        &self,
        session_id: &SessionId,
        connection_id: &ConnectionId,
        submission: &GuessSubmission,
        presenter: &dyn GuessPresenter,
    ) {
        if !submission.is_broadcast() {
            if let Some(message) = presenter.updated(&submission.outcome) {
                self.reply(connection_id, &message).await;
            }
            return;
        }

        let (withheld, revealed): (Vec<PlayerName>, Vec<PlayerName>) = submission
            .participants
            .iter()
            .cloned()
            .partition(|p| submission.answer_withheld_from.contains(p));
        if let Some(message) = presenter.updated(&submission.outcome) {
            self.delivery
                .broadcast(session_id, &revealed, &message)
                .await;
        }
        if !withheld.is_empty() {
            if let Some(message) = presenter.updated(&submission.outcome.without_answer()) {
                self.delivery
                    .broadcast(session_id, &withheld, &message)
                    .await;
            }
        }

        if let Some(outcome) = &submission.duel_outcome {
            if let Some(message) = presenter.outcome(outcome) {
                self.delivery
                    .broadcast(session_id, &submission.participants, &message)
                    .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionIdFactory, GameConfig, GameResult, SessionError, Session, SessionIdFactory,
            dictionary::MockDictionary,
        },
        infrastructure::{
            connection_registry::InMemoryConnectionRegistry,
            dto::websocket::{OutcomeMessage, UpdatedMessage},
            repository::InMemorySessionRepository,
        },
        usecase::delivery::test_support::RecordingPusher,
    };
    use kotoba_shared::time::FixedClock;
    use serde_json::Value;

    struct JsonFrames;

    impl GuessPresenter for JsonFrames {
        fn updated(&self, outcome: &GuessOutcome) -> Option<String> {
            serde_json::to_string(&UpdatedMessage::from(outcome.clone())).ok()
        }

        fn outcome(&self, outcome: &DuelOutcome) -> Option<String> {
            serde_json::to_string(&OutcomeMessage::from(outcome.clone())).ok()
        }
    }

    fn name(s: &str) -> PlayerName {
        PlayerName::new(s.to_string()).unwrap()
    }

    fn accept_all() -> MockDictionary {
        let mut dict = MockDictionary::new();
        dict.expect_is_valid_word().return_const(true);
        dict
    }

    async fn setup(
        session: Session,
        dictionary: MockDictionary,
    ) -> (
        SubmitGuessUseCase,
        Arc<InMemorySessionRepository>,
        Arc<RecordingPusher>,
        SessionId,
    ) {
        let session_id = session.id.clone();
        let repository = Arc::new(InMemorySessionRepository::new());
        repository.insert(session).await.unwrap();
        let pusher = Arc::new(RecordingPusher::default());
        let delivery = Delivery::new(Arc::new(InMemoryConnectionRegistry::new()), pusher.clone());
        let usecase = SubmitGuessUseCase::new(
            repository.clone(),
            delivery,
            Arc::new(dictionary),
            Arc::new(FixedClock::new(0)),
        );
        (usecase, repository, pusher, session_id)
    }

    fn solo_session() -> Session {
        Session::new(
            SessionIdFactory::generate(),
            name("alice"),
            GameConfig::default(),
            "crane".to_string(),
            Timestamp::new(0),
        )
    }

    fn started_duel() -> Session {
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
        session
    }

    async fn guess(
        usecase: &SubmitGuessUseCase,
        session_id: &SessionId,
        player: &str,
        word: &str,
    ) -> Result<GuessSubmission, SubmitGuessError> {
        guess_from(usecase, session_id, player, word, ConnectionIdFactory::generate()).await
    }

    async fn guess_from(
        usecase: &SubmitGuessUseCase,
        session_id: &SessionId,
        player: &str,
        word: &str,
        connection_id: ConnectionId,
    ) -> Result<GuessSubmission, SubmitGuessError> {
        usecase
            .execute(session_id.clone(), name(player), word, connection_id, &JsonFrames)
            .await
    }

    fn parse(frame: &str) -> Value {
        serde_json::from_str(frame).unwrap()
    }

    #[tokio::test]
    async fn test_solo_win_is_broadcast() {
        // テスト項目: ソロで正解すると勝利の結果が全員向けに返る
        // given (前提条件):
        let mut session = solo_session();
        session.add_player(name("bob")).unwrap();
        let (usecase, _, _, session_id) = setup(session, accept_all()).await;

        // when (操作):
        let submission = guess(&usecase, &session_id, "alice", "CRANE").await.unwrap();

        // then (期待する結果):
        assert!(submission.is_broadcast());
        assert_eq!(submission.participants, vec![name("alice"), name("bob")]);
        assert_eq!(submission.answer_withheld_from, vec![name("bob")]);
        assert_eq!(submission.duel_outcome, None);
        match submission.outcome {
            GuessOutcome::Accepted(report) => {
                assert_eq!(report.last_result, Some(GameResult::Win));
                assert_eq!(report.guesses_used, Some(1));
                assert_eq!(report.answer.as_deref(), Some("crane"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shared_answer_is_not_sent_to_players_still_guessing() {
        // テスト項目: ソロで誰かが終了しても、推測中の他の参加者には正解が届かない
        // given (前提条件):
        let mut session = solo_session();
        session.add_player(name("bob")).unwrap();
        let (usecase, _, pusher, session_id) = setup(session, accept_all()).await;
        let alice_conn = ConnectionIdFactory::generate();
        let bob_conn = ConnectionIdFactory::generate();
        guess_from(&usecase, &session_id, "bob", "slate", bob_conn.clone())
            .await
            .unwrap();

        // when (操作): alice は 6 手使い切って負ける
        for _ in 0..6 {
            guess_from(&usecase, &session_id, "alice", "pious", alice_conn.clone())
                .await
                .unwrap();
        }

        // then (期待する結果):
        let seen_by_bob = pusher.sent_to(&bob_conn).await;
        let last_for_bob = parse(seen_by_bob.last().unwrap());
        assert_eq!(last_for_bob["player_name"], "alice");
        assert_eq!(last_for_bob["result"]["last_result"], "lose");
        assert!(last_for_bob["result"].get("answer").is_none());
        assert!(seen_by_bob.iter().all(|frame| !frame.contains("crane")));

        let seen_by_alice = pusher.sent_to(&alice_conn).await;
        let last_for_alice = parse(seen_by_alice.last().unwrap());
        assert_eq!(last_for_alice["result"]["answer"], "crane");
    }

    #[tokio::test]
    async fn test_duel_answer_reaches_the_opponent() {
        // テスト項目: 対戦では終了したプレイヤーの正解（相手の秘密の単語）が相手にも届く
        // given (前提条件):
        let (usecase, _, pusher, session_id) = setup(started_duel(), accept_all()).await;
        let bob_conn = ConnectionIdFactory::generate();
        guess_from(&usecase, &session_id, "bob", "pious", bob_conn.clone())
            .await
            .unwrap();

        // when (操作):
        let submission = guess(&usecase, &session_id, "alice", "slate").await.unwrap();

        // then (期待する結果):
        assert!(submission.answer_withheld_from.is_empty());
        let seen_by_bob = pusher.sent_to(&bob_conn).await;
        assert_eq!(parse(seen_by_bob.last().unwrap())["result"]["answer"], "slate");
    }

    #[tokio::test]
    async fn test_unknown_word_goes_only_to_submitter() {
        // テスト項目: 辞書にない単語の却下は本人の接続にだけ届く
        // given (前提条件):
        let mut dict = MockDictionary::new();
        dict.expect_is_valid_word().return_const(false);
        let mut session = solo_session();
        session.add_player(name("bob")).unwrap();
        let (usecase, _, pusher, session_id) = setup(session, dict).await;
        let alice_conn = ConnectionIdFactory::generate();
        let bob_conn = ConnectionIdFactory::generate();
        guess_from(&usecase, &session_id, "alice", "cat", alice_conn.clone())
            .await
            .unwrap();

        // when (操作):
        let submission = guess_from(&usecase, &session_id, "bob", "xqzzv", bob_conn.clone())
            .await
            .unwrap();

        // then (期待する結果):
        assert!(!submission.is_broadcast());
        assert_eq!(
            submission.outcome,
            GuessOutcome::NotInDictionary {
                player_name: name("bob")
            }
        );
        let seen_by_bob = pusher.sent_to(&bob_conn).await;
        assert_eq!(seen_by_bob.len(), 1);
        assert_eq!(parse(&seen_by_bob[0])["message"], "Not in word list");
        let seen_by_alice = pusher.sent_to(&alice_conn).await;
        assert_eq!(seen_by_alice.len(), 1);
        assert_eq!(parse(&seen_by_alice[0])["message"], "Not enough letters");
    }

    #[tokio::test]
    async fn test_guess_before_duel_ready_fails() {
        // テスト項目: 対戦開始前の推測は拒否される
        // given (前提条件):
        let duel = Session::new_duel(
            SessionIdFactory::generate(),
            name("alice"),
            GameConfig::default(),
            "apple".to_string(),
            Timestamp::new(0),
        );
        let (usecase, _, _, session_id) = setup(duel, accept_all()).await;

        // when (操作):
        let result = guess(&usecase, &session_id, "alice", "crane").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SubmitGuessError::Session(SessionError::DuelNotReady))
        );
    }

    #[tokio::test]
    async fn test_guess_in_unknown_session_fails() {
        // テスト項目: 存在しないセッションへの推測は Game not found になる
        // given (前提条件):
        let (usecase, _, _, _) = setup(solo_session(), accept_all()).await;

        // when (操作):
        let result = guess(&usecase, &SessionIdFactory::generate(), "alice", "crane").await;

        // then (期待する結果):
        assert_eq!(result, Err(SubmitGuessError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_duel_outcome_reported_once_when_second_player_finishes() {
        // テスト項目: 2 人目が終了した推測でだけ対戦結果が返り、その後の推測は拒否される
        // given (前提条件):
        let (usecase, _, pusher, session_id) = setup(started_duel(), accept_all()).await;
        let alice_conn = ConnectionIdFactory::generate();

        // when (操作):
        let alice_done = guess_from(&usecase, &session_id, "alice", "slate", alice_conn.clone())
            .await
            .unwrap();
        let bob_miss = guess(&usecase, &session_id, "bob", "pious").await.unwrap();
        let bob_done = guess(&usecase, &session_id, "bob", "crane").await.unwrap();
        let after = guess(&usecase, &session_id, "bob", "crane").await;

        // then (期待する結果):
        assert_eq!(alice_done.duel_outcome, None);
        assert_eq!(bob_miss.duel_outcome, None);
        let outcome = bob_done.duel_outcome.unwrap();
        assert_eq!(outcome.winner, Some(name("alice")));
        assert_eq!(
            after,
            Err(SubmitGuessError::Session(SessionError::InvalidPlayer))
        );

        let seen_by_alice = pusher.sent_to(&alice_conn).await;
        let types: Vec<Value> = seen_by_alice.iter().map(|f| parse(f)["type"].clone()).collect();
        assert_eq!(types, vec!["updated", "updated", "updated", "outcome"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_simultaneous_final_guesses_resolve_duel_once() {
        // テスト項目: 両者の最後の推測が同時に届いても、対戦結果はちょうど 1 回だけ返る
        // given (前提条件):
        let (usecase, repository, _, session_id) = setup(started_duel(), accept_all()).await;
        let usecase = Arc::new(usecase);

        // when (操作):
        let tasks = [("alice", "slate"), ("bob", "crane")].map(|(player, word)| {
            let usecase = usecase.clone();
            let session_id = session_id.clone();
            tokio::spawn(async move { guess(&usecase, &session_id, player, word).await })
        });
        let mut submissions = Vec::new();
        for task in tasks {
            submissions.push(task.await.unwrap().unwrap());
        }

        // then (期待する結果): 同じ手数なので引き分け
        let resolved: Vec<&DuelOutcome> = submissions
            .iter()
            .filter_map(|s| s.duel_outcome.as_ref())
            .collect();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].winner, None);
        let handle = repository.get(&session_id).await.unwrap();
        assert_eq!(handle.lock().await.finished().len(), 2);
    }
}
