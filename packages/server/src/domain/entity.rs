//! Domain entities: sessions, player boards and the duel handshake.
//!
//! A [`Session`] is only ever mutated through its methods, and callers hold
//! the session's lock for the whole call, so every method observes and leaves
//! a consistent state.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::{
    Dictionary, GameConfig, PlayerName, SessionError, SessionId, Timestamp,
    evaluator::{TileState, aggregate_letter_states, evaluate, is_solved},
};

pub const MSG_NOT_ENOUGH_LETTERS: &str = "Not enough letters";
pub const MSG_NOT_IN_WORD_LIST: &str = "Not in word list";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Solo,
    Duel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Lose,
}

// ========================================
// PlayerState
// ========================================

/// One player's board and progress within a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub name: PlayerName,
    /// Submitted guesses, one slot per row; unrevealed rows are empty strings
    pub board: Vec<String>,
    pub states: Vec<Vec<TileState>>,
    pub current_row: usize,
    pub game_over: bool,
    pub last_result: Option<GameResult>,
    /// 1-based row of the winning guess; only set on a win
    pub guesses_used: Option<usize>,
}

impl PlayerState {
    pub fn new(name: PlayerName, config: &GameConfig) -> Self {
        Self {
            name,
            board: vec![String::new(); config.max_guesses()],
            states: vec![vec![TileState::Empty; config.word_length()]; config.max_guesses()],
            current_row: 0,
            game_over: false,
            last_result: None,
            guesses_used: None,
        }
    }

    /// Best-known state per letter across all revealed rows
    pub fn letter_states(&self) -> BTreeMap<char, TileState> {
        aggregate_letter_states(
            self.board
                .iter()
                .zip(self.states.iter())
                .map(|(word, states)| (word.as_str(), states.as_slice())),
        )
    }
}

// ========================================
// Duel handshake
// ========================================

/// Secret exchange between the duel creator and the joiner.
///
/// `answers_for_guesser` is either empty or holds exactly one entry per
/// participant; it is filled in a single step once both secrets are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelHandshake {
    creator: PlayerName,
    joiner: Option<PlayerName>,
    secrets: HashMap<PlayerName, String>,
    answers_for_guesser: HashMap<PlayerName, String>,
}

impl DuelHandshake {
    fn new(creator: PlayerName) -> Self {
        Self {
            creator,
            joiner: None,
            secrets: HashMap::new(),
            answers_for_guesser: HashMap::new(),
        }
    }

    pub fn creator(&self) -> &PlayerName {
        &self.creator
    }

    pub fn joiner(&self) -> Option<&PlayerName> {
        self.joiner.as_ref()
    }

    /// Both participants in creation order, once the joiner has arrived
    pub fn pair(&self) -> Option<(&PlayerName, &PlayerName)> {
        self.joiner.as_ref().map(|joiner| (&self.creator, joiner))
    }

    fn is_participant(&self, name: &PlayerName) -> bool {
        &self.creator == name || self.joiner.as_ref() == Some(name)
    }

    pub fn has_secret(&self, name: &PlayerName) -> bool {
        self.secrets.contains_key(name)
    }

    pub fn secrets_submitted(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_established(&self) -> bool {
        self.answers_for_guesser.len() == 2
    }

    fn answer_for(&self, guesser: &PlayerName) -> Option<&str> {
        self.answers_for_guesser.get(guesser).map(String::as_str)
    }

    /// Cross-assign the secrets if both participants have submitted one.
    /// Returns whether the assignment happened.
    fn try_cross_assign(&mut self) -> bool {
        let Some((a, b)) = self.pair() else {
            return false;
        };
        let (Some(secret_a), Some(secret_b)) = (self.secrets.get(a), self.secrets.get(b)) else {
            return false;
        };
        let assigned = HashMap::from([
            (a.clone(), secret_b.clone()),
            (b.clone(), secret_a.clone()),
        ]);
        self.answers_for_guesser = assigned;
        true
    }
}

// ========================================
// Guess results
// ========================================

/// Full result of an accepted guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReport {
    pub player_name: PlayerName,
    pub board: Vec<String>,
    pub states: Vec<Vec<TileState>>,
    pub current_row: usize,
    pub game_over: bool,
    pub last_result: Option<GameResult>,
    pub letter_states: BTreeMap<char, TileState>,
    pub guesses_used: Option<usize>,
    /// Present only on the call that finished the player's game
    pub answer: Option<String>,
}

/// Outcome of a guess submission that named a valid, active player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Accepted(GuessReport),
    /// Wrong number of letters; nothing changed
    InvalidWordLength { player_name: PlayerName },
    /// Not a known word; nothing changed
    NotInDictionary { player_name: PlayerName },
}

impl GuessOutcome {
    pub fn player_name(&self) -> &PlayerName {
        match self {
            GuessOutcome::Accepted(report) => &report.player_name,
            GuessOutcome::InvalidWordLength { player_name }
            | GuessOutcome::NotInDictionary { player_name } => player_name,
        }
    }

    /// Revealed answer, if this guess finished the player's game
    pub fn answer(&self) -> Option<&str> {
        match self {
            GuessOutcome::Accepted(report) => report.answer.as_deref(),
            _ => None,
        }
    }

    /// Same outcome with the answer stripped, for players still guessing it
    pub fn without_answer(&self) -> GuessOutcome {
        let mut outcome = self.clone();
        if let GuessOutcome::Accepted(report) = &mut outcome {
            report.answer = None;
        }
        outcome
    }
}

/// What one player is allowed to see of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub session_id: SessionId,
    pub mode: GameMode,
    pub player_name: PlayerName,
    pub max_guesses: usize,
    pub word_length: usize,
    pub board: Vec<String>,
    pub states: Vec<Vec<TileState>>,
    pub current_row: usize,
    pub game_over: bool,
    pub last_result: Option<GameResult>,
    pub guesses_used: Option<usize>,
    pub letter_states: BTreeMap<char, TileState>,
    /// Only revealed once this player's game is over
    pub answer: Option<String>,
}

/// Whether `add_player` created a new board or found an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Joined,
    Rejoined,
}

// ========================================
// Session
// ========================================

/// One solo or duel game
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub owner: PlayerName,
    mode: GameMode,
    pub config: GameConfig,
    /// Solo answer; fixed at creation
    answer: String,
    /// Players in join order
    players: Vec<PlayerState>,
    duel: Option<DuelHandshake>,
    finished: BTreeSet<PlayerName>,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

impl Session {
    /// Create a solo session with the owner as first player
    pub fn new(
        id: SessionId,
        owner: PlayerName,
        config: GameConfig,
        answer: String,
        now: Timestamp,
    ) -> Self {
        let owner_state = PlayerState::new(owner.clone(), &config);
        Self {
            id,
            owner,
            mode: GameMode::Solo,
            config,
            answer: answer.to_lowercase(),
            players: vec![owner_state],
            duel: None,
            finished: BTreeSet::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Create a session awaiting a duel opponent.
    ///
    /// The session stays in solo mode until both secrets are exchanged.
    pub fn new_duel(
        id: SessionId,
        owner: PlayerName,
        config: GameConfig,
        answer: String,
        now: Timestamp,
    ) -> Self {
        let mut session = Self::new(id, owner.clone(), config, answer, now);
        session.duel = Some(DuelHandshake::new(owner));
        session
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn player_names(&self) -> Vec<PlayerName> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    pub fn player(&self, name: &PlayerName) -> Option<&PlayerState> {
        self.players.iter().find(|p| &p.name == name)
    }

    fn player_mut(&mut self, name: &PlayerName) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| &p.name == name)
    }

    pub fn duel(&self) -> Option<&DuelHandshake> {
        self.duel.as_ref()
    }

    pub fn is_duel(&self) -> bool {
        self.duel.is_some()
    }

    pub fn finished(&self) -> &BTreeSet<PlayerName> {
        &self.finished
    }

    pub fn touch(&mut self, now: Timestamp) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }

    /// Attach a player by name.
    ///
    /// A name already present keeps its board untouched (re-join after a
    /// reconnect). Duel sessions accept exactly one opponent.
    pub fn add_player(&mut self, name: PlayerName) -> Result<Attachment, SessionError> {
        if self.player(&name).is_some() {
            return Ok(Attachment::Rejoined);
        }
        if let Some(duel) = self.duel.as_mut() {
            if duel.joiner.is_some() {
                return Err(SessionError::SessionFull);
            }
            duel.joiner = Some(name.clone());
        }
        self.players.push(PlayerState::new(name, &self.config));
        Ok(Attachment::Joined)
    }

    /// Record a duel participant's secret word.
    ///
    /// Once both participants have submitted, each player's target becomes the
    /// other's secret and the session switches to duel mode. Returns whether
    /// the duel is ready to start after this call.
    pub fn set_secret(&mut self, name: &PlayerName, word: &str) -> Result<bool, SessionError> {
        let word_length = self.config.word_length();
        let duel = self.duel.as_mut().ok_or(SessionError::NotADuel)?;
        if !duel.is_participant(name) {
            return Err(SessionError::InvalidPlayer);
        }
        if duel.is_established() {
            return Err(SessionError::DuelAlreadyStarted);
        }

        let word = word.trim().to_lowercase();
        if word.chars().count() != word_length {
            return Err(SessionError::InvalidSecretLength);
        }
        if !word.chars().all(|c| c.is_alphabetic()) {
            return Err(SessionError::InvalidSecret);
        }

        duel.secrets.insert(name.clone(), word);
        if duel.secrets.len() >= 2 && duel.try_cross_assign() {
            self.mode = GameMode::Duel;
        }
        Ok(self.ready_to_start())
    }

    /// Duel mode with both targets assigned
    pub fn ready_to_start(&self) -> bool {
        self.mode == GameMode::Duel && self.duel.as_ref().is_some_and(|d| d.is_established())
    }

    /// Target answer for `name`: the opponent's secret in a duel, the shared
    /// answer otherwise
    pub fn target_for(&self, name: &PlayerName) -> Option<&str> {
        match self.mode {
            GameMode::Duel => self.duel.as_ref().and_then(|d| d.answer_for(name)),
            GameMode::Solo => Some(self.answer.as_str()),
        }
    }

    /// Apply one guess for `name`.
    ///
    /// Rejections (`InvalidWordLength`, `NotInDictionary`, and all errors)
    /// leave the session untouched.
    pub fn submit_guess(
        &mut self,
        name: &PlayerName,
        raw_guess: &str,
        dictionary: &dyn Dictionary,
    ) -> Result<GuessOutcome, SessionError> {
        match self.player(name) {
            Some(player) if !player.game_over => {}
            _ => return Err(SessionError::InvalidPlayer),
        }
        if self.is_duel() && !self.ready_to_start() {
            return Err(SessionError::DuelNotReady);
        }

        let guess = raw_guess.trim().to_lowercase();
        if guess.chars().count() != self.config.word_length() {
            return Ok(GuessOutcome::InvalidWordLength {
                player_name: name.clone(),
            });
        }

        let target = self
            .target_for(name)
            .ok_or(SessionError::InvalidPlayer)?
            .to_string();
        if !self.is_acceptable_word(&guess, &target, dictionary) {
            return Ok(GuessOutcome::NotInDictionary {
                player_name: name.clone(),
            });
        }

        let max_guesses = self.config.max_guesses();
        let player = self.player_mut(name).ok_or(SessionError::InvalidPlayer)?;
        let row = player.current_row;
        let row_states = evaluate(&guess, &target);
        let won = is_solved(&row_states);
        player.board[row] = guess;
        player.states[row] = row_states;

        let finished = if won {
            player.game_over = true;
            player.last_result = Some(GameResult::Win);
            player.guesses_used = Some(row + 1);
            true
        } else if row + 1 >= max_guesses {
            player.game_over = true;
            player.last_result = Some(GameResult::Lose);
            true
        } else {
            player.current_row = row + 1;
            false
        };

        let report = GuessReport {
            player_name: name.clone(),
            board: player.board.clone(),
            states: player.states.clone(),
            current_row: player.current_row,
            game_over: player.game_over,
            last_result: player.last_result,
            letter_states: player.letter_states(),
            guesses_used: player.guesses_used,
            answer: finished.then_some(target),
        };

        if finished {
            self.finished.insert(name.clone());
        }
        Ok(GuessOutcome::Accepted(report))
    }

    /// The dictionary decides, except that the player's own target and the
    /// session's extra pool are always accepted.
    fn is_acceptable_word(&self, guess: &str, target: &str, dictionary: &dyn Dictionary) -> bool {
        guess == target
            || self
                .config
                .extra_word_pool()
                .is_some_and(|pool| pool.iter().any(|w| w == guess))
            || dictionary.is_valid_word(guess)
    }

    /// Players who have not finished and are still guessing `answer`
    pub fn still_guessing(&self, answer: &str) -> Vec<PlayerName> {
        self.players
            .iter()
            .filter(|p| !p.game_over && self.target_for(&p.name) == Some(answer))
            .map(|p| p.name.clone())
            .collect()
    }

    /// Snapshot of what `name` may see; never includes another player's board
    /// or an unfinished answer
    pub fn player_view(&self, name: &PlayerName) -> Option<PlayerView> {
        self.player(name).map(|player| self.view_of(player))
    }

    /// View of the owner, whose board exists from creation on
    pub fn owner_view(&self) -> PlayerView {
        self.view_of(&self.players[0])
    }

    fn view_of(&self, player: &PlayerState) -> PlayerView {
        let answer = if player.game_over {
            self.target_for(&player.name).map(str::to_string)
        } else {
            None
        };
        PlayerView {
            session_id: self.id.clone(),
            mode: self.mode,
            player_name: player.name.clone(),
            max_guesses: self.config.max_guesses(),
            word_length: self.config.word_length(),
            board: player.board.clone(),
            states: player.states.clone(),
            current_row: player.current_row,
            game_over: player.game_over,
            last_result: player.last_result,
            guesses_used: player.guesses_used,
            letter_states: player.letter_states(),
            answer,
        }
    }
}
