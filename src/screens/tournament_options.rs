use crate::core::input::{InputEvent, MenuInput, TextInput};
use crate::game::profile::{CardLoad, EditableProfile, MemoryCards, PlayerSide};
use crate::game::tournament::{
    CompetitorId, DISPLAY_NAME_MAX_LEN, HIGH_SCORE_NAME_MAX_LEN, TournamentRoster,
    upper_score_name,
};
use crate::screens::components::mini_menu::{self, MenuRow, MiniMenuResult};
use crate::screens::components::prompt::{self, PromptAnswer};
use crate::screens::components::text_entry::{self, Answer};
use crate::screens::{Screen, ScreenAction};
use log::{debug, info, warn};

const SEED_MAX_LEN: usize = 3;
const NO_ENTRIES: &str = "-NO ENTRIES-";
const PRESS_START: &str = "Press START";

const REGISTER_MENU_TITLE: &str = "Register Player";
const MODIFY_MENU_TITLE: &str = "Modify Player";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    AddPlayer,
    ModifyPlayer,
    Exit,
}

const ROWS: [RowKind; 3] = [RowKind::AddPlayer, RowKind::ModifyPlayer, RowKind::Exit];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterMenuChoice {
    LoadFromUsb,
    SetPlayerName,
    SetHighscoreName,
    SetSeedNumber,
    ExitAndRegister,
    ExitAndCancel,
    ExitAndDelete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKind {
    Register,
    Modify,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    DisplayName,
    ScoreName,
    Seed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Editing {
    index: usize,
    id: CompetitorId,
}

/// The player currently being registered or modified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditSession {
    pub player_name: String,
    pub score_name: String,
    pub seed_index: u32,
    editing: Option<Editing>,
}

impl EditSession {
    pub const fn is_registered(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing.map(|e| e.index)
    }

    pub fn active_competitor(&self) -> Option<CompetitorId> {
        self.editing.map(|e| e.id)
    }

    pub fn can_finish(&self) -> bool {
        !self.player_name.is_empty() && !self.score_name.is_empty()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn menu_kind(&self) -> MenuKind {
        if self.is_registered() {
            MenuKind::Modify
        } else {
            MenuKind::Register
        }
    }
}

// Each variant owns the overlay it is waiting on.
enum Pending {
    SubMenu {
        kind: MenuKind,
        menu: mini_menu::State<RegisterMenuChoice>,
    },
    TextEntry {
        field: Field,
        entry: text_entry::State,
    },
    LoadFromCard {
        loaded: Option<EditableProfile>,
        prompt: prompt::State,
    },
    DeletePlayer {
        prompt: prompt::State,
    },
}

enum Outcome {
    SubMenu(MenuKind, MiniMenuResult<RegisterMenuChoice>),
    TextEntry(Field, Answer),
    LoadFromCard(Option<EditableProfile>, PromptAnswer),
    DeletePlayer(PromptAnswer),
}

pub struct State {
    pub selected: usize,
    competitor_names: Vec<String>,
    pub modify_choice: usize,
    session: EditSession,
    pending: Option<Pending>,
}

pub fn init(roster: &mut dyn TournamentRoster) -> State {
    roster.start();
    State {
        selected: 0,
        competitor_names: roster.competitor_names(true),
        modify_choice: 0,
        session: EditSession::default(),
        pending: None,
    }
}

impl State {
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    pub fn selected_row(&self) -> RowKind {
        ROWS[self.selected.min(ROWS.len() - 1)]
    }

    pub fn sub_menu(&self) -> Option<(MenuKind, &mini_menu::State<RegisterMenuChoice>)> {
        match &self.pending {
            Some(Pending::SubMenu { kind, menu }) => Some((*kind, menu)),
            _ => None,
        }
    }

    pub fn text_entry(&self) -> Option<&text_entry::State> {
        match &self.pending {
            Some(Pending::TextEntry { entry, .. }) => Some(entry),
            _ => None,
        }
    }

    pub fn prompt(&self) -> Option<&prompt::State> {
        match &self.pending {
            Some(Pending::LoadFromCard { prompt, .. } | Pending::DeletePlayer { prompt }) => {
                Some(prompt)
            }
            _ => None,
        }
    }

    /// Label and current choice for each top-level row.
    pub fn rows(&self) -> Vec<(RowKind, &'static str, String)> {
        ROWS.iter()
            .map(|&kind| match kind {
                RowKind::AddPlayer => (kind, "Add Player", PRESS_START.to_string()),
                RowKind::ModifyPlayer => {
                    let choice = self
                        .competitor_names
                        .get(self.modify_choice)
                        .cloned()
                        .unwrap_or_else(|| NO_ENTRIES.to_string());
                    (kind, "Modify Player", choice)
                }
                RowKind::Exit => (kind, "Exit", String::new()),
            })
            .collect()
    }
}

fn build_sub_menu(kind: MenuKind, session: &EditSession) -> mini_menu::State<RegisterMenuChoice> {
    use RegisterMenuChoice as C;

    let mut rows = Vec::with_capacity(6);
    if kind == MenuKind::Register {
        rows.push(MenuRow::new(C::LoadFromUsb, "Load from USB"));
    }
    rows.push(
        MenuRow::new(C::SetPlayerName, "Set display name").with_value(session.player_name.clone()),
    );
    rows.push(
        MenuRow::new(C::SetHighscoreName, "Set highscore name")
            .with_value(session.score_name.clone()),
    );
    rows.push(
        MenuRow::new(C::SetSeedNumber, "Set seed (optional)")
            .with_value(session.seed_index.to_string()),
    );
    rows.push(MenuRow::new(C::ExitAndRegister, "Finish").enabled(session.can_finish()));
    rows.push(MenuRow::new(C::ExitAndCancel, "Cancel"));
    if kind == MenuKind::Modify {
        rows.push(MenuRow::new(C::ExitAndDelete, "Delete"));
    }

    let title = match kind {
        MenuKind::Register => REGISTER_MENU_TITLE,
        MenuKind::Modify => MODIFY_MENU_TITLE,
    };
    mini_menu::State::new(title, rows)
}

fn display_sub_menu(state: &mut State, kind: MenuKind) {
    state.pending = Some(Pending::SubMenu {
        kind,
        menu: build_sub_menu(kind, &state.session),
    });
}

fn open_text_entry(state: &mut State, field: Field, prompt: String, initial: &str, max_len: usize) {
    state.pending = Some(Pending::TextEntry {
        field,
        entry: text_entry::State::new(prompt, initial, max_len),
    });
}

fn load_player_data_from_competitor(
    state: &mut State,
    roster: &dyn TournamentRoster,
    id: CompetitorId,
    index: Option<usize>,
) {
    let Some(index) = index.or_else(|| roster.find_competitor_index(id)) else {
        panic!("competitor {id:?} is not on the roster");
    };
    let Some(competitor) = roster.competitor(index) else {
        panic!("no competitor at roster index {index}");
    };
    state.session = EditSession {
        player_name: competitor.display_name.clone(),
        score_name: competitor.high_score_name.clone(),
        seed_index: competitor.seed_index,
        editing: Some(Editing { index, id }),
    };
    debug!(
        "Player data: {}, {}, {}",
        state.session.player_name, state.session.score_name, state.session.seed_index
    );
}

/// Leading digits of the entry; anything unparsable counts as unseeded.
fn parse_seed(text: &str) -> u32 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

fn begin_load_from_card(state: &mut State, cards: &dyn MemoryCards) {
    assert!(
        !state.session.is_registered(),
        "load from USB is only offered for new registrations"
    );

    let mut message = None;
    let mut loaded = None;
    for side in PlayerSide::ALL {
        match cards.load_editable(side) {
            CardLoad::NoProfile => continue,
            CardLoad::Unreadable => {
                message = Some(format!("Could not load data for Player {}.", side.number()));
            }
            CardLoad::Loaded(profile) => {
                message = Some(format!(
                    "Player name: {}\nScore name: {}\n\nIs this correct?",
                    profile.display_name, profile.last_used_high_score_name
                ));
                loaded = Some(profile);
            }
        }
        break;
    }

    let message = message.unwrap_or_else(|| "No cards available to load data from!".to_string());
    let prompt = if loaded.is_some() {
        prompt::State::yes_no(message, PromptAnswer::No)
    } else {
        prompt::State::ok(message)
    };
    state.pending = Some(Pending::LoadFromCard { loaded, prompt });
}

fn begin_delete_confirm(state: &mut State, roster: &dyn TournamentRoster) {
    let (Some(index), Some(id)) = (
        state.session.editing_index(),
        state.session.active_competitor(),
    ) else {
        panic!("delete requested without a competitor being modified");
    };
    let Some(competitor) = roster
        .find_competitor_index(id)
        .and_then(|ix| roster.competitor(ix))
    else {
        panic!("competitor {id:?} vanished from the roster");
    };
    let message = format!(
        "Are you sure you want to delete\nPlayer {} (\"{}\")?",
        index + 1,
        competitor.display_name
    );
    state.pending = Some(Pending::DeletePlayer {
        prompt: prompt::State::yes_no(message, PromptAnswer::No),
    });
}

fn finish(state: &mut State, roster: &mut dyn TournamentRoster, kind: MenuKind) -> ScreenAction {
    match kind {
        MenuKind::Register => {
            let s = &state.session;
            match roster.register_competitor(&s.player_name, &s.score_name, s.seed_index) {
                Ok(_) => {
                    let message = format!(
                        "Registered \"{}\" as Player {}",
                        s.player_name,
                        roster.competitor_count()
                    );
                    info!("{message}");
                    state.session.reset();
                    ScreenAction::Reload {
                        message: Some(message),
                    }
                }
                Err(reason) => {
                    warn!("Registration rejected: {reason}");
                    display_sub_menu(state, kind);
                    ScreenAction::SystemMessage(format!("Registration error: {reason}"))
                }
            }
        }
        MenuKind::Modify => {
            let Some(editing) = state.session.editing else {
                panic!("finishing a modification without a tracked competitor");
            };
            let s = &state.session;
            if !roster.update_competitor(editing.id, &s.player_name, &s.score_name, s.seed_index)
            {
                panic!("competitor {:?} vanished from the roster", editing.id);
            }
            state.session.reset();
            ScreenAction::Reload { message: None }
        }
    }
}

fn on_menu_choice(
    state: &mut State,
    roster: &mut dyn TournamentRoster,
    cards: &dyn MemoryCards,
    kind: MenuKind,
    choice: RegisterMenuChoice,
) -> ScreenAction {
    use RegisterMenuChoice as C;

    debug!("{kind:?} menu choice: {choice:?}");
    match choice {
        C::LoadFromUsb => begin_load_from_card(state, cards),
        C::SetPlayerName => {
            let prompt = format!("Player {}'s name:", roster.competitor_count() + 1);
            let initial = state.session.player_name.clone();
            open_text_entry(state, Field::DisplayName, prompt, &initial, DISPLAY_NAME_MAX_LEN);
        }
        C::SetHighscoreName => {
            let prompt = format!("Highscore name for {}:", state.session.player_name);
            let initial = state.session.score_name.clone();
            open_text_entry(state, Field::ScoreName, prompt, &initial, HIGH_SCORE_NAME_MAX_LEN);
        }
        C::SetSeedNumber => {
            let prompt = format!("Seed index for {}:", state.session.player_name);
            // Unseeded shows as an empty entry rather than "0".
            let initial = match state.session.seed_index {
                0 => String::new(),
                seed => seed.to_string(),
            };
            open_text_entry(state, Field::Seed, prompt, &initial, SEED_MAX_LEN);
        }
        C::ExitAndRegister => return finish(state, roster, kind),
        C::ExitAndCancel => state.session.reset(),
        C::ExitAndDelete => begin_delete_confirm(state, roster),
    }
    ScreenAction::None
}

fn resume(
    state: &mut State,
    roster: &mut dyn TournamentRoster,
    cards: &dyn MemoryCards,
    outcome: Outcome,
) -> ScreenAction {
    match outcome {
        Outcome::SubMenu(kind, MiniMenuResult::Chosen(choice)) => {
            on_menu_choice(state, roster, cards, kind, choice)
        }
        Outcome::SubMenu(kind, MiniMenuResult::Cancelled) => {
            debug!("{kind:?} menu backed out, discarding edits.");
            state.session.reset();
            ScreenAction::None
        }
        Outcome::TextEntry(field, answer) => {
            let session = &mut state.session;
            if !answer.cancelled {
                match field {
                    Field::DisplayName => session.player_name = answer.text,
                    Field::ScoreName => session.score_name = answer.text,
                    Field::Seed => session.seed_index = parse_seed(&answer.text),
                }
            }
            if field == Field::ScoreName {
                session.score_name = upper_score_name(&session.score_name);
            }
            let kind = session.menu_kind();
            display_sub_menu(state, kind);
            ScreenAction::None
        }
        Outcome::LoadFromCard(loaded, answer) => {
            if answer == PromptAnswer::Yes
                && let Some(profile) = loaded
            {
                state.session.player_name = profile.display_name;
                state.session.score_name = profile.last_used_high_score_name;
            }
            display_sub_menu(state, MenuKind::Register);
            ScreenAction::None
        }
        Outcome::DeletePlayer(answer) => {
            let mut message = None;
            if answer == PromptAnswer::Yes {
                let Some(id) = state.session.active_competitor() else {
                    panic!("delete confirmed without a tracked competitor");
                };
                if !roster.delete_competitor(id) {
                    message = Some("Unable to delete competitor.".to_string());
                }
            }
            state.session.reset();
            ScreenAction::Reload { message }
        }
    }
}

fn feed_overlay(pending: &mut Pending, input: MenuInput) -> Option<Outcome> {
    match pending {
        Pending::SubMenu { kind, menu } => menu
            .handle_input(input)
            .map(|r| Outcome::SubMenu(*kind, r)),
        Pending::TextEntry { field, entry } => entry
            .handle_input(input)
            .map(|a| Outcome::TextEntry(*field, a)),
        Pending::LoadFromCard { loaded, prompt } => prompt
            .handle_input(input)
            .map(|a| Outcome::LoadFromCard(loaded.take(), a)),
        Pending::DeletePlayer { prompt } => prompt.handle_input(input).map(Outcome::DeletePlayer),
    }
}

fn move_selected(state: &mut State, up: bool) {
    let total = ROWS.len();
    state.selected = if up {
        (state.selected + total - 1) % total
    } else {
        (state.selected + 1) % total
    };
}

fn change_modify_choice(state: &mut State, delta: isize) {
    let total = state.competitor_names.len();
    if total == 0 {
        return;
    }
    state.modify_choice = (state.modify_choice as isize + delta).rem_euclid(total as isize) as usize;
}

fn menu_start(state: &mut State, roster: &mut dyn TournamentRoster) -> ScreenAction {
    match state.selected_row() {
        RowKind::AddPlayer => {
            state.session.reset();
            display_sub_menu(state, MenuKind::Register);
        }
        RowKind::ModifyPlayer => {
            // Nothing to modify yet.
            if roster.competitor_count() == 0 {
                return ScreenAction::None;
            }
            let index = state.modify_choice;
            let Some(id) = roster.competitor(index).map(|c| c.id) else {
                warn!("Modify choice {index} is past the end of the roster.");
                return ScreenAction::None;
            };
            debug!("Modifying competitor {index} ({id:?}).");
            load_player_data_from_competitor(state, roster, id, Some(index));
            display_sub_menu(state, MenuKind::Modify);
        }
        RowKind::Exit => return ScreenAction::Navigate(Screen::Menu),
    }
    ScreenAction::None
}

pub fn handle_input(
    state: &mut State,
    roster: &mut dyn TournamentRoster,
    cards: &dyn MemoryCards,
    ev: &InputEvent,
) -> ScreenAction {
    if !ev.pressed {
        return ScreenAction::None;
    }
    let input = ev.action.menu_input();

    if let Some(pending) = state.pending.as_mut() {
        let Some(outcome) = feed_overlay(pending, input) else {
            return ScreenAction::None;
        };
        state.pending = None;
        return resume(state, roster, cards, outcome);
    }

    match input {
        MenuInput::Up => move_selected(state, true),
        MenuInput::Down => move_selected(state, false),
        MenuInput::Left if state.selected_row() == RowKind::ModifyPlayer => {
            change_modify_choice(state, -1);
        }
        MenuInput::Right if state.selected_row() == RowKind::ModifyPlayer => {
            change_modify_choice(state, 1);
        }
        MenuInput::Start => return menu_start(state, roster),
        MenuInput::Back => return ScreenAction::Navigate(Screen::Menu),
        _ => {}
    }
    ScreenAction::None
}

pub fn handle_text_input(state: &mut State, input: &TextInput) -> ScreenAction {
    if let Some(Pending::TextEntry { entry, .. }) = state.pending.as_mut() {
        entry.handle_text(input);
    }
    ScreenAction::None
}

#[cfg(test)]
mod tests {
    use super::{
        EditSession, MenuKind, RegisterMenuChoice, RowKind, State, handle_input,
        handle_text_input, init, load_player_data_from_competitor, parse_seed,
    };
    use crate::core::input::{InputEvent, TextInput, VirtualAction};
    use crate::game::profile::{CardLoad, EditableProfile, MemoryCards, PlayerSide};
    use crate::game::tournament::{Competitor, CompetitorId, Tournament, TournamentRoster};
    use crate::screens::components::prompt::PromptType;
    use crate::screens::{Screen, ScreenAction};
    use std::cell::RefCell;

    struct FakeCards {
        slots: [CardLoad; 2],
        scanned: RefCell<Vec<PlayerSide>>,
    }

    impl FakeCards {
        fn new(p1: CardLoad, p2: CardLoad) -> Self {
            Self {
                slots: [p1, p2],
                scanned: RefCell::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self::new(CardLoad::NoProfile, CardLoad::NoProfile)
        }
    }

    impl MemoryCards for FakeCards {
        fn load_editable(&self, side: PlayerSide) -> CardLoad {
            self.scanned.borrow_mut().push(side);
            self.slots[side.number() - 1].clone()
        }
    }

    /// Delegates to a real roster but refuses deletions.
    struct StubbornRoster(Tournament);

    impl TournamentRoster for StubbornRoster {
        fn start(&mut self) {
            self.0.start();
        }
        fn competitor_count(&self) -> usize {
            self.0.competitor_count()
        }
        fn competitor_names(&self, with_indices: bool) -> Vec<String> {
            self.0.competitor_names(with_indices)
        }
        fn competitor(&self, index: usize) -> Option<&Competitor> {
            self.0.competitor(index)
        }
        fn find_competitor_index(&self, id: CompetitorId) -> Option<usize> {
            self.0.find_competitor_index(id)
        }
        fn register_competitor(&mut self, n: &str, s: &str, seed: u32) -> Result<CompetitorId, String> {
            self.0.register_competitor(n, s, seed)
        }
        fn update_competitor(&mut self, id: CompetitorId, n: &str, s: &str, seed: u32) -> bool {
            self.0.update_competitor(id, n, s, seed)
        }
        fn delete_competitor(&mut self, _id: CompetitorId) -> bool {
            false
        }
    }

    fn roster(names: &[(&str, &str)]) -> Tournament {
        let mut t = Tournament::new(16);
        for (name, score) in names {
            t.register_competitor(name, score, 0).unwrap();
        }
        t
    }

    fn names(roster: &dyn TournamentRoster) -> Vec<String> {
        roster.competitor_names(false)
    }

    struct Harness<'a, R: TournamentRoster> {
        state: State,
        roster: &'a mut R,
        cards: &'a FakeCards,
    }

    impl<'a, R: TournamentRoster> Harness<'a, R> {
        fn new(roster: &'a mut R, cards: &'a FakeCards) -> Self {
            let state = init(&mut *roster);
            Self {
                state,
                roster,
                cards,
            }
        }

        fn press(&mut self, action: VirtualAction) -> ScreenAction {
            let action = handle_input(
                &mut self.state,
                &mut *self.roster,
                self.cards,
                &InputEvent::press(action),
            );
            if let ScreenAction::Reload { .. } = action {
                self.state = init(&mut *self.roster);
            }
            action
        }

        fn start(&mut self) -> ScreenAction {
            self.press(VirtualAction::p1_start)
        }

        fn type_text(&mut self, text: &str) {
            handle_text_input(&mut self.state, &TextInput::Text(text.to_string()));
        }

        fn clear_text(&mut self) {
            while self
                .state
                .text_entry()
                .is_some_and(|entry| !entry.value.is_empty())
            {
                handle_text_input(&mut self.state, &TextInput::Backspace);
            }
        }

        /// Moves the sub-menu cursor onto `choice` and presses start.
        fn choose(&mut self, choice: RegisterMenuChoice) -> ScreenAction {
            let (_, menu) = self.state.sub_menu().expect("sub-menu should be open");
            let target = menu
                .rows()
                .iter()
                .position(|r| r.code == choice)
                .expect("choice should be on this menu");
            let mut guard = 0;
            while self.state.sub_menu().map(|(_, m)| m.selected) != Some(target) {
                self.press(VirtualAction::p1_down);
                guard += 1;
                assert!(guard < 16, "could not reach {choice:?}");
            }
            self.start()
        }

        fn enter(&mut self, choice: RegisterMenuChoice, text: &str) {
            self.choose(choice);
            self.clear_text();
            self.type_text(text);
            self.start();
        }

        fn finish_enabled(&self) -> bool {
            let (_, menu) = self.state.sub_menu().expect("sub-menu should be open");
            menu.rows()
                .iter()
                .find(|r| r.code == RegisterMenuChoice::ExitAndRegister)
                .is_some_and(|r| r.enabled)
        }

        fn select_row(&mut self, row: RowKind) {
            while self.state.selected_row() != row {
                self.press(VirtualAction::p1_down);
            }
        }
    }

    #[test]
    fn top_rows_list_competitors_or_placeholder() {
        let mut empty = roster(&[]);
        let state = init(&mut empty);
        assert_eq!(state.rows()[1].2, "-NO ENTRIES-");
        assert_eq!(state.rows()[0].2, "Press START");

        let mut two = roster(&[("Alice", "ALIC"), ("Bob", "BOB")]);
        let mut state = init(&mut two);
        assert_eq!(state.rows()[1].2, "1. Alice");
        let cards = FakeCards::empty();
        state.selected = 1;
        handle_input(&mut state, &mut two, &cards, &InputEvent::press(VirtualAction::p2_right));
        assert_eq!(state.rows()[1].2, "2. Bob");
        handle_input(&mut state, &mut two, &cards, &InputEvent::press(VirtualAction::p1_right));
        assert_eq!(state.rows()[1].2, "1. Alice");
    }

    #[test]
    fn register_menu_rows_and_modify_menu_rows_differ() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("Alice", "ALIC")]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        let (kind, menu) = h.state.sub_menu().unwrap();
        assert_eq!(kind, MenuKind::Register);
        let codes: Vec<_> = menu.rows().iter().map(|r| r.code).collect();
        assert_eq!(
            codes,
            vec![
                C::LoadFromUsb,
                C::SetPlayerName,
                C::SetHighscoreName,
                C::SetSeedNumber,
                C::ExitAndRegister,
                C::ExitAndCancel
            ]
        );
        h.choose(C::ExitAndCancel);
        assert!(h.state.is_idle());

        h.select_row(RowKind::ModifyPlayer);
        h.start();
        let (kind, menu) = h.state.sub_menu().unwrap();
        assert_eq!(kind, MenuKind::Modify);
        let codes: Vec<_> = menu.rows().iter().map(|r| r.code).collect();
        assert_eq!(
            codes,
            vec![
                C::SetPlayerName,
                C::SetHighscoreName,
                C::SetSeedNumber,
                C::ExitAndRegister,
                C::ExitAndCancel,
                C::ExitAndDelete
            ]
        );
        assert_eq!(menu.rows()[0].value.as_deref(), Some("Alice"));
    }

    #[test]
    fn edits_then_cancel_leave_roster_unchanged() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("Alice", "ALIC")]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.enter(C::SetPlayerName, "Carol");
        h.enter(C::SetHighscoreName, "caro");
        h.enter(C::SetSeedNumber, "4");
        assert_eq!(h.state.session().player_name, "Carol");
        assert_eq!(h.state.session().seed_index, 4);
        assert_eq!(h.choose(C::ExitAndCancel), ScreenAction::None);

        assert!(h.state.is_idle());
        assert_eq!(*h.state.session(), EditSession::default());
        assert_eq!(names(&*h.roster), vec!["Alice"]);
    }

    #[test]
    fn back_on_sub_menu_discards_session() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.enter(C::SetPlayerName, "Carol");
        assert_eq!(h.press(VirtualAction::p1_back), ScreenAction::None);
        assert!(h.state.is_idle());
        assert_eq!(*h.state.session(), EditSession::default());
        assert_eq!(h.roster.competitor_count(), 0);
    }

    #[test]
    fn successful_registration_adds_one_entry_and_reloads() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("Alice", "ALIC")]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.enter(C::SetPlayerName, "Bob");
        h.enter(C::SetHighscoreName, "bob");
        assert!(h.finish_enabled());
        let action = h.choose(C::ExitAndRegister);
        assert_eq!(
            action,
            ScreenAction::Reload {
                message: Some("Registered \"Bob\" as Player 2".to_string())
            }
        );
        assert_eq!(names(&*h.roster), vec!["Alice", "Bob"]);
        assert_eq!(h.roster.competitor(1).unwrap().high_score_name, "BOB");
        assert!(h.state.is_idle());
        assert_eq!(*h.state.session(), EditSession::default());
        assert_eq!(h.state.rows()[1].2, "1. Alice");
    }

    #[test]
    fn rejected_registration_is_reported_and_menu_stays_open() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("Alice", "ALIC")]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.enter(C::SetPlayerName, "alice");
        h.enter(C::SetHighscoreName, "AL");
        let action = h.choose(C::ExitAndRegister);
        assert_eq!(
            action,
            ScreenAction::SystemMessage(
                "Registration error: \"Alice\" is already registered.".to_string()
            )
        );
        assert_eq!(h.state.sub_menu().map(|(k, _)| k), Some(MenuKind::Register));
        assert_eq!(h.state.session().player_name, "alice");
        assert_eq!(h.roster.competitor_count(), 1);
    }

    #[test]
    fn finish_requires_both_names() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        assert!(!h.finish_enabled());
        h.enter(C::SetPlayerName, "Dana");
        assert!(!h.finish_enabled());
        h.enter(C::SetHighscoreName, "DANA");
        assert!(h.finish_enabled());
        h.enter(C::SetPlayerName, "");
        assert!(!h.finish_enabled());

        // The cursor never lands on a disabled row, so start cannot register.
        for _ in 0..8 {
            h.press(VirtualAction::p1_down);
            let (_, menu) = h.state.sub_menu().unwrap();
            assert_ne!(menu.rows()[menu.selected].code, C::ExitAndRegister);
        }
        assert_eq!(h.roster.competitor_count(), 0);
    }

    #[test]
    fn score_name_is_upper_cased_on_commit() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.choose(C::SetHighscoreName);
        assert_eq!(h.state.text_entry().unwrap().max_len, 4);
        h.type_text("AbCdEf");
        assert_eq!(h.state.text_entry().unwrap().value, "AbCd");
        h.start();
        assert_eq!(h.state.session().score_name, "ABCD");
    }

    #[test]
    fn cancelled_text_entry_keeps_previous_value() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("Alice", "ALIC")]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.enter(C::SetPlayerName, "Erin");
        h.choose(C::SetPlayerName);
        let entry = h.state.text_entry().unwrap();
        assert_eq!(entry.prompt, "Player 2's name:");
        assert_eq!(entry.value, "Erin");
        h.type_text("xyz");
        h.press(VirtualAction::p1_back);
        assert_eq!(h.state.session().player_name, "Erin");
        assert_eq!(h.state.sub_menu().map(|(k, _)| k), Some(MenuKind::Register));
    }

    #[test]
    fn seed_entry_parses_leading_digits() {
        assert_eq!(parse_seed("12"), 12);
        assert_eq!(parse_seed("7x"), 7);
        assert_eq!(parse_seed("abc"), 0);
        assert_eq!(parse_seed(""), 0);
        assert_eq!(parse_seed("-3"), 0);

        use RegisterMenuChoice as C;
        let mut r = roster(&[]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);
        h.start();
        h.enter(C::SetPlayerName, "Finn");
        h.choose(C::SetSeedNumber);
        let entry = h.state.text_entry().unwrap();
        assert_eq!(entry.prompt, "Seed index for Finn:");
        assert!(entry.value.is_empty());
        h.type_text("5");
        h.start();
        assert_eq!(h.state.session().seed_index, 5);
        let (_, menu) = h.state.sub_menu().unwrap();
        let seed_row = menu
            .rows()
            .iter()
            .find(|r| r.code == C::SetSeedNumber)
            .unwrap();
        assert_eq!(seed_row.value.as_deref(), Some("5"));
    }

    #[test]
    fn modify_then_finish_updates_in_place() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("Alice", "ALIC"), ("Bob", "BOB"), ("Cat", "CAT")]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);
        let bob = h.roster.competitor(1).unwrap().id;

        h.select_row(RowKind::ModifyPlayer);
        h.press(VirtualAction::p1_right);
        h.start();
        let session = h.state.session();
        assert!(session.is_registered());
        assert_eq!(session.editing_index(), Some(1));
        assert_eq!(session.active_competitor(), Some(bob));
        assert_eq!(session.player_name, "Bob");

        h.enter(C::SetPlayerName, "Robert");
        h.enter(C::SetHighscoreName, "rob");
        h.enter(C::SetSeedNumber, "2");
        assert_eq!(h.state.sub_menu().map(|(k, _)| k), Some(MenuKind::Modify));
        assert_eq!(
            h.choose(C::ExitAndRegister),
            ScreenAction::Reload { message: None }
        );

        assert_eq!(names(&*h.roster), vec!["Alice", "Robert", "Cat"]);
        let updated = h.roster.competitor(1).unwrap();
        assert_eq!(updated.id, bob);
        assert_eq!(updated.high_score_name, "ROB");
        assert_eq!(updated.seed_index, 2);
        assert_eq!(*h.state.session(), EditSession::default());
    }

    #[test]
    fn modify_with_empty_roster_is_ignored() {
        let mut r = roster(&[]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);
        h.select_row(RowKind::ModifyPlayer);
        assert_eq!(h.start(), ScreenAction::None);
        assert!(h.state.is_idle());
    }

    #[test]
    fn delete_confirmed_removes_exactly_that_entry() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("A", "A"), ("B", "B"), ("C", "C"), ("D", "D")]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.select_row(RowKind::ModifyPlayer);
        h.press(VirtualAction::p1_right);
        h.press(VirtualAction::p1_right);
        h.start();
        h.choose(C::ExitAndDelete);
        let prompt = h.state.prompt().unwrap();
        assert_eq!(prompt.kind, PromptType::YesNo);
        assert_eq!(
            prompt.message,
            "Are you sure you want to delete\nPlayer 3 (\"C\")?"
        );
        h.press(VirtualAction::p1_left);
        assert_eq!(h.start(), ScreenAction::Reload { message: None });
        assert_eq!(names(&*h.roster), vec!["A", "B", "D"]);
        assert!(h.state.is_idle());
    }

    #[test]
    fn delete_declined_still_reloads_without_changes() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("A", "A"), ("B", "B")]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.select_row(RowKind::ModifyPlayer);
        h.start();
        h.choose(C::ExitAndDelete);
        assert_eq!(h.start(), ScreenAction::Reload { message: None });
        assert_eq!(names(&*h.roster), vec!["A", "B"]);
        assert_eq!(*h.state.session(), EditSession::default());
    }

    #[test]
    fn failed_delete_is_reported() {
        use RegisterMenuChoice as C;
        let mut r = StubbornRoster(roster(&[("A", "A")]));
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.select_row(RowKind::ModifyPlayer);
        h.start();
        h.choose(C::ExitAndDelete);
        h.press(VirtualAction::p1_right);
        assert_eq!(
            h.start(),
            ScreenAction::Reload {
                message: Some("Unable to delete competitor.".to_string())
            }
        );
        assert_eq!(h.roster.competitor_count(), 1);
    }

    #[test]
    fn load_from_card_stops_at_first_profile_and_applies_on_yes() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[]);
        let alice = EditableProfile {
            display_name: "Alice".to_string(),
            last_used_high_score_name: "ALIC".to_string(),
        };
        let cards = FakeCards::new(CardLoad::NoProfile, CardLoad::Loaded(alice));
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.choose(C::LoadFromUsb);
        assert_eq!(*cards.scanned.borrow(), vec![PlayerSide::P1, PlayerSide::P2]);
        let prompt = h.state.prompt().unwrap();
        assert_eq!(prompt.kind, PromptType::YesNo);
        assert_eq!(
            prompt.message,
            "Player name: Alice\nScore name: ALIC\n\nIs this correct?"
        );
        h.press(VirtualAction::p1_right);
        h.start();

        assert_eq!(h.state.session().player_name, "Alice");
        assert_eq!(h.state.session().score_name, "ALIC");
        assert_eq!(h.state.sub_menu().map(|(k, _)| k), Some(MenuKind::Register));
        assert!(h.finish_enabled());
    }

    #[test]
    fn load_from_card_declined_keeps_session() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[]);
        let bob = EditableProfile {
            display_name: "Bob".to_string(),
            last_used_high_score_name: "BOB".to_string(),
        };
        let cards = FakeCards::new(CardLoad::Loaded(bob), CardLoad::NoProfile);
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.enter(C::SetPlayerName, "Zed");
        h.choose(C::LoadFromUsb);
        // First slot matched, second never consulted.
        assert_eq!(*cards.scanned.borrow(), vec![PlayerSide::P1]);
        h.start();
        assert_eq!(h.state.session().player_name, "Zed");
        assert!(h.state.sub_menu().is_some());
    }

    #[test]
    fn unreadable_card_stops_scan_with_error() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[]);
        let alice = EditableProfile {
            display_name: "Alice".to_string(),
            last_used_high_score_name: "ALIC".to_string(),
        };
        let cards = FakeCards::new(CardLoad::Unreadable, CardLoad::Loaded(alice));
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.choose(C::LoadFromUsb);
        let prompt = h.state.prompt().unwrap();
        assert_eq!(prompt.kind, PromptType::Ok);
        assert_eq!(prompt.message, "Could not load data for Player 1.");
        assert_eq!(*cards.scanned.borrow(), vec![PlayerSide::P1]);
        h.start();
        assert!(h.state.session().player_name.is_empty());
        assert!(h.state.sub_menu().is_some());
    }

    #[test]
    fn no_cards_reports_nothing_to_load() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.start();
        h.choose(C::LoadFromUsb);
        let prompt = h.state.prompt().unwrap();
        assert_eq!(prompt.message, "No cards available to load data from!");
        assert_eq!(prompt.kind, PromptType::Ok);
    }

    #[test]
    fn back_and_exit_leave_the_screen() {
        let mut r = roster(&[]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);
        assert_eq!(
            h.press(VirtualAction::p2_back),
            ScreenAction::Navigate(Screen::Menu)
        );
        h.select_row(RowKind::Exit);
        assert_eq!(h.start(), ScreenAction::Navigate(Screen::Menu));
    }

    #[test]
    fn releases_are_ignored() {
        let mut r = roster(&[]);
        let cards = FakeCards::empty();
        let mut state = init(&mut r);
        let mut ev = InputEvent::press(VirtualAction::p1_start);
        ev.pressed = false;
        assert_eq!(handle_input(&mut state, &mut r, &cards, &ev), ScreenAction::None);
        assert!(state.is_idle());
    }

    #[test]
    fn text_outside_entry_is_ignored() {
        let mut r = roster(&[]);
        let mut state = init(&mut r);
        handle_text_input(&mut state, &TextInput::Text("abc".to_string()));
        assert!(state.is_idle());
    }

    #[test]
    fn untouched_seed_entry_keeps_the_seed() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("Alice", "ALIC")]);
        let alice = r.competitor(0).unwrap().id;
        assert!(r.update_competitor(alice, "Alice", "ALIC", 3));
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.select_row(RowKind::ModifyPlayer);
        h.start();
        h.choose(C::SetSeedNumber);
        assert_eq!(h.state.text_entry().unwrap().value, "3");
        h.start();
        assert_eq!(h.state.session().seed_index, 3);
        assert_eq!(
            h.choose(C::ExitAndRegister),
            ScreenAction::Reload { message: None }
        );
        assert_eq!(h.roster.competitor(0).unwrap().seed_index, 3);
    }

    #[test]
    fn expanding_upper_case_never_overflows_score_name() {
        use RegisterMenuChoice as C;
        let mut r = roster(&[("Alice", "ALIC")]);
        let cards = FakeCards::empty();
        let mut h = Harness::new(&mut r, &cards);

        h.select_row(RowKind::ModifyPlayer);
        h.start();
        h.enter(C::SetHighscoreName, "ßßßß");
        assert_eq!(h.state.session().score_name, "ßßßß");
        h.choose(C::ExitAndRegister);

        let stored = &h.roster.competitor(0).unwrap().high_score_name;
        assert!(stored.chars().count() <= 4, "{stored}");
        assert_eq!(stored, "ßßßß");
    }

    #[test]
    fn unresolved_index_is_found_by_id() {
        let mut r = roster(&[("Alice", "ALIC"), ("Bob", "BOB"), ("Cat", "CAT")]);
        let cat = r.competitor(2).unwrap().id;
        let mut state = init(&mut r);

        load_player_data_from_competitor(&mut state, &r, cat, None);
        let session = state.session();
        assert_eq!(session.editing_index(), Some(2));
        assert_eq!(session.active_competitor(), Some(cat));
        assert_eq!(session.player_name, "Cat");
        assert_eq!(session.score_name, "CAT");
    }
}
