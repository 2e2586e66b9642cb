use crate::core::input::{InputEvent, TextInput, VirtualAction, parse_action_key_lower};
use crate::game::profile::MemoryCards;
use crate::game::tournament::TournamentRoster;
use crate::screens::components::prompt::{PromptAnswer, PromptType};
use crate::screens::tournament_options;
use crate::screens::{Screen, ScreenAction};
use log::{debug, info, warn};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Action(VirtualAction),
    Text(TextInput),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if let Some(text) = line.strip_prefix("type ") {
        return Some(Command::Text(TextInput::Text(text.to_string())));
    }

    let lower = line.to_ascii_lowercase();
    let (player, word) = match lower.split_once(char::is_whitespace) {
        Some((p @ ("p1" | "p2"), rest)) => (p, rest.trim()),
        _ => ("p1", lower.as_str()),
    };
    match word {
        "backspace" => Some(Command::Text(TextInput::Backspace)),
        "quit" | "exit" => Some(Command::Quit),
        "" => None,
        w => parse_action_key_lower(&format!("{player}_{w}"))
            .or_else(|| parse_action_key_lower(w))
            .map(Command::Action),
    }
}

pub struct App<R: TournamentRoster, C: MemoryCards> {
    roster: R,
    cards: C,
    current_screen: Screen,
    state: tournament_options::State,
    system_message: Option<String>,
}

impl<R: TournamentRoster, C: MemoryCards> App<R, C> {
    pub fn new(mut roster: R, cards: C) -> Self {
        let state = tournament_options::init(&mut roster);
        Self {
            roster,
            cards,
            current_screen: Screen::TournamentOptions,
            state,
            system_message: None,
        }
    }

    pub fn roster(&self) -> &R {
        &self.roster
    }

    fn reload(&mut self) {
        debug!("Reloading tournament options.");
        self.state = tournament_options::init(&mut self.roster);
    }

    /// Applies a screen action. Returns false once the app should stop.
    fn handle_action(&mut self, action: ScreenAction) -> bool {
        match action {
            ScreenAction::None => {}
            ScreenAction::SystemMessage(text) => {
                info!("System message: {text}");
                self.system_message = Some(text);
            }
            ScreenAction::Reload { message } => {
                self.reload();
                if let Some(text) = message {
                    info!("System message: {text}");
                    self.system_message = Some(text);
                }
            }
            ScreenAction::Navigate(Screen::TournamentOptions) => self.reload(),
            ScreenAction::Navigate(screen) => {
                info!("Leaving tournament options for {screen:?}.");
                self.current_screen = screen;
                return false;
            }
            ScreenAction::Exit => return false,
        }
        true
    }

    fn dispatch(&mut self, command: Command) -> bool {
        let action = match command {
            Command::Quit => ScreenAction::Exit,
            Command::Action(action) => tournament_options::handle_input(
                &mut self.state,
                &mut self.roster,
                &self.cards,
                &InputEvent::press(action),
            ),
            Command::Text(text) => tournament_options::handle_text_input(&mut self.state, &text),
        };
        self.handle_action(action)
    }

    fn write_view<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let state = &self.state;
        writeln!(out, "== Tournament Options ==")?;
        for (i, (_, label, value)) in state.rows().into_iter().enumerate() {
            let cursor = if i == state.selected { '>' } else { ' ' };
            writeln!(out, "{cursor} {label:<14} {value}")?;
        }
        if state.is_idle() {
            writeln!(out, "(START to choose, BACK to leave)")?;
        }

        if let Some((_, menu)) = state.sub_menu() {
            writeln!(out, "-- {} --", menu.title)?;
            for (i, row) in menu.rows().iter().enumerate() {
                let cursor = if i == menu.selected { '>' } else { ' ' };
                let disabled = if row.enabled { "" } else { " (disabled)" };
                let value = row.value.as_deref().unwrap_or("");
                writeln!(out, "{cursor} {:<20} {value}{disabled}", row.label)?;
            }
        } else if let Some(entry) = state.text_entry() {
            writeln!(out, "{} [{}] ({} max)", entry.prompt, entry.value, entry.max_len)?;
        } else if let Some(prompt) = state.prompt() {
            writeln!(out, "{}", prompt.message)?;
            let choices = match (prompt.kind, prompt.answer) {
                (PromptType::Ok, _) => "[OK]",
                (PromptType::YesNo, PromptAnswer::Yes) => "[YES]  no ",
                (PromptType::YesNo, _) => " yes  [NO]",
            };
            writeln!(out, "{choices}")?;
        }

        if let Some(text) = self.system_message.take() {
            writeln!(out, "** {text} **")?;
        }
        writeln!(out)
    }

    /// Drives the screen from line commands until input ends or the screen is
    /// left.
    pub fn run_script<I: BufRead, W: Write>(&mut self, input: I, mut out: W) -> io::Result<()> {
        self.write_view(&mut out)?;
        for line in input.lines() {
            let line = line?;
            let Some(command) = parse_command(&line) else {
                if !line.trim().is_empty() {
                    warn!("Unrecognized command: '{}'", line.trim());
                }
                continue;
            };
            let keep_going = self.dispatch(command);
            self.write_view(&mut out)?;
            if !keep_going {
                break;
            }
        }
        out.flush()
    }
}

pub fn run<R: TournamentRoster, C: MemoryCards>(
    roster: R,
    cards: C,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(roster, cards);
    let stdin = io::stdin();
    let stdout = io::stdout();
    app.run_script(stdin.lock(), stdout.lock())?;
    info!(
        "Tournament has {} competitor(s).",
        app.roster().competitor_count()
    );
    Ok(())
}
