use crate::core::input::MenuInput;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuRow<C> {
    pub code: C,
    pub label: &'static str,
    pub value: Option<String>,
    pub enabled: bool,
}

impl<C> MenuRow<C> {
    pub const fn new(code: C, label: &'static str) -> Self {
        Self {
            code,
            label,
            value: None,
            enabled: true,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MiniMenuResult<C> {
    Chosen(C),
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct State<C> {
    pub title: &'static str,
    rows: Vec<MenuRow<C>>,
    pub selected: usize,
}

impl<C: Copy> State<C> {
    pub fn new(title: &'static str, rows: Vec<MenuRow<C>>) -> Self {
        let selected = rows.iter().position(|r| r.enabled).unwrap_or(0);
        Self {
            title,
            rows,
            selected,
        }
    }

    pub fn rows(&self) -> &[MenuRow<C>] {
        &self.rows
    }

    /// Moves to the next enabled row in `step` direction, wrapping around.
    fn move_selected(&mut self, step: isize) {
        let total = self.rows.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        let mut ix = self.selected;
        for _ in 0..total {
            ix = (ix as isize + step).rem_euclid(total as isize) as usize;
            if self.rows[ix].enabled {
                self.selected = ix;
                return;
            }
        }
    }

    pub fn handle_input(&mut self, input: MenuInput) -> Option<MiniMenuResult<C>> {
        match input {
            MenuInput::Up => self.move_selected(-1),
            MenuInput::Down => self.move_selected(1),
            MenuInput::Start => {
                let row = self.rows.get(self.selected)?;
                if row.enabled {
                    return Some(MiniMenuResult::Chosen(row.code));
                }
            }
            MenuInput::Back => return Some(MiniMenuResult::Cancelled),
            MenuInput::Left | MenuInput::Right | MenuInput::Select => {}
        }
        None
    }
}
