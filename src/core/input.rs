/* ------------------------ Virtual actions ------------------------ */

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VirtualAction {
    p1_up,
    p1_down,
    p1_left,
    p1_right,
    p1_start,
    p1_back,
    p1_menu_up,
    p1_menu_down,
    p1_menu_left,
    p1_menu_right,
    p1_select,
    p2_up,
    p2_down,
    p2_left,
    p2_right,
    p2_start,
    p2_back,
    p2_menu_up,
    p2_menu_down,
    p2_menu_left,
    p2_menu_right,
    p2_select,
}

/// Menu direction shared by both players' pads; option screens run with a
/// single shared cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuInput {
    Up,
    Down,
    Left,
    Right,
    Start,
    Back,
    Select,
}

impl VirtualAction {
    pub const fn menu_input(self) -> MenuInput {
        use VirtualAction::{
            p1_back, p1_down, p1_left, p1_menu_down, p1_menu_left, p1_menu_right, p1_menu_up,
            p1_right, p1_select, p1_start, p1_up, p2_back, p2_down, p2_left, p2_menu_down,
            p2_menu_left, p2_menu_right, p2_menu_up, p2_right, p2_select, p2_start, p2_up,
        };
        match self {
            p1_up | p1_menu_up | p2_up | p2_menu_up => MenuInput::Up,
            p1_down | p1_menu_down | p2_down | p2_menu_down => MenuInput::Down,
            p1_left | p1_menu_left | p2_left | p2_menu_left => MenuInput::Left,
            p1_right | p1_menu_right | p2_right | p2_menu_right => MenuInput::Right,
            p1_start | p2_start => MenuInput::Start,
            p1_back | p2_back => MenuInput::Back,
            p1_select | p2_select => MenuInput::Select,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct InputEvent {
    pub action: VirtualAction,
    pub pressed: bool,
}

impl InputEvent {
    pub const fn press(action: VirtualAction) -> Self {
        Self {
            action,
            pressed: true,
        }
    }
}

/// Raw text typed while a text-entry overlay is open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextInput {
    Text(String),
    Backspace,
}

#[inline(always)]
pub fn parse_action_key_lower(k: &str) -> Option<VirtualAction> {
    use VirtualAction::{
        p1_back, p1_down, p1_left, p1_menu_down, p1_menu_left, p1_menu_right, p1_menu_up,
        p1_right, p1_select, p1_start, p1_up, p2_back, p2_down, p2_left, p2_menu_down,
        p2_menu_left, p2_menu_right, p2_menu_up, p2_right, p2_select, p2_start, p2_up,
    };
    match k {
        "p1_up" => Some(p1_up),
        "p1_down" => Some(p1_down),
        "p1_left" => Some(p1_left),
        "p1_right" => Some(p1_right),
        "p1_start" => Some(p1_start),
        "p1_back" => Some(p1_back),
        "p1_menuup" => Some(p1_menu_up),
        "p1_menudown" => Some(p1_menu_down),
        "p1_menuleft" => Some(p1_menu_left),
        "p1_menuright" => Some(p1_menu_right),
        "p1_select" => Some(p1_select),
        "p2_up" => Some(p2_up),
        "p2_down" => Some(p2_down),
        "p2_left" => Some(p2_left),
        "p2_right" => Some(p2_right),
        "p2_start" => Some(p2_start),
        "p2_back" => Some(p2_back),
        "p2_menuup" => Some(p2_menu_up),
        "p2_menudown" => Some(p2_menu_down),
        "p2_menuleft" => Some(p2_menu_left),
        "p2_menuright" => Some(p2_menu_right),
        "p2_select" => Some(p2_select),
        _ => None,
    }
}
