use crate::core::input::{MenuInput, TextInput};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub cancelled: bool,
}

#[derive(Clone, Debug)]
pub struct State {
    pub prompt: String,
    pub value: String,
    pub max_len: usize,
}

impl State {
    pub fn new(prompt: impl Into<String>, initial: &str, max_len: usize) -> Self {
        Self {
            prompt: prompt.into(),
            value: initial.chars().take(max_len).collect(),
            max_len,
        }
    }

    pub fn handle_input(&mut self, input: MenuInput) -> Option<Answer> {
        match input {
            MenuInput::Start => Some(Answer {
                text: self.value.clone(),
                cancelled: false,
            }),
            MenuInput::Back => Some(Answer {
                text: String::new(),
                cancelled: true,
            }),
            _ => None,
        }
    }

    pub fn handle_text(&mut self, input: &TextInput) {
        match input {
            TextInput::Backspace => {
                let _ = self.value.pop();
            }
            TextInput::Text(text) => {
                let mut len = self.value.chars().count();
                for ch in text.chars() {
                    if ch.is_control() {
                        continue;
                    }
                    if len >= self.max_len {
                        break;
                    }
                    self.value.push(ch);
                    len += 1;
                }
            }
        }
    }
}
