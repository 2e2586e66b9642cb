use crate::core::input::MenuInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptType {
    Ok,
    YesNo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptAnswer {
    Ok,
    Yes,
    No,
}

#[derive(Clone, Debug)]
pub struct State {
    pub message: String,
    pub kind: PromptType,
    pub answer: PromptAnswer,
}

impl State {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: PromptType::Ok,
            answer: PromptAnswer::Ok,
        }
    }

    pub fn yes_no(message: impl Into<String>, default: PromptAnswer) -> Self {
        let answer = if default == PromptAnswer::Yes {
            PromptAnswer::Yes
        } else {
            PromptAnswer::No
        };
        Self {
            message: message.into(),
            kind: PromptType::YesNo,
            answer,
        }
    }

    pub fn handle_input(&mut self, input: MenuInput) -> Option<PromptAnswer> {
        match (input, self.kind) {
            (MenuInput::Left | MenuInput::Right, PromptType::YesNo) => {
                self.answer = match self.answer {
                    PromptAnswer::Yes => PromptAnswer::No,
                    _ => PromptAnswer::Yes,
                };
                None
            }
            (MenuInput::Start, _) => Some(self.answer),
            (MenuInput::Back, PromptType::YesNo) => Some(PromptAnswer::No),
            (MenuInput::Back, PromptType::Ok) => Some(PromptAnswer::Ok),
            _ => None,
        }
    }
}
